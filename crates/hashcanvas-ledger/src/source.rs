//! Fetch collaborator trait.

use crate::error::{LedgerError, LedgerResult};
use async_trait::async_trait;
use hashcanvas_core::types::LedgerRecord;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::RwLock;

/// Anything that can list the transactions touching an account.
///
/// Records may come back in any order; newest-first is typical.
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Get the source name.
    fn name(&self) -> &str;

    /// Fetch the transaction history of `account_id`.
    async fn fetch_records(&self, account_id: &str) -> LedgerResult<Vec<LedgerRecord>>;
}

/// A scripted source for testing.
pub struct MockSource {
    records: RwLock<Vec<LedgerRecord>>,
    failure: RwLock<Option<String>>,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl MockSource {
    /// Create a mock that returns `records` on every fetch.
    pub fn new(records: Vec<LedgerRecord>) -> Self {
        Self {
            records: RwLock::new(records),
            failure: RwLock::new(None),
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Sleep this long before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Replace the records returned by later fetches.
    pub async fn set_records(&self, records: Vec<LedgerRecord>) {
        *self.records.write().await = records;
    }

    /// Make later fetches fail with `reason`, or succeed again with `None`.
    pub async fn set_failure(&self, reason: Option<&str>) {
        *self.failure.write().await = reason.map(str::to_string);
    }

    /// Number of fetches started so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for MockSource {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

#[async_trait]
impl RecordSource for MockSource {
    fn name(&self) -> &str {
        "mock"
    }

    async fn fetch_records(&self, _account_id: &str) -> LedgerResult<Vec<LedgerRecord>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(reason) = self.failure.read().await.clone() {
            return Err(LedgerError::FetchFailed(reason));
        }
        Ok(self.records.read().await.clone())
    }
}
