//! Canvas-wide constants, loaded once per process.

use crate::error::{CanvasError, Result};
use crate::memo::MEMO_SEPARATOR;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration shared by the codec and the view.
///
/// Changing `size` after memos were written against a larger canvas makes
/// the out-of-range cells silently disappear; nothing here migrates them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanvasConfig {
    /// Side length N of the square canvas.
    #[serde(default = "default_size")]
    pub size: u32,
    /// Literal prefix marking this application's memos.
    #[serde(default = "default_memo_tag")]
    pub memo_tag: String,
    /// How long an unconfirmed local placement stays visible.
    #[serde(default = "default_pending_ttl_secs")]
    pub pending_ttl_secs: u64,
}

fn default_size() -> u32 { 50 }
fn default_memo_tag() -> String { "HEDERA_PLACE_PIXEL".to_string() }
fn default_pending_ttl_secs() -> u64 { 120 }

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            size: default_size(),
            memo_tag: default_memo_tag(),
            pending_ttl_secs: default_pending_ttl_secs(),
        }
    }
}

impl CanvasConfig {
    /// Set the canvas side length.
    pub fn with_size(mut self, size: u32) -> Self {
        self.size = size;
        self
    }

    /// Set the memo tag.
    pub fn with_memo_tag(mut self, tag: impl Into<String>) -> Self {
        self.memo_tag = tag.into();
        self
    }

    /// Set the pending-placement lifetime.
    pub fn with_pending_ttl(mut self, ttl: Duration) -> Self {
        self.pending_ttl_secs = ttl.as_secs();
        self
    }

    pub fn pending_ttl(&self) -> Duration {
        Duration::from_secs(self.pending_ttl_secs)
    }

    /// Reject values the codec cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.size == 0 {
            return Err(CanvasError::invalid_config("size", "must be at least 1"));
        }
        if self.memo_tag.is_empty() {
            return Err(CanvasError::invalid_config("memo_tag", "must not be empty"));
        }
        if self.memo_tag.contains(MEMO_SEPARATOR) {
            return Err(CanvasError::invalid_config(
                "memo_tag",
                format!("must not contain '{}'", MEMO_SEPARATOR),
            ));
        }
        Ok(())
    }
}
