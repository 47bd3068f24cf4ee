//! Hedera mirror node source.
//!
//! Requires the `mirror` feature.

use crate::config::LedgerConfig;
use crate::error::{LedgerError, LedgerResult};
use crate::source::RecordSource;
use crate::wire::{parse_page, PageLinks};
use async_trait::async_trait;
use hashcanvas_core::types::LedgerRecord;
use tracing::{debug, info};

/// Reads an account's transactions from a mirror node, newest first.
///
/// # Example
///
/// ```rust,ignore
/// use hashcanvas_ledger::{LedgerConfig, MirrorNodeSource, RecordSource};
///
/// let source = MirrorNodeSource::new(&LedgerConfig::default())?;
/// let records = source.fetch_records("0.0.12345").await?;
/// ```
pub struct MirrorNodeSource {
    endpoint: String,
    page_limit: u32,
    max_pages: u32,
    timeout_secs: u64,
    client: reqwest::Client,
}

impl MirrorNodeSource {
    /// Create a source from ledger config.
    pub fn new(config: &LedgerConfig) -> LedgerResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.fetch_timeout())
            .build()
            .map_err(|e| LedgerError::FetchFailed(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            endpoint: config.mirror_node_url.trim_end_matches('/').to_string(),
            page_limit: config.page_limit.max(1),
            max_pages: config.max_pages.max(1),
            timeout_secs: config.fetch_timeout_secs,
            client,
        })
    }

    /// Create a source against Hedera testnet with default settings.
    pub fn testnet() -> LedgerResult<Self> {
        Self::new(&LedgerConfig::default())
    }

    fn first_page_url(&self, account_id: &str) -> String {
        format!(
            "{}/api/v1/transactions?account.id={}&limit={}&order=desc",
            self.endpoint, account_id, self.page_limit
        )
    }

    /// URL of the page after page number `pages`, if the listing continues
    /// and the page budget allows. `next` is normally a root-relative path.
    fn next_url(&self, links: &PageLinks, pages: u32) -> Option<String> {
        let next = links.next.as_deref().filter(|n| !n.is_empty())?;
        if pages >= self.max_pages {
            debug!("Stopping after {} pages; older history not read", pages);
            return None;
        }
        if next.starts_with("http://") || next.starts_with("https://") {
            Some(next.to_string())
        } else {
            Some(format!("{}{}", self.endpoint, next))
        }
    }

    async fn get_page(&self, url: &str) -> LedgerResult<String> {
        debug!("GET {}", url);

        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                LedgerError::Timeout(self.timeout_secs)
            } else if e.is_connect() {
                LedgerError::FetchFailed(format!(
                    "Cannot connect to mirror node at {}",
                    self.endpoint
                ))
            } else {
                LedgerError::FetchFailed(e.to_string())
            }
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(LedgerError::FetchFailed(format!(
                "Mirror node error {}: {}",
                status, body
            )));
        }

        response
            .text()
            .await
            .map_err(|e| LedgerError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl RecordSource for MirrorNodeSource {
    fn name(&self) -> &str {
        "mirror-node"
    }

    async fn fetch_records(&self, account_id: &str) -> LedgerResult<Vec<LedgerRecord>> {
        let mut records = Vec::new();
        let mut url = Some(self.first_page_url(account_id));
        let mut pages: u32 = 0;

        while let Some(current) = url.take() {
            let page = parse_page(&self.get_page(&current).await?)?;
            records.extend(page.records());
            pages += 1;

            url = self.next_url(&page.links, pages);
        }

        info!(
            "Fetched {} transactions for {} in {} page(s)",
            records.len(),
            account_id,
            pages
        );
        Ok(records)
    }
}
