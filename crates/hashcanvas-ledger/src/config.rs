//! Ledger endpoints, fees and fetch pacing.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for talking to the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Account that receives placement transfers and whose history is the canvas.
    #[serde(default = "default_canvas_account_id")]
    pub canvas_account_id: String,
    /// Mirror node REST base URL.
    #[serde(default = "default_mirror_node_url")]
    pub mirror_node_url: String,
    /// Amount moved per placement, in tinybars.
    #[serde(default = "default_fee_tinybars")]
    pub fee_tinybars: i64,
    /// Transactions requested per page.
    #[serde(default = "default_page_limit")]
    pub page_limit: u32,
    /// Upper bound on pages followed per fetch.
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,
    /// Minimum spacing between fetches.
    #[serde(default = "default_fetch_cooldown_ms")]
    pub fetch_cooldown_ms: u64,
    /// Whole-fetch timeout.
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
}

fn default_canvas_account_id() -> String { "0.0.12345".to_string() }
fn default_mirror_node_url() -> String { "https://testnet.mirrornode.hedera.com".to_string() }
fn default_fee_tinybars() -> i64 { 1000 }
fn default_page_limit() -> u32 { 1000 }
fn default_max_pages() -> u32 { 5 }
fn default_fetch_cooldown_ms() -> u64 { 2000 }
fn default_fetch_timeout_secs() -> u64 { 15 }

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            canvas_account_id: default_canvas_account_id(),
            mirror_node_url: default_mirror_node_url(),
            fee_tinybars: default_fee_tinybars(),
            page_limit: default_page_limit(),
            max_pages: default_max_pages(),
            fetch_cooldown_ms: default_fetch_cooldown_ms(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
        }
    }
}

impl LedgerConfig {
    /// Create config for Hedera mainnet.
    pub fn mainnet(canvas_account_id: &str) -> Self {
        Self {
            canvas_account_id: canvas_account_id.to_string(),
            mirror_node_url: "https://mainnet-public.mirrornode.hedera.com".to_string(),
            ..Self::default()
        }
    }

    /// Set the canvas account.
    pub fn with_canvas_account(mut self, account_id: &str) -> Self {
        self.canvas_account_id = account_id.to_string();
        self
    }

    /// Set the mirror node base URL.
    pub fn with_mirror_node_url(mut self, url: &str) -> Self {
        self.mirror_node_url = url.trim_end_matches('/').to_string();
        self
    }

    /// Set the fetch cooldown.
    pub fn with_cooldown(mut self, cooldown: Duration) -> Self {
        self.fetch_cooldown_ms = cooldown.as_millis() as u64;
        self
    }

    /// Set the fetch timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.fetch_timeout_secs = secs;
        self
    }

    pub fn fetch_cooldown(&self) -> Duration {
        Duration::from_millis(self.fetch_cooldown_ms)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}
