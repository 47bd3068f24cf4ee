//! Ledger-facing errors.

use hashcanvas_core::error::CanvasError;
use thiserror::Error;

/// Errors from fetching records or submitting transfers.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Fetch failed: {0}")]
    FetchFailed(String),

    #[error("Fetch timed out after {0} seconds")]
    Timeout(u64),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Submit failed: {0}")]
    SubmitFailed(String),

    #[error("Wallet not connected")]
    WalletNotConnected,

    #[error(transparent)]
    Canvas(#[from] CanvasError),
}

/// Result type for ledger operations.
pub type LedgerResult<T> = Result<T, LedgerError>;

impl LedgerError {
    /// Whether this came from the fetch side. Canvas state is never touched
    /// when a fetch fails, so these are always safe to retry after cooldown.
    pub fn is_fetch_failure(&self) -> bool {
        matches!(
            self,
            LedgerError::FetchFailed(_) | LedgerError::Timeout(_) | LedgerError::InvalidResponse(_)
        )
    }
}
