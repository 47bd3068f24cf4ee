//! Submit collaborator trait and transfer description.
//!
//! Signing happens inside the wallet. The canvas only describes the
//! transfer: two legs moving the placement fee to the canvas account, plus
//! the memo.

use crate::error::{LedgerError, LedgerResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::Mutex;

/// One side of an HBAR transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferLeg {
    pub account_id: String,
    /// Negative for the sender.
    pub amount_tinybars: i64,
}

/// An unsigned transfer for the wallet to sign and submit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRequest {
    pub legs: Vec<TransferLeg>,
    pub memo: String,
}

impl TransferRequest {
    /// The minimal-value transfer that carries a placement memo.
    pub fn placement(payer: &str, canvas_account: &str, fee_tinybars: i64, memo: String) -> Self {
        Self {
            legs: vec![
                TransferLeg {
                    account_id: payer.to_string(),
                    amount_tinybars: -fee_tinybars,
                },
                TransferLeg {
                    account_id: canvas_account.to_string(),
                    amount_tinybars: fee_tinybars,
                },
            ],
            memo,
        }
    }

    /// Legs must sum to zero.
    pub fn is_balanced(&self) -> bool {
        self.legs.iter().map(|l| l.amount_tinybars).sum::<i64>() == 0
    }
}

/// Opaque identifier returned by the wallet.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransactionId(pub String);

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A paired wallet able to sign and submit transfers.
#[async_trait]
pub trait Wallet: Send + Sync {
    /// The paired account, or `None` when no wallet is connected.
    fn account_id(&self) -> Option<String>;

    /// Sign and submit a transfer.
    async fn submit_transfer(&self, request: TransferRequest) -> LedgerResult<TransactionId>;
}

/// No paired wallet: the session can watch the canvas but not place pixels.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReadOnlyWallet;

#[async_trait]
impl Wallet for ReadOnlyWallet {
    fn account_id(&self) -> Option<String> {
        None
    }

    async fn submit_transfer(&self, _request: TransferRequest) -> LedgerResult<TransactionId> {
        Err(LedgerError::WalletNotConnected)
    }
}

/// A wallet for testing. Records every submitted transfer.
pub struct MockWallet {
    account: String,
    failure: Option<String>,
    submitted: Mutex<Vec<TransferRequest>>,
    sequence: AtomicU64,
}

impl MockWallet {
    /// A connected wallet for `account_id`.
    pub fn connected(account_id: &str) -> Self {
        Self {
            account: account_id.to_string(),
            failure: None,
            submitted: Mutex::new(Vec::new()),
            sequence: AtomicU64::new(0),
        }
    }

    /// Reject every submission with `reason`.
    pub fn failing(mut self, reason: &str) -> Self {
        self.failure = Some(reason.to_string());
        self
    }

    /// Transfers submitted so far, oldest first.
    pub async fn submitted(&self) -> Vec<TransferRequest> {
        self.submitted.lock().await.clone()
    }
}

#[async_trait]
impl Wallet for MockWallet {
    fn account_id(&self) -> Option<String> {
        Some(self.account.clone())
    }

    async fn submit_transfer(&self, request: TransferRequest) -> LedgerResult<TransactionId> {
        if let Some(reason) = &self.failure {
            return Err(LedgerError::SubmitFailed(reason.clone()));
        }

        self.submitted.lock().await.push(request);
        let n = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(TransactionId(format!("{}@{}.000000000", self.account, n)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placement_request() {
        let request = TransferRequest::placement("0.0.7", "0.0.12345", 1000, "memo".into());
        assert!(request.is_balanced());
        assert_eq!(request.legs[0].amount_tinybars, -1000);
        assert_eq!(request.legs[1].account_id, "0.0.12345");
    }

    #[tokio::test]
    async fn test_mock_wallet() {
        let wallet = MockWallet::connected("0.0.7");
        let id = wallet
            .submit_transfer(TransferRequest::placement("0.0.7", "0.0.1", 1, "m".into()))
            .await
            .unwrap();
        assert_eq!(id.to_string(), "0.0.7@1.000000000");
        assert_eq!(wallet.submitted().await.len(), 1);

        let err = ReadOnlyWallet
            .submit_transfer(TransferRequest::placement("", "0.0.1", 1, "m".into()))
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::WalletNotConnected));

        let err = MockWallet::connected("0.0.7")
            .failing("INSUFFICIENT_PAYER_BALANCE")
            .submit_transfer(TransferRequest::placement("0.0.7", "0.0.1", 1, "m".into()))
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::SubmitFailed(_)));
    }
}
