//! Fetch-reconcile cycles and placements for one user session.
//!
//! `CanvasSync` owns the session's [`CanvasView`] and keeps the ledger
//! contracts: fetches are spaced by a cooldown, at most one is in flight, a
//! failed or timed-out fetch leaves the view untouched, and a successful one
//! replaces the authoritative state wholesale.

use crate::config::LedgerConfig;
use crate::error::{LedgerError, LedgerResult};
use crate::source::RecordSource;
use crate::wallet::{TransactionId, TransferRequest, Wallet};
use hashcanvas_core::config::CanvasConfig;
use hashcanvas_core::memo::MemoCodec;
use hashcanvas_core::reconcile::{CanvasState, ReconcileReport, Reconciler};
use hashcanvas_core::types::{CellKey, ConsensusTimestamp, DecodedRecord, PixelPlacement};
use hashcanvas_core::view::{CanvasView, PendingPlacement};
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tokio::time::Instant;
use tracing::{info, warn};

/// What a refresh call did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// New authoritative state is visible.
    Updated(ReconcileReport),
    /// Called again before the cooldown elapsed; nothing fetched.
    Throttled { retry_after: Duration },
    /// Another refresh is still running; this one was dropped.
    InFlight,
}

/// Result of a successful placement submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacementReceipt {
    pub transaction_id: TransactionId,
    pub memo: String,
    /// Ordering key of the provisional entry shown until confirmation.
    pub provisional_key: ConsensusTimestamp,
}

/// Drives a canvas view from a record source and a wallet.
pub struct CanvasSync<S, W> {
    source: S,
    wallet: W,
    reconciler: Reconciler,
    ledger: LedgerConfig,
    view: RwLock<CanvasView>,
    /// Held for the whole fetch; stores when the last fetch started.
    fetch_gate: Mutex<Option<Instant>>,
}

impl<S: RecordSource, W: Wallet> CanvasSync<S, W> {
    pub fn new(source: S, wallet: W, canvas: &CanvasConfig, ledger: LedgerConfig) -> LedgerResult<Self> {
        let codec = MemoCodec::from_config(canvas)?;
        Ok(Self {
            source,
            wallet,
            reconciler: Reconciler::new(codec),
            ledger,
            view: RwLock::new(CanvasView::new().with_pending_ttl(canvas.pending_ttl())),
            fetch_gate: Mutex::new(None),
        })
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn wallet(&self) -> &W {
        &self.wallet
    }

    pub fn ledger_config(&self) -> &LedgerConfig {
        &self.ledger
    }

    /// Fetch the canvas account's history and rebuild the authoritative state.
    pub async fn refresh(&self) -> LedgerResult<RefreshOutcome> {
        let mut gate = match self.fetch_gate.try_lock() {
            Ok(gate) => gate,
            Err(_) => {
                info!("Refresh already in flight; dropping request");
                return Ok(RefreshOutcome::InFlight);
            }
        };

        let now = Instant::now();
        if let Some(last) = *gate {
            let elapsed = now.duration_since(last);
            let cooldown = self.ledger.fetch_cooldown();
            if elapsed < cooldown {
                info!("Throttling refresh request");
                return Ok(RefreshOutcome::Throttled {
                    retry_after: cooldown - elapsed,
                });
            }
        }
        *gate = Some(now);

        let fetched = tokio::time::timeout(
            self.ledger.fetch_timeout(),
            self.source.fetch_records(&self.ledger.canvas_account_id),
        )
        .await;

        let records = match fetched {
            Ok(Ok(records)) => records,
            Ok(Err(e)) => {
                warn!("Failed to fetch canvas state from {}: {}", self.source.name(), e);
                return Err(e);
            }
            Err(_) => {
                warn!(
                    "Fetch from {} timed out after {}s",
                    self.source.name(),
                    self.ledger.fetch_timeout_secs
                );
                return Err(LedgerError::Timeout(self.ledger.fetch_timeout_secs));
            }
        };

        let (state, report) = self.reconciler.reconcile_with_report(&records);
        let cells = state.len();
        self.view
            .write()
            .await
            .replace_authoritative(state, ConsensusTimestamp::now());

        info!("Loaded {} pixels from {}", cells, self.source.name());
        Ok(RefreshOutcome::Updated(report))
    }

    /// Show a placement immediately and submit it through the wallet.
    ///
    /// The provisional entry is in place before the wallet call resolves. If
    /// the submission fails the entry stays; call [`rollback`](Self::rollback)
    /// to remove it.
    pub async fn place_pixel(&self, placement: &PixelPlacement) -> LedgerResult<PlacementReceipt> {
        let payer = self
            .wallet
            .account_id()
            .ok_or(LedgerError::WalletNotConnected)?;
        let memo = self.reconciler.codec().encode(placement)?;

        let provisional_key = self.view.write().await.apply_optimistic_local(
            placement,
            &payer,
            ConsensusTimestamp::now(),
        );

        let request = TransferRequest::placement(
            &payer,
            &self.ledger.canvas_account_id,
            self.ledger.fee_tinybars,
            memo.clone(),
        );

        match self.wallet.submit_transfer(request).await {
            Ok(transaction_id) => {
                self.view
                    .write()
                    .await
                    .mark_submitted(&placement.cell(), transaction_id.0.clone());
                info!(
                    "Pixel placed at ({}, {}) in {}",
                    placement.x, placement.y, transaction_id
                );
                Ok(PlacementReceipt {
                    transaction_id,
                    memo,
                    provisional_key,
                })
            }
            Err(e) => {
                warn!("Failed to submit pixel at {}: {}", placement.cell(), e);
                Err(e)
            }
        }
    }

    /// Drop the provisional entry for a cell.
    pub async fn rollback(&self, cell: &CellKey) -> Option<PendingPlacement> {
        self.view.write().await.discard_pending(cell)
    }

    /// What is currently shown for a cell.
    pub async fn cell(&self, key: &CellKey) -> Option<DecodedRecord> {
        self.view.read().await.cell(key).cloned()
    }

    /// Both tiers flattened for rendering.
    pub async fn snapshot(&self) -> CanvasState {
        self.view.read().await.merged()
    }

    /// Only the ledger-confirmed state.
    pub async fn authoritative(&self) -> CanvasState {
        self.view.read().await.authoritative().clone()
    }

    pub async fn pending_len(&self) -> usize {
        self.view.read().await.pending_len()
    }
}
