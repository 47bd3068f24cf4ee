//! Two-tier canvas view: authoritative state plus pending local placements.
//!
//! Local submissions are not written into the reconciled state. They live in
//! a separate overlay until the ledger catches up, the entry expires, or the
//! caller discards it.

use crate::reconcile::CanvasState;
use crate::types::{CellKey, ConsensusTimestamp, DecodedRecord, PixelPlacement};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, warn};

/// A placement submitted locally and not yet seen on the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingPlacement {
    /// Provisional record shown to the user.
    pub record: DecodedRecord,
    /// Newest authoritative ordering key known when the entry was made.
    /// Any authoritative record for the cell newer than this settles it.
    pub baseline: Option<ConsensusTimestamp>,
    /// Wallet transaction id, once the submit call returns one.
    pub transaction_id: Option<String>,
    /// Local clock when the entry was made. TTL expiry counts from here,
    /// not from the possibly raised ordering key.
    pub placed_at: ConsensusTimestamp,
}

/// Authoritative state with a pending overlay.
#[derive(Debug, Clone, Default)]
pub struct CanvasView {
    authoritative: CanvasState,
    pending: HashMap<CellKey, PendingPlacement>,
    high_water: Option<ConsensusTimestamp>,
    pending_ttl: Option<Duration>,
}

impl CanvasView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Expire pending placements older than `ttl` on the next replacement.
    pub fn with_pending_ttl(mut self, ttl: Duration) -> Self {
        self.pending_ttl = Some(ttl);
        self
    }

    pub fn authoritative(&self) -> &CanvasState {
        &self.authoritative
    }

    pub fn pending(&self) -> impl Iterator<Item = (&CellKey, &PendingPlacement)> {
        self.pending.iter()
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Highest ordering key ever observed from the ledger.
    pub fn high_water(&self) -> Option<ConsensusTimestamp> {
        self.high_water
    }

    /// Show `placement` immediately, before the ledger confirms it.
    ///
    /// The provisional ordering key is `local_clock`, raised to one
    /// nanosecond past the ledger high-water mark if the local clock lags.
    /// Returns the key actually used.
    pub fn apply_optimistic_local(
        &mut self,
        placement: &PixelPlacement,
        claimed_owner: &str,
        local_clock: ConsensusTimestamp,
    ) -> ConsensusTimestamp {
        let ordering_key = match self.high_water {
            Some(seen) if local_clock <= seen => seen.next(),
            _ => local_clock,
        };

        let record = DecodedRecord {
            x: placement.x,
            y: placement.y,
            color: placement.color.clone(),
            ordering_key,
            owner: claimed_owner.to_string(),
        };
        debug!("Pending placement at {} ({})", placement.cell(), placement.color);

        self.pending.insert(
            placement.cell(),
            PendingPlacement {
                record,
                baseline: self.high_water,
                transaction_id: None,
                placed_at: local_clock,
            },
        );
        ordering_key
    }

    /// Attach the wallet's transaction id to a pending entry.
    pub fn mark_submitted(&mut self, cell: &CellKey, transaction_id: impl Into<String>) -> bool {
        match self.pending.get_mut(cell) {
            Some(entry) => {
                entry.transaction_id = Some(transaction_id.into());
                true
            }
            None => false,
        }
    }

    /// Remove a pending entry, e.g. after the submit call failed.
    pub fn discard_pending(&mut self, cell: &CellKey) -> Option<PendingPlacement> {
        self.pending.remove(cell)
    }

    /// Swap in a freshly reconciled state and settle the overlay.
    ///
    /// `now` is the local clock; it is only used for TTL expiry.
    pub fn replace_authoritative(&mut self, state: CanvasState, now: ConsensusTimestamp) {
        if let Some(seen) = state.high_water() {
            self.high_water = Some(self.high_water.map_or(seen, |hw| hw.max(seen)));
        }
        self.authoritative = state;

        let authoritative = &self.authoritative;
        let ttl = self.pending_ttl;
        self.pending.retain(|cell, entry| {
            let settled = match (authoritative.get(cell), entry.baseline) {
                (Some(current), Some(baseline)) => current.ordering_key > baseline,
                // Nothing was known when it was placed; only a record at or
                // after the provisional key counts as confirmation.
                (Some(current), None) => current.ordering_key >= entry.record.ordering_key,
                (None, _) => false,
            };
            if settled {
                debug!("Pending placement at {} settled by ledger", cell);
                return false;
            }

            if let Some(ttl) = ttl {
                if entry.placed_at.saturating_add(ttl) <= now {
                    warn!("Pending placement at {} expired without confirmation", cell);
                    return false;
                }
            }
            true
        });
    }

    /// What to show for a cell: the pending entry unless the ledger already
    /// holds something newer.
    pub fn cell(&self, key: &CellKey) -> Option<&DecodedRecord> {
        let confirmed = self.authoritative.get(key);
        match (self.pending.get(key), confirmed) {
            (Some(pending), Some(confirmed))
                if confirmed.ordering_key > pending.record.ordering_key =>
            {
                Some(confirmed)
            }
            (Some(pending), _) => Some(&pending.record),
            (None, confirmed) => confirmed,
        }
    }

    /// Flatten both tiers into one state for rendering.
    pub fn merged(&self) -> CanvasState {
        let mut merged = self.authoritative.clone();
        for entry in self.pending.values() {
            merged.offer(entry.record.clone());
        }
        merged
    }
}
