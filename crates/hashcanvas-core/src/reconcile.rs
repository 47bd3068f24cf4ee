//! Latest-write-wins reconciliation of ledger records into canvas state.
//!
//! Each fetch cycle rebuilds the state from scratch. For every cell the
//! record with the greatest consensus timestamp wins; among equal
//! timestamps the first one in the input wins. The result does not depend on
//! input order except for that tie-break.

use crate::error::MemoError;
use crate::memo::MemoCodec;
use crate::types::{CellKey, ConsensusTimestamp, DecodedRecord, LedgerRecord};
use serde::{Deserialize, Serialize};
use std::collections::hash_map::{self, Entry, HashMap};
use tracing::debug;

/// Authoritative mapping of cell to the newest record seen for it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CanvasState {
    cells: HashMap<CellKey, DecodedRecord>,
}

impl CanvasState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &CellKey) -> Option<&DecodedRecord> {
        self.cells.get(key)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn iter(&self) -> hash_map::Iter<'_, CellKey, DecodedRecord> {
        self.cells.iter()
    }

    /// Highest ordering key of any stored record.
    pub fn high_water(&self) -> Option<ConsensusTimestamp> {
        self.cells.values().map(|r| r.ordering_key).max()
    }

    /// Offer a record; it is kept only if its cell is empty or it is
    /// strictly newer than the stored one. Returns whether it was kept.
    pub fn offer(&mut self, record: DecodedRecord) -> bool {
        match self.cells.entry(record.cell()) {
            Entry::Vacant(slot) => {
                slot.insert(record);
                true
            }
            Entry::Occupied(mut slot) => {
                if record.ordering_key > slot.get().ordering_key {
                    slot.insert(record);
                    true
                } else {
                    false
                }
            }
        }
    }
}

impl<'a> IntoIterator for &'a CanvasState {
    type Item = (&'a CellKey, &'a DecodedRecord);
    type IntoIter = hash_map::Iter<'a, CellKey, DecodedRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.cells.iter()
    }
}

/// Counters from one reconciliation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileReport {
    /// Records in the batch.
    pub seen: usize,
    /// Records that were stored (possibly replaced later in the same pass).
    pub applied: usize,
    /// Decoded records that lost to an equal-or-newer record already stored.
    pub superseded: usize,
    /// Records with no memo or someone else's memo.
    pub foreign: usize,
    /// Records tagged as ours whose payload could not be used.
    pub malformed: usize,
}

/// Folds ledger record batches into [`CanvasState`].
#[derive(Debug, Clone, Default)]
pub struct Reconciler {
    codec: MemoCodec,
}

impl Reconciler {
    pub fn new(codec: MemoCodec) -> Self {
        Self { codec }
    }

    pub fn codec(&self) -> &MemoCodec {
        &self.codec
    }

    /// Build canvas state from a batch of records.
    pub fn reconcile<'a, I>(&self, records: I) -> CanvasState
    where
        I: IntoIterator<Item = &'a LedgerRecord>,
    {
        self.reconcile_with_report(records).0
    }

    /// Like [`reconcile`](Self::reconcile), also returning pass statistics.
    pub fn reconcile_with_report<'a, I>(&self, records: I) -> (CanvasState, ReconcileReport)
    where
        I: IntoIterator<Item = &'a LedgerRecord>,
    {
        let mut state = CanvasState::new();
        let mut report = ReconcileReport::default();

        for record in records {
            report.seen += 1;

            let pixel = match self.codec.decode(record.memo.as_deref()) {
                Ok(pixel) => pixel,
                Err(MemoError::NotOurMemo) => {
                    report.foreign += 1;
                    continue;
                }
                Err(MemoError::Malformed(reason)) => {
                    debug!(
                        "Skipping malformed memo at {}: {}",
                        record.ordering_key, reason
                    );
                    report.malformed += 1;
                    continue;
                }
            };

            let decoded = DecodedRecord::from_pixel(
                pixel,
                record.ordering_key,
                record.transfer_origin.as_deref(),
            );
            if state.offer(decoded) {
                report.applied += 1;
            } else {
                report.superseded += 1;
            }
        }

        debug!(
            "Reconciled {} records into {} cells ({} foreign, {} malformed)",
            report.seen,
            state.len(),
            report.foreign,
            report.malformed
        );

        (state, report)
    }
}

/// Reconcile with a default-configured codec.
pub fn reconcile(records: &[LedgerRecord]) -> CanvasState {
    Reconciler::default().reconcile(records)
}
