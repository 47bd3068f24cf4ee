//! # HashCanvas Core
//!
//! Memo codec and reconciliation for a shared pixel canvas stored as memos
//! on ledger transfers.
//!
//! - **MemoCodec**: turns a placement into `TAG:{"x":..,"y":..,"c":".."}`
//!   and back, rejecting foreign and malformed memos
//! - **Reconciler**: folds a batch of ledger records into the newest
//!   record per cell (latest consensus timestamp wins)
//! - **CanvasView**: authoritative state plus an overlay of local
//!   placements awaiting confirmation
//!
//! Everything here is synchronous and pure; fetching and submitting live in
//! `hashcanvas-ledger`.
//!
//! ## Quick Start
//!
//! ```rust
//! use hashcanvas_core::prelude::*;
//!
//! let codec = MemoCodec::default();
//! let memo = codec.encode(&PixelPlacement::new(1, 1, "#00FF00")).unwrap();
//!
//! let records = vec![
//!     LedgerRecord::new(Some(memo), ConsensusTimestamp::new(150, 0)),
//!     LedgerRecord::new(Some("unrelated".into()), ConsensusTimestamp::new(200, 0)),
//! ];
//! let state = Reconciler::new(codec).reconcile(&records);
//! assert_eq!(state.get(&CellKey::new(1, 1)).unwrap().color, "#00FF00");
//! ```

pub mod config;
pub mod error;
pub mod memo;
pub mod prelude;
pub mod reconcile;
pub mod types;
pub mod view;
