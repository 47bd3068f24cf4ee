//! # HashCanvas Ledger
//!
//! Ledger collaborators for the HashCanvas pixel canvas.
//!
//! The core crate only turns records into state. This crate supplies the
//! records and carries placements back to the ledger:
//!
//! - [`RecordSource`]: fetch an account's transaction history
//! - [`Wallet`]: sign and submit a transfer carrying a memo
//! - [`CanvasSync`]: runs fetch-reconcile cycles under a cooldown with at
//!   most one fetch in flight, and applies optimistic placements
//!
//! ## Features
//!
//! - `mirror`: Hedera mirror node REST source ([`MirrorNodeSource`])
//!
//! ## Usage
//!
//! ```rust,ignore
//! use hashcanvas_ledger::prelude::*;
//!
//! let source = MirrorNodeSource::new(&LedgerConfig::default())?;
//! let sync = CanvasSync::new(source, wallet, &CanvasConfig::default(), LedgerConfig::default())?;
//! sync.refresh().await?;
//! let state = sync.snapshot().await;
//! ```

mod config;
mod error;
mod source;
mod sync;
mod wallet;
pub mod wire;

pub use config::LedgerConfig;
pub use error::{LedgerError, LedgerResult};
pub use source::{MockSource, RecordSource};
pub use sync::{CanvasSync, PlacementReceipt, RefreshOutcome};
pub use wallet::{
    MockWallet, ReadOnlyWallet, TransactionId, TransferLeg, TransferRequest, Wallet,
};

#[cfg(feature = "mirror")]
mod mirror;
#[cfg(feature = "mirror")]
pub use mirror::MirrorNodeSource;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{CanvasSync, PlacementReceipt, RefreshOutcome};
    pub use crate::{LedgerConfig, LedgerError, LedgerResult};
    pub use crate::{MockSource, MockWallet, ReadOnlyWallet, RecordSource, Wallet};
    pub use crate::{TransactionId, TransferRequest};
    pub use hashcanvas_core::prelude::{
        CanvasConfig, CanvasState, CellKey, ConsensusTimestamp, DecodedRecord, LedgerRecord,
        MemoCodec, PixelPlacement, ReconcileReport, Reconciler,
    };

    #[cfg(feature = "mirror")]
    pub use crate::MirrorNodeSource;
}
