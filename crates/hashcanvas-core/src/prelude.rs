//! HashCanvas Core Prelude: convenient imports for common usage.
//!
//! ```rust
//! use hashcanvas_core::prelude::*;
//! ```

pub use crate::types::{
    CellKey, ConsensusTimestamp,
    PixelPlacement, DecodedPixel, DecodedRecord,
    LedgerRecord,
    UNKNOWN_OWNER,
};

pub use crate::config::CanvasConfig;
pub use crate::memo::{MemoCodec, MEMO_SEPARATOR};
pub use crate::reconcile::{reconcile, CanvasState, ReconcileReport, Reconciler};
pub use crate::view::{CanvasView, PendingPlacement};

// Re-export error types
pub use crate::error::{CanvasError, MemoError, Result};
