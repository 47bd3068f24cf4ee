//! Shared value types used by the codec, the reconciler and the view.

use crate::error::{CanvasError, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Owner recorded when a ledger record carries no transfer metadata.
pub const UNKNOWN_OWNER: &str = "unknown";

const NANOS_PER_SEC: u32 = 1_000_000_000;

/// Address of one cell on the canvas.
///
/// The canonical string form is `"x,y"`. The comma is always present so
/// `(1, 11)` and `(11, 1)` never collide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellKey {
    pub x: u32,
    pub y: u32,
}

impl CellKey {
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Whether both coordinates fall inside a canvas of side `size`.
    pub fn in_bounds(&self, size: u32) -> bool {
        self.x < size && self.y < size
    }
}

impl fmt::Display for CellKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

impl FromStr for CellKey {
    type Err = CanvasError;

    fn from_str(s: &str) -> Result<Self> {
        let (x, y) = s
            .split_once(',')
            .ok_or_else(|| CanvasError::InvalidCellKey(s.to_string()))?;
        let parse = |part: &str| {
            part.parse::<u32>()
                .map_err(|_| CanvasError::InvalidCellKey(s.to_string()))
        };
        Ok(Self::new(parse(x)?, parse(y)?))
    }
}

impl Serialize for CellKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CellKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Ledger consensus time, used as the ordering key between records.
///
/// Hedera reports it as `"<seconds>.<nanoseconds>"`. Ordering is by seconds
/// then nanoseconds, so it is finer than wall-clock seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct ConsensusTimestamp {
    seconds: u64,
    nanos: u32,
}

impl ConsensusTimestamp {
    /// Build from parts. Nanoseconds beyond one second carry into `seconds`.
    pub fn new(seconds: u64, nanos: u32) -> Self {
        Self {
            seconds: seconds + u64::from(nanos / NANOS_PER_SEC),
            nanos: nanos % NANOS_PER_SEC,
        }
    }

    pub fn seconds(&self) -> u64 {
        self.seconds
    }

    pub fn nanos(&self) -> u32 {
        self.nanos
    }

    /// Read the local wall clock in the ledger's representation.
    pub fn now() -> Self {
        Self::from_system_time(SystemTime::now())
    }

    pub fn from_system_time(time: SystemTime) -> Self {
        let since_epoch = time.duration_since(UNIX_EPOCH).unwrap_or_default();
        Self::new(since_epoch.as_secs(), since_epoch.subsec_nanos())
    }

    /// The smallest timestamp strictly greater than this one.
    pub fn next(&self) -> Self {
        self.saturating_add(Duration::from_nanos(1))
    }

    pub fn saturating_add(&self, duration: Duration) -> Self {
        let nanos = self.nanos + duration.subsec_nanos();
        let seconds = self
            .seconds
            .saturating_add(duration.as_secs())
            .saturating_add(u64::from(nanos / NANOS_PER_SEC));
        Self {
            seconds,
            nanos: nanos % NANOS_PER_SEC,
        }
    }
}

impl fmt::Display for ConsensusTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:09}", self.seconds, self.nanos)
    }
}

impl FromStr for ConsensusTimestamp {
    type Err = CanvasError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || CanvasError::InvalidTimestamp(s.to_string());
        let (whole, fraction) = match s.split_once('.') {
            Some((whole, fraction)) => (whole, fraction),
            None => (s, ""),
        };

        if whole.is_empty() || !whole.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        if fraction.len() > 9 || !fraction.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        let seconds = whole.parse::<u64>().map_err(|_| invalid())?;
        // "1.5" means half a second: right-pad the fraction to nine digits.
        let nanos = if fraction.is_empty() {
            0
        } else {
            let padded = format!("{:0<9}", fraction);
            padded.parse::<u32>().map_err(|_| invalid())?
        };

        Ok(Self { seconds, nanos })
    }
}

impl Serialize for ConsensusTimestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ConsensusTimestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// A pixel the user wants to place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelPlacement {
    pub x: u32,
    pub y: u32,
    /// `#RRGGBB`, case-insensitive.
    pub color: String,
}

impl PixelPlacement {
    pub fn new(x: u32, y: u32, color: impl Into<String>) -> Self {
        Self {
            x,
            y,
            color: color.into(),
        }
    }

    pub fn cell(&self) -> CellKey {
        CellKey::new(self.x, self.y)
    }
}

/// The pixel fields recovered from a memo, before ledger metadata is attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodedPixel {
    pub x: u32,
    pub y: u32,
    /// Not re-validated; renderers must tolerate odd values.
    pub color: String,
}

impl DecodedPixel {
    pub fn cell(&self) -> CellKey {
        CellKey::new(self.x, self.y)
    }
}

/// A pixel attributed to a ledger record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodedRecord {
    pub x: u32,
    pub y: u32,
    pub color: String,
    pub ordering_key: ConsensusTimestamp,
    pub owner: String,
}

impl DecodedRecord {
    pub fn from_pixel(
        pixel: DecodedPixel,
        ordering_key: ConsensusTimestamp,
        owner: Option<&str>,
    ) -> Self {
        Self {
            x: pixel.x,
            y: pixel.y,
            color: pixel.color,
            ordering_key,
            owner: owner.unwrap_or(UNKNOWN_OWNER).to_string(),
        }
    }

    pub fn cell(&self) -> CellKey {
        CellKey::new(self.x, self.y)
    }
}

/// One transaction as handed to the reconciler.
///
/// The memo has already been decoded from the ledger's transport encoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerRecord {
    pub memo: Option<String>,
    pub ordering_key: ConsensusTimestamp,
    pub transfer_origin: Option<String>,
}

impl LedgerRecord {
    pub fn new(memo: Option<String>, ordering_key: ConsensusTimestamp) -> Self {
        Self {
            memo,
            ordering_key,
            transfer_origin: None,
        }
    }

    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.transfer_origin = Some(origin.into());
        self
    }
}

/// Whether `color` is `#` followed by six hex digits.
pub fn is_hex_color(color: &str) -> bool {
    match color.strip_prefix('#') {
        Some(digits) => digits.len() == 6 && digits.bytes().all(|b| b.is_ascii_hexdigit()),
        None => false,
    }
}
