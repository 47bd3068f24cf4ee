//! Memo wire format.
//!
//! A pixel memo is `<TAG>:<payload>` where the payload is compact JSON
//! `{"x":<int>,"y":<int>,"c":"<color>"}`. The tag never contains the
//! separator, so `TAG:` is an unambiguous prefix among unrelated memos on
//! the same ledger.

use crate::config::CanvasConfig;
use crate::error::{CanvasError, MemoError, Result};
use crate::types::{is_hex_color, DecodedPixel, PixelPlacement};
use serde::{Deserialize, Serialize};

/// Separator between the tag and the JSON payload.
pub const MEMO_SEPARATOR: char = ':';

#[derive(Serialize)]
struct OutgoingPayload<'a> {
    x: u32,
    y: u32,
    c: &'a str,
}

// Signed so that negative coordinates are reported as out of range rather
// than as a type error.
#[derive(Deserialize)]
struct IncomingPayload {
    x: i64,
    y: i64,
    c: String,
}

/// Encoder and decoder for pixel memos.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoCodec {
    prefix: String,
    canvas_size: u32,
}

impl MemoCodec {
    /// Create a codec for `tag` on a canvas of side `canvas_size`.
    pub fn new(tag: &str, canvas_size: u32) -> Result<Self> {
        let config = CanvasConfig::default()
            .with_memo_tag(tag)
            .with_size(canvas_size);
        Self::from_config(&config)
    }

    pub fn from_config(config: &CanvasConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            prefix: format!("{}{}", config.memo_tag, MEMO_SEPARATOR),
            canvas_size: config.size,
        })
    }

    pub fn tag(&self) -> &str {
        &self.prefix[..self.prefix.len() - MEMO_SEPARATOR.len_utf8()]
    }

    pub fn canvas_size(&self) -> u32 {
        self.canvas_size
    }

    /// Build the memo for a placement.
    ///
    /// The UI is expected to validate selections first; a bad placement here
    /// is a caller bug and is reported as [`CanvasError::InvalidPlacement`].
    pub fn encode(&self, placement: &PixelPlacement) -> Result<String> {
        if !placement.cell().in_bounds(self.canvas_size) {
            return Err(CanvasError::invalid_placement(format!(
                "({}, {}) is outside a {}x{} canvas",
                placement.x, placement.y, self.canvas_size, self.canvas_size
            )));
        }
        if !is_hex_color(&placement.color) {
            return Err(CanvasError::invalid_placement(format!(
                "color {:?} is not #RRGGBB",
                placement.color
            )));
        }

        let payload = serde_json::to_string(&OutgoingPayload {
            x: placement.x,
            y: placement.y,
            c: &placement.color,
        })
        .map_err(|e| CanvasError::invalid_placement(e.to_string()))?;

        Ok(format!("{}{}", self.prefix, payload))
    }

    /// Recover a pixel from a memo.
    ///
    /// Foreign and empty memos give [`MemoError::NotOurMemo`]; tagged memos
    /// with a bad payload give [`MemoError::Malformed`]. The color is passed
    /// through as written.
    pub fn decode(&self, raw: Option<&str>) -> std::result::Result<DecodedPixel, MemoError> {
        let body = raw
            .and_then(|memo| memo.strip_prefix(self.prefix.as_str()))
            .ok_or(MemoError::NotOurMemo)?;

        let value: serde_json::Value =
            serde_json::from_str(body).map_err(|e| MemoError::Malformed(e.to_string()))?;
        // serde would happily read `[x, y, c]` into the struct as well.
        if !value.is_object() {
            return Err(MemoError::Malformed("payload is not a JSON object".into()));
        }
        let payload: IncomingPayload =
            serde_json::from_value(value).map_err(|e| MemoError::Malformed(e.to_string()))?;

        let x = self.coordinate("x", payload.x)?;
        let y = self.coordinate("y", payload.y)?;

        Ok(DecodedPixel {
            x,
            y,
            color: payload.c,
        })
    }

    fn coordinate(&self, name: &str, value: i64) -> std::result::Result<u32, MemoError> {
        if value < 0 || value >= i64::from(self.canvas_size) {
            return Err(MemoError::Malformed(format!(
                "{} = {} is outside [0, {})",
                name, value, self.canvas_size
            )));
        }
        Ok(value as u32)
    }
}

impl Default for MemoCodec {
    fn default() -> Self {
        let config = CanvasConfig::default();
        Self {
            prefix: format!("{}{}", config.memo_tag, MEMO_SEPARATOR),
            canvas_size: config.size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codec() -> MemoCodec {
        MemoCodec::default()
    }

    #[test]
    fn test_encode_wire_format() {
        let memo = codec()
            .encode(&PixelPlacement::new(3, 17, "#FF0000"))
            .unwrap();
        assert_eq!(memo, r##"HEDERA_PLACE_PIXEL:{"x":3,"y":17,"c":"#FF0000"}"##);
    }

    #[test]
    fn test_round_trip() {
        let codec = codec();
        for placement in [
            PixelPlacement::new(0, 0, "#000000"),
            PixelPlacement::new(49, 49, "#ffffff"),
            PixelPlacement::new(10, 2, "#8000Ff"),
        ] {
            let memo = codec.encode(&placement).unwrap();
            let decoded = codec.decode(Some(&memo)).unwrap();
            assert_eq!(decoded.x, placement.x);
            assert_eq!(decoded.y, placement.y);
            assert_eq!(decoded.color, placement.color);
        }
    }

    #[test]
    fn test_encode_rejects_invalid_placement() {
        let codec = codec();
        assert!(matches!(
            codec.encode(&PixelPlacement::new(50, 0, "#FF0000")),
            Err(CanvasError::InvalidPlacement(_))
        ));
        assert!(matches!(
            codec.encode(&PixelPlacement::new(0, 0, "red")),
            Err(CanvasError::InvalidPlacement(_))
        ));
    }

    #[test]
    fn test_foreign_memos_are_not_ours() {
        let codec = codec();
        for memo in [
            None,
            Some(""),
            Some("unrelated"),
            Some("HEDERA_PLACE_PIXEL"),
            Some("HEDERA_PLACE_PIXEL {\"x\":1}"),
            Some("hedera_place_pixel:{\"x\":1,\"y\":1,\"c\":\"#FF0000\"}"),
            Some(" HEDERA_PLACE_PIXEL:{}"),
        ] {
            assert_eq!(codec.decode(memo), Err(MemoError::NotOurMemo), "{memo:?}");
        }
    }

    #[test]
    fn test_malformed_payloads() {
        let codec = codec();
        for body in [
            "not json",
            r##"{"x":-1,"y":0,"c":"red"}"##,
            r##"{"x":0,"y":50,"c":"#FF0000"}"##,
            r##"{"x":1.5,"y":0,"c":"#FF0000"}"##,
            r##"{"x":"1","y":0,"c":"#FF0000"}"##,
            r##"{"x":1,"y":0}"##,
            r##"{"x":1,"y":0,"c":7}"##,
            r##"[1,2,"#FF0000"]"##,
            "",
        ] {
            let memo = format!("HEDERA_PLACE_PIXEL:{}", body);
            assert!(
                matches!(codec.decode(Some(&memo)), Err(MemoError::Malformed(_))),
                "{memo}"
            );
        }
    }

    #[test]
    fn test_decode_passes_color_through() {
        let decoded = codec()
            .decode(Some(r#"HEDERA_PLACE_PIXEL:{"x":1,"y":2,"c":"not-a-color","extra":true}"#))
            .unwrap();
        assert_eq!(decoded.color, "not-a-color");
        assert_eq!(decoded.cell().to_string(), "1,2");
    }

    #[test]
    fn test_custom_tag_and_size() {
        let codec = MemoCodec::new("PX", 4).unwrap();
        assert_eq!(codec.tag(), "PX");
        let memo = codec.encode(&PixelPlacement::new(3, 3, "#ABCDEF")).unwrap();
        assert!(memo.starts_with("PX:"));
        assert!(codec.encode(&PixelPlacement::new(4, 0, "#ABCDEF")).is_err());
        assert!(MemoCodec::new("P:X", 4).is_err());
    }
}
