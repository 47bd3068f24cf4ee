//! Terminal rendering of canvas state.

use colored::Colorize;
use hashcanvas_core::reconcile::CanvasState;
use hashcanvas_core::types::{is_hex_color, CellKey};

/// Shown for cells whose recorded color cannot be parsed.
const FALLBACK_RGB: (u8, u8, u8) = (128, 128, 128);

/// Parse `#RRGGBB` (case-insensitive) into RGB.
pub fn parse_hex(color: &str) -> Option<(u8, u8, u8)> {
    if !is_hex_color(color) {
        return None;
    }
    let digits = &color[1..];
    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}

/// Draw the canvas as rows of two-character cells, top row first.
pub fn render_grid(state: &CanvasState, size: u32) -> String {
    let mut out = String::new();
    for y in 0..size {
        for x in 0..size {
            match state.get(&CellKey::new(x, y)) {
                Some(record) => {
                    let (r, g, b) = parse_hex(&record.color).unwrap_or(FALLBACK_RGB);
                    out.push_str(&"██".truecolor(r, g, b).to_string());
                }
                None => out.push_str(&"· ".dimmed().to_string()),
            }
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use hashcanvas_core::memo::MemoCodec;
    use hashcanvas_core::reconcile::Reconciler;
    use hashcanvas_core::types::{ConsensusTimestamp, LedgerRecord, PixelPlacement};

    #[test]
    fn test_parse_hex() {
        assert_eq!(parse_hex("#FF8000"), Some((255, 128, 0)));
        assert_eq!(parse_hex("#ff8000"), Some((255, 128, 0)));
        assert_eq!(parse_hex("FF8000"), None);
        assert_eq!(parse_hex("#GG0000"), None);
        assert_eq!(parse_hex("#é0000"), None);
        assert_eq!(parse_hex("#+F+F+F"), None);
    }

    #[test]
    fn test_render_grid_layout() {
        colored::control::set_override(false);

        let codec = MemoCodec::new("PX", 3).unwrap();
        let memo = codec.encode(&PixelPlacement::new(2, 0, "#FF0000")).unwrap();
        let odd = r#"PX:{"x":0,"y":2,"c":"blue"}"#.to_string();
        let state = Reconciler::new(codec).reconcile(&[
            LedgerRecord::new(Some(memo), ConsensusTimestamp::new(1, 0)),
            LedgerRecord::new(Some(odd), ConsensusTimestamp::new(2, 0)),
        ]);

        let grid = render_grid(&state, 3);
        let rows: Vec<&str> = grid.lines().collect();
        assert_eq!(rows, vec!["· · ██", "· · · ", "██· · "]);
    }
}
