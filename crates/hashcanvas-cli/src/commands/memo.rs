//! Encode and decode pixel memos by hand.

use anyhow::{Context, Result};
use colored::Colorize;
use hashcanvas_core::error::MemoError;
use hashcanvas_core::memo::MemoCodec;
use hashcanvas_core::types::PixelPlacement;

use crate::config::Config;

pub fn encode(config: &Config, x: u32, y: u32, color: &str, as_base64: bool) -> Result<()> {
    let codec = MemoCodec::from_config(&config.canvas)?;
    let memo = codec.encode(&PixelPlacement::new(x, y, color))?;

    if as_base64 {
        println!("{}", base64::encode(memo.as_bytes()));
    } else {
        println!("{}", memo);
    }
    Ok(())
}

pub fn decode(config: &Config, memo: &str, as_base64: bool) -> Result<()> {
    let codec = MemoCodec::from_config(&config.canvas)?;
    let text = if as_base64 {
        let bytes = base64::decode(memo.trim()).context("Memo is not valid base64")?;
        String::from_utf8(bytes).context("Memo is not UTF-8 text")?
    } else {
        memo.to_string()
    };

    match codec.decode(Some(&text)) {
        Ok(pixel) => {
            println!(
                "{} Pixel ({}, {}) color {}",
                "✓".green(),
                pixel.x,
                pixel.y,
                pixel.color.cyan()
            );
        }
        Err(MemoError::NotOurMemo) => {
            println!("{} Not a {} memo", "•".yellow(), codec.tag());
        }
        Err(MemoError::Malformed(reason)) => {
            println!("{} Malformed memo: {}", "✗".red(), reason);
        }
    }
    Ok(())
}
