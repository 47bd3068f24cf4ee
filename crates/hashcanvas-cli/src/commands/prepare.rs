//! Print the unsigned transfer a wallet must sign to place a pixel.

use anyhow::Result;
use hashcanvas_core::memo::MemoCodec;
use hashcanvas_core::types::PixelPlacement;
use hashcanvas_ledger::TransferRequest;

use crate::config::Config;

pub fn run(config: &Config, payer: &str, x: u32, y: u32, color: &str) -> Result<()> {
    let request = build(config, payer, &PixelPlacement::new(x, y, color))?;
    println!("{}", serde_json::to_string_pretty(&request)?);
    Ok(())
}

fn build(config: &Config, payer: &str, placement: &PixelPlacement) -> Result<TransferRequest> {
    let codec = MemoCodec::from_config(&config.canvas)?;
    let memo = codec.encode(placement)?;
    Ok(TransferRequest::placement(
        payer,
        &config.ledger.canvas_account_id,
        config.ledger.fee_tinybars,
        memo,
    ))
}
