//! Keep the canvas on screen, refreshing on an interval.

use anyhow::Result;
use colored::Colorize;
use hashcanvas_ledger::{CanvasSync, MirrorNodeSource, ReadOnlyWallet, RefreshOutcome};
use std::time::Duration;
use tracing::debug;

use crate::commands::show::print_canvas;
use crate::config::Config;

pub async fn run(config: &Config, interval_secs: u64) -> Result<()> {
    let source = MirrorNodeSource::new(&config.ledger)?;
    let sync = CanvasSync::new(
        source,
        ReadOnlyWallet,
        &config.canvas,
        config.ledger.clone(),
    )?;

    // Never poll faster than the cooldown allows.
    let interval = Duration::from_secs(interval_secs).max(config.ledger.fetch_cooldown());

    println!(
        "{} Watching {} every {}s (Ctrl-C to stop)",
        "→".blue(),
        config.ledger.canvas_account_id.cyan(),
        interval.as_secs_f32()
    );

    loop {
        match sync.refresh().await {
            Ok(RefreshOutcome::Updated(report)) => {
                let state = sync.snapshot().await;
                println!();
                print_canvas(&state, &report, config.canvas.size);
            }
            Ok(outcome) => debug!("Refresh skipped: {:?}", outcome),
            Err(e) => {
                eprintln!("{} Fetch failed: {} (retrying)", "✗".red(), e);
            }
        }

        tokio::select! {
            _ = tokio::time::sleep(interval) => {}
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    println!("{} Stopped", "•".yellow());
    Ok(())
}
