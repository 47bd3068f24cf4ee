//! Fetch (or load) ledger history and print the reconciled canvas.

use anyhow::{Context, Result};
use colored::Colorize;
use hashcanvas_core::memo::MemoCodec;
use hashcanvas_core::reconcile::{CanvasState, ReconcileReport, Reconciler};
use hashcanvas_core::types::LedgerRecord;
use hashcanvas_ledger::wire::parse_page;
use hashcanvas_ledger::{MirrorNodeSource, RecordSource};
use std::path::Path;

use crate::config::Config;
use crate::render::render_grid;

pub async fn run(config: &Config, from_file: Option<&Path>, json: bool) -> Result<()> {
    let records = match from_file {
        Some(path) => load_page(path)?,
        None => fetch(config).await?,
    };

    let reconciler = Reconciler::new(MemoCodec::from_config(&config.canvas)?);
    let (state, report) = reconciler.reconcile_with_report(&records);

    if json {
        println!("{}", serde_json::to_string_pretty(&state)?);
    } else {
        print_canvas(&state, &report, config.canvas.size);
    }
    Ok(())
}

/// Read a saved `/api/v1/transactions` response body.
fn load_page(path: &Path) -> Result<Vec<LedgerRecord>> {
    let body = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let page = parse_page(&body)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    Ok(page.records())
}

async fn fetch(config: &Config) -> Result<Vec<LedgerRecord>> {
    let source = MirrorNodeSource::new(&config.ledger)?;
    let account = &config.ledger.canvas_account_id;
    let timeout = config.ledger.fetch_timeout();

    let records = tokio::time::timeout(timeout, source.fetch_records(account))
        .await
        .with_context(|| format!("Fetch timed out after {}s", timeout.as_secs()))?
        .context("Could not load canvas data from mirror node")?;
    Ok(records)
}

pub fn print_canvas(state: &CanvasState, report: &ReconcileReport, size: u32) {
    print!("{}", render_grid(state, size));
    println!();
    println!(
        "{} {} pixels from {} transactions ({} foreign, {} malformed)",
        "✓".green(),
        state.len().to_string().cyan(),
        report.seen,
        report.foreign,
        report.malformed
    );
}
