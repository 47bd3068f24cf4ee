//! Session-level tests for `CanvasSync`: cooldown, single in-flight fetch,
//! failure isolation and optimistic placements.
//!
//! Time is paused so cooldowns and timeouts run instantly.

use hashcanvas_ledger::prelude::*;
use std::time::Duration;

const PLAYER: &str = "0.0.4242";

/// Helper: a record carrying an encoded placement.
fn placed(x: u32, y: u32, color: &str, seconds: u64) -> LedgerRecord {
    let memo = MemoCodec::default()
        .encode(&PixelPlacement::new(x, y, color))
        .expect("valid placement");
    LedgerRecord::new(Some(memo), ConsensusTimestamp::new(seconds, 0)).with_origin("0.0.500")
}

/// Helper: a sync over the given source with no cooldown.
fn sync_over<W: Wallet>(source: MockSource, wallet: W) -> CanvasSync<MockSource, W> {
    let ledger = LedgerConfig::default().with_cooldown(Duration::ZERO);
    CanvasSync::new(source, wallet, &CanvasConfig::default(), ledger).unwrap()
}

fn updated(outcome: RefreshOutcome) -> ReconcileReport {
    match outcome {
        RefreshOutcome::Updated(report) => report,
        other => panic!("expected Updated, got {:?}", other),
    }
}

#[tokio::test(start_paused = true)]
async fn test_refresh_reconciles_batch() {
    let source = MockSource::new(vec![
        placed(1, 1, "#FF0000", 100),
        LedgerRecord::new(Some("unrelated".into()), ConsensusTimestamp::new(200, 0)),
        placed(1, 1, "#00FF00", 150),
    ]);
    let sync = sync_over(source, MockWallet::connected(PLAYER));

    let report = updated(sync.refresh().await.unwrap());
    assert_eq!(report.seen, 3);
    assert_eq!(report.foreign, 1);

    let state = sync.snapshot().await;
    assert_eq!(state.len(), 1);
    let cell = state.get(&CellKey::new(1, 1)).unwrap();
    assert_eq!(cell.color, "#00FF00");
    assert_eq!(cell.owner, "0.0.500");
}

#[tokio::test(start_paused = true)]
async fn test_refresh_is_throttled_within_cooldown() {
    let ledger = LedgerConfig::default().with_cooldown(Duration::from_millis(2000));
    let sync = CanvasSync::new(
        MockSource::default(),
        MockWallet::connected(PLAYER),
        &CanvasConfig::default(),
        ledger,
    )
    .unwrap();

    updated(sync.refresh().await.unwrap());

    tokio::time::advance(Duration::from_millis(500)).await;
    match sync.refresh().await.unwrap() {
        RefreshOutcome::Throttled { retry_after } => {
            assert_eq!(retry_after, Duration::from_millis(1500))
        }
        other => panic!("expected Throttled, got {:?}", other),
    }
    assert_eq!(sync.source().calls(), 1);

    tokio::time::advance(Duration::from_millis(1500)).await;
    updated(sync.refresh().await.unwrap());
    assert_eq!(sync.source().calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_overlapping_refresh_is_dropped() {
    let source = MockSource::new(vec![placed(0, 0, "#123456", 10)])
        .with_delay(Duration::from_secs(1));
    let sync = sync_over(source, MockWallet::connected(PLAYER));

    let (first, second) = tokio::join!(sync.refresh(), sync.refresh());
    updated(first.unwrap());
    assert_eq!(second.unwrap(), RefreshOutcome::InFlight);
    assert_eq!(sync.source().calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_failed_fetch_leaves_state_untouched() {
    let sync = sync_over(
        MockSource::new(vec![placed(2, 3, "#ABCDEF", 10)]),
        MockWallet::connected(PLAYER),
    );
    updated(sync.refresh().await.unwrap());
    let before = sync.authoritative().await;

    sync.source().set_failure(Some("502 Bad Gateway")).await;
    let err = sync.refresh().await.unwrap_err();
    assert!(err.is_fetch_failure());
    assert_eq!(sync.authoritative().await, before);
}

#[tokio::test(start_paused = true)]
async fn test_timed_out_fetch_leaves_state_untouched() {
    let source = MockSource::new(vec![placed(2, 3, "#ABCDEF", 10)])
        .with_delay(Duration::from_secs(60));
    let ledger = LedgerConfig::default()
        .with_cooldown(Duration::ZERO)
        .with_timeout(5);
    let sync = CanvasSync::new(source, MockWallet::connected(PLAYER), &CanvasConfig::default(), ledger)
        .unwrap();

    let err = sync.refresh().await.unwrap_err();
    assert!(matches!(err, LedgerError::Timeout(5)));
    assert!(sync.snapshot().await.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_place_pixel_is_optimistic_then_confirmed() {
    let sync = sync_over(
        MockSource::new(vec![placed(0, 0, "#000000", 100)]),
        MockWallet::connected(PLAYER),
    );
    updated(sync.refresh().await.unwrap());

    let receipt = sync
        .place_pixel(&PixelPlacement::new(3, 4, "#112233"))
        .await
        .unwrap();
    assert!(receipt.memo.starts_with("HEDERA_PLACE_PIXEL:"));

    let shown = sync.cell(&CellKey::new(3, 4)).await.unwrap();
    assert_eq!(shown.color, "#112233");
    assert_eq!(shown.owner, PLAYER);
    assert_eq!(sync.pending_len().await, 1);

    let submitted = sync.wallet().submitted().await;
    assert_eq!(submitted.len(), 1);
    assert!(submitted[0].is_balanced());
    assert_eq!(submitted[0].legs[1].account_id, "0.0.12345");
    assert_eq!(submitted[0].memo, receipt.memo);

    // The ledger confirms a different, newer placement for the same cell.
    sync.source()
        .set_records(vec![
            placed(0, 0, "#000000", 100),
            placed(3, 4, "#998877", 200),
        ])
        .await;
    updated(sync.refresh().await.unwrap());

    assert_eq!(sync.cell(&CellKey::new(3, 4)).await.unwrap().color, "#998877");
    assert_eq!(sync.pending_len().await, 0);
}

#[tokio::test(start_paused = true)]
async fn test_place_pixel_requires_wallet() {
    let sync = sync_over(MockSource::default(), ReadOnlyWallet);
    let err = sync
        .place_pixel(&PixelPlacement::new(1, 1, "#FFFFFF"))
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::WalletNotConnected));
    assert_eq!(sync.pending_len().await, 0);
}

#[tokio::test(start_paused = true)]
async fn test_failed_submit_keeps_entry_until_rollback() {
    let sync = sync_over(
        MockSource::default(),
        MockWallet::connected(PLAYER).failing("INSUFFICIENT_PAYER_BALANCE"),
    );
    let placement = PixelPlacement::new(8, 8, "#FF00FF");

    let err = sync.place_pixel(&placement).await.unwrap_err();
    assert!(matches!(err, LedgerError::SubmitFailed(_)));
    assert_eq!(sync.cell(&placement.cell()).await.unwrap().color, "#FF00FF");

    assert!(sync.rollback(&placement.cell()).await.is_some());
    assert!(sync.cell(&placement.cell()).await.is_none());
}

#[tokio::test(start_paused = true)]
async fn test_invalid_placement_is_rejected_before_submit() {
    let sync = sync_over(MockSource::default(), MockWallet::connected(PLAYER));
    let err = sync
        .place_pixel(&PixelPlacement::new(50, 0, "#FFFFFF"))
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::Canvas(_)));
    assert!(sync.wallet().submitted().await.is_empty());
}
