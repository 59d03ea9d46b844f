use std::sync::Arc;
use std::time::Duration;

use rust_decimal::Decimal;
use tokio::sync::broadcast;

use trustbridge::api::router::create_router;
use trustbridge::api::ws_types::WsMessage;
use trustbridge::config::AppConfig;
use trustbridge::models::Position;
use trustbridge::notifications::NotificationHub;
use trustbridge::positions::{MockPositionSource, PositionSource};
use trustbridge::AppState;

/// The two-asset snapshot used throughout the dashboard scenarios.
#[allow(dead_code)]
pub fn sample_positions() -> Vec<Position> {
    vec![
        Position {
            asset: "USDC_CONTRACT".into(),
            symbol: "USDC".into(),
            supplied: Decimal::from(100_000),
            borrowed: Decimal::ZERO,
            collateral: false,
            apy: Decimal::new(45, 1),
            usd_value: Decimal::from(100_000),
        },
        Position {
            asset: "XLM_CONTRACT".into(),
            symbol: "XLM".into(),
            supplied: Decimal::from(50_000),
            borrowed: Decimal::from(25_000),
            collateral: true,
            apy: Decimal::new(32, 1),
            usd_value: Decimal::from(6_000),
        },
    ]
}

/// Build a router around `source` with a test configuration.
#[allow(dead_code)]
pub fn build_app_with(
    source: impl PositionSource + 'static,
    config: AppConfig,
) -> (axum::Router, broadcast::Sender<WsMessage>) {
    let (ws_tx, _) = broadcast::channel::<WsMessage>(16);
    let notifications = NotificationHub::new(
        ws_tx.clone(),
        config.notification_buffer,
        config.notify_rate_limit,
        Duration::from_secs(config.notify_rate_window_secs),
    );

    let state = AppState {
        config,
        positions: Arc::new(source),
        position_source_kind: "mock",
        notifications,
        ws_tx: ws_tx.clone(),
        metrics_handle: trustbridge::metrics::detached_handle(),
    };

    (create_router(state), ws_tx)
}

#[allow(dead_code)]
pub fn build_test_app() -> axum::Router {
    build_app_with(
        MockPositionSource::with_positions(sample_positions()),
        AppConfig::default(),
    )
    .0
}
