use std::collections::HashMap;
use std::sync::Arc;

use rust_decimal::Decimal;
use tokio::sync::broadcast;
use tokio::time::{interval, Duration};

use crate::api::ws_types::{DashboardUpdate, WsMessage};
use crate::dashboard::{fetch_dashboard_data, DashboardMetrics, DashboardView};
use crate::positions::PositionSource;

/// Periodically re-assemble dashboard data for watched wallets and push the
/// formatted view, with changes since the previous tick, to WebSocket
/// clients.
pub async fn run_dashboard_refresher(
    source: Arc<dyn PositionSource>,
    wallets: Vec<String>,
    haircut: Decimal,
    ws_tx: broadcast::Sender<WsMessage>,
    interval_secs: u64,
) {
    let mut ticker = interval(Duration::from_secs(interval_secs));
    let mut previous: HashMap<String, DashboardMetrics> = HashMap::new();

    loop {
        ticker.tick().await;

        if ws_tx.receiver_count() == 0 {
            tracing::debug!("Dashboard refresher: no WebSocket clients");
            continue;
        }

        for wallet in &wallets {
            if let Some(update) = refresh_wallet(source.as_ref(), wallet, haircut, &mut previous).await {
                let _ = ws_tx.send(WsMessage::DashboardUpdate(update));
            }
        }
    }
}

async fn refresh_wallet(
    source: &dyn PositionSource,
    wallet: &str,
    haircut: Decimal,
    previous: &mut HashMap<String, DashboardMetrics>,
) -> Option<DashboardUpdate> {
    // fetch_dashboard_data logs the cause
    let data = fetch_dashboard_data(source, wallet, haircut).await.ok()?;

    let view = DashboardView::from_data(&data, previous.get(wallet));
    previous.insert(wallet.to_string(), data.metrics);

    Some(DashboardUpdate {
        wallet: wallet.to_string(),
        view,
    })
}
