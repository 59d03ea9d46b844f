use std::sync::Arc;

use tokio::sync::broadcast;

use trustbridge::api::router::create_router;
use trustbridge::api::ws_types::WsMessage;
use trustbridge::config::AppConfig;
use trustbridge::notifications::{run_relay_client, NotificationHub};
use trustbridge::positions::{HttpPositionSource, MockPositionSource, PositionSource};
use trustbridge::services::dashboard_refresher::run_dashboard_refresher;
use trustbridge::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    // tokio-tungstenite needs a process-wide rustls provider for wss://
    let _ = rustls::crypto::ring::default_provider().install_default();

    let config = AppConfig::from_env()?;
    let addr = format!("{}:{}", config.host, config.port);
    let metrics_handle = trustbridge::metrics::init_metrics()?;
    let http = reqwest::Client::new();

    // --- Position source ---
    let (positions, position_source_kind): (Arc<dyn PositionSource>, &'static str) =
        match &config.position_source_url {
            Some(url) => {
                tracing::info!(url = %url, "Using HTTP position source");
                let source = HttpPositionSource::new(http.clone(), url.clone());
                (Arc::new(source) as Arc<dyn PositionSource>, "http")
            }
            None => {
                tracing::warn!("POSITION_SOURCE_URL not set; serving mock positions");
                (Arc::new(MockPositionSource::new()) as Arc<dyn PositionSource>, "mock")
            }
        };

    // --- WebSocket broadcast channel + notification hub ---
    let (ws_tx, _) = broadcast::channel::<WsMessage>(256);
    let notifications = NotificationHub::new(
        ws_tx.clone(),
        config.notification_buffer,
        config.notify_rate_limit,
        config.notify_rate_window(),
    );

    match config.relay_config() {
        Some(relay) => {
            tracing::info!(
                ws_candidates = relay.ws_urls.len(),
                polling = relay.poll_url.is_some(),
                "Starting notification relay"
            );
            let hub = notifications.clone();
            let relay_http = http.clone();
            tokio::spawn(async move {
                run_relay_client(relay, hub, relay_http).await;
            });
        }
        None => tracing::info!("No upstream notification feed configured"),
    }

    // --- Dashboard refresher ---
    if config.watched_wallets.is_empty() {
        tracing::info!("WATCHED_WALLETS is empty; dashboard refresher disabled");
    } else {
        tracing::info!(
            wallets = config.watched_wallets.len(),
            interval_secs = config.dashboard_refresh_secs,
            "Dashboard refresher spawned"
        );
        tokio::spawn(run_dashboard_refresher(
            positions.clone(),
            config.watched_wallets.clone(),
            config.borrow_haircut,
            ws_tx.clone(),
            config.dashboard_refresh_secs,
        ));
    }

    let state = AppState {
        config,
        positions,
        position_source_kind,
        notifications,
        ws_tx,
        metrics_handle,
    };
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {addr}");
    axum::serve(listener, router).await?;

    Ok(())
}

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer())
        .init();
}
