pub mod api;
pub mod config;
pub mod dashboard;
pub mod errors;
pub mod metrics;
pub mod models;
pub mod notifications;
pub mod positions;
pub mod services;

use std::sync::Arc;
use tokio::sync::broadcast;

use crate::api::ws_types::WsMessage;
use crate::config::AppConfig;
use crate::notifications::NotificationHub;
use crate::positions::PositionSource;

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub positions: Arc<dyn PositionSource>,
    /// `"mock"` or `"http"`, reported by the health check.
    pub position_source_kind: &'static str,
    pub notifications: NotificationHub,
    pub ws_tx: broadcast::Sender<WsMessage>,
    pub metrics_handle: metrics_exporter_prometheus::PrometheusHandle,
}
