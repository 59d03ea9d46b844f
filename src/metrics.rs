use metrics::{counter, gauge};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Install the Prometheus recorder and pre-register the service metrics so
/// they show up in the first scrape.
pub fn init_metrics() -> anyhow::Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new().install_recorder()?;

    counter!("dashboard_requests_total").absolute(0);
    counter!("position_fetch_failures_total").absolute(0);
    counter!("notifications_published_total").absolute(0);
    counter!("notifications_rate_limited_total").absolute(0);
    gauge!("ws_clients_connected").set(0.0);

    Ok(handle)
}

/// A handle backed by a recorder that is not installed globally.
///
/// Lets tests build an `AppState` without fighting over the process-wide
/// recorder slot.
pub fn detached_handle() -> PrometheusHandle {
    PrometheusBuilder::new().build_recorder().handle()
}
