use std::time::Duration;

use chrono::{DateTime, Utc};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::time::{interval, sleep};
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};

use super::hub::{NotificationError, NotificationHub};
use crate::models::Notification;

const PING_INTERVAL: Duration = Duration::from_secs(25);
const BASE_RECONNECT_DELAY: Duration = Duration::from_secs(2);
const MAX_RECONNECT_DELAY: Duration = Duration::from_secs(60);

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Upstream notification feed settings.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Candidate WebSocket endpoints, tried in order on every (re)connect.
    pub ws_urls: Vec<String>,
    /// HTTP endpoint polled while no WebSocket is connected.
    pub poll_url: Option<String>,
    pub poll_interval: Duration,
}

/// Consume an upstream notification feed and republish it through `hub`.
///
/// Prefers a WebSocket connection; while disconnected it backs off
/// exponentially and, if a poll URL is configured, polls it in the meantime.
pub async fn run_relay_client(config: RelayConfig, hub: NotificationHub, http: reqwest::Client) {
    let mut attempt: u32 = 0;
    let mut last_seen: Option<DateTime<Utc>> = None;

    loop {
        match connect_first(&config.ws_urls).await {
            Some((url, stream)) => {
                tracing::info!(url = %url, "Notification relay connected");
                attempt = 0;
                consume_stream(stream, &hub, &mut last_seen).await;
                tracing::warn!(url = %url, "Notification relay disconnected");
            }
            None if !config.ws_urls.is_empty() => {
                tracing::warn!(
                    candidates = config.ws_urls.len(),
                    "No notification WebSocket endpoint reachable"
                );
            }
            None => {}
        }

        let delay = reconnect_delay(attempt);
        attempt = attempt.saturating_add(1);

        match &config.poll_url {
            Some(poll_url) => {
                tracing::debug!(delay_secs = delay.as_secs(), "Polling notifications until reconnect");
                poll_for(delay, config.poll_interval, poll_url, &http, &hub, &mut last_seen).await;
            }
            None => {
                tracing::info!(delay_secs = delay.as_secs(), attempt, "Reconnecting...");
                sleep(delay).await;
            }
        }
    }
}

fn reconnect_delay(attempt: u32) -> Duration {
    let delay = BASE_RECONNECT_DELAY * 2u32.saturating_pow(attempt.min(16));
    delay.min(MAX_RECONNECT_DELAY)
}

async fn connect_first(urls: &[String]) -> Option<(String, WsStream)> {
    for url in urls {
        match connect_async(url.as_str()).await {
            Ok((stream, _response)) => return Some((url.clone(), stream)),
            Err(e) => {
                tracing::debug!(url = %url, error = %e, "Notification endpoint unavailable");
            }
        }
    }
    None
}

async fn consume_stream(
    stream: WsStream,
    hub: &NotificationHub,
    last_seen: &mut Option<DateTime<Utc>>,
) {
    let (mut write, mut read) = stream.split();

    let mut ping_timer = interval(PING_INTERVAL);
    ping_timer.tick().await; // consume the first immediate tick

    loop {
        tokio::select! {
            msg = read.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        for n in parse_notifications(text.as_str()) {
                            republish(hub, n, last_seen).await;
                        }
                    }
                    Some(Ok(Message::Ping(data))) => {
                        if let Err(e) = write.send(Message::Pong(data)).await {
                            tracing::warn!(error = %e, "Failed to send pong");
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) => {
                        tracing::warn!("Notification server sent close frame");
                        break;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        tracing::error!(error = %e, "Notification WebSocket read error");
                        break;
                    }
                    None => break,
                }
            }
            _ = ping_timer.tick() => {
                if let Err(e) = write.send(Message::Ping(vec![].into())).await {
                    tracing::warn!(error = %e, "Failed to send ping");
                    break;
                }
            }
        }
    }
}

/// Poll `poll_url` every `every` until `duration` has elapsed.
async fn poll_for(
    duration: Duration,
    every: Duration,
    poll_url: &str,
    http: &reqwest::Client,
    hub: &NotificationHub,
    last_seen: &mut Option<DateTime<Utc>>,
) {
    let deadline = sleep(duration);
    tokio::pin!(deadline);
    let mut ticker = interval(every);

    loop {
        tokio::select! {
            _ = &mut deadline => break,
            _ = ticker.tick() => {
                match poll_once(http, poll_url, *last_seen).await {
                    Ok(batch) => {
                        for n in batch {
                            republish(hub, n, last_seen).await;
                        }
                    }
                    Err(e) => tracing::warn!(error = %e, url = %poll_url, "Notification poll failed"),
                }
            }
        }
    }
}

async fn poll_once(
    http: &reqwest::Client,
    poll_url: &str,
    since: Option<DateTime<Utc>>,
) -> anyhow::Result<Vec<Notification>> {
    let url = match since {
        Some(ts) => reqwest::Url::parse_with_params(poll_url, &[("since", ts.to_rfc3339())])?,
        None => reqwest::Url::parse(poll_url)?,
    };

    let resp = http.get(url).send().await?.error_for_status()?;
    let text = resp.text().await?;
    Ok(parse_notifications(&text))
}

async fn republish(
    hub: &NotificationHub,
    notification: Notification,
    last_seen: &mut Option<DateTime<Utc>>,
) {
    let created_at = notification.created_at;
    match hub.publish(notification).await {
        Ok(()) | Err(NotificationError::Duplicate(_)) => {}
        Err(e) => tracing::warn!(error = %e, "Relayed notification not published"),
    }
    if last_seen.map_or(true, |ts| created_at > ts) {
        *last_seen = Some(created_at);
    }
}

/// Parse an upstream payload, which may be:
/// - a JSON array of notifications
/// - a wrapper with a `data` array (the poll endpoint's `ApiResponse`)
/// - a `{ "type": "notification", "data": {...} }` push frame
/// - a single notification object
fn parse_notifications(text: &str) -> Vec<Notification> {
    if let Ok(batch) = serde_json::from_str::<Vec<Notification>>(text) {
        return batch;
    }

    if let Ok(wrapper) = serde_json::from_str::<serde_json::Value>(text) {
        if let Some(data) = wrapper.get("data") {
            if let Ok(batch) = serde_json::from_value::<Vec<Notification>>(data.clone()) {
                return batch;
            }
            if let Ok(single) = serde_json::from_value::<Notification>(data.clone()) {
                return vec![single];
            }
        }
    }

    if let Ok(single) = serde_json::from_str::<Notification>(text) {
        return vec![single];
    }

    tracing::trace!(raw = %text, "Non-notification message received");
    Vec::new()
}
