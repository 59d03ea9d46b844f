use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use metrics::counter;
use thiserror::Error;
use tokio::sync::{broadcast, Mutex};
use uuid::Uuid;

use super::rate_limiter::SlidingWindowLimiter;
use crate::api::ws_types::WsMessage;
use crate::models::Notification;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NotificationError {
    #[error("notification rate limit exceeded")]
    RateLimited,

    #[error("notification {0} already published")]
    Duplicate(Uuid),
}

/// Fan-out point for notifications.
///
/// Keeps a bounded buffer of recent notifications for polling clients and
/// forwards every accepted notification to connected WebSocket clients.
#[derive(Clone)]
pub struct NotificationHub {
    inner: Arc<Mutex<HubInner>>,
    ws_tx: broadcast::Sender<WsMessage>,
}

struct HubInner {
    recent: VecDeque<Notification>,
    capacity: usize,
    limiter: SlidingWindowLimiter,
}

impl NotificationHub {
    pub fn new(
        ws_tx: broadcast::Sender<WsMessage>,
        capacity: usize,
        rate_limit: usize,
        rate_window: Duration,
    ) -> Self {
        Self {
            inner: Arc::new(Mutex::new(HubInner {
                recent: VecDeque::with_capacity(capacity),
                capacity,
                limiter: SlidingWindowLimiter::new(rate_limit, rate_window),
            })),
            ws_tx,
        }
    }

    /// Accept a notification, buffer it and push it to WebSocket clients.
    pub async fn publish(&self, notification: Notification) -> Result<(), NotificationError> {
        let mut inner = self.inner.lock().await;

        if inner.recent.iter().any(|n| n.id == notification.id) {
            return Err(NotificationError::Duplicate(notification.id));
        }

        if !inner.limiter.try_acquire() {
            counter!("notifications_rate_limited_total").increment(1);
            tracing::warn!(id = %notification.id, "Notification dropped by rate limiter");
            return Err(NotificationError::RateLimited);
        }

        inner.recent.push_back(notification.clone());
        while inner.recent.len() > inner.capacity {
            inner.recent.pop_front();
        }
        drop(inner);

        counter!("notifications_published_total").increment(1);
        tracing::info!(
            id = %notification.id,
            kind = ?notification.kind,
            title = %notification.title,
            "Notification published"
        );

        // No subscribers is fine; polling clients still see the buffer.
        let _ = self.ws_tx.send(WsMessage::Notification(notification));
        Ok(())
    }

    /// Buffered notifications created strictly after `since`, oldest first.
    pub async fn recent(&self, since: Option<DateTime<Utc>>) -> Vec<Notification> {
        let inner = self.inner.lock().await;
        inner
            .recent
            .iter()
            .filter(|n| since.map_or(true, |ts| n.created_at > ts))
            .cloned()
            .collect()
    }
}
