use axum::extract::{Query, State};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::positions::ApiResponse;
use crate::errors::AppError;
use crate::models::{Notification, NotificationKind};
use crate::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishRequest {
    pub title: String,
    pub message: String,
    #[serde(default)]
    pub kind: NotificationKind,
    #[serde(default)]
    pub user_id: Option<String>,
}

/// POST /api/notifications: push a notification to connected clients.
pub async fn publish(
    State(state): State<AppState>,
    Json(req): Json<PublishRequest>,
) -> Result<Json<ApiResponse<Notification>>, AppError> {
    if req.title.trim().is_empty() {
        return Err(AppError::BadRequest("title must not be empty".into()));
    }

    let mut notification = Notification::new(req.title, req.message, req.kind);
    notification.user_id = req.user_id;

    state.notifications.publish(notification.clone()).await?;

    Ok(Json(ApiResponse {
        success: true,
        data: Some(notification),
        error: None,
    }))
}

#[derive(Debug, Deserialize)]
pub struct RecentParams {
    pub since: Option<DateTime<Utc>>,
}

/// GET /api/notifications?since=<rfc3339>: polling fallback for clients
/// without a live WebSocket.
pub async fn recent(
    State(state): State<AppState>,
    Query(params): Query<RecentParams>,
) -> Json<ApiResponse<Vec<Notification>>> {
    let items = state.notifications.recent(params.since).await;
    Json(ApiResponse {
        success: true,
        data: Some(items),
        error: None,
    })
}
