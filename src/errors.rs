use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::dashboard::DashboardError;
use crate::notifications::NotificationError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Dashboard(#[from] DashboardError),

    #[error(transparent)]
    Notification(#[from] NotificationError),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            // The cause was already logged where the fetch failed.
            AppError::Dashboard(e) => (StatusCode::BAD_GATEWAY, e.to_string()),
            AppError::Notification(e @ NotificationError::RateLimited) => {
                (StatusCode::TOO_MANY_REQUESTS, e.to_string())
            }
            AppError::Notification(e @ NotificationError::Duplicate(_)) => {
                (StatusCode::CONFLICT, e.to_string())
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".into())
            }
        };

        (
            status,
            Json(ErrorBody {
                success: false,
                error: message,
            }),
        )
            .into_response()
    }
}
