use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use crate::models::Position;
use crate::AppState;

#[derive(Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

/// GET /api/positions/:wallet: raw snapshot straight from the position source.
pub async fn list(
    State(state): State<AppState>,
    Path(wallet): Path<String>,
) -> (StatusCode, Json<ApiResponse<Vec<Position>>>) {
    match state.positions.fetch_positions(wallet.trim()).await {
        Ok(positions) => (
            StatusCode::OK,
            Json(ApiResponse {
                success: true,
                data: Some(positions),
                error: None,
            }),
        ),
        Err(e) => {
            tracing::error!(error = %e, wallet = %wallet, "Position listing failed");
            (
                StatusCode::BAD_GATEWAY,
                Json(ApiResponse {
                    success: false,
                    data: None,
                    error: Some(e.to_string()),
                }),
            )
        }
    }
}
