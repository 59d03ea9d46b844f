use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use metrics::gauge;
use tokio::sync::broadcast::error::RecvError;

use crate::api::ws_types::{ClientCommand, ClientFilter};
use crate::AppState;

/// GET /ws: notification and dashboard push channel.
pub async fn handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| push_updates(socket, state))
}

async fn push_updates(mut socket: WebSocket, state: AppState) {
    let mut updates = state.ws_tx.subscribe();
    let mut filter = ClientFilter::default();

    gauge!("ws_clients_connected").increment(1.0);
    tracing::info!(clients = state.ws_tx.receiver_count(), "Push client connected");

    loop {
        tokio::select! {
            update = updates.recv() => {
                let msg = match update {
                    Ok(msg) => msg,
                    Err(RecvError::Lagged(missed)) => {
                        tracing::warn!(missed, "Push client fell behind; updates dropped");
                        continue;
                    }
                    Err(RecvError::Closed) => break,
                };

                if !filter.allows(&msg) {
                    continue;
                }

                let frame = match serde_json::to_string(&msg) {
                    Ok(frame) => frame,
                    Err(e) => {
                        tracing::error!(error = %e, "Could not encode push update");
                        continue;
                    }
                };
                if socket.send(Message::Text(frame)).await.is_err() {
                    break;
                }
            }
            incoming = socket.recv() => {
                match incoming {
                    Some(Ok(Message::Text(text))) => {
                        match serde_json::from_str::<ClientCommand>(&text) {
                            Ok(cmd) => {
                                tracing::debug!(command = ?cmd, "Push client changed subscription");
                                filter.apply(cmd);
                            }
                            Err(e) => tracing::debug!(error = %e, "Ignoring unrecognised client frame"),
                        }
                    }
                    Some(Ok(Message::Ping(data))) => {
                        if socket.send(Message::Pong(data)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                    Some(Ok(_)) => {}
                }
            }
        }
    }

    gauge!("ws_clients_connected").decrement(1.0);
    tracing::info!(
        wallet = filter.wallet.as_deref().unwrap_or("-"),
        "Push client disconnected"
    );
}
