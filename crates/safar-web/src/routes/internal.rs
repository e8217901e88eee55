//! Internal notification endpoints.

use axum::{extract::State, http::StatusCode, Json};
use safar_db::WebSocketMessage;
use tracing::{debug, info};

use crate::state::AppState;

/// Receive a notification and broadcast to all WebSocket clients.
pub async fn notify(
    State(state): State<AppState>,
    Json(msg): Json<WebSocketMessage>,
) -> StatusCode {
    info!(?msg, "Received internal notification, broadcasting to WebSocket clients");
    let receiver_count = state.tx.receiver_count();
    debug!(receiver_count, "Active WebSocket receivers");
    state.broadcast(msg);
    StatusCode::OK
}

#[cfg(test)]
mod tests {
    use crate::test_support::{call, state};
    use axum::http::{Method, StatusCode};
    use safar_db::WebSocketMessage;
    use serde_json::json;

    #[tokio::test]
    async fn test_notify_rebroadcasts() {
        let state = state();
        let mut rx = state.tx.subscribe();

        let (status, _) = call(
            &state,
            Method::POST,
            "/internal/notify",
            Some(json!({ "type": "DriversChanged" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(rx.recv().await.unwrap(), WebSocketMessage::DriversChanged);
    }

    #[tokio::test]
    async fn test_notify_rejects_unknown_type() {
        let state = state();
        let (status, _) = call(
            &state,
            Method::POST,
            "/internal/notify",
            Some(json!({ "type": "Nonsense" })),
        )
        .await;
        assert!(status.is_client_error());
    }
}
