//! WebSocket handler for real-time updates.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use futures::{sink::SinkExt, stream::StreamExt};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::state::AppState;

/// WebSocket upgrade handler.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    let (mut sender, mut receiver) = socket.split();
    let mut rx = state.tx.subscribe();

    let receiver_count = state.tx.receiver_count();
    info!(receiver_count, "WebSocket client connected");

    // Forward realtime messages to this client
    let send_task = tokio::spawn(async move {
        while let Ok(msg) = rx.recv().await {
            let json = match serde_json::to_string(&msg) {
                Ok(json) => json,
                Err(e) => {
                    warn!(error = %e, "Failed to serialize realtime message");
                    continue;
                }
            };
            debug!(message = %json, "Sending message to WebSocket client");
            if sender.send(Message::Text(json.into())).await.is_err() {
                debug!("WebSocket send failed, client disconnected");
                break;
            }
        }
    });

    let recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            match msg {
                Message::Text(text) => {
                    debug!("Received from WebSocket client: {}", text);
                }
                Message::Close(_) => {
                    debug!("WebSocket client sent close frame");
                    break;
                }
                _ => {}
            }
        }
    });

    first_to_finish(send_task, recv_task).await;

    info!("WebSocket client disconnected");
}

/// Wait for either task and abort the other. Returns the aborted handle.
async fn first_to_finish(mut a: JoinHandle<()>, mut b: JoinHandle<()>) -> JoinHandle<()> {
    tokio::select! {
        _ = &mut a => {
            b.abort();
            b
        }
        _ = &mut b => {
            a.abort();
            a
        }
    }
}
