//! Application state.

use safar_core::broadcast::BroadcastSession;
use safar_core::SafarConfig;
use safar_db::{create_realtime_channel, DbPool, RealtimeSender, WebSocketMessage};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DbPool>,
    pub tx: RealtimeSender,
    pub config: Arc<SafarConfig>,
    /// The broadcast wizard of this server, if one is open.
    pub session: Arc<Mutex<Option<BroadcastSession>>>,
}

impl AppState {
    pub fn new(db: Arc<DbPool>, config: SafarConfig) -> Self {
        Self {
            db,
            tx: create_realtime_channel(),
            config: Arc::new(config),
            session: Arc::new(Mutex::new(None)),
        }
    }

    /// Broadcast a message to all WebSocket clients.
    pub fn broadcast(&self, msg: WebSocketMessage) {
        let _ = self.tx.send(msg);
    }
}
