//! Realtime update channel.
//!
//! The web server fans these messages out to WebSocket clients. The CLI posts
//! them to `/internal/notify` so a running dashboard refreshes after edits
//! made from the terminal.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// WebSocket message types for real-time updates.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(tag = "type", content = "data")]
pub enum WebSocketMessage {
    /// A driver was added, edited or removed.
    DriversChanged,
    /// A trip was created, deleted or reassigned.
    TripsChanged,
    /// The owner profile was edited.
    ProfileUpdated,
    /// The broadcast wizard moved to a new recipient (1-based position).
    BroadcastProgress { position: usize, total: usize },
    /// The broadcast wizard returned to idle.
    BroadcastFinished { sent: usize, skipped: usize },
}

/// Type alias for the realtime sender.
pub type RealtimeSender = broadcast::Sender<WebSocketMessage>;

/// Create a new realtime channel with default capacity.
pub fn create_realtime_channel() -> RealtimeSender {
    let (tx, _rx) = broadcast::channel(100);
    tx
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_wire_shape() {
        let json = serde_json::to_value(WebSocketMessage::BroadcastProgress {
            position: 2,
            total: 5,
        })
        .unwrap();
        assert_eq!(json["type"], "BroadcastProgress");
        assert_eq!(json["data"]["position"], 2);

        let unit = serde_json::to_value(WebSocketMessage::DriversChanged).unwrap();
        assert_eq!(unit["type"], "DriversChanged");
    }

    #[tokio::test]
    async fn test_channel_delivers_to_subscribers() {
        let tx = create_realtime_channel();
        let mut rx = tx.subscribe();
        tx.send(WebSocketMessage::TripsChanged).unwrap();
        assert_eq!(rx.recv().await.unwrap(), WebSocketMessage::TripsChanged);
    }
}
