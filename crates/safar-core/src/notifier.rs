//! Web server notifier for real-time updates.
//!
//! The CLI uses this to tell a running `safar serve` that drivers, trips or
//! the profile changed so open dashboards refresh.

use std::time::Duration;

use safar_db::WebSocketMessage;
use tracing::{debug, warn};

/// Default web server URL.
pub const DEFAULT_WEB_URL: &str = "http://127.0.0.1:3030";

/// Environment variable overriding [`DEFAULT_WEB_URL`].
pub const WEB_URL_ENV: &str = "SAFAR_WEB_URL";

/// Notifies the web server of changes via HTTP.
#[derive(Clone)]
pub struct WebNotifier {
    client: reqwest::Client,
    base_url: String,
}

fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(2))
        .build()
        .unwrap_or_default()
}

impl WebNotifier {
    /// Create a new notifier.
    ///
    /// Uses `SAFAR_WEB_URL` if set, otherwise `http://127.0.0.1:3030`.
    pub fn new() -> Self {
        let base_url = std::env::var(WEB_URL_ENV).unwrap_or_else(|_| DEFAULT_WEB_URL.to_string());
        Self::with_url(&base_url)
    }

    /// Create a notifier with a custom base URL.
    pub fn with_url(base_url: &str) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        debug!(base_url = %base_url, "WebNotifier initialized");
        Self {
            client: client(),
            base_url,
        }
    }

    pub fn notify_url(&self) -> String {
        format!("{}/internal/notify", self.base_url)
    }

    /// POST a message to `/internal/notify`, which relays it to every
    /// connected WebSocket client. Failures are logged and swallowed.
    pub async fn notify(&self, message: &WebSocketMessage) {
        let url = self.notify_url();
        debug!(url = %url, message = ?message, "Sending notification");

        match self.client.post(&url).json(message).send().await {
            Ok(response) if response.status().is_success() => {
                debug!("Notification sent successfully");
            }
            Ok(response) => {
                warn!(status_code = %response.status(), "Notification failed with status");
            }
            Err(e) => {
                // Expected whenever `safar serve` is not running.
                debug!(error = %e, url = %url, "Failed to send notification");
            }
        }
    }

    pub async fn drivers_changed(&self) {
        self.notify(&WebSocketMessage::DriversChanged).await;
    }

    pub async fn trips_changed(&self) {
        self.notify(&WebSocketMessage::TripsChanged).await;
    }

    pub async fn profile_updated(&self) {
        self.notify(&WebSocketMessage::ProfileUpdated).await;
    }
}

impl Default for WebNotifier {
    fn default() -> Self {
        Self::new()
    }
}
