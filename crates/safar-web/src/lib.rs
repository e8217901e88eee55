//! SAFAR Web Server
//!
//! Axum-based web server for the fleet dashboard and REST API.

pub mod routes;
pub mod state;
pub mod websocket;

use axum::{
    routing::{get, post, put},
    Router,
};
use safar_core::SafarConfig;
use safar_db::DbPool;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        // Profile
        .route(
            "/profile",
            get(routes::profile::get_profile).put(routes::profile::update_profile),
        )
        // Drivers
        .route(
            "/drivers",
            get(routes::drivers::list_drivers).post(routes::drivers::create_driver),
        )
        .route(
            "/drivers/{id}",
            get(routes::drivers::get_driver)
                .put(routes::drivers::update_driver)
                .delete(routes::drivers::delete_driver),
        )
        // Trips
        .route(
            "/trips",
            get(routes::trips::list_trips).post(routes::trips::create_trip),
        )
        .route("/trips/recent", get(routes::trips::recent_trips))
        .route(
            "/trips/{id}",
            get(routes::trips::get_trip).delete(routes::trips::delete_trip),
        )
        .route("/trips/{id}/driver", put(routes::trips::assign_driver))
        // Stats
        .route("/stats", get(routes::stats::get_stats))
        // Broadcast wizard
        .route("/broadcast/open", post(routes::broadcast::open))
        .route(
            "/broadcast",
            get(routes::broadcast::get_session).delete(routes::broadcast::close),
        )
        .route("/broadcast/toggle/{id}", post(routes::broadcast::toggle))
        .route("/broadcast/toggle-all", post(routes::broadcast::toggle_all))
        .route("/broadcast/start", post(routes::broadcast::start))
        .route("/broadcast/send", post(routes::broadcast::send))
        .route("/broadcast/skip", post(routes::broadcast::skip))
        .route("/broadcast/cancel", post(routes::broadcast::cancel))
        .with_state(state.clone());

    Router::new()
        .route("/", get(routes::dashboard::index))
        .nest("/api", api_routes)
        .route("/ws", get(websocket::ws_handler))
        .route("/internal/notify", post(routes::internal::notify))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Run the web server.
pub async fn run_server(db: Arc<DbPool>, config: SafarConfig) -> anyhow::Result<()> {
    let addr = config.web_addr();
    let state = AppState::new(db, config);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Web server listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Method, Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;

    /// Fresh state over an in-memory database with one owner.
    pub fn state() -> AppState {
        let pool = safar_db::init_memory_pool().unwrap();
        safar_core::owner::create_owner(&pool, "Asha Rao", "+91 90000 00000", "asha@example.com")
            .unwrap();
        AppState::new(Arc::new(pool), SafarConfig::default())
    }

    /// Send one request through a fresh router over `state`.
    pub async fn call(
        state: &AppState,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = create_router(state.clone()).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };
        (status, value)
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::{call, state};
    use axum::http::{Method, StatusCode};

    #[tokio::test]
    async fn test_index_serves_html() {
        let state = state();
        let (status, body) = call(&state, Method::GET, "/", None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.as_str().unwrap().contains("SAFAR"));
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let state = state();
        let (status, _) = call(&state, Method::GET, "/api/nope", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
