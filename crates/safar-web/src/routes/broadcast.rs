//! Broadcast wizard route handlers.
//!
//! The server holds one wizard session. Links are never opened server-side:
//! each response carries the `links` the browser should open, in order.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use safar_core::broadcast::{
    BroadcastSession, Directory, LinkCollector, Recipient, SessionSnapshot, Step, TripDescription,
};
use safar_core::driver::DriverDirectory;
use safar_db::WebSocketMessage;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::{current_owner, ApiError, ApiResult, IntoApi};
use crate::state::AppState;

#[derive(Deserialize, Default)]
pub struct OpenBroadcastRequest {
    /// Stored trip to describe in the message.
    #[serde(default)]
    pub trip_id: Option<String>,
    /// Inline trip, used when `trip_id` is absent.
    #[serde(default)]
    pub trip: Option<TripDescription>,
}

/// Search text of the driver picker.
#[derive(Deserialize, Default)]
pub struct PickerQuery {
    pub q: Option<String>,
}

impl PickerQuery {
    fn text(&self) -> &str {
        self.q.as_deref().unwrap_or("")
    }
}

#[derive(Serialize)]
pub struct PickerEntry {
    #[serde(flatten)]
    pub recipient: Recipient,
    pub selected: bool,
}

/// Everything the wizard needs to render after an action.
#[derive(Serialize)]
pub struct BroadcastView {
    #[serde(flatten)]
    pub session: SessionSnapshot,
    pub active: bool,
    /// Directory entries matching the picker search.
    pub recipients: Vec<PickerEntry>,
    /// The send or skip this request applied, if any.
    pub step: Option<Step>,
    /// Deep links to open, in order.
    pub links: Vec<String>,
}

fn no_session() -> ApiError {
    (StatusCode::NOT_FOUND, "No broadcast is open".to_string())
}

fn load_directory(state: &AppState) -> ApiResult<Directory> {
    let owner = current_owner(state)?;
    Directory::load(&DriverDirectory::new(&state.db, &owner.id)).api()
}

fn render(
    session: &BroadcastSession,
    directory: &Directory,
    query: &PickerQuery,
    step: Option<Step>,
    links: Vec<String>,
) -> BroadcastView {
    let visible = directory.filter(query.text());
    let visible_ids: Vec<String> = visible.iter().map(|r| r.id.clone()).collect();
    let recipients = visible
        .into_iter()
        .map(|r| PickerEntry {
            selected: session.selection().is_selected(&r.id),
            recipient: r.clone(),
        })
        .collect();

    BroadcastView {
        session: session.snapshot(directory, &visible_ids),
        active: session.sequencer().is_active(),
        recipients,
        step,
        links,
    }
}

/// Push progress (or the final tally) to WebSocket clients.
fn announce(state: &AppState, session: &BroadcastSession, step: Option<&Step>) {
    if let Some(progress) = session.sequencer().progress() {
        state.broadcast(WebSocketMessage::BroadcastProgress {
            position: progress.position,
            total: progress.total,
        });
    } else if step.is_some_and(|s| s.finished) {
        let tally = session.sequencer().tally();
        state.broadcast(WebSocketMessage::BroadcastFinished {
            sent: tally.sent,
            skipped: tally.skipped,
        });
    }
}

/// POST /api/broadcast/open - Open the wizard, replacing any open one.
pub async fn open(
    State(state): State<AppState>,
    Query(query): Query<PickerQuery>,
    Json(req): Json<OpenBroadcastRequest>,
) -> ApiResult<Json<BroadcastView>> {
    let trip = match req.trip_id.as_deref() {
        Some(id) => Some(safar_core::trip::get_trip(&state.db, id).api()?.description()),
        None => req.trip,
    };

    let directory = load_directory(&state)?;
    let mut session = BroadcastSession::new(trip, &state.config.broadcast);
    session.observe_directory(&directory);
    info!(recipients = directory.len(), "Broadcast wizard opened");

    let view = render(&session, &directory, &query, None, Vec::new());
    *state.session.lock().await = Some(session);
    Ok(Json(view))
}

/// GET /api/broadcast - Current wizard state.
pub async fn get_session(
    State(state): State<AppState>,
    Query(query): Query<PickerQuery>,
) -> ApiResult<Json<BroadcastView>> {
    let mut guard = state.session.lock().await;
    let session = guard.as_mut().ok_or_else(no_session)?;
    let directory = load_directory(&state)?;
    session.observe_directory(&directory);
    Ok(Json(render(session, &directory, &query, None, Vec::new())))
}

/// DELETE /api/broadcast - Close the wizard.
pub async fn close(State(state): State<AppState>) -> StatusCode {
    let mut guard = state.session.lock().await;
    if let Some(mut session) = guard.take() {
        let was_active = session.sequencer().is_active();
        session.reset();
        if was_active {
            let tally = session.sequencer().tally();
            state.broadcast(WebSocketMessage::BroadcastFinished {
                sent: tally.sent,
                skipped: tally.skipped,
            });
        }
        info!("Broadcast wizard closed");
    }
    StatusCode::NO_CONTENT
}

/// POST /api/broadcast/toggle/{id}
pub async fn toggle(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<PickerQuery>,
) -> ApiResult<Json<BroadcastView>> {
    let mut guard = state.session.lock().await;
    let session = guard.as_mut().ok_or_else(no_session)?;
    let directory = load_directory(&state)?;
    session.observe_directory(&directory);

    session.selection_mut().toggle(&id);
    Ok(Json(render(session, &directory, &query, None, Vec::new())))
}

/// POST /api/broadcast/toggle-all - Select or deselect every visible driver.
pub async fn toggle_all(
    State(state): State<AppState>,
    Query(query): Query<PickerQuery>,
) -> ApiResult<Json<BroadcastView>> {
    let mut guard = state.session.lock().await;
    let session = guard.as_mut().ok_or_else(no_session)?;
    let directory = load_directory(&state)?;
    session.observe_directory(&directory);

    let visible = directory.filtered_ids(query.text());
    session.selection_mut().toggle_all(&visible);
    Ok(Json(render(session, &directory, &query, None, Vec::new())))
}

/// POST /api/broadcast/start
pub async fn start(
    State(state): State<AppState>,
    Query(query): Query<PickerQuery>,
) -> ApiResult<Json<BroadcastView>> {
    let mut guard = state.session.lock().await;
    let session = guard.as_mut().ok_or_else(no_session)?;
    let directory = load_directory(&state)?;
    session.observe_directory(&directory);

    let mut links = LinkCollector::new();
    let step = session
        .start(&directory, &mut links)
        .map_err(safar_core::SafarError::from)
        .api()?;

    announce(&state, session, step.as_ref());
    Ok(Json(render(session, &directory, &query, step, links.into_links())))
}

/// POST /api/broadcast/send - Message the current driver and advance.
pub async fn send(
    State(state): State<AppState>,
    Query(query): Query<PickerQuery>,
) -> ApiResult<Json<BroadcastView>> {
    let mut guard = state.session.lock().await;
    let session = guard.as_mut().ok_or_else(no_session)?;
    let directory = load_directory(&state)?;

    let mut links = LinkCollector::new();
    let step = session.send_current(&directory, &mut links);

    announce(&state, session, step.as_ref());
    Ok(Json(render(session, &directory, &query, step, links.into_links())))
}

/// POST /api/broadcast/skip - Advance without messaging.
pub async fn skip(
    State(state): State<AppState>,
    Query(query): Query<PickerQuery>,
) -> ApiResult<Json<BroadcastView>> {
    let mut guard = state.session.lock().await;
    let session = guard.as_mut().ok_or_else(no_session)?;
    let directory = load_directory(&state)?;

    let step = session.skip_current();

    announce(&state, session, step.as_ref());
    Ok(Json(render(session, &directory, &query, step, Vec::new())))
}

/// POST /api/broadcast/cancel - Stop the sequence, keeping the wizard open.
pub async fn cancel(
    State(state): State<AppState>,
    Query(query): Query<PickerQuery>,
) -> ApiResult<Json<BroadcastView>> {
    let mut guard = state.session.lock().await;
    let session = guard.as_mut().ok_or_else(no_session)?;
    let directory = load_directory(&state)?;

    if session.sequencer().is_active() {
        session.cancel();
        let tally = session.sequencer().tally();
        state.broadcast(WebSocketMessage::BroadcastFinished {
            sent: tally.sent,
            skipped: tally.skipped,
        });
    }
    Ok(Json(render(session, &directory, &query, None, Vec::new())))
}
