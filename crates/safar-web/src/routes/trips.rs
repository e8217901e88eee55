//! Trip route handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use safar_core::trip::model::{NewTrip, Trip};
use safar_db::WebSocketMessage;
use serde::Deserialize;

use super::{current_owner, ApiResult, IntoApi};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct AssignDriverRequest {
    pub driver_id: Option<String>,
}

pub async fn list_trips(State(state): State<AppState>) -> ApiResult<Json<Vec<Trip>>> {
    let owner = current_owner(&state)?;
    let trips = safar_core::trip::list_trips(&state.db, &owner.id).api()?;
    Ok(Json(trips))
}

pub async fn recent_trips(State(state): State<AppState>) -> ApiResult<Json<Vec<Trip>>> {
    let owner = current_owner(&state)?;
    let limit = state.config.trips.recent_limit;
    let trips = safar_core::trip::recent_trips(&state.db, &owner.id, limit).api()?;
    Ok(Json(trips))
}

pub async fn get_trip(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Trip>> {
    let trip = safar_core::trip::get_trip(&state.db, &id).api()?;
    Ok(Json(trip))
}

pub async fn create_trip(
    State(state): State<AppState>,
    Json(req): Json<NewTrip>,
) -> ApiResult<(StatusCode, Json<Trip>)> {
    let owner = current_owner(&state)?;
    let trip = safar_core::trip::create_trip(&state.db, &owner.id, &req).api()?;

    state.broadcast(WebSocketMessage::TripsChanged);
    Ok((StatusCode::CREATED, Json(trip)))
}

pub async fn delete_trip(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    safar_core::trip::delete_trip(&state.db, &id).api()?;

    state.broadcast(WebSocketMessage::TripsChanged);
    Ok(StatusCode::NO_CONTENT)
}

pub async fn assign_driver(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<AssignDriverRequest>,
) -> ApiResult<Json<Trip>> {
    let driver_id = req.driver_id.as_deref().filter(|d| !d.is_empty());
    let trip = safar_core::trip::assign_driver(&state.db, &id, driver_id).api()?;

    state.broadcast(WebSocketMessage::TripsChanged);
    Ok(Json(trip))
}
