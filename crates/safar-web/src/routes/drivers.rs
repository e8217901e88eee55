//! Driver route handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use safar_core::driver::model::{Driver, DriverInput};
use safar_db::WebSocketMessage;
use serde::{Deserialize, Serialize};

use super::{current_owner, ApiResult, IntoApi};
use crate::state::AppState;

#[derive(Deserialize, Default)]
pub struct DriverQuery {
    pub q: Option<String>,
}

/// Driver JSON with its ready-made `tel:` link.
#[derive(Serialize)]
pub struct DriverView {
    #[serde(flatten)]
    pub driver: Driver,
    pub call_link: String,
    pub initial: char,
}

impl From<Driver> for DriverView {
    fn from(driver: Driver) -> Self {
        Self {
            call_link: driver.call_link(),
            initial: driver.initial(),
            driver,
        }
    }
}

pub async fn list_drivers(
    State(state): State<AppState>,
    Query(query): Query<DriverQuery>,
) -> ApiResult<Json<Vec<DriverView>>> {
    let owner = current_owner(&state)?;
    let drivers = safar_core::driver::list_drivers(&state.db, &owner.id).api()?;

    let q = query.q.unwrap_or_default();
    let views = safar_core::driver::filter_drivers(&drivers, &q)
        .into_iter()
        .cloned()
        .map(DriverView::from)
        .collect();
    Ok(Json(views))
}

pub async fn get_driver(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<DriverView>> {
    let driver = safar_core::driver::get_driver(&state.db, &id).api()?;
    Ok(Json(driver.into()))
}

pub async fn create_driver(
    State(state): State<AppState>,
    Json(req): Json<DriverInput>,
) -> ApiResult<(StatusCode, Json<DriverView>)> {
    let owner = current_owner(&state)?;
    let driver = safar_core::driver::add_driver(&state.db, &owner.id, &req).api()?;

    state.broadcast(WebSocketMessage::DriversChanged);
    Ok((StatusCode::CREATED, Json(driver.into())))
}

pub async fn update_driver(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<DriverInput>,
) -> ApiResult<Json<DriverView>> {
    let driver = safar_core::driver::update_driver(&state.db, &id, &req).api()?;

    state.broadcast(WebSocketMessage::DriversChanged);
    Ok(Json(driver.into()))
}

pub async fn delete_driver(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    safar_core::driver::delete_driver(&state.db, &id).api()?;

    // Trips keep existing with the driver unassigned.
    state.broadcast(WebSocketMessage::DriversChanged);
    state.broadcast(WebSocketMessage::TripsChanged);
    Ok(StatusCode::NO_CONTENT)
}
