//! Profile route handlers.

use axum::{extract::State, Json};
use safar_core::owner::model::Owner;
use safar_db::WebSocketMessage;
use serde::Deserialize;

use super::{current_owner, ApiResult, IntoApi};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct UpdateProfileRequest {
    pub full_name: String,
    pub phone: String,
}

pub async fn get_profile(State(state): State<AppState>) -> ApiResult<Json<Owner>> {
    Ok(Json(current_owner(&state)?))
}

pub async fn update_profile(
    State(state): State<AppState>,
    Json(req): Json<UpdateProfileRequest>,
) -> ApiResult<Json<Owner>> {
    let owner = current_owner(&state)?;
    let owner =
        safar_core::owner::update_profile(&state.db, &owner.id, &req.full_name, &req.phone).api()?;

    state.broadcast(WebSocketMessage::ProfileUpdated);
    Ok(Json(owner))
}
