//! Route handlers.

pub mod broadcast;
pub mod dashboard;
pub mod drivers;
pub mod internal;
pub mod profile;
pub mod stats;
pub mod trips;

use axum::http::StatusCode;
use safar_core::owner::model::Owner;
use safar_core::{SafarError, SafarResult};

use crate::state::AppState;

pub type ApiError = (StatusCode, String);
pub type ApiResult<T> = Result<T, ApiError>;

/// Map a core error onto an HTTP status.
pub fn api_error(e: SafarError) -> ApiError {
    let status = if e.is_not_found() {
        StatusCode::NOT_FOUND
    } else {
        match &e {
            SafarError::ValidationError(_) | SafarError::Broadcast(_) => StatusCode::BAD_REQUEST,
            SafarError::NotInitialized(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    };
    if status == StatusCode::INTERNAL_SERVER_ERROR {
        tracing::error!(error = %e, "Request failed");
    }
    (status, e.to_string())
}

pub(crate) trait IntoApi<T> {
    fn api(self) -> ApiResult<T>;
}

impl<T> IntoApi<T> for SafarResult<T> {
    fn api(self) -> ApiResult<T> {
        self.map_err(api_error)
    }
}

/// The owner this server works for.
pub(crate) fn current_owner(state: &AppState) -> ApiResult<Owner> {
    safar_core::owner::require_default_owner(&state.db).api()
}
