//! Dashboard statistics.

use axum::{extract::State, Json};
use safar_core::dashboard::DashboardStats;

use super::{current_owner, ApiResult, IntoApi};
use crate::state::AppState;

pub async fn get_stats(State(state): State<AppState>) -> ApiResult<Json<DashboardStats>> {
    let owner = current_owner(&state)?;
    let today = chrono::Local::now().date_naive();
    let stats = safar_core::dashboard::get_stats(&state.db, &owner.id, today).api()?;
    Ok(Json(stats))
}

#[cfg(test)]
mod tests {
    use crate::test_support::{call, state};
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    #[tokio::test]
    async fn test_stats_counts_today() {
        let state = state();
        let today = safar_core::trip::today();
        call(
            &state,
            Method::POST,
            "/api/trips",
            Some(json!({
                "from_location": "A",
                "to_location": "B",
                "trip_date": today,
                "trip_time": "08:00"
            })),
        )
        .await;

        let (status, stats) = call(&state, Method::GET, "/api/stats", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(stats["total_trips"], 1);
        assert_eq!(stats["trips_today"], 1);
        assert_eq!(stats["upcoming_trips"], 1);
        assert_eq!(stats["total_drivers"], 0);
    }
}
