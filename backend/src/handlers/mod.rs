use axum::{extract::State, http::StatusCode, response::Json};
use chrono::Utc;
use serde_json::json;
use std::sync::Arc;

use crate::auth::middleware::AuthUser;
use crate::error::ApiResult;
use crate::AppState;
use speakerdrive_shared::DashboardStats;

pub mod catalog;
pub mod leads;
pub mod profiles;

pub use catalog::{catalog_routes, prompt_routes};
pub use leads::lead_routes;
pub use profiles::profile_routes;

pub async fn health_check(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<serde_json::Value>) {
    if state.store.health_check().await {
        (StatusCode::OK, Json(json!({"status": "healthy", "service": "speakerdrive-api"})))
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({"status": "unhealthy", "service": "speakerdrive-api"})),
        )
    }
}

pub async fn dashboard_stats(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
) -> ApiResult<Json<DashboardStats>> {
    Ok(Json(state.leads.dashboard_stats(user.id, Utc::now()).await?))
}
