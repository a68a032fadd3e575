use axum::{
    extract::State,
    response::Json,
    routing::get,
    Router,
};
use chrono::Utc;
use std::sync::Arc;

use crate::auth::middleware::AuthUser;
use crate::error::ApiResult;
use crate::extract::{AppPath, AppQuery};
use crate::pagination::{PaginatedResponse, PaginationParams};
use crate::AppState;
use speakerdrive_shared::{FilterCriteria, Lead, UnlockStatus};

pub fn lead_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_leads))
        .route("/mine", get(list_my_leads))
        .route("/:id", get(get_lead))
        .route("/:id/unlock", get(get_unlock_status).post(unlock_lead))
}

fn narrow(leads: Vec<Lead>, criteria: &FilterCriteria, params: &PaginationParams) -> Vec<Lead> {
    let mut leads = criteria.apply(&leads, Utc::now());
    params.lead_sort().sort(&mut leads);
    leads
}

async fn list_leads(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    AppQuery(criteria): AppQuery<FilterCriteria>,
    AppQuery(params): AppQuery<PaginationParams>,
) -> ApiResult<Json<PaginatedResponse<Lead>>> {
    let leads = state.leads.visible_leads(user.id).await?;
    let leads = narrow(leads, &criteria, &params);
    Ok(Json(PaginatedResponse::from_items(leads, &params)))
}

/// "My contacts": the leads this user has unlocked.
async fn list_my_leads(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    AppQuery(criteria): AppQuery<FilterCriteria>,
    AppQuery(params): AppQuery<PaginationParams>,
) -> ApiResult<Json<PaginatedResponse<Lead>>> {
    let leads = state.leads.unlocked_leads(user.id).await?;
    let leads = narrow(leads, &criteria, &params);
    Ok(Json(PaginatedResponse::from_items(leads, &params)))
}

async fn get_lead(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    AppPath(id): AppPath<String>,
) -> ApiResult<Json<Lead>> {
    Ok(Json(state.leads.lead_for_viewer(user.id, &id).await?))
}

async fn get_unlock_status(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    AppPath(id): AppPath<String>,
) -> ApiResult<Json<UnlockStatus>> {
    Ok(Json(state.leads.unlock_status(user.id, &id).await?))
}

async fn unlock_lead(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    AppPath(id): AppPath<String>,
) -> ApiResult<Json<UnlockStatus>> {
    Ok(Json(state.leads.unlock(user.id, &id).await?))
}
