use axum::{
    extract::State,
    response::Json,
    routing::get,
    Router,
};
use std::sync::Arc;

use crate::error::{ApiError, ApiResult};
use crate::extract::AppPath;
use crate::AppState;
use speakerdrive_shared::{Catalog, PromptDeck, PromptLibrary};

/// Option lists for filters, onboarding and settings forms
pub fn catalog_routes() -> Router<Arc<AppState>> {
    Router::new().route("/", get(get_catalog))
}

pub fn prompt_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_prompt_decks))
        .route("/:deck", get(get_prompt_deck))
}

async fn get_catalog(State(state): State<Arc<AppState>>) -> Json<Catalog> {
    Json(state.catalog.clone())
}

async fn list_prompt_decks(State(state): State<Arc<AppState>>) -> Json<PromptLibrary> {
    Json(state.prompts.clone())
}

async fn get_prompt_deck(
    State(state): State<Arc<AppState>>,
    AppPath(deck): AppPath<String>,
) -> ApiResult<Json<PromptDeck>> {
    state
        .prompts
        .deck(&deck)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Prompt deck"))
}
