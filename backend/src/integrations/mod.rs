//! Third-party services proxied for the frontend. Credentials stay in
//! server configuration.

pub mod chatbot;
pub mod email_finder;

use axum::{extract::State, response::Json, routing::post, Router};
use std::sync::Arc;

use crate::auth::middleware::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::extract::AppJson;
use crate::AppState;
use speakerdrive_shared::{ChatRequest, ChatbotResponse, ContactFinderResult, ContactSearch};

pub use chatbot::ChatbotClient;
pub use email_finder::EmailFinderClient;

#[derive(Debug, thiserror::Error)]
pub enum IntegrationError {
    #[error("{0} is not configured")]
    NotConfigured(&'static str),
    #[error("{service} request failed: {source}")]
    Request {
        service: &'static str,
        source: reqwest::Error,
    },
    #[error("{service} returned status {status}")]
    Upstream {
        service: &'static str,
        status: u16,
        body: String,
    },
}

pub type IntegrationResult<T> = Result<T, IntegrationError>;

pub fn contact_finder_routes() -> Router<Arc<AppState>> {
    Router::new().route("/search", post(search_contact))
}

pub fn chat_routes() -> Router<Arc<AppState>> {
    Router::new().route("/", post(send_chat_message))
}

async fn search_contact(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    AppJson(search): AppJson<ContactSearch>,
) -> ApiResult<Json<ContactFinderResult>> {
    let errors = search.validate();
    if !errors.is_empty() {
        return Err(ApiError::validation(errors));
    }

    tracing::debug!(user_id = %user.id, "Contact finder search");
    let result = state.email_finder.search(&search).await?;
    Ok(Json(result))
}

async fn send_chat_message(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
    AppJson(req): AppJson<ChatRequest>,
) -> ApiResult<Json<ChatbotResponse>> {
    if req.message.trim().is_empty() {
        return Err(ApiError::validation_single("message", "Message is required"));
    }

    let reply = state.chatbot.send_message(&req.message).await?;
    Ok(Json(reply))
}
