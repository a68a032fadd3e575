pub mod jwt;
pub mod middleware;

use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, patch, post},
    Router,
};
use std::sync::Arc;

use crate::error::{ApiResult, AppError};
use crate::extract::AppJson;
use crate::store::NewUser;
use crate::validation::{email, Validator};
use crate::AppState;
use speakerdrive_shared::{
    email_local_part, AuthResponse, IdentityMetadata, IdentityMetadataUpdate, LoginRequest,
    SignupRequest, User, UserType,
};

pub use middleware::AuthUser;

/// Consecutive failed sign-ins before the account is locked
pub const MAX_FAILED_LOGINS: i32 = 5;
/// How long a locked account stays locked
pub const LOCKOUT_MINUTES: i64 = 15;

pub const MIN_PASSWORD_LENGTH: usize = 8;

pub fn auth_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/session", get(session))
        .route("/refresh", post(refresh_token))
        .route("/user", patch(update_user))
}

pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    use argon2::password_hash::SaltString;
    let salt = SaltString::generate(&mut rand::rngs::OsRng);
    Ok(Argon2::default()
        .hash_password(password.as_bytes(), &salt)?
        .to_string())
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool, argon2::password_hash::Error> {
    let parsed_hash = PasswordHash::new(hash)?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

fn session_response(state: &AppState, user: User) -> ApiResult<AuthResponse> {
    let token = state.jwt.create_jwt(&user)?;
    Ok(AuthResponse {
        token: token.token,
        expires_at: token.expires_at,
        user,
    })
}

async fn signup(
    State(state): State<Arc<AppState>>,
    AppJson(req): AppJson<SignupRequest>,
) -> ApiResult<impl IntoResponse> {
    Validator::new()
        .email(&req.email, "email")
        .min_length(&req.password, "password", MIN_PASSWORD_LENGTH)
        .finish()?;

    let email = email::normalize(&req.email)
        .ok_or_else(|| AppError::BadRequest("Invalid email format".to_string()))?;

    let metadata = IdentityMetadata {
        display_name: Some(email_local_part(&email).to_string()),
        user_type: UserType::Client,
        user_role: "Owner".to_string(),
        ..Default::default()
    };

    let user = state
        .store
        .create_user(NewUser {
            email,
            password_hash: hash_password(&req.password)?,
            metadata,
            initial_credits: state.config.default_unlock_credits,
        })
        .await?;

    tracing::info!(user_id = %user.id, "User signed up");

    Ok((StatusCode::CREATED, Json(session_response(&state, user)?)))
}

async fn login(
    State(state): State<Arc<AppState>>,
    AppJson(req): AppJson<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let credentials = state
        .store
        .find_credentials(req.email.trim())
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    // Check if account is locked
    if let Some(locked_until) = credentials.locked_until {
        if locked_until > chrono::Utc::now() {
            return Err(AppError::AccountLocked { until: locked_until });
        }
    }

    if !verify_password(&req.password, &credentials.password_hash)? {
        state
            .store
            .record_login_failure(
                credentials.user.id,
                MAX_FAILED_LOGINS,
                chrono::Duration::minutes(LOCKOUT_MINUTES),
            )
            .await?;
        tracing::warn!(
            user_id = %credentials.user.id,
            attempts = credentials.failed_login_attempts + 1,
            "Failed sign-in"
        );
        return Err(AppError::InvalidCredentials);
    }

    state.store.record_login_success(credentials.user.id).await?;

    Ok(Json(session_response(&state, credentials.user)?))
}

async fn logout(AuthUser(user): AuthUser) -> impl IntoResponse {
    // Tokens are stateless; the client drops its copy
    tracing::debug!(user_id = %user.id, "User signed out");
    StatusCode::NO_CONTENT
}

async fn session(AuthUser(user): AuthUser) -> Json<User> {
    Json(user)
}

async fn refresh_token(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
) -> ApiResult<Json<AuthResponse>> {
    Ok(Json(session_response(&state, user)?))
}

async fn update_user(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    AppJson(update): AppJson<IdentityMetadataUpdate>,
) -> ApiResult<Json<User>> {
    let user = state.store.update_identity_metadata(user.id, &update).await?;
    Ok(Json(user))
}
