use axum::{
    extract::{multipart::MultipartRejection, DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    response::Json,
    routing::{get, post, put},
    Router,
};
use chrono::Utc;
use std::sync::Arc;

use crate::auth::middleware::AuthUser;
use crate::error::{ApiError, ApiResult, AppError};
use crate::extract::AppJson;
use crate::services::avatar::Avatar;
use crate::validation::Validator;
use crate::AppState;
use speakerdrive_shared::profile::MAX_AVATAR_BYTES;
use speakerdrive_shared::{
    IdentityMetadataUpdate, OnboardingRequest, ProfileUpdate, ProfileView, User,
};

/// Multipart framing allowance on top of the image itself
const MULTIPART_OVERHEAD: usize = 64 * 1024;

pub fn profile_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(get_profile).patch(update_profile))
        .route("/onboarding", post(complete_onboarding))
        .route(
            "/avatar",
            put(upload_avatar)
                .delete(remove_avatar)
                .layer(DefaultBodyLimit::max(MAX_AVATAR_BYTES + MULTIPART_OVERHEAD)),
        )
}

async fn load_view(state: &AppState, user: &User) -> ApiResult<ProfileView> {
    let profile = state
        .store
        .get_profile(user.id)
        .await?
        .ok_or_else(|| AppError::NotFound("Profile".to_string()))?;
    Ok(ProfileView::compose(&profile, user))
}

async fn get_profile(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
) -> ApiResult<Json<ProfileView>> {
    Ok(Json(load_view(&state, &user).await?))
}

/// Partial update of the profile record only. Mirroring name and avatar into
/// identity metadata is a separate call (`PATCH /auth/user`).
async fn update_profile(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    AppJson(update): AppJson<ProfileUpdate>,
) -> ApiResult<Json<ProfileView>> {
    if update.is_empty() {
        return Err(ApiError::bad_request("No fields to update"));
    }

    let mut validator = Validator::new();
    if let Some(name) = &update.display_name {
        validator = validator.min_length(name, "display_name", 2);
    }
    if let Some(industries) = &update.industries {
        validator = validator.max_items(industries, "industries", OnboardingRequest::MAX_INDUSTRIES);
    }
    validator.finish()?;

    let profile = state.store.update_profile(user.id, &update).await?;
    Ok(Json(ProfileView::compose(&profile, &user)))
}

/// Name goes to identity metadata first, then services and industries to the profile.
async fn complete_onboarding(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    AppJson(req): AppJson<OnboardingRequest>,
) -> ApiResult<Json<ProfileView>> {
    let errors = req.validate();
    if !errors.is_empty() {
        return Err(ApiError::validation(errors));
    }

    let user = state
        .store
        .update_identity_metadata(user.id, &req.identity_update())
        .await?;
    let profile = state.store.update_profile(user.id, &req.profile_update()).await?;

    tracing::info!(user_id = %user.id, "Onboarding completed");
    Ok(Json(ProfileView::compose(&profile, &user)))
}

async fn upload_avatar(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Json<ProfileView>> {
    let mut multipart = multipart.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
    let mut avatar = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some("avatar") {
            continue;
        }
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = field.bytes().await.map_err(multipart_error)?;

        if bytes.len() > MAX_AVATAR_BYTES {
            return Err(AppError::PayloadTooLarge("File size must be less than 2MB".to_string()));
        }
        avatar = Some(
            Avatar::new(bytes.to_vec(), &content_type)
                .map_err(|msg| ApiError::validation_single("avatar", msg))?,
        );
    }

    let avatar = avatar.ok_or_else(|| ApiError::validation_single("avatar", "No file uploaded"))?;
    let data_url = avatar.data_url();

    let user = state
        .store
        .update_identity_metadata(
            user.id,
            &IdentityMetadataUpdate {
                avatar_url: Some(data_url.clone()),
                avatar_updated_at: Some(Utc::now()),
                ..Default::default()
            },
        )
        .await?;
    let profile = state
        .store
        .update_profile(
            user.id,
            &ProfileUpdate {
                avatar_url: Some(data_url),
                ..Default::default()
            },
        )
        .await?;

    tracing::info!(user_id = %user.id, "Avatar updated");
    Ok(Json(ProfileView::compose(&profile, &user)))
}

async fn remove_avatar(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
) -> ApiResult<StatusCode> {
    state.store.remove_avatar(user.id).await?;
    Ok(StatusCode::NO_CONTENT)
}

fn multipart_error(err: axum::extract::multipart::MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge("File size must be less than 2MB".to_string())
    } else {
        AppError::BadRequest(err.body_text())
    }
}
