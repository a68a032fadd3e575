use axum::http::{Method, StatusCode};
use serde_json::json;

use crate::tests::helpers::{avatar_request, error_code};
use crate::tests::TestContext;
use speakerdrive_shared::profile::MAX_AVATAR_BYTES;

#[tokio::test]
async fn test_patch_profile_merges_fields() {
    let ctx = TestContext::new().await;
    let session = ctx.signup_fixture().await;

    let (status, body) = ctx
        .request(
            Method::PATCH,
            "/api/v1/profile",
            Some(&session.token),
            Some(json!({"services": ["Keynote Speaking"], "industries": ["Technology"]})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["services"], json!(["Keynote Speaking"]));

    let (_, body) = ctx
        .request(
            Method::PATCH,
            "/api/v1/profile",
            Some(&session.token),
            Some(json!({"display_name": "Jordan Blake"})),
        )
        .await;
    assert_eq!(body["display_name"], "Jordan Blake");
    // Earlier fields survive a later partial update
    assert_eq!(body["industries"], json!(["Technology"]));
}

#[tokio::test]
async fn test_profile_write_does_not_touch_identity() {
    let ctx = TestContext::new().await;
    let session = ctx.signup_fixture().await;

    ctx.request(
        Method::PATCH,
        "/api/v1/profile",
        Some(&session.token),
        Some(json!({"display_name": "Jordan Blake"})),
    )
    .await;

    let (_, user) = ctx
        .request(Method::GET, "/api/v1/auth/session", Some(&session.token), None)
        .await;
    assert_eq!(
        user["metadata"]["display_name"],
        session.user.metadata.display_name.unwrap()
    );
}

#[tokio::test]
async fn test_patch_profile_rejects_empty_and_invalid_updates() {
    let ctx = TestContext::new().await;
    let session = ctx.signup_fixture().await;

    let (status, _) = ctx
        .request(Method::PATCH, "/api/v1/profile", Some(&session.token), Some(json!({})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = ctx
        .request(
            Method::PATCH,
            "/api/v1/profile",
            Some(&session.token),
            Some(json!({"industries": ["A", "B", "C", "D"]})),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["details"]["industries"].is_array());
}

#[tokio::test]
async fn test_onboarding_writes_identity_and_profile() {
    let ctx = TestContext::new().await;
    let session = ctx.signup_fixture().await;

    let (status, body) = ctx
        .request(
            Method::POST,
            "/api/v1/profile/onboarding",
            Some(&session.token),
            Some(json!({
                "full_name": "Jordan Blake",
                "services": ["Keynote Speaking", "Workshops & Training"],
                "industries": ["Technology", "Healthcare"]
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["display_name"], "Jordan Blake");
    assert_eq!(body["industries"].as_array().unwrap().len(), 2);

    let (_, user) = ctx
        .request(Method::GET, "/api/v1/auth/session", Some(&session.token), None)
        .await;
    assert_eq!(user["metadata"]["display_name"], "Jordan Blake");
}

#[tokio::test]
async fn test_onboarding_validation() {
    let ctx = TestContext::new().await;
    let session = ctx.signup_fixture().await;

    let (status, body) = ctx
        .request(
            Method::POST,
            "/api/v1/profile/onboarding",
            Some(&session.token),
            Some(json!({"full_name": "J", "services": [], "industries": []})),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    for field in ["full_name", "services", "industries"] {
        assert!(body["details"][field].is_array(), "missing {}", field);
    }
}

#[tokio::test]
async fn test_avatar_upload_and_removal() {
    let ctx = TestContext::new().await;
    let session = ctx.signup_fixture().await;

    let (status, body) = ctx
        .send(avatar_request(&session.token, "image/gif", b"GIF89a"))
        .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    let avatar = body["avatar_url"].as_str().unwrap();
    assert!(avatar.starts_with("data:image/gif;base64,"));

    let (_, user) = ctx
        .request(Method::GET, "/api/v1/auth/session", Some(&session.token), None)
        .await;
    assert_eq!(user["metadata"]["avatar_url"], avatar);
    assert!(user["metadata"]["avatar_updated_at"].is_string());

    let (status, _) = ctx
        .request(Method::DELETE, "/api/v1/profile/avatar", Some(&session.token), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, body) = ctx
        .request(Method::GET, "/api/v1/profile", Some(&session.token), None)
        .await;
    assert!(body["avatar_url"].is_null());
}

#[tokio::test]
async fn test_avatar_rejects_non_images() {
    let ctx = TestContext::new().await;
    let session = ctx.signup_fixture().await;

    let (status, body) = ctx
        .send(avatar_request(&session.token, "application/pdf", b"%PDF-1.4"))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body["details"]["avatar"][0],
        "File must be an image (JPEG, PNG, or GIF)"
    );
}

#[tokio::test]
async fn test_avatar_rejects_oversize_files() {
    let ctx = TestContext::new().await;
    let session = ctx.signup_fixture().await;

    let data = vec![0u8; MAX_AVATAR_BYTES + 1];
    let (status, body) = ctx
        .send(avatar_request(&session.token, "image/png", &data))
        .await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(error_code(&body), "PAYLOAD_TOO_LARGE");
}
