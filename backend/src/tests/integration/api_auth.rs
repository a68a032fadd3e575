use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use serde_json::json;

use crate::tests::fixtures::SignupFixture;
use crate::tests::helpers::error_code;
use crate::tests::{TestContext, TEST_PASSWORD};

#[tokio::test]
async fn test_signup_creates_session_and_profile() {
    let ctx = TestContext::new().await;
    let session = ctx.signup("Austin@SpeakerDrive.com").await;

    assert_eq!(session.user.email, "austin@speakerdrive.com");
    assert_eq!(session.user.metadata.display_name.as_deref(), Some("austin"));
    assert_eq!(session.user.metadata.user_role, "Owner");

    let (status, body) = ctx
        .request(Method::GET, "/api/v1/profile", Some(&session.token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["display_name"], "austin");
    assert_eq!(body["email"], "austin@speakerdrive.com");
}

#[tokio::test]
async fn test_signup_validation_errors() {
    let ctx = TestContext::new().await;
    let (status, body) = ctx
        .request(
            Method::POST,
            "/api/v1/auth/signup",
            None,
            Some(json!({"email": "not-an-email", "password": "short"})),
        )
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(error_code(&body), "VALIDATION_ERROR");
    assert!(body["details"]["email"].is_array());
    assert!(body["details"]["password"].is_array());
}

#[tokio::test]
async fn test_duplicate_signup_conflicts() {
    let ctx = TestContext::new().await;
    let email = SignupFixture::default().email;
    ctx.signup(&email).await;

    let (status, body) = ctx
        .request(
            Method::POST,
            "/api/v1/auth/signup",
            None,
            Some(json!({"email": email, "password": TEST_PASSWORD})),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error_code(&body), "CONFLICT");
}

#[tokio::test]
async fn test_login_and_session() {
    let ctx = TestContext::new().await;
    let email = SignupFixture::default().email;
    ctx.signup(&email).await;

    let (status, body) = ctx
        .request(
            Method::POST,
            "/api/v1/auth/login",
            None,
            Some(json!({"email": email, "password": TEST_PASSWORD})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let token = body["token"].as_str().unwrap().to_string();

    let (status, body) = ctx
        .request(Method::GET, "/api/v1/auth/session", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], email.to_lowercase());

    let (status, body) = ctx
        .request(Method::POST, "/api/v1/auth/refresh", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["token"].is_string());

    let (status, _) = ctx
        .request(Method::POST, "/api/v1/auth/logout", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_unknown_email_is_invalid_credentials() {
    let ctx = TestContext::new().await;
    let (status, body) = ctx
        .request(
            Method::POST,
            "/api/v1/auth/login",
            None,
            Some(json!({"email": "nobody@example.com", "password": TEST_PASSWORD})),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(&body), "INVALID_CREDENTIALS");
}

#[tokio::test]
async fn test_account_locks_after_five_failures() {
    let ctx = TestContext::new().await;
    let email = SignupFixture::default().email;
    ctx.signup(&email).await;

    for _ in 0..5 {
        let (status, _) = ctx
            .request(
                Method::POST,
                "/api/v1/auth/login",
                None,
                Some(json!({"email": email, "password": "wrong-password"})),
            )
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    // Even the right password is refused while locked
    let (status, body) = ctx
        .request(
            Method::POST,
            "/api/v1/auth/login",
            None,
            Some(json!({"email": email, "password": TEST_PASSWORD})),
        )
        .await;
    assert_eq!(status, StatusCode::LOCKED);
    assert_eq!(error_code(&body), "ACCOUNT_LOCKED");
    assert!(body["details"]["locked_until"].is_array());
}

#[tokio::test]
async fn test_requests_without_valid_token_are_rejected() {
    let ctx = TestContext::new().await;

    let (status, body) = ctx.request(Method::GET, "/api/v1/leads", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(&body), "UNAUTHORIZED");

    let (status, _) = ctx
        .request(Method::GET, "/api/v1/leads", Some("garbage"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_update_user_metadata_merges() {
    let ctx = TestContext::new().await;
    let session = ctx.signup_fixture().await;

    let (status, body) = ctx
        .request(
            Method::PATCH,
            "/api/v1/auth/user",
            Some(&session.token),
            Some(json!({"display_name": "Jordan Blake"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["metadata"]["display_name"], "Jordan Blake");
    assert_eq!(body["metadata"]["user_type"], "Client");
}

#[tokio::test]
async fn test_malformed_bodies_use_error_envelope() {
    let ctx = TestContext::new().await;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"email\": "))
        .unwrap();
    let (status, body) = ctx.send(request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "BAD_REQUEST");
    assert!(body["timestamp"].is_string());

    let (status, body) = ctx
        .request(
            Method::POST,
            "/api/v1/auth/login",
            None,
            Some(json!({"email": "jordan@example.com"})),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(error_code(&body), "VALIDATION_ERROR");
    assert!(body["details"]["body"][0].as_str().unwrap().contains("password"));

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/auth/login")
        .body(Body::from("email=jordan"))
        .unwrap();
    let (status, body) = ctx.send(request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "BAD_REQUEST");
}
