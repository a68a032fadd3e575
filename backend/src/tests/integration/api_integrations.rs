use axum::http::{Method, StatusCode};
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::config::{ChatbotConfig, Config, EmailFinderConfig};
use crate::tests::helpers::error_code;
use crate::tests::{test_config, TestContext};

fn config_with(server: &MockServer) -> Config {
    Config {
        email_finder: EmailFinderConfig {
            base_url: server.uri(),
            api_key: Some("finder-key".to_string()),
        },
        chatbot: ChatbotConfig {
            webhook_url: Some(format!("{}/webhook/ai-data", server.uri())),
            username: "webhook-user".to_string(),
            password: "webhook-pass".to_string(),
        },
        ..test_config()
    }
}

#[tokio::test]
async fn test_contact_finder_manual_search() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/email/finder"))
        .and(header("x-api-key", "finder-key"))
        .and(query_param("query", "Tiffany Hiscock"))
        .and(query_param("company_domain", "crowe.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "email": "tiffany.hiscock@crowe.com",
            "full_name": "Tiffany Hiscock",
            "domain": "crowe.com",
            "status": "valid"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let ctx = TestContext::with_config(config_with(&server)).await;
    let session = ctx.signup_fixture().await;

    let (status, body) = ctx
        .request(
            Method::POST,
            "/api/v1/contact-finder/search",
            Some(&session.token),
            Some(json!({
                "mode": "manual",
                "full_name": "Tiffany Hiscock",
                "company_domain": "crowe.com"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["email"], "tiffany.hiscock@crowe.com");
    assert_eq!(body["company_domain"], "crowe.com");
}

#[tokio::test]
async fn test_contact_finder_upstream_failure_is_bad_gateway() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/email/finder"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let ctx = TestContext::with_config(config_with(&server)).await;
    let session = ctx.signup_fixture().await;

    let (status, body) = ctx
        .request(
            Method::POST,
            "/api/v1/contact-finder/search",
            Some(&session.token),
            Some(json!({"mode": "linkedin", "linkedin_url": "https://www.linkedin.com/in/davidchen"})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(error_code(&body), "EXTERNAL_SERVICE_ERROR");
    // Upstream body stays in the logs
    assert!(!body["message"].as_str().unwrap().contains("boom"));
}

#[tokio::test]
async fn test_contact_finder_without_key_is_unavailable() {
    let ctx = TestContext::new().await;
    let session = ctx.signup_fixture().await;

    let (status, body) = ctx
        .request(
            Method::POST,
            "/api/v1/contact-finder/search",
            Some(&session.token),
            Some(json!({"mode": "manual", "full_name": "David Chen", "company_domain": "techcorp.com"})),
        )
        .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(error_code(&body), "EXTERNAL_SERVICE_ERROR");
}

#[tokio::test]
async fn test_contact_finder_validates_input() {
    let ctx = TestContext::new().await;
    let session = ctx.signup_fixture().await;

    let (status, body) = ctx
        .request(
            Method::POST,
            "/api/v1/contact-finder/search",
            Some(&session.token),
            Some(json!({"mode": "manual", "full_name": "", "company_domain": "techcorp"})),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["details"]["full_name"].is_array());
    assert!(body["details"]["company_domain"].is_array());
}

#[tokio::test]
async fn test_chat_forwards_message_with_credentials() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/webhook/ai-data"))
        .and(query_param("message", "Who should I pitch?"))
        .and(header("Username", "webhook-user"))
        .and(header("Password", "webhook-pass"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"response": "Start with Crowe."})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let ctx = TestContext::with_config(config_with(&server)).await;
    let session = ctx.signup_fixture().await;

    let (status, body) = ctx
        .request(
            Method::POST,
            "/api/v1/chat",
            Some(&session.token),
            Some(json!({"message": "Who should I pitch?"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["response"], "Start with Crowe.");
    assert_eq!(body["status"], 200);
}

#[tokio::test]
async fn test_chat_rejects_blank_message() {
    let ctx = TestContext::new().await;
    let session = ctx.signup_fixture().await;

    let (status, _) = ctx
        .request(
            Method::POST,
            "/api/v1/chat",
            Some(&session.token),
            Some(json!({"message": "   "})),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}
