use axum::http::{Method, StatusCode};

use crate::tests::helpers::error_code;
use crate::tests::{test_config, TestContext};

#[tokio::test]
async fn test_list_leads_hides_gated_values() {
    let ctx = TestContext::new().await;
    let session = ctx.signup_fixture().await;

    let (status, body) = ctx
        .request(Method::GET, "/api/v1/leads", Some(&session.token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["total"], 6);

    let leads = body["data"].as_array().unwrap();
    assert!(leads.iter().all(|l| l["unlock_value"].is_null()));
    assert!(leads.iter().all(|l| l["is_unlocked"] == false));
    // Newest first by default
    assert_eq!(leads[0]["id"], "4");
}

#[tokio::test]
async fn test_list_leads_applies_filters() {
    let ctx = TestContext::new().await;
    let session = ctx.signup_fixture().await;

    let (status, body) = ctx
        .request(
            Method::GET,
            "/api/v1/leads?lead_type=event&location=united",
            Some(&session.token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["id"].as_str().unwrap())
        .collect();
    // Crowe (Chicago, United States) and the FinTech Forum (United Kingdom)
    assert_eq!(ids, vec!["4", "6"]);

    let (_, body) = ctx
        .request(
            Method::GET,
            "/api/v1/leads?added_within=older",
            Some(&session.token),
            None,
        )
        .await;
    assert_eq!(body["meta"]["total"], 1);
    assert_eq!(body["data"][0]["name"], "Michael Chang");
}

#[tokio::test]
async fn test_list_leads_sorts_and_paginates() {
    let ctx = TestContext::new().await;
    let session = ctx.signup_fixture().await;

    let (status, body) = ctx
        .request(
            Method::GET,
            "/api/v1/leads?sort_by=name&sort_order=asc&per_page=2&page=2",
            Some(&session.token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["total"], 6);
    assert_eq!(body["meta"]["total_pages"], 3);
    let names: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Enterprise AI Summit", "Global FinTech Forum"]);
}

#[tokio::test]
async fn test_unlock_lead_four_returns_url() {
    let ctx = TestContext::new().await;
    let session = ctx.signup_fixture().await;

    let (status, body) = ctx
        .request(Method::POST, "/api/v1/leads/4/unlock", Some(&session.token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["unlocked"], true);
    let value = body["unlock_value"].as_str().unwrap();
    assert!(value.starts_with("https://"));
    assert!(!value.contains('@'));

    let (_, lead) = ctx
        .request(Method::GET, "/api/v1/leads/4", Some(&session.token), None)
        .await;
    assert_eq!(lead["is_unlocked"], true);
    assert_eq!(lead["unlock_value"], value);

    let (_, mine) = ctx
        .request(Method::GET, "/api/v1/leads/mine", Some(&session.token), None)
        .await;
    assert_eq!(mine["meta"]["total"], 1);
    assert_eq!(mine["data"][0]["id"], "4");
}

#[tokio::test]
async fn test_unlock_status_before_and_after() {
    let ctx = TestContext::new().await;
    let session = ctx.signup_fixture().await;

    let (status, body) = ctx
        .request(Method::GET, "/api/v1/leads/1/unlock", Some(&session.token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["unlocked"], false);
    assert!(body["unlock_value"].is_null());

    ctx.request(Method::POST, "/api/v1/leads/1/unlock", Some(&session.token), None)
        .await;

    let (_, body) = ctx
        .request(Method::GET, "/api/v1/leads/1/unlock", Some(&session.token), None)
        .await;
    assert_eq!(body["unlocked"], true);
    assert_eq!(body["unlock_value"], "david.chen@techcorp.com");
}

#[tokio::test]
async fn test_double_unlock_spends_one_credit() {
    let ctx = TestContext::new().await;
    let session = ctx.signup_fixture().await;

    let (_, first) = ctx
        .request(Method::POST, "/api/v1/leads/3/unlock", Some(&session.token), None)
        .await;
    let (status, second) = ctx
        .request(Method::POST, "/api/v1/leads/3/unlock", Some(&session.token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["credits_remaining"], 24);
    assert_eq!(second["credits_remaining"], 24);
    assert_eq!(first["unlocked_at"], second["unlocked_at"]);

    let (_, stats) = ctx
        .request(Method::GET, "/api/v1/dashboard", Some(&session.token), None)
        .await;
    assert_eq!(stats["credits_remaining"], 24);
    assert_eq!(stats["unlocked_leads"], 1);
}

#[tokio::test]
async fn test_unlock_without_credits_is_payment_required() {
    let config = crate::config::Config {
        default_unlock_credits: 0,
        ..test_config()
    };
    let ctx = TestContext::with_config(config).await;
    let session = ctx.signup_fixture().await;

    let (status, body) = ctx
        .request(Method::POST, "/api/v1/leads/2/unlock", Some(&session.token), None)
        .await;
    assert_eq!(status, StatusCode::PAYMENT_REQUIRED);
    assert_eq!(error_code(&body), "INSUFFICIENT_CREDITS");

    let (_, body) = ctx
        .request(Method::GET, "/api/v1/leads/2/unlock", Some(&session.token), None)
        .await;
    assert_eq!(body["unlocked"], false);
}

#[tokio::test]
async fn test_unknown_lead_is_not_found() {
    let ctx = TestContext::new().await;
    let session = ctx.signup_fixture().await;

    let (status, body) = ctx
        .request(Method::POST, "/api/v1/leads/99/unlock", Some(&session.token), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error_code(&body), "NOT_FOUND");
}

#[tokio::test]
async fn test_dashboard_stats() {
    let ctx = TestContext::new().await;
    let session = ctx.signup_fixture().await;

    let (status, stats) = ctx
        .request(Method::GET, "/api/v1/dashboard", Some(&session.token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["total_leads"], 6);
    assert_eq!(stats["contact_leads"], 3);
    assert_eq!(stats["event_leads"], 3);
    assert_eq!(stats["unlocked_leads"], 0);
    assert_eq!(stats["credits_remaining"], 25);
    assert_eq!(stats["added_last_week"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_page_far_past_the_end_is_empty() {
    let ctx = TestContext::new().await;
    let session = ctx.signup_fixture().await;

    for path in ["/api/v1/leads", "/api/v1/leads/mine"] {
        let uri = format!("{}?page={}&per_page=100", path, usize::MAX);
        let (status, body) = ctx.request(Method::GET, &uri, Some(&session.token), None).await;
        assert_eq!(status, StatusCode::OK, "{}: {}", path, body);
        assert!(body["data"].as_array().unwrap().is_empty());
        assert_eq!(body["meta"]["has_next"], false);
    }
}

#[tokio::test]
async fn test_blank_filter_values_match_everything() {
    let ctx = TestContext::new().await;
    let session = ctx.signup_fixture().await;

    let (status, body) = ctx
        .request(
            Method::GET,
            "/api/v1/leads?lead_type=&unlock_type=&added_within=&search=&industry=",
            Some(&session.token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["meta"]["total"], 6);
}

#[tokio::test]
async fn test_unknown_filter_value_uses_error_envelope() {
    let ctx = TestContext::new().await;
    let session = ctx.signup_fixture().await;

    let (status, body) = ctx
        .request(
            Method::GET,
            "/api/v1/leads?lead_type=webinar",
            Some(&session.token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "BAD_REQUEST");
    assert!(body["message"].as_str().unwrap().contains("webinar"));
    assert!(body["timestamp"].is_string());
}
