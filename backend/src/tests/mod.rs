pub mod helpers;
pub mod integration;
pub mod unit;

// Shared setup: the full router over an in-memory store seeded with the demo leads
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

use crate::config::{Config, StoreBackend};
use crate::store::{MemoryStore, Store};
use crate::{build_router, AppState};
use speakerdrive_shared::{AuthResponse, Catalog, PromptLibrary};

pub const TEST_PASSWORD: &str = "speakerdrive-test";

pub fn test_config() -> Config {
    Config {
        jwt_secret: "test_secret_key_for_testing_only".to_string(),
        store_backend: StoreBackend::Memory,
        ..Config::default()
    }
}

pub struct TestContext {
    pub state: Arc<AppState>,
    pub store: Arc<MemoryStore>,
}

impl TestContext {
    pub async fn new() -> Self {
        Self::with_config(test_config()).await
    }

    pub async fn with_config(config: Config) -> Self {
        let store = Arc::new(MemoryStore::new());
        crate::store::seed::seed_demo_leads(store.as_ref())
            .await
            .expect("Failed to seed demo leads");

        let dyn_store: Arc<dyn Store> = store.clone();
        let state = Arc::new(AppState::new(
            config,
            dyn_store,
            Catalog::default(),
            PromptLibrary::default(),
        ));

        Self { state, store }
    }

    pub fn app(&self) -> Router {
        build_router(self.state.clone())
    }

    /// Send a request through the router; returns the status and the JSON body
    /// (`Value::Null` when the body is empty).
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&json).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.send(request).await
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.app().oneshot(request).await.unwrap();
        helpers::read_json(response).await
    }

    /// Register a fresh account and return its session.
    pub async fn signup(&self, email: &str) -> AuthResponse {
        let (status, body) = self
            .request(
                Method::POST,
                "/api/v1/auth/signup",
                None,
                Some(serde_json::json!({"email": email, "password": TEST_PASSWORD})),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "signup failed: {}", body);
        serde_json::from_value(body).unwrap()
    }

    pub async fn signup_fixture(&self) -> AuthResponse {
        self.signup(&fixtures::SignupFixture::default().email).await
    }
}
