use axum::{
    http::{HeaderValue, Method},
    routing::get,
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod auth;
mod config;
mod database;
mod error;
mod extract;
mod handlers;
mod integrations;
mod pagination;
mod services;
mod store;
mod validation;

use config::{Config, StoreBackend};
use integrations::{ChatbotClient, EmailFinderClient};
use services::leads::LeadService;
use speakerdrive_shared::{Catalog, PromptLibrary};
use store::{MemoryStore, PgStore, Store};

#[cfg(test)]
mod tests;

pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn Store>,
    pub jwt: auth::jwt::JwtKeys,
    pub leads: LeadService,
    pub catalog: Catalog,
    pub prompts: PromptLibrary,
    pub email_finder: EmailFinderClient,
    pub chatbot: ChatbotClient,
}

impl AppState {
    pub fn new(
        config: Config,
        store: Arc<dyn Store>,
        catalog: Catalog,
        prompts: PromptLibrary,
    ) -> Self {
        Self {
            jwt: auth::jwt::JwtKeys::from_config(&config),
            leads: LeadService::new(store.clone()),
            email_finder: EmailFinderClient::new(&config.email_finder),
            chatbot: ChatbotClient::new(&config.chatbot),
            store,
            catalog,
            prompts,
            config,
        }
    }
}

fn cors_layer(config: &Config) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers(Any);

    match config
        .cors_allow_origin
        .as_deref()
        .and_then(|origin| HeaderValue::from_str(origin).ok())
    {
        Some(origin) => cors.allow_origin(origin),
        None => cors.allow_origin(Any),
    }
}

pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.config);

    Router::new()
        .route("/", get(|| async { "SpeakerDrive API v1.0.0" }))
        .route("/health", get(handlers::health_check))
        .route("/api/v1/dashboard", get(handlers::dashboard_stats))
        .nest("/api/v1/auth", auth::auth_routes())
        .nest("/api/v1/profile", handlers::profile_routes())
        .nest("/api/v1/leads", handlers::lead_routes())
        .nest("/api/v1/catalog", handlers::catalog_routes())
        .nest("/api/v1/prompts", handlers::prompt_routes())
        .nest("/api/v1/contact-finder", integrations::contact_finder_routes())
        .nest("/api/v1/chat", integrations::chat_routes())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

async fn open_store(config: &Config) -> anyhow::Result<Arc<dyn Store>> {
    match config.store_backend {
        StoreBackend::Postgres => {
            let pool = database::create_pool(&config.database).await?;
            database::migrate(&pool).await?;
            Ok(Arc::new(PgStore::new(pool)))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store; data is lost on restart");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    let catalog = config.load_catalog()?;
    let prompts = config.load_prompts()?;
    let store = open_store(&config).await?;

    if config.seed_demo_leads {
        store::seed::seed_demo_leads(store.as_ref()).await?;
    }

    if !config.email_finder.is_configured() {
        tracing::warn!("EMAIL_FINDER_API_KEY not set; contact finder is disabled");
    }
    if !config.chatbot.is_configured() {
        tracing::warn!("CHAT_WEBHOOK_URL not set; chat is disabled");
    }

    let server_addr = config.server_addr.clone();
    let app = build_router(Arc::new(AppState::new(config, store, catalog, prompts)));

    let listener = tokio::net::TcpListener::bind(&server_addr).await?;
    tracing::info!("Server running on {}", server_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
