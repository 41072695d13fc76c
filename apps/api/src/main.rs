mod auth;
mod config;
mod db;
mod errors;
mod llm_client;
mod models;
mod routes;
mod state;
mod store;
mod suggestion;
#[cfg(test)]
mod test_support;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::auth::token::TokenIssuer;
use crate::config::Config;
use crate::db::create_pool;
use crate::llm_client::GeminiClient;
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::memory::MemoryStore;
use crate::store::postgres::PgStore;
use crate::store::{ProfileStore, SuggestionStore, UserStore};
use crate::suggestion::mentors::ExperienceMentorScorer;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting SkillSwap API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize persistence
    let (users, profiles, suggestions) = match &config.database_url {
        Some(url) => split_store(Arc::new(PgStore::new(create_pool(url).await?))),
        None => {
            warn!("DATABASE_URL is not set; using the in-memory store. Data is lost on restart.");
            split_store(Arc::new(MemoryStore::new()))
        }
    };

    // Initialize suggestion provider
    let provider = GeminiClient::new(
        config.gemini_api_key.clone(),
        config.gemini_model.clone(),
        Duration::from_secs(config.provider_timeout_secs),
    )?;
    info!("Suggestion provider initialized (model: {})", provider.model());

    // Build app state
    let state = AppState {
        users,
        profiles,
        suggestions,
        provider: Arc::new(provider),
        mentor_scorer: Arc::new(ExperienceMentorScorer),
        tokens: TokenIssuer::new(&config.jwt_secret, config.token_ttl_secs),
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

type Stores = (
    Arc<dyn UserStore>,
    Arc<dyn ProfileStore>,
    Arc<dyn SuggestionStore>,
);

/// One backend serves all three store seams.
fn split_store<S>(store: Arc<S>) -> Stores
where
    S: UserStore + ProfileStore + SuggestionStore + 'static,
{
    let users: Arc<dyn UserStore> = store.clone();
    let profiles: Arc<dyn ProfileStore> = store.clone();
    let suggestions: Arc<dyn SuggestionStore> = store;
    (users, profiles, suggestions)
}
