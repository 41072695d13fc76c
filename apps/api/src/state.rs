use std::sync::Arc;

use crate::auth::token::TokenIssuer;
use crate::config::Config;
use crate::llm_client::SuggestionProvider;
use crate::store::{ProfileStore, SuggestionStore, UserStore};
use crate::suggestion::mentors::MentorScorer;

/// Shared application state injected into all route handlers via Axum extractors.
/// Every capability is a trait object so tests can run on the in-memory store
/// and a scripted provider.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub profiles: Arc<dyn ProfileStore>,
    pub suggestions: Arc<dyn SuggestionStore>,
    pub provider: Arc<dyn SuggestionProvider>,
    /// Default: ExperienceMentorScorer.
    pub mentor_scorer: Arc<dyn MentorScorer>,
    pub tokens: TokenIssuer,
    pub config: Config,
}
