//! Shared fixtures for unit and HTTP tests: a scripted provider, canned provider
//! replies and an in-memory `AppState`.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::auth::token::TokenIssuer;
use crate::config::Config;
use crate::llm_client::{LlmError, SuggestionProvider, DEFAULT_MODEL};
use crate::state::AppState;
use crate::store::memory::MemoryStore;
use crate::suggestion::mentors::ExperienceMentorScorer;

/// Substrings that identify which generator sent a prompt.
pub const SKILLS_NEEDLE: &str = "suggest 5 skills";
pub const JOB_ROLES_NEEDLE: &str = "suggest 5 job roles";
pub const COMPANIES_NEEDLE: &str = "company suggestions";

pub const SKILLS_JSON: &str = r#"[
  {
    "skill": "Rust",
    "reason": "career_progression",
    "marketDemand": 88,
    "difficultyLevel": "advanced",
    "estimatedTimeToLearn": 120,
    "relatedCourses": [
      {"title": "The Rust Book", "platform": "rust-lang.org", "url": "https://doc.rust-lang.org/book/", "rating": 4.9}
    ]
  },
  {
    "skill": "Docker",
    "reason": "market trend",
    "marketDemand": "75",
    "difficultyLevel": "Beginner",
    "estimatedTimeToLearn": 20,
    "relatedCourses": []
  }
]"#;

pub const JOB_ROLES_JSON: &str = r#"```json
[
  {
    "title": "Backend Engineer",
    "matchScore": 72,
    "skillsMatch": [
      {"skill": "Python", "status": "have"},
      {"skill": "Rust", "status": "missing"}
    ],
    "avgSalary": {"amount": 120000, "currency": "USD"},
    "growthPotential": 85,
    "popularCompanies": [{"name": "Cloudflare"}]
  }
]
```"#;

pub const COMPANIES_JSON: &str = r#"[
  {
    "name": "Cloudflare",
    "reason": "Heavy Rust usage in edge services",
    "matchScore": 81,
    "workCulture": "Remote-friendly, engineering driven",
    "companySize": "large",
    "locations": ["San Francisco", "London"]
  }
]"#;

pub enum StubReply {
    Text(String),
    /// Fails with an API error carrying this status.
    Fail(u16),
    /// Never answers within any reasonable timeout.
    Hang,
}

/// Provider that answers by matching the prompt against registered needles.
/// Later registrations win. Unmatched prompts yield `EmptyContent`.
pub struct StubProvider {
    rules: Vec<(&'static str, StubReply)>,
    calls: Mutex<Vec<String>>,
}

impl StubProvider {
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn on(mut self, needle: &'static str, reply: StubReply) -> Self {
        self.rules.push((needle, reply));
        self
    }

    /// Every prompt received so far, in arrival order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl SuggestionProvider for StubProvider {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        self.calls.lock().push(prompt.to_string());
        let rule = self
            .rules
            .iter()
            .rev()
            .find(|(needle, _)| prompt.contains(needle));
        match rule.map(|(_, reply)| reply) {
            Some(StubReply::Text(text)) => Ok(text.clone()),
            Some(StubReply::Fail(status)) => Err(LlmError::Api {
                status: *status,
                message: "stubbed failure".to_string(),
            }),
            Some(StubReply::Hang) => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Err(LlmError::EmptyContent)
            }
            None => Err(LlmError::EmptyContent),
        }
    }
}

pub fn test_config() -> Config {
    Config {
        database_url: None,
        gemini_api_key: "test-key".to_string(),
        gemini_model: DEFAULT_MODEL.to_string(),
        jwt_secret: "test-secret".to_string(),
        token_ttl_secs: 3600,
        provider_timeout_secs: 30,
        suggestion_ttl_days: 30,
        // bcrypt's minimum; keeps tests fast.
        bcrypt_cost: 4,
        port: 0,
        rust_log: "info".to_string(),
    }
}

/// `AppState` over a fresh in-memory store. The store is returned too so tests can
/// seed or inspect it directly.
pub fn test_state(provider: StubProvider) -> (AppState, Arc<MemoryStore>) {
    let config = test_config();
    let store = Arc::new(MemoryStore::new());
    let state = AppState {
        users: store.clone(),
        profiles: store.clone(),
        suggestions: store.clone(),
        provider: Arc::new(provider),
        mentor_scorer: Arc::new(ExperienceMentorScorer),
        tokens: TokenIssuer::new(&config.jwt_secret, config.token_ttl_secs),
        config,
    };
    (state, store)
}

/// A provider that answers all three generators with the canned replies above.
pub fn full_provider() -> StubProvider {
    StubProvider::new()
        .on(SKILLS_NEEDLE, StubReply::Text(SKILLS_JSON.to_string()))
        .on(JOB_ROLES_NEEDLE, StubReply::Text(JOB_ROLES_JSON.to_string()))
        .on(COMPANIES_NEEDLE, StubReply::Text(COMPANIES_JSON.to_string()))
}
