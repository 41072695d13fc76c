//! Runs the four generators for one user and persists the result as the user's
//! single active `SuggestionRecord`.
//!
//! Each generator is isolated: a provider error, a timeout or a missing prerequisite
//! is logged and that generator contributes an empty list. Only a missing profile or a
//! persistence failure fails the whole run.

use std::time::Duration;

use chrono::Utc;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::llm_client::{LlmError, SuggestionProvider};
use crate::models::profile::Profile;
use crate::models::suggestion::{
    CompanySuggestion, JobRoleSuggestion, MentorSuggestion, SkillSuggestion, SuggestionRecord,
};
use crate::state::AppState;
use crate::store::{ProfileStore, SuggestionStore};
use crate::suggestion::companies::{build_company_prompt, parse_company_response};
use crate::suggestion::jobs::{build_job_role_prompt, parse_job_role_response};
use crate::suggestion::mentors::{suggest_mentors, MentorScorer};
use crate::suggestion::skills::{build_skill_prompt, parse_skill_response};

#[derive(Debug, Error)]
enum GeneratorError {
    #[error(transparent)]
    Provider(#[from] LlmError),

    #[error("missing prerequisite: {0}")]
    MissingPrerequisite(&'static str),

    #[error(transparent)]
    Store(#[from] AppError),
}

/// Borrowed view of the capabilities one generation run needs.
pub struct SuggestionPipeline<'a> {
    pub profiles: &'a dyn ProfileStore,
    pub suggestions: &'a dyn SuggestionStore,
    pub provider: &'a dyn SuggestionProvider,
    pub mentor_scorer: &'a dyn MentorScorer,
    pub provider_timeout: Duration,
    pub ttl: chrono::Duration,
}

impl<'a> SuggestionPipeline<'a> {
    pub fn from_state(state: &'a AppState) -> Self {
        Self {
            profiles: state.profiles.as_ref(),
            suggestions: state.suggestions.as_ref(),
            provider: state.provider.as_ref(),
            mentor_scorer: state.mentor_scorer.as_ref(),
            provider_timeout: Duration::from_secs(state.config.provider_timeout_secs),
            ttl: chrono::Duration::days(state.config.suggestion_ttl_days),
        }
    }

    pub async fn generate_suggestions(&self, user_id: Uuid) -> Result<SuggestionRecord, AppError> {
        let profile = self
            .profiles
            .get_profile(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Profile for user {user_id} not found")))?;

        // Skills feed mentors and job roles feed companies; the two chains are independent.
        let ((suggested_skills, mentor_suggestions), (suggested_job_roles, suggested_companies)) = tokio::join!(
            async {
                let skills = settle(user_id, "skills", self.generate_skills(&profile).await);
                let mentors = settle(
                    user_id,
                    "mentors",
                    self.generate_mentors(&profile, &skills).await,
                );
                (skills, mentors)
            },
            async {
                let roles = settle(
                    user_id,
                    "job roles",
                    self.generate_job_roles(&profile).await,
                );
                let companies = settle(
                    user_id,
                    "companies",
                    self.generate_companies(&profile, &roles).await,
                );
                (roles, companies)
            },
        );

        let now = Utc::now();
        let record = SuggestionRecord {
            id: Uuid::new_v4(),
            user_id,
            suggested_skills,
            suggested_job_roles,
            suggested_companies,
            mentor_suggestions,
            generated_at: now,
            expires_at: now + self.ttl,
            is_active: true,
            user_feedback: None,
        };

        self.suggestions.activate(&record).await?;
        info!(
            "Generated suggestions for user {user_id}: {} skills, {} job roles, {} companies, {} mentor groups",
            record.suggested_skills.len(),
            record.suggested_job_roles.len(),
            record.suggested_companies.len(),
            record.mentor_suggestions.len()
        );
        Ok(record)
    }

    /// One provider call bounded by the configured timeout.
    async fn ask(&self, prompt: &str) -> Result<String, LlmError> {
        match tokio::time::timeout(self.provider_timeout, self.provider.generate(prompt)).await {
            Ok(result) => result,
            Err(_) => Err(LlmError::Timeout {
                secs: self.provider_timeout.as_secs(),
            }),
        }
    }

    async fn generate_skills(&self, profile: &Profile) -> Result<Vec<SkillSuggestion>, GeneratorError> {
        let raw = self.ask(&build_skill_prompt(profile)).await?;
        Ok(parse_skill_response(&raw))
    }

    async fn generate_job_roles(
        &self,
        profile: &Profile,
    ) -> Result<Vec<JobRoleSuggestion>, GeneratorError> {
        let raw = self.ask(&build_job_role_prompt(profile)).await?;
        Ok(parse_job_role_response(&raw))
    }

    async fn generate_companies(
        &self,
        profile: &Profile,
        job_roles: &[JobRoleSuggestion],
    ) -> Result<Vec<CompanySuggestion>, GeneratorError> {
        if job_roles.is_empty() {
            return Err(GeneratorError::MissingPrerequisite("no job roles to base companies on"));
        }
        let raw = self.ask(&build_company_prompt(profile, job_roles)).await?;
        Ok(parse_company_response(&raw))
    }

    async fn generate_mentors(
        &self,
        profile: &Profile,
        skills: &[SkillSuggestion],
    ) -> Result<Vec<MentorSuggestion>, GeneratorError> {
        if skills.is_empty() {
            return Err(GeneratorError::MissingPrerequisite("no skills to find mentors for"));
        }
        Ok(suggest_mentors(self.profiles, self.mentor_scorer, profile.user_id, skills).await?)
    }
}

/// Collapses a generator failure into an empty list.
fn settle<T>(user_id: Uuid, kind: &str, result: Result<Vec<T>, GeneratorError>) -> Vec<T> {
    match result {
        Ok(items) => items,
        Err(e) => {
            warn!("{kind} generation failed for user {user_id}: {e}");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;
    use crate::store::UserStore;
    use crate::suggestion::mentors::ExperienceMentorScorer;
    use crate::models::user::NewUser;
    use crate::test_support::{
        full_provider, StubProvider, StubReply, COMPANIES_JSON, COMPANIES_NEEDLE, JOB_ROLES_NEEDLE,
        SKILLS_JSON, SKILLS_NEEDLE,
    };

    async fn seeded_store() -> (MemoryStore, Uuid) {
        let store = MemoryStore::new();
        let (user, mut profile) = store
            .create_user(NewUser {
                username: "learner".to_string(),
                email: "learner@example.com".to_string(),
                password_hash: "hash".to_string(),
            })
            .await
            .unwrap();
        profile.current_skills = vec!["Python".to_string()];
        profile.target_skills = vec!["Rust".to_string()];
        store.save_profile(&profile).await.unwrap();

        let (_, mut mentor) = store
            .create_user(NewUser {
                username: "mentor".to_string(),
                email: "mentor@example.com".to_string(),
                password_hash: "hash".to_string(),
            })
            .await
            .unwrap();
        mentor.current_skills = vec!["rust".to_string()];
        store.save_profile(&mentor).await.unwrap();

        (store, user.id)
    }

    fn pipeline<'a>(store: &'a MemoryStore, provider: &'a StubProvider) -> SuggestionPipeline<'a> {
        SuggestionPipeline {
            profiles: store,
            suggestions: store,
            provider,
            mentor_scorer: &ExperienceMentorScorer,
            provider_timeout: Duration::from_secs(30),
            ttl: chrono::Duration::days(30),
        }
    }

    #[tokio::test]
    async fn test_full_generation_populates_every_kind() {
        let (store, user_id) = seeded_store().await;
        let provider = full_provider();

        let record = pipeline(&store, &provider)
            .generate_suggestions(user_id)
            .await
            .unwrap();

        assert!(record.is_active);
        assert_eq!(record.expires_at - record.generated_at, chrono::Duration::days(30));
        assert!(!record.suggested_skills.is_empty());
        assert!(!record.suggested_job_roles.is_empty());
        assert!(!record.suggested_companies.is_empty());
        assert_eq!(record.mentor_suggestions.len(), 1);
        assert_eq!(record.mentor_suggestions[0].skill, "Rust");
        assert!(record.mentor_suggestions[0]
            .mentors
            .iter()
            .all(|m| m.user_id != user_id));
    }

    #[tokio::test]
    async fn test_failed_job_generator_leaves_others_populated() {
        let (store, user_id) = seeded_store().await;
        let provider = StubProvider::new()
            .on(SKILLS_NEEDLE, StubReply::Text(SKILLS_JSON.to_string()))
            .on(JOB_ROLES_NEEDLE, StubReply::Fail(500))
            .on(COMPANIES_NEEDLE, StubReply::Text(COMPANIES_JSON.to_string()));

        let record = pipeline(&store, &provider)
            .generate_suggestions(user_id)
            .await
            .unwrap();

        assert!(!record.suggested_skills.is_empty());
        assert!(record.suggested_job_roles.is_empty());
        // No job roles means no company prompt is ever sent.
        assert!(record.suggested_companies.is_empty());
        assert!(provider
            .calls()
            .iter()
            .all(|prompt| !prompt.contains(COMPANIES_NEEDLE)));
        assert!(!record.mentor_suggestions.is_empty());
        assert!(store.find_active(user_id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_unparseable_skills_skip_mentor_matching() {
        let (store, user_id) = seeded_store().await;
        let provider = full_provider().on(
            SKILLS_NEEDLE,
            StubReply::Text("I'm sorry, I cannot help with that.".to_string()),
        );

        let record = pipeline(&store, &provider)
            .generate_suggestions(user_id)
            .await
            .unwrap();

        assert!(record.suggested_skills.is_empty());
        assert!(record.mentor_suggestions.is_empty());
        assert!(!record.suggested_job_roles.is_empty());
    }

    #[tokio::test]
    async fn test_regeneration_keeps_one_active_record() {
        let (store, user_id) = seeded_store().await;
        let provider = full_provider();
        let pipeline = pipeline(&store, &provider);

        let first = pipeline.generate_suggestions(user_id).await.unwrap();
        let second = pipeline.generate_suggestions(user_id).await.unwrap();

        let history = store.history(user_id, 10).await.unwrap();
        assert_eq!(history.len(), 2);
        let active: Vec<_> = history.iter().filter(|r| r.is_active).collect();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, second.id);
        assert_ne!(first.id, second.id);
    }

    #[tokio::test]
    async fn test_missing_profile_persists_nothing() {
        let store = MemoryStore::new();
        let provider = full_provider();
        let stranger = Uuid::new_v4();

        let err = pipeline(&store, &provider)
            .generate_suggestions(stranger)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
        assert!(provider.calls().is_empty());
        assert!(store.history(stranger, 10).await.unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_hanging_provider_times_out_per_generator() {
        let (store, user_id) = seeded_store().await;
        let provider = full_provider().on(SKILLS_NEEDLE, StubReply::Hang);

        let record = pipeline(&store, &provider)
            .generate_suggestions(user_id)
            .await
            .unwrap();

        assert!(record.suggested_skills.is_empty());
        assert!(record.mentor_suggestions.is_empty());
        assert!(!record.suggested_job_roles.is_empty());
        assert!(!record.suggested_companies.is_empty());
    }
}
