use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::profile::Profile;
use crate::models::suggestion::{SuggestionRecord, UserFeedback};
use crate::models::user::{NewUser, User};
use crate::store::{ProfileStore, SuggestionStore, UserStore};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    /// Creation order; mentor lookups rely on it for stable ties.
    profiles: Vec<Profile>,
    suggestions: Vec<SuggestionRecord>,
}

/// Process-local store used when no database is configured, and by tests.
/// Every mutation runs under one write lock, so `activate` is atomic per process.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create_user(&self, new_user: NewUser) -> Result<(User, Profile), AppError> {
        let mut tables = self.tables.write();
        if tables
            .users
            .iter()
            .any(|u| u.email.eq_ignore_ascii_case(&new_user.email))
        {
            return Err(AppError::Conflict("User already exists".to_string()));
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            username: new_user.username,
            email: new_user.email,
            password_hash: new_user.password_hash,
            created_at: now,
        };
        let profile = Profile::empty(user.id, now);
        tables.users.push(user.clone());
        tables.profiles.push(profile.clone());
        Ok((user, profile))
    }

    async fn find_user(&self, user_id: Uuid) -> Result<Option<User>, AppError> {
        let tables = self.tables.read();
        Ok(tables.users.iter().find(|u| u.id == user_id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let tables = self.tables.read();
        Ok(tables
            .users
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }
}

#[async_trait]
impl ProfileStore for MemoryStore {
    async fn get_profile(&self, user_id: Uuid) -> Result<Option<Profile>, AppError> {
        let tables = self.tables.read();
        Ok(tables.profiles.iter().find(|p| p.user_id == user_id).cloned())
    }

    async fn save_profile(&self, profile: &Profile) -> Result<(), AppError> {
        let mut tables = self.tables.write();
        match tables
            .profiles
            .iter_mut()
            .find(|p| p.user_id == profile.user_id)
        {
            Some(existing) => *existing = profile.clone(),
            None => tables.profiles.push(profile.clone()),
        }
        Ok(())
    }

    async fn find_profiles_with_skill(
        &self,
        skill: &str,
        exclude_user: Uuid,
    ) -> Result<Vec<Profile>, AppError> {
        let tables = self.tables.read();
        Ok(tables
            .profiles
            .iter()
            .filter(|p| p.user_id != exclude_user && p.has_skill(skill))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl SuggestionStore for MemoryStore {
    async fn activate(&self, record: &SuggestionRecord) -> Result<(), AppError> {
        let mut tables = self.tables.write();
        for existing in tables
            .suggestions
            .iter_mut()
            .filter(|s| s.user_id == record.user_id)
        {
            existing.is_active = false;
        }
        let mut stored = record.clone();
        stored.is_active = true;
        tables.suggestions.push(stored);
        Ok(())
    }

    async fn find_active(&self, user_id: Uuid) -> Result<Option<SuggestionRecord>, AppError> {
        let tables = self.tables.read();
        Ok(tables
            .suggestions
            .iter()
            .rev()
            .find(|s| s.user_id == user_id && s.is_active)
            .cloned())
    }

    async fn deactivate(&self, user_id: Uuid, record_id: Uuid) -> Result<(), AppError> {
        let mut tables = self.tables.write();
        if let Some(record) = tables
            .suggestions
            .iter_mut()
            .find(|s| s.id == record_id && s.user_id == user_id)
        {
            record.is_active = false;
        }
        Ok(())
    }

    async fn set_feedback(
        &self,
        user_id: Uuid,
        record_id: Uuid,
        feedback: &UserFeedback,
    ) -> Result<bool, AppError> {
        let mut tables = self.tables.write();
        match tables
            .suggestions
            .iter_mut()
            .find(|s| s.id == record_id && s.user_id == user_id && s.is_active)
        {
            Some(record) => {
                record.user_feedback = Some(feedback.clone());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn history(&self, user_id: Uuid, limit: usize) -> Result<Vec<SuggestionRecord>, AppError> {
        let tables = self.tables.read();
        let mut records: Vec<SuggestionRecord> = tables
            .suggestions
            .iter()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect();
        // Insertion order breaks ties between identical timestamps.
        records.reverse();
        records.sort_by(|a, b| b.generated_at.cmp(&a.generated_at));
        records.truncate(limit);
        Ok(records)
    }
}
