//! Persistence seams. Handlers and the suggestion pipeline only see these traits;
//! `AppState` carries them as `Arc<dyn ...>` so the backend is chosen at startup.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::profile::Profile;
use crate::models::suggestion::{SuggestionRecord, UserFeedback};
use crate::models::user::{NewUser, User};

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Creates the user together with its empty profile.
    /// A duplicate email fails with `AppError::Conflict`.
    async fn create_user(&self, new_user: NewUser) -> Result<(User, Profile), AppError>;

    async fn find_user(&self, user_id: Uuid) -> Result<Option<User>, AppError>;

    /// Emails are stored lowercased; callers pass the normalized form.
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
}

#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn get_profile(&self, user_id: Uuid) -> Result<Option<Profile>, AppError>;

    /// Inserts or replaces the profile owned by `profile.user_id`.
    async fn save_profile(&self, profile: &Profile) -> Result<(), AppError>;

    /// Profiles whose current skills contain `skill` (case-insensitive), excluding
    /// `exclude_user`, in creation order.
    async fn find_profiles_with_skill(
        &self,
        skill: &str,
        exclude_user: Uuid,
    ) -> Result<Vec<Profile>, AppError>;
}

#[async_trait]
pub trait SuggestionStore: Send + Sync {
    /// Deactivates the user's current active record, if any, and stores `record`
    /// as the new active one, as a single atomic step.
    async fn activate(&self, record: &SuggestionRecord) -> Result<(), AppError>;

    async fn find_active(&self, user_id: Uuid) -> Result<Option<SuggestionRecord>, AppError>;

    /// Marks one record inactive. No-op when it is already inactive.
    async fn deactivate(&self, user_id: Uuid, record_id: Uuid) -> Result<(), AppError>;

    /// Attaches feedback to the user's record only while it is still active.
    /// Returns false when the record is missing, foreign or already superseded.
    async fn set_feedback(
        &self,
        user_id: Uuid,
        record_id: Uuid,
        feedback: &UserFeedback,
    ) -> Result<bool, AppError>;

    /// Newest first.
    async fn history(&self, user_id: Uuid, limit: usize) -> Result<Vec<SuggestionRecord>, AppError>;
}
