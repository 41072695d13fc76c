use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::profile::{Experience, Profile, ProfileType};
use crate::models::suggestion::{
    CompanySuggestion, JobRoleSuggestion, MentorSuggestion, SkillSuggestion, SuggestionRecord,
    UserFeedback,
};
use crate::models::user::{NewUser, User};
use crate::store::{ProfileStore, SuggestionStore, UserStore};

const PROFILE_COLUMNS: &str = "id, user_id, current_skills, target_skills, profile_type, bio, \
     experience, target_companies, created_at, updated_at";

const SUGGESTION_COLUMNS: &str = "id, user_id, suggested_skills, suggested_job_roles, \
     suggested_companies, mentor_suggestions, generated_at, expires_at, is_active, user_feedback";

#[derive(FromRow)]
struct ProfileRow {
    id: Uuid,
    user_id: Uuid,
    current_skills: Vec<String>,
    target_skills: Vec<String>,
    profile_type: String,
    bio: String,
    experience: Json<Vec<Experience>>,
    target_companies: Vec<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProfileRow> for Profile {
    fn from(row: ProfileRow) -> Self {
        Profile {
            id: row.id,
            user_id: row.user_id,
            current_skills: row.current_skills,
            target_skills: row.target_skills,
            profile_type: ProfileType::parse(&row.profile_type).unwrap_or_default(),
            bio: row.bio,
            experience: row.experience.0,
            target_companies: row.target_companies,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(FromRow)]
struct SuggestionRow {
    id: Uuid,
    user_id: Uuid,
    suggested_skills: Json<Vec<SkillSuggestion>>,
    suggested_job_roles: Json<Vec<JobRoleSuggestion>>,
    suggested_companies: Json<Vec<CompanySuggestion>>,
    mentor_suggestions: Json<Vec<MentorSuggestion>>,
    generated_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
    is_active: bool,
    user_feedback: Option<Json<UserFeedback>>,
}

impl From<SuggestionRow> for SuggestionRecord {
    fn from(row: SuggestionRow) -> Self {
        SuggestionRecord {
            id: row.id,
            user_id: row.user_id,
            suggested_skills: row.suggested_skills.0,
            suggested_job_roles: row.suggested_job_roles.0,
            suggested_companies: row.suggested_companies.0,
            mentor_suggestions: row.mentor_suggestions.0,
            generated_at: row.generated_at,
            expires_at: row.expires_at,
            is_active: row.is_active,
            user_feedback: row.user_feedback.map(|f| f.0),
        }
    }
}

/// PostgreSQL-backed implementation of every store trait.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Maps a unique-constraint violation to `Conflict`, everything else to `Database`.
fn conflict_on_unique(e: sqlx::Error, message: &str) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            return AppError::Conflict(message.to_string());
        }
    }
    AppError::Database(e)
}

async fn upsert_profile(
    tx: &mut Transaction<'_, Postgres>,
    profile: &Profile,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO profiles
            (id, user_id, current_skills, target_skills, profile_type, bio,
             experience, target_companies, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        ON CONFLICT (user_id) DO UPDATE SET
            current_skills   = EXCLUDED.current_skills,
            target_skills    = EXCLUDED.target_skills,
            profile_type     = EXCLUDED.profile_type,
            bio              = EXCLUDED.bio,
            experience       = EXCLUDED.experience,
            target_companies = EXCLUDED.target_companies,
            updated_at       = EXCLUDED.updated_at
        "#,
    )
    .bind(profile.id)
    .bind(profile.user_id)
    .bind(&profile.current_skills)
    .bind(&profile.target_skills)
    .bind(profile.profile_type.as_str())
    .bind(&profile.bio)
    .bind(Json(&profile.experience))
    .bind(&profile.target_companies)
    .bind(profile.created_at)
    .bind(profile.updated_at)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

#[async_trait]
impl UserStore for PgStore {
    async fn create_user(&self, new_user: NewUser) -> Result<(User, Profile), AppError> {
        let mut tx = self.pool.begin().await?;

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, username, email, password_hash)
            VALUES ($1, $2, $3, $4)
            RETURNING id, username, email, password_hash, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&new_user.username)
        .bind(&new_user.email)
        .bind(&new_user.password_hash)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| conflict_on_unique(e, "User already exists"))?;

        let profile = Profile::empty(user.id, user.created_at);
        upsert_profile(&mut tx, &profile).await?;
        tx.commit().await?;

        info!("Created user {} with empty profile", user.id);
        Ok((user, profile))
    }

    async fn find_user(&self, user_id: Uuid) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, email, password_hash, created_at FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, email, password_hash, created_at FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }
}

#[async_trait]
impl ProfileStore for PgStore {
    async fn get_profile(&self, user_id: Uuid) -> Result<Option<Profile>, AppError> {
        let row = sqlx::query_as::<_, ProfileRow>(&format!(
            "SELECT {PROFILE_COLUMNS} FROM profiles WHERE user_id = $1"
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Profile::from))
    }

    async fn save_profile(&self, profile: &Profile) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;
        upsert_profile(&mut tx, profile).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn find_profiles_with_skill(
        &self,
        skill: &str,
        exclude_user: Uuid,
    ) -> Result<Vec<Profile>, AppError> {
        let rows = sqlx::query_as::<_, ProfileRow>(&format!(
            r#"
            SELECT {PROFILE_COLUMNS} FROM profiles
            WHERE user_id <> $1
              AND EXISTS (
                  SELECT 1 FROM unnest(current_skills) AS s(name)
                  WHERE lower(btrim(s.name)) = lower(btrim($2))
              )
            ORDER BY created_at, id
            "#
        ))
        .bind(exclude_user)
        .bind(skill)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Profile::from).collect())
    }
}

#[async_trait]
impl SuggestionStore for PgStore {
    async fn activate(&self, record: &SuggestionRecord) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        // Row lock serializes concurrent generations for the same user.
        sqlx::query_scalar::<_, Uuid>("SELECT id FROM users WHERE id = $1 FOR UPDATE")
            .bind(record.user_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", record.user_id)))?;

        sqlx::query("UPDATE suggestions SET is_active = FALSE WHERE user_id = $1 AND is_active")
            .bind(record.user_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            r#"
            INSERT INTO suggestions
                (id, user_id, suggested_skills, suggested_job_roles, suggested_companies,
                 mentor_suggestions, generated_at, expires_at, is_active, user_feedback)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, TRUE, $9)
            "#,
        )
        .bind(record.id)
        .bind(record.user_id)
        .bind(Json(&record.suggested_skills))
        .bind(Json(&record.suggested_job_roles))
        .bind(Json(&record.suggested_companies))
        .bind(Json(&record.mentor_suggestions))
        .bind(record.generated_at)
        .bind(record.expires_at)
        .bind(record.user_feedback.as_ref().map(Json))
        .execute(&mut *tx)
        .await?;

        sqlx::query("UPDATE users SET active_suggestion_id = $2 WHERE id = $1")
            .bind(record.user_id)
            .bind(record.id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        info!(
            "Activated suggestion record {} for user {}",
            record.id, record.user_id
        );
        Ok(())
    }

    async fn find_active(&self, user_id: Uuid) -> Result<Option<SuggestionRecord>, AppError> {
        let row = sqlx::query_as::<_, SuggestionRow>(&format!(
            "SELECT {SUGGESTION_COLUMNS} FROM suggestions WHERE user_id = $1 AND is_active"
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(SuggestionRecord::from))
    }

    async fn deactivate(&self, user_id: Uuid, record_id: Uuid) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("UPDATE suggestions SET is_active = FALSE WHERE id = $1 AND user_id = $2")
            .bind(record_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query(
            "UPDATE users SET active_suggestion_id = NULL WHERE id = $1 AND active_suggestion_id = $2",
        )
        .bind(user_id)
        .bind(record_id)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(())
    }

    async fn set_feedback(
        &self,
        user_id: Uuid,
        record_id: Uuid,
        feedback: &UserFeedback,
    ) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE suggestions SET user_feedback = $3 \
             WHERE id = $1 AND user_id = $2 AND is_active",
        )
        .bind(record_id)
        .bind(user_id)
        .bind(Json(feedback))
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn history(&self, user_id: Uuid, limit: usize) -> Result<Vec<SuggestionRecord>, AppError> {
        let rows = sqlx::query_as::<_, SuggestionRow>(&format!(
            "SELECT {SUGGESTION_COLUMNS} FROM suggestions WHERE user_id = $1 \
             ORDER BY generated_at DESC LIMIT $2"
        ))
        .bind(user_id)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(SuggestionRecord::from).collect())
    }
}
