use axum::{extract::State, Json};
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::RequireAuth;
use crate::errors::{AppError, AppJson, FieldError};
use crate::models::suggestion::{SuggestionRecord, UserFeedback};
use crate::state::AppState;
use crate::suggestion::orchestrator::SuggestionPipeline;

pub const HISTORY_LIMIT: usize = 10;
const MAX_COMMENT_LEN: usize = 1000;

#[derive(Debug, Deserialize)]
pub struct FeedbackRequest {
    pub rating: Option<i64>,
    pub comments: Option<String>,
    pub helpful: Option<bool>,
}

/// GET /api/suggestion/skills
pub async fn handle_get_active(
    State(state): State<AppState>,
    auth: RequireAuth,
) -> Result<Json<SuggestionRecord>, AppError> {
    Ok(Json(current_record(&state, auth.user_id).await?))
}

/// POST /api/suggestion/skills/generate
pub async fn handle_generate(
    State(state): State<AppState>,
    auth: RequireAuth,
) -> Result<Json<SuggestionRecord>, AppError> {
    let record = SuggestionPipeline::from_state(&state)
        .generate_suggestions(auth.user_id)
        .await?;
    Ok(Json(record))
}

/// POST /api/suggestion/skills/feedback
pub async fn handle_feedback(
    State(state): State<AppState>,
    auth: RequireAuth,
    AppJson(req): AppJson<FeedbackRequest>,
) -> Result<Json<SuggestionRecord>, AppError> {
    let feedback = validate_feedback(req)?;
    let mut record = current_record(&state, auth.user_id).await?;

    if !state
        .suggestions
        .set_feedback(auth.user_id, record.id, &feedback)
        .await?
    {
        return Err(AppError::NotFound("No active suggestions found".to_string()));
    }
    record.user_feedback = Some(feedback);
    Ok(Json(record))
}

/// GET /api/suggestion/skills/history
pub async fn handle_history(
    State(state): State<AppState>,
    auth: RequireAuth,
) -> Result<Json<Vec<SuggestionRecord>>, AppError> {
    let records = state.suggestions.history(auth.user_id, HISTORY_LIMIT).await?;
    Ok(Json(records))
}

/// The user's active, unexpired record. An expired one is deactivated on the way out.
async fn current_record(state: &AppState, user_id: Uuid) -> Result<SuggestionRecord, AppError> {
    let record = state
        .suggestions
        .find_active(user_id)
        .await?
        .ok_or_else(|| {
            AppError::NotFound("No active suggestions found. Generate suggestions first.".to_string())
        })?;

    if record.is_expired(Utc::now()) {
        state.suggestions.deactivate(user_id, record.id).await?;
        return Err(AppError::Expired(
            "Suggestions have expired. Generate new suggestions.".to_string(),
        ));
    }
    Ok(record)
}

fn validate_feedback(req: FeedbackRequest) -> Result<UserFeedback, AppError> {
    let mut errors = Vec::new();

    let rating = match req.rating {
        Some(r @ 1..=5) => r as u8,
        _ => {
            errors.push(FieldError::new("rating", "rating must be between 1 and 5"));
            0
        }
    };
    let comments = req
        .comments
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty());
    if comments
        .as_ref()
        .is_some_and(|c| c.chars().count() > MAX_COMMENT_LEN)
    {
        errors.push(FieldError::new(
            "comments",
            "comments must be at most 1000 characters",
        ));
    }

    if !errors.is_empty() {
        return Err(AppError::InvalidFields(errors));
    }
    Ok(UserFeedback {
        rating,
        comments,
        helpful: req.helpful,
        submitted_at: Utc::now(),
    })
}
