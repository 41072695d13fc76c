use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::auth::password::{hash_password, verify_password};
use crate::auth::validation::{
    validate_experience, validate_login, validate_profile_update, validate_signup,
    AddExperienceRequest, LoginRequest, SignupRequest, UpdateProfileRequest,
};
use crate::auth::RequireAuth;
use crate::errors::{AppError, AppJson};
use crate::models::profile::Profile;
use crate::models::user::{NewUser, User};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct SignupResponse {
    pub token: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub user: User,
    pub profile: Option<Profile>,
}

/// POST /api/auth/signup
pub async fn handle_signup(
    State(state): State<AppState>,
    AppJson(req): AppJson<SignupRequest>,
) -> Result<Json<SignupResponse>, AppError> {
    let valid = validate_signup(req)?;
    let password_hash = hash_password(&valid.password, state.config.bcrypt_cost).await?;

    let (user, _profile) = state
        .users
        .create_user(NewUser {
            username: valid.username,
            email: valid.email,
            password_hash,
        })
        .await?;
    info!("User {} signed up", user.id);

    Ok(Json(SignupResponse {
        token: state.tokens.issue(user.id)?,
        message: "Account created successfully with empty profile".to_string(),
    }))
}

/// POST /api/auth/login
pub async fn handle_login(
    State(state): State<AppState>,
    AppJson(req): AppJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let (email, password) = validate_login(req)?;

    let user = state
        .users
        .find_user_by_email(&email)
        .await?
        .ok_or(AppError::InvalidCredentials)?;
    if !verify_password(&password, &user.password_hash).await? {
        return Err(AppError::InvalidCredentials);
    }

    Ok(Json(LoginResponse {
        token: state.tokens.issue(user.id)?,
    }))
}

/// GET /api/auth/me
pub async fn handle_me(
    State(state): State<AppState>,
    auth: RequireAuth,
) -> Result<Json<MeResponse>, AppError> {
    let user = state
        .users
        .find_user(auth.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
    let profile = state.profiles.get_profile(auth.user_id).await?;
    Ok(Json(MeResponse { user, profile }))
}

/// PUT /api/auth/update-profile
pub async fn handle_update_profile(
    State(state): State<AppState>,
    auth: RequireAuth,
    AppJson(req): AppJson<UpdateProfileRequest>,
) -> Result<Json<Profile>, AppError> {
    let update = validate_profile_update(req)?;
    let now = Utc::now();

    let mut profile = state
        .profiles
        .get_profile(auth.user_id)
        .await?
        .unwrap_or_else(|| Profile::empty(auth.user_id, now));
    profile.apply(update, now);
    state.profiles.save_profile(&profile).await?;

    Ok(Json(profile))
}

/// PUT /api/auth/add-experience
pub async fn handle_add_experience(
    State(state): State<AppState>,
    auth: RequireAuth,
    AppJson(req): AppJson<AddExperienceRequest>,
) -> Result<Json<Profile>, AppError> {
    let experience = validate_experience(req)?;
    let mut profile = load_profile(&state, auth.user_id).await?;

    profile.experience.insert(0, experience);
    profile.updated_at = Utc::now();
    state.profiles.save_profile(&profile).await?;

    Ok(Json(profile))
}

/// DELETE /api/auth/delete-experience/:id
pub async fn handle_delete_experience(
    State(state): State<AppState>,
    auth: RequireAuth,
    Path(experience_id): Path<Uuid>,
) -> Result<Json<Profile>, AppError> {
    let mut profile = load_profile(&state, auth.user_id).await?;

    let position = profile
        .experience
        .iter()
        .position(|e| e.id == experience_id)
        .ok_or_else(|| AppError::NotFound(format!("Experience {experience_id} not found")))?;
    profile.experience.remove(position);
    profile.updated_at = Utc::now();
    state.profiles.save_profile(&profile).await?;

    Ok(Json(profile))
}

async fn load_profile(state: &AppState, user_id: Uuid) -> Result<Profile, AppError> {
    state
        .profiles
        .get_profile(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Profile not found".to_string()))
}
