//! Request bodies for the `/api/auth/*` routes and their field-level validation.
//! Every check runs; all failures are reported together as `AppError::InvalidFields`.

use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::{AppError, FieldError};
use crate::models::profile::{normalize_names, Experience, ProfileType, ProfileUpdate};

const MIN_USERNAME_LEN: usize = 3;
const MIN_PASSWORD_LEN: usize = 6;
const MAX_BIO_LEN: usize = 2000;

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub current_skills: Option<Vec<String>>,
    pub target_skills: Option<Vec<String>>,
    pub bio: Option<String>,
    pub profile_type: Option<String>,
    pub target_companies: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddExperienceRequest {
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub company: String,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    #[serde(default)]
    pub current: bool,
    pub description: Option<String>,
}

/// Signup input after validation. The email is trimmed and lowercased.
#[derive(Debug)]
pub struct ValidSignup {
    pub username: String,
    pub email: String,
    pub password: String,
}

pub fn validate_signup(req: SignupRequest) -> Result<ValidSignup, AppError> {
    let mut errors = Vec::new();
    let username = req.username.trim().to_string();
    let email = normalize_email(&req.email);

    if username.chars().count() < MIN_USERNAME_LEN {
        errors.push(FieldError::new("username", "Name must be at least 3 characters"));
    }
    if !is_valid_email(&email) {
        errors.push(FieldError::new("email", "Invalid email"));
    }
    if req.password.chars().count() < MIN_PASSWORD_LEN {
        errors.push(FieldError::new(
            "password",
            "Password must be at least 6 characters",
        ));
    }

    finish(errors)?;
    Ok(ValidSignup {
        username,
        email,
        password: req.password,
    })
}

/// Returns the normalized email and the password.
pub fn validate_login(req: LoginRequest) -> Result<(String, String), AppError> {
    let mut errors = Vec::new();
    let email = normalize_email(&req.email);

    if !is_valid_email(&email) {
        errors.push(FieldError::new("email", "Invalid email"));
    }
    if req.password.is_empty() {
        errors.push(FieldError::new("password", "Password required"));
    }

    finish(errors)?;
    Ok((email, req.password))
}

pub fn validate_profile_update(req: UpdateProfileRequest) -> Result<ProfileUpdate, AppError> {
    let mut errors = Vec::new();

    let profile_type = match req.profile_type.as_deref() {
        None => None,
        Some(raw) => match ProfileType::parse(raw) {
            Some(parsed) => Some(parsed),
            None => {
                errors.push(FieldError::new(
                    "profileType",
                    "profileType must be one of student, working_professional, other",
                ));
                None
            }
        },
    };

    let bio = req.bio.map(|b| b.trim().to_string());
    if bio.as_ref().is_some_and(|b| b.chars().count() > MAX_BIO_LEN) {
        errors.push(FieldError::new("bio", "bio must be at most 2000 characters"));
    }

    finish(errors)?;
    Ok(ProfileUpdate {
        current_skills: req.current_skills.map(normalize_names),
        target_skills: req.target_skills.map(normalize_names),
        bio,
        profile_type,
        target_companies: req.target_companies.map(normalize_names),
    })
}

/// Builds the experience entry with a fresh id. `to` is dropped for current roles.
pub fn validate_experience(req: AddExperienceRequest) -> Result<Experience, AppError> {
    let mut errors = Vec::new();
    let role = req.role.trim().to_string();
    let company = req.company.trim().to_string();

    if role.is_empty() {
        errors.push(FieldError::new("role", "Role is required"));
    }
    if company.is_empty() {
        errors.push(FieldError::new("company", "Company is required"));
    }
    let Some(from) = req.from else {
        errors.push(FieldError::new("from", "Start date is required"));
        return Err(AppError::InvalidFields(errors));
    };

    let to = if req.current { None } else { req.to };
    if to.is_some_and(|to| to < from) {
        errors.push(FieldError::new("to", "End date must not be before start date"));
    }

    finish(errors)?;
    Ok(Experience {
        id: Uuid::new_v4(),
        role,
        company,
        from,
        to,
        current: req.current,
        description: req
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty()),
    })
}

fn finish(errors: Vec<FieldError>) -> Result<(), AppError> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::InvalidFields(errors))
    }
}

fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// `local@domain.tld` with no whitespace and exactly one `@`.
fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !domain.contains("..")
}
