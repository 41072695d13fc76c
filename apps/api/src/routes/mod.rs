pub mod health;

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::auth::handlers as auth;
use crate::state::AppState;
use crate::suggestion::handlers as suggestion;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Accounts and profiles
        .route("/api/auth/signup", post(auth::handle_signup))
        .route("/api/auth/login", post(auth::handle_login))
        .route("/api/auth/me", get(auth::handle_me))
        .route("/api/auth/update-profile", put(auth::handle_update_profile))
        .route("/api/auth/add-experience", put(auth::handle_add_experience))
        .route(
            "/api/auth/delete-experience/:id",
            delete(auth::handle_delete_experience),
        )
        // Suggestions
        .route("/api/suggestion/skills", get(suggestion::handle_get_active))
        .route(
            "/api/suggestion/skills/generate",
            post(suggestion::handle_generate),
        )
        .route(
            "/api/suggestion/skills/feedback",
            post(suggestion::handle_feedback),
        )
        .route(
            "/api/suggestion/skills/history",
            get(suggestion::handle_history),
        )
        .with_state(state)
}
