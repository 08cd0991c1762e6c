//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Landing page (pricing tiers, consultation form)
//! POST /consultation           - Submit consultation form (rate limited)
//!
//! # Downloads (access gated)
//! GET  /downloads/ebook        - E-book reader, or why it is locked
//! GET  /downloads/ebook/file   - E-book file (requires login and access)
//!
//! # Auth
//! GET  /auth/login             - Login page
//! POST /auth/login             - Login action (rate limited)
//! POST /auth/logout            - Logout action
//!
//! # Health
//! GET  /health                 - Liveness
//! GET  /health/ready           - Readiness (session database)
//! ```

pub mod auth;
pub mod consultation;
pub mod downloads;
pub mod health;
pub mod home;

use axum::{
    Router,
    routing::{get, post},
};

use crate::middleware::{auth_rate_limiter, form_rate_limiter};
use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/login",
            get(auth::login_page).merge(post(auth::login).layer(auth_rate_limiter())),
        )
        .route("/logout", post(auth::logout))
}

/// Create the download routes router.
pub fn download_routes() -> Router<AppState> {
    Router::new()
        .route("/ebook", get(downloads::ebook))
        .route("/ebook/file", get(downloads::ebook_file))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route(
            "/consultation",
            post(consultation::submit).layer(form_rate_limiter()),
        )
        .nest("/downloads", download_routes())
        .nest("/auth", auth_routes())
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
}
