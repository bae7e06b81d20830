//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                        - Page load: restore session, render document
//! GET  /health                  - Liveness check
//! GET  /health/ready            - Readiness check (story API reachable)
//!
//! # Page events (HTMX, require X-Page-Id, return #app contents)
//! POST /nav/{view}              - home | submit | favorites | my-stories | profile | login
//! POST /auth/login              - Login form
//! POST /auth/signup             - Signup form
//! POST /auth/logout             - Logout
//! POST /stories                 - Submit form
//! POST /stories/{id}/delete     - Delete an own story
//!
//! # Star clicks (HTMX, return the story item)
//! POST /stories/{id}/favorite   - Toggle a favorite
//! ```

pub mod auth;
pub mod health;
pub mod home;
pub mod nav;
pub mod stories;

use axum::{
    Router,
    response::Html,
    routing::{get, post},
};

use crate::error::Result;
use crate::render::render_app;
use crate::state::{AppState, PageController};

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/signup", post(auth::signup))
        .route("/logout", post(auth::logout))
}

/// Create all routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .route("/nav/{view}", post(nav::navigate))
        .route("/stories", post(stories::submit))
        .route("/stories/{id}/favorite", post(stories::favorite))
        .route("/stories/{id}/delete", post(stories::delete))
        .nest("/auth", auth_routes())
}

/// Render the `#app` fragment for a page after an event.
fn app_fragment(controller: &PageController) -> Result<Html<String>> {
    Ok(Html(render_app(
        controller.page(),
        controller.current_user(),
    )?))
}
