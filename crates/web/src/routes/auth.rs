//! Authentication route handlers.
//!
//! Credentials go to the story API; on success the token and username are
//! stored in the browser's session so the next page load restores them.

use axum::{Form, response::Html};
use secrecy::SecretString;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use snooze_core::Username;

use super::app_fragment;
use crate::error::{AppError, Result, add_breadcrumb, clear_sentry_user, set_sentry_user};
use crate::middleware::OpenPage;
use crate::storage::SessionStore;

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Signup form data.
#[derive(Deserialize)]
pub struct SignupForm {
    pub name: String,
    pub username: String,
    pub password: String,
}

fn credentials(username: &str, password: String) -> Result<(Username, SecretString)> {
    let username = username.trim();
    if username.is_empty() || password.is_empty() {
        return Err(AppError::BadRequest(
            "Username and password are required".to_string(),
        ));
    }
    Ok((Username::new(username), SecretString::from(password)))
}

// =============================================================================
// Handlers
// =============================================================================

/// Log in and switch the page to the authenticated state.
#[instrument(skip_all, fields(page_id = %open.id))]
pub async fn login(
    open: OpenPage,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Html<String>> {
    let (username, password) = credentials(&form.username, form.password)?;
    let store = SessionStore::new(session);

    let mut controller = open.page.lock().await;
    controller.login(&username, &password, &store).await?;

    set_sentry_user(&username);
    add_breadcrumb("auth", "Logged in", None);
    app_fragment(&controller)
}

/// Create an account and log it in.
#[instrument(skip_all, fields(page_id = %open.id))]
pub async fn signup(
    open: OpenPage,
    session: Session,
    Form(form): Form<SignupForm>,
) -> Result<Html<String>> {
    let name = form.name.trim();
    if name.is_empty() {
        return Err(AppError::BadRequest("Name is required".to_string()));
    }
    let (username, password) = credentials(&form.username, form.password)?;
    let store = SessionStore::new(session);

    let mut controller = open.page.lock().await;
    controller.signup(&username, &password, name, &store).await?;

    set_sentry_user(&username);
    add_breadcrumb("auth", "Signed up", None);
    app_fragment(&controller)
}

/// Clear the stored session and reset the page.
#[instrument(skip_all, fields(page_id = %open.id))]
pub async fn logout(open: OpenPage, session: Session) -> Result<Html<String>> {
    let store = SessionStore::new(session);

    let mut controller = open.page.lock().await;
    controller.logout(&store).await?;

    clear_sentry_user();
    add_breadcrumb("auth", "Logged out", None);
    app_fragment(&controller)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::ExposeSecret;

    use super::*;

    #[test]
    fn test_credentials_trim_username() {
        let (username, password) = credentials("  alice ", "pw".to_string()).unwrap();
        assert_eq!(username.as_str(), "alice");
        assert_eq!(password.expose_secret(), "pw");
    }

    #[test]
    fn test_credentials_required() {
        assert!(matches!(
            credentials("   ", "pw".to_string()),
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            credentials("alice", String::new()),
            Err(AppError::BadRequest(_))
        ));
    }
}
