//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers should return `Result<T, AppError>`.
//!
//! Responses carry a short plain-text message; the page shows it in its
//! failure banner.

use axum::{
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::api::ApiError;
use crate::controller::ControllerError;
use crate::storage::StorageError;

/// Header asking HTMX to reload the whole page.
pub const HX_REFRESH: &str = "hx-refresh";

/// Application-level error type for the web client.
#[derive(Debug, Error)]
pub enum AppError {
    /// Story API call failed.
    #[error("Story API error: {0}")]
    Api(#[from] ApiError),

    /// Session storage failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Template rendering failed.
    #[error("Render error: {0}")]
    Render(#[from] askama::Error),

    /// The page id is unknown or its state expired.
    #[error("Page expired")]
    PageExpired,

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl From<ControllerError> for AppError {
    fn from(err: ControllerError) -> Self {
        match err {
            ControllerError::Api(e) => Self::Api(e),
            ControllerError::Storage(e) => Self::Storage(e),
        }
    }
}

impl AppError {
    /// Whether this is a server-side failure worth reporting.
    const fn is_server_error(&self) -> bool {
        match self {
            Self::Storage(_) | Self::Render(_) => true,
            Self::Api(e) => e.is_upstream_failure(),
            Self::PageExpired | Self::BadRequest(_) => false,
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::Storage(_) | Self::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Api(err) => match err {
                ApiError::Authentication(_) => StatusCode::UNAUTHORIZED,
                ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
                ApiError::NotFound(_) => StatusCode::NOT_FOUND,
                ApiError::Network(_)
                | ApiError::Unexpected { .. }
                | ApiError::Parse(_)
                | ApiError::InvalidBaseUrl(_) => StatusCode::BAD_GATEWAY,
            },
            Self::PageExpired => StatusCode::CONFLICT,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    // Don't expose internal error details to clients
    fn message(&self) -> String {
        match self {
            Self::Storage(_) | Self::Render(_) => "Internal server error".to_string(),
            Self::Api(err) => match err {
                ApiError::Authentication(_) => "Invalid username or password".to_string(),
                ApiError::Validation(msg) | ApiError::NotFound(msg) => msg.clone(),
                _ => "The story service is unavailable, please try again".to_string(),
            },
            Self::PageExpired => "This page expired, reloading".to_string(),
            Self::BadRequest(msg) => msg.clone(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if self.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let mut response = (self.status(), self.message()).into_response();
        if matches!(self, Self::PageExpired) {
            response
                .headers_mut()
                .insert(HX_REFRESH, HeaderValue::from_static("true"));
        }
        response
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context.
///
/// Call this after successful authentication to associate errors with users.
pub fn set_sentry_user(username: &impl ToString) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            username: Some(username.to_string()),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Call this on logout to stop associating errors with the user.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("navigation", "Opened favorites", Some(&[("view", "favorites")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}
