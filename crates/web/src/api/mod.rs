//! Story API client.
//!
//! # Architecture
//!
//! - Plain JSON over HTTP with `reqwest`
//! - The story API is the source of truth - NO local copies beyond the
//!   current page's in-memory state
//! - Errors are classified into the taxonomy the UI reports: authentication,
//!   validation, not found, network
//!
//! # Example
//!
//! ```rust,ignore
//! use snooze_web::api::ApiClient;
//!
//! let client = ApiClient::new(&config.api)?;
//!
//! // Log in and favorite the newest story
//! let user = client.login(&username, &password).await?;
//! let feed = client.stories().await?;
//! let favorites = client.add_favorite(&user, &feed[0].story_id).await?;
//! ```

mod client;
pub mod types;

pub use client::ApiClient;

use thiserror::Error;

use types::ErrorResponse;

/// Errors that can occur when talking to the story API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Bad or expired credentials (HTTP 401).
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Rejected input, e.g. a taken username or a malformed story (HTTP 400/409).
    #[error("Validation failed: {0}")]
    Validation(String),

    /// The user or story does not exist (HTTP 404).
    #[error("Not found: {0}")]
    NotFound(String),

    /// The story API could not be reached.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Any other non-success status.
    #[error("Unexpected status {status}: {message}")]
    Unexpected { status: u16, message: String },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The configured base URL cannot carry path segments.
    #[error("Invalid API base URL: {0}")]
    InvalidBaseUrl(String),
}

impl ApiError {
    /// Classify a non-success response.
    ///
    /// The story API reports failures as `{"error": {"status", "title", "message"}}`;
    /// bodies that don't match fall back to a truncated copy of the raw text.
    #[must_use]
    pub fn from_response(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<ErrorResponse>(body)
            .ok()
            .and_then(|response| response.error.message.or(response.error.title))
            .unwrap_or_else(|| body.chars().take(200).collect());

        match status {
            401 => Self::Authentication(message),
            400 | 409 => Self::Validation(message),
            404 => Self::NotFound(message),
            _ => Self::Unexpected { status, message },
        }
    }

    /// Whether the error came from the network rather than the API itself.
    #[must_use]
    pub const fn is_upstream_failure(&self) -> bool {
        matches!(
            self,
            Self::Network(_) | Self::Unexpected { .. } | Self::Parse(_) | Self::InvalidBaseUrl(_)
        )
    }
}
