//! Wire types for the story API.
//!
//! Stories deserialize straight into [`snooze_core::Story`]; users arrive as a
//! [`UserPayload`] and become a [`CurrentUser`] once paired with their token.

use chrono::{DateTime, Utc};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use snooze_core::{NewStory, Story, Username};

use crate::models::CurrentUser;

// =============================================================================
// Responses
// =============================================================================

/// A user record as the API returns it.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPayload {
    pub username: Username,
    pub name: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub favorites: Vec<Story>,
    #[serde(default)]
    pub stories: Vec<Story>,
}

impl UserPayload {
    /// Pair the record with the token that was used to fetch it.
    #[must_use]
    pub fn into_current_user(self, token: SecretString) -> CurrentUser {
        CurrentUser::new(self.username, self.name, self.created_at, token)
            .with_favorites(self.favorites)
            .with_own_stories(self.stories)
    }
}

/// Reply to `/login` and `/signup`.
#[derive(Debug, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserPayload,
}

/// Reply to user reads and favorite changes.
#[derive(Debug, Deserialize)]
pub struct UserResponse {
    pub user: UserPayload,
}

#[derive(Debug, Deserialize)]
pub struct StoriesResponse {
    pub stories: Vec<Story>,
}

#[derive(Debug, Deserialize)]
pub struct StoryResponse {
    pub story: Story,
}

/// Error envelope.
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

/// `status` is not decoded; `ApiError::from_response` reads the HTTP status.
#[derive(Debug, Deserialize)]
pub struct ErrorDetail {
    pub title: Option<String>,
    pub message: Option<String>,
}

// =============================================================================
// Requests
// =============================================================================

#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub user: Credentials<'a>,
}

#[derive(Debug, Serialize)]
pub struct Credentials<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub struct SignupRequest<'a> {
    pub user: NewUser<'a>,
}

#[derive(Debug, Serialize)]
pub struct NewUser<'a> {
    pub name: &'a str,
    pub username: &'a str,
    pub password: &'a str,
}

/// Body of every token-authenticated mutation without other fields.
#[derive(Debug, Serialize)]
pub struct TokenRequest<'a> {
    pub token: &'a str,
}

#[derive(Debug, Serialize)]
pub struct AddStoryRequest<'a> {
    pub token: &'a str,
    pub story: &'a NewStory,
}
