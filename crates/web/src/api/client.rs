//! Story API client implementation.
//!
//! Uses `reqwest` for HTTP and `serde_json` for the JSON payloads.

use std::sync::Arc;

use reqwest::RequestBuilder;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use snooze_core::{NewStory, Story, StoryId, Username};

use super::ApiError;
use super::types::{
    AddStoryRequest, AuthResponse, Credentials, LoginRequest, NewUser, SignupRequest,
    StoriesResponse, StoryResponse, TokenRequest, UserPayload, UserResponse,
};
use crate::config::StoryApiConfig;
use crate::models::CurrentUser;
use crate::services::{StoryService, UserService};

// =============================================================================
// ApiClient
// =============================================================================

/// Client for the story REST API.
///
/// Cheap to clone; all clones share one connection pool.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: Url,
    feed_limit: u32,
}

impl ApiClient {
    /// Create a new story API client.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidBaseUrl`] if the base URL cannot carry a path
    /// (e.g. `mailto:` URLs).
    pub fn new(config: &StoryApiConfig) -> Result<Self, ApiError> {
        if config.base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidBaseUrl(config.base_url.to_string()));
        }

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client: reqwest::Client::new(),
                base_url: config.base_url.clone(),
                feed_limit: config.feed_limit,
            }),
        })
    }

    /// Build an endpoint URL from escaped path segments.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.inner.base_url.clone();
        // Checked in `new`, so the base always accepts segments.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Send a request and decode a success body.
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = request.send().await?;
        let status = response.status();

        // Get response body as text first for better error diagnostics
        let body = response.text().await?;

        if !status.is_success() {
            debug!(
                status = %status,
                body = %body.chars().take(500).collect::<String>(),
                "Story API returned non-success status"
            );
            return Err(ApiError::from_response(status.as_u16(), &body));
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %body.chars().take(500).collect::<String>(),
                "Failed to parse story API response"
            );
            ApiError::Parse(e)
        })
    }

    // =========================================================================
    // Users
    // =========================================================================

    /// Log in with a username and password.
    #[instrument(skip_all, fields(username = %username))]
    pub async fn login(
        &self,
        username: &Username,
        password: &SecretString,
    ) -> Result<CurrentUser, ApiError> {
        let body = LoginRequest {
            user: Credentials {
                username: username.as_str(),
                password: password.expose_secret(),
            },
        };
        let reply: AuthResponse = self
            .send(self.inner.client.post(self.endpoint(&["login"])).json(&body))
            .await?;

        Ok(reply.user.into_current_user(SecretString::from(reply.token)))
    }

    /// Create a new account.
    #[instrument(skip_all, fields(username = %username))]
    pub async fn signup(
        &self,
        username: &Username,
        password: &SecretString,
        name: &str,
    ) -> Result<CurrentUser, ApiError> {
        let body = SignupRequest {
            user: NewUser {
                name,
                username: username.as_str(),
                password: password.expose_secret(),
            },
        };
        let reply: AuthResponse = self
            .send(self.inner.client.post(self.endpoint(&["signup"])).json(&body))
            .await?;

        Ok(reply.user.into_current_user(SecretString::from(reply.token)))
    }

    /// Fetch a user record.
    async fn user_payload(
        &self,
        token: &SecretString,
        username: &Username,
    ) -> Result<UserPayload, ApiError> {
        let mut url = self.endpoint(&["users", username.as_str()]);
        url.query_pairs_mut()
            .append_pair("token", token.expose_secret());

        let reply: UserResponse = self.send(self.inner.client.get(url)).await?;
        Ok(reply.user)
    }

    /// Fetch the user a stored token belongs to.
    #[instrument(skip_all, fields(username = %username))]
    pub async fn user(
        &self,
        token: &SecretString,
        username: &Username,
    ) -> Result<CurrentUser, ApiError> {
        let payload = self.user_payload(token, username).await?;
        Ok(payload.into_current_user(token.clone()))
    }

    /// Add a favorite, returning the user's favorites afterwards.
    #[instrument(skip(self, user), fields(username = %user.username))]
    pub async fn add_favorite(
        &self,
        user: &CurrentUser,
        story_id: &StoryId,
    ) -> Result<Vec<Story>, ApiError> {
        let url = self.endpoint(&[
            "users",
            user.username.as_str(),
            "favorites",
            story_id.as_str(),
        ]);
        let body = TokenRequest {
            token: user.login_token.expose_secret(),
        };
        let reply: UserResponse = self
            .send(self.inner.client.post(url).json(&body))
            .await?;
        Ok(reply.user.favorites)
    }

    /// Remove a favorite, returning the user's favorites afterwards.
    #[instrument(skip(self, user), fields(username = %user.username))]
    pub async fn remove_favorite(
        &self,
        user: &CurrentUser,
        story_id: &StoryId,
    ) -> Result<Vec<Story>, ApiError> {
        let url = self.endpoint(&[
            "users",
            user.username.as_str(),
            "favorites",
            story_id.as_str(),
        ]);
        let body = TokenRequest {
            token: user.login_token.expose_secret(),
        };
        let reply: UserResponse = self
            .send(self.inner.client.delete(url).json(&body))
            .await?;
        Ok(reply.user.favorites)
    }

    // =========================================================================
    // Stories
    // =========================================================================

    /// Fetch the global feed, newest first as the API orders it.
    #[instrument(skip(self))]
    pub async fn stories(&self) -> Result<Vec<Story>, ApiError> {
        let mut url = self.endpoint(&["stories"]);
        url.query_pairs_mut()
            .append_pair("skip", "0")
            .append_pair("limit", &self.inner.feed_limit.to_string());

        let reply: StoriesResponse = self.send(self.inner.client.get(url)).await?;
        Ok(reply.stories)
    }

    /// Post a story.
    #[instrument(skip(self, user, story), fields(username = %user.username))]
    pub async fn add_story(&self, user: &CurrentUser, story: &NewStory) -> Result<Story, ApiError> {
        let body = AddStoryRequest {
            token: user.login_token.expose_secret(),
            story,
        };
        let reply: StoryResponse = self
            .send(self.inner.client.post(self.endpoint(&["stories"])).json(&body))
            .await?;
        Ok(reply.story)
    }

    /// Delete a story the user posted.
    #[instrument(skip(self, user), fields(username = %user.username))]
    pub async fn delete_story(&self, user: &CurrentUser, story_id: &StoryId) -> Result<(), ApiError> {
        let body = TokenRequest {
            token: user.login_token.expose_secret(),
        };
        let _: StoryResponse = self
            .send(
                self.inner
                    .client
                    .delete(self.endpoint(&["stories", story_id.as_str()]))
                    .json(&body),
            )
            .await?;
        Ok(())
    }
}

// =============================================================================
// Service implementations
// =============================================================================

impl UserService for ApiClient {
    async fn login(
        &self,
        username: &Username,
        password: &SecretString,
    ) -> Result<CurrentUser, ApiError> {
        Self::login(self, username, password).await
    }

    async fn create(
        &self,
        username: &Username,
        password: &SecretString,
        name: &str,
    ) -> Result<CurrentUser, ApiError> {
        self.signup(username, password, name).await
    }

    async fn get_logged_in_user(
        &self,
        token: &SecretString,
        username: &Username,
    ) -> Result<Option<CurrentUser>, ApiError> {
        match self.user(token, username).await {
            Ok(user) => Ok(Some(user)),
            Err(ApiError::Authentication(_) | ApiError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn add_favorite(
        &self,
        user: &CurrentUser,
        story_id: &StoryId,
    ) -> Result<Vec<Story>, ApiError> {
        Self::add_favorite(self, user, story_id).await
    }

    async fn remove_favorite(
        &self,
        user: &CurrentUser,
        story_id: &StoryId,
    ) -> Result<Vec<Story>, ApiError> {
        Self::remove_favorite(self, user, story_id).await
    }

    async fn own_stories(&self, user: &CurrentUser) -> Result<Vec<Story>, ApiError> {
        let payload = self.user_payload(&user.login_token, &user.username).await?;
        Ok(payload.stories)
    }

    async fn delete_story(&self, user: &CurrentUser, story_id: &StoryId) -> Result<(), ApiError> {
        Self::delete_story(self, user, story_id).await
    }
}

impl StoryService for ApiClient {
    async fn get_stories(&self) -> Result<Vec<Story>, ApiError> {
        self.stories().await
    }

    async fn add_story(&self, user: &CurrentUser, story: &NewStory) -> Result<Story, ApiError> {
        Self::add_story(self, user, story).await
    }
}
