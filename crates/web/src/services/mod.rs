//! Service seams between the page controller and the story API.
//!
//! # Services
//!
//! - [`UserService`] - Authentication, favorites, and the user's own stories
//! - [`StoryService`] - The global feed and story submission
//!
//! [`ApiClient`](crate::api::ApiClient) implements both against the real API.
//! Tests substitute in-memory fakes.

use std::future::Future;

use secrecy::SecretString;

use snooze_core::{NewStory, Story, StoryId, Username};

use crate::api::ApiError;
use crate::models::CurrentUser;

/// User account operations.
pub trait UserService {
    /// Exchange credentials for a logged-in user.
    fn login(
        &self,
        username: &Username,
        password: &SecretString,
    ) -> impl Future<Output = Result<CurrentUser, ApiError>> + Send;

    /// Create an account and log it in.
    fn create(
        &self,
        username: &Username,
        password: &SecretString,
        name: &str,
    ) -> impl Future<Output = Result<CurrentUser, ApiError>> + Send;

    /// Resolve a stored credential to a user.
    ///
    /// Returns `Ok(None)` when the token or username is no longer valid.
    fn get_logged_in_user(
        &self,
        token: &SecretString,
        username: &Username,
    ) -> impl Future<Output = Result<Option<CurrentUser>, ApiError>> + Send;

    /// Mark a story as a favorite and return the updated favorites.
    fn add_favorite(
        &self,
        user: &CurrentUser,
        story_id: &StoryId,
    ) -> impl Future<Output = Result<Vec<Story>, ApiError>> + Send;

    /// Unmark a favorite and return the updated favorites.
    fn remove_favorite(
        &self,
        user: &CurrentUser,
        story_id: &StoryId,
    ) -> impl Future<Output = Result<Vec<Story>, ApiError>> + Send;

    /// Fetch the stories the user has posted, oldest first.
    fn own_stories(
        &self,
        user: &CurrentUser,
    ) -> impl Future<Output = Result<Vec<Story>, ApiError>> + Send;

    /// Delete one of the user's stories.
    fn delete_story(
        &self,
        user: &CurrentUser,
        story_id: &StoryId,
    ) -> impl Future<Output = Result<(), ApiError>> + Send;
}

/// Feed operations.
pub trait StoryService {
    /// Fetch the global feed in feed order.
    fn get_stories(&self) -> impl Future<Output = Result<Vec<Story>, ApiError>> + Send;

    /// Post a new story as `user`.
    fn add_story(
        &self,
        user: &CurrentUser,
        story: &NewStory,
    ) -> impl Future<Output = Result<Story, ApiError>> + Send;
}
