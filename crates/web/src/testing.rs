//! In-memory fakes shared by the unit tests.

#![allow(clippy::unwrap_used)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};

use snooze_core::{NewStory, Story, StoryId, Username};

use crate::api::ApiError;
use crate::models::CurrentUser;
use crate::services::{StoryService, UserService};

/// A story with predictable fields derived from its id.
pub fn story(id: &str) -> Story {
    Story {
        story_id: StoryId::new(id),
        title: format!("Story {id}"),
        author: "Ada".to_string(),
        url: format!("https://www.example.com/{id}"),
        username: Username::new("poster"),
        created_at: DateTime::from_timestamp(1_700_000_000, 0).unwrap_or_default(),
    }
}

/// A user with no favorites or stories.
pub fn user(username: &str) -> CurrentUser {
    CurrentUser::new(
        Username::new(username),
        username.to_uppercase(),
        DateTime::from_timestamp(1_690_000_000, 0).unwrap_or_default(),
        SecretString::from(format!("token-{username}")),
    )
}

/// A service call the fake observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Login(String),
    Create(String),
    Resolve(String),
    AddFavorite(StoryId),
    RemoveFavorite(StoryId),
    OwnStories,
    DeleteStory(StoryId),
    GetStories,
    AddStory(String),
}

#[derive(Debug, Clone)]
pub struct FakeAccount {
    pub password: String,
    pub name: String,
    pub token: String,
    pub favorites: Vec<Story>,
    pub stories: Vec<Story>,
}

#[derive(Debug, Default)]
pub struct FakeState {
    pub feed: Vec<Story>,
    pub accounts: HashMap<String, FakeAccount>,
    pub calls: Vec<Call>,
    /// Make every favorite change fail with a 500.
    pub fail_favorites: bool,
    next_story: usize,
}

/// Fake story API implementing both service traits.
#[derive(Debug, Clone, Default)]
pub struct FakeBackend {
    state: Arc<Mutex<FakeState>>,
}

impl FakeBackend {
    pub fn with_feed(ids: &[&str]) -> Self {
        let backend = Self::default();
        backend.state().feed = ids.iter().map(|id| story(id)).collect();
        backend
    }

    /// Register an account whose token is `token-{username}`.
    pub fn add_account(&self, username: &str, password: &str) {
        self.state().accounts.insert(
            username.to_string(),
            FakeAccount {
                password: password.to_string(),
                name: username.to_uppercase(),
                token: format!("token-{username}"),
                favorites: Vec::new(),
                stories: Vec::new(),
            },
        );
    }

    pub fn state(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state().calls.clone()
    }

    pub fn count(&self, call: &Call) -> usize {
        self.state().calls.iter().filter(|c| *c == call).count()
    }

    fn record(&self, call: Call) {
        self.state().calls.push(call);
    }

    fn account_user(username: &str, account: &FakeAccount) -> CurrentUser {
        CurrentUser::new(
            Username::new(username),
            account.name.clone(),
            DateTime::from_timestamp(1_690_000_000, 0).unwrap_or_default(),
            SecretString::from(account.token.clone()),
        )
        .with_favorites(account.favorites.clone())
        .with_own_stories(account.stories.clone())
    }

    fn change_favorite(
        &self,
        user: &CurrentUser,
        story_id: &StoryId,
        add: bool,
    ) -> Result<Vec<Story>, ApiError> {
        let mut state = self.state();
        if state.fail_favorites {
            return Err(ApiError::Unexpected {
                status: 500,
                message: "favorites unavailable".to_string(),
            });
        }
        let story = state
            .feed
            .iter()
            .find(|s| &s.story_id == story_id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(story_id.to_string()))?;
        let account = state
            .accounts
            .get_mut(user.username.as_str())
            .ok_or_else(|| ApiError::NotFound(user.username.to_string()))?;

        account.favorites.retain(|s| &s.story_id != story_id);
        if add {
            account.favorites.push(story);
        }
        Ok(account.favorites.clone())
    }
}

impl UserService for FakeBackend {
    async fn login(
        &self,
        username: &Username,
        password: &SecretString,
    ) -> Result<CurrentUser, ApiError> {
        self.record(Call::Login(username.to_string()));
        let state = self.state();
        match state.accounts.get(username.as_str()) {
            Some(account) if account.password == password.expose_secret() => {
                Ok(Self::account_user(username.as_str(), account))
            }
            _ => Err(ApiError::Authentication("Invalid credentials".to_string())),
        }
    }

    async fn create(
        &self,
        username: &Username,
        password: &SecretString,
        name: &str,
    ) -> Result<CurrentUser, ApiError> {
        self.record(Call::Create(username.to_string()));
        if self.state().accounts.contains_key(username.as_str()) {
            return Err(ApiError::Validation("username taken".to_string()));
        }
        self.add_account(username.as_str(), password.expose_secret());
        let mut state = self.state();
        let account = state.accounts.get_mut(username.as_str()).unwrap();
        account.name = name.to_string();
        Ok(Self::account_user(username.as_str(), account))
    }

    async fn get_logged_in_user(
        &self,
        token: &SecretString,
        username: &Username,
    ) -> Result<Option<CurrentUser>, ApiError> {
        self.record(Call::Resolve(username.to_string()));
        let state = self.state();
        Ok(state
            .accounts
            .get(username.as_str())
            .filter(|account| account.token == token.expose_secret())
            .map(|account| Self::account_user(username.as_str(), account)))
    }

    async fn add_favorite(
        &self,
        user: &CurrentUser,
        story_id: &StoryId,
    ) -> Result<Vec<Story>, ApiError> {
        self.record(Call::AddFavorite(story_id.clone()));
        self.change_favorite(user, story_id, true)
    }

    async fn remove_favorite(
        &self,
        user: &CurrentUser,
        story_id: &StoryId,
    ) -> Result<Vec<Story>, ApiError> {
        self.record(Call::RemoveFavorite(story_id.clone()));
        self.change_favorite(user, story_id, false)
    }

    async fn own_stories(&self, user: &CurrentUser) -> Result<Vec<Story>, ApiError> {
        self.record(Call::OwnStories);
        self.state()
            .accounts
            .get(user.username.as_str())
            .map(|account| account.stories.clone())
            .ok_or_else(|| ApiError::NotFound(user.username.to_string()))
    }

    async fn delete_story(&self, user: &CurrentUser, story_id: &StoryId) -> Result<(), ApiError> {
        self.record(Call::DeleteStory(story_id.clone()));
        let mut state = self.state();
        let account = state
            .accounts
            .get_mut(user.username.as_str())
            .ok_or_else(|| ApiError::NotFound(user.username.to_string()))?;
        if !account.stories.iter().any(|s| &s.story_id == story_id) {
            return Err(ApiError::NotFound(story_id.to_string()));
        }
        account.stories.retain(|s| &s.story_id != story_id);
        for account in state.accounts.values_mut() {
            account.favorites.retain(|s| &s.story_id != story_id);
        }
        state.feed.retain(|s| &s.story_id != story_id);
        Ok(())
    }
}

impl StoryService for FakeBackend {
    async fn get_stories(&self) -> Result<Vec<Story>, ApiError> {
        self.record(Call::GetStories);
        Ok(self.state().feed.clone())
    }

    async fn add_story(&self, user: &CurrentUser, new_story: &NewStory) -> Result<Story, ApiError> {
        self.record(Call::AddStory(new_story.title().to_string()));
        let mut state = self.state();
        state.next_story += 1;
        let posted = Story {
            story_id: StoryId::new(format!("new-{}", state.next_story)),
            title: new_story.title().to_string(),
            author: new_story.author().to_string(),
            url: new_story.url().to_string(),
            username: user.username.clone(),
            created_at: DateTime::<Utc>::from_timestamp(1_710_000_000, 0).unwrap_or_default(),
        };
        state.feed.insert(0, posted.clone());
        if let Some(account) = state.accounts.get_mut(user.username.as_str()) {
            account.stories.push(posted.clone());
        }
        Ok(posted)
    }
}
