//! User domain types.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use secrecy::SecretString;

use snooze_core::{Story, StoryId, Username};

use super::session::ClientSession;

/// The logged-in user of a page.
///
/// `favorites` and `own_stories` keep the order the story API returns them in
/// (oldest first) but hold each story ID at most once.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub username: Username,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub login_token: SecretString,
    favorites: Vec<Story>,
    own_stories: Vec<Story>,
}

impl CurrentUser {
    #[must_use]
    pub fn new(
        username: Username,
        name: String,
        created_at: DateTime<Utc>,
        login_token: SecretString,
    ) -> Self {
        Self {
            username,
            name,
            created_at,
            login_token,
            favorites: Vec::new(),
            own_stories: Vec::new(),
        }
    }

    /// Builder-style setter for the initial favorites.
    #[must_use]
    pub fn with_favorites(mut self, favorites: Vec<Story>) -> Self {
        self.set_favorites(favorites);
        self
    }

    /// Builder-style setter for the initial own stories.
    #[must_use]
    pub fn with_own_stories(mut self, stories: Vec<Story>) -> Self {
        self.set_own_stories(stories);
        self
    }

    /// The credential pair to persist for this user.
    #[must_use]
    pub fn session(&self) -> ClientSession {
        ClientSession {
            token: self.login_token.clone(),
            username: self.username.clone(),
        }
    }

    #[must_use]
    pub fn favorites(&self) -> &[Story] {
        &self.favorites
    }

    #[must_use]
    pub fn own_stories(&self) -> &[Story] {
        &self.own_stories
    }

    /// Membership test used by the favorites synchronizer.
    #[must_use]
    pub fn is_favorite(&self, story_id: &StoryId) -> bool {
        self.favorites.iter().any(|story| &story.story_id == story_id)
    }

    #[must_use]
    pub fn favorite_ids(&self) -> HashSet<&StoryId> {
        self.favorites.iter().map(|story| &story.story_id).collect()
    }

    /// Replace the favorites with the set returned by the story API.
    pub fn set_favorites(&mut self, favorites: Vec<Story>) {
        self.favorites = dedup_by_id(favorites);
    }

    pub fn set_own_stories(&mut self, stories: Vec<Story>) {
        self.own_stories = dedup_by_id(stories);
    }

    /// Forget a deleted story everywhere it is referenced.
    pub fn forget_story(&mut self, story_id: &StoryId) {
        self.favorites.retain(|story| &story.story_id != story_id);
        self.own_stories.retain(|story| &story.story_id != story_id);
    }
}

fn dedup_by_id(stories: Vec<Story>) -> Vec<Story> {
    let mut seen = HashSet::new();
    stories
        .into_iter()
        .filter(|story| seen.insert(story.story_id.clone()))
        .collect()
}
