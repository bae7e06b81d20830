//! Per-page view state controller.
//!
//! One [`Controller`] exists per open page. It owns that page's current user,
//! the last fetched feed and the [`Page`] model, and it is the only thing that
//! talks to the story services on the page's behalf.
//!
//! # Transitions
//!
//! ```text
//! startup  ── stored session resolves ──▶ AUTHENTICATED
//!          └─ no session / unresolved ──▶ ANONYMOUS
//! login / signup ──────────────────────▶ AUTHENTICATED
//! logout ──────────────────────────────▶ ANONYMOUS (reset + refetch)
//! ```
//!
//! Favorites and own-story operations live in [`favorites`] and
//! [`own_stories`].

pub mod favorites;
pub mod own_stories;

use secrecy::SecretString;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use snooze_core::{Story, Username};

use crate::api::ApiError;
use crate::models::CurrentUser;
use crate::page::{AuthState, Page, StoryItem, SubView};
use crate::services::{StoryService, UserService};
use crate::storage::{ClientStorage, SessionStore, StorageError};

/// Errors raised by controller transitions.
#[derive(Debug, Error)]
pub enum ControllerError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Navigation targets reachable from the nav bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NavTarget {
    Home,
    Submit,
    Favorites,
    MyStories,
    Profile,
    Login,
}

impl NavTarget {
    /// Targets that only make sense with a logged-in user.
    #[must_use]
    pub const fn requires_user(self) -> bool {
        matches!(
            self,
            Self::Submit | Self::Favorites | Self::MyStories | Self::Profile
        )
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Submit => "submit",
            Self::Favorites => "favorites",
            Self::MyStories => "my-stories",
            Self::Profile => "profile",
            Self::Login => "login",
        }
    }
}

/// State and behaviour of one open page.
#[derive(Debug)]
pub struct Controller<U, S> {
    users: U,
    stories: S,
    current_user: Option<CurrentUser>,
    story_list: Vec<Story>,
    page: Page,
}

impl<U, S> Controller<U, S>
where
    U: UserService + Sync,
    S: StoryService + Sync,
{
    /// A controller in the initial state: anonymous, empty feed.
    pub fn new(users: U, stories: S) -> Self {
        Self {
            users,
            stories,
            current_user: None,
            story_list: Vec::new(),
            page: Page::new(),
        }
    }

    #[must_use]
    pub const fn page(&self) -> &Page {
        &self.page
    }

    #[must_use]
    pub const fn current_user(&self) -> Option<&CurrentUser> {
        self.current_user.as_ref()
    }

    /// The feed as last fetched.
    #[must_use]
    pub fn story_list(&self) -> &[Story] {
        &self.story_list
    }

    /// Page load: restore the stored session, then fetch the feed.
    ///
    /// A stored session that no longer resolves leaves the page anonymous.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage fails or the feed cannot be fetched.
    pub async fn startup<C>(&mut self, store: &SessionStore<C>) -> Result<(), ControllerError>
    where
        C: ClientStorage + Sync,
    {
        if let Some(session) = store.load().await? {
            match self
                .users
                .get_logged_in_user(&session.token, &session.username)
                .await
            {
                Ok(Some(user)) => self.current_user = Some(user),
                Ok(None) => debug!(username = %session.username, "Stored session did not resolve"),
                Err(e) => warn!(
                    username = %session.username,
                    error = %e,
                    "Failed to restore session, continuing anonymously"
                ),
            }
        }

        self.generate_stories().await?;

        if self.current_user.is_some() {
            self.page.set_auth(AuthState::Authenticated);
        }
        self.page.hide_all();
        self.page.show(SubView::AllStories);
        Ok(())
    }

    /// Refetch the feed and re-render the all-stories list.
    ///
    /// # Errors
    ///
    /// Returns an error if the feed cannot be fetched.
    pub async fn generate_stories(&mut self) -> Result<(), ApiError> {
        self.story_list = self.stories.get_stories().await?;

        self.page.all_stories.clear();
        for story in &self.story_list {
            self.page.all_stories.append(StoryItem::feed(story.clone()));
        }
        self.reconcile_stars();
        Ok(())
    }

    /// Log in with existing credentials.
    ///
    /// # Errors
    ///
    /// Returns an error if the credentials are rejected or the session cannot
    /// be stored. The page is left untouched on failure.
    pub async fn login<C>(
        &mut self,
        username: &Username,
        password: &SecretString,
        store: &SessionStore<C>,
    ) -> Result<(), ControllerError>
    where
        C: ClientStorage + Sync,
    {
        let user = self.users.login(username, password).await?;
        self.complete_authentication(user, store).await
    }

    /// Create an account and log it in.
    ///
    /// # Errors
    ///
    /// Returns an error if the account cannot be created or the session cannot
    /// be stored.
    pub async fn signup<C>(
        &mut self,
        username: &Username,
        password: &SecretString,
        name: &str,
        store: &SessionStore<C>,
    ) -> Result<(), ControllerError>
    where
        C: ClientStorage + Sync,
    {
        let user = self.users.create(username, password, name).await?;
        self.complete_authentication(user, store).await
    }

    async fn complete_authentication<C>(
        &mut self,
        user: CurrentUser,
        store: &SessionStore<C>,
    ) -> Result<(), ControllerError>
    where
        C: ClientStorage + Sync,
    {
        store.save(&user.session()).await?;
        info!(username = %user.username, "User logged in");

        self.current_user = Some(user);
        self.page.hide(SubView::LoginForms);
        self.page.set_auth(AuthState::Authenticated);
        self.page.show(SubView::AllStories);
        self.reconcile_stars();
        Ok(())
    }

    /// Clear the stored session and return to the initial state.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage fails or the feed cannot be refetched.
    pub async fn logout<C>(&mut self, store: &SessionStore<C>) -> Result<(), ControllerError>
    where
        C: ClientStorage + Sync,
    {
        store.clear().await?;
        if let Some(user) = &self.current_user {
            info!(username = %user.username, "User logged out");
        }
        self.reset();
        self.generate_stories().await?;
        Ok(())
    }

    /// Drop the user and every rendered list.
    pub fn reset(&mut self) {
        self.current_user = None;
        self.story_list.clear();
        self.page = Page::new();
    }

    /// Switch the visible section.
    ///
    /// User-only targets are ignored on an anonymous page.
    ///
    /// # Errors
    ///
    /// Returns an error if the target's data cannot be fetched.
    pub async fn navigate(&mut self, target: NavTarget) -> Result<(), ApiError> {
        if target.requires_user() && self.current_user.is_none() {
            debug!(target = target.as_str(), "Ignoring navigation without a user");
            return Ok(());
        }

        self.page.hide_all();
        match target {
            NavTarget::Home => {
                self.page.show(SubView::AllStories);
                self.generate_stories().await?;
            }
            NavTarget::Submit => {
                self.page.show(SubView::AllStories);
                self.page.show(SubView::SubmitForm);
            }
            NavTarget::Favorites => {
                self.page.show(SubView::Favorites);
                self.populate_favorites_view();
            }
            NavTarget::MyStories => {
                self.page.show(SubView::OwnStories);
                self.populate_own_stories().await?;
            }
            NavTarget::Profile => self.page.show(SubView::Profile),
            NavTarget::Login => self.page.show(SubView::LoginForms),
        }
        Ok(())
    }
}
