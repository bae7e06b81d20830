//! Favorites synchronizer.
//!
//! Keeps every rendered star in step with the current user's favorites: a
//! story's star is filled exactly when the story is a favorite.

use tracing::debug;

use snooze_core::StoryId;

use super::Controller;
use crate::api::ApiError;
use crate::models::CurrentUser;
use crate::page::{NO_FAVORITES, Star, StoryItem};
use crate::services::{StoryService, UserService};

impl<U, S> Controller<U, S>
where
    U: UserService + Sync,
    S: StoryService + Sync,
{
    /// Star click: add or remove a favorite.
    ///
    /// The star flips straight away and is then set from the favorites the
    /// story API returns. Returns the settled star, or `None` when there is no
    /// user to favorite for.
    ///
    /// # Errors
    ///
    /// Returns the service error after restoring every star from the
    /// favorites still held.
    pub async fn toggle_favorite(&mut self, story_id: &StoryId) -> Result<Option<Star>, ApiError> {
        let Some(user) = self.current_user.as_ref() else {
            debug!(story_id = %story_id, "Ignoring favorite toggle without a user");
            return Ok(None);
        };

        self.page.flip_star(story_id);

        let result = if user.is_favorite(story_id) {
            self.users.remove_favorite(user, story_id).await
        } else {
            self.users.add_favorite(user, story_id).await
        };

        let favorites = match result {
            Ok(favorites) => favorites,
            Err(e) => {
                self.reconcile_stars();
                return Err(e);
            }
        };

        let star = match self.current_user.as_mut() {
            Some(user) => {
                user.set_favorites(favorites);
                Star::for_membership(user.is_favorite(story_id))
            }
            None => Star::Outline,
        };
        self.page.set_star(story_id, star);
        Ok(Some(star))
    }

    /// Set every rendered star from favorite membership.
    pub fn reconcile_stars(&mut self) {
        let favorites = self
            .current_user
            .as_ref()
            .map(CurrentUser::favorite_ids)
            .unwrap_or_default();

        for item in self.page.starred_items_mut() {
            item.star = Some(Star::for_membership(favorites.contains(item.id())));
        }
    }

    /// Render the favorites list, most recently added first.
    pub fn populate_favorites_view(&mut self) {
        self.page.favorites.clear();

        let favorites = self
            .current_user
            .as_ref()
            .map(CurrentUser::favorites)
            .unwrap_or_default();

        if favorites.is_empty() {
            self.page.favorites.show_empty(NO_FAVORITES);
            return;
        }
        for story in favorites {
            self.page.favorites.prepend(StoryItem::feed(story.clone()));
        }
        self.reconcile_stars();
    }
}
