//! The current user's own stories: listing, deleting and submitting.

use tracing::debug;

use snooze_core::{NewStory, Story, StoryId};

use super::Controller;
use crate::api::ApiError;
use crate::page::{NO_OWN_STORIES, StoryItem, SubView};
use crate::services::{StoryService, UserService};

impl<U, S> Controller<U, S>
where
    U: UserService + Sync,
    S: StoryService + Sync,
{
    /// Fetch the user's stories and render them, most recent first.
    ///
    /// # Errors
    ///
    /// Returns an error if the stories cannot be fetched.
    pub async fn populate_own_stories(&mut self) -> Result<(), ApiError> {
        let Some(user) = self.current_user.as_ref() else {
            return Ok(());
        };
        let stories = self.users.own_stories(user).await?;

        self.page.own_stories.clear();
        if stories.is_empty() {
            self.page.own_stories.show_empty(NO_OWN_STORIES);
        }
        for story in &stories {
            self.page.own_stories.prepend(StoryItem::owned(story.clone()));
        }

        if let Some(user) = self.current_user.as_mut() {
            user.set_own_stories(stories);
        }
        Ok(())
    }

    /// Delete one of the user's stories and re-render the list.
    ///
    /// A story the API no longer knows counts as deleted.
    ///
    /// # Errors
    ///
    /// Returns an error if the deletion or the refetch fails.
    pub async fn delete_story(&mut self, story_id: &StoryId) -> Result<(), ApiError> {
        let Some(user) = self.current_user.as_ref() else {
            debug!(story_id = %story_id, "Ignoring delete without a user");
            return Ok(());
        };

        match self.users.delete_story(user, story_id).await {
            Ok(()) => {}
            Err(ApiError::NotFound(_)) => {
                debug!(story_id = %story_id, "Story already gone");
            }
            Err(e) => return Err(e),
        }

        self.story_list.retain(|story| &story.story_id != story_id);
        self.page.remove_story(story_id);
        if let Some(user) = self.current_user.as_mut() {
            user.forget_story(story_id);
        }
        self.populate_own_stories().await
    }

    /// Post a story, then refresh the user's stories and the feed.
    ///
    /// Returns `None` when there is no user to post as.
    ///
    /// # Errors
    ///
    /// Returns an error if posting or either refresh fails.
    pub async fn submit_story(&mut self, new_story: &NewStory) -> Result<Option<Story>, ApiError> {
        let Some(user) = self.current_user.as_ref() else {
            debug!("Ignoring story submission without a user");
            return Ok(None);
        };

        let story = self.stories.add_story(user, new_story).await?;

        self.page.hide(SubView::SubmitForm);
        self.populate_own_stories().await?;
        self.generate_stories().await?;
        Ok(Some(story))
    }
}
