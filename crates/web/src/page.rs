//! In-memory page model.
//!
//! The page is what the browser shows: which sections are visible, the story
//! items in each list, and each item's star state. Controllers mutate it and
//! the templates in [`render`](crate::render) turn it into markup.

use std::collections::BTreeSet;

use snooze_core::{Story, StoryId};

/// Empty-state message of the favorites list.
pub const NO_FAVORITES: &str = "No favorites added!";

/// Empty-state message of the own-stories list.
pub const NO_OWN_STORIES: &str = "No stories added by user yet!";

/// Whether a user is logged in on this page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AuthState {
    #[default]
    Anonymous,
    Authenticated,
}

/// A section of the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SubView {
    AllStories,
    SubmitForm,
    Favorites,
    OwnStories,
    Profile,
    LoginForms,
}

impl SubView {
    /// Overlays can be shown on top of the primary view.
    #[must_use]
    pub const fn is_overlay(self) -> bool {
        matches!(self, Self::SubmitForm | Self::LoginForms)
    }
}

/// Visual state of a favorite star.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Star {
    Filled,
    Outline,
}

impl Star {
    /// The star a story gets for the given favorite membership.
    #[must_use]
    pub const fn for_membership(is_favorite: bool) -> Self {
        if is_favorite { Self::Filled } else { Self::Outline }
    }

    #[must_use]
    pub const fn flipped(self) -> Self {
        match self {
            Self::Filled => Self::Outline,
            Self::Outline => Self::Filled,
        }
    }

    /// Font Awesome style class.
    #[must_use]
    pub const fn css_class(self) -> &'static str {
        match self {
            Self::Filled => "fas",
            Self::Outline => "far",
        }
    }

    #[must_use]
    pub const fn is_filled(self) -> bool {
        matches!(self, Self::Filled)
    }
}

/// One rendered story.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoryItem {
    pub story: Story,
    /// `None` when the item has no favorite toggle.
    pub star: Option<Star>,
    /// Whether the item offers a delete action.
    pub deletable: bool,
}

impl StoryItem {
    /// A feed item: outlined star, no delete action.
    #[must_use]
    pub const fn feed(story: Story) -> Self {
        Self {
            story,
            star: Some(Star::Outline),
            deletable: false,
        }
    }

    /// An item in the user's own stories: no star, delete action.
    #[must_use]
    pub const fn owned(story: Story) -> Self {
        Self {
            story,
            star: None,
            deletable: true,
        }
    }

    #[must_use]
    pub fn id(&self) -> &StoryId {
        &self.story.story_id
    }
}

/// A story list section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoryContainer {
    items: Vec<StoryItem>,
    empty_message: Option<&'static str>,
}

impl StoryContainer {
    #[must_use]
    pub fn items(&self) -> &[StoryItem] {
        &self.items
    }

    /// Message shown instead of items, if any.
    #[must_use]
    pub const fn empty_message(&self) -> Option<&'static str> {
        self.empty_message
    }

    /// Remove every item and any empty-state message.
    pub fn clear(&mut self) {
        self.items.clear();
        self.empty_message = None;
    }

    pub fn append(&mut self, item: StoryItem) {
        self.items.push(item);
    }

    pub fn prepend(&mut self, item: StoryItem) {
        self.items.insert(0, item);
    }

    /// Show an empty-state message in place of items.
    pub fn show_empty(&mut self, message: &'static str) {
        self.items.clear();
        self.empty_message = Some(message);
    }

    pub fn remove(&mut self, story_id: &StoryId) {
        self.items.retain(|item| item.id() != story_id);
    }

    #[must_use]
    pub fn get(&self, story_id: &StoryId) -> Option<&StoryItem> {
        self.items.iter().find(|item| item.id() == story_id)
    }

    fn items_mut(&mut self) -> impl Iterator<Item = &mut StoryItem> {
        self.items.iter_mut()
    }
}

/// The whole page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    auth: AuthState,
    visible: BTreeSet<SubView>,
    pub all_stories: StoryContainer,
    pub favorites: StoryContainer,
    pub own_stories: StoryContainer,
}

impl Default for Page {
    fn default() -> Self {
        Self::new()
    }
}

impl Page {
    /// A fresh page: anonymous, showing the (still empty) feed.
    #[must_use]
    pub fn new() -> Self {
        Self {
            auth: AuthState::Anonymous,
            visible: BTreeSet::from([SubView::AllStories]),
            all_stories: StoryContainer::default(),
            favorites: StoryContainer::default(),
            own_stories: StoryContainer::default(),
        }
    }

    #[must_use]
    pub const fn auth(&self) -> AuthState {
        self.auth
    }

    pub const fn set_auth(&mut self, auth: AuthState) {
        self.auth = auth;
    }

    #[must_use]
    pub fn is_visible(&self, view: SubView) -> bool {
        self.visible.contains(&view)
    }

    /// The visible non-overlay section, if any.
    #[must_use]
    pub fn primary(&self) -> Option<SubView> {
        self.visible.iter().copied().find(|view| !view.is_overlay())
    }

    pub fn hide_all(&mut self) {
        self.visible.clear();
    }

    /// Show a section.
    ///
    /// Showing a primary section hides the previous primary; overlays stay.
    pub fn show(&mut self, view: SubView) {
        if !view.is_overlay() {
            self.visible.retain(|visible| visible.is_overlay());
        }
        self.visible.insert(view);
    }

    pub fn hide(&mut self, view: SubView) {
        self.visible.remove(&view);
    }

    /// Every item that has a star, across all lists.
    pub fn starred_items_mut(&mut self) -> impl Iterator<Item = &mut StoryItem> {
        self.all_stories
            .items_mut()
            .chain(self.favorites.items_mut())
            .chain(self.own_stories.items_mut())
            .filter(|item| item.star.is_some())
    }

    /// Flip the star of every item showing `story_id`.
    pub fn flip_star(&mut self, story_id: &StoryId) {
        for item in self.starred_items_mut() {
            if item.id() == story_id {
                item.star = item.star.map(Star::flipped);
            }
        }
    }

    /// Set the star of every item showing `story_id`.
    pub fn set_star(&mut self, story_id: &StoryId, star: Star) {
        for item in self.starred_items_mut() {
            if item.id() == story_id {
                item.star = Some(star);
            }
        }
    }

    /// First starred item for a story, looking at the feed first.
    #[must_use]
    pub fn starred_item(&self, story_id: &StoryId) -> Option<&StoryItem> {
        [&self.all_stories, &self.favorites]
            .into_iter()
            .find_map(|container| container.get(story_id))
            .filter(|item| item.star.is_some())
    }

    /// Drop a story from every list.
    pub fn remove_story(&mut self, story_id: &StoryId) {
        self.all_stories.remove(story_id);
        self.favorites.remove(story_id);
        self.own_stories.remove(story_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::story;

    #[test]
    fn test_new_page_shows_feed_only() {
        let page = Page::new();
        assert_eq!(page.auth(), AuthState::Anonymous);
        assert_eq!(page.primary(), Some(SubView::AllStories));
        assert!(!page.is_visible(SubView::LoginForms));
    }

    #[test]
    fn test_show_primary_replaces_primary() {
        let mut page = Page::new();
        page.show(SubView::Favorites);
        assert!(!page.is_visible(SubView::AllStories));
        assert_eq!(page.primary(), Some(SubView::Favorites));
    }

    #[test]
    fn test_overlay_keeps_primary() {
        let mut page = Page::new();
        page.show(SubView::SubmitForm);
        assert!(page.is_visible(SubView::AllStories));
        assert!(page.is_visible(SubView::SubmitForm));

        page.show(SubView::OwnStories);
        assert!(page.is_visible(SubView::SubmitForm));
        assert_eq!(page.primary(), Some(SubView::OwnStories));
    }

    #[test]
    fn test_hide_all() {
        let mut page = Page::new();
        page.show(SubView::LoginForms);
        page.hide_all();
        assert_eq!(page.primary(), None);
        assert!(!page.is_visible(SubView::LoginForms));
    }

    #[test]
    fn test_star_helpers() {
        assert_eq!(Star::for_membership(true), Star::Filled);
        assert_eq!(Star::Filled.flipped(), Star::Outline);
        assert_eq!(Star::Outline.css_class(), "far");
    }

    #[test]
    fn test_flip_star_touches_every_copy() {
        let mut page = Page::new();
        page.all_stories.append(StoryItem::feed(story("a")));
        page.favorites.append(StoryItem::feed(story("a")));
        page.all_stories.append(StoryItem::feed(story("b")));

        page.flip_star(&StoryId::new("a"));

        assert_eq!(page.all_stories.items()[0].star, Some(Star::Filled));
        assert_eq!(page.favorites.items()[0].star, Some(Star::Filled));
        assert_eq!(page.all_stories.items()[1].star, Some(Star::Outline));
    }

    #[test]
    fn test_own_story_items_have_no_star() {
        let mut page = Page::new();
        page.own_stories.append(StoryItem::owned(story("a")));

        page.set_star(&StoryId::new("a"), Star::Filled);

        assert_eq!(page.own_stories.items()[0].star, None);
        assert!(page.starred_item(&StoryId::new("a")).is_none());
    }

    #[test]
    fn test_container_empty_message_cleared() {
        let mut container = StoryContainer::default();
        container.show_empty(NO_FAVORITES);
        assert_eq!(container.empty_message(), Some(NO_FAVORITES));

        container.clear();
        assert_eq!(container.empty_message(), None);
    }

    #[test]
    fn test_prepend_reverses_order() {
        let mut container = StoryContainer::default();
        container.prepend(StoryItem::feed(story("old")));
        container.prepend(StoryItem::feed(story("new")));
        assert_eq!(container.items()[0].id().as_str(), "new");
    }

    #[test]
    fn test_remove_story_everywhere() {
        let mut page = Page::new();
        page.all_stories.append(StoryItem::feed(story("a")));
        page.own_stories.append(StoryItem::owned(story("a")));

        page.remove_story(&StoryId::new("a"));

        assert!(page.all_stories.items().is_empty());
        assert!(page.own_stories.items().is_empty());
    }
}
