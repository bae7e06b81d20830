//! Markup rendering for pages and story items.
//!
//! Rendering is pure: the same page and user always produce the same markup.
//! Handlers render while they still hold the page lock, so templates borrow
//! straight from the controller.

use askama::Template;
use askama_web::WebTemplate;
use uuid::Uuid;

use snooze_core::Story;

use crate::filters;
use crate::models::CurrentUser;
use crate::page::{AuthState, Page, StoryItem, SubView};

/// Visibility flags the page template branches on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewFlags {
    pub authenticated: bool,
    pub all_stories: bool,
    pub submit_form: bool,
    pub favorites: bool,
    pub own_stories: bool,
    pub profile: bool,
    pub login_forms: bool,
}

impl From<&Page> for ViewFlags {
    fn from(page: &Page) -> Self {
        Self {
            authenticated: page.auth() == AuthState::Authenticated,
            all_stories: page.is_visible(SubView::AllStories),
            submit_form: page.is_visible(SubView::SubmitForm),
            favorites: page.is_visible(SubView::Favorites),
            own_stories: page.is_visible(SubView::OwnStories),
            profile: page.is_visible(SubView::Profile),
            login_forms: page.is_visible(SubView::LoginForms),
        }
    }
}

/// One story list item (HTMX fragment).
#[derive(Template)]
#[template(path = "partials/story.html")]
pub struct StoryItemTemplate<'a> {
    pub item: &'a StoryItem,
}

/// Everything inside `#app` (HTMX fragment).
#[derive(Template)]
#[template(path = "partials/app.html")]
pub struct AppTemplate<'a> {
    pub page: &'a Page,
    pub user: Option<&'a CurrentUser>,
    pub flags: ViewFlags,
}

/// Full document for a page load.
#[derive(Template, WebTemplate)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub page_id: Uuid,
    pub app: String,
}

/// Render a story as a feed item with an outlined star.
///
/// # Errors
///
/// Returns an error if the template fails to render.
pub fn render_story(story: &Story) -> askama::Result<String> {
    render_item(&StoryItem::feed(story.clone()))
}

/// Render a story item as it currently stands on the page.
///
/// # Errors
///
/// Returns an error if the template fails to render.
pub fn render_item(item: &StoryItem) -> askama::Result<String> {
    StoryItemTemplate { item }.render()
}

/// Render the `#app` contents.
///
/// # Errors
///
/// Returns an error if the template fails to render.
pub fn render_app(page: &Page, user: Option<&CurrentUser>) -> askama::Result<String> {
    AppTemplate {
        page,
        user,
        flags: ViewFlags::from(page),
    }
    .render()
}

/// Render the full document for a freshly opened page.
///
/// # Errors
///
/// Returns an error if the template fails to render.
pub fn render_document(
    page_id: Uuid,
    page: &Page,
    user: Option<&CurrentUser>,
) -> askama::Result<IndexTemplate> {
    Ok(IndexTemplate {
        page_id,
        app: render_app(page, user)?,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::page::{NO_FAVORITES, Star};
    use crate::testing::{story, user};

    #[test]
    fn test_render_story_contents() {
        let mut s = story("s1");
        s.title = "Rust 2024".to_string();
        s.author = "Ferris".to_string();
        s.url = "https://www.rust-lang.org/blog".to_string();

        let html = render_story(&s).unwrap();

        assert!(html.contains(r#"<li id="s1">"#));
        assert!(html.contains(r#"href="https://www.rust-lang.org/blog""#));
        assert!(html.contains(r#"target="_blank""#));
        assert!(html.contains("Rust 2024"));
        assert!(html.contains("by Ferris"));
        assert!(html.contains("(rust-lang.org)"));
        assert!(html.contains("posted by poster"));
        assert!(html.contains(r#"class="far fa-star""#));
        assert!(!html.contains("trash-can"));
    }

    #[test]
    fn test_render_story_escapes_html() {
        let mut s = story("s1");
        s.title = "<script>alert(1)</script>".to_string();

        let html = render_story(&s).unwrap();

        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_render_story_without_web_url_has_no_link() {
        let mut s = story("s1");
        s.url = "javascript:alert(document.cookie)".to_string();

        let html = render_story(&s).unwrap();

        assert!(!html.contains("href="));
        assert!(html.contains(r#"<span class="story-link">"#));
    }

    #[test]
    fn test_render_story_is_deterministic() {
        let s = story("s1");
        assert_eq!(render_story(&s).unwrap(), render_story(&s).unwrap());
    }

    #[test]
    fn test_render_owned_item() {
        let html = render_item(&StoryItem::owned(story("s1"))).unwrap();
        assert!(html.contains("trash-can"));
        assert!(html.contains("/stories/s1/delete"));
        assert!(!html.contains("fa-star"));
    }

    #[test]
    fn test_render_filled_star() {
        let mut item = StoryItem::feed(story("s1"));
        item.star = Some(Star::Filled);
        let html = render_item(&item).unwrap();
        assert!(html.contains(r#"class="fas fa-star""#));
    }

    #[test]
    fn test_render_app_anonymous() {
        let mut page = Page::new();
        page.all_stories.append(StoryItem::feed(story("s1")));

        let html = render_app(&page, None).unwrap();

        assert!(html.contains("nav-login"));
        assert!(!html.contains("nav-logout"));
        assert!(html.contains(r#"<ol id="all-stories-list" >"#));
        assert!(html.contains(r#"<ol id="favorited-stories" hidden>"#));
    }

    #[test]
    fn test_render_app_empty_favorites() {
        let mut page = Page::new();
        page.set_auth(AuthState::Authenticated);
        page.show(SubView::Favorites);
        page.favorites.show_empty(NO_FAVORITES);
        let alice = user("alice");

        let html = render_app(&page, Some(&alice)).unwrap();

        assert!(html.contains(&format!(
            r#"<li class="empty-message"><h5>{NO_FAVORITES}</h5></li>"#
        )));
        assert!(html.contains("nav-logout"));
        assert!(html.contains(">alice</a>"));
    }

    #[test]
    fn test_render_profile() {
        let mut page = Page::new();
        page.set_auth(AuthState::Authenticated);
        page.show(SubView::Profile);
        let alice = user("alice");

        let html = render_app(&page, Some(&alice)).unwrap();

        assert!(html.contains("Name: ALICE"));
        assert!(html.contains("Username: alice"));
        assert!(html.contains("Account Created: 2023-07-22"));
    }

    #[test]
    fn test_render_document_carries_page_id() {
        let id = Uuid::new_v4();
        let doc = render_document(id, &Page::new(), None).unwrap();
        let html = doc.render().unwrap();
        assert!(html.contains(&id.to_string()));
        assert!(html.contains(r#"<div id="app">"#));
    }
}
