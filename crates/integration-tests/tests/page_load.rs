//! Anonymous page loads, health checks and expired pages.

#![allow(clippy::unwrap_used)]

use snooze_integration_tests::{FakeStoryApi, TestContext, is_hidden, item_html};

fn feed() -> FakeStoryApi {
    FakeStoryApi::default()
        .with_user("alice", "secret")
        .with_story("s1", "First post", "alice")
        .with_story("s2", "Second post", "alice")
}

#[tokio::test]
async fn anonymous_load_shows_feed() {
    let ctx = TestContext::new(feed()).await;

    let page = ctx.load().await;

    assert!(!is_hidden(&page.html, "all-stories-list"));
    assert!(is_hidden(&page.html, "login-forms"));
    assert!(is_hidden(&page.html, "favorited-stories"));
    assert!(page.html.contains("nav-login"));
    assert!(!page.html.contains("nav-logout"));

    let newest = page.html.find(r#"<li id="s2">"#).unwrap();
    let oldest = page.html.find(r#"<li id="s1">"#).unwrap();
    assert!(newest < oldest, "feed keeps API order");

    let item = item_html(&page.html, "s1").unwrap();
    assert!(item.contains("First post"));
    assert!(item.contains("by Ada Lovelace"));
    assert!(item.contains("(example.com)"));
    assert!(item.contains("posted by alice"));
    assert!(item.contains("far fa-star"));
}

#[tokio::test]
async fn anonymous_star_click_is_ignored() {
    let ctx = TestContext::new(feed()).await;
    let page = ctx.load().await;

    let html = ctx.event_html(&page.id, "/stories/s1/favorite", &[]).await;

    assert!(html.contains("far fa-star"));
    assert!(ctx.api.favorites_of("alice").is_empty());
}

#[tokio::test]
async fn anonymous_user_only_navigation_is_ignored() {
    let ctx = TestContext::new(feed()).await;
    let page = ctx.load().await;

    let html = ctx.event_html(&page.id, "/nav/favorites", &[]).await;

    assert!(!is_hidden(&html, "all-stories-list"));
    assert!(is_hidden(&html, "favorited-stories"));
}

#[tokio::test]
async fn login_navigation_shows_forms() {
    let ctx = TestContext::new(feed()).await;
    let page = ctx.load().await;

    let html = ctx.event_html(&page.id, "/nav/login", &[]).await;

    assert!(!is_hidden(&html, "login-forms"));
    assert!(is_hidden(&html, "all-stories-list"));
}

#[tokio::test]
async fn unknown_page_asks_for_reload() {
    let ctx = TestContext::new(feed()).await;

    let response = ctx
        .event("00000000-0000-0000-0000-000000000000", "/nav/home", &[])
        .await;

    assert_eq!(response.status(), 409);
    assert_eq!(response.headers().get("hx-refresh").unwrap(), "true");
}

#[tokio::test]
async fn unknown_view_is_rejected() {
    let ctx = TestContext::new(feed()).await;
    let page = ctx.load().await;

    let response = ctx.event(&page.id, "/nav/admin", &[]).await;

    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn health_endpoints() {
    let ctx = TestContext::new(feed()).await;

    let live = ctx
        .client
        .get(format!("{}/health", ctx.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(live.text().await.unwrap(), "ok");

    let ready = ctx
        .client
        .get(format!("{}/health/ready", ctx.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(ready.status(), 200);
}
