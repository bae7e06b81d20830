//! Login, signup, session restore and logout.

#![allow(clippy::unwrap_used)]

use snooze_integration_tests::{FakeStoryApi, TestContext, is_hidden, item_html};

fn api() -> FakeStoryApi {
    FakeStoryApi::default()
        .with_user("alice", "secret")
        .with_story("s1", "First post", "alice")
        .with_story("s2", "Second post", "alice")
        .with_favorite("alice", "s1")
}

#[tokio::test]
async fn login_reconciles_favorites() {
    let ctx = TestContext::new(api()).await;

    let page = ctx.logged_in("alice", "secret").await;

    assert!(page.html.contains("nav-logout"));
    assert!(page.html.contains(">alice</a>"));
    assert!(is_hidden(&page.html, "login-forms"));
    assert!(!is_hidden(&page.html, "all-stories-list"));
    assert!(item_html(&page.html, "s1").unwrap().contains("fas fa-star"));
    assert!(item_html(&page.html, "s2").unwrap().contains("far fa-star"));
}

#[tokio::test]
async fn login_persists_across_page_loads() {
    let ctx = TestContext::new(api()).await;
    ctx.logged_in("alice", "secret").await;

    let reload = ctx.load().await;

    assert!(reload.html.contains("nav-logout"));
    assert!(item_html(&reload.html, "s1").unwrap().contains("fas fa-star"));

    let stranger = ctx.other_browser().load().await;
    assert!(stranger.html.contains("nav-login"));
}

#[tokio::test]
async fn wrong_password_is_reported() {
    let ctx = TestContext::new(api()).await;
    let page = ctx.load().await;

    let response = ctx
        .event(
            &page.id,
            "/auth/login",
            &[("username", "alice"), ("password", "nope")],
        )
        .await;

    assert_eq!(response.status(), 401);
    assert_eq!(response.text().await.unwrap(), "Invalid username or password");
    assert!(ctx.load().await.html.contains("nav-login"));
}

#[tokio::test]
async fn signup_logs_in() {
    let ctx = TestContext::new(api()).await;
    let page = ctx.load().await;

    let html = ctx
        .event_html(
            &page.id,
            "/auth/signup",
            &[("name", "Bob Builder"), ("username", "bob"), ("password", "pw")],
        )
        .await;
    assert!(html.contains(">bob</a>"));

    let profile = ctx.event_html(&page.id, "/nav/profile", &[]).await;
    assert!(!is_hidden(&profile, "user-profile"));
    assert!(profile.contains("Name: Bob Builder"));
    assert!(profile.contains("Account Created: 2024-03-09"));
}

#[tokio::test]
async fn signup_with_taken_username_fails() {
    let ctx = TestContext::new(api()).await;
    let page = ctx.load().await;

    let response = ctx
        .event(
            &page.id,
            "/auth/signup",
            &[("name", "Imposter"), ("username", "alice"), ("password", "pw")],
        )
        .await;

    assert_eq!(response.status(), 422);
    assert_eq!(response.text().await.unwrap(), "Username already taken");
}

#[tokio::test]
async fn logout_resets_page_and_session() {
    let ctx = TestContext::new(api()).await;
    let page = ctx.logged_in("alice", "secret").await;
    ctx.event_html(&page.id, "/nav/profile", &[]).await;

    let html = ctx.event_html(&page.id, "/auth/logout", &[]).await;

    assert!(html.contains("nav-login"));
    assert!(!is_hidden(&html, "all-stories-list"));
    assert!(is_hidden(&html, "user-profile"));
    assert!(item_html(&html, "s1").unwrap().contains("far fa-star"));

    let reload = ctx.load().await;
    assert!(reload.html.contains("nav-login"));
}
