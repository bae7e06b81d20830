//! Integration tests for Snooze.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p snooze-integration-tests
//! ```
//!
//! Every test gets a [`TestContext`]: a fake story API and the real web
//! router, each on an ephemeral port, plus a cookie-keeping HTTP client that
//! plays the browser.
//!
//! # Test Categories
//!
//! - `page_load` - Anonymous load, health, expired pages
//! - `auth` - Login, signup, session restore, logout
//! - `favorites` - Star clicks and the favorites view
//! - `own_stories` - Submitting and deleting stories

mod fake_api;

use std::net::SocketAddr;
use std::time::Duration;

use axum::Router;
use tokio::net::TcpListener;
use url::Url;

use snooze_web::config::{SnoozeConfig, StoryApiConfig};
use snooze_web::middleware::PAGE_ID_HEADER;
use snooze_web::state::AppState;

pub use fake_api::FakeStoryApi;

/// A running fake API and web client.
pub struct TestContext {
    pub client: reqwest::Client,
    pub base_url: String,
    pub api: FakeStoryApi,
}

/// A loaded page: its id and the document markup.
pub struct LoadedPage {
    pub id: String,
    pub html: String,
}

async fn serve(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local address");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("test server");
    });
    addr
}

impl TestContext {
    /// Start both servers against the given fake API.
    pub async fn new(api: FakeStoryApi) -> Self {
        let api_addr = serve(api.router()).await;

        let config = SnoozeConfig {
            host: "127.0.0.1".parse().expect("loopback"),
            port: 0,
            base_url: "http://localhost".to_string(),
            api: StoryApiConfig {
                base_url: Url::parse(&format!("http://{api_addr}")).expect("api url"),
                feed_limit: 25,
            },
            page_idle: Duration::from_secs(300),
            sentry_dsn: None,
            sentry_environment: None,
        };
        let state = AppState::new(config).expect("app state");
        let web_addr = serve(snooze_web::app(state)).await;

        let client = reqwest::Client::builder()
            .cookie_store(true)
            .build()
            .expect("http client");

        Self {
            client,
            base_url: format!("http://{web_addr}"),
            api,
        }
    }

    /// Another browser: same servers, separate cookies.
    pub fn other_browser(&self) -> Self {
        Self {
            client: reqwest::Client::builder()
                .cookie_store(true)
                .build()
                .expect("http client"),
            base_url: self.base_url.clone(),
            api: self.api.clone(),
        }
    }

    /// `GET /` and pull the page id out of the document.
    pub async fn load(&self) -> LoadedPage {
        let response = self
            .client
            .get(&self.base_url)
            .send()
            .await
            .expect("page load");
        assert!(response.status().is_success(), "page load failed");
        let html = response.text().await.expect("page body");
        let id = page_id(&html).expect("page id in document").to_string();
        LoadedPage { id, html }
    }

    /// Send a page event (an HTMX post) for the given page.
    pub async fn event(&self, page_id: &str, path: &str, form: &[(&str, &str)]) -> reqwest::Response {
        self.client
            .post(format!("{}{path}", self.base_url))
            .header(PAGE_ID_HEADER, page_id)
            .form(form)
            .send()
            .await
            .expect("page event")
    }

    /// Send a page event and return the markup, asserting success.
    pub async fn event_html(&self, page_id: &str, path: &str, form: &[(&str, &str)]) -> String {
        let response = self.event(page_id, path, form).await;
        let status = response.status();
        let body = response.text().await.expect("event body");
        assert!(status.is_success(), "{path} returned {status}: {body}");
        body
    }

    /// Load a page and log in on it.
    pub async fn logged_in(&self, username: &str, password: &str) -> LoadedPage {
        let page = self.load().await;
        let html = self
            .event_html(
                &page.id,
                "/auth/login",
                &[("username", username), ("password", password)],
            )
            .await;
        LoadedPage { id: page.id, html }
    }
}

/// The page id from the document's `hx-headers`.
#[must_use]
pub fn page_id(html: &str) -> Option<&str> {
    let marker = r#""X-Page-Id": ""#;
    let start = html.find(marker)? + marker.len();
    let rest = html.get(start..)?;
    rest.split('"').next()
}

/// The markup of the first rendered item for a story.
#[must_use]
pub fn item_html<'h>(html: &'h str, story_id: &str) -> Option<&'h str> {
    let start = html.find(&format!(r#"<li id="{story_id}">"#))?;
    let rest = html.get(start..)?;
    let end = rest.find("</li>")?;
    rest.get(..end)
}

/// The markup of a section or list, from its opening tag to its first close.
#[must_use]
pub fn section_html<'h>(html: &'h str, element_id: &str, close: &str) -> Option<&'h str> {
    let start = html.find(&format!(r#"id="{element_id}""#))?;
    let rest = html.get(start..)?;
    let end = rest.find(close)?;
    rest.get(..end)
}

/// Whether a section's opening tag carries `hidden`.
#[must_use]
pub fn is_hidden(html: &str, element_id: &str) -> bool {
    section_html(html, element_id, ">").is_some_and(|tag| tag.contains("hidden"))
}
