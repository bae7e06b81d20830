//! Application state shared across handlers.

use std::sync::Arc;

use moka::future::Cache;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::api::{ApiClient, ApiError};
use crate::config::SnoozeConfig;
use crate::controller::Controller;
use crate::error::AppError;

/// Upper bound on pages kept in memory at once.
const MAX_OPEN_PAGES: u64 = 10_000;

/// The controller type every open page gets.
pub type PageController = Controller<ApiClient, ApiClient>;

/// A registered page. The mutex serializes that page's events.
pub type SharedPage = Arc<Mutex<PageController>>;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// story API client and the registry of open pages.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: SnoozeConfig,
    api: ApiClient,
    pages: Cache<Uuid, SharedPage>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the story API base URL is unusable.
    pub fn new(config: SnoozeConfig) -> Result<Self, ApiError> {
        let api = ApiClient::new(&config.api)?;
        let pages = Cache::builder()
            .max_capacity(MAX_OPEN_PAGES)
            .time_to_idle(config.page_idle)
            .build();

        Ok(Self {
            inner: Arc::new(AppStateInner { config, api, pages }),
        })
    }

    /// Get a reference to the configuration.
    #[must_use]
    pub fn config(&self) -> &SnoozeConfig {
        &self.inner.config
    }

    /// Get a reference to the story API client.
    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    /// A controller for a fresh page load.
    #[must_use]
    pub fn new_controller(&self) -> PageController {
        Controller::new(self.inner.api.clone(), self.inner.api.clone())
    }

    /// Register a started controller under a new page id.
    pub async fn open_page(&self, controller: PageController) -> (Uuid, SharedPage) {
        let id = Uuid::new_v4();
        let page = Arc::new(Mutex::new(controller));
        self.inner.pages.insert(id, Arc::clone(&page)).await;
        (id, page)
    }

    /// Look up an open page.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::PageExpired`] if the id is unknown or idled out.
    pub async fn page(&self, id: Uuid) -> Result<SharedPage, AppError> {
        self.inner.pages.get(&id).await.ok_or(AppError::PageExpired)
    }
}
