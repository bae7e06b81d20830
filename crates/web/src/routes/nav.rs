//! Navigation handler.

use axum::{extract::Path, response::Html};
use tracing::instrument;

use super::app_fragment;
use crate::controller::NavTarget;
use crate::error::{Result, add_breadcrumb};
use crate::middleware::OpenPage;

/// Switch the visible section of a page.
#[instrument(skip_all, fields(page_id = %open.id, view = target.as_str()))]
pub async fn navigate(open: OpenPage, Path(target): Path<NavTarget>) -> Result<Html<String>> {
    add_breadcrumb("navigation", target.as_str(), None);

    let mut controller = open.page.lock().await;
    controller.navigate(target).await?;
    app_fragment(&controller)
}
