//! Page id extraction.
//!
//! The document sets `X-Page-Id` on every HTMX request (`hx-headers` on
//! `<body>`). Handlers take [`OpenPage`] to get that page's controller.

use axum::{extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::error::AppError;
use crate::state::{AppState, SharedPage};

/// The HTTP header carrying the page id.
pub const PAGE_ID_HEADER: &str = "x-page-id";

/// Read the page id from request headers.
fn page_id(parts: &Parts) -> Option<Uuid> {
    parts
        .headers
        .get(PAGE_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .and_then(|v| Uuid::parse_str(v.trim()).ok())
}

/// Extractor resolving the request's page in the page registry.
///
/// A missing, malformed or expired id rejects with
/// [`AppError::PageExpired`], which makes the browser reload.
pub struct OpenPage {
    pub id: Uuid,
    pub page: SharedPage,
}

impl FromRequestParts<AppState> for OpenPage {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let id = page_id(parts).ok_or(AppError::PageExpired)?;
        let page = state.page(id).await?;
        Ok(Self { id, page })
    }
}
