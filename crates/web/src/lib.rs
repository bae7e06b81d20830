//! Snooze web client library.
//!
//! A server-rendered client for the Hack or Snooze story API. Each page load
//! gets its own [`controller::Controller`]; HTMX events are routed to it by
//! page id and answered with re-rendered markup.
//!
//! This crate provides the web client as a library, allowing it to be tested
//! and reused.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod controller;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod models;
pub mod page;
pub mod render;
pub mod routes;
pub mod services;
pub mod state;
pub mod storage;

#[cfg(test)]
mod testing;

use axum::{Router, extract::Request};
use tower_http::trace::TraceLayer;
use tracing::Span;

use state::AppState;

/// Build the full application router with its middleware stack.
pub fn app(state: AppState) -> Router {
    let session_layer = middleware::create_session_layer(state.config());

    Router::new()
        .merge(routes::routes())
        .layer(session_layer)
        .layer(axum::middleware::from_fn(middleware::request_id_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(request_span))
        .with_state(state)
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
}

/// Span for one HTTP request. `request_id` is filled in by the request ID
/// middleware.
#[must_use]
pub fn request_span(request: &Request) -> Span {
    tracing::info_span!(
        "request",
        method = %request.method(),
        uri = %request.uri(),
        request_id = tracing::field::Empty,
    )
}
