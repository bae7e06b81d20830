//! HTTP middleware stack.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//! 4. Session layer (tower-sessions with in-memory store)
//!
//! [`OpenPage`] is an extractor rather than a layer: only page events need it.

pub mod page;
pub mod request_id;
pub mod session;

pub use page::{OpenPage, PAGE_ID_HEADER};
pub use request_id::request_id_middleware;
pub use session::create_session_layer;
