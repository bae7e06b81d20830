//! Custom Askama template filters.

use std::fmt::Display;

/// Keeps the date part of a timestamp.
///
/// Usage in templates: `{{ user.created_at|short_date }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn short_date(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(date_part(&value.to_string()).to_string())
}

/// Works for both RFC 3339 (`2024-01-05T10:00:00Z`) and chrono's `Display`
/// form (`2024-01-05 10:00:00 UTC`).
fn date_part(value: &str) -> &str {
    value.split(['T', ' ']).next().unwrap_or(value)
}
