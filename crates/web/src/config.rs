//! Web configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `SNOOZE_HOST` - Bind address (default: 127.0.0.1)
//! - `SNOOZE_PORT` - Listen port (default: 3000)
//! - `SNOOZE_BASE_URL` - Public URL of this site (default: <http://localhost:3000>)
//! - `SNOOZE_API_URL` - Story API base URL (default: <https://hack-or-snooze-v3.herokuapp.com>)
//! - `SNOOZE_FEED_LIMIT` - Stories fetched for the global feed, 1-100 (default: 25)
//! - `SNOOZE_PAGE_IDLE_MINUTES` - Minutes an idle page keeps its state, 1-10080 (default: 30)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment tag

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use thiserror::Error;
use url::Url;

const DEFAULT_API_URL: &str = "https://hack-or-snooze-v3.herokuapp.com";
const MAX_FEED_LIMIT: u32 = 100;
/// One week.
const MAX_PAGE_IDLE_MINUTES: u64 = 10_080;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Web application configuration.
#[derive(Debug, Clone)]
pub struct SnoozeConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL of the site
    pub base_url: String,
    /// Story API configuration
    pub api: StoryApiConfig,
    /// How long an untouched page keeps its in-memory state
    pub page_idle: Duration,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment tag (e.g. "production")
    pub sentry_environment: Option<String>,
}

/// Story API configuration.
#[derive(Debug, Clone)]
pub struct StoryApiConfig {
    /// Base URL the API paths are appended to
    pub base_url: Url,
    /// Number of stories requested for the global feed
    pub feed_limit: u32,
}

impl SnoozeConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = parse_env("SNOOZE_HOST", "127.0.0.1")?;
        let port = parse_env("SNOOZE_PORT", "3000")?;
        let base_url = get_env_or_default("SNOOZE_BASE_URL", "http://localhost:3000");
        let api = StoryApiConfig::from_env()?;
        let page_idle = validate_page_idle(parse_env("SNOOZE_PAGE_IDLE_MINUTES", "30")?)?;

        Ok(Self {
            host,
            port,
            base_url,
            api,
            page_idle,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether the site is served over HTTPS (secure cookies).
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

impl StoryApiConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let raw = get_env_or_default("SNOOZE_API_URL", DEFAULT_API_URL);
        let base_url = Url::parse(&raw)
            .map_err(|e| ConfigError::InvalidEnvVar("SNOOZE_API_URL".to_string(), e.to_string()))?;
        let feed_limit = validate_feed_limit(parse_env("SNOOZE_FEED_LIMIT", "25")?)?;

        Ok(Self {
            base_url,
            feed_limit,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an environment variable, falling back to a default.
fn parse_env<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    parse_value(key, &get_env_or_default(key, default))
}

fn parse_value<T>(key: &str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

fn validate_feed_limit(limit: u32) -> Result<u32, ConfigError> {
    if (1..=MAX_FEED_LIMIT).contains(&limit) {
        Ok(limit)
    } else {
        Err(ConfigError::InvalidEnvVar(
            "SNOOZE_FEED_LIMIT".to_string(),
            format!("must be between 1 and {MAX_FEED_LIMIT} (got {limit})"),
        ))
    }
}

fn validate_page_idle(minutes: u64) -> Result<Duration, ConfigError> {
    match minutes.checked_mul(60) {
        Some(secs) if (1..=MAX_PAGE_IDLE_MINUTES).contains(&minutes) => Ok(Duration::from_secs(secs)),
        _ => Err(ConfigError::InvalidEnvVar(
            "SNOOZE_PAGE_IDLE_MINUTES".to_string(),
            format!("must be between 1 and {MAX_PAGE_IDLE_MINUTES} (got {minutes})"),
        )),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn config(base_url: &str) -> SnoozeConfig {
        SnoozeConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            base_url: base_url.to_string(),
            api: StoryApiConfig {
                base_url: Url::parse(DEFAULT_API_URL).unwrap(),
                feed_limit: 25,
            },
            page_idle: Duration::from_secs(1800),
            sentry_dsn: None,
            sentry_environment: None,
        }
    }

    #[test]
    fn test_socket_addr() {
        let addr = config("http://localhost:3000").socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
    }

    #[test]
    fn test_is_secure() {
        assert!(!config("http://localhost:3000").is_secure());
        assert!(config("https://snooze.example").is_secure());
    }

    #[test]
    fn test_parse_value_reports_variable() {
        let err = parse_value::<u16>("SNOOZE_PORT", "eighty").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "SNOOZE_PORT"));
    }

    #[test]
    fn test_parse_value_trims() {
        let port: u16 = parse_value("SNOOZE_PORT", " 8080 ").unwrap();
        assert_eq!(port, 8080);
    }

    #[test]
    fn test_feed_limit_bounds() {
        assert_eq!(validate_feed_limit(1).unwrap(), 1);
        assert_eq!(validate_feed_limit(100).unwrap(), 100);
        assert!(validate_feed_limit(0).is_err());
        assert!(validate_feed_limit(101).is_err());
    }

    #[test]
    fn test_page_idle_bounds() {
        assert_eq!(validate_page_idle(1).unwrap(), Duration::from_secs(60));
        assert_eq!(
            validate_page_idle(10_080).unwrap(),
            Duration::from_secs(604_800)
        );
        assert!(validate_page_idle(0).is_err());
        assert!(validate_page_idle(10_081).is_err());
        assert!(validate_page_idle(600_000_000).is_err());

        let err = validate_page_idle(u64::MAX).unwrap_err();
        assert!(
            matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "SNOOZE_PAGE_IDLE_MINUTES")
        );
    }
}
