//! Session-related types.
//!
//! The credential pair persisted in browser-scoped storage so a returning
//! visitor is logged back in on the next page load.

use secrecy::SecretString;
use snooze_core::Username;

/// Persisted login credential.
///
/// Minimal data stored in the browser session to identify the logged-in user.
#[derive(Debug, Clone)]
pub struct ClientSession {
    /// Story API login token.
    pub token: SecretString,
    /// Username the token was issued for.
    pub username: Username,
}

/// Storage keys for the persisted session.
pub mod keys {
    /// Key for the story API login token.
    pub const TOKEN: &str = "token";

    /// Key for the logged-in username.
    pub const USERNAME: &str = "username";
}
