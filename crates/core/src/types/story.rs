//! Story types.
//!
//! A story is a submitted link with a title, an author credit and the username
//! of the account that posted it. Stories are immutable once fetched.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::id::{StoryId, Username};

/// A story as returned by the story API.
///
/// Field names follow the API's camelCase wire format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Story {
    /// Unique story identifier, the story's identity.
    pub story_id: StoryId,
    /// Link title.
    pub title: String,
    /// Free-text author credit.
    pub author: String,
    /// Link target.
    pub url: String,
    /// Account that posted the story.
    pub username: Username,
    /// When the story was posted.
    pub created_at: DateTime<Utc>,
}

impl Story {
    /// Hostname badge for this story's link.
    #[must_use]
    pub fn hostname(&self) -> &str {
        hostname(&self.url)
    }

    /// The link target if it is an `http` or `https` URL.
    ///
    /// Stories posted by other clients may carry any scheme.
    #[must_use]
    pub fn link(&self) -> Option<&str> {
        is_web_url(&self.url).then_some(self.url.as_str())
    }
}

/// Whether a URL uses the `http` or `https` scheme.
#[must_use]
pub fn is_web_url(url: &str) -> bool {
    url.split_once("://").is_some_and(|(scheme, rest)| {
        !rest.is_empty()
            && (scheme.eq_ignore_ascii_case("http") || scheme.eq_ignore_ascii_case("https"))
    })
}

/// Derive the display hostname of a URL.
///
/// If the URL has a scheme separator (`://`) the authority after it is used,
/// otherwise everything up to the first `/`. A leading `www.` is stripped.
///
/// ```rust
/// # use snooze_core::hostname;
/// assert_eq!(hostname("https://www.example.com/a"), "example.com");
/// assert_eq!(hostname("example.com/a"), "example.com");
/// ```
#[must_use]
pub fn hostname(url: &str) -> &str {
    let rest = url.split_once("://").map_or(url, |(_, rest)| rest);
    let host = rest.split('/').next().unwrap_or(rest);
    host.strip_prefix("www.").unwrap_or(host)
}

/// Errors raised when building a [`NewStory`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NewStoryError {
    /// A required field was empty or whitespace.
    #[error("{0} is required")]
    MissingField(&'static str),
    /// The link is not an `http` or `https` URL.
    #[error("url must start with http:// or https://")]
    UnsupportedUrl,
}

/// A story submission: the fields the user fills in on the submit form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewStory {
    author: String,
    title: String,
    url: String,
}

impl NewStory {
    /// Build a submission, trimming each field.
    ///
    /// # Errors
    ///
    /// Returns [`NewStoryError::MissingField`] for the first blank field, or
    /// [`NewStoryError::UnsupportedUrl`] for a link that is not http(s).
    pub fn new(
        title: impl AsRef<str>,
        author: impl AsRef<str>,
        url: impl AsRef<str>,
    ) -> Result<Self, NewStoryError> {
        let title = required("title", title.as_ref())?;
        let author = required("author", author.as_ref())?;
        let url = required("url", url.as_ref())?;
        if !is_web_url(&url) {
            return Err(NewStoryError::UnsupportedUrl);
        }
        Ok(Self { author, title, url })
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn author(&self) -> &str {
        &self.author
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

fn required(field: &'static str, value: &str) -> Result<String, NewStoryError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(NewStoryError::MissingField(field));
    }
    Ok(value.to_owned())
}
