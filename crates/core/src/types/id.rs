//! Newtype identifiers for type-safe references.
//!
//! The story API hands out opaque string identifiers. Use the `define_id!` macro
//! to create wrappers that prevent accidentally mixing a story ID with a username.

/// Macro to define a type-safe string identifier.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - Conversion methods: `new()`, `as_str()`, `into_inner()`
/// - `From<String>`, `From<&str>`, `AsRef<str>` and `Display` implementations
///
/// # Example
///
/// ```rust
/// # use snooze_core::define_id;
/// define_id!(CommentId);
/// define_id!(ThreadId);
///
/// let comment = CommentId::new("c-1");
/// let thread = ThreadId::new("c-1");
///
/// // These are different types, so this won't compile:
/// // let _: CommentId = thread;
/// assert_eq!(comment.as_str(), thread.as_str());
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from any string-like value.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Borrow the underlying string.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Convert into the underlying string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl ::core::convert::AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id!(StoryId);
define_id!(Username);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_story_id_display_is_raw_value() {
        let id = StoryId::new("abc123");
        assert_eq!(id.to_string(), "abc123");
        assert_eq!(id.as_str(), "abc123");
    }

    #[test]
    fn test_ids_serialize_transparently() {
        let id = StoryId::from("5e7b-story");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"5e7b-story\"");

        let back: Username = serde_json::from_str("\"hueter\"").unwrap();
        assert_eq!(back, Username::new("hueter"));
    }

    #[test]
    fn test_into_inner_round_trips_the_string() {
        let name = Username::new(String::from("test"));
        let raw: String = name.clone().into();
        assert_eq!(raw, name.into_inner());
    }
}
