//! Core types for Snooze.
//!
//! This module provides type-safe wrappers for the story service's domain concepts.

pub mod id;
pub mod story;

pub use id::*;
pub use story::{NewStory, NewStoryError, Story, hostname, is_web_url};
