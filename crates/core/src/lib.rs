//! Snooze Core - Shared types library.
//!
//! This crate provides the types used across the Snooze components:
//! - `web` - The server-rendered story client
//! - `integration-tests` - End-to-end tests against a fake story API
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O and no
//! HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype identifiers, stories, and hostname derivation

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
