//! Domain models for the story client.
//!
//! - [`session`] - The persisted credential pair and its storage keys
//! - [`user`] - The logged-in user held by a page's controller

pub mod session;
pub mod user;

pub use session::{ClientSession, keys as session_keys};
pub use user::CurrentUser;
