//! # Event Handlers
//!
//! Handlers for user actions that only read remote state: session lifecycle,
//! pool selection, and refreshes. Mutating workflows live in [`crate::app::tasks`].

pub mod pools;
pub mod session;
