//! Owner-scoped resource storage for Aide.
//!
//! This crate provides the storage abstraction behind the REST API. Every
//! accessor for an owned resource (chat, message, memory, reminder) takes
//! the owner's user ID and filters by it, so a row belonging to another
//! user is indistinguishable from an absent one. Two implementations are
//! provided: an in-memory store for tests and a SQLite store for
//! production.

mod error;
mod memory;
mod sqlite;
mod traits;

pub use error::*;
pub use memory::*;
pub use sqlite::*;
pub use traits::*;
