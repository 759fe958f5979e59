//! Core entity definitions for Aide.
//!
//! This crate defines the data types shared across the Aide backend:
//! users, chats and their messages, memories, and reminders. Every
//! resource except `User` is owned by exactly one user.

mod chat;
mod memory;
mod reminder;
mod user;

pub use chat::*;
pub use memory::*;
pub use reminder::*;
pub use user::*;
