//! # Ring the Bell Telegram Bot
//!
//! Walks a user through a short form describing a shipped update, shows a
//! preview and, once confirmed, publishes a formatted announcement to a
//! broadcast chat.

pub mod announcement;
pub mod bot;
pub mod config;
pub mod dialogue;
pub mod error;
pub mod messages;
pub mod session_store;
pub mod update_type;
