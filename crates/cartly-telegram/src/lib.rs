//! Telegram Bot API gateway for Cartly.
//!
//! Implements the `cartly-core` gateway port over HTTPS: message
//! send/edit/delete, callback answering, command registration, and the
//! `getUpdates` long-polling loop that feeds inbound events to the
//! dispatcher.

pub mod api;
pub mod client;
pub mod poll;

pub use client::TelegramClient;
pub use poll::run_update_loop;
