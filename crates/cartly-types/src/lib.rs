//! Shared domain types for Cartly.
//!
//! This crate contains the core domain types used across the Cartly bot:
//! chat/user/message identifiers, list items, conversation modes, callback
//! actions, keyboards, and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror.

pub mod action;
pub mod chat;
pub mod error;
pub mod keyboard;
pub mod session;
