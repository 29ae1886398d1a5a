//! Session and state-coordination core for Cartly.
//!
//! This crate owns the per-chat shared list, the per-user input-mode state
//! machine, the menu-message lifecycle, and the ephemeral-message tracker.
//! It talks to the outside world only through the [`gateway::Gateway`]
//! port trait -- it never depends on `cartly-telegram` or any HTTP crate.

pub mod cleanup;
pub mod dispatch;
pub mod gateway;
pub mod menu;
pub mod render;
pub mod session;
pub mod store;
pub mod texts;

#[cfg(test)]
pub(crate) mod testing;
