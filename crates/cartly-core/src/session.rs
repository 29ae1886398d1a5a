//! Per-user conversation modes within one chat, plus removal-index parsing.

use std::collections::HashMap;

use cartly_types::chat::UserId;
use cartly_types::error::NotANumber;
use cartly_types::session::Mode;

/// Input modes for every user known to one chat.
///
/// Entries are created lazily; a user with no entry is in [`Mode::None`].
/// Lives inside the chat's locked state, so each (chat, user) pair has
/// exactly one mode at any instant.
#[derive(Debug, Default)]
pub struct SessionTable {
    modes: HashMap<UserId, Mode>,
}

impl SessionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// The user's current mode.
    pub fn mode(&self, user: UserId) -> Mode {
        self.modes.get(&user).copied().unwrap_or_default()
    }

    /// Enter a mode, replacing whatever was active before.
    pub fn set(&mut self, user: UserId, mode: Mode) {
        self.modes.insert(user, mode);
    }

    /// Back to [`Mode::None`]: flow completed, cancelled, or abandoned.
    pub fn reset(&mut self, user: UserId) {
        self.modes.remove(&user);
    }
}

/// Parse free text as the 1-based index the removal flow expects.
///
/// Explicit parse result instead of exception-driven parsing: the state
/// machine consumes `Err(NotANumber)` as a retry, never a crash.
pub fn parse_user_index(input: &str) -> Result<usize, NotANumber> {
    input
        .trim()
        .parse::<usize>()
        .map_err(|_| NotANumber(input.trim().to_string()))
}
