//! Ephemeral message tracker: prompts, replies, and transient notices that
//! should vanish when a flow ends.
//!
//! One tracker per chat, keyed by user. Tracking is strictly additive
//! within a flow and reset (not merged) when the next flow begins.
//! Deletion is best-effort: a message the user already removed, or one the
//! bot may no longer touch, is simply skipped.

use std::collections::HashMap;

use cartly_types::chat::{ChatId, MessageId, UserId};
use tracing::trace;

use crate::gateway::Gateway;

/// Per-user sequences of message ids awaiting best-effort deletion.
#[derive(Debug, Default)]
pub struct EphemeralTracker {
    pending: HashMap<UserId, Vec<MessageId>>,
}

impl EphemeralTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a fresh, empty sequence for `user`, discarding any leftovers
    /// from a previous flow.
    pub fn begin_flow(&mut self, user: UserId) {
        self.pending.insert(user, Vec::new());
    }

    /// Record a message to delete when the user's flow ends.
    pub fn track(&mut self, user: UserId, message: MessageId) {
        self.pending.entry(user).or_default().push(message);
    }

    /// Number of messages currently tracked for `user`.
    pub fn tracked(&self, user: UserId) -> usize {
        self.pending.get(&user).map_or(0, Vec::len)
    }

    /// Delete everything tracked for `user` and clear the sequence.
    ///
    /// Failures are swallowed; they never affect the flow outcome.
    /// Returns how many deletions were attempted.
    pub async fn flush_and_delete_all<G: Gateway>(
        &mut self,
        gateway: &G,
        chat: ChatId,
        user: UserId,
    ) -> usize {
        let messages = self.pending.remove(&user).unwrap_or_default();
        let count = messages.len();
        for message in messages {
            if let Err(err) = gateway.delete_message(chat, message).await {
                trace!(%chat, %message, %err, "ephemeral delete failed, ignoring");
            }
        }
        count
    }
}
