//! Menu message lifecycle: edit in place when possible, resend when not.
//!
//! Each chat shows at most one "current" rendering of the menu. A render
//! first tries to edit the tracked message; soft edit failures (deleted,
//! too old, content unchanged) fall back to sending a replacement and
//! re-pointing the reference. The fallback is an explicit contract:
//! [`RenderOutcome`] says which path was taken, and a hard failure is the
//! `Err` arm of the result.

use cartly_types::chat::{ChatId, MessageId};
use cartly_types::error::{EditError, GatewayError};
use cartly_types::keyboard::Keyboard;
use tracing::debug;

use crate::gateway::Gateway;

/// How a render reached the chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOutcome {
    /// The tracked message was edited in place (or already matched).
    Edited,
    /// A new message was sent and the tracked reference replaced.
    Replaced,
}

/// Tracks the one live menu message for a chat.
///
/// Superseded references are discarded, not tracked.
#[derive(Debug, Default)]
pub struct MenuTracker {
    current: Option<MessageId>,
}

impl MenuTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<MessageId> {
        self.current
    }

    /// Drop and return the tracked reference (used by the forced-resend
    /// path, which deletes the old menu before sending a fresh one).
    pub fn take(&mut self) -> Option<MessageId> {
        self.current.take()
    }

    /// Render `text` + `keyboard` as the chat's current menu.
    ///
    /// Editing to identical content reports [`RenderOutcome::Edited`]:
    /// repeated identical renders are a no-op from the user's side, never
    /// an error. Hard gateway failures propagate without retry.
    pub async fn render<G: Gateway>(
        &mut self,
        gateway: &G,
        chat: ChatId,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<RenderOutcome, GatewayError> {
        if let Some(message) = self.current {
            match gateway.edit_message(chat, message, text, keyboard).await {
                Ok(()) | Err(EditError::NotModified) => return Ok(RenderOutcome::Edited),
                Err(err @ (EditError::NotFound | EditError::TooOld)) => {
                    debug!(%chat, %message, %err, "menu edit failed, resending");
                }
                Err(EditError::Gateway(err)) => return Err(err),
            }
        }

        let message = gateway.send_message(chat, text, keyboard).await?;
        self.current = Some(message);
        Ok(RenderOutcome::Replaced)
    }
}
