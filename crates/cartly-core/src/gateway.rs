//! Messaging gateway port.
//!
//! The core drives sends, edits, and deletes through this trait; the
//! concrete Telegram client lives in `cartly-telegram`. Implementations
//! must be cheap to share across tasks (the dispatcher holds one behind an
//! `Arc` and clones it into spawned cleanup tasks).

use cartly_types::chat::{ChatId, MessageId};
use cartly_types::error::{DeleteError, EditError, GatewayError};
use cartly_types::keyboard::Keyboard;

/// Outbound message operations the core needs from the messaging gateway.
///
/// Send failures are hard errors. Edits distinguish soft failures
/// (`NotFound`, `NotModified`, `TooOld`) from hard ones so the menu
/// manager can fall back to a resend. Deletes are always invoked
/// best-effort; callers ignore their errors.
pub trait Gateway: Send + Sync {
    /// Send a new message, optionally with an inline keyboard.
    fn send_message(
        &self,
        chat: ChatId,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> impl std::future::Future<Output = Result<MessageId, GatewayError>> + Send;

    /// Edit an existing message's text and keyboard in place.
    fn edit_message(
        &self,
        chat: ChatId,
        message: MessageId,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> impl std::future::Future<Output = Result<(), EditError>> + Send;

    /// Delete a message.
    fn delete_message(
        &self,
        chat: ChatId,
        message: MessageId,
    ) -> impl std::future::Future<Output = Result<(), DeleteError>> + Send;
}
