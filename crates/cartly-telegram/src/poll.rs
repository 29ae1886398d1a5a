//! `getUpdates` long-polling loop and update-to-event mapping.
//!
//! One task is spawned per inbound update; ordering within a chat is the
//! dispatcher's job, not the loop's. Poll failures back off and retry
//! until the cancellation token fires.

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use cartly_core::dispatch::Dispatcher;
use cartly_types::action::{CallbackAction, Command};
use cartly_types::chat::{ChatId, MessageId, UserId};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::api::Update;
use crate::client::TelegramClient;

const POLL_ERROR_BACKOFF: Duration = Duration::from_secs(1);

/// An update decoded into something the dispatcher understands.
#[derive(Debug)]
pub enum Inbound {
    Command {
        chat: ChatId,
        user: UserId,
        user_name: String,
        command: Command,
        message: MessageId,
    },
    Text {
        chat: ChatId,
        user: UserId,
        text: String,
        message: MessageId,
    },
    Button {
        callback_id: String,
        chat: ChatId,
        user: UserId,
        user_name: String,
        /// `None` when the payload failed to decode; the press is still
        /// answered so the client's spinner clears, then dropped.
        action: Option<CallbackAction>,
    },
}

/// Extract a known command from message text like `/add` or
/// `/add@CartlyBot trailing words`.
fn parse_command(text: &str) -> Option<Command> {
    let first = text.trim_start().split_whitespace().next()?;
    let name = first.strip_prefix('/')?;
    let name = name.split('@').next()?;
    Command::from_str(name).ok()
}

/// Map a raw update to an inbound event, or `None` when nothing in it
/// concerns the bot (edits, joins, unknown commands, and so on).
pub fn classify_update(update: &Update) -> Option<Inbound> {
    if let Some(message) = &update.message {
        let from = message.from.as_ref()?;
        let text = message.text.as_deref()?;
        let chat = ChatId(message.chat.id);
        let user = UserId(from.id);
        let id = MessageId(message.message_id);

        if text.trim_start().starts_with('/') {
            let command = parse_command(text)?;
            return Some(Inbound::Command {
                chat,
                user,
                user_name: from.first_name.clone(),
                command,
                message: id,
            });
        }
        return Some(Inbound::Text {
            chat,
            user,
            text: text.to_string(),
            message: id,
        });
    }

    if let Some(query) = &update.callback_query {
        let from = query.from.as_ref()?;
        let message = query.message.as_ref()?;
        let data = query.data.as_deref()?;

        let action = match data.parse::<CallbackAction>() {
            Ok(action) => Some(action),
            Err(err) => {
                debug!(payload = data, %err, "dropping malformed callback payload");
                None
            }
        };
        return Some(Inbound::Button {
            callback_id: query.id.clone(),
            chat: ChatId(message.chat.id),
            user: UserId(from.id),
            user_name: from.first_name.clone(),
            action,
        });
    }

    None
}

async fn handle_update(
    client: Arc<TelegramClient>,
    dispatcher: Arc<Dispatcher<TelegramClient>>,
    update: Update,
) {
    let Some(inbound) = classify_update(&update) else {
        debug!(update_id = update.update_id, "ignoring update");
        return;
    };

    let result = match inbound {
        Inbound::Command {
            chat,
            user,
            user_name,
            command,
            message,
        } => {
            dispatcher
                .handle_command(chat, user, &user_name, command, message)
                .await
        }
        Inbound::Text {
            chat,
            user,
            text,
            message,
        } => dispatcher.handle_text(chat, user, &text, message).await,
        Inbound::Button {
            callback_id,
            chat,
            user,
            user_name,
            action,
        } => {
            if let Err(err) = client.answer_callback(&callback_id).await {
                debug!(%chat, %err, "failed to answer callback query");
            }
            match action {
                Some(action) => dispatcher.handle_button(chat, user, &user_name, action).await,
                None => Ok(()),
            }
        }
    };

    // Hard gateway errors end here: the flow already reset its session,
    // the process keeps running.
    if let Err(err) = result {
        warn!(update_id = update.update_id, %err, "update handling failed");
    }
}

/// Poll for updates and dispatch them until `cancel` fires.
pub async fn run_update_loop(
    client: Arc<TelegramClient>,
    dispatcher: Arc<Dispatcher<TelegramClient>>,
    cancel: CancellationToken,
) {
    let mut offset = 0i64;

    info!("update loop started");
    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            polled = client.get_updates(offset) => match polled {
                Ok(updates) => {
                    for update in updates {
                        offset = offset.max(update.update_id + 1);
                        tokio::spawn(handle_update(
                            Arc::clone(&client),
                            Arc::clone(&dispatcher),
                            update,
                        ));
                    }
                }
                Err(err) => {
                    warn!(%err, "getUpdates failed, backing off");
                    tokio::time::sleep(POLL_ERROR_BACKOFF).await;
                }
            },
        }
    }
    info!("update loop stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn update(value: serde_json::Value) -> Update {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn parse_command_strips_bot_suffix_and_arguments() {
        assert_eq!(parse_command("/add"), Some(Command::Add));
        assert_eq!(parse_command("/add@CartlyBot"), Some(Command::Add));
        assert_eq!(parse_command("  /market extra words"), Some(Command::Market));
        assert_eq!(parse_command("/unknown"), None);
        assert_eq!(parse_command("add"), None);
    }

    #[test]
    fn command_message_classifies_as_command() {
        let u = update(json!({
            "update_id": 1,
            "message": {
                "message_id": 42,
                "chat": { "id": -7 },
                "from": { "id": 9, "first_name": "Ana" },
                "text": "/remove@CartlyBot"
            }
        }));

        match classify_update(&u) {
            Some(Inbound::Command {
                chat,
                user,
                user_name,
                command,
                message,
            }) => {
                assert_eq!(chat, ChatId(-7));
                assert_eq!(user, UserId(9));
                assert_eq!(user_name, "Ana");
                assert_eq!(command, Command::Remove);
                assert_eq!(message, MessageId(42));
            }
            other => panic!("expected command, got {other:?}"),
        }
    }

    #[test]
    fn plain_message_classifies_as_text() {
        let u = update(json!({
            "update_id": 2,
            "message": {
                "message_id": 43,
                "chat": { "id": -7 },
                "from": { "id": 9, "first_name": "Ana" },
                "text": "Milk"
            }
        }));

        assert!(matches!(
            classify_update(&u),
            Some(Inbound::Text { text, .. }) if text == "Milk"
        ));
    }

    #[test]
    fn unknown_command_is_ignored() {
        let u = update(json!({
            "update_id": 3,
            "message": {
                "message_id": 44,
                "chat": { "id": -7 },
                "from": { "id": 9, "first_name": "Ana" },
                "text": "/selfdestruct"
            }
        }));
        assert!(classify_update(&u).is_none());
    }

    #[test]
    fn callback_query_classifies_with_parsed_action() {
        let u = update(json!({
            "update_id": 4,
            "callback_query": {
                "id": "cb-1",
                "from": { "id": 9, "first_name": "Ana" },
                "message": { "message_id": 50, "chat": { "id": -7 } },
                "data": "toggle:3"
            }
        }));

        match classify_update(&u) {
            Some(Inbound::Button {
                callback_id,
                action,
                ..
            }) => {
                assert_eq!(callback_id, "cb-1");
                assert_eq!(action, Some(CallbackAction::Toggle(3)));
            }
            other => panic!("expected button, got {other:?}"),
        }
    }

    #[test]
    fn malformed_callback_payload_still_gets_answered() {
        let u = update(json!({
            "update_id": 5,
            "callback_query": {
                "id": "cb-2",
                "from": { "id": 9, "first_name": "Ana" },
                "message": { "message_id": 51, "chat": { "id": -7 } },
                "data": "toggle:zzz"
            }
        }));

        // the press is classified (so the loop answers it) but carries
        // no action to dispatch
        assert!(matches!(
            classify_update(&u),
            Some(Inbound::Button { action: None, .. })
        ));
    }

    #[test]
    fn updates_without_text_or_query_are_ignored() {
        let u = update(json!({
            "update_id": 6,
            "message": { "message_id": 52, "chat": { "id": -7 } }
        }));
        assert!(classify_update(&u).is_none());
        let u = update(json!({ "update_id": 7 }));
        assert!(classify_update(&u).is_none());
    }
}
