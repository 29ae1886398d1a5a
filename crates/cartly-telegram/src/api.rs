//! Bot API wire types and error triage.
//!
//! Inbound structs lean on `#[serde(default)]` so unrelated update kinds
//! and future API fields deserialize without breaking the poll loop.

use cartly_types::error::{DeleteError, EditError, GatewayError};
use cartly_types::keyboard::Keyboard;
use serde::Deserialize;
use serde_json::{Value, json};

/// Standard Bot API response envelope.
#[derive(Clone, Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    pub result: Option<T>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<Message>,
    #[serde(default)]
    pub callback_query: Option<CallbackQuery>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Message {
    pub message_id: i64,
    pub chat: Chat,
    #[serde(default)]
    pub from: Option<User>,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Clone, Debug, Deserialize)]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub first_name: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct CallbackQuery {
    pub id: String,
    #[serde(default)]
    pub from: Option<User>,
    #[serde(default)]
    pub message: Option<Message>,
    #[serde(default)]
    pub data: Option<String>,
}

/// Serialize a core keyboard as Bot API `reply_markup`.
pub fn reply_markup(keyboard: &Keyboard) -> Value {
    let rows: Vec<Vec<Value>> = keyboard
        .rows
        .iter()
        .map(|row| {
            row.iter()
                .map(|button| {
                    json!({
                        "text": button.label,
                        "callback_data": button.action.to_string(),
                    })
                })
                .collect()
        })
        .collect();
    json!({ "inline_keyboard": rows })
}

/// Classify an `editMessageText` rejection from its description string.
///
/// The Bot API reports all three recoverable edit outcomes as HTTP 400
/// with distinct descriptions; anything unrecognized is a hard error.
pub fn classify_edit_error(description: &str) -> EditError {
    let lowered = description.to_lowercase();
    if lowered.contains("message is not modified") {
        EditError::NotModified
    } else if lowered.contains("message to edit not found") {
        EditError::NotFound
    } else if lowered.contains("can't be edited") {
        EditError::TooOld
    } else {
        EditError::Gateway(GatewayError::Api(description.to_string()))
    }
}

/// Classify a `deleteMessage` rejection from its description string.
pub fn classify_delete_error(description: &str) -> DeleteError {
    let lowered = description.to_lowercase();
    if lowered.contains("not found") || lowered.contains("can't be deleted") {
        DeleteError::NotFound
    } else {
        DeleteError::Gateway(GatewayError::Api(description.to_string()))
    }
}
