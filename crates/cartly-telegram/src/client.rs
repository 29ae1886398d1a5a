//! HTTPS client for the Bot API, implementing the core's gateway port.

use std::time::Duration;

use cartly_core::gateway::Gateway;
use cartly_types::action::Command;
use cartly_types::chat::{ChatId, MessageId};
use cartly_types::error::{DeleteError, EditError, GatewayError};
use cartly_types::keyboard::Keyboard;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use crate::api::{self, ApiResponse, Update};

const DEFAULT_API_BASE: &str = "https://api.telegram.org";

/// Default `getUpdates` long-poll timeout.
pub const DEFAULT_POLL_TIMEOUT_SECS: u64 = 25;

/// Headroom on the HTTP timeout above the long-poll timeout.
const REQUEST_TIMEOUT_SLACK_SECS: u64 = 10;

/// Telegram Bot API client.
///
/// Cheap to share; all methods take `&self`. Every message the bot sends
/// uses HTML parse mode, matching the markup the core composes.
pub struct TelegramClient {
    http: reqwest::Client,
    api_base: String,
    token: String,
    poll_timeout_secs: u64,
}

impl TelegramClient {
    /// Build a client for `token`. `api_base` overrides the production
    /// endpoint (used by tests and self-hosted Bot API servers).
    pub fn new(
        token: impl Into<String>,
        api_base: Option<String>,
        poll_timeout_secs: u64,
    ) -> Result<Self, GatewayError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(
                poll_timeout_secs + REQUEST_TIMEOUT_SLACK_SECS,
            ))
            .build()
            .map_err(|err| GatewayError::Network(err.to_string()))?;

        Ok(Self {
            http,
            api_base: api_base.unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            token: token.into(),
            poll_timeout_secs,
        })
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        payload: &Value,
    ) -> Result<T, GatewayError> {
        let url = format!("{}/bot{}/{}", self.api_base, self.token, method);
        let response = self
            .http
            .post(&url)
            .json(payload)
            .send()
            .await
            .map_err(|err| GatewayError::Network(err.to_string()))?;

        let parsed: ApiResponse<T> = response
            .json()
            .await
            .map_err(|err| GatewayError::Network(err.to_string()))?;

        if parsed.ok {
            parsed
                .result
                .ok_or_else(|| GatewayError::Api(format!("{method}: missing result")))
        } else {
            Err(GatewayError::Api(
                parsed
                    .description
                    .unwrap_or_else(|| format!("{method} failed")),
            ))
        }
    }

    /// Fetch pending updates, long-polling up to the configured timeout.
    pub async fn get_updates(&self, offset: i64) -> Result<Vec<Update>, GatewayError> {
        self.call(
            "getUpdates",
            &json!({
                "offset": offset,
                "timeout": self.poll_timeout_secs,
                "allowed_updates": ["message", "callback_query"],
            }),
        )
        .await
    }

    /// Acknowledge a callback query so the client's spinner clears.
    pub async fn answer_callback(&self, callback_id: &str) -> Result<(), GatewayError> {
        let _: bool = self
            .call(
                "answerCallbackQuery",
                &json!({ "callback_query_id": callback_id }),
            )
            .await?;
        Ok(())
    }

    /// Register the command menu shown by Telegram clients.
    pub async fn set_my_commands(&self) -> Result<(), GatewayError> {
        let commands: Vec<Value> = Command::ALL
            .iter()
            .map(|(_, name, description)| json!({ "command": name, "description": description }))
            .collect();
        let _: bool = self
            .call("setMyCommands", &json!({ "commands": commands }))
            .await?;
        Ok(())
    }
}

impl Gateway for TelegramClient {
    async fn send_message(
        &self,
        chat: ChatId,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<MessageId, GatewayError> {
        let mut payload = json!({
            "chat_id": chat.0,
            "text": text,
            "parse_mode": "HTML",
        });
        if let Some(kb) = keyboard {
            payload["reply_markup"] = api::reply_markup(kb);
        }

        let message: api::Message = self.call("sendMessage", &payload).await?;
        Ok(MessageId(message.message_id))
    }

    async fn edit_message(
        &self,
        chat: ChatId,
        message: MessageId,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<(), EditError> {
        let mut payload = json!({
            "chat_id": chat.0,
            "message_id": message.0,
            "text": text,
            "parse_mode": "HTML",
        });
        if let Some(kb) = keyboard {
            payload["reply_markup"] = api::reply_markup(kb);
        }

        // editMessageText returns the edited message, or `true` for
        // inline messages; the body is irrelevant either way.
        match self.call::<Value>("editMessageText", &payload).await {
            Ok(_) => Ok(()),
            Err(GatewayError::Api(description)) => Err(api::classify_edit_error(&description)),
            Err(err) => Err(EditError::Gateway(err)),
        }
    }

    async fn delete_message(&self, chat: ChatId, message: MessageId) -> Result<(), DeleteError> {
        let payload = json!({ "chat_id": chat.0, "message_id": message.0 });
        match self.call::<bool>("deleteMessage", &payload).await {
            Ok(_) => Ok(()),
            Err(GatewayError::Api(description)) => Err(api::classify_delete_error(&description)),
            Err(err) => Err(DeleteError::Gateway(err)),
        }
    }
}
