//! Recording gateway fake shared by the core's unit tests.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicI64, Ordering};

use cartly_types::chat::{ChatId, MessageId};
use cartly_types::error::{DeleteError, EditError, GatewayError};
use cartly_types::keyboard::Keyboard;

use crate::gateway::Gateway;

/// One recorded gateway call.
#[derive(Debug)]
pub enum Call {
    Send {
        chat: ChatId,
        text: String,
        keyboard: Option<Keyboard>,
    },
    Edit {
        chat: ChatId,
        message: MessageId,
        text: String,
        keyboard: Option<Keyboard>,
    },
    Delete {
        chat: ChatId,
        message: MessageId,
    },
}

/// Gateway fake that records every call and can script edit/delete
/// failures. Message ids count up from 100.
#[derive(Debug, Default)]
pub struct RecordingGateway {
    calls: Mutex<Vec<Call>>,
    next_id: AtomicI64,
    edit_failures: Mutex<VecDeque<EditError>>,
    fail_sends: Mutex<bool>,
}

impl RecordingGateway {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(100),
            edit_failures: Mutex::new(VecDeque::new()),
            fail_sends: Mutex::new(false),
        }
    }

    /// Script the next edit call to fail with `err`.
    pub fn queue_edit_failure(&self, err: EditError) {
        self.edit_failures.lock().unwrap().push_back(err);
    }

    /// Make every send fail with a hard gateway error.
    pub fn fail_sends(&self, fail: bool) {
        *self.fail_sends.lock().unwrap() = fail;
    }

    pub fn take_calls(&self) -> Vec<Call> {
        std::mem::take(&mut self.calls.lock().unwrap())
    }

    pub fn sent_texts(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter_map(|call| match call {
                Call::Send { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn edited_texts(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter_map(|call| match call {
                Call::Edit { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn deleted_ids(&self) -> Vec<MessageId> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter_map(|call| match call {
                Call::Delete { message, .. } => Some(*message),
                _ => None,
            })
            .collect()
    }

    /// Chats that received at least one send.
    pub fn chats_sent_to(&self) -> Vec<ChatId> {
        let mut chats: Vec<ChatId> = self
            .calls
            .lock()
            .unwrap()
            .iter()
            .filter_map(|call| match call {
                Call::Send { chat, .. } => Some(*chat),
                _ => None,
            })
            .collect();
        chats.dedup();
        chats
    }
}

impl Gateway for RecordingGateway {
    async fn send_message(
        &self,
        chat: ChatId,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<MessageId, GatewayError> {
        if *self.fail_sends.lock().unwrap() {
            return Err(GatewayError::Network("scripted send failure".into()));
        }
        let id = MessageId(self.next_id.fetch_add(1, Ordering::SeqCst));
        self.calls.lock().unwrap().push(Call::Send {
            chat,
            text: text.to_string(),
            keyboard: keyboard.cloned(),
        });
        Ok(id)
    }

    async fn edit_message(
        &self,
        chat: ChatId,
        message: MessageId,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<(), EditError> {
        if let Some(err) = self.edit_failures.lock().unwrap().pop_front() {
            return Err(err);
        }
        self.calls.lock().unwrap().push(Call::Edit {
            chat,
            message,
            text: text.to_string(),
            keyboard: keyboard.cloned(),
        });
        Ok(())
    }

    async fn delete_message(
        &self,
        chat: ChatId,
        message: MessageId,
    ) -> Result<(), DeleteError> {
        self.calls
            .lock()
            .unwrap()
            .push(Call::Delete { chat, message });
        Ok(())
    }
}
