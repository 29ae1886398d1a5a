//! Event dispatch: the entry points the gateway loop calls for commands,
//! free text, and button presses.
//!
//! Concurrency contract: the chat table is a `DashMap` of per-chat slots,
//! each guarded by its own `tokio::Mutex`. One inbound event locks its
//! chat's slot for the whole validate-mutate-render sequence, so all
//! mutations to a chat's list, sessions, menu reference, and pending
//! cleanup observe a consistent interleaving -- an index a user saw was
//! rendered from the same serialized view the mutation validates against.
//! Events for different chats share no locked state and run in parallel.
//! A `/cancel` arriving while another event of the same flow is queued
//! simply serializes behind it and wins by resetting the mode.
//!
//! Hard gateway errors abort the event and defensively reset the invoking
//! user's mode so a failed prompt can never strand them mid-flow.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use cartly_types::action::{CallbackAction, Command};
use cartly_types::chat::{ChatId, MessageId, UserId};
use cartly_types::error::{GatewayError, ListError};
use cartly_types::session::Mode;

use crate::cleanup::EphemeralTracker;
use crate::gateway::Gateway;
use crate::menu::MenuTracker;
use crate::render;
use crate::session::{SessionTable, parse_user_index};
use crate::store::ListStore;
use crate::texts;

/// How long transient confirmations ("+Milk") stay visible before their
/// best-effort delete fires.
const TRANSIENT_TTL: Duration = Duration::from_millis(1500);

/// Everything one chat owns, guarded as a unit by the chat's lock.
struct ChatState {
    list: ListStore,
    sessions: SessionTable,
    menu: MenuTracker,
    ephemera: EphemeralTracker,
}

impl ChatState {
    fn new() -> Self {
        Self {
            list: ListStore::new(),
            sessions: SessionTable::new(),
            menu: MenuTracker::new(),
            ephemera: EphemeralTracker::new(),
        }
    }
}

/// Routes inbound events through the per-chat state and out to the
/// gateway.
pub struct Dispatcher<G> {
    gateway: Arc<G>,
    chats: DashMap<ChatId, Arc<Mutex<ChatState>>>,
}

impl<G: Gateway + 'static> Dispatcher<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        Self {
            gateway,
            chats: DashMap::new(),
        }
    }

    pub fn gateway(&self) -> &Arc<G> {
        &self.gateway
    }

    /// Chat slots are created lazily and never destroyed while the
    /// process runs.
    fn slot(&self, chat: ChatId) -> Arc<Mutex<ChatState>> {
        self.chats
            .entry(chat)
            .or_insert_with(|| Arc::new(Mutex::new(ChatState::new())))
            .clone()
    }

    /// Handle a slash command. `message` is the user's own command
    /// message, which is deleted best-effort to keep the chat clean.
    pub async fn handle_command(
        &self,
        chat: ChatId,
        user: UserId,
        user_name: &str,
        command: Command,
        message: MessageId,
    ) -> Result<(), GatewayError> {
        let slot = self.slot(chat);
        let mut state = slot.lock().await;

        let _ = self.gateway.delete_message(chat, message).await;

        let result = self
            .apply_command(&mut state, chat, user, user_name, command)
            .await;
        if let Err(err) = &result {
            warn!(%chat, %user, %command, %err, "command aborted, resetting session");
            state.sessions.reset(user);
        }
        result
    }

    /// Handle a free-text message. Ignored unless the sender has an
    /// active flow that claims text input.
    pub async fn handle_text(
        &self,
        chat: ChatId,
        user: UserId,
        text: &str,
        message: MessageId,
    ) -> Result<(), GatewayError> {
        let slot = self.slot(chat);
        let mut state = slot.lock().await;

        let result = self
            .apply_text(&mut state, chat, user, text, message)
            .await;
        if let Err(err) = &result {
            warn!(%chat, %user, %err, "text handling aborted, resetting session");
            state.sessions.reset(user);
        }
        result
    }

    /// Handle a decoded button press.
    pub async fn handle_button(
        &self,
        chat: ChatId,
        user: UserId,
        user_name: &str,
        action: CallbackAction,
    ) -> Result<(), GatewayError> {
        let slot = self.slot(chat);
        let mut state = slot.lock().await;

        let result = self
            .apply_button(&mut state, chat, user, user_name, action)
            .await;
        if let Err(err) = &result {
            warn!(%chat, %user, %err, "button handling aborted, resetting session");
            state.sessions.reset(user);
        }
        result
    }

    async fn apply_command(
        &self,
        state: &mut ChatState,
        chat: ChatId,
        user: UserId,
        user_name: &str,
        command: Command,
    ) -> Result<(), GatewayError> {
        match command {
            Command::Start => {
                state.sessions.reset(user);
                // Force a fresh menu at the bottom of the chat.
                if let Some(old) = state.menu.take() {
                    let _ = self.gateway.delete_message(chat, old).await;
                }
                self.render_menu(state, chat).await
            }
            Command::List => self.render_menu(state, chat).await,
            Command::Add => self.begin_adding(state, chat, user, user_name).await,
            Command::Remove => self.begin_removing(state, chat, user, user_name).await,
            Command::Market => self.begin_market(state, chat, user).await,
            Command::Clear => self.ask_clear(state, chat).await,
            Command::Cancel => self.end_flow(state, chat, user).await,
        }
    }

    async fn apply_text(
        &self,
        state: &mut ChatState,
        chat: ChatId,
        user: UserId,
        text: &str,
        message: MessageId,
    ) -> Result<(), GatewayError> {
        match state.sessions.mode(user) {
            // No active flow claims this text; not an error.
            Mode::None | Mode::Market => Ok(()),
            Mode::Adding => self.apply_add_reply(state, chat, user, text, message).await,
            Mode::Removing => {
                self.apply_remove_reply(state, chat, user, text, message)
                    .await
            }
        }
    }

    async fn apply_add_reply(
        &self,
        state: &mut ChatState,
        chat: ChatId,
        user: UserId,
        text: &str,
        message: MessageId,
    ) -> Result<(), GatewayError> {
        state.ephemera.track(user, message);
        let name = text.trim().to_string();

        match state.list.add_item(text) {
            Ok(size) => {
                debug!(%chat, %user, item = %name, size, "item added");
                state.sessions.reset(user);
                self.flush_ephemera(state, chat, user).await;
                self.notify_transient(chat, &texts::added_notice(&name)).await?;
                self.render_menu(state, chat).await
            }
            Err(ListError::TooShort(_)) => {
                // Retry in place: the notice stays up until the flow ends.
                let notice = self
                    .gateway
                    .send_message(chat, texts::TOO_SHORT_NOTICE, None)
                    .await?;
                state.ephemera.track(user, notice);
                Ok(())
            }
            Err(ListError::Duplicate(existing)) => {
                // Abandon: warn and return to the menu.
                state.sessions.reset(user);
                self.flush_ephemera(state, chat, user).await;
                self.notify_transient(chat, &texts::duplicate_notice(&existing))
                    .await?;
                self.render_menu(state, chat).await
            }
            // add_item never reports OutOfRange
            Err(ListError::OutOfRange { .. }) => Ok(()),
        }
    }

    async fn apply_remove_reply(
        &self,
        state: &mut ChatState,
        chat: ChatId,
        user: UserId,
        text: &str,
        message: MessageId,
    ) -> Result<(), GatewayError> {
        state.ephemera.track(user, message);

        let index = match parse_user_index(text) {
            Ok(n) => n,
            Err(_) => {
                let notice = self
                    .gateway
                    .send_message(chat, texts::TYPE_A_NUMBER_NOTICE, None)
                    .await?;
                state.ephemera.track(user, notice);
                return Ok(());
            }
        };

        // 1-based as typed; 0 falls through to the out-of-range notice.
        let removed = index
            .checked_sub(1)
            .ok_or(ListError::OutOfRange {
                index,
                size: state.list.len(),
            })
            .and_then(|zero_based| state.list.remove_item(zero_based));

        match removed {
            Ok(item) => {
                debug!(%chat, %user, item = %item.name, "item removed");
                state.sessions.reset(user);
                self.flush_ephemera(state, chat, user).await;
                self.notify_transient(chat, &texts::removed_notice(&item.name))
                    .await?;
                self.render_menu(state, chat).await
            }
            Err(_) => {
                let notice = self
                    .gateway
                    .send_message(chat, &texts::out_of_range_notice(state.list.len()), None)
                    .await?;
                state.ephemera.track(user, notice);
                Ok(())
            }
        }
    }

    async fn apply_button(
        &self,
        state: &mut ChatState,
        chat: ChatId,
        user: UserId,
        user_name: &str,
        action: CallbackAction,
    ) -> Result<(), GatewayError> {
        match action {
            CallbackAction::Add => self.begin_adding(state, chat, user, user_name).await,
            CallbackAction::Remove => self.begin_removing(state, chat, user, user_name).await,
            CallbackAction::Market => self.begin_market(state, chat, user).await,
            CallbackAction::Clear => self.ask_clear(state, chat).await,
            CallbackAction::Cancel => self.end_flow(state, chat, user).await,
            CallbackAction::ConfirmClear => {
                let removed = state.list.clear_all();
                debug!(%chat, %user, removed, "list cleared");
                self.render_menu(state, chat).await
            }
            CallbackAction::CancelClear => self.render_menu(state, chat).await,
            CallbackAction::Toggle(index) => {
                // A stale keyboard can carry an index past the end; drop it.
                if let Err(err) = state.list.toggle_bought(index) {
                    debug!(%chat, %user, index, %err, "stale toggle ignored");
                }
                if state.list.is_empty() {
                    self.render_menu(state, chat).await
                } else {
                    self.render_market(state, chat).await
                }
            }
            CallbackAction::MarketFinish => {
                // No list mutation; bought flags persist into the menu view.
                state.sessions.reset(user);
                let text = format!(
                    "{}\n\n{}",
                    texts::market_finished_header(state.list.bought_count()),
                    render::main_menu_text(state.list.items())
                );
                let kb = render::main_menu_keyboard(!state.list.is_empty());
                state
                    .menu
                    .render(self.gateway.as_ref(), chat, &text, Some(&kb))
                    .await
                    .map(|_| ())
            }
            CallbackAction::MarketCancel => {
                state.list.reset_bought();
                state.sessions.reset(user);
                self.render_menu(state, chat).await
            }
            CallbackAction::MarketClearBought => {
                let removed = state.list.clear_bought();
                debug!(%chat, %user, removed, "bought items cleared");
                let header = texts::cleared_bought_header(removed);
                if state.list.is_empty() {
                    state.sessions.reset(user);
                    let text =
                        format!("{header}\n\n{}", render::main_menu_text(state.list.items()));
                    let kb = render::main_menu_keyboard(false);
                    state
                        .menu
                        .render(self.gateway.as_ref(), chat, &text, Some(&kb))
                        .await
                        .map(|_| ())
                } else {
                    let text = format!("{header}\n\n{}", render::market_text(state.list.items()));
                    let kb = render::market_keyboard(state.list.items());
                    state
                        .menu
                        .render(self.gateway.as_ref(), chat, &text, Some(&kb))
                        .await
                        .map(|_| ())
                }
            }
        }
    }

    // --- flow transitions ---

    async fn begin_adding(
        &self,
        state: &mut ChatState,
        chat: ChatId,
        user: UserId,
        user_name: &str,
    ) -> Result<(), GatewayError> {
        state.sessions.set(user, Mode::Adding);
        state.ephemera.begin_flow(user);
        let kb = render::cancel_keyboard();
        state
            .menu
            .render(
                self.gateway.as_ref(),
                chat,
                &texts::add_prompt(user_name),
                Some(&kb),
            )
            .await
            .map(|_| ())
    }

    async fn begin_removing(
        &self,
        state: &mut ChatState,
        chat: ChatId,
        user: UserId,
        user_name: &str,
    ) -> Result<(), GatewayError> {
        if state.list.is_empty() {
            self.notify_transient(chat, texts::EMPTY_NOTICE).await?;
            return self.render_menu(state, chat).await;
        }

        state.sessions.set(user, Mode::Removing);
        state.ephemera.begin_flow(user);
        let listing = render::list_lines(state.list.items(), false);
        let kb = render::cancel_keyboard();
        state
            .menu
            .render(
                self.gateway.as_ref(),
                chat,
                &texts::remove_prompt(&listing, user_name),
                Some(&kb),
            )
            .await
            .map(|_| ())
    }

    async fn begin_market(
        &self,
        state: &mut ChatState,
        chat: ChatId,
        user: UserId,
    ) -> Result<(), GatewayError> {
        if state.list.is_empty() {
            self.notify_transient(chat, texts::EMPTY_NOTICE).await?;
            return self.render_menu(state, chat).await;
        }

        state.sessions.set(user, Mode::Market);
        self.render_market(state, chat).await
    }

    async fn ask_clear(&self, state: &mut ChatState, chat: ChatId) -> Result<(), GatewayError> {
        if state.list.is_empty() {
            self.notify_transient(chat, texts::ALREADY_EMPTY_NOTICE).await?;
            return self.render_menu(state, chat).await;
        }

        let kb = render::confirm_clear_keyboard();
        state
            .menu
            .render(self.gateway.as_ref(), chat, texts::CONFIRM_CLEAR, Some(&kb))
            .await
            .map(|_| ())
    }

    /// Cancel or complete: back to `None`, flush ephemera, show the menu.
    async fn end_flow(
        &self,
        state: &mut ChatState,
        chat: ChatId,
        user: UserId,
    ) -> Result<(), GatewayError> {
        state.sessions.reset(user);
        self.flush_ephemera(state, chat, user).await;
        self.render_menu(state, chat).await
    }

    // --- rendering helpers ---

    async fn render_menu(&self, state: &mut ChatState, chat: ChatId) -> Result<(), GatewayError> {
        let text = render::main_menu_text(state.list.items());
        let kb = render::main_menu_keyboard(!state.list.is_empty());
        state
            .menu
            .render(self.gateway.as_ref(), chat, &text, Some(&kb))
            .await
            .map(|_| ())
    }

    async fn render_market(&self, state: &mut ChatState, chat: ChatId) -> Result<(), GatewayError> {
        let text = render::market_text(state.list.items());
        let kb = render::market_keyboard(state.list.items());
        state
            .menu
            .render(self.gateway.as_ref(), chat, &text, Some(&kb))
            .await
            .map(|_| ())
    }

    async fn flush_ephemera(&self, state: &mut ChatState, chat: ChatId, user: UserId) {
        state
            .ephemera
            .flush_and_delete_all(self.gateway.as_ref(), chat, user)
            .await;
    }

    /// Send a short-lived confirmation and schedule its deletion off the
    /// chat lock. Send failures are hard; the scheduled delete is not.
    async fn notify_transient(&self, chat: ChatId, text: &str) -> Result<(), GatewayError> {
        let message = self.gateway.send_message(chat, text, None).await?;
        let gateway = Arc::clone(&self.gateway);
        tokio::spawn(async move {
            tokio::time::sleep(TRANSIENT_TTL).await;
            let _ = gateway.delete_message(chat, message).await;
        });
        Ok(())
    }
}
