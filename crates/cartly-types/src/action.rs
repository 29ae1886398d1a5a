//! Closed sets of inbound triggers: slash commands and callback actions.
//!
//! Callback payloads travel over the wire as opaque strings. They are
//! parsed exactly once at the gateway boundary into [`CallbackAction`];
//! malformed payloads become an [`ActionParseError`] which dispatch treats
//! as a no-op rather than a crash.

use std::fmt;
use std::str::FromStr;

use crate::error::ActionParseError;

/// A recognized slash command, stripped of its leading `/` and any
/// `@BotName` suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    List,
    Add,
    Remove,
    Market,
    Clear,
    Cancel,
}

impl Command {
    /// All commands in the order they are registered with the gateway,
    /// paired with their user-facing descriptions.
    pub const ALL: [(Command, &'static str, &'static str); 7] = [
        (Command::Start, "start", "Main menu"),
        (Command::List, "list", "Show the list"),
        (Command::Add, "add", "Add an item"),
        (Command::Remove, "remove", "Remove an item"),
        (Command::Market, "market", "Market mode"),
        (Command::Clear, "clear", "Clear the list"),
        (Command::Cancel, "cancel", "Cancel"),
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Command::Start => "start",
            Command::List => "list",
            Command::Add => "add",
            Command::Remove => "remove",
            Command::Market => "market",
            Command::Clear => "clear",
            Command::Cancel => "cancel",
        }
    }
}

impl FromStr for Command {
    type Err = ActionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "start" => Ok(Command::Start),
            "list" => Ok(Command::List),
            "add" => Ok(Command::Add),
            "remove" => Ok(Command::Remove),
            "market" => Ok(Command::Market),
            "clear" => Ok(Command::Clear),
            "cancel" => Ok(Command::Cancel),
            other => Err(ActionParseError::UnknownCommand(other.to_string())),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.name())
    }
}

/// A button press, decoded from its wire token.
///
/// `Toggle` carries the 0-based index of the item whose bought flag the
/// user tapped in market mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackAction {
    /// "Add" button on the main menu.
    Add,
    /// "Remove" button on the main menu.
    Remove,
    /// "Market mode" button on the main menu.
    Market,
    /// "Clear all" button on the main menu (asks for confirmation).
    Clear,
    /// Cancel button on a prompt; abandons the active flow.
    Cancel,
    /// "Yes, clear" on the clear-all confirmation.
    ConfirmClear,
    /// "No" on the clear-all confirmation.
    CancelClear,
    /// Checkbox row in market mode.
    Toggle(usize),
    /// "Finish" in market mode; bought flags persist.
    MarketFinish,
    /// "Cancel" in market mode; bought flags are reset.
    MarketCancel,
    /// "Remove bought" in market mode.
    MarketClearBought,
}

impl fmt::Display for CallbackAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallbackAction::Add => write!(f, "add"),
            CallbackAction::Remove => write!(f, "remove"),
            CallbackAction::Market => write!(f, "market"),
            CallbackAction::Clear => write!(f, "clear"),
            CallbackAction::Cancel => write!(f, "cancel"),
            CallbackAction::ConfirmClear => write!(f, "clear:confirm"),
            CallbackAction::CancelClear => write!(f, "clear:keep"),
            CallbackAction::Toggle(index) => write!(f, "toggle:{index}"),
            CallbackAction::MarketFinish => write!(f, "market:finish"),
            CallbackAction::MarketCancel => write!(f, "market:cancel"),
            CallbackAction::MarketClearBought => write!(f, "market:clear-bought"),
        }
    }
}

impl FromStr for CallbackAction {
    type Err = ActionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "add" => Ok(CallbackAction::Add),
            "remove" => Ok(CallbackAction::Remove),
            "market" => Ok(CallbackAction::Market),
            "clear" => Ok(CallbackAction::Clear),
            "cancel" => Ok(CallbackAction::Cancel),
            "clear:confirm" => Ok(CallbackAction::ConfirmClear),
            "clear:keep" => Ok(CallbackAction::CancelClear),
            "market:finish" => Ok(CallbackAction::MarketFinish),
            "market:cancel" => Ok(CallbackAction::MarketCancel),
            "market:clear-bought" => Ok(CallbackAction::MarketClearBought),
            other => {
                if let Some(raw) = other.strip_prefix("toggle:") {
                    let index = raw
                        .parse::<usize>()
                        .map_err(|_| ActionParseError::BadIndex(other.to_string()))?;
                    Ok(CallbackAction::Toggle(index))
                } else {
                    Err(ActionParseError::UnknownAction(other.to_string()))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_action_round_trips_through_its_token() {
        let actions = [
            CallbackAction::Add,
            CallbackAction::Remove,
            CallbackAction::Market,
            CallbackAction::Clear,
            CallbackAction::Cancel,
            CallbackAction::ConfirmClear,
            CallbackAction::CancelClear,
            CallbackAction::Toggle(0),
            CallbackAction::Toggle(42),
            CallbackAction::MarketFinish,
            CallbackAction::MarketCancel,
            CallbackAction::MarketClearBought,
        ];
        for action in actions {
            let token = action.to_string();
            let parsed: CallbackAction = token.parse().unwrap();
            assert_eq!(parsed, action, "token '{token}' did not round-trip");
        }
    }

    #[test]
    fn malformed_toggle_payloads_are_rejected() {
        assert!(matches!(
            "toggle:".parse::<CallbackAction>(),
            Err(ActionParseError::BadIndex(_))
        ));
        assert!(matches!(
            "toggle:abc".parse::<CallbackAction>(),
            Err(ActionParseError::BadIndex(_))
        ));
        assert!(matches!(
            "toggle:-1".parse::<CallbackAction>(),
            Err(ActionParseError::BadIndex(_))
        ));
    }

    #[test]
    fn unknown_tokens_are_rejected() {
        assert!(matches!(
            "self-destruct".parse::<CallbackAction>(),
            Err(ActionParseError::UnknownAction(_))
        ));
        assert!("".parse::<CallbackAction>().is_err());
    }

    #[test]
    fn command_parse_and_display() {
        assert_eq!("market".parse::<Command>().unwrap(), Command::Market);
        assert_eq!(Command::Market.to_string(), "/market");
        assert!("selfdestruct".parse::<Command>().is_err());
    }

    #[test]
    fn command_registry_covers_every_name() {
        for (cmd, name, _desc) in Command::ALL {
            assert_eq!(cmd.name(), name);
            assert_eq!(name.parse::<Command>().unwrap(), cmd);
        }
    }
}
