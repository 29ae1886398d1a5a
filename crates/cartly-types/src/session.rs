//! Conversation mode for one (chat, user) pair.

use std::fmt;

/// The active conversational state for one (chat, user) pair.
///
/// Determines how the next free-text input from that user is interpreted.
/// A user is always in exactly one mode; `None` means no flow claims
/// their input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// No active flow; free text is ignored.
    #[default]
    None,
    /// Next free-text message is an item name to add.
    Adding,
    /// Next free-text message is a 1-based index to remove.
    Removing,
    /// Market mode: the user is ticking off items via buttons.
    Market,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::None => write!(f, "none"),
            Mode::Adding => write!(f, "adding"),
            Mode::Removing => write!(f, "removing"),
            Mode::Market => write!(f, "market"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_mode_is_none() {
        assert_eq!(Mode::default(), Mode::None);
    }

    #[test]
    fn display_names() {
        assert_eq!(Mode::Market.to_string(), "market");
        assert_eq!(Mode::Adding.to_string(), "adding");
    }
}
