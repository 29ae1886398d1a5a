//! Inline keyboard model, independent of any wire format.
//!
//! The core composes keyboards out of labeled [`CallbackAction`]s; the
//! gateway crate serializes them into whatever the messaging API expects.

use crate::action::CallbackAction;

/// A single labeled button carrying a typed action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub label: String,
    pub action: CallbackAction,
}

impl Button {
    pub fn new(label: impl Into<String>, action: CallbackAction) -> Self {
        Self {
            label: label.into(),
            action,
        }
    }
}

/// Rows of buttons attached to a message.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Keyboard {
    pub rows: Vec<Vec<Button>>,
}

impl Keyboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a row of buttons, builder-style.
    pub fn row(mut self, buttons: Vec<Button>) -> Self {
        self.rows.push(buttons);
        self
    }

    /// Iterate over every button in row order.
    pub fn buttons(&self) -> impl Iterator<Item = &Button> {
        self.rows.iter().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_builder_preserves_order() {
        let kb = Keyboard::new()
            .row(vec![
                Button::new("Add", CallbackAction::Add),
                Button::new("Remove", CallbackAction::Remove),
            ])
            .row(vec![Button::new("Clear", CallbackAction::Clear)]);

        assert_eq!(kb.rows.len(), 2);
        assert_eq!(kb.rows[0].len(), 2);
        let actions: Vec<_> = kb.buttons().map(|b| b.action).collect();
        assert_eq!(
            actions,
            vec![
                CallbackAction::Add,
                CallbackAction::Remove,
                CallbackAction::Clear
            ]
        );
    }
}
