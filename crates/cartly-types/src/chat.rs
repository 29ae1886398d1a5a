//! Chat, user, and message identifiers plus the shopping list data model.
//!
//! Identifiers are newtypes over the numeric ids the messaging gateway
//! hands out; they are never generated locally.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use std::fmt;

/// Telegram chat id (numeric). One chat owns exactly one shopping list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChatId(pub i64);

/// Telegram user id (numeric).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub i64);

/// Telegram message id (numeric, unique within a chat).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(pub i64);

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single entry on a chat's shopping list.
///
/// Names are unique per list under case-insensitive comparison; the
/// `bought` flag is only ever mutated by the market-mode toggle and
/// clear-bought operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    pub bought: bool,
}

impl Item {
    /// Create a new, not-yet-bought item.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bought: false,
        }
    }
}

/// A chat's shopping list: insertion-ordered items plus a creation stamp.
///
/// Created lazily on first reference to a chat and never destroyed while
/// the process runs. All mutation goes through the list store in
/// `cartly-core`; this type is plain data with read-only helpers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShoppingList {
    pub items: Vec<Item>,
    pub created_at: DateTime<Utc>,
}

impl ShoppingList {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of items flagged as bought.
    pub fn bought_count(&self) -> usize {
        self.items.iter().filter(|i| i.bought).count()
    }

    /// Number of items not yet bought.
    pub fn pending_count(&self) -> usize {
        self.items.iter().filter(|i| !i.bought).count()
    }

    pub fn has_bought(&self) -> bool {
        self.items.iter().any(|i| i.bought)
    }
}

impl Default for ShoppingList {
    fn default() -> Self {
        Self::new()
    }
}
