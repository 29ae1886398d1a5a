//! List store: a chat's shopping list and its atomic mutations.
//!
//! Wraps a [`ShoppingList`] with the validated operations the state
//! machine needs. The store itself is not synchronized; the dispatcher
//! guarantees that all mutations for one chat run under that chat's lock,
//! so every index handed out by a render was computed against the same
//! view that is about to be mutated.

use cartly_types::chat::{Item, ShoppingList};
use cartly_types::error::ListError;

/// Minimum item name length after trimming, in characters.
pub const MIN_NAME_LEN: usize = 2;

/// A chat's shopping list plus its mutation operations.
///
/// Invariants upheld here:
/// - no two items share a name under case-insensitive comparison
/// - removal and clearing preserve the relative order of survivors
/// - bought flags change only via [`toggle_bought`](Self::toggle_bought),
///   [`clear_bought`](Self::clear_bought), and
///   [`reset_bought`](Self::reset_bought)
#[derive(Debug, Default)]
pub struct ListStore {
    list: ShoppingList,
}

impl ListStore {
    pub fn new() -> Self {
        Self {
            list: ShoppingList::new(),
        }
    }

    pub fn items(&self) -> &[Item] {
        &self.list.items
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn bought_count(&self) -> usize {
        self.list.bought_count()
    }

    pub fn has_bought(&self) -> bool {
        self.list.has_bought()
    }

    /// Append a new item.
    ///
    /// Trims the input first. Fails with `TooShort` when fewer than
    /// [`MIN_NAME_LEN`] characters remain, and with `Duplicate` when a
    /// case-insensitive match already exists. Returns the new list size.
    pub fn add_item(&mut self, raw: &str) -> Result<usize, ListError> {
        let name = raw.trim();
        let chars = name.chars().count();
        if chars < MIN_NAME_LEN {
            return Err(ListError::TooShort(chars));
        }

        let lowered = name.to_lowercase();
        if let Some(existing) = self
            .list
            .items
            .iter()
            .find(|item| item.name.to_lowercase() == lowered)
        {
            return Err(ListError::Duplicate(existing.name.clone()));
        }

        self.list.items.push(Item::new(name));
        Ok(self.list.len())
    }

    /// Remove the item at a 0-based index, returning it.
    ///
    /// The `OutOfRange` error reports the index 1-based, matching how
    /// indexes are presented to users.
    pub fn remove_item(&mut self, index: usize) -> Result<Item, ListError> {
        if index >= self.list.len() {
            return Err(ListError::OutOfRange {
                index: index + 1,
                size: self.list.len(),
            });
        }
        Ok(self.list.items.remove(index))
    }

    /// Flip the bought flag at a 0-based index, returning the new value.
    ///
    /// Toggling twice restores the original flag.
    pub fn toggle_bought(&mut self, index: usize) -> Result<bool, ListError> {
        let size = self.list.len();
        let item = self
            .list
            .items
            .get_mut(index)
            .ok_or(ListError::OutOfRange {
                index: index + 1,
                size,
            })?;
        item.bought = !item.bought;
        Ok(item.bought)
    }

    /// Empty the list unconditionally, returning how many items were
    /// removed. Clearing an already-empty list is a no-op, not an error.
    pub fn clear_all(&mut self) -> usize {
        let removed = self.list.len();
        self.list.items.clear();
        removed
    }

    /// Remove every bought item, preserving the order of the remainder.
    /// Returns the number removed; zero when none were bought.
    pub fn clear_bought(&mut self) -> usize {
        let before = self.list.len();
        self.list.items.retain(|item| !item.bought);
        before - self.list.len()
    }

    /// Force every bought flag back to false (market-mode cancel).
    pub fn reset_bought(&mut self) {
        for item in &mut self.list.items {
            item.bought = false;
        }
    }
}
