//! Composition of menu texts and inline keyboards from the list state.
//!
//! Pure functions over `&[Item]`; no gateway calls, no locking. The
//! dispatcher snapshots the list under the chat lock and renders from
//! that same snapshot, so indexes baked into toggle buttons always match
//! the list the user is looking at.

use cartly_types::action::CallbackAction;
use cartly_types::chat::Item;
use cartly_types::keyboard::{Button, Keyboard};

use crate::texts;

/// Escape `&`, `<`, `>` for HTML parse mode.
///
/// Item names and user names are untrusted free text; interpolating them
/// raw would let `<s>`-style markup leak into the rendering.
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            other => out.push(other),
        }
    }
    out
}

/// Numbered list body, one line per item.
///
/// With `show_status`, bought items render struck-through with a check
/// mark; without it (the removal prompt), every line is plain so the
/// numbers stand out.
pub fn list_lines(items: &[Item], show_status: bool) -> String {
    if items.is_empty() {
        return texts::LIST_EMPTY_LINE.to_string();
    }

    let mut out = String::new();
    for (i, item) in items.iter().enumerate() {
        let n = i + 1;
        let name = escape_html(&item.name);
        if show_status && item.bought {
            out.push_str(&format!("{n}. <s>{name}</s> ✅\n"));
        } else {
            out.push_str(&format!("{n}. {name}\n"));
        }
    }
    out.trim_end().to_string()
}

/// Full main-menu text: title, list body, and the item/bought counters.
pub fn main_menu_text(items: &[Item]) -> String {
    if items.is_empty() {
        return format!(
            "{}\n{}\n{}\n{}",
            texts::MENU_TITLE,
            texts::DIVIDER,
            texts::LIST_EMPTY_LINE,
            texts::DIVIDER
        );
    }

    let bought = items.iter().filter(|i| i.bought).count();
    let mut status = format!("📊 <b>{} item(s)</b>", items.len());
    if bought > 0 {
        status.push_str(&format!(" | ✅ {bought} bought"));
    }

    format!(
        "{}\n{}\n{}\n{}\n{}",
        texts::MENU_TITLE,
        texts::DIVIDER,
        list_lines(items, true),
        texts::DIVIDER,
        status
    )
}

/// Market-mode text: title, tap hint, and the pending counter.
pub fn market_text(items: &[Item]) -> String {
    let pending = items.iter().filter(|i| !i.bought).count();
    format!(
        "{}\n{}\n{}\n\n📦 <b>{pending} pending</b>",
        texts::MARKET_TITLE,
        texts::DIVIDER,
        texts::MARKET_HINT
    )
}

/// Main menu controls. The market button only appears when there is
/// something to shop for.
pub fn main_menu_keyboard(has_items: bool) -> Keyboard {
    let mut kb = Keyboard::new().row(vec![
        Button::new(texts::BTN_ADD, CallbackAction::Add),
        Button::new(texts::BTN_REMOVE, CallbackAction::Remove),
    ]);

    if has_items {
        kb = kb.row(vec![Button::new(texts::BTN_MARKET, CallbackAction::Market)]);
    }

    kb.row(vec![Button::new(texts::BTN_CLEAR, CallbackAction::Clear)])
}

/// One checkbox row per item, then finish/cancel, then a clear-bought row
/// once at least one item is marked.
pub fn market_keyboard(items: &[Item]) -> Keyboard {
    let mut kb = Keyboard::new();
    for (i, item) in items.iter().enumerate() {
        let glyph = if item.bought { "✅" } else { "⬜" };
        kb = kb.row(vec![Button::new(
            format!("{glyph} {}", item.name),
            CallbackAction::Toggle(i),
        )]);
    }

    kb = kb.row(vec![
        Button::new(texts::BTN_FINISH, CallbackAction::MarketFinish),
        Button::new(texts::BTN_CANCEL, CallbackAction::MarketCancel),
    ]);

    if items.iter().any(|i| i.bought) {
        kb = kb.row(vec![Button::new(
            texts::BTN_CLEAR_BOUGHT,
            CallbackAction::MarketClearBought,
        )]);
    }

    kb
}

/// Single cancel button shown under prompts.
pub fn cancel_keyboard() -> Keyboard {
    Keyboard::new().row(vec![Button::new(texts::BTN_CANCEL, CallbackAction::Cancel)])
}

/// Yes/no confirmation for clearing the whole list.
pub fn confirm_clear_keyboard() -> Keyboard {
    Keyboard::new().row(vec![
        Button::new(texts::BTN_CONFIRM_CLEAR, CallbackAction::ConfirmClear),
        Button::new(texts::BTN_KEEP, CallbackAction::CancelClear),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(specs: &[(&str, bool)]) -> Vec<Item> {
        specs
            .iter()
            .map(|(name, bought)| Item {
                name: name.to_string(),
                bought: *bought,
            })
            .collect()
    }

    #[test]
    fn escape_html_covers_markup_characters() {
        assert_eq!(escape_html("a<b>&c"), "a&lt;b&gt;&amp;c");
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn list_lines_numbers_from_one_and_strikes_bought() {
        let items = items(&[("Milk", true), ("Bread", false)]);
        let text = list_lines(&items, true);
        assert_eq!(text, "1. <s>Milk</s> ✅\n2. Bread");

        // status hidden for the removal prompt
        let text = list_lines(&items, false);
        assert_eq!(text, "1. Milk\n2. Bread");
    }

    #[test]
    fn list_lines_escapes_item_names() {
        let items = items(&[("<s>free</s>", false)]);
        assert_eq!(list_lines(&items, true), "1. &lt;s&gt;free&lt;/s&gt;");
    }

    #[test]
    fn menu_text_shows_counts_only_when_bought() {
        let plain = items(&[("Milk", false)]);
        let text = main_menu_text(&plain);
        assert!(text.contains("1 item(s)"));
        assert!(!text.contains("bought"));

        let mixed = items(&[("Milk", true), ("Bread", false)]);
        let text = main_menu_text(&mixed);
        assert!(text.contains("2 item(s)"));
        assert!(text.contains("✅ 1 bought"));
    }

    #[test]
    fn empty_menu_text_has_no_counters() {
        let text = main_menu_text(&[]);
        assert!(text.contains(texts::LIST_EMPTY_LINE));
        assert!(!text.contains("item(s)"));
    }

    #[test]
    fn market_text_counts_pending_items() {
        let some = items(&[("Milk", true), ("Bread", false), ("Eggs", false)]);
        assert!(market_text(&some).contains("2 pending"));
    }

    #[test]
    fn main_keyboard_offers_market_only_with_items() {
        let without = main_menu_keyboard(false);
        assert!(
            without
                .buttons()
                .all(|b| b.action != CallbackAction::Market)
        );

        let with = main_menu_keyboard(true);
        assert!(with.buttons().any(|b| b.action == CallbackAction::Market));
    }

    #[test]
    fn market_keyboard_indexes_match_item_positions() {
        let items = items(&[("Milk", true), ("Bread", false)]);
        let kb = market_keyboard(&items);

        assert_eq!(kb.rows[0][0].action, CallbackAction::Toggle(0));
        assert!(kb.rows[0][0].label.starts_with("✅"));
        assert_eq!(kb.rows[1][0].action, CallbackAction::Toggle(1));
        assert!(kb.rows[1][0].label.starts_with("⬜"));
    }

    #[test]
    fn clear_bought_row_requires_a_bought_item() {
        let none_bought = items(&[("Milk", false)]);
        let kb = market_keyboard(&none_bought);
        assert!(
            kb.buttons()
                .all(|b| b.action != CallbackAction::MarketClearBought)
        );

        let one_bought = items(&[("Milk", true)]);
        let kb = market_keyboard(&one_bought);
        assert!(
            kb.buttons()
                .any(|b| b.action == CallbackAction::MarketClearBought)
        );
    }
}
