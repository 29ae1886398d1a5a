//! Shared text sent by the bot.
//!
//! Keep all user-facing strings in this module so they stay in one place.
//! Everything is HTML parse-mode markup; user-supplied fragments are
//! escaped by the caller-facing helpers here, never by callers.

use crate::render::escape_html;

pub const MENU_TITLE: &str = "🛒 <b>SHOPPING LIST</b>";
pub const MARKET_TITLE: &str = "🛒 <b>MARKET MODE</b>";
pub const DIVIDER: &str = "━━━━━━━━━━━━━━━";

pub const LIST_EMPTY_LINE: &str = "📋 The list is empty";
pub const EMPTY_NOTICE: &str = "📋 <b>The list is empty!</b>";
pub const ALREADY_EMPTY_NOTICE: &str = "📋 <b>The list is already empty!</b>";
pub const CONFIRM_CLEAR: &str = "⚠️ <b>Clear the whole list?</b>";

pub const TOO_SHORT_NOTICE: &str = "❌ <b>Too short!</b> Use at least 2 characters.";
pub const TYPE_A_NUMBER_NOTICE: &str = "❌ <b>Type the item number!</b>";

pub const MARKET_HINT: &str = "Tap items to mark them off:";

pub const BTN_ADD: &str = "➕ Add";
pub const BTN_REMOVE: &str = "➖ Remove";
pub const BTN_MARKET: &str = "🛒 Market mode";
pub const BTN_CLEAR: &str = "🗑️ Clear all";
pub const BTN_CANCEL: &str = "❌ Cancel";
pub const BTN_FINISH: &str = "✔️ Finish";
pub const BTN_CLEAR_BOUGHT: &str = "🧹 Remove bought";
pub const BTN_CONFIRM_CLEAR: &str = "✅ Yes, clear";
pub const BTN_KEEP: &str = "❌ No";

pub fn add_prompt(user_name: &str) -> String {
    format!(
        "📝 <b>{}</b>, type the item to add:",
        escape_html(user_name)
    )
}

pub fn remove_prompt(list_text: &str, user_name: &str) -> String {
    format!(
        "📋 <b>List:</b>\n{list_text}\n\n🗑️ <b>{}</b>, type the number to remove:",
        escape_html(user_name)
    )
}

pub fn added_notice(name: &str) -> String {
    format!("✅ <b>+{}</b>", escape_html(name))
}

pub fn removed_notice(name: &str) -> String {
    format!("✅ <b>-{}</b>", escape_html(name))
}

pub fn duplicate_notice(name: &str) -> String {
    format!("⚠️ <b>'{}' is already on the list!</b>", escape_html(name))
}

pub fn out_of_range_notice(size: usize) -> String {
    format!("❌ <b>Pick a number from 1 to {size}!</b>")
}

pub fn market_finished_header(bought: usize) -> String {
    format!("✅ <b>Done shopping!</b>\n{bought} item(s) marked")
}

pub fn cleared_bought_header(removed: usize) -> String {
    format!("🧹 <b>{removed} item(s) removed!</b>")
}
