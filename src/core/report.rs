//! Display formatting shared by the bot layer.
//!
//! Pure functions only: these turn balances, ledger entries and budget progress into
//! strings and never compute balances themselves.

use crate::entities::{TransactionStatus, TransactionType, friend_transaction};

/// Formats an amount with two decimals, e.g. `₹12.50`.
#[must_use]
pub fn format_amount(currency: &str, amount: f64) -> String {
    format!("{currency}{:.2}", amount.abs())
}

/// Describes a friend balance from the user's side.
///
/// Non-negative balances are money to take back, negative ones money to give.
#[must_use]
pub fn format_balance(currency: &str, balance: f64) -> String {
    let side = if balance >= 0.0 { "To take" } else { "To give" };
    format!("{} ({side})", format_amount(currency, balance))
}

/// One history line: id, direction, amount, running balance and any status marker.
#[must_use]
pub fn format_ledger_entry(currency: &str, entry: &friend_transaction::Model) -> String {
    let direction = match entry.transaction_type {
        TransactionType::Credit => "➕ You paid",
        TransactionType::Debit => "➖ They paid",
    };
    let marker = match entry.status {
        TransactionStatus::Active => "",
        TransactionStatus::Edited => " ✏️ Edited",
        TransactionStatus::Deleted => " 🗑️ Deleted",
    };
    let note = if entry.note.is_empty() {
        String::new()
    } else {
        format!(" - {}", entry.note)
    };

    format!(
        "`#{}` {} {} {}{note} → {}{marker}",
        entry.id,
        entry.created_at.format("%Y-%m-%d %H:%M"),
        direction,
        format_amount(currency, entry.amount),
        format_balance(currency, entry.balance_at_time),
    )
}

/// Generates a progress bar string for visual representation.
///
/// Creates a text-based progress bar like: `[████████░░] 80.0%`
///
/// # Arguments
/// * `progress_percent` - Progress percentage (0-100)
/// * `bar_length` - Length of the progress bar in characters (default 10)
#[must_use]
pub fn format_progress_bar(progress_percent: f64, bar_length: Option<usize>) -> String {
    let length = bar_length.unwrap_or(10);
    let clamped_progress = progress_percent.clamp(0.0, 100.0);

    // Cast safety: clamped_progress ∈ [0, 100], length is small (10-20).
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    let filled = ((clamped_progress / 100.0) * length as f64).round() as usize;
    let empty = length.saturating_sub(filled);

    let filled_str = "█".repeat(filled);
    let empty_str = "░".repeat(empty);

    format!("[{filled_str}{empty_str}] {progress_percent:.1}%")
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use chrono::{TimeZone, Utc};

    fn entry(status: TransactionStatus, note: &str) -> friend_transaction::Model {
        friend_transaction::Model {
            id: 12,
            user_id: "u".to_string(),
            friend_id: 1,
            amount: 40.0,
            transaction_type: TransactionType::Debit,
            note: note.to_string(),
            status,
            balance_at_time: -15.5,
            created_at: Utc.with_ymd_and_hms(2026, 3, 4, 18, 30, 0).unwrap(),
        }
    }

    #[test]
    fn test_format_balance_sides() {
        assert_eq!(format_balance("₹", 60.0), "₹60.00 (To take)");
        assert_eq!(format_balance("₹", 0.0), "₹0.00 (To take)");
        assert_eq!(format_balance("$", -12.5), "$12.50 (To give)");
    }

    #[test]
    fn test_format_ledger_entry() {
        let line = format_ledger_entry("₹", &entry(TransactionStatus::Edited, "Cab"));
        assert_eq!(
            line,
            "`#12` 2026-03-04 18:30 ➖ They paid ₹40.00 - Cab → ₹15.50 (To give) ✏️ Edited"
        );

        let line = format_ledger_entry("₹", &entry(TransactionStatus::Active, ""));
        assert!(line.ends_with("→ ₹15.50 (To give)"));
    }

    #[test]
    fn test_format_progress_bar() {
        assert_eq!(format_progress_bar(50.0, Some(10)), "[█████░░░░░] 50.0%");
        assert_eq!(format_progress_bar(130.0, Some(4)), "[████] 130.0%");
        assert_eq!(format_progress_bar(-5.0, None), "[░░░░░░░░░░] -5.0%");
    }
}
