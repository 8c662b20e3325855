//! Unified error type for the ledger, the expense tracker and the bot layer.

use thiserror::Error;

/// Every failure the crate can surface.
///
/// Variants fall into three groups: validation failures (recovered locally, the user
/// is re-prompted and no store call is made), not-found lookups (nothing is mutated),
/// and store failures (surfaced verbatim, never retried).
#[derive(Debug, Error)]
pub enum Error {
    /// Missing or malformed configuration
    #[error("Configuration error: {message}")]
    Config {
        /// What was wrong
        message: String,
    },

    /// The store rejected or failed a query
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Amount was zero, negative, NaN or infinite
    #[error("Invalid amount: {amount}. Amount must be a positive number")]
    InvalidAmount {
        /// The rejected amount
        amount: f64,
    },

    /// A text field failed validation
    #[error("Invalid input: {message}")]
    InvalidInput {
        /// What was wrong
        message: String,
    },

    /// No friend with this id belongs to the caller
    #[error("Friend not found: {id}")]
    FriendNotFound {
        /// Requested friend id
        id: i64,
    },

    /// The caller already has a friend with this number
    #[error("A friend with number '{number}' already exists")]
    DuplicateFriendNumber {
        /// The conflicting number
        number: String,
    },

    /// No transaction with this id belongs to the caller
    #[error("Transaction not found: {id}")]
    TransactionNotFound {
        /// Requested transaction id
        id: i64,
    },

    /// Edit or delete attempted on a soft-deleted transaction
    #[error("Transaction {id} has already been deleted")]
    TransactionDeleted {
        /// The deleted transaction's id
        id: i64,
    },

    /// Friend-delete confirmation: the typed number did not match
    #[error("Incorrect unique number")]
    FriendNumberMismatch,

    /// Friend-delete confirmation: the arithmetic answer was wrong
    #[error("Incorrect captcha")]
    CaptchaMismatch,

    /// No expense with this id belongs to the caller
    #[error("Expense not found: {id}")]
    ExpenseNotFound {
        /// Requested expense id
        id: i64,
    },

    /// No budget with this id belongs to the caller
    #[error("Budget not found: {id}")]
    BudgetNotFound {
        /// Requested budget id
        id: i64,
    },

    /// Filesystem failure (config file, data directory)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Required environment variable missing
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    /// Message formatting failed
    #[error("Formatting error: {0}")]
    Fmt(#[from] std::fmt::Error),

    /// Numeric conversion out of range
    #[error("Conversion error: {0}")]
    Conversion(#[from] std::num::TryFromIntError),

    /// Serenity/Poise framework failure
    #[error("Serenity/Poise framework error: {0}")]
    #[allow(clippy::enum_variant_names)]
    FrameworkError(Box<poise::serenity_prelude::Error>),
}

impl Error {
    /// True for failures caused by user input that never reached the store.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidAmount { .. }
                | Self::InvalidInput { .. }
                | Self::DuplicateFriendNumber { .. }
                | Self::TransactionDeleted { .. }
                | Self::FriendNumberMismatch
                | Self::CaptchaMismatch
        )
    }

    /// True when the requested record does not exist for the caller.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::FriendNotFound { .. }
                | Self::TransactionNotFound { .. }
                | Self::ExpenseNotFound { .. }
                | Self::BudgetNotFound { .. }
        )
    }
}

impl From<poise::serenity_prelude::Error> for Error {
    fn from(value: poise::serenity_prelude::Error) -> Self {
        Self::FrameworkError(Box::new(value))
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_classification() {
        assert!(Error::InvalidAmount { amount: 0.0 }.is_validation());
        assert!(Error::CaptchaMismatch.is_validation());
        assert!(Error::FriendNumberMismatch.is_validation());
        assert!(!Error::FriendNotFound { id: 1 }.is_validation());
        assert!(!Error::Database(sea_orm::DbErr::Custom("down".to_string())).is_validation());
    }

    #[test]
    fn test_not_found_classification() {
        assert!(Error::TransactionNotFound { id: 3 }.is_not_found());
        assert!(Error::BudgetNotFound { id: 3 }.is_not_found());
        assert!(!Error::CaptchaMismatch.is_not_found());
    }

    #[test]
    fn test_store_errors_surface_verbatim() {
        let err = Error::from(sea_orm::DbErr::Custom("permission denied".to_string()));
        let message = err.to_string();
        assert!(message.starts_with("Database error: "));
        assert!(message.contains("permission denied"));
    }
}
