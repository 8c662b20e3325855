//! Discord command implementations organized by category.

#![allow(clippy::too_long_first_doc_paragraph)]

/// Budget commands
pub mod budget;

/// Dashboard and statistics commands
pub mod dashboard;

/// Expense commands
pub mod expense;

/// Friend management commands
pub mod friend;

/// General utility commands
pub mod general;

/// Friend ledger commands
pub mod ledger;

// Export commands
pub use budget::*;
pub use dashboard::*;
pub use expense::*;
pub use friend::*;
pub use general::*;
pub use ledger::*;
