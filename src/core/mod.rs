//! Core business logic - framework-agnostic ledger, expense, budget and reporting operations.
//!
//! Every function takes the caller's user id and only ever touches that user's rows.

/// Budgets and progress against them
pub mod budget;
/// Personal expenses
pub mod expense;
/// Friends and cascading delete
pub mod friend;
/// Confirmation challenge for friend deletion
pub mod guard;
/// Friend ledger balance engine
pub mod ledger;
/// Display formatting helpers
pub mod report;
/// Dashboard totals and statistics
pub mod stats;
/// Totals owed across all friends
pub mod summary;
