//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the tables the ledger and expense tracker persist to.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod budget;
pub mod expense;
pub mod friend;
pub mod friend_transaction;

// Re-export specific types to avoid conflicts
pub use budget::{BudgetPeriod, Column as BudgetColumn, Entity as Budget, Model as BudgetModel};
pub use expense::{Column as ExpenseColumn, Entity as Expense, Model as ExpenseModel};
pub use friend::{Column as FriendColumn, Entity as Friend, Model as FriendModel};
pub use friend_transaction::{
    Column as FriendTransactionColumn, Entity as FriendTransaction,
    Model as FriendTransactionModel, TransactionStatus, TransactionType,
};
