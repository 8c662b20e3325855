//! Friend transaction entity - One entry of a friend ledger.
//!
//! Entries are appended, edited in place (`status = edited`) or soft-deleted
//! (`status = deleted`). `balance_at_time` snapshots the running balance right after
//! the entry, walking non-deleted entries in `created_at` order.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of a ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// The user paid on the friend's behalf; the friend owes more.
    #[sea_orm(string_value = "credit")]
    Credit,
    /// The friend paid on the user's behalf; the friend owes less.
    #[sea_orm(string_value = "debit")]
    Debit,
}

impl TransactionType {
    /// Stored string form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Credit => "credit",
            Self::Debit => "debit",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle state of a ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    /// As originally recorded
    #[sea_orm(string_value = "active")]
    Active,
    /// Amount, type or note changed after recording
    #[sea_orm(string_value = "edited")]
    Edited,
    /// Soft-deleted; kept for history, excluded from balances
    #[sea_orm(string_value = "deleted")]
    Deleted,
}

impl TransactionStatus {
    /// Stored string form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Edited => "edited",
            Self::Deleted => "deleted",
        }
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Friend transaction database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    /// Unique identifier for the transaction
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owner of the ledger this entry belongs to
    pub user_id: String,
    /// ID of the friend whose ledger this entry belongs to
    pub friend_id: i64,
    /// Always positive; direction comes from `transaction_type`
    pub amount: f64,
    /// Credit or debit
    pub transaction_type: TransactionType,
    /// Free-form note entered with the transaction
    pub note: String,
    /// Active, edited or deleted
    pub status: TransactionStatus,
    /// Running balance immediately after this entry
    pub balance_at_time: f64,
    /// When the transaction was recorded; defines ledger order
    pub created_at: DateTimeUtc,
}

/// Defines relationships between `FriendTransaction` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each transaction belongs to one friend
    #[sea_orm(
        belongs_to = "super::friend::Entity",
        from = "Column::FriendId",
        to = "super::friend::Column::Id",
        on_delete = "Cascade"
    )]
    Friend,
}

impl Related<super::friend::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Friend.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
