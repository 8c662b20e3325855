//! Friend entity - One counterparty the user splits bills with.
//!
//! Each friend carries a cached `balance`: positive means the friend owes the user,
//! negative means the user owes the friend. The cache always equals the signed sum
//! of the friend's non-deleted transactions.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Friend database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "friends")]
pub struct Model {
    /// Unique identifier for the friend
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owner of this ledger
    pub user_id: String,
    /// Display name of the friend
    pub friend_name: String,
    /// Identifying number, unique per owner and immutable once created
    pub friend_number: String,
    /// Cached running balance of the ledger
    pub balance: f64,
    /// When the friend was added
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Friend and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One friend has many ledger transactions
    #[sea_orm(has_many = "super::friend_transaction::Entity")]
    Transactions,
}

impl Related<super::friend_transaction::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
