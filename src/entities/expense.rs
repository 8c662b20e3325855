//! Expense entity - A personal expense logged by the user.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Expense database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    /// Unique identifier for the expense
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owner of the expense
    pub user_id: String,
    /// Short title (e.g., "Lunch", "Metro card")
    pub title: String,
    /// Amount spent, always positive
    pub amount: f64,
    /// Spending category used by budgets and statistics
    pub category: String,
    /// Calendar day the money was spent
    pub date: Date,
    /// When the expense was recorded
    pub created_at: DateTimeUtc,
}

/// Expenses have no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
