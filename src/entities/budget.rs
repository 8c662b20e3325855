//! Budget entity - A spending limit for one category over a recurring period.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Window a budget limit applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum BudgetPeriod {
    /// Calendar month
    #[sea_orm(string_value = "monthly")]
    Monthly,
    /// Week starting Monday
    #[sea_orm(string_value = "weekly")]
    Weekly,
}

impl fmt::Display for BudgetPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Monthly => f.write_str("monthly"),
            Self::Weekly => f.write_str("weekly"),
        }
    }
}

/// Budget database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "budgets")]
pub struct Model {
    /// Unique identifier for the budget
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owner of the budget
    pub user_id: String,
    /// Expense category this budget limits
    pub category: String,
    /// Spending limit per period
    pub amount: f64,
    /// Monthly or weekly
    pub period: BudgetPeriod,
    /// When the budget was created
    pub created_at: DateTimeUtc,
}

/// Budgets have no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
