//! Aggregate totals across all friend ledgers.

use crate::{core::friend, entities::friend as friend_entity, errors::Result};
use sea_orm::DatabaseConnection;

/// How much the user owes in total and how much is owed to the user.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BalanceSummary {
    /// Sum of |balance| over friends the user owes (balance < 0)
    pub total_to_give: f64,
    /// Sum of balances over friends who owe the user (balance >= 0)
    pub total_to_take: f64,
}

impl BalanceSummary {
    /// Net position: positive when the user is owed more than they owe.
    #[must_use]
    pub fn net(&self) -> f64 {
        self.total_to_take - self.total_to_give
    }
}

/// Partitions balances by sign and totals each side.
#[must_use]
pub fn summarize<I>(balances: I) -> BalanceSummary
where
    I: IntoIterator<Item = f64>,
{
    balances
        .into_iter()
        .fold(BalanceSummary::default(), |mut acc, balance| {
            if balance < 0.0 {
                acc.total_to_give += balance.abs();
            } else {
                acc.total_to_take += balance;
            }
            acc
        })
}

/// Summarises already-loaded friends.
#[must_use]
pub fn summarize_friends(friends: &[friend_entity::Model]) -> BalanceSummary {
    summarize(friends.iter().map(|f| f.balance))
}

/// Loads the caller's friends and summarises their balances.
pub async fn summary_for_user(db: &DatabaseConnection, user_id: &str) -> Result<BalanceSummary> {
    let friends = friend::list_friends(db, user_id).await?;
    Ok(summarize_friends(&friends))
}
