//! Shared test utilities for Split Buddy.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.

#![allow(clippy::unwrap_used)]

use crate::{
    core::{expense, friend},
    entities::{self, TransactionStatus, TransactionType},
    errors::Result,
};
use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};

/// Owner used by most tests
pub const TEST_USER: &str = "test_user";
/// A second user, for ownership checks
pub const OTHER_USER: &str = "other_user";

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Shorthand for a calendar date.
pub fn day(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// A friend record that was never stored, for tests that must not touch the database.
pub fn sample_friend(id: i64, friend_number: &str) -> entities::friend::Model {
    entities::friend::Model {
        id,
        user_id: TEST_USER.to_string(),
        friend_name: "Sample".to_string(),
        friend_number: friend_number.to_string(),
        balance: 0.0,
        created_at: Utc::now(),
    }
}

/// Creates a friend for `user_id`.
pub async fn create_test_friend(
    db: &DatabaseConnection,
    user_id: &str,
    name: &str,
    number: &str,
) -> Result<entities::friend::Model> {
    friend::create_friend(db, user_id, name, number).await
}

/// Sets up a complete test environment with one friend owned by `TEST_USER`.
/// Returns (db, friend) for common ledger scenarios.
pub async fn setup_with_friend() -> Result<(DatabaseConnection, entities::friend::Model)> {
    let db = setup_test_db().await?;
    let friend = create_test_friend(&db, TEST_USER, "Asha", "98765").await?;
    Ok((db, friend))
}

/// Creates an expense titled "Test expense".
pub async fn create_test_expense(
    db: &DatabaseConnection,
    user_id: &str,
    amount: f64,
    category: &str,
    date: NaiveDate,
) -> Result<entities::expense::Model> {
    expense::create_expense(db, user_id, "Test expense", amount, category, date).await
}

/// Inserts a ledger row directly, bypassing the engine.
///
/// Used to build histories the engine would never produce on its own, such as a
/// backdated entry. `balance_at_time` is left at zero.
pub async fn insert_raw_transaction(
    db: &DatabaseConnection,
    friend: &entities::friend::Model,
    amount: f64,
    transaction_type: TransactionType,
    created_at: DateTime<Utc>,
) -> Result<entities::friend_transaction::Model> {
    let record = entities::friend_transaction::ActiveModel {
        user_id: Set(friend.user_id.clone()),
        friend_id: Set(friend.id),
        amount: Set(amount),
        transaction_type: Set(transaction_type),
        note: Set(String::new()),
        status: Set(TransactionStatus::Active),
        balance_at_time: Set(0.0),
        created_at: Set(created_at),
        ..Default::default()
    };
    Ok(record.insert(db).await?)
}
