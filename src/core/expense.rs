//! Expense business logic - Logging, listing, correcting and removing personal expenses.
//!
//! Expenses are independent of the friend ledger. They feed budgets and the
//! dashboard/statistics totals.

use crate::{
    entities::{Expense, expense},
    errors::{Error, Result},
};
use chrono::{NaiveDate, Utc};
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::info;

/// Category used when none is given.
pub const DEFAULT_CATEGORY: &str = "Other";

fn validate(title: &str, amount: f64) -> Result<()> {
    if title.trim().is_empty() {
        return Err(Error::InvalidInput {
            message: "Expense title cannot be empty".to_string(),
        });
    }
    if !amount.is_finite() || amount <= 0.0 {
        return Err(Error::InvalidAmount { amount });
    }
    Ok(())
}

fn normalize_category(category: &str) -> String {
    let category = category.trim();
    if category.is_empty() {
        DEFAULT_CATEGORY.to_string()
    } else {
        category.to_string()
    }
}

/// Records a new expense.
pub async fn create_expense(
    db: &DatabaseConnection,
    user_id: &str,
    title: &str,
    amount: f64,
    category: &str,
    date: NaiveDate,
) -> Result<expense::Model> {
    validate(title, amount)?;

    let expense = expense::ActiveModel {
        user_id: Set(user_id.to_string()),
        title: Set(title.trim().to_string()),
        amount: Set(amount),
        category: Set(normalize_category(category)),
        date: Set(date),
        created_at: Set(Utc::now()),
        ..Default::default()
    };

    let created = expense.insert(db).await?;
    info!(user_id, expense_id = created.id, amount, "Expense recorded");
    Ok(created)
}

/// Lists all of the caller's expenses, most recent date first.
pub async fn list_expenses(db: &DatabaseConnection, user_id: &str) -> Result<Vec<expense::Model>> {
    Expense::find()
        .filter(expense::Column::UserId.eq(user_id))
        .order_by_desc(expense::Column::Date)
        .order_by_desc(expense::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Lists the caller's expenses dated on or after `since`, oldest first.
pub async fn list_expenses_since(
    db: &DatabaseConnection,
    user_id: &str,
    since: NaiveDate,
) -> Result<Vec<expense::Model>> {
    Expense::find()
        .filter(expense::Column::UserId.eq(user_id))
        .filter(expense::Column::Date.gte(since))
        .order_by_asc(expense::Column::Date)
        .order_by_asc(expense::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds one of the caller's expenses by id.
pub async fn get_expense(
    db: &DatabaseConnection,
    user_id: &str,
    expense_id: i64,
) -> Result<Option<expense::Model>> {
    Expense::find_by_id(expense_id)
        .filter(expense::Column::UserId.eq(user_id))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Replaces the editable fields of an expense.
pub async fn update_expense(
    db: &DatabaseConnection,
    user_id: &str,
    expense_id: i64,
    title: &str,
    amount: f64,
    category: &str,
    date: NaiveDate,
) -> Result<expense::Model> {
    validate(title, amount)?;

    let existing = get_expense(db, user_id, expense_id)
        .await?
        .ok_or(Error::ExpenseNotFound { id: expense_id })?;

    let mut active: expense::ActiveModel = existing.into();
    active.title = Set(title.trim().to_string());
    active.amount = Set(amount);
    active.category = Set(normalize_category(category));
    active.date = Set(date);

    active.update(db).await.map_err(Into::into)
}

/// Permanently removes an expense.
pub async fn delete_expense(db: &DatabaseConnection, user_id: &str, expense_id: i64) -> Result<()> {
    let result = Expense::delete_many()
        .filter(expense::Column::Id.eq(expense_id))
        .filter(expense::Column::UserId.eq(user_id))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        return Err(Error::ExpenseNotFound { id: expense_id });
    }

    info!(user_id, expense_id, "Expense deleted");
    Ok(())
}
