//! Budget business logic - Category spending limits and progress against them.
//!
//! A budget covers one category for a recurring window: the calendar month or the
//! week starting Monday. Progress sums the caller's expenses in that category whose
//! date falls inside the window containing `today`.

use crate::{
    core::expense,
    entities::{Budget, BudgetPeriod, budget, expense as expense_entity},
    errors::{Error, Result},
};
use chrono::{Datelike, Days, Months, NaiveDate, Utc};
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::info;

/// Spending band derived from the share of the budget used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BudgetStatus {
    /// At most 50% used
    OnTrack,
    /// More than 50% and at most 80% used
    Warning,
    /// More than 80% used
    Over,
}

impl BudgetStatus {
    /// Bands a usage percentage.
    #[must_use]
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage <= 50.0 {
            Self::OnTrack
        } else if percentage <= 80.0 {
            Self::Warning
        } else {
            Self::Over
        }
    }

    /// Traffic-light marker for display.
    #[must_use]
    pub const fn emoji(self) -> &'static str {
        match self {
            Self::OnTrack => "🟢",
            Self::Warning => "🟡",
            Self::Over => "🔴",
        }
    }
}

/// A budget together with what has been spent against it this period.
#[derive(Debug, Clone)]
pub struct BudgetProgress {
    /// The budget being reported on
    pub budget: budget::Model,
    /// First day of the current window
    pub window_start: NaiveDate,
    /// Day after the last day of the current window
    pub window_end: NaiveDate,
    /// Sum of matching expenses inside the window
    pub spent: f64,
    /// Share of the limit used, in percent
    pub percentage: f64,
    /// `amount - spent`, negative when overspent
    pub remaining: f64,
    /// Band for `percentage`
    pub status: BudgetStatus,
}

/// Half-open window `[start, end)` of `period` that contains `today`.
#[must_use]
pub fn period_window(period: BudgetPeriod, today: NaiveDate) -> (NaiveDate, NaiveDate) {
    match period {
        BudgetPeriod::Monthly => {
            let start = today.with_day(1).unwrap_or(today);
            let end = start.checked_add_months(Months::new(1)).unwrap_or(NaiveDate::MAX);
            (start, end)
        }
        BudgetPeriod::Weekly => {
            let offset = u64::from(today.weekday().num_days_from_monday());
            let start = today.checked_sub_days(Days::new(offset)).unwrap_or(today);
            let end = start.checked_add_days(Days::new(7)).unwrap_or(NaiveDate::MAX);
            (start, end)
        }
    }
}

/// Computes progress for one budget from a set of expenses.
#[must_use]
pub fn progress_for(
    budget: budget::Model,
    expenses: &[expense_entity::Model],
    today: NaiveDate,
) -> BudgetProgress {
    let (window_start, window_end) = period_window(budget.period, today);

    let spent: f64 = expenses
        .iter()
        .filter(|e| e.category == budget.category)
        .filter(|e| e.date >= window_start && e.date < window_end)
        .map(|e| e.amount)
        .sum();

    let percentage = if budget.amount > 0.0 {
        spent * 100.0 / budget.amount
    } else {
        0.0
    };

    BudgetProgress {
        remaining: budget.amount - spent,
        status: BudgetStatus::from_percentage(percentage),
        budget,
        window_start,
        window_end,
        spent,
        percentage,
    }
}

/// Creates a budget for a category.
pub async fn create_budget(
    db: &DatabaseConnection,
    user_id: &str,
    category: &str,
    amount: f64,
    period: BudgetPeriod,
) -> Result<budget::Model> {
    let category = category.trim();
    if category.is_empty() {
        return Err(Error::InvalidInput {
            message: "Budget category cannot be empty".to_string(),
        });
    }
    if !amount.is_finite() || amount <= 0.0 {
        return Err(Error::InvalidAmount { amount });
    }

    let budget = budget::ActiveModel {
        user_id: Set(user_id.to_string()),
        category: Set(category.to_string()),
        amount: Set(amount),
        period: Set(period),
        created_at: Set(Utc::now()),
        ..Default::default()
    };

    let created = budget.insert(db).await?;
    info!(user_id, budget_id = created.id, %period, amount, "Budget created");
    Ok(created)
}

/// Lists the caller's budgets, newest first.
pub async fn list_budgets(db: &DatabaseConnection, user_id: &str) -> Result<Vec<budget::Model>> {
    Budget::find()
        .filter(budget::Column::UserId.eq(user_id))
        .order_by_desc(budget::Column::CreatedAt)
        .order_by_desc(budget::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Removes a budget.
pub async fn delete_budget(db: &DatabaseConnection, user_id: &str, budget_id: i64) -> Result<()> {
    let result = Budget::delete_many()
        .filter(budget::Column::Id.eq(budget_id))
        .filter(budget::Column::UserId.eq(user_id))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        return Err(Error::BudgetNotFound { id: budget_id });
    }
    Ok(())
}

/// Progress of every budget the caller has, for the windows containing `today`.
pub async fn budget_progress(
    db: &DatabaseConnection,
    user_id: &str,
    today: NaiveDate,
) -> Result<Vec<BudgetProgress>> {
    let budgets = list_budgets(db, user_id).await?;
    let Some(earliest) = budgets
        .iter()
        .map(|b| period_window(b.period, today).0)
        .min()
    else {
        return Ok(Vec::new());
    };

    let expenses = expense::list_expenses_since(db, user_id, earliest).await?;

    Ok(budgets
        .into_iter()
        .map(|b| progress_for(b, &expenses, today))
        .collect())
}
