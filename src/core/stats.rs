//! Dashboard totals and spending statistics.
//!
//! The dashboard is a snapshot of expense totals plus the friend summary. Statistics
//! look back a number of months and fold in credit transactions from friend ledgers
//! (money the user paid on a friend's behalf) as the category "Friends".

use crate::{
    core::{expense, summary},
    entities::{
        FriendTransaction, TransactionStatus, TransactionType, expense as expense_entity,
        friend_transaction,
    },
    errors::Result,
};
use chrono::{Datelike, Months, NaiveDate, NaiveTime};
use sea_orm::{QueryOrder, prelude::*};
use std::collections::{BTreeMap, HashMap};

/// Category that friend credits are reported under.
pub const FRIENDS_CATEGORY: &str = "Friends";

const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Headline numbers for the dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardStats {
    /// All expenses ever recorded
    pub total_expenses: f64,
    /// Expenses dated in the current calendar month
    pub monthly_expenses: f64,
    /// Expenses dated today
    pub today_expenses: f64,
    /// Number of expenses ever recorded
    pub expense_count: usize,
    /// Friend balances owed either way
    pub friends: summary::BalanceSummary,
}

/// Spending in one calendar month.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyTotal {
    /// Calendar year
    pub year: i32,
    /// Month, 1-12
    pub month: u32,
    /// Amount spent
    pub amount: f64,
}

impl MonthlyTotal {
    /// Short label like `Mar 2026`.
    #[must_use]
    pub fn label(&self) -> String {
        let name = usize::try_from(self.month)
            .ok()
            .and_then(|m| m.checked_sub(1))
            .and_then(|i| MONTH_NAMES.get(i))
            .copied()
            .unwrap_or("???");
        format!("{name} {}", self.year)
    }
}

/// Spending in one category.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotal {
    /// Category name
    pub category: String,
    /// Amount spent
    pub amount: f64,
}

/// Look-back statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct Statistics {
    /// Per-month totals, oldest first
    pub monthly: Vec<MonthlyTotal>,
    /// Per-category totals, largest first
    pub categories: Vec<CategoryTotal>,
    /// Spending in the current calendar month
    pub total_this_month: f64,
    /// `total_this_month` divided by the day of the month
    pub average_daily: f64,
    /// Largest category, or "None" when nothing was spent
    pub top_category: String,
}

/// Folds expenses into dashboard totals. The friend summary is left at zero.
#[must_use]
pub fn dashboard_totals(expenses: &[expense_entity::Model], today: NaiveDate) -> DashboardStats {
    let month_start = today.with_day(1).unwrap_or(today);

    DashboardStats {
        total_expenses: expenses.iter().map(|e| e.amount).sum(),
        monthly_expenses: expenses
            .iter()
            .filter(|e| e.date >= month_start)
            .map(|e| e.amount)
            .sum(),
        today_expenses: expenses
            .iter()
            .filter(|e| e.date == today)
            .map(|e| e.amount)
            .sum(),
        expense_count: expenses.len(),
        friends: summary::BalanceSummary::default(),
    }
}

/// Dashboard for the caller as of `today`.
pub async fn dashboard(
    db: &DatabaseConnection,
    user_id: &str,
    today: NaiveDate,
) -> Result<DashboardStats> {
    let expenses = expense::list_expenses(db, user_id).await?;
    let friends = summary::summary_for_user(db, user_id).await?;

    Ok(DashboardStats {
        friends,
        ..dashboard_totals(&expenses, today)
    })
}

/// Builds statistics from expenses and friend credits already limited to the window.
#[must_use]
pub fn compute_statistics(
    expenses: &[expense_entity::Model],
    friend_credits: &[friend_transaction::Model],
    today: NaiveDate,
) -> Statistics {
    let entries = expenses
        .iter()
        .map(|e| (e.date, e.category.as_str(), e.amount))
        .chain(
            friend_credits
                .iter()
                .map(|t| (t.created_at.date_naive(), FRIENDS_CATEGORY, t.amount)),
        );

    let mut by_month: BTreeMap<(i32, u32), f64> = BTreeMap::new();
    let mut by_category: HashMap<&str, f64> = HashMap::new();
    let mut total_this_month = 0.0;

    for (date, category, amount) in entries {
        *by_month.entry((date.year(), date.month())).or_default() += amount;
        *by_category.entry(category).or_default() += amount;
        if date.year() == today.year() && date.month() == today.month() {
            total_this_month += amount;
        }
    }

    let monthly = by_month
        .into_iter()
        .map(|((year, month), amount)| MonthlyTotal {
            year,
            month,
            amount,
        })
        .collect();

    let mut categories: Vec<CategoryTotal> = by_category
        .into_iter()
        .map(|(category, amount)| CategoryTotal {
            category: category.to_string(),
            amount,
        })
        .collect();
    categories.sort_by(|a, b| {
        b.amount
            .total_cmp(&a.amount)
            .then_with(|| a.category.cmp(&b.category))
    });

    let top_category = categories
        .first()
        .map_or_else(|| "None".to_string(), |c| c.category.clone());

    Statistics {
        monthly,
        categories,
        total_this_month,
        average_daily: total_this_month / f64::from(today.day()),
        top_category,
    }
}

/// Statistics for the caller over the last `months` months up to `today`.
pub async fn statistics(
    db: &DatabaseConnection,
    user_id: &str,
    today: NaiveDate,
    months: u32,
) -> Result<Statistics> {
    let since = today
        .checked_sub_months(Months::new(months))
        .unwrap_or(NaiveDate::MIN);
    let since_instant = since.and_time(NaiveTime::MIN).and_utc();

    let expenses = expense::list_expenses_since(db, user_id, since).await?;
    let friend_credits = FriendTransaction::find()
        .filter(friend_transaction::Column::UserId.eq(user_id))
        .filter(friend_transaction::Column::TransactionType.eq(TransactionType::Credit))
        .filter(friend_transaction::Column::Status.ne(TransactionStatus::Deleted))
        .filter(friend_transaction::Column::CreatedAt.gte(since_instant))
        .order_by_asc(friend_transaction::Column::CreatedAt)
        .all(db)
        .await?;

    Ok(compute_statistics(&expenses, &friend_credits, today))
}
