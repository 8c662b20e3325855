//! Friend ledger - Keeps friend balances and running snapshots consistent.
//!
//! Invariant: a friend's cached `balance` equals the signed sum of its non-deleted
//! transactions, and every non-deleted transaction's `balance_at_time` equals the
//! running sum up to and including it, walking in `created_at` order (ties by id).
//!
//! Appending is incremental: the new entry is always last, so only the friend's
//! balance and the new row are written. Edits and deletes change history in the
//! middle, so they re-walk the whole ledger. Each mutation runs in a single database
//! transaction, which serialises concurrent writers to the same ledger.

use crate::{
    core::friend::get_owned_friend,
    entities::{
        Friend, FriendTransaction, TransactionStatus, TransactionType, friend, friend_transaction,
    },
    errors::{Error, Result},
};
use chrono::Utc;
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*, sea_query::Expr};
use tracing::{debug, info};

/// `+amount` for a credit, `-amount` for a debit.
#[must_use]
pub fn signed_amount(amount: f64, transaction_type: TransactionType) -> f64 {
    match transaction_type {
        TransactionType::Credit => amount,
        TransactionType::Debit => -amount,
    }
}

/// Running balance after each entry, in the order given.
#[must_use]
pub fn running_balances<I>(entries: I) -> Vec<f64>
where
    I: IntoIterator<Item = (f64, TransactionType)>,
{
    entries
        .into_iter()
        .scan(0.0, |running, (amount, transaction_type)| {
            *running += signed_amount(amount, transaction_type);
            Some(*running)
        })
        .collect()
}

fn validate_amount(amount: f64) -> Result<()> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(Error::InvalidAmount { amount });
    }
    Ok(())
}

async fn get_owned_transaction<C>(
    db: &C,
    user_id: &str,
    transaction_id: i64,
) -> Result<friend_transaction::Model>
where
    C: ConnectionTrait,
{
    FriendTransaction::find_by_id(transaction_id)
        .filter(friend_transaction::Column::UserId.eq(user_id))
        .one(db)
        .await?
        .ok_or(Error::TransactionNotFound { id: transaction_id })
}

async fn set_friend_balance<C>(db: &C, friend_id: i64, balance: f64) -> Result<()>
where
    C: ConnectionTrait,
{
    let updated = Friend::update_many()
        .col_expr(friend::Column::Balance, Expr::value(balance))
        .filter(friend::Column::Id.eq(friend_id))
        .exec(db)
        .await?;

    if updated.rows_affected == 0 {
        return Err(Error::FriendNotFound { id: friend_id });
    }
    Ok(())
}

/// Records a new transaction at the end of a friend's ledger.
///
/// The new entry's `balance_at_time` is the friend's current balance plus its signed
/// amount, and the friend's balance is moved to the same value. No other entry changes.
///
/// # Arguments
/// * `user_id` - Caller; must own the friend
/// * `friend_id` - Ledger to append to
/// * `amount` - Positive, finite amount
/// * `transaction_type` - Credit (user paid) or debit (friend paid)
/// * `note` - Free-form note
pub async fn append(
    db: &DatabaseConnection,
    user_id: &str,
    friend_id: i64,
    amount: f64,
    transaction_type: TransactionType,
    note: &str,
) -> Result<friend_transaction::Model> {
    validate_amount(amount)?;

    let txn = db.begin().await?;

    let friend = get_owned_friend(&txn, user_id, friend_id).await?;
    let new_balance = friend.balance + signed_amount(amount, transaction_type);

    let record = friend_transaction::ActiveModel {
        user_id: Set(user_id.to_string()),
        friend_id: Set(friend.id),
        amount: Set(amount),
        transaction_type: Set(transaction_type),
        note: Set(note.trim().to_string()),
        status: Set(TransactionStatus::Active),
        balance_at_time: Set(new_balance),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    set_friend_balance(&txn, friend.id, new_balance).await?;

    txn.commit().await?;
    info!(
        user_id,
        friend_id,
        transaction_id = record.id,
        %transaction_type,
        amount,
        new_balance,
        "Ledger entry appended"
    );
    Ok(record)
}

/// Changes an existing transaction and re-walks the friend's ledger.
///
/// The entry is marked `edited`. Because it may sit anywhere in history, every
/// non-deleted entry's `balance_at_time` is recomputed and the friend's balance is
/// set to the final running total. Deleted entries cannot be edited.
pub async fn edit(
    db: &DatabaseConnection,
    user_id: &str,
    transaction_id: i64,
    amount: f64,
    transaction_type: TransactionType,
    note: &str,
) -> Result<friend_transaction::Model> {
    validate_amount(amount)?;

    let txn = db.begin().await?;

    let existing = get_owned_transaction(&txn, user_id, transaction_id).await?;
    if existing.status == TransactionStatus::Deleted {
        return Err(Error::TransactionDeleted { id: transaction_id });
    }
    let friend_id = existing.friend_id;

    let mut active: friend_transaction::ActiveModel = existing.into();
    active.amount = Set(amount);
    active.transaction_type = Set(transaction_type);
    active.note = Set(note.trim().to_string());
    active.status = Set(TransactionStatus::Edited);
    active.update(&txn).await?;

    let balance = recompute_friend(&txn, friend_id).await?;

    let edited = get_owned_transaction(&txn, user_id, transaction_id).await?;
    txn.commit().await?;

    info!(user_id, friend_id, transaction_id, balance, "Ledger entry edited");
    Ok(edited)
}

/// Soft-deletes a transaction and re-walks the friend's ledger.
///
/// The row is kept with `status = deleted` and its last `balance_at_time`, and stops
/// counting towards any balance. Every later entry's snapshot is recomputed, so no
/// surviving entry is left stale. Returns the friend's new balance.
pub async fn delete(db: &DatabaseConnection, user_id: &str, transaction_id: i64) -> Result<f64> {
    let txn = db.begin().await?;

    let existing = get_owned_transaction(&txn, user_id, transaction_id).await?;
    if existing.status == TransactionStatus::Deleted {
        return Err(Error::TransactionDeleted { id: transaction_id });
    }
    let friend_id = existing.friend_id;

    let mut active: friend_transaction::ActiveModel = existing.into();
    active.status = Set(TransactionStatus::Deleted);
    active.update(&txn).await?;

    let balance = recompute_friend(&txn, friend_id).await?;

    txn.commit().await?;
    info!(user_id, friend_id, transaction_id, balance, "Ledger entry deleted");
    Ok(balance)
}

/// Hard-deletes every transaction of a friend and resets its balance to zero.
///
/// This cannot be undone. Returns the number of transactions removed.
pub async fn clear_chat(db: &DatabaseConnection, user_id: &str, friend_id: i64) -> Result<u64> {
    let txn = db.begin().await?;

    let friend = get_owned_friend(&txn, user_id, friend_id).await?;

    let removed = FriendTransaction::delete_many()
        .filter(friend_transaction::Column::FriendId.eq(friend.id))
        .exec(&txn)
        .await?
        .rows_affected;

    set_friend_balance(&txn, friend.id, 0.0).await?;

    txn.commit().await?;
    info!(user_id, friend_id, removed, "Ledger cleared");
    Ok(removed)
}

/// Re-walks a friend's non-deleted transactions in chronological order.
///
/// Rewrites each entry's `balance_at_time` with the running total, stores the final
/// total as the friend's balance and returns it. Run it inside the caller's database
/// transaction so the walk cannot interleave with another mutation.
pub async fn recompute_friend<C>(db: &C, friend_id: i64) -> Result<f64>
where
    C: ConnectionTrait,
{
    let history = FriendTransaction::find()
        .filter(friend_transaction::Column::FriendId.eq(friend_id))
        .filter(friend_transaction::Column::Status.ne(TransactionStatus::Deleted))
        .order_by_asc(friend_transaction::Column::CreatedAt)
        .order_by_asc(friend_transaction::Column::Id)
        .all(db)
        .await?;

    let balances = running_balances(
        history
            .iter()
            .map(|entry| (entry.amount, entry.transaction_type)),
    );

    for (entry, running) in history.into_iter().zip(balances.iter().copied()) {
        FriendTransaction::update_many()
            .col_expr(
                friend_transaction::Column::BalanceAtTime,
                Expr::value(running),
            )
            .filter(friend_transaction::Column::Id.eq(entry.id))
            .exec(db)
            .await?;
    }

    let balance = balances.last().copied().unwrap_or(0.0);
    set_friend_balance(db, friend_id, balance).await?;

    debug!(friend_id, entries = balances.len(), balance, "Ledger re-walked");
    Ok(balance)
}

/// Lists a friend's non-deleted transactions, newest first.
pub async fn history(
    db: &DatabaseConnection,
    user_id: &str,
    friend_id: i64,
) -> Result<Vec<friend_transaction::Model>> {
    let friend = get_owned_friend(db, user_id, friend_id).await?;

    FriendTransaction::find()
        .filter(friend_transaction::Column::FriendId.eq(friend.id))
        .filter(friend_transaction::Column::Status.ne(TransactionStatus::Deleted))
        .order_by_desc(friend_transaction::Column::CreatedAt)
        .order_by_desc(friend_transaction::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::*;
    use chrono::Duration;
    use sea_orm::{DatabaseBackend, MockDatabase};

    async fn reload(db: &DatabaseConnection, id: i64) -> Result<friend_transaction::Model> {
        Ok(FriendTransaction::find_by_id(id).one(db).await?.unwrap())
    }

    async fn friend_balance(db: &DatabaseConnection, id: i64) -> Result<f64> {
        Ok(Friend::find_by_id(id).one(db).await?.unwrap().balance)
    }

    /// Signed sum of the non-deleted entries, computed independently of the engine.
    async fn ledger_sum(db: &DatabaseConnection, friend_id: i64) -> Result<f64> {
        Ok(FriendTransaction::find()
            .filter(friend_transaction::Column::FriendId.eq(friend_id))
            .all(db)
            .await?
            .iter()
            .filter(|t| t.status != TransactionStatus::Deleted)
            .map(|t| signed_amount(t.amount, t.transaction_type))
            .sum())
    }

    #[test]
    fn test_signed_amount() {
        assert_eq!(signed_amount(25.0, TransactionType::Credit), 25.0);
        assert_eq!(signed_amount(25.0, TransactionType::Debit), -25.0);
    }

    #[test]
    fn test_running_balances() {
        let balances = running_balances([
            (100.0, TransactionType::Credit),
            (40.0, TransactionType::Debit),
            (15.0, TransactionType::Debit),
        ]);
        assert_eq!(balances, vec![100.0, 60.0, 45.0]);
        assert!(running_balances(Vec::new()).is_empty());
    }

    #[tokio::test]
    async fn test_invalid_amounts_rejected_without_store_call() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();

        for amount in [0.0, -5.0, f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let result = append(&db, TEST_USER, 1, amount, TransactionType::Credit, "").await;
            assert!(matches!(result, Err(Error::InvalidAmount { .. })));

            let result = edit(&db, TEST_USER, 1, amount, TransactionType::Debit, "").await;
            assert!(matches!(result, Err(Error::InvalidAmount { .. })));
        }

        assert!(db.into_transaction_log().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_append_to_unknown_friend() -> Result<()> {
        let db = setup_test_db().await?;

        let result = append(&db, TEST_USER, 999, 10.0, TransactionType::Credit, "x").await;
        assert!(matches!(result, Err(Error::FriendNotFound { id: 999 })));

        Ok(())
    }

    #[tokio::test]
    async fn test_append_to_other_users_friend() -> Result<()> {
        let (db, friend) = setup_with_friend().await?;

        let result = append(&db, OTHER_USER, friend.id, 10.0, TransactionType::Credit, "").await;
        assert!(matches!(result, Err(Error::FriendNotFound { .. })));
        assert_eq!(friend_balance(&db, friend.id).await?, 0.0);

        Ok(())
    }

    #[tokio::test]
    async fn test_append_is_incremental() -> Result<()> {
        let (db, friend) = setup_with_friend().await?;

        let first = append(&db, TEST_USER, friend.id, 100.0, TransactionType::Credit, "Dinner")
            .await?;
        assert_eq!(first.balance_at_time, 100.0);
        assert_eq!(first.status, TransactionStatus::Active);
        assert_eq!(friend_balance(&db, friend.id).await?, 100.0);

        let second = append(&db, TEST_USER, friend.id, 40.0, TransactionType::Debit, "Cab").await?;
        assert_eq!(second.balance_at_time, 60.0);
        assert_eq!(friend_balance(&db, friend.id).await?, 60.0);

        // The earlier snapshot is untouched
        assert_eq!(reload(&db, first.id).await?.balance_at_time, 100.0);

        Ok(())
    }

    #[tokio::test]
    async fn test_edit_rewalks_whole_ledger() -> Result<()> {
        let (db, friend) = setup_with_friend().await?;

        let first = append(&db, TEST_USER, friend.id, 100.0, TransactionType::Credit, "").await?;
        let second = append(&db, TEST_USER, friend.id, 40.0, TransactionType::Debit, "").await?;

        let edited = edit(&db, TEST_USER, first.id, 50.0, TransactionType::Credit, "fixed").await?;
        assert_eq!(edited.status, TransactionStatus::Edited);
        assert_eq!(edited.amount, 50.0);
        assert_eq!(edited.note, "fixed");
        assert_eq!(edited.balance_at_time, 50.0);

        assert_eq!(reload(&db, second.id).await?.balance_at_time, 10.0);
        assert_eq!(friend_balance(&db, friend.id).await?, 10.0);

        Ok(())
    }

    #[tokio::test]
    async fn test_edit_middle_entry_rewrites_only_later_snapshots() -> Result<()> {
        let (db, friend) = setup_with_friend().await?;

        let first = append(&db, TEST_USER, friend.id, 100.0, TransactionType::Credit, "").await?;
        let second = append(&db, TEST_USER, friend.id, 40.0, TransactionType::Debit, "").await?;
        let third = append(&db, TEST_USER, friend.id, 20.0, TransactionType::Credit, "").await?;
        let fourth = append(&db, TEST_USER, friend.id, 10.0, TransactionType::Debit, "").await?;
        assert_eq!(fourth.balance_at_time, 70.0);

        let edited = edit(&db, TEST_USER, second.id, 70.0, TransactionType::Debit, "").await?;
        assert_eq!(edited.balance_at_time, 30.0);

        assert_eq!(reload(&db, first.id).await?.balance_at_time, 100.0);
        assert_eq!(reload(&db, first.id).await?.status, TransactionStatus::Active);
        assert_eq!(reload(&db, third.id).await?.balance_at_time, 50.0);
        assert_eq!(reload(&db, fourth.id).await?.balance_at_time, 40.0);
        assert_eq!(friend_balance(&db, friend.id).await?, 40.0);
        assert_eq!(ledger_sum(&db, friend.id).await?, 40.0);

        Ok(())
    }

    #[tokio::test]
    async fn test_edit_can_flip_type() -> Result<()> {
        let (db, friend) = setup_with_friend().await?;

        let only = append(&db, TEST_USER, friend.id, 30.0, TransactionType::Credit, "").await?;
        let edited = edit(&db, TEST_USER, only.id, 30.0, TransactionType::Debit, "").await?;

        assert_eq!(edited.transaction_type, TransactionType::Debit);
        assert_eq!(edited.balance_at_time, -30.0);
        assert_eq!(friend_balance(&db, friend.id).await?, -30.0);

        Ok(())
    }

    #[tokio::test]
    async fn test_edit_unknown_or_foreign_transaction() -> Result<()> {
        let (db, friend) = setup_with_friend().await?;
        let entry = append(&db, TEST_USER, friend.id, 30.0, TransactionType::Credit, "").await?;

        let missing = edit(&db, TEST_USER, 999, 5.0, TransactionType::Credit, "").await;
        assert!(matches!(missing, Err(Error::TransactionNotFound { id: 999 })));

        let foreign = edit(&db, OTHER_USER, entry.id, 5.0, TransactionType::Credit, "").await;
        assert!(matches!(foreign, Err(Error::TransactionNotFound { .. })));
        assert_eq!(reload(&db, entry.id).await?.amount, 30.0);

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_rewalks_later_entries() -> Result<()> {
        let (db, friend) = setup_with_friend().await?;

        let first = append(&db, TEST_USER, friend.id, 100.0, TransactionType::Credit, "").await?;
        let second = append(&db, TEST_USER, friend.id, 40.0, TransactionType::Debit, "").await?;
        let third = append(&db, TEST_USER, friend.id, 5.0, TransactionType::Credit, "").await?;

        let balance = delete(&db, TEST_USER, first.id).await?;
        assert_eq!(balance, -35.0);
        assert_eq!(friend_balance(&db, friend.id).await?, -35.0);

        // Surviving snapshots reflect history without the deleted entry
        assert_eq!(reload(&db, second.id).await?.balance_at_time, -40.0);
        assert_eq!(reload(&db, third.id).await?.balance_at_time, -35.0);

        // The deleted row is retained with its last snapshot
        let deleted = reload(&db, first.id).await?;
        assert_eq!(deleted.status, TransactionStatus::Deleted);
        assert_eq!(deleted.balance_at_time, 100.0);

        Ok(())
    }

    #[tokio::test]
    async fn test_deleted_transaction_cannot_be_touched_again() -> Result<()> {
        let (db, friend) = setup_with_friend().await?;
        let entry = append(&db, TEST_USER, friend.id, 20.0, TransactionType::Credit, "").await?;

        delete(&db, TEST_USER, entry.id).await?;

        let again = delete(&db, TEST_USER, entry.id).await;
        assert!(matches!(again, Err(Error::TransactionDeleted { .. })));

        let edited = edit(&db, TEST_USER, entry.id, 5.0, TransactionType::Credit, "").await;
        assert!(matches!(edited, Err(Error::TransactionDeleted { .. })));

        assert_eq!(friend_balance(&db, friend.id).await?, 0.0);
        Ok(())
    }

    #[tokio::test]
    async fn test_append_after_delete_continues_from_balance() -> Result<()> {
        let (db, friend) = setup_with_friend().await?;

        let first = append(&db, TEST_USER, friend.id, 100.0, TransactionType::Credit, "").await?;
        append(&db, TEST_USER, friend.id, 30.0, TransactionType::Credit, "").await?;
        delete(&db, TEST_USER, first.id).await?;

        let next = append(&db, TEST_USER, friend.id, 10.0, TransactionType::Debit, "").await?;
        assert_eq!(next.balance_at_time, 20.0);
        assert_eq!(friend_balance(&db, friend.id).await?, 20.0);

        Ok(())
    }

    #[tokio::test]
    async fn test_rewalk_follows_created_at_not_insertion_order() -> Result<()> {
        let (db, friend) = setup_with_friend().await?;

        let recent = append(&db, TEST_USER, friend.id, 10.0, TransactionType::Credit, "").await?;
        // Backdated entry inserted after the recent one
        let older = insert_raw_transaction(
            &db,
            &friend,
            50.0,
            TransactionType::Debit,
            recent.created_at - Duration::hours(1),
        )
        .await?;

        let balance = recompute_friend(&db, friend.id).await?;
        assert_eq!(balance, -40.0);
        assert_eq!(reload(&db, older.id).await?.balance_at_time, -50.0);
        assert_eq!(reload(&db, recent.id).await?.balance_at_time, -40.0);

        Ok(())
    }

    #[tokio::test]
    async fn test_recompute_repairs_drifted_cache() -> Result<()> {
        let (db, friend) = setup_with_friend().await?;
        append(&db, TEST_USER, friend.id, 70.0, TransactionType::Credit, "").await?;

        Friend::update_many()
            .col_expr(friend::Column::Balance, Expr::value(12345.0))
            .filter(friend::Column::Id.eq(friend.id))
            .exec(&db)
            .await?;

        assert_eq!(recompute_friend(&db, friend.id).await?, 70.0);
        assert_eq!(friend_balance(&db, friend.id).await?, 70.0);

        Ok(())
    }

    #[tokio::test]
    async fn test_clear_chat_resets_to_zero() -> Result<()> {
        let (db, friend) = setup_with_friend().await?;
        append(&db, TEST_USER, friend.id, 100.0, TransactionType::Credit, "").await?;
        let entry = append(&db, TEST_USER, friend.id, 25.0, TransactionType::Debit, "").await?;
        delete(&db, TEST_USER, entry.id).await?;

        let removed = clear_chat(&db, TEST_USER, friend.id).await?;
        assert_eq!(removed, 2);
        assert_eq!(friend_balance(&db, friend.id).await?, 0.0);

        let remaining = FriendTransaction::find()
            .filter(friend_transaction::Column::FriendId.eq(friend.id))
            .all(&db)
            .await?;
        assert!(remaining.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_clear_chat_leaves_other_friends_alone() -> Result<()> {
        let (db, friend) = setup_with_friend().await?;
        let other = create_test_friend(&db, TEST_USER, "Ravi", "222").await?;
        append(&db, TEST_USER, friend.id, 10.0, TransactionType::Credit, "").await?;
        append(&db, TEST_USER, other.id, 15.0, TransactionType::Credit, "").await?;

        clear_chat(&db, TEST_USER, friend.id).await?;

        assert_eq!(friend_balance(&db, other.id).await?, 15.0);
        assert_eq!(history(&db, TEST_USER, other.id).await?.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_history_hides_deleted_newest_first() -> Result<()> {
        let (db, friend) = setup_with_friend().await?;
        let first = append(&db, TEST_USER, friend.id, 1.0, TransactionType::Credit, "a").await?;
        let second = append(&db, TEST_USER, friend.id, 2.0, TransactionType::Credit, "b").await?;
        let third = append(&db, TEST_USER, friend.id, 3.0, TransactionType::Credit, "c").await?;
        delete(&db, TEST_USER, second.id).await?;

        let entries = history(&db, TEST_USER, friend.id).await?;
        let ids: Vec<i64> = entries.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![third.id, first.id]);

        let foreign = history(&db, OTHER_USER, friend.id).await;
        assert!(matches!(foreign, Err(Error::FriendNotFound { .. })));

        Ok(())
    }

    #[tokio::test]
    async fn test_balance_invariant_over_mixed_operations() -> Result<()> {
        let (db, friend) = setup_with_friend().await?;

        let a = append(&db, TEST_USER, friend.id, 12.5, TransactionType::Credit, "").await?;
        let b = append(&db, TEST_USER, friend.id, 7.25, TransactionType::Debit, "").await?;
        append(&db, TEST_USER, friend.id, 30.0, TransactionType::Credit, "").await?;
        edit(&db, TEST_USER, b.id, 17.25, TransactionType::Debit, "").await?;
        delete(&db, TEST_USER, a.id).await?;
        append(&db, TEST_USER, friend.id, 4.0, TransactionType::Debit, "").await?;

        let expected = ledger_sum(&db, friend.id).await?;
        assert_eq!(friend_balance(&db, friend.id).await?, expected);
        assert_eq!(expected, 8.75);

        // Newest surviving snapshot equals the cached balance
        let newest = history(&db, TEST_USER, friend.id).await?;
        assert_eq!(newest[0].balance_at_time, expected);

        Ok(())
    }
}
