//! Friend business logic - Creating, finding, renaming and deleting friends.
//!
//! Every lookup is scoped by the caller's user id, so a user can never read or
//! mutate another user's ledger. Deleting a friend cascades to all of its
//! transactions; the guarded variant additionally requires the friend-number and
//! arithmetic confirmation from `core::guard` before the store is touched.

use crate::{
    core::guard::DeleteGuard,
    entities::{Friend, FriendTransaction, friend, friend_transaction},
    errors::{Error, Result},
};
use chrono::Utc;
use sea_orm::{QueryOrder, Set, SqlErr, TransactionTrait, prelude::*};
use tracing::info;

/// Loads a friend owned by `user_id`, failing with `FriendNotFound` otherwise.
pub(crate) async fn get_owned_friend<C>(db: &C, user_id: &str, friend_id: i64) -> Result<friend::Model>
where
    C: ConnectionTrait,
{
    Friend::find_by_id(friend_id)
        .filter(friend::Column::UserId.eq(user_id))
        .one(db)
        .await?
        .ok_or(Error::FriendNotFound { id: friend_id })
}

/// Adds a new friend with a zero balance.
///
/// The name and number are trimmed. The number identifies the friend in the
/// delete confirmation and must be unique among the caller's friends.
pub async fn create_friend(
    db: &DatabaseConnection,
    user_id: &str,
    friend_name: &str,
    friend_number: &str,
) -> Result<friend::Model> {
    let friend_name = friend_name.trim();
    let friend_number = friend_number.trim();

    if friend_name.is_empty() {
        return Err(Error::InvalidInput {
            message: "Friend name cannot be empty".to_string(),
        });
    }
    if friend_number.is_empty() {
        return Err(Error::InvalidInput {
            message: "Friend number cannot be empty".to_string(),
        });
    }

    if get_friend_by_number(db, user_id, friend_number)
        .await?
        .is_some()
    {
        return Err(Error::DuplicateFriendNumber {
            number: friend_number.to_string(),
        });
    }

    let friend = friend::ActiveModel {
        user_id: Set(user_id.to_string()),
        friend_name: Set(friend_name.to_string()),
        friend_number: Set(friend_number.to_string()),
        balance: Set(0.0),
        created_at: Set(Utc::now()),
        ..Default::default()
    };

    // The unique index catches a concurrent add that slipped past the lookup
    let created = friend.insert(db).await.map_err(|e| match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => Error::DuplicateFriendNumber {
            number: friend_number.to_string(),
        },
        _ => Error::from(e),
    })?;
    info!(user_id, friend_id = created.id, "Friend added");
    Ok(created)
}

/// Lists the caller's friends, most recently added first.
pub async fn list_friends(db: &DatabaseConnection, user_id: &str) -> Result<Vec<friend::Model>> {
    Friend::find()
        .filter(friend::Column::UserId.eq(user_id))
        .order_by_desc(friend::Column::CreatedAt)
        .order_by_desc(friend::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds one of the caller's friends by id, returning None if it does not exist.
pub async fn get_friend(
    db: &DatabaseConnection,
    user_id: &str,
    friend_id: i64,
) -> Result<Option<friend::Model>> {
    Friend::find_by_id(friend_id)
        .filter(friend::Column::UserId.eq(user_id))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds one of the caller's friends by its unique number.
pub async fn get_friend_by_number(
    db: &DatabaseConnection,
    user_id: &str,
    friend_number: &str,
) -> Result<Option<friend::Model>> {
    Friend::find()
        .filter(friend::Column::UserId.eq(user_id))
        .filter(friend::Column::FriendNumber.eq(friend_number.trim()))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Changes a friend's display name. The number cannot be changed.
pub async fn rename_friend(
    db: &DatabaseConnection,
    user_id: &str,
    friend_id: i64,
    new_name: &str,
) -> Result<friend::Model> {
    let new_name = new_name.trim();
    if new_name.is_empty() {
        return Err(Error::InvalidInput {
            message: "Friend name cannot be empty".to_string(),
        });
    }

    let existing = get_owned_friend(db, user_id, friend_id).await?;
    let mut active: friend::ActiveModel = existing.into();
    active.friend_name = Set(new_name.to_string());
    active.update(db).await.map_err(Into::into)
}

/// Deletes a friend and every transaction in its ledger.
///
/// Returns the number of transactions removed along with the friend.
pub async fn delete_friend(db: &DatabaseConnection, user_id: &str, friend_id: i64) -> Result<u64> {
    let txn = db.begin().await?;

    let friend = get_owned_friend(&txn, user_id, friend_id).await?;

    let removed = FriendTransaction::delete_many()
        .filter(friend_transaction::Column::FriendId.eq(friend.id))
        .exec(&txn)
        .await?
        .rows_affected;

    Friend::delete_by_id(friend.id).exec(&txn).await?;

    txn.commit().await?;
    info!(user_id, friend_id, removed, "Friend deleted with its ledger");
    Ok(removed)
}

/// Deletes a friend only after the confirmation guard accepts the user's input.
///
/// `friend` is the record the user is looking at. A wrong number or captcha answer
/// is rejected before any store call is issued; a wrong captcha also regenerates
/// the challenge held by `guard`.
pub async fn delete_friend_guarded(
    db: &DatabaseConnection,
    user_id: &str,
    guard: &mut DeleteGuard,
    friend: &friend::Model,
    number_input: &str,
    captcha_input: &str,
) -> Result<u64> {
    guard.verify(friend, number_input, captcha_input)?;
    delete_friend(db, user_id, friend.id).await
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::core::ledger;
    use crate::entities::TransactionType;
    use crate::test_utils::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn test_create_friend_validation() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();

        let result = create_friend(&db, TEST_USER, "   ", "100").await;
        assert!(matches!(result, Err(Error::InvalidInput { .. })));

        let result = create_friend(&db, TEST_USER, "Asha", "").await;
        assert!(matches!(result, Err(Error::InvalidInput { .. })));

        assert!(db.into_transaction_log().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_create_friend_starts_at_zero() -> Result<()> {
        let db = setup_test_db().await?;

        let friend = create_friend(&db, TEST_USER, "  Asha ", " 98765 ").await?;
        assert_eq!(friend.friend_name, "Asha");
        assert_eq!(friend.friend_number, "98765");
        assert_eq!(friend.balance, 0.0);
        assert_eq!(friend.user_id, TEST_USER);

        Ok(())
    }

    #[tokio::test]
    async fn test_friend_number_unique_per_user() -> Result<()> {
        let db = setup_test_db().await?;

        create_friend(&db, TEST_USER, "Asha", "111").await?;
        let duplicate = create_friend(&db, TEST_USER, "Someone Else", "111").await;
        assert!(matches!(
            duplicate,
            Err(Error::DuplicateFriendNumber { number }) if number == "111"
        ));

        // Another user may reuse the number
        let other = create_friend(&db, OTHER_USER, "Asha", "111").await?;
        assert_eq!(other.user_id, OTHER_USER);

        Ok(())
    }

    #[tokio::test]
    async fn test_concurrent_adds_keep_one_friend_per_number() -> Result<()> {
        let db = setup_test_db().await?;

        let (first, second) = tokio::join!(
            create_friend(&db, TEST_USER, "Asha", "555"),
            create_friend(&db, TEST_USER, "Ravi", "555"),
        );

        let outcomes = [first, second];
        assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
        assert!(outcomes.iter().any(|r| matches!(
            r,
            Err(Error::DuplicateFriendNumber { number }) if number == "555"
        )));
        assert_eq!(list_friends(&db, TEST_USER).await?.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_list_friends_scoped_and_newest_first() -> Result<()> {
        let db = setup_test_db().await?;

        let first = create_friend(&db, TEST_USER, "First", "1").await?;
        let second = create_friend(&db, TEST_USER, "Second", "2").await?;
        create_friend(&db, OTHER_USER, "Hidden", "3").await?;

        let friends = list_friends(&db, TEST_USER).await?;
        assert_eq!(friends.len(), 2);
        assert_eq!(friends[0].id, second.id);
        assert_eq!(friends[1].id, first.id);

        Ok(())
    }

    #[tokio::test]
    async fn test_get_friend_is_owner_scoped() -> Result<()> {
        let (db, friend) = setup_with_friend().await?;

        assert!(get_friend(&db, TEST_USER, friend.id).await?.is_some());
        assert!(get_friend(&db, OTHER_USER, friend.id).await?.is_none());
        assert!(
            get_friend_by_number(&db, TEST_USER, &friend.friend_number)
                .await?
                .is_some()
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_rename_friend_keeps_number() -> Result<()> {
        let (db, friend) = setup_with_friend().await?;

        let renamed = rename_friend(&db, TEST_USER, friend.id, "Asha K").await?;
        assert_eq!(renamed.friend_name, "Asha K");
        assert_eq!(renamed.friend_number, friend.friend_number);

        let missing = rename_friend(&db, OTHER_USER, friend.id, "Nope").await;
        assert!(matches!(missing, Err(Error::FriendNotFound { .. })));

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_friend_cascades_transactions() -> Result<()> {
        let (db, friend) = setup_with_friend().await?;
        ledger::append(&db, TEST_USER, friend.id, 100.0, TransactionType::Credit, "Dinner").await?;
        ledger::append(&db, TEST_USER, friend.id, 20.0, TransactionType::Debit, "Cab").await?;

        let removed = delete_friend(&db, TEST_USER, friend.id).await?;
        assert_eq!(removed, 2);

        assert!(get_friend(&db, TEST_USER, friend.id).await?.is_none());
        let left = FriendTransaction::find()
            .filter(friend_transaction::Column::FriendId.eq(friend.id))
            .all(&db)
            .await?;
        assert!(left.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_friend_of_other_user_not_found() -> Result<()> {
        let (db, friend) = setup_with_friend().await?;

        let result = delete_friend(&db, OTHER_USER, friend.id).await;
        assert!(matches!(result, Err(Error::FriendNotFound { .. })));
        assert!(get_friend(&db, TEST_USER, friend.id).await?.is_some());

        Ok(())
    }

    #[tokio::test]
    async fn test_guarded_delete_wrong_number_issues_no_store_call() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();
        let friend = sample_friend(7, "555");
        let mut guard = DeleteGuard::from_operands(3, 4);

        let result = delete_friend_guarded(&db, TEST_USER, &mut guard, &friend, "554", "7").await;
        assert!(matches!(result, Err(Error::FriendNumberMismatch)));
        assert_eq!(guard.answer(), 7);

        assert!(db.into_transaction_log().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_guarded_delete_wrong_captcha_issues_no_store_call() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();
        let friend = sample_friend(7, "555");
        let mut guard = DeleteGuard::from_operands(3, 4);

        let result = delete_friend_guarded(&db, TEST_USER, &mut guard, &friend, "555", "8").await;
        assert!(matches!(result, Err(Error::CaptchaMismatch)));

        assert!(db.into_transaction_log().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_guarded_delete_accepts_correct_input() -> Result<()> {
        let (db, friend) = setup_with_friend().await?;
        ledger::append(&db, TEST_USER, friend.id, 10.0, TransactionType::Credit, "Tea").await?;
        let mut guard = DeleteGuard::from_operands(9, 10);

        let removed = delete_friend_guarded(
            &db,
            TEST_USER,
            &mut guard,
            &friend,
            &friend.friend_number,
            "19",
        )
        .await?;
        assert_eq!(removed, 1);
        assert!(get_friend(&db, TEST_USER, friend.id).await?.is_none());

        Ok(())
    }
}
