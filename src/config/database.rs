//! Database configuration module for Split Buddy.
//!
//! This module handles `SQLite` database connection and table creation using `SeaORM`.
//! Tables are generated from the entity definitions with `Schema::create_table_from_entity`,
//! so the schema always matches the Rust structs without hand-written SQL. The connection
//! is the only record store the ledger talks to.

use crate::entities::{Budget, Expense, Friend, FriendTransaction, friend};
use crate::errors::Result;
use sea_orm::{
    ConnectionTrait, Database, DatabaseConnection, EntityTrait, Schema, sea_query::Index,
};
use tracing::debug;

/// Unique index keeping friend numbers distinct per user
pub const FRIEND_NUMBER_INDEX: &str = "idx_unique_friend_number_user";

/// Default `SQLite` location, created on first connect.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://data/split_buddy.sqlite?mode=rwc";

/// Gets the database URL from the `DATABASE_URL` environment variable or the default path.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// Establishes a connection to the database named by `DATABASE_URL`.
///
/// Falls back to a local `SQLite` file if no environment variable is set.
pub async fn create_connection() -> Result<DatabaseConnection> {
    let database_url = get_database_url();
    debug!("Connecting to {database_url}");
    Database::connect(&database_url).await.map_err(Into::into)
}

async fn create_table_for<E>(db: &DatabaseConnection, schema: &Schema, entity: E) -> Result<()>
where
    E: EntityTrait,
{
    let builder = db.get_database_backend();
    let mut statement = schema.create_table_from_entity(entity);
    statement.if_not_exists();
    db.execute(builder.build(&statement)).await?;
    Ok(())
}

/// Creates all tables and indexes that do not exist yet.
///
/// Friends are created before transactions so the cascading foreign key resolves.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    create_table_for(db, &schema, Friend).await?;
    create_table_for(db, &schema, FriendTransaction).await?;
    create_table_for(db, &schema, Expense).await?;
    create_table_for(db, &schema, Budget).await?;

    let friend_number_index = Index::create()
        .name(FRIEND_NUMBER_INDEX)
        .table(Friend)
        .col(friend::Column::UserId)
        .col(friend::Column::FriendNumber)
        .unique()
        .if_not_exists()
        .to_owned();
    db.execute(builder.build(&friend_number_index)).await?;

    Ok(())
}
