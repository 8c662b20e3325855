//! Bot layer - Discord-specific interface and command handlers
//!
//! This module provides the Discord interface for Split Buddy. Commands only call
//! into `core` and format what comes back; they never do balance arithmetic.

/// Discord command implementations (friends, ledger, expenses, budgets, dashboard, general)
pub mod commands;
/// Discord interaction handlers (autocomplete, etc.)
pub mod handlers;

use crate::{
    config::AppConfig,
    core::{friend, guard::DeleteGuard},
    entities::friend as friend_entity,
    errors::{Error, Result},
};
use chrono::NaiveDate;
use poise::serenity_prelude as serenity;
use sea_orm::DatabaseConnection;
use std::{collections::HashMap, sync::Arc};
use tokio::sync::Mutex;
use tracing::{error, info};

/// A friend delete waiting for its confirmation input.
#[derive(Debug, Clone)]
pub struct PendingDelete {
    /// The friend as shown when the delete was requested
    pub friend: friend_entity::Model,
    /// Challenge the user has to answer
    pub guard: DeleteGuard,
}

/// Shared data available to all bot commands.
/// This structure holds the database connection, settings, and the per-user
/// delete confirmations that are still open.
pub struct BotData {
    /// Database connection for all database operations
    pub database: DatabaseConnection,
    /// Settings from config.toml
    pub config: Arc<AppConfig>,
    /// Open friend-delete confirmations keyed by Discord user id
    pub pending_deletes: Mutex<HashMap<String, PendingDelete>>,
}

impl BotData {
    /// Creates a new `BotData` instance with the given database connection and settings.
    #[must_use]
    pub fn new(database: DatabaseConnection, config: Arc<AppConfig>) -> Self {
        Self {
            database,
            config,
            pending_deletes: Mutex::new(HashMap::new()),
        }
    }

    /// Removes and returns the user's open delete confirmation.
    pub async fn take_pending_delete(&self, user_id: &str) -> Option<PendingDelete> {
        self.pending_deletes.lock().await.remove(user_id)
    }

    /// Puts a confirmation back after a failed attempt.
    ///
    /// A delete the user started in the meantime takes precedence.
    pub async fn restore_pending_delete(&self, user_id: String, pending: PendingDelete) {
        self.pending_deletes
            .lock()
            .await
            .entry(user_id)
            .or_insert(pending);
    }
}

/// Poise context used by every command
pub type Context<'a> = poise::Context<'a, BotData, Error>;

/// Replies with validation and not-found errors and propagates everything else.
///
/// Store failures go on to `on_error`, which shows them verbatim.
pub async fn reply_or_propagate(ctx: Context<'_>, error: Error) -> Result<()> {
    if error.is_validation() || error.is_not_found() {
        ctx.say(format!("❌ {error}")).await?;
        Ok(())
    } else {
        Err(error)
    }
}

/// Looks up one of the author's friends by number, replying when there is none.
pub async fn lookup_friend(
    ctx: Context<'_>,
    friend_number: &str,
) -> Result<Option<friend_entity::Model>> {
    let user_id = ctx.author().id.to_string();
    let found = friend::get_friend_by_number(&ctx.data().database, &user_id, friend_number).await?;

    if found.is_none() {
        ctx.say(format!(
            "❌ No friend with number '{friend_number}'. Use `/friend list` to see your friends."
        ))
        .await?;
    }
    Ok(found)
}

/// Parses an optional `YYYY-MM-DD` date, defaulting to `today`.
pub fn parse_date(input: Option<&str>, today: NaiveDate) -> Result<NaiveDate> {
    match input.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(today),
        Some(text) => {
            NaiveDate::parse_from_str(text, "%Y-%m-%d").map_err(|e| Error::InvalidInput {
                message: format!("'{text}' is not a YYYY-MM-DD date: {e}"),
            })
        }
    }
}

/// Today's date in the bot's local timezone.
#[must_use]
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

async fn on_error(error: poise::FrameworkError<'_, BotData, Error>) {
    match error {
        poise::FrameworkError::Setup { error, .. } => {
            error!("Failed to start bot: {:?}", error);
        }
        poise::FrameworkError::Command { error, ctx, .. } => {
            error!("Error in command `{}`: {:?}", ctx.command().name, error);
            if let Err(e) = ctx.say(format!("An error occurred: {error}")).await {
                error!("Failed to send error message: {}", e);
            }
        }
        error => {
            if let Err(e) = poise::builtins::on_error(error).await {
                error!("Error while handling error: {}", e);
            }
        }
    }
}

/// Every command the bot registers.
#[must_use]
pub fn all_commands() -> Vec<poise::Command<BotData, Error>> {
    vec![
        commands::ping(),
        commands::help(),
        commands::friend_manage(),
        commands::lend(),
        commands::borrow(),
        commands::history(),
        commands::edit_txn(),
        commands::delete_txn(),
        commands::clear_chat(),
        commands::balances(),
        commands::expense_manage(),
        commands::budget_manage(),
        commands::dashboard(),
        commands::stats(),
    ]
}

/// Connects to Discord and serves commands until the client stops.
pub async fn run_bot(
    token: String,
    config: Arc<AppConfig>,
    database: DatabaseConnection,
) -> Result<()> {
    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: all_commands(),
            on_error: |error| Box::pin(on_error(error)),
            ..Default::default()
        })
        .setup(move |ctx, ready, framework| {
            Box::pin(async move {
                info!("Logged in as {}", ready.user.name);
                info!("Registering commands globally...");
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                Ok(BotData::new(database, config))
            })
        })
        .build();

    let intents = serenity::GatewayIntents::non_privileged();

    info!("Setting up Serenity client for Poise framework...");
    let mut client = serenity::ClientBuilder::new(token, intents)
        .framework(framework)
        .await?;

    info!("Starting bot client...");
    client.start().await?;
    Ok(())
}
