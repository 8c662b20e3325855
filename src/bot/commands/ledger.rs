//! Friend ledger Discord commands - `lend`, `borrow`, `history`, `edit_txn`,
//! `delete_txn`, `clear_chat` and `balances`.
//!
//! Balances shown here always come back from `core::ledger`; these handlers only
//! pick the friend and format the result.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{Context, handlers::autocomplete, lookup_friend, reply_or_propagate},
        core::{friend, ledger, report, summary},
        entities::TransactionType,
        errors::Result,
    };
    use poise::serenity_prelude as serenity;
    use std::fmt::Write;

    const DEFAULT_HISTORY_LIMIT: usize = 10;

    /// Which way the money went.
    #[derive(Debug, Clone, Copy, poise::ChoiceParameter)]
    pub enum EntryKind {
        #[name = "I paid for them"]
        Lend,
        #[name = "They paid for me"]
        Borrow,
    }

    impl From<EntryKind> for TransactionType {
        fn from(kind: EntryKind) -> Self {
            match kind {
                EntryKind::Lend => Self::Credit,
                EntryKind::Borrow => Self::Debit,
            }
        }
    }

    async fn record(
        ctx: Context<'_>,
        friend_number: &str,
        amount: f64,
        note: Option<String>,
        transaction_type: TransactionType,
    ) -> Result<()> {
        let user_id = ctx.author().id.to_string();
        let currency = &ctx.data().config.currency_symbol;

        let Some(target) = lookup_friend(ctx, friend_number).await? else {
            return Ok(());
        };

        let note = note.unwrap_or_default();
        let result = ledger::append(
            &ctx.data().database,
            &user_id,
            target.id,
            amount,
            transaction_type,
            &note,
        )
        .await;

        match result {
            Ok(entry) => {
                let action = match transaction_type {
                    TransactionType::Credit => "You paid",
                    TransactionType::Debit => "They paid",
                };
                ctx.say(format!(
                    "✅ `#{}` {action} {} with **{}**. Balance: {}",
                    entry.id,
                    report::format_amount(currency, entry.amount),
                    target.friend_name,
                    report::format_balance(currency, entry.balance_at_time),
                ))
                .await?;
                Ok(())
            }
            Err(e) => reply_or_propagate(ctx, e).await,
        }
    }

    /// Records money you paid on a friend's behalf.
    #[poise::command(slash_command, prefix_command)]
    pub async fn lend(
        ctx: Context<'_>,
        #[description = "Friend you paid for"]
        #[autocomplete = "autocomplete::autocomplete_friend"]
        friend_number: String,
        #[description = "Amount paid"] amount: f64,
        #[description = "Optional note"] note: Option<String>,
    ) -> Result<()> {
        record(ctx, &friend_number, amount, note, TransactionType::Credit).await
    }

    /// Records money a friend paid on your behalf.
    #[poise::command(slash_command, prefix_command)]
    pub async fn borrow(
        ctx: Context<'_>,
        #[description = "Friend who paid for you"]
        #[autocomplete = "autocomplete::autocomplete_friend"]
        friend_number: String,
        #[description = "Amount paid"] amount: f64,
        #[description = "Optional note"] note: Option<String>,
    ) -> Result<()> {
        record(ctx, &friend_number, amount, note, TransactionType::Debit).await
    }

    /// Shows a friend's ledger, newest first, with the running balance after each entry.
    #[poise::command(slash_command, prefix_command)]
    pub async fn history(
        ctx: Context<'_>,
        #[description = "Friend whose ledger to show"]
        #[autocomplete = "autocomplete::autocomplete_friend"]
        friend_number: String,
        #[description = "How many entries to show (default 10)"] limit: Option<u32>,
    ) -> Result<()> {
        let user_id = ctx.author().id.to_string();
        let currency = &ctx.data().config.currency_symbol;

        let Some(target) = lookup_friend(ctx, &friend_number).await? else {
            return Ok(());
        };

        let entries = ledger::history(&ctx.data().database, &user_id, target.id).await?;
        if entries.is_empty() {
            ctx.say(format!(
                "No entries with **{}** yet. Use `/lend` or `/borrow` to add one.",
                target.friend_name
            ))
            .await?;
            return Ok(());
        }

        let limit = limit
            .and_then(|l| usize::try_from(l).ok())
            .filter(|l| *l > 0)
            .unwrap_or(DEFAULT_HISTORY_LIMIT);

        let lines: Vec<String> = entries
            .iter()
            .take(limit)
            .map(|e| report::format_ledger_entry(currency, e))
            .collect();

        let history_embed = serenity::CreateEmbed::default()
            .title(format!("📒 Ledger with {}", target.friend_name))
            .description(lines.join("\n"))
            .color(0x0034_98DB)
            .footer(serenity::CreateEmbedFooter::new(format!(
                "Balance: {} | showing {} of {}",
                report::format_balance(currency, target.balance),
                lines.len(),
                entries.len()
            )));

        ctx.send(poise::CreateReply::default().embed(history_embed))
            .await?;
        Ok(())
    }

    /// Corrects an existing ledger entry and recalculates the friend's balance.
    #[poise::command(slash_command, prefix_command)]
    pub async fn edit_txn(
        ctx: Context<'_>,
        #[description = "Entry id (shown as #id in /history)"] id: i64,
        #[description = "Corrected amount"] amount: f64,
        #[description = "Who paid"] kind: EntryKind,
        #[description = "Optional note"] note: Option<String>,
    ) -> Result<()> {
        let user_id = ctx.author().id.to_string();
        let currency = &ctx.data().config.currency_symbol;
        let db = &ctx.data().database;

        let note = note.unwrap_or_default();
        let edited = match ledger::edit(db, &user_id, id, amount, kind.into(), &note).await {
            Ok(edited) => edited,
            Err(e) => return reply_or_propagate(ctx, e).await,
        };

        let mut message = format!("✏️ Updated `#{}`.", edited.id);
        if let Some(owner) = friend::get_friend(db, &user_id, edited.friend_id).await? {
            write!(
                &mut message,
                " Balance with **{}**: {}",
                owner.friend_name,
                report::format_balance(currency, owner.balance)
            )?;
        }

        ctx.say(message).await?;
        Ok(())
    }

    /// Removes a ledger entry and recalculates the friend's balance.
    #[poise::command(slash_command, prefix_command)]
    pub async fn delete_txn(
        ctx: Context<'_>,
        #[description = "Entry id (shown as #id in /history)"] id: i64,
    ) -> Result<()> {
        let user_id = ctx.author().id.to_string();
        let currency = &ctx.data().config.currency_symbol;

        match ledger::delete(&ctx.data().database, &user_id, id).await {
            Ok(balance) => {
                ctx.say(format!(
                    "🗑️ Deleted `#{id}`. Balance: {}",
                    report::format_balance(currency, balance)
                ))
                .await?;
                Ok(())
            }
            Err(e) => reply_or_propagate(ctx, e).await,
        }
    }

    /// Wipes a friend's whole ledger and resets the balance to zero.
    #[poise::command(slash_command, prefix_command)]
    pub async fn clear_chat(
        ctx: Context<'_>,
        #[description = "Friend whose ledger to wipe"]
        #[autocomplete = "autocomplete::autocomplete_friend"]
        friend_number: String,
        #[description = "Set to true to confirm. This cannot be undone."] confirm: bool,
    ) -> Result<()> {
        let user_id = ctx.author().id.to_string();

        let Some(target) = lookup_friend(ctx, &friend_number).await? else {
            return Ok(());
        };

        if !confirm {
            ctx.say(format!(
                "⚠️ This removes every entry with **{}**. Run again with `confirm: True` to proceed.",
                target.friend_name
            ))
            .await?;
            return Ok(());
        }

        match ledger::clear_chat(&ctx.data().database, &user_id, target.id).await {
            Ok(removed) => {
                ctx.say(format!(
                    "🧹 Cleared {removed} entr{} with **{}**. Balance is back to zero.",
                    if removed == 1 { "y" } else { "ies" },
                    target.friend_name
                ))
                .await?;
                Ok(())
            }
            Err(e) => reply_or_propagate(ctx, e).await,
        }
    }

    /// Shows how much you owe and are owed across all friends.
    #[poise::command(slash_command, prefix_command)]
    pub async fn balances(ctx: Context<'_>) -> Result<()> {
        let user_id = ctx.author().id.to_string();
        let currency = &ctx.data().config.currency_symbol;

        let totals = summary::summary_for_user(&ctx.data().database, &user_id).await?;

        let balances_embed = serenity::CreateEmbed::default()
            .title("⚖️ Balances")
            .color(0x0034_98DB)
            .field(
                "To give",
                report::format_amount(currency, totals.total_to_give),
                true,
            )
            .field(
                "To take",
                report::format_amount(currency, totals.total_to_take),
                true,
            )
            .field("Net", report::format_balance(currency, totals.net()), false);

        ctx.send(poise::CreateReply::default().embed(balances_embed))
            .await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
