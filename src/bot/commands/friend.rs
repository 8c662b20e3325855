//! Friend Discord commands - `friend_manage` and its subcommands.
//!
//! Friends are addressed by their number. Deleting a friend is a two-step flow:
//! `/friend delete` opens a confirmation challenge and `/friend confirm_delete`
//! answers it.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{Context, PendingDelete, handlers::autocomplete, lookup_friend, reply_or_propagate},
        core::{friend, guard::DeleteGuard, report, summary},
        errors::{Error, Result},
    };
    use poise::serenity_prelude as serenity;
    use tracing::info;

    /// Parent command for managing friends.
    #[poise::command(
        slash_command,
        rename = "friend",
        subcommands(
            "friend_add",
            "friend_list",
            "friend_rename",
            "friend_delete",
            "friend_confirm_delete"
        )
    )]
    pub async fn friend_manage(ctx: Context<'_>) -> Result<()> {
        let help_text = "Friend management command. Available subcommands:\n\
            `/friend add` - Add a friend\n\
            `/friend list` - List friends with their balances\n\
            `/friend rename` - Change a friend's name\n\
            `/friend delete` - Start deleting a friend and its ledger\n\
            `/friend confirm_delete` - Confirm a pending delete";

        ctx.say(help_text).await?;
        Ok(())
    }

    /// Adds a friend with a zero balance.
    #[poise::command(slash_command, rename = "add")]
    pub async fn friend_add(
        ctx: Context<'_>,
        #[description = "Friend's name"] name: String,
        #[description = "Unique number for this friend (e.g. a phone number)"] number: String,
    ) -> Result<()> {
        let user_id = ctx.author().id.to_string();

        match friend::create_friend(&ctx.data().database, &user_id, &name, &number).await {
            Ok(created) => {
                ctx.say(format!(
                    "✅ Added friend **{}** (number `{}`).",
                    created.friend_name, created.friend_number
                ))
                .await?;
                Ok(())
            }
            Err(e) => reply_or_propagate(ctx, e).await,
        }
    }

    /// Lists your friends with their current balances.
    #[poise::command(slash_command, rename = "list")]
    pub async fn friend_list(ctx: Context<'_>) -> Result<()> {
        let user_id = ctx.author().id.to_string();
        let currency = &ctx.data().config.currency_symbol;

        let friends = friend::list_friends(&ctx.data().database, &user_id).await?;
        if friends.is_empty() {
            ctx.say("You have no friends yet. Use `/friend add` to add one!")
                .await?;
            return Ok(());
        }

        let totals = summary::summarize_friends(&friends);

        let embed_fields: Vec<(String, String, bool)> = friends
            .iter()
            .map(|f| {
                (
                    format!("{} (`{}`)", f.friend_name, f.friend_number),
                    report::format_balance(currency, f.balance),
                    true,
                )
            })
            .collect();

        let list_embed = serenity::CreateEmbed::default()
            .title("👥 Friends")
            .color(0x0058_65F2)
            .fields(embed_fields)
            .footer(serenity::CreateEmbedFooter::new(format!(
                "To give: {} | To take: {}",
                report::format_amount(currency, totals.total_to_give),
                report::format_amount(currency, totals.total_to_take),
            )));

        ctx.send(poise::CreateReply::default().embed(list_embed))
            .await?;
        Ok(())
    }

    /// Changes a friend's name. The number stays the same.
    #[poise::command(slash_command, rename = "rename")]
    pub async fn friend_rename(
        ctx: Context<'_>,
        #[description = "Friend to rename"]
        #[autocomplete = "autocomplete::autocomplete_friend"]
        friend_number: String,
        #[description = "New name"] new_name: String,
    ) -> Result<()> {
        let user_id = ctx.author().id.to_string();
        let Some(existing) = lookup_friend(ctx, &friend_number).await? else {
            return Ok(());
        };

        match friend::rename_friend(&ctx.data().database, &user_id, existing.id, &new_name).await {
            Ok(renamed) => {
                ctx.say(format!(
                    "✅ Renamed **{}** to **{}**.",
                    existing.friend_name, renamed.friend_name
                ))
                .await?;
                Ok(())
            }
            Err(e) => reply_or_propagate(ctx, e).await,
        }
    }

    /// Starts deleting a friend. Nothing is removed until the delete is confirmed.
    #[poise::command(slash_command, rename = "delete")]
    pub async fn friend_delete(
        ctx: Context<'_>,
        #[description = "Friend to delete"]
        #[autocomplete = "autocomplete::autocomplete_friend"]
        friend_number: String,
    ) -> Result<()> {
        let user_id = ctx.author().id.to_string();
        let Some(target) = lookup_friend(ctx, &friend_number).await? else {
            return Ok(());
        };

        let guard = DeleteGuard::new();
        let prompt = guard.prompt();
        let message = format!(
            "⚠️ This deletes **{}** and every entry in their ledger. It cannot be undone.\n\
            To confirm, run `/friend confirm_delete` with the friend number `{}` and the answer to **{prompt}**",
            target.friend_name, target.friend_number
        );

        ctx.data().pending_deletes.lock().await.insert(
            user_id,
            PendingDelete {
                friend: target,
                guard,
            },
        );

        ctx.say(message).await?;
        Ok(())
    }

    /// Confirms a pending friend delete.
    #[poise::command(slash_command, rename = "confirm_delete")]
    pub async fn friend_confirm_delete(
        ctx: Context<'_>,
        #[description = "Number of the friend being deleted"] friend_number: String,
        #[description = "Answer to the arithmetic challenge"] answer: String,
    ) -> Result<()> {
        let user_id = ctx.author().id.to_string();

        // The entry leaves the shared map so no lock is held across the delete
        let Some(mut entry) = ctx.data().take_pending_delete(&user_id).await else {
            ctx.say("❌ No delete is waiting for confirmation. Start one with `/friend delete`.")
                .await?;
            return Ok(());
        };

        let result = friend::delete_friend_guarded(
            &ctx.data().database,
            &user_id,
            &mut entry.guard,
            &entry.friend,
            &friend_number,
            &answer,
        )
        .await;

        match result {
            Ok(removed) => {
                info!(%user_id, removed, "Friend delete confirmed");
                ctx.say(format!(
                    "🗑️ Deleted **{}** and {removed} ledger entr{}.",
                    entry.friend.friend_name,
                    if removed == 1 { "y" } else { "ies" }
                ))
                .await?;
                Ok(())
            }
            Err(Error::CaptchaMismatch) => {
                let prompt = entry.guard.prompt();
                ctx.data().restore_pending_delete(user_id, entry).await;
                ctx.say(format!("❌ Wrong answer. Try again: **{prompt}**"))
                    .await?;
                Ok(())
            }
            Err(Error::FriendNotFound { id }) => {
                reply_or_propagate(ctx, Error::FriendNotFound { id }).await
            }
            Err(e) => {
                ctx.data().restore_pending_delete(user_id, entry).await;
                reply_or_propagate(ctx, e).await
            }
        }
    }
}

// Re-export all commands
pub use inner::*;
