//! Expense Discord commands - `expense_manage` and its subcommands.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{Context, handlers::autocomplete, parse_date, reply_or_propagate, today},
        core::{expense, report},
        errors::{Error, Result},
    };
    use poise::serenity_prelude as serenity;

    const DEFAULT_LIST_LIMIT: usize = 15;

    /// Parent command for personal expenses.
    #[poise::command(
        slash_command,
        rename = "expense",
        subcommands("expense_add", "expense_list", "expense_edit", "expense_delete")
    )]
    pub async fn expense_manage(ctx: Context<'_>) -> Result<()> {
        let help_text = "Expense command. Available subcommands:\n\
            `/expense add` - Record an expense\n\
            `/expense list` - Show recent expenses\n\
            `/expense edit` - Correct an expense\n\
            `/expense delete` - Remove an expense";

        ctx.say(help_text).await?;
        Ok(())
    }

    /// Records a personal expense.
    #[poise::command(slash_command, rename = "add")]
    pub async fn expense_add(
        ctx: Context<'_>,
        #[description = "What the money was spent on"] title: String,
        #[description = "Amount spent"] amount: f64,
        #[description = "Category (defaults to Other)"]
        #[autocomplete = "autocomplete::autocomplete_category"]
        category: Option<String>,
        #[description = "Date as YYYY-MM-DD (defaults to today)"] date: Option<String>,
    ) -> Result<()> {
        let user_id = ctx.author().id.to_string();
        let currency = &ctx.data().config.currency_symbol;

        let date = match parse_date(date.as_deref(), today()) {
            Ok(date) => date,
            Err(e) => return reply_or_propagate(ctx, e).await,
        };
        let category = category.as_deref().unwrap_or(expense::DEFAULT_CATEGORY);

        match expense::create_expense(&ctx.data().database, &user_id, &title, amount, category, date)
            .await
        {
            Ok(created) => {
                ctx.say(format!(
                    "✅ `#{}` {} - {} ({}, {})",
                    created.id,
                    created.title,
                    report::format_amount(currency, created.amount),
                    created.category,
                    created.date
                ))
                .await?;
                Ok(())
            }
            Err(e) => reply_or_propagate(ctx, e).await,
        }
    }

    /// Shows your most recent expenses.
    #[poise::command(slash_command, rename = "list")]
    pub async fn expense_list(
        ctx: Context<'_>,
        #[description = "How many expenses to show (default 15)"] limit: Option<u32>,
    ) -> Result<()> {
        let user_id = ctx.author().id.to_string();
        let currency = &ctx.data().config.currency_symbol;

        let expenses = expense::list_expenses(&ctx.data().database, &user_id).await?;
        if expenses.is_empty() {
            ctx.say("No expenses yet. Use `/expense add` to record one!")
                .await?;
            return Ok(());
        }

        let limit = limit
            .and_then(|l| usize::try_from(l).ok())
            .filter(|l| *l > 0)
            .unwrap_or(DEFAULT_LIST_LIMIT);

        let lines: Vec<String> = expenses
            .iter()
            .take(limit)
            .map(|e| {
                format!(
                    "`#{}` {} **{}** {} _({})_",
                    e.id,
                    e.date,
                    e.title,
                    report::format_amount(currency, e.amount),
                    e.category
                )
            })
            .collect();

        let list_embed = serenity::CreateEmbed::default()
            .title("🧾 Expenses")
            .description(lines.join("\n"))
            .color(0x0058_65F2)
            .footer(serenity::CreateEmbedFooter::new(format!(
                "Showing {} of {}",
                lines.len(),
                expenses.len()
            )));

        ctx.send(poise::CreateReply::default().embed(list_embed))
            .await?;
        Ok(())
    }

    /// Corrects an expense. Fields left out keep their current value.
    #[poise::command(slash_command, rename = "edit")]
    pub async fn expense_edit(
        ctx: Context<'_>,
        #[description = "Expense id (shown as #id in the list)"] id: i64,
        #[description = "New title"] title: Option<String>,
        #[description = "New amount"] amount: Option<f64>,
        #[description = "New category"]
        #[autocomplete = "autocomplete::autocomplete_category"]
        category: Option<String>,
        #[description = "New date as YYYY-MM-DD"] date: Option<String>,
    ) -> Result<()> {
        let user_id = ctx.author().id.to_string();
        let currency = &ctx.data().config.currency_symbol;
        let db = &ctx.data().database;

        let Some(existing) = expense::get_expense(db, &user_id, id).await? else {
            return reply_or_propagate(ctx, Error::ExpenseNotFound { id }).await;
        };

        let date = match parse_date(date.as_deref(), existing.date) {
            Ok(date) => date,
            Err(e) => return reply_or_propagate(ctx, e).await,
        };
        let title = title.unwrap_or(existing.title);
        let amount = amount.unwrap_or(existing.amount);
        let category = category.unwrap_or(existing.category);

        match expense::update_expense(db, &user_id, id, &title, amount, &category, date).await {
            Ok(updated) => {
                ctx.say(format!(
                    "✏️ Updated `#{}`: {} - {} ({}, {})",
                    updated.id,
                    updated.title,
                    report::format_amount(currency, updated.amount),
                    updated.category,
                    updated.date
                ))
                .await?;
                Ok(())
            }
            Err(e) => reply_or_propagate(ctx, e).await,
        }
    }

    /// Removes an expense.
    #[poise::command(slash_command, rename = "delete")]
    pub async fn expense_delete(
        ctx: Context<'_>,
        #[description = "Expense id (shown as #id in the list)"] id: i64,
    ) -> Result<()> {
        let user_id = ctx.author().id.to_string();

        match expense::delete_expense(&ctx.data().database, &user_id, id).await {
            Ok(()) => {
                ctx.say(format!("🗑️ Deleted expense `#{id}`.")).await?;
                Ok(())
            }
            Err(e) => reply_or_propagate(ctx, e).await,
        }
    }
}

// Re-export all commands
pub use inner::*;
