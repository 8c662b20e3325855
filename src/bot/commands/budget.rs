//! Budget Discord commands - `budget_manage` and its subcommands.
//!
//! Budget progress uses the same 10-cell bar as the rest of the bot and a
//! traffic-light marker for the spending band.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{Context, handlers::autocomplete, reply_or_propagate, today},
        core::{budget, report},
        entities::BudgetPeriod,
        errors::Result,
    };
    use poise::serenity_prelude as serenity;
    use std::fmt::Write;

    /// How often a budget resets.
    #[derive(Debug, Clone, Copy, poise::ChoiceParameter)]
    pub enum PeriodChoice {
        Monthly,
        Weekly,
    }

    impl From<PeriodChoice> for BudgetPeriod {
        fn from(choice: PeriodChoice) -> Self {
            match choice {
                PeriodChoice::Monthly => Self::Monthly,
                PeriodChoice::Weekly => Self::Weekly,
            }
        }
    }

    /// Parent command for category budgets.
    #[poise::command(
        slash_command,
        rename = "budget",
        subcommands("budget_set", "budget_list", "budget_delete")
    )]
    pub async fn budget_manage(ctx: Context<'_>) -> Result<()> {
        let help_text = "Budget command. Available subcommands:\n\
            `/budget set` - Set a spending limit for a category\n\
            `/budget list` - Show progress against every budget\n\
            `/budget delete` - Remove a budget";

        ctx.say(help_text).await?;
        Ok(())
    }

    /// Sets a spending limit for a category.
    #[poise::command(slash_command, rename = "set")]
    pub async fn budget_set(
        ctx: Context<'_>,
        #[description = "Category to limit"]
        #[autocomplete = "autocomplete::autocomplete_category"]
        category: String,
        #[description = "Spending limit per period"] amount: f64,
        #[description = "Period (defaults to monthly)"] period: Option<PeriodChoice>,
    ) -> Result<()> {
        let user_id = ctx.author().id.to_string();
        let currency = &ctx.data().config.currency_symbol;
        let period = period.map_or(BudgetPeriod::Monthly, BudgetPeriod::from);

        match budget::create_budget(&ctx.data().database, &user_id, &category, amount, period).await
        {
            Ok(created) => {
                ctx.say(format!(
                    "✅ `#{}` {} budget for **{}**: {}",
                    created.id,
                    created.period,
                    created.category,
                    report::format_amount(currency, created.amount)
                ))
                .await?;
                Ok(())
            }
            Err(e) => reply_or_propagate(ctx, e).await,
        }
    }

    /// Shows progress against every budget for the current period.
    #[poise::command(slash_command, rename = "list")]
    pub async fn budget_list(ctx: Context<'_>) -> Result<()> {
        let user_id = ctx.author().id.to_string();
        let currency = &ctx.data().config.currency_symbol;

        let progress = budget::budget_progress(&ctx.data().database, &user_id, today()).await?;
        if progress.is_empty() {
            ctx.say("No budgets yet. Use `/budget set` to create one!")
                .await?;
            return Ok(());
        }

        let mut embed_fields = Vec::new();
        for item in &progress {
            let field_name = format!(
                "{} `#{}` {} ({})",
                item.status.emoji(),
                item.budget.id,
                item.budget.category,
                item.budget.period
            );

            let mut field_value = String::new();
            writeln!(
                &mut field_value,
                "**Spent:** {} of {}",
                report::format_amount(currency, item.spent),
                report::format_amount(currency, item.budget.amount)
            )?;
            writeln!(
                &mut field_value,
                "{}",
                report::format_progress_bar(item.percentage, None)
            )?;
            let remaining_label = if item.remaining >= 0.0 { "Left" } else { "Over by" };
            write!(
                &mut field_value,
                "**{remaining_label}:** {}",
                report::format_amount(currency, item.remaining)
            )?;

            embed_fields.push((field_name, field_value, false));
        }

        let list_embed = serenity::CreateEmbed::default()
            .title("🎯 Budgets")
            .color(0x0034_98DB)
            .fields(embed_fields);

        ctx.send(poise::CreateReply::default().embed(list_embed))
            .await?;
        Ok(())
    }

    /// Removes a budget.
    #[poise::command(slash_command, rename = "delete")]
    pub async fn budget_delete(
        ctx: Context<'_>,
        #[description = "Budget id (shown as #id in the list)"] id: i64,
    ) -> Result<()> {
        let user_id = ctx.author().id.to_string();

        match budget::delete_budget(&ctx.data().database, &user_id, id).await {
            Ok(()) => {
                ctx.say(format!("🗑️ Deleted budget `#{id}`.")).await?;
                Ok(())
            }
            Err(e) => reply_or_propagate(ctx, e).await,
        }
    }
}

// Re-export all commands
pub use inner::*;
