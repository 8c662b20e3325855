//! Dashboard and statistics Discord commands - `dashboard` and `stats`.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{Context, today},
        core::{report, stats},
        errors::Result,
    };
    use poise::serenity_prelude as serenity;
    use std::fmt::Write;

    /// Shows today's, this month's and all-time spending with friend balances.
    #[poise::command(slash_command, prefix_command)]
    pub async fn dashboard(ctx: Context<'_>) -> Result<()> {
        let user_id = ctx.author().id.to_string();
        let currency = &ctx.data().config.currency_symbol;
        let now = today();

        let snapshot = stats::dashboard(&ctx.data().database, &user_id, now).await?;

        let dashboard_embed = serenity::CreateEmbed::default()
            .title("📊 Dashboard")
            .description(format!("As of {}", now.format("%Y-%m-%d")))
            .color(0x0034_98DB)
            .field(
                "Today",
                report::format_amount(currency, snapshot.today_expenses),
                true,
            )
            .field(
                "This month",
                report::format_amount(currency, snapshot.monthly_expenses),
                true,
            )
            .field(
                "All time",
                report::format_amount(currency, snapshot.total_expenses),
                true,
            )
            .field(
                "To give",
                report::format_amount(currency, snapshot.friends.total_to_give),
                true,
            )
            .field(
                "To take",
                report::format_amount(currency, snapshot.friends.total_to_take),
                true,
            )
            .footer(serenity::CreateEmbedFooter::new(format!(
                "{} expense{} recorded",
                snapshot.expense_count,
                if snapshot.expense_count == 1 { "" } else { "s" }
            )));

        ctx.send(poise::CreateReply::default().embed(dashboard_embed))
            .await?;
        Ok(())
    }

    /// Shows spending per month and per category, including money paid for friends.
    #[poise::command(slash_command, prefix_command)]
    pub async fn stats(ctx: Context<'_>) -> Result<()> {
        let user_id = ctx.author().id.to_string();
        let config = &ctx.data().config;
        let currency = &config.currency_symbol;
        let months = config.statistics_months;

        let summary =
            stats::statistics(&ctx.data().database, &user_id, today(), months).await?;

        if summary.categories.is_empty() {
            ctx.say(format!(
                "Nothing spent in the last {months} month{}.",
                if months == 1 { "" } else { "s" }
            ))
            .await?;
            return Ok(());
        }

        let mut monthly = String::new();
        for total in &summary.monthly {
            writeln!(
                &mut monthly,
                "**{}:** {}",
                total.label(),
                report::format_amount(currency, total.amount)
            )?;
        }

        let mut categories = String::new();
        for total in &summary.categories {
            writeln!(
                &mut categories,
                "**{}:** {}",
                total.category,
                report::format_amount(currency, total.amount)
            )?;
        }

        let stats_embed = serenity::CreateEmbed::default()
            .title(format!("📈 Statistics (last {months} months)"))
            .color(0x0034_98DB)
            .field("By month", monthly, true)
            .field("By category", categories, true)
            .field(
                "This month",
                report::format_amount(currency, summary.total_this_month),
                true,
            )
            .field(
                "Daily average",
                report::format_amount(currency, summary.average_daily),
                true,
            )
            .field("Top category", summary.top_category.clone(), true);

        ctx.send(poise::CreateReply::default().embed(stats_embed))
            .await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
