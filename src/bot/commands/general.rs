//! General Discord commands - ping and help.
//! These commands don't touch the database and give users basic orientation.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{bot::Context, errors::Result};

    /// Responds with "Pong!" to test bot connectivity.
    #[poise::command(slash_command, prefix_command)]
    pub async fn ping(ctx: Context<'_>) -> Result<()> {
        ctx.say("Pong!").await?;
        Ok(())
    }

    /// Displays help information about available commands.
    #[poise::command(slash_command, prefix_command)]
    pub async fn help(ctx: Context<'_>) -> Result<()> {
        let help_text = "**Split Buddy Help**\n\
        Friends are addressed by their unique number.\n\n\
        **Friend Ledger**\n\
        • `/lend <friend> <amount> [note]` - You paid for a friend (credit).\n\
        • `/borrow <friend> <amount> [note]` - A friend paid for you (debit).\n\
        • `/history <friend> [limit]` - Shows the ledger with running balances.\n\
        • `/edit_txn <id> <amount> <kind> [note]` - Corrects a ledger entry.\n\
        • `/delete_txn <id>` - Removes a ledger entry.\n\
        • `/clear_chat <friend> <confirm>` - Wipes a ledger and resets it to zero.\n\
        • `/balances` - Totals you owe and are owed.\n\n\
        **Friends**\n\
        • `/friend add|list|rename` - Manage friends.\n\
        • `/friend delete` then `/friend confirm_delete` - Delete a friend and its ledger.\n\n\
        **Expenses & Budgets**\n\
        • `/expense add|list|edit|delete` - Personal expenses.\n\
        • `/budget set|list|delete` - Category budgets with progress.\n\
        • `/dashboard` - Today, this month and all-time totals.\n\
        • `/stats` - Monthly and category breakdown.\n\n\
        **Utility**\n\
        • `/ping` - Checks if the bot is responsive.\n\
        • `/help` - Shows this help message.";

        ctx.say(help_text).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
