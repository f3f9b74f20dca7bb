//! General Discord commands - ping, help, and other utility commands.
//! This module contains simple commands that don't require database operations.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::BotData,
        errors::{Error, Result},
    };

    /// Responds with "Pong!" to test bot connectivity.
    #[poise::command(slash_command, prefix_command)]
    pub async fn ping(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        ctx.say("Pong!").await?;
        Ok(())
    }

    /// Displays help information about available commands.
    #[poise::command(slash_command, prefix_command)]
    pub async fn help(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "**SavingsBuddy Help**\n\
        Here is a summary of all available commands.\n\n\
        **Users**\n\
        • `/new_user <name> <email>` - Registers an account owner.\n\
        • `/users` - Lists all account owners.\n\
        • `/delete_user <user_id>` - Removes an owner without accounts.\n\n\
        **Accounts**\n\
        • `/open_account <user_id> <balance> <rate> <cycle> [opened_on]` - Opens an account. \
        A past `YYYY-MM-DD` date back-fills the monthly interest it would have earned.\n\
        • `/accounts [user_id]` - Lists accounts.\n\
        • `/account <account_id>` - Shows an account and its recent history.\n\
        • `/delete_account <account_id>` - Deletes an account and its history.\n\n\
        **Money**\n\
        • `/deposit <account_id> <amount> [note]` - Adds funds.\n\
        • `/withdraw <account_id> <amount> [note]` - Withdraws funds if the balance allows.\n\
        • `/run_interest` - Pays monthly interest now (only on the 25th).\n\n\
        **Utility**\n\
        • `/ping` - Checks if the bot is responsive.\n\
        • `/help` - Shows this help message.\n\n\
        Interest is paid on the 25th at the annual rate divided by twelve, rounded down.";

        ctx.say(help_text).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
