//! Interest Discord command - manual trigger for the live monthly run.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::BotData,
        core::accrual,
        errors::{Error, Result},
    };

    /// Pays this month's interest to all monthly accounts (on the 25th only).
    ///
    /// Safe to repeat: a day that has already been paid is reported and left alone.
    #[poise::command(slash_command, prefix_command)]
    pub async fn run_interest(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let data = ctx.data();
        let outcome =
            accrual::run_monthly_interest(&data.database, data.notifier.as_ref(), chrono::Utc::now())
                .await?;

        ctx.say(format!(
            "```\n{}\n```",
            accrual::format_interest_run_summary(&outcome)
        ))
        .await?;
        Ok(())
    }
}

pub use inner::*;
