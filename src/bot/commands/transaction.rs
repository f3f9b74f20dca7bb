//! Transaction Discord commands - `deposit` and `withdraw`.
//!
//! Validation and the balance check happen in the core, so a rejected request
//! reaches the caller through the framework's error handler.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::BotData,
        core::transaction::{self, TransactionKind},
        errors::{Error, Result},
    };

    async fn apply(
        ctx: poise::Context<'_, BotData, Error>,
        kind: TransactionKind,
        account_id: i64,
        amount: f64,
        note: Option<String>,
    ) -> Result<()> {
        let data = ctx.data();
        let note = note.unwrap_or_else(|| format!("Discord {kind} by {}", ctx.author().name));

        let entry = transaction::apply_transaction(
            &data.database,
            data.notifier.as_ref(),
            account_id,
            kind,
            amount,
            &note,
            chrono::Utc::now(),
        )
        .await?;

        ctx.say(format!(
            "✅ {} ${:.2} on account {} - balance ${:.2} (Transaction ID: {})",
            match kind {
                TransactionKind::Withdraw => "Withdrew",
                _ => "Deposited",
            },
            amount,
            account_id,
            entry.balance_after,
            entry.id
        ))
        .await?;
        Ok(())
    }

    /// Adds funds to an account.
    #[poise::command(slash_command, prefix_command)]
    pub async fn deposit(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Account ID"] account_id: i64,
        #[description = "Amount to deposit"] amount: f64,
        #[description = "Optional note"] note: Option<String>,
    ) -> Result<()> {
        apply(ctx, TransactionKind::Deposit, account_id, amount, note).await
    }

    /// Withdraws funds from an account if the balance covers the amount.
    #[poise::command(slash_command, prefix_command)]
    pub async fn withdraw(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Account ID"] account_id: i64,
        #[description = "Amount to withdraw"] amount: f64,
        #[description = "Optional note"] note: Option<String>,
    ) -> Result<()> {
        apply(ctx, TransactionKind::Withdraw, account_id, amount, note).await
    }
}

pub use inner::*;
