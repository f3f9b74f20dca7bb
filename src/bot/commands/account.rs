//! Account Discord commands - opening, inspecting and deleting accounts.
//!
//! Opening an account goes through the accrual engine, so a past opening date
//! immediately produces the interest history the account would have earned.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, handlers::autocomplete},
        core::{
            account::{self, NewAccount, PayoutCycle},
            accrual, transaction, user,
        },
        errors::{Error, Result},
    };
    use poise::serenity_prelude as serenity;
    use std::fmt::Write;

    const RECENT_TRANSACTIONS: usize = 10;

    /// Opens a savings account, back-filling interest for past opening dates.
    #[poise::command(slash_command, prefix_command)]
    pub async fn open_account(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Owner's user ID"] user_id: i64,
        #[description = "Opening balance"] opening_balance: f64,
        #[description = "Annual interest rate in percent"] interest_rate: f64,
        #[description = "Payout cycle"]
        #[autocomplete = "autocomplete::autocomplete_payout_cycle"]
        payout_cycle: String,
        #[description = "Opening date (YYYY-MM-DD), defaults to today"]
        opened_on: Option<String>,
    ) -> Result<()> {
        let data = ctx.data();
        let now = chrono::Utc::now();

        let new_account = NewAccount {
            user_id,
            opening_balance,
            interest_rate,
            payout_cycle: payout_cycle.parse::<PayoutCycle>()?,
            opened_on: accrual::parse_opening_date(opened_on.as_deref(), now.date_naive())?,
        };

        let opened = accrual::open_account(
            &data.database,
            data.notifier.as_ref(),
            &new_account,
            now,
        )
        .await?;

        let interest: f64 = opened.interest_postings.iter().map(|t| t.amount).sum();
        let embed = serenity::CreateEmbed::default()
            .title(format!("🏦 Opened account {}", opened.account.id))
            .color(0x002E_CC71)
            .field("Owner", user_id.to_string(), true)
            .field("Opened", new_account.opened_on.to_string(), true)
            .field(
                "Terms",
                format!("{}% {}", opened.account.interest_rate, opened.account.payout_cycle),
                true,
            )
            .field(
                "Back-filled interest",
                format!(
                    "{} posting(s), ${:.2}",
                    opened.interest_postings.len(),
                    interest
                ),
                false,
            )
            .field("Balance", format!("**${:.2}**", opened.account.balance), false);

        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }

    /// Lists accounts, optionally only those of one user.
    #[poise::command(slash_command, prefix_command)]
    pub async fn accounts(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Only accounts of this user"] user_id: Option<i64>,
    ) -> Result<()> {
        let db = &ctx.data().database;

        let list = match user_id {
            Some(id) => {
                user::get_user(db, id).await?;
                account::accounts_for_user(db, id).await?
            }
            None => account::list_accounts(db).await?,
        };

        if list.is_empty() {
            ctx.say("No accounts found. Open one with `/open_account`.")
                .await?;
            return Ok(());
        }

        let mut description = String::new();
        for acc in &list {
            let _ = writeln!(
                description,
                "**{}** - user {} | ${:.2} | {}% {} | since {}",
                acc.id,
                acc.user_id,
                acc.balance,
                acc.interest_rate,
                acc.payout_cycle,
                acc.opened_on
            );
        }

        let embed = serenity::CreateEmbed::default()
            .title("🏦 Accounts")
            .description(description)
            .color(0x0034_98DB);
        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }

    /// Shows an account with its most recent transactions.
    #[poise::command(slash_command, prefix_command)]
    pub async fn account(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Account ID"] account_id: i64,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let acc = account::get_account(db, account_id).await?;
        let history = transaction::get_transactions_for_account(db, account_id).await?;

        let mut recent = String::new();
        for entry in history.iter().rev().take(RECENT_TRANSACTIONS) {
            let _ = writeln!(
                recent,
                "`{}` {} ${:.2} → ${:.2} {}",
                entry.timestamp.format("%Y-%m-%d"),
                entry.transaction_type,
                entry.amount,
                entry.balance_after,
                entry.note
            );
        }
        if recent.is_empty() {
            recent.push_str("No transactions");
        }

        let embed = serenity::CreateEmbed::default()
            .title(format!("🏦 Account {}", acc.id))
            .color(0x0034_98DB)
            .field("Owner", acc.user_id.to_string(), true)
            .field("Balance", format!("**${:.2}**", acc.balance), true)
            .field(
                "Terms",
                format!("{}% {}", acc.interest_rate, acc.payout_cycle),
                true,
            )
            .field("Recent transactions", recent, false)
            .footer(serenity::CreateEmbedFooter::new(format!(
                "Opened {} | {} transaction(s)",
                acc.opened_on,
                history.len()
            )));

        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }

    /// Deletes an account together with its transaction history.
    #[poise::command(slash_command, prefix_command)]
    pub async fn delete_account(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Account ID"] account_id: i64,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let removed = account::delete_account(db, account_id).await?;

        ctx.say(format!(
            "🗑️ Deleted account {account_id} and {removed} transaction(s)"
        ))
        .await?;
        Ok(())
    }
}

pub use inner::*;
