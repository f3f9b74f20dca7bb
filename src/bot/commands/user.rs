//! User Discord commands - register, list and remove account owners.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::BotData,
        core::user,
        errors::{Error, Result},
    };
    use poise::serenity_prelude as serenity;
    use std::fmt::Write;

    /// Registers a new account owner.
    #[poise::command(slash_command, prefix_command)]
    pub async fn new_user(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Full name"] name: String,
        #[description = "Email address"] email: String,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let created = user::create_user(db, &name, &email, chrono::Utc::now()).await?;

        ctx.say(format!(
            "✅ Registered user **{}** (ID: {})",
            created.name, created.id
        ))
        .await?;
        Ok(())
    }

    /// Lists all account owners.
    #[poise::command(slash_command, prefix_command)]
    pub async fn users(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let db = &ctx.data().database;
        let all = user::list_users(db).await?;

        if all.is_empty() {
            ctx.say("No users yet. Register one with `/new_user`.")
                .await?;
            return Ok(());
        }

        let mut description = String::new();
        for u in &all {
            let _ = writeln!(description, "**{}** - {} <{}>", u.id, u.name, u.email);
        }

        let embed = serenity::CreateEmbed::default()
            .title("👥 Users")
            .description(description)
            .color(0x0058_65F2);
        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }

    /// Removes an account owner who has no accounts left.
    #[poise::command(slash_command, prefix_command)]
    pub async fn delete_user(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "User ID"] user_id: i64,
    ) -> Result<()> {
        let db = &ctx.data().database;
        user::delete_user(db, user_id).await?;

        ctx.say(format!("🗑️ Deleted user {user_id}")).await?;
        Ok(())
    }
}

pub use inner::*;
