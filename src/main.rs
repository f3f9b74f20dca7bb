use dotenvy::dotenv;
use savings_buddy::{
    bot::{self, BotData},
    config::{database, settings},
    errors::{Error, Result},
    notify::NotificationSink,
    scheduler::InterestScheduler,
};
use std::{env, sync::Arc, time::Duration};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file, non-fatal since variables can be set externally
    dotenv().ok();
    info!("Attempted to load .env file.");

    // 3. Non-secret settings
    let settings = settings::load_default_settings()
        .inspect_err(|e| error!("Failed to load settings: {}", e))?;
    info!("Loaded settings: {:?}", settings);

    // 4. Database
    let db = database::create_connection()
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    database::create_tables(&db)
        .await
        .inspect(|()| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to create tables: {}", e))?;

    // 5. Secrets are read directly before use and never stored in settings
    let token = env::var("DISCORD_BOT_TOKEN")
        .inspect_err(|e| error!("DISCORD_BOT_TOKEN not found: {}", e))
        .map_err(Error::EnvVar)?;

    let notifier = Arc::new(NotificationSink::from_settings(
        &token,
        settings.notifications.channel_id,
    ));

    // 6. Background interest run
    let _scheduler = if settings.scheduler.enabled {
        Some(InterestScheduler::new(
            db.clone(),
            Arc::clone(&notifier),
            Duration::from_secs(settings.scheduler.check_interval_secs),
        )
        .start())
    } else {
        info!("Interest scheduler disabled; use /run_interest on the 25th");
        None
    };

    // 7. Run the bot
    bot::run_bot(&token, BotData::new(db, notifier)).await
}
