//! Outbound notifications for balance-affecting events.
//!
//! The core never depends on how a message is delivered. It calls
//! [`notify_best_effort`] after a database transaction has committed, and a
//! delivery failure is logged and dropped so it can never turn a completed
//! financial operation into a reported failure.

use crate::errors::Result;
use poise::serenity_prelude as serenity;
use std::future::Future;
use std::sync::Arc;
use tracing::{info, warn};

/// A destination for human-readable notification messages.
pub trait Notifier: Send + Sync {
    /// Delivers one message.
    fn notify(&self, message: &str) -> impl Future<Output = Result<()>> + Send;
}

/// Posts notifications into a Discord channel through the REST API.
#[derive(Clone)]
pub struct DiscordNotifier {
    http: Arc<serenity::Http>,
    channel_id: serenity::ChannelId,
}

impl DiscordNotifier {
    /// Builds a notifier from the bot token and target channel.
    #[must_use]
    pub fn new(token: &str, channel_id: u64) -> Self {
        Self {
            http: Arc::new(serenity::Http::new(token)),
            channel_id: serenity::ChannelId::new(channel_id),
        }
    }
}

impl std::fmt::Debug for DiscordNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscordNotifier")
            .field("channel_id", &self.channel_id)
            .finish_non_exhaustive()
    }
}

impl Notifier for DiscordNotifier {
    async fn notify(&self, message: &str) -> Result<()> {
        self.channel_id.say(self.http.as_ref(), message).await?;
        Ok(())
    }
}

/// The notification destination chosen at startup.
#[derive(Debug, Clone)]
pub enum NotificationSink {
    /// Deliver to a Discord channel
    Discord(DiscordNotifier),
    /// Only write the message to the log
    LogOnly,
}

impl NotificationSink {
    /// Picks Discord delivery when a channel is configured, log-only otherwise.
    #[must_use]
    pub fn from_settings(token: &str, channel_id: Option<u64>) -> Self {
        match channel_id {
            Some(id) => Self::Discord(DiscordNotifier::new(token, id)),
            None => Self::LogOnly,
        }
    }
}

impl Notifier for NotificationSink {
    async fn notify(&self, message: &str) -> Result<()> {
        match self {
            Self::Discord(discord) => discord.notify(message).await,
            Self::LogOnly => {
                info!(notification = message, "Notification (log only)");
                Ok(())
            }
        }
    }
}

/// Sends a notification and swallows any failure after logging it.
pub async fn notify_best_effort<N: Notifier>(notifier: &N, message: &str) {
    if let Err(e) = notifier.notify(message).await {
        warn!("Failed to deliver notification: {e}");
    }
}
