//! Background worker that triggers the live monthly interest run.
//!
//! The worker wakes on a fixed interval and calls
//! [`run_monthly_interest`](crate::core::accrual::run_monthly_interest). The run
//! itself is a no-op outside the 25th and refuses to pay twice on the same
//! day, so the interval only bounds how late on the 25th interest is credited.

use crate::{
    core::accrual::{InterestRunOutcome, format_interest_run_summary, run_monthly_interest},
    notify::Notifier,
};
use chrono::{DateTime, Utc};
use sea_orm::DatabaseConnection;
use std::{sync::Arc, time::Duration};
use tokio::{sync::Notify, task::JoinHandle};
use tracing::{debug, error, info};

/// Periodic trigger for the live interest run.
pub struct InterestScheduler<N> {
    database: DatabaseConnection,
    notifier: Arc<N>,
    period: Duration,
    clock: fn() -> DateTime<Utc>,
    shutdown: Arc<Notify>,
}

impl<N> InterestScheduler<N>
where
    N: Notifier + 'static,
{
    /// Creates a scheduler that checks for a payout day every `period`.
    #[must_use]
    pub fn new(database: DatabaseConnection, notifier: Arc<N>, period: Duration) -> Self {
        Self {
            database,
            notifier,
            period,
            clock: Utc::now,
            shutdown: Arc::new(Notify::new()),
        }
    }

    /// Replaces the wall clock, mainly for tests.
    #[must_use]
    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    /// Handle that stops the worker when notified.
    #[must_use]
    pub fn shutdown_handle(&self) -> Arc<Notify> {
        Arc::clone(&self.shutdown)
    }

    /// Performs one check. Errors are logged, never propagated.
    pub async fn tick(&self) {
        let now = (self.clock)();
        match run_monthly_interest(&self.database, self.notifier.as_ref(), now).await {
            Ok(InterestRunOutcome::NotPayoutDay) => {
                debug!("Scheduler: {} is not a payout day", now.date_naive());
            }
            Ok(outcome) => info!("Scheduler: {}", format_interest_run_summary(&outcome)),
            Err(e) => error!("Scheduled interest run failed: {}", e),
        }
    }

    /// Spawns the worker onto the tokio runtime.
    ///
    /// The first check happens immediately. Ticks missed while a run is in
    /// progress are skipped rather than replayed.
    pub fn start(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            info!(
                "Interest scheduler started (checking every {}s)",
                self.period.as_secs()
            );

            let mut interval = tokio::time::interval(self.period);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            let shutdown = self.shutdown_handle();

            loop {
                tokio::select! {
                    () = shutdown.notified() => {
                        info!("Interest scheduler received shutdown signal");
                        break;
                    }
                    _ = interval.tick() => self.tick().await,
                }
            }

            info!("Interest scheduler stopped");
        })
    }
}
