//! Shared test utilities for `SavingsBuddy`.
//!
//! This module provides common helper functions for setting up test databases,
//! creating test entities with sensible defaults, and observing notifications.

use crate::{
    core::{
        account::{NewAccount, PayoutCycle, create_account},
        user,
    },
    entities,
    errors::{Error, Result},
    notify::Notifier,
};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use sea_orm::DatabaseConnection;
use std::sync::Mutex;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Fixed clock reading used by tests that do not care about the date.
///
/// 2024-05-10 12:00 UTC, which is not a payout day.
pub fn test_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 10, 12, 0, 0)
        .single()
        .unwrap_or_default()
}

/// Creates a test user with a derived email address.
pub async fn create_test_user(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::user::Model> {
    let email = format!("{}@example.com", name.to_lowercase());
    user::create_user(db, name, &email, test_now()).await
}

/// Account parameters with sensible defaults.
///
/// # Defaults
/// * `opening_balance`: 1000.0
/// * `interest_rate`: 12.0 (1% per month)
/// * `payout_cycle`: monthly
/// * `opened_on`: the date of [`test_now`]
pub fn sample_new_account(user_id: i64) -> NewAccount {
    NewAccount {
        user_id,
        opening_balance: 1000.0,
        interest_rate: 12.0,
        payout_cycle: PayoutCycle::Monthly,
        opened_on: NaiveDate::from_ymd_opt(2024, 5, 10).unwrap_or_default(),
    }
}

/// Sets up a test environment with one user.
/// Returns (db, user) for common test scenarios.
pub async fn setup_with_user() -> Result<(DatabaseConnection, entities::user::Model)> {
    let db = setup_test_db().await?;
    let user = create_test_user(&db, "Test User").await?;
    Ok((db, user))
}

/// Sets up a test environment with a user and one monthly account holding
/// `balance`. No transactions are recorded for the account.
pub async fn setup_with_account(
    balance: f64,
) -> Result<(DatabaseConnection, entities::account::Model)> {
    let (db, user) = setup_with_user().await?;
    let mut new_account = sample_new_account(user.id);
    new_account.opening_balance = balance;
    let account = create_account(&db, &new_account, test_now()).await?;
    Ok((db, account))
}

/// Notifier that keeps every message for later inspection.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    /// Messages delivered so far, oldest first.
    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

impl Notifier for RecordingNotifier {
    async fn notify(&self, message: &str) -> Result<()> {
        if let Ok(mut guard) = self.messages.lock() {
            guard.push(message.to_string());
        }
        Ok(())
    }
}

/// Notifier whose delivery always fails.
#[derive(Debug, Clone, Copy)]
pub struct FailingNotifier;

impl Notifier for FailingNotifier {
    async fn notify(&self, _message: &str) -> Result<()> {
        Err(Error::Config {
            message: "notification channel unavailable".to_string(),
        })
    }
}
