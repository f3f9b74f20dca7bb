//! Account business logic - Ledger Store operations on savings accounts.
//!
//! Accounts are created here without any history; opening an account with its
//! initial deposit and back-filled interest goes through
//! [`super::accrual::open_account`]. Deleting an account explicitly deletes its
//! transactions first, inside one database transaction.

use crate::{
    entities::{Account, Transaction, User, account, transaction},
    errors::{Error, Result},
};
use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use std::{fmt, str::FromStr};
use tracing::{info, instrument};

/// Cadence at which interest is credited.
///
/// Only [`PayoutCycle::Monthly`] accrues; the other cycles are stored but
/// produce no interest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayoutCycle {
    /// Interest on the 25th of every month
    Monthly,
    /// Stored only
    Quarterly,
    /// Stored only
    Annually,
}

impl PayoutCycle {
    /// Database representation
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Monthly => "monthly",
            Self::Quarterly => "quarterly",
            Self::Annually => "annually",
        }
    }

    /// Whether the accrual engine credits interest for this cycle.
    #[must_use]
    pub const fn accrues(self) -> bool {
        matches!(self, Self::Monthly)
    }
}

impl FromStr for PayoutCycle {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "monthly" => Ok(Self::Monthly),
            "quarterly" => Ok(Self::Quarterly),
            "annually" => Ok(Self::Annually),
            _ => Err(Error::InvalidCycle {
                cycle: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for PayoutCycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Highest accepted annual interest rate, in percent.
pub const MAX_INTEREST_RATE: f64 = 100.0;

/// Parameters for a new account.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAccount {
    /// Owning user
    pub user_id: i64,
    /// Balance the account starts with
    pub opening_balance: f64,
    /// Annual interest rate in percent
    pub interest_rate: f64,
    /// Payout cycle
    pub payout_cycle: PayoutCycle,
    /// Date the account was opened
    pub opened_on: NaiveDate,
}

impl NewAccount {
    /// Rejects non-finite or negative balances, and rates outside
    /// `0..=MAX_INTEREST_RATE`.
    pub fn validate(&self) -> Result<()> {
        if !self.opening_balance.is_finite() || self.opening_balance < 0.0 {
            return Err(Error::InvalidAmount {
                amount: self.opening_balance,
            });
        }
        if !(0.0..=MAX_INTEREST_RATE).contains(&self.interest_rate) {
            return Err(Error::InvalidRate {
                rate: self.interest_rate,
            });
        }
        Ok(())
    }
}

/// Inserts an account row for an existing user.
///
/// The balance is stored as given; no transactions are written. Fails with
/// `NotFound` if the user does not exist.
#[instrument(skip(db))]
pub async fn create_account<C>(
    db: &C,
    new_account: &NewAccount,
    created_at: DateTime<Utc>,
) -> Result<account::Model>
where
    C: ConnectionTrait,
{
    new_account.validate()?;

    User::find_by_id(new_account.user_id)
        .one(db)
        .await?
        .ok_or(Error::NotFound {
            entity: "User",
            id: new_account.user_id,
        })?;

    let model = account::ActiveModel {
        user_id: Set(new_account.user_id),
        balance: Set(new_account.opening_balance),
        interest_rate: Set(new_account.interest_rate),
        payout_cycle: Set(new_account.payout_cycle.as_str().to_string()),
        opened_on: Set(new_account.opened_on),
        created_at: Set(created_at),
        ..Default::default()
    };

    let account = model.insert(db).await?;
    info!(
        "Created account {} for user {} ({}, {}%)",
        account.id, account.user_id, account.payout_cycle, account.interest_rate
    );
    Ok(account)
}

/// Retrieves an account by ID, failing with `NotFound` if absent.
pub async fn get_account<C>(db: &C, account_id: i64) -> Result<account::Model>
where
    C: ConnectionTrait,
{
    Account::find_by_id(account_id)
        .one(db)
        .await?
        .ok_or(Error::NotFound {
            entity: "Account",
            id: account_id,
        })
}

/// Retrieves all accounts ordered by ID.
pub async fn list_accounts<C>(db: &C) -> Result<Vec<account::Model>>
where
    C: ConnectionTrait,
{
    Account::find()
        .order_by_asc(account::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves the accounts owned by one user, ordered by ID.
pub async fn accounts_for_user<C>(db: &C, user_id: i64) -> Result<Vec<account::Model>>
where
    C: ConnectionTrait,
{
    Account::find()
        .filter(account::Column::UserId.eq(user_id))
        .order_by_asc(account::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Deletes an account together with all of its transactions.
///
/// Both deletes run in one database transaction. Returns the number of
/// transactions removed.
#[instrument(skip(db))]
pub async fn delete_account(db: &DatabaseConnection, account_id: i64) -> Result<u64> {
    let txn = db.begin().await?;

    let account = get_account(&txn, account_id).await?;

    let removed = Transaction::delete_many()
        .filter(transaction::Column::AccountId.eq(account_id))
        .exec(&txn)
        .await?
        .rows_affected;

    account.delete(&txn).await?;
    txn.commit().await?;

    info!(
        "Deleted account {} and {} transaction(s)",
        account_id, removed
    );
    Ok(removed)
}
