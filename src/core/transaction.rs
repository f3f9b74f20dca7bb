//! Transaction business logic - The append-only ledger of each account.
//!
//! [`append_transaction`] is the raw store operation and does not look at the
//! balance; callers are responsible for passing a correct `balance_after`.
//! [`apply_transaction`] is the user-facing deposit/withdraw path: it validates
//! the request, moves the balance atomically in the database, records the entry
//! and notifies after commit.

use crate::{
    core::account::get_account,
    entities::{Account, Transaction, account, transaction},
    errors::{Error, Result},
    notify::{Notifier, notify_best_effort},
};
use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*, sea_query::Expr};
use std::{fmt, str::FromStr};
use tracing::{debug, info, instrument};

/// Direction of a ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionKind {
    /// Money paid in by the user
    Deposit,
    /// Money taken out by the user
    Withdraw,
    /// Interest credited by the accrual engine
    Interest,
}

impl TransactionKind {
    /// Database representation
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Deposit => "deposit",
            Self::Withdraw => "withdraw",
            Self::Interest => "interest",
        }
    }

    /// Applies the direction to a stored (positive) amount.
    #[must_use]
    pub fn signed(self, amount: f64) -> f64 {
        match self {
            Self::Deposit | Self::Interest => amount,
            Self::Withdraw => -amount,
        }
    }
}

impl FromStr for TransactionKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "deposit" => Ok(Self::Deposit),
            "withdraw" => Ok(Self::Withdraw),
            "interest" => Ok(Self::Interest),
            _ => Err(Error::InvalidKind {
                kind: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Appends one entry to an account's ledger.
///
/// Does not touch the account balance and does not check that the account
/// exists beyond the foreign key.
pub async fn append_transaction<C>(
    db: &C,
    account_id: i64,
    kind: TransactionKind,
    amount: f64,
    note: &str,
    timestamp: DateTime<Utc>,
    balance_after: f64,
) -> Result<transaction::Model>
where
    C: ConnectionTrait,
{
    let model = transaction::ActiveModel {
        account_id: Set(account_id),
        timestamp: Set(timestamp),
        transaction_type: Set(kind.as_str().to_string()),
        amount: Set(amount),
        note: Set(note.to_string()),
        balance_after: Set(balance_after),
        ..Default::default()
    };
    let created = model.insert(db).await?;
    debug!(
        "Appended {} of {:.2} to account {} (balance after {:.2})",
        kind, amount, account_id, balance_after
    );
    Ok(created)
}

/// Retrieves all transactions of an account in the order they were applied.
pub async fn get_transactions_for_account<C>(
    db: &C,
    account_id: i64,
) -> Result<Vec<transaction::Model>>
where
    C: ConnectionTrait,
{
    Transaction::find()
        .filter(transaction::Column::AccountId.eq(account_id))
        .order_by_asc(transaction::Column::Timestamp)
        .order_by_asc(transaction::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Signed sum of every transaction of an account.
///
/// For a consistent ledger this equals the account's stored balance.
pub async fn ledger_balance<C>(db: &C, account_id: i64) -> Result<f64>
where
    C: ConnectionTrait,
{
    let mut total = 0.0;
    for entry in get_transactions_for_account(db, account_id).await? {
        let kind: TransactionKind = entry.transaction_type.parse()?;
        total += kind.signed(entry.amount);
    }
    Ok(total)
}

/// Whether an interest entry dated `date` already exists for the account.
pub async fn has_interest_on<C>(db: &C, account_id: i64, date: NaiveDate) -> Result<bool>
where
    C: ConnectionTrait,
{
    let start = date.and_time(chrono::NaiveTime::MIN).and_utc();
    let end = start + chrono::TimeDelta::days(1);

    let count = Transaction::find()
        .filter(transaction::Column::AccountId.eq(account_id))
        .filter(transaction::Column::TransactionType.eq(TransactionKind::Interest.as_str()))
        .filter(transaction::Column::Timestamp.gte(start))
        .filter(transaction::Column::Timestamp.lt(end))
        .count(db)
        .await?;
    Ok(count > 0)
}

/// Applies a user deposit or withdrawal and records it.
///
/// The balance change and the ledger entry commit together. A deposit adds to
/// the balance in a single `UPDATE`; a withdrawal is a conditional `UPDATE`
/// that only matches while the balance covers the amount, so concurrent
/// requests cannot push the account below zero. On success a notification is
/// sent after commit; its failure is logged and ignored.
///
/// # Errors
/// * `InvalidAmount` - amount is not finite or not positive
/// * `InvalidKind` - kind is `interest`
/// * `NotFound` - the account does not exist
/// * `InsufficientFunds` - a withdrawal exceeds the balance
#[instrument(skip(db, notifier, note))]
pub async fn apply_transaction<N: Notifier>(
    db: &DatabaseConnection,
    notifier: &N,
    account_id: i64,
    kind: TransactionKind,
    amount: f64,
    note: &str,
    now: DateTime<Utc>,
) -> Result<transaction::Model> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(Error::InvalidAmount { amount });
    }
    if kind == TransactionKind::Interest {
        return Err(Error::InvalidKind {
            kind: kind.to_string(),
        });
    }

    let txn = db.begin().await?;
    let before = get_account(&txn, account_id).await?;

    let update = Account::update_many().filter(account::Column::Id.eq(account_id));
    let update = match kind {
        TransactionKind::Withdraw => update
            .col_expr(
                account::Column::Balance,
                Expr::col(account::Column::Balance).sub(amount),
            )
            .filter(account::Column::Balance.gte(amount)),
        _ => update.col_expr(
            account::Column::Balance,
            Expr::col(account::Column::Balance).add(amount),
        ),
    };

    if update.exec(&txn).await?.rows_affected == 0 {
        return Err(Error::InsufficientFunds {
            current: before.balance,
            required: amount,
        });
    }

    let after = get_account(&txn, account_id).await?;
    let entry = append_transaction(&txn, account_id, kind, amount, note, now, after.balance).await?;
    txn.commit().await?;

    info!(
        "Applied {} of ${:.2} to account {}: ${:.2} -> ${:.2}",
        kind, amount, account_id, before.balance, after.balance
    );

    notify_best_effort(
        notifier,
        &format!(
            "Account update: {kind} ${amount:.2}\nAccount ID: {account_id} Balance: ${:.2}",
            after.balance
        ),
    )
    .await;

    Ok(entry)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[test]
    fn test_transaction_kind_parsing_and_sign() {
        assert_eq!("deposit".parse::<TransactionKind>().unwrap(), TransactionKind::Deposit);
        assert_eq!("Withdraw".parse::<TransactionKind>().unwrap(), TransactionKind::Withdraw);
        assert_eq!("interest".parse::<TransactionKind>().unwrap(), TransactionKind::Interest);
        assert!(matches!(
            "refund".parse::<TransactionKind>(),
            Err(Error::InvalidKind { .. })
        ));

        assert_eq!(TransactionKind::Deposit.signed(5.0), 5.0);
        assert_eq!(TransactionKind::Interest.signed(5.0), 5.0);
        assert_eq!(TransactionKind::Withdraw.signed(5.0), -5.0);
    }

    #[tokio::test]
    async fn test_apply_transaction_validation() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();
        let notifier = RecordingNotifier::default();

        for amount in [0.0, -5.0, f64::NAN, f64::INFINITY] {
            let result = apply_transaction(
                &db,
                &notifier,
                1,
                TransactionKind::Deposit,
                amount,
                "bad",
                test_now(),
            )
            .await;
            assert!(matches!(result, Err(Error::InvalidAmount { .. })));
        }

        let result = apply_transaction(
            &db,
            &notifier,
            1,
            TransactionKind::Interest,
            5.0,
            "not allowed",
            test_now(),
        )
        .await;
        assert!(matches!(result, Err(Error::InvalidKind { .. })));
        assert!(notifier.messages().is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_deposit_updates_balance_and_records_entry() -> Result<()> {
        let (db, account) = setup_with_account(1000.0).await?;
        let notifier = RecordingNotifier::default();

        let entry = apply_transaction(
            &db,
            &notifier,
            account.id,
            TransactionKind::Deposit,
            250.0,
            "salary",
            test_now(),
        )
        .await?;

        assert_eq!(entry.transaction_type, "deposit");
        assert_eq!(entry.amount, 250.0);
        assert_eq!(entry.note, "salary");
        assert_eq!(entry.balance_after, 1250.0);
        assert_eq!(get_account(&db, account.id).await?.balance, 1250.0);

        let messages = notifier.messages();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].contains("deposit $250.00"));
        assert!(messages[0].contains(&format!("Account ID: {}", account.id)));
        assert!(messages[0].contains("Balance: $1250.00"));

        Ok(())
    }

    #[tokio::test]
    async fn test_withdraw_within_balance() -> Result<()> {
        let (db, account) = setup_with_account(100.0).await?;
        let notifier = RecordingNotifier::default();

        let entry = apply_transaction(
            &db,
            &notifier,
            account.id,
            TransactionKind::Withdraw,
            100.0,
            "empty it",
            test_now(),
        )
        .await?;

        assert_eq!(entry.balance_after, 0.0);
        assert_eq!(get_account(&db, account.id).await?.balance, 0.0);
        Ok(())
    }

    #[tokio::test]
    async fn test_withdraw_insufficient_funds_writes_nothing() -> Result<()> {
        let (db, account) = setup_with_account(100.0).await?;
        let notifier = RecordingNotifier::default();

        let result = apply_transaction(
            &db,
            &notifier,
            account.id,
            TransactionKind::Withdraw,
            100.01,
            "too much",
            test_now(),
        )
        .await;

        assert!(matches!(
            result,
            Err(Error::InsufficientFunds {
                current,
                required
            }) if current == 100.0 && required == 100.01
        ));
        assert_eq!(get_account(&db, account.id).await?.balance, 100.0);
        assert!(get_transactions_for_account(&db, account.id).await?.is_empty());
        assert!(notifier.messages().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_deposit_unknown_account_writes_nothing() -> Result<()> {
        let db = setup_test_db().await?;
        let notifier = RecordingNotifier::default();

        let result = apply_transaction(
            &db,
            &notifier,
            404,
            TransactionKind::Deposit,
            10.0,
            "nobody",
            test_now(),
        )
        .await;

        assert!(matches!(
            result,
            Err(Error::NotFound {
                entity: "Account",
                id: 404
            })
        ));
        assert_eq!(crate::entities::Transaction::find().count(&db).await?, 0);
        assert!(notifier.messages().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_notification_failure_does_not_fail_deposit() -> Result<()> {
        let (db, account) = setup_with_account(10.0).await?;

        let entry = apply_transaction(
            &db,
            &FailingNotifier,
            account.id,
            TransactionKind::Deposit,
            5.0,
            "still fine",
            test_now(),
        )
        .await?;

        assert_eq!(entry.balance_after, 15.0);
        assert_eq!(get_account(&db, account.id).await?.balance, 15.0);
        Ok(())
    }

    #[tokio::test]
    async fn test_transactions_are_listed_in_applied_order() -> Result<()> {
        let (db, account) = setup_with_account(0.0).await?;
        let notifier = RecordingNotifier::default();
        let start = test_now();

        for (offset, (kind, amount)) in [
            (TransactionKind::Deposit, 50.0),
            (TransactionKind::Withdraw, 20.0),
            (TransactionKind::Deposit, 5.0),
        ]
        .into_iter()
        .enumerate()
        {
            let at = start + chrono::TimeDelta::minutes(i64::try_from(offset).unwrap());
            apply_transaction(&db, &notifier, account.id, kind, amount, "step", at).await?;
        }

        let entries = get_transactions_for_account(&db, account.id).await?;
        let balances: Vec<f64> = entries.iter().map(|e| e.balance_after).collect();
        assert_eq!(balances, vec![50.0, 30.0, 35.0]);
        assert_eq!(ledger_balance(&db, account.id).await?, 35.0);
        assert_eq!(get_account(&db, account.id).await?.balance, 35.0);
        Ok(())
    }

    #[tokio::test]
    async fn test_has_interest_on_matches_date_and_kind() -> Result<()> {
        let (db, account) = setup_with_account(0.0).await?;
        let payout = NaiveDate::from_ymd_opt(2024, 3, 25).unwrap();
        let at = payout.and_hms_opt(9, 30, 0).unwrap().and_utc();

        append_transaction(&db, account.id, TransactionKind::Deposit, 1.0, "d", at, 1.0).await?;
        assert!(!has_interest_on(&db, account.id, payout).await?);

        append_transaction(&db, account.id, TransactionKind::Interest, 0.0, "i", at, 1.0).await?;
        assert!(has_interest_on(&db, account.id, payout).await?);
        assert!(!has_interest_on(&db, account.id, payout.succ_opt().unwrap()).await?);
        Ok(())
    }
}
