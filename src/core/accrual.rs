//! Interest accrual engine.
//!
//! Two entry points share the stepping rule from [`super::interest`]:
//!
//! * [`open_account`] creates an account, records its opening deposit and
//!   back-fills every monthly interest posting between the opening date and
//!   today, all in one database transaction.
//! * [`run_monthly_interest`] is the live pass triggered on the 25th. Each
//!   monthly account is credited in its own database transaction so one failing
//!   account does not hold back the others. The run date is stored in the
//!   `system_state` table and every account is checked for an existing posting
//!   on the same day, which makes repeated triggers harmless.

use crate::{
    core::{
        account::{NewAccount, PayoutCycle, create_account, get_account, list_accounts},
        interest::{backfill_schedule, is_payout_day, monthly_interest},
        transaction::{TransactionKind, append_transaction, has_interest_on},
    },
    entities::{Account, SystemState, account, system_state, transaction},
    errors::{Error, Result},
    notify::{Notifier, notify_best_effort},
};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use sea_orm::{Set, TransactionTrait, prelude::*, sea_query::Expr};
use tracing::{debug, error, info, instrument, warn};

const LAST_INTEREST_RUN_KEY: &str = "last_interest_run";

const OPENING_DEPOSIT_NOTE: &str = "Opening deposit";
const BACKFILL_NOTE: &str = "Back-filled monthly interest";
const MONTHLY_INTEREST_NOTE: &str = "Monthly interest";

/// An account together with the history written when it was opened.
#[derive(Debug, Clone)]
pub struct OpenedAccount {
    /// The account as stored after the back-fill
    pub account: account::Model,
    /// The opening deposit
    pub opening_deposit: transaction::Model,
    /// Back-filled interest postings in date order
    pub interest_postings: Vec<transaction::Model>,
}

/// Interest credited to one account during a live run.
#[derive(Debug, Clone, PartialEq)]
pub struct AccountInterestResult {
    /// Account that was credited
    pub account_id: i64,
    /// Balance before crediting
    pub old_balance: f64,
    /// Interest credited
    pub interest: f64,
    /// Balance after crediting
    pub new_balance: f64,
}

/// An account the live run could not credit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedAccount {
    /// Account that failed
    pub account_id: i64,
    /// Error description
    pub reason: String,
}

/// Summary of a completed live run.
#[derive(Debug, Clone, PartialEq)]
pub struct InterestRunResult {
    /// Payout date of the run
    pub run_date: NaiveDate,
    /// Accounts credited in this run
    pub credited: Vec<AccountInterestResult>,
    /// Accounts left untouched (non-monthly cycle or already credited today)
    pub skipped: usize,
    /// Accounts whose crediting was rolled back
    pub failed: Vec<FailedAccount>,
}

impl InterestRunResult {
    /// Total interest credited across all accounts
    #[must_use]
    pub fn total_interest(&self) -> f64 {
        self.credited.iter().map(|r| r.interest).sum()
    }
}

/// Outcome of [`run_monthly_interest`].
#[derive(Debug, Clone, PartialEq)]
pub enum InterestRunOutcome {
    /// Today is not the 25th; nothing was touched
    NotPayoutDay,
    /// The run for this payout day has already completed
    AlreadyProcessed {
        /// The payout day in question
        date: NaiveDate,
    },
    /// The run was performed
    Completed(InterestRunResult),
}

/// Parses an optional `YYYY-MM-DD` opening date.
///
/// An absent or blank input means `today`. Malformed input is rejected rather
/// than replaced, and so is a date after `today`.
pub fn parse_opening_date(input: Option<&str>, today: NaiveDate) -> Result<NaiveDate> {
    let Some(raw) = input.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(today);
    };

    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| Error::MalformedDate {
        input: raw.to_string(),
    })?;
    if date > today {
        return Err(Error::FutureOpeningDate { date });
    }
    Ok(date)
}

fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// Opens an account and back-fills its interest history.
///
/// Records the opening deposit at the opening date, then for monthly accounts
/// one `interest` transaction per payout date strictly before today, each
/// compounding on the previous balance. The account row, the deposit and every
/// posting commit together or not at all. A notification is sent after commit.
///
/// # Errors
/// * `InvalidAmount` / `InvalidRate` - invalid opening balance or rate
/// * `FutureOpeningDate` - `opened_on` is after today
/// * `NotFound` - the user does not exist
#[instrument(skip(db, notifier))]
pub async fn open_account<N: Notifier>(
    db: &DatabaseConnection,
    notifier: &N,
    new_account: &NewAccount,
    now: DateTime<Utc>,
) -> Result<OpenedAccount> {
    new_account.validate()?;
    let today = now.date_naive();
    if new_account.opened_on > today {
        return Err(Error::FutureOpeningDate {
            date: new_account.opened_on,
        });
    }

    let txn = db.begin().await?;
    let created = create_account(&txn, new_account, now).await?;

    let deposited_at = if new_account.opened_on == today {
        now
    } else {
        start_of_day(new_account.opened_on)
    };
    let opening_deposit = append_transaction(
        &txn,
        created.id,
        TransactionKind::Deposit,
        new_account.opening_balance,
        OPENING_DEPOSIT_NOTE,
        deposited_at,
        new_account.opening_balance,
    )
    .await?;

    let schedule = if new_account.payout_cycle.accrues() {
        backfill_schedule(
            new_account.opening_balance,
            new_account.interest_rate,
            new_account.opened_on,
            today,
        )
    } else {
        debug!(
            "Account {} uses {} payouts; no back-fill",
            created.id, new_account.payout_cycle
        );
        Vec::new()
    };

    let mut interest_postings = Vec::with_capacity(schedule.len());
    for posting in &schedule {
        let entry = append_transaction(
            &txn,
            created.id,
            TransactionKind::Interest,
            posting.amount,
            BACKFILL_NOTE,
            start_of_day(posting.date),
            posting.balance_after,
        )
        .await?;
        interest_postings.push(entry);
    }

    let final_balance = schedule
        .last()
        .map_or(new_account.opening_balance, |p| p.balance_after);
    let mut active_model: account::ActiveModel = created.into();
    active_model.balance = Set(final_balance);
    let account = active_model.update(&txn).await?;

    txn.commit().await?;

    info!(
        "Opened account {} on {} with ${:.2}; back-filled {} posting(s), balance ${:.2}",
        account.id,
        new_account.opened_on,
        new_account.opening_balance,
        interest_postings.len(),
        account.balance
    );

    notify_best_effort(
        notifier,
        &format!(
            "New account {}: opening deposit ${:.2}, {} back-filled interest posting(s), balance ${:.2}",
            account.id,
            new_account.opening_balance,
            interest_postings.len(),
            account.balance
        ),
    )
    .await;

    Ok(OpenedAccount {
        account,
        opening_deposit,
        interest_postings,
    })
}

/// Credits today's interest to one account in its own database transaction.
///
/// Returns `None` if the account already has an interest posting dated today.
async fn credit_account(
    db: &DatabaseConnection,
    account_id: i64,
    now: DateTime<Utc>,
) -> Result<Option<AccountInterestResult>> {
    let today = now.date_naive();
    let txn = db.begin().await?;

    let before = get_account(&txn, account_id).await?;
    if has_interest_on(&txn, account_id, today).await? {
        debug!("Account {} already credited on {}", account_id, today);
        return Ok(None);
    }

    let interest = monthly_interest(before.balance, before.interest_rate);
    Account::update_many()
        .col_expr(
            account::Column::Balance,
            Expr::col(account::Column::Balance).add(interest),
        )
        .filter(account::Column::Id.eq(account_id))
        .exec(&txn)
        .await?;
    let after = get_account(&txn, account_id).await?;

    append_transaction(
        &txn,
        account_id,
        TransactionKind::Interest,
        interest,
        MONTHLY_INTEREST_NOTE,
        now,
        after.balance,
    )
    .await?;
    txn.commit().await?;

    Ok(Some(AccountInterestResult {
        account_id,
        old_balance: before.balance,
        interest,
        new_balance: after.balance,
    }))
}

/// Performs the live monthly interest run.
///
/// A no-op unless `now` falls on the 25th. Every account with the monthly
/// payout cycle is credited `trunc(balance * rate / 12 / 100)` and notified;
/// accounts with other cycles are skipped without error. A failing account is
/// rolled back, logged and reported in the result while the rest proceed.
#[instrument(skip(db, notifier))]
pub async fn run_monthly_interest<N: Notifier>(
    db: &DatabaseConnection,
    notifier: &N,
    now: DateTime<Utc>,
) -> Result<InterestRunOutcome> {
    let today = now.date_naive();
    if !is_payout_day(today) {
        debug!("{} is not a payout day", today);
        return Ok(InterestRunOutcome::NotPayoutDay);
    }
    if get_last_interest_run_date(db).await? == Some(today) {
        info!("Interest run for {} already completed", today);
        return Ok(InterestRunOutcome::AlreadyProcessed { date: today });
    }

    let mut credited = Vec::new();
    let mut failed = Vec::new();
    let mut skipped = 0;

    for acc in list_accounts(db).await? {
        let monthly = acc
            .payout_cycle
            .parse::<PayoutCycle>()
            .is_ok_and(PayoutCycle::accrues);
        if !monthly {
            skipped += 1;
            continue;
        }

        match credit_account(db, acc.id, now).await {
            Ok(Some(result)) => {
                notify_best_effort(
                    notifier,
                    &format!(
                        "Monthly interest: account {} credited ${:.2}, balance ${:.2}",
                        result.account_id, result.interest, result.new_balance
                    ),
                )
                .await;
                credited.push(result);
            }
            Ok(None) => skipped += 1,
            Err(e) => {
                error!("Failed to credit interest to account {}: {}", acc.id, e);
                failed.push(FailedAccount {
                    account_id: acc.id,
                    reason: e.to_string(),
                });
            }
        }
    }

    if failed.is_empty() {
        set_last_interest_run_date(db, today).await?;
    } else {
        warn!(
            "{} account(s) failed on {}; the run may be repeated",
            failed.len(),
            today
        );
    }

    let result = InterestRunResult {
        run_date: today,
        credited,
        skipped,
        failed,
    };
    info!(
        "Interest run {}: credited {} account(s) with ${:.2}, skipped {}, failed {}",
        today,
        result.credited.len(),
        result.total_interest(),
        result.skipped,
        result.failed.len()
    );
    Ok(InterestRunOutcome::Completed(result))
}

/// Retrieves the date of the last completed live run.
pub async fn get_last_interest_run_date<C>(db: &C) -> Result<Option<NaiveDate>>
where
    C: ConnectionTrait,
{
    let state = SystemState::find()
        .filter(system_state::Column::Key.eq(LAST_INTEREST_RUN_KEY))
        .one(db)
        .await?;

    match state {
        Some(s) => NaiveDate::parse_from_str(&s.value, "%Y-%m-%d")
            .map(Some)
            .map_err(|e| Error::Config {
                message: format!("Failed to parse last interest run date: {e}"),
            }),
        None => Ok(None),
    }
}

async fn set_last_interest_run_date<C>(db: &C, date: NaiveDate) -> Result<()>
where
    C: ConnectionTrait,
{
    let date_str = date.format("%Y-%m-%d").to_string();
    let now = Utc::now().naive_utc();

    let existing = SystemState::find()
        .filter(system_state::Column::Key.eq(LAST_INTEREST_RUN_KEY))
        .one(db)
        .await?;

    if let Some(state) = existing {
        let mut active_model: system_state::ActiveModel = state.into();
        active_model.value = Set(date_str);
        active_model.updated_at = Set(now);
        active_model.update(db).await?;
    } else {
        let new_state = system_state::ActiveModel {
            key: Set(LAST_INTEREST_RUN_KEY.to_string()),
            value: Set(date_str),
            updated_at: Set(now),
            ..Default::default()
        };
        new_state.insert(db).await?;
    }

    Ok(())
}

/// Formats an interest run outcome as a human-readable summary.
#[must_use]
pub fn format_interest_run_summary(outcome: &InterestRunOutcome) -> String {
    use std::fmt::Write;

    let result = match outcome {
        InterestRunOutcome::NotPayoutDay => {
            return "Today is not a payout day; interest is paid on the 25th.".to_string();
        }
        InterestRunOutcome::AlreadyProcessed { date } => {
            return format!("Interest for {date} has already been paid.");
        }
        InterestRunOutcome::Completed(result) => result,
    };

    let mut summary = format!(
        "Interest Run - {} - Credited {} account(s), ${:.2} total\n",
        result.run_date,
        result.credited.len(),
        result.total_interest()
    );
    // write! into a String cannot fail
    let _ = writeln!(
        summary,
        "  Skipped: {} | Failed: {}",
        result.skipped,
        result.failed.len()
    );

    for credited in &result.credited {
        let _ = writeln!(
            summary,
            "  Account {} | ${:.2} → ${:.2} (+${:.2})",
            credited.account_id, credited.old_balance, credited.new_balance, credited.interest
        );
    }
    for failure in &result.failed {
        let _ = writeln!(
            summary,
            "  Account {} | FAILED: {}",
            failure.account_id, failure.reason
        );
    }

    summary
}
