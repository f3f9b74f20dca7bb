//! Interest arithmetic and the monthly payout calendar.
//!
//! Everything here is pure: no database, no clock. The accrual entry points in
//! [`super::accrual`] feed these functions an explicit "today" so the schedule
//! is fully determined by its inputs.
//!
//! Monthly interest is `trunc(balance * rate / 12 / 100)` and always posts on
//! the 25th. The cursor advances by taking the first of its month, adding 32 days
//! and forcing the day back to 25, which lands in the next calendar month for
//! every month length.

use chrono::{Datelike, Days, NaiveDate};

/// Day of month on which monthly interest is paid.
pub const PAYOUT_DAY: u32 = 25;

const DAYS_TO_NEXT_MONTH: u64 = 32;

/// One interest posting produced by the back-fill.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InterestPosting {
    /// Payout date (always the 25th)
    pub date: NaiveDate,
    /// Interest credited, in whole currency units
    pub amount: f64,
    /// Balance after crediting
    pub balance_after: f64,
}

/// Interest for one monthly period, truncated toward zero.
///
/// `annual_rate` is a percentage, so 12.0 means 1% per month.
#[must_use]
pub fn monthly_interest(balance: f64, annual_rate: f64) -> f64 {
    // Dividing by 1200 once is exact for whole-percent rates, where
    // multiplying by rate/12/100 can land a hair under an integer.
    (balance * annual_rate / 1200.0).trunc()
}

/// Moves a cursor to the 25th of the following calendar month.
///
/// Works from any day of the month; returns `None` only at the end of the
/// representable calendar.
#[must_use]
pub fn next_payout_date(cursor: NaiveDate) -> Option<NaiveDate> {
    cursor
        .with_day(1)?
        .checked_add_days(Days::new(DAYS_TO_NEXT_MONTH))?
        .with_day(PAYOUT_DAY)
}

/// First payout date for an account opened on `opened_on`.
///
/// Opening on or before the 25th pays in the opening month; later openings
/// start with the next month's payout.
#[must_use]
pub fn first_payout_date(opened_on: NaiveDate) -> Option<NaiveDate> {
    if opened_on.day() > PAYOUT_DAY {
        next_payout_date(opened_on)
    } else {
        opened_on.with_day(PAYOUT_DAY)
    }
}

/// Whether `date` is a payout day for the live run.
#[must_use]
pub fn is_payout_day(date: NaiveDate) -> bool {
    date.day() == PAYOUT_DAY
}

/// Computes the interest postings an account should have received between
/// `opened_on` and `today`, compounding on the growing balance.
///
/// Only payout dates strictly before `today` are included; a payout falling on
/// `today` is left to the live run.
#[must_use]
pub fn backfill_schedule(
    opening_balance: f64,
    annual_rate: f64,
    opened_on: NaiveDate,
    today: NaiveDate,
) -> Vec<InterestPosting> {
    let mut postings = Vec::new();
    let mut balance = opening_balance;
    let mut cursor = first_payout_date(opened_on);

    while let Some(date) = cursor.filter(|date| *date < today) {
        let amount = monthly_interest(balance, annual_rate);
        balance += amount;
        postings.push(InterestPosting {
            date,
            amount,
            balance_after: balance,
        });
        cursor = next_payout_date(date);
    }

    postings
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_monthly_interest_truncates() {
        // 1% of 1010 is 10.1
        assert_eq!(monthly_interest(1010.0, 12.0), 10.0);
        // 1% of 99 is 0.99
        assert_eq!(monthly_interest(99.0, 12.0), 0.0);
        assert_eq!(monthly_interest(1000.0, 12.0), 10.0);
        assert_eq!(monthly_interest(0.0, 12.0), 0.0);
        assert_eq!(monthly_interest(5000.0, 0.0), 0.0);
        // 1.5% / 12 of 100000 is 125
        assert_eq!(monthly_interest(100_000.0, 1.5), 125.0);
    }

    #[test]
    fn test_next_payout_date_steps_one_month() {
        assert_eq!(next_payout_date(ymd(2024, 1, 25)), Some(ymd(2024, 2, 25)));
        assert_eq!(next_payout_date(ymd(2024, 2, 25)), Some(ymd(2024, 3, 25)));
        assert_eq!(next_payout_date(ymd(2024, 12, 25)), Some(ymd(2025, 1, 25)));
    }

    #[test]
    fn test_next_payout_date_normalizes_any_day() {
        assert_eq!(next_payout_date(ymd(2024, 1, 31)), Some(ymd(2024, 2, 25)));
        assert_eq!(next_payout_date(ymd(2024, 1, 1)), Some(ymd(2024, 2, 25)));
        assert_eq!(next_payout_date(ymd(2023, 2, 28)), Some(ymd(2023, 3, 25)));
        assert_eq!(next_payout_date(ymd(2024, 2, 29)), Some(ymd(2024, 3, 25)));
        assert_eq!(next_payout_date(ymd(2024, 7, 31)), Some(ymd(2024, 8, 25)));
    }

    #[test]
    fn test_first_payout_date() {
        assert_eq!(first_payout_date(ymd(2024, 1, 10)), Some(ymd(2024, 1, 25)));
        assert_eq!(first_payout_date(ymd(2024, 1, 25)), Some(ymd(2024, 1, 25)));
        assert_eq!(first_payout_date(ymd(2024, 1, 26)), Some(ymd(2024, 2, 25)));
        assert_eq!(first_payout_date(ymd(2024, 12, 31)), Some(ymd(2025, 1, 25)));
    }

    #[test]
    fn test_is_payout_day() {
        assert!(is_payout_day(ymd(2024, 6, 25)));
        assert!(!is_payout_day(ymd(2024, 6, 24)));
        assert!(!is_payout_day(ymd(2024, 6, 26)));
    }

    #[test]
    fn test_backfill_scenario_from_january() {
        let postings = backfill_schedule(1000.0, 12.0, ymd(2024, 1, 10), ymd(2024, 4, 25));

        let dates: Vec<NaiveDate> = postings.iter().map(|p| p.date).collect();
        assert_eq!(
            dates,
            vec![ymd(2024, 1, 25), ymd(2024, 2, 25), ymd(2024, 3, 25)]
        );

        // 1% of 1000, 1010, 1020 truncated
        let amounts: Vec<f64> = postings.iter().map(|p| p.amount).collect();
        assert_eq!(amounts, vec![10.0, 10.0, 10.0]);
        assert_eq!(postings.last().unwrap().balance_after, 1030.0);
    }

    #[test]
    fn test_backfill_compounds() {
        // 10000 at 12%: 100, 101, 102 (102.01 truncated)
        let postings = backfill_schedule(10_000.0, 12.0, ymd(2024, 1, 1), ymd(2024, 3, 26));
        let amounts: Vec<f64> = postings.iter().map(|p| p.amount).collect();
        assert_eq!(amounts, vec![100.0, 101.0, 102.0]);
        assert_eq!(postings[0].balance_after, 10_100.0);
        assert_eq!(postings[1].balance_after, 10_201.0);
        assert_eq!(postings[2].balance_after, 10_303.0);
    }

    #[test]
    fn test_backfill_excludes_payout_on_today() {
        let postings = backfill_schedule(1000.0, 12.0, ymd(2024, 3, 1), ymd(2024, 3, 25));
        assert!(postings.is_empty());

        let postings = backfill_schedule(1000.0, 12.0, ymd(2024, 3, 1), ymd(2024, 3, 26));
        assert_eq!(postings.len(), 1);
        assert_eq!(postings[0].date, ymd(2024, 3, 25));
    }

    #[test]
    fn test_backfill_opened_after_payout_day_starts_next_month() {
        let postings = backfill_schedule(500.0, 24.0, ymd(2024, 1, 28), ymd(2024, 3, 1));
        assert_eq!(postings.len(), 1);
        assert_eq!(postings[0].date, ymd(2024, 2, 25));
        assert_eq!(postings[0].amount, 10.0);
    }

    #[test]
    fn test_backfill_opened_today_is_empty() {
        let today = ymd(2024, 5, 10);
        assert!(backfill_schedule(1000.0, 12.0, today, today).is_empty());
    }

    #[test]
    fn test_backfill_crosses_year_boundary_on_consecutive_months() {
        let postings = backfill_schedule(1000.0, 6.0, ymd(2023, 10, 5), ymd(2024, 2, 1));
        let dates: Vec<NaiveDate> = postings.iter().map(|p| p.date).collect();
        assert_eq!(
            dates,
            vec![
                ymd(2023, 10, 25),
                ymd(2023, 11, 25),
                ymd(2023, 12, 25),
                ymd(2024, 1, 25)
            ]
        );
        for pair in postings.windows(2) {
            assert!(pair[0].date < pair[1].date);
            assert_eq!(pair[1].date.day(), PAYOUT_DAY);
        }
    }

    #[test]
    fn test_backfill_is_deterministic() {
        let first = backfill_schedule(2345.0, 3.5, ymd(2021, 6, 30), ymd(2024, 6, 30));
        let second = backfill_schedule(2345.0, 3.5, ymd(2021, 6, 30), ymd(2024, 6, 30));
        assert_eq!(first, second);
        assert_eq!(first.len(), 36);
    }

    #[test]
    fn test_backfill_balance_matches_sum_of_postings() {
        let opening = 7777.0;
        let postings = backfill_schedule(opening, 9.0, ymd(2020, 2, 14), ymd(2024, 8, 3));
        let total: f64 = postings.iter().map(|p| p.amount).sum();
        assert_eq!(postings.last().unwrap().balance_after, opening + total);
    }
}
