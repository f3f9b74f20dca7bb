//! Core business logic, independent of the Discord layer.

/// Account storage and payout cycles
pub mod account;
/// Account opening with back-fill and the live monthly run
pub mod accrual;
/// Interest arithmetic and the payout calendar
pub mod interest;
/// Ledger entries, deposits and withdrawals
pub mod transaction;
/// Account owners
pub mod user;
