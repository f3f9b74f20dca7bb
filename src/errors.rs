//! Unified error type for the ledger, the accrual engine and the bot layer.

use chrono::NaiveDate;
use poise::serenity_prelude as serenity;
use thiserror::Error;

/// Every failure the crate can surface.
#[derive(Debug, Error)]
pub enum Error {
    /// Storage failure reported by `SeaORM`
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Invalid or unreadable configuration
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
    },

    /// A referenced user or account does not exist
    #[error("{entity} {id} not found")]
    NotFound {
        /// Kind of record that was looked up (`"User"`, `"Account"`)
        entity: &'static str,
        /// Identifier that was looked up
        id: i64,
    },

    /// A withdrawal would drive the balance negative
    #[error("Insufficient funds: balance is ${current:.2}, tried to withdraw ${required:.2}")]
    InsufficientFunds {
        /// Balance at the time of the request
        current: f64,
        /// Amount that was requested
        required: f64,
    },

    /// Amount is zero, negative, NaN or infinite
    #[error("Invalid amount: {amount}")]
    InvalidAmount {
        /// The rejected amount
        amount: f64,
    },

    /// Annual interest rate is negative or not finite
    #[error("Invalid interest rate: {rate}%")]
    InvalidRate {
        /// The rejected rate
        rate: f64,
    },

    /// Payout cycle string is not one of the recognised cycles
    #[error("Unrecognized payout cycle '{cycle}' (expected monthly, quarterly or annually)")]
    InvalidCycle {
        /// The rejected cycle
        cycle: String,
    },

    /// Transaction kind is unknown or not allowed for user requests
    #[error("Invalid transaction kind '{kind}' (expected deposit or withdraw)")]
    InvalidKind {
        /// The rejected kind
        kind: String,
    },

    /// Opening date could not be parsed as `YYYY-MM-DD`
    #[error("Malformed date '{input}', expected YYYY-MM-DD")]
    MalformedDate {
        /// The raw input
        input: String,
    },

    /// Opening date lies after today
    #[error("Opening date {date} is in the future")]
    FutureOpeningDate {
        /// The rejected date
        date: NaiveDate,
    },

    /// A user cannot be deleted while owning accounts
    #[error("User {id} still owns {accounts} account(s); delete them first")]
    UserHasAccounts {
        /// User identifier
        id: i64,
        /// Number of accounts still owned
        accounts: u64,
    },

    /// A required text field is blank
    #[error("{field} cannot be empty")]
    EmptyField {
        /// Name of the field
        field: &'static str,
    },

    /// File system failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Missing or invalid environment variable
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    /// Discord gateway or HTTP failure
    #[error("Discord error: {0}")]
    Discord(Box<serenity::Error>),
}

impl From<serenity::Error> for Error {
    fn from(value: serenity::Error) -> Self {
        Self::Discord(Box::new(value))
    }
}

impl Error {
    /// Returns true for errors caused by the request itself rather than by infrastructure.
    ///
    /// Rejections are safe to show to the caller verbatim.
    #[must_use]
    pub const fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::NotFound { .. }
                | Self::InsufficientFunds { .. }
                | Self::InvalidAmount { .. }
                | Self::InvalidRate { .. }
                | Self::InvalidCycle { .. }
                | Self::InvalidKind { .. }
                | Self::MalformedDate { .. }
                | Self::FutureOpeningDate { .. }
                | Self::UserHasAccounts { .. }
                | Self::EmptyField { .. }
        )
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
