//! Discord command implementations organized by category.

#![allow(clippy::too_long_first_doc_paragraph)]

/// Account management commands
pub mod account;

/// General utility commands
pub mod general;

/// Interest run command
pub mod interest;

/// Deposit and withdrawal commands
pub mod transaction;

/// Account owner commands
pub mod user;

// Export commands
pub use account::*;
pub use general::*;
pub use interest::*;
pub use transaction::*;
pub use user::*;
