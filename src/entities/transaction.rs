//! Transaction entity - One immutable ledger entry of an account.
//!
//! `amount` is always stored positive; `transaction_type` (`"deposit"`, `"withdraw"`
//! or `"interest"`) gives the direction. `balance_after` is the account balance
//! immediately after the entry was applied.
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Transaction database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    /// Unique identifier for the transaction
    #[sea_orm(primary_key)]
    pub id: i64,
    /// ID of the account this transaction belongs to
    pub account_id: i64,
    /// When the transaction took effect
    pub timestamp: DateTimeUtc,
    /// Type of transaction: `"deposit"`, `"withdraw"` or `"interest"`
    pub transaction_type: String,
    /// Transaction amount, always non-negative
    pub amount: f64,
    /// Free-text note
    pub note: String,
    /// Account balance right after this transaction
    pub balance_after: f64,
}

/// Defines relationships between Transaction and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each transaction belongs to one account
    #[sea_orm(
        belongs_to = "super::account::Entity",
        from = "Column::AccountId",
        to = "super::account::Column::Id"
    )]
    Account,
}

impl Related<super::account::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Account.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
