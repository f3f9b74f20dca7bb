//! Account entity - A savings account accruing interest.
//!
//! Each account belongs to exactly one user and carries its current balance,
//! annual interest rate (percent) and payout cycle. The balance is kept in step
//! with the account's transaction history; see `core::transaction`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Account database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    /// Unique identifier for the account
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owning user
    pub user_id: i64,
    /// Current balance in dollars
    pub balance: f64,
    /// Annual interest rate in percent (1.0 means 1%)
    pub interest_rate: f64,
    /// Payout cycle: `"monthly"`, `"quarterly"` or `"annually"`
    pub payout_cycle: String,
    /// Date the account was opened (may be backdated)
    pub opened_on: Date,
    /// When the account row was created
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Account and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each account belongs to one user
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
    /// One account has many transactions
    #[sea_orm(has_many = "super::transaction::Entity")]
    Transactions,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::transaction::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
