//! Installment entity - One scheduled repayment unit of an account's total
//! payable amount.
//!
//! The stored status is "pending", "partial", or "paid". Overdue is a view
//! derived from the due date versus today and is never stored.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Installment database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "installments")]
pub struct Model {
    /// Unique identifier for the installment
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Account this installment belongs to
    pub account_id: i64,
    /// 1-based installment number, unique within the account
    pub number: i32,
    /// Amount due for this installment (fixed share of the total payable)
    pub amount: f64,
    /// Date the installment falls due (mutable via explicit reschedule)
    pub due_date: Date,
    /// Stored status: "pending", "partial", or "paid"
    pub status: String,
    /// Amount paid so far (0 <= `amount_paid` <= amount)
    pub amount_paid: f64,
    /// Date of full settlement, set when status becomes "paid"
    pub paid_date: Option<Date>,
    /// Free-text observation recorded with the payment
    pub observation: Option<String>,
}

/// Defines relationships between Installment and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// An installment belongs to one current account
    #[sea_orm(
        belongs_to = "super::current_account::Entity",
        from = "Column::AccountId",
        to = "super::current_account::Column::Id"
    )]
    Account,
}

impl Related<super::current_account::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Account.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
