//! Current account entity - The installment ledger owned by a person or a
//! group. Exactly one of `person_id` / `group_id` is set, matching
//! `account_type`. At most one active account may exist per owner; the
//! invariant is enforced by `core::ledger::open_account`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Current account database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "current_accounts")]
pub struct Model {
    /// Unique identifier for the account
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owner kind: "person" or "group"
    pub account_type: String,
    /// Owning person, when `account_type` is "person"
    pub person_id: Option<i64>,
    /// Owning group, when `account_type` is "group"
    pub group_id: Option<i64>,
    /// Loan this account's schedule derives from
    pub loan_id: i64,
    /// Total payable across all installments (principal plus interest)
    pub total_amount: f64,
    /// Account status ("active" or "closed")
    pub status: String,
}

/// Defines relationships between `CurrentAccount` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// An account may belong to one person
    #[sea_orm(
        belongs_to = "super::person::Entity",
        from = "Column::PersonId",
        to = "super::person::Column::Id"
    )]
    Person,
    /// An account may belong to one group
    #[sea_orm(
        belongs_to = "super::credit_group::Entity",
        from = "Column::GroupId",
        to = "super::credit_group::Column::Id"
    )]
    Group,
    /// An account belongs to one loan
    #[sea_orm(
        belongs_to = "super::loan::Entity",
        from = "Column::LoanId",
        to = "super::loan::Column::Id"
    )]
    Loan,
    /// One account has many installments
    #[sea_orm(has_many = "super::installment::Entity")]
    Installments,
}

impl Related<super::person::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Person.def()
    }
}

impl Related<super::credit_group::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Group.def()
    }
}

impl Related<super::loan::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Loan.def()
    }
}

impl Related<super::installment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Installments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
