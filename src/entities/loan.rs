//! Loan entity - A shareholder-funded loan originated against a group.
//!
//! A loan is immutable once created except for its status, which is derived
//! from the group ledger and persisted by `core::loan::refresh_loan_status`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Loan database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "loans")]
pub struct Model {
    /// Unique identifier for the loan
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Group the loan was originated against
    pub group_id: i64,
    /// Principal amount lent (excluding interest)
    pub principal: f64,
    /// Number of installments (2 to 6)
    pub installment_count: i32,
    /// Fixed nominal interest rate applied per installment (e.g. 0.15)
    pub rate_per_installment: f64,
    /// Date the loan starts; installments fall due monthly after this
    pub start_date: Date,
    /// Loan status ("Active", "Paid", "Mora")
    pub status: String,
}

/// Defines relationships between Loan and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// A loan belongs to one group
    #[sea_orm(
        belongs_to = "super::credit_group::Entity",
        from = "Column::GroupId",
        to = "super::credit_group::Column::Id"
    )]
    Group,
    /// One loan has many shareholder contributions
    #[sea_orm(has_many = "super::contribution::Entity")]
    Contributions,
    /// One loan has many member shares
    #[sea_orm(has_many = "super::member_share::Entity")]
    MemberShares,
    /// One loan has many current accounts (group-level plus one per member)
    #[sea_orm(has_many = "super::current_account::Entity")]
    CurrentAccounts,
}

impl Related<super::credit_group::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Group.def()
    }
}

impl Related<super::contribution::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Contributions.def()
    }
}

impl Related<super::member_share::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MemberShares.def()
    }
}

impl Related<super::current_account::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CurrentAccounts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
