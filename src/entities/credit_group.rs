//! Credit group entity - A pool of persons who jointly qualify for a loan.
//!
//! Group status is externally mutated (there is no pure derivation for it);
//! the allowed values are validated in `core::status`. Total debt is derived
//! from the group ledger on read, never stored.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Credit group database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "credit_groups")]
pub struct Model {
    /// Unique identifier for the group
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Human-readable group name
    pub name: String,
    /// Free-text description
    pub description: String,
    /// Group workflow status ("Pending", "Approved", "Rejected", "Active",
    /// "Active Loan", "Moroso", "Inactive")
    pub status: String,
}

/// Defines relationships between `CreditGroup` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One group has many member persons
    #[sea_orm(has_many = "super::person::Entity")]
    Members,
    /// One group has many loans over time
    #[sea_orm(has_many = "super::loan::Entity")]
    Loans,
    /// One group has many current accounts over time
    #[sea_orm(has_many = "super::current_account::Entity")]
    CurrentAccounts,
}

impl Related<super::person::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Members.def()
    }
}

impl Related<super::loan::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Loans.def()
    }
}

impl Related<super::current_account::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CurrentAccounts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
