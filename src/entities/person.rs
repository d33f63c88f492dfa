//! Person entity - Represents an individual borrower.
//!
//! A person carries identity data, a set of verification flags with matching
//! rejection markers, an optional manual status override, and an optional
//! reference to the credit group they currently belong to. The displayed
//! status is never stored; it is derived in `core::status` from the flags
//! and the override.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Person database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "persons")]
pub struct Model {
    /// Unique identifier for the person
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Full legal name
    pub full_name: String,
    /// National identity document number (unique across persons)
    pub national_id: String,
    /// Residential address
    pub address: String,
    /// Financial standing: "Unknown", "Good", or "Bad"
    pub financial_status: String,
    /// Identity documents verified
    pub id_docs_checked: bool,
    /// Utility/service bill presented and verified
    pub service_bill_checked: bool,
    /// Guarantor verified
    pub guarantor_checked: bool,
    /// Financial standing verified
    pub financial_checked: bool,
    /// Application folder complete
    pub full_folder_checked: bool,
    /// General verification passed
    pub general_checked: bool,
    /// Identity documents explicitly rejected
    pub id_docs_rejected: bool,
    /// Service bill explicitly rejected
    pub service_bill_rejected: bool,
    /// Guarantor explicitly rejected
    pub guarantor_rejected: bool,
    /// Financial standing explicitly rejected
    pub financial_rejected: bool,
    /// Application folder explicitly rejected
    pub full_folder_rejected: bool,
    /// General verification explicitly rejected
    pub general_rejected: bool,
    /// Manual status override ("Pending"/"Approved"/"Rejected"); None means automatic
    pub status_override: Option<String>,
    /// Group the person currently belongs to, if any (at most one at a time)
    pub group_id: Option<i64>,
}

/// Defines relationships between Person and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// A person belongs to at most one credit group
    #[sea_orm(
        belongs_to = "super::credit_group::Entity",
        from = "Column::GroupId",
        to = "super::credit_group::Column::Id"
    )]
    Group,
    /// One person has many current accounts over time
    #[sea_orm(has_many = "super::current_account::Entity")]
    CurrentAccounts,
    /// One person has many loan member shares
    #[sea_orm(has_many = "super::member_share::Entity")]
    MemberShares,
}

impl Related<super::credit_group::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Group.def()
    }
}

impl Related<super::current_account::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CurrentAccounts.def()
    }
}

impl Related<super::member_share::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MemberShares.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
