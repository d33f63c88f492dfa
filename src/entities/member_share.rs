//! Loan member share entity - How a group loan's principal is sub-divided
//! across the member borrowers. Validated against the principal with the same
//! tolerance as shareholder contributions, but independently of them.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Loan member share database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "loan_member_shares")]
pub struct Model {
    /// Unique identifier for the member share
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Loan being sub-divided
    pub loan_id: i64,
    /// Member person receiving this share
    pub person_id: i64,
    /// Principal amount allotted to this member
    pub amount: f64,
}

/// Defines relationships between `MemberShare` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// A member share belongs to one loan
    #[sea_orm(
        belongs_to = "super::loan::Entity",
        from = "Column::LoanId",
        to = "super::loan::Column::Id"
    )]
    Loan,
    /// A member share belongs to one person
    #[sea_orm(
        belongs_to = "super::person::Entity",
        from = "Column::PersonId",
        to = "super::person::Column::Id"
    )]
    Person,
}

impl Related<super::loan::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Loan.def()
    }
}

impl Related<super::person::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Person.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
