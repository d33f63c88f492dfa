//! Loan contribution entity - The many-to-many join between shareholders and
//! loans, carrying the amount each shareholder committed toward the principal.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Loan contribution database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "loan_contributions")]
pub struct Model {
    /// Unique identifier for the contribution
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Loan the contribution funds
    pub loan_id: i64,
    /// Shareholder providing the capital
    pub shareholder_id: i64,
    /// Amount committed toward the loan principal
    pub amount: f64,
}

/// Defines relationships between Contribution and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// A contribution belongs to one loan
    #[sea_orm(
        belongs_to = "super::loan::Entity",
        from = "Column::LoanId",
        to = "super::loan::Column::Id"
    )]
    Loan,
    /// A contribution belongs to one shareholder
    #[sea_orm(
        belongs_to = "super::shareholder::Entity",
        from = "Column::ShareholderId",
        to = "super::shareholder::Column::Id"
    )]
    Shareholder,
}

impl Related<super::loan::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Loan.def()
    }
}

impl Related<super::shareholder::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Shareholder.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
