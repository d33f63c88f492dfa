//! Shareholder entity - A capital provider backing one or more loans.
//!
//! `capital_contributed` is the historical total the shareholder has put in;
//! the capital currently deployed across open loans is derived in
//! `core::shareholder`, never stored.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Shareholder database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "shareholders")]
pub struct Model {
    /// Unique identifier for the shareholder
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Full legal name
    pub full_name: String,
    /// National identity document number
    pub national_id: String,
    /// Contact email, if known
    pub email: Option<String>,
    /// Contact phone, if known
    pub phone: Option<String>,
    /// Historical total capital contributed
    pub capital_contributed: f64,
}

/// Defines relationships between Shareholder and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One shareholder has many loan contributions
    #[sea_orm(has_many = "super::contribution::Entity")]
    Contributions,
}

impl Related<super::contribution::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Contributions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
