//! Shareholder business logic - registration, capital tracking, and the
//! per-shareholder account view.
//!
//! `capital_contributed` is the declared paid-in capital; `active_capital` is
//! derived from contributions on loans that are still open and is never
//! stored.

use crate::{
    core::{profit::split_installment, status::{InstallmentState, LoanStatus}},
    entities::{
        Contribution, CurrentAccount, Installment, Loan, Shareholder, contribution,
        current_account, installment, loan, shareholder,
    },
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::info;

/// A shareholder's stake in one loan, with realized returns to date.
#[derive(Debug, Clone, PartialEq)]
pub struct LoanPosition {
    /// The funded loan
    pub loan: loan::Model,
    /// Amount this shareholder contributed to the loan
    pub contribution_amount: f64,
    /// Capital already returned through settled installments
    pub capital_recovered: f64,
    /// Interest already collected through settled installments
    pub interest_earned: f64,
}

/// Full account view for one shareholder.
#[derive(Debug, Clone, PartialEq)]
pub struct ShareholderAccount {
    /// The shareholder
    pub shareholder: shareholder::Model,
    /// Capital currently tied up in open loans
    pub active_capital: f64,
    /// One position per funded loan, ordered by loan id
    pub positions: Vec<LoanPosition>,
}

/// Registers a new shareholder with a unique national ID.
pub async fn create_shareholder(
    db: &DatabaseConnection,
    full_name: String,
    national_id: String,
    email: Option<String>,
    phone: Option<String>,
    capital_contributed: f64,
) -> Result<shareholder::Model> {
    if full_name.trim().is_empty() {
        return Err(Error::Config {
            message: "Shareholder name cannot be empty".to_string(),
        });
    }
    if national_id.trim().is_empty() {
        return Err(Error::Config {
            message: "National ID cannot be empty".to_string(),
        });
    }
    if !capital_contributed.is_finite() || capital_contributed < 0.0 {
        return Err(Error::InvalidAmount {
            amount: capital_contributed,
        });
    }

    let national_id = national_id.trim().to_string();
    let existing = Shareholder::find()
        .filter(shareholder::Column::NationalId.eq(national_id.clone()))
        .one(db)
        .await?;
    if existing.is_some() {
        return Err(Error::DuplicateNationalId { national_id });
    }

    let model = shareholder::ActiveModel {
        full_name: Set(full_name.trim().to_string()),
        national_id: Set(national_id),
        email: Set(email),
        phone: Set(phone),
        capital_contributed: Set(capital_contributed),
        ..Default::default()
    };

    let result = model.insert(db).await?;
    info!(shareholder_id = result.id, "registered shareholder");
    Ok(result)
}

/// Finds a shareholder by their unique ID.
pub async fn get_shareholder_by_id(
    db: &DatabaseConnection,
    shareholder_id: i64,
) -> Result<Option<shareholder::Model>> {
    Shareholder::find_by_id(shareholder_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves all shareholders, ordered alphabetically by name.
pub async fn get_all_shareholders(db: &DatabaseConnection) -> Result<Vec<shareholder::Model>> {
    Shareholder::find()
        .order_by_asc(shareholder::Column::FullName)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Updates a shareholder's declared paid-in capital.
pub async fn set_capital_contributed(
    db: &DatabaseConnection,
    shareholder_id: i64,
    capital_contributed: f64,
) -> Result<shareholder::Model> {
    if !capital_contributed.is_finite() || capital_contributed < 0.0 {
        return Err(Error::InvalidAmount {
            amount: capital_contributed,
        });
    }

    let existing = Shareholder::find_by_id(shareholder_id)
        .one(db)
        .await?
        .ok_or(Error::NotFound {
            entity: "shareholder",
            id: shareholder_id,
        })?;

    let mut model: shareholder::ActiveModel = existing.into();
    model.capital_contributed = Set(capital_contributed);
    model.update(db).await.map_err(Into::into)
}

/// Updates a shareholder's name and contact details.
///
/// The national ID is immutable once registered; declared capital changes
/// through [`set_capital_contributed`].
pub async fn update_shareholder(
    db: &DatabaseConnection,
    shareholder_id: i64,
    full_name: String,
    email: Option<String>,
    phone: Option<String>,
) -> Result<shareholder::Model> {
    if full_name.trim().is_empty() {
        return Err(Error::Config {
            message: "Shareholder name cannot be empty".to_string(),
        });
    }

    let existing = Shareholder::find_by_id(shareholder_id)
        .one(db)
        .await?
        .ok_or(Error::NotFound {
            entity: "shareholder",
            id: shareholder_id,
        })?;

    let mut model: shareholder::ActiveModel = existing.into();
    model.full_name = Set(full_name.trim().to_string());
    model.email = Set(email);
    model.phone = Set(phone);
    model.update(db).await.map_err(Into::into)
}

/// Removes a shareholder. Refused while any loan contribution references
/// them, so funding history is never orphaned.
pub async fn delete_shareholder(db: &DatabaseConnection, shareholder_id: i64) -> Result<()> {
    let existing = Shareholder::find_by_id(shareholder_id)
        .one(db)
        .await?
        .ok_or(Error::NotFound {
            entity: "shareholder",
            id: shareholder_id,
        })?;

    let linked = Contribution::find()
        .filter(contribution::Column::ShareholderId.eq(shareholder_id))
        .one(db)
        .await?;
    if linked.is_some() {
        return Err(Error::Config {
            message: format!(
                "shareholder {shareholder_id} has loan contributions and cannot be deleted"
            ),
        });
    }

    existing.delete(db).await?;
    info!(shareholder_id, "deleted shareholder");
    Ok(())
}

/// Capital the shareholder currently has tied up in loans that are not yet
/// fully repaid. Derived on read.
pub async fn active_capital(db: &DatabaseConnection, shareholder_id: i64) -> Result<f64> {
    let contributions = Contribution::find()
        .filter(contribution::Column::ShareholderId.eq(shareholder_id))
        .all(db)
        .await?;

    let mut total = 0.0;
    for contrib in &contributions {
        let loan = Loan::find_by_id(contrib.loan_id)
            .one(db)
            .await?
            .ok_or(Error::NotFound {
                entity: "loan",
                id: contrib.loan_id,
            })?;
        if loan.status != LoanStatus::Paid.as_str() {
            total += contrib.amount;
        }
    }
    Ok(total)
}

/// Builds the account view: active capital plus one position per funded loan
/// with realized capital and interest from the group-level ledger.
pub async fn shareholder_account(
    db: &DatabaseConnection,
    shareholder_id: i64,
) -> Result<ShareholderAccount> {
    let shareholder = Shareholder::find_by_id(shareholder_id)
        .one(db)
        .await?
        .ok_or(Error::NotFound {
            entity: "shareholder",
            id: shareholder_id,
        })?;

    let contributions = Contribution::find()
        .filter(contribution::Column::ShareholderId.eq(shareholder_id))
        .order_by_asc(contribution::Column::LoanId)
        .all(db)
        .await?;

    let mut positions = Vec::with_capacity(contributions.len());
    let mut active = 0.0;

    for contrib in &contributions {
        let loan = Loan::find_by_id(contrib.loan_id)
            .one(db)
            .await?
            .ok_or(Error::NotFound {
                entity: "loan",
                id: contrib.loan_id,
            })?;
        if loan.status != LoanStatus::Paid.as_str() {
            active += contrib.amount;
        }

        let ratio = contrib.amount / loan.principal;
        let mut capital_recovered = 0.0;
        let mut interest_earned = 0.0;

        let account = CurrentAccount::find()
            .filter(current_account::Column::LoanId.eq(loan.id))
            .filter(current_account::Column::AccountType.eq("group"))
            .one(db)
            .await?;
        if let Some(account) = account {
            let paid = Installment::find()
                .filter(installment::Column::AccountId.eq(account.id))
                .filter(installment::Column::Status.eq(InstallmentState::Paid.as_str()))
                .all(db)
                .await?;
            for inst in &paid {
                let (capital, interest) = split_installment(&loan, inst.amount, ratio);
                capital_recovered += capital;
                interest_earned += interest;
            }
        }

        positions.push(LoanPosition {
            loan,
            contribution_amount: contrib.amount,
            capital_recovered,
            interest_earned,
        });
    }

    Ok(ShareholderAccount {
        shareholder,
        active_capital: active,
        positions,
    })
}
