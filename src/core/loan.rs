//! Loan origination and status refresh.
//!
//! Originating a loan is one atomic transaction: the loan row, shareholder
//! contributions, member sub-shares, the group-level current account, and one
//! person-level current account per member are created together or not at
//! all. All validation runs before the first write.

use crate::{
    core::{
        contribution::{ContributionInput, MemberShareInput, allocate_contributions, allocate_member_shares},
        group::eligible_members,
        ledger::{AccountOwner, open_account},
        schedule::{compute_schedule, installment_due_dates},
        status::{LoanStatus, derive_loan_status},
    },
    entities::{CurrentAccount, Installment, Loan, current_account, installment, loan},
    errors::{Error, Result},
};
use chrono::{NaiveDate, Utc};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::info;

/// Everything needed to originate a loan against a group.
#[derive(Debug, Clone)]
pub struct LoanApplication {
    /// Group the loan is originated against
    pub group_id: i64,
    /// Principal amount (> 0)
    pub principal: f64,
    /// Number of installments (2 to 6)
    pub installment_count: i32,
    /// Fixed nominal rate per installment
    pub rate_per_installment: f64,
    /// Loan start date; installments fall due monthly after it
    pub start_date: NaiveDate,
    /// Shareholder funding split; must sum to the principal
    pub contributions: Vec<ContributionInput>,
    /// Optional per-member sub-split; empty means an equal split
    pub member_amounts: Vec<MemberShareInput>,
}

/// The result of a successful origination.
#[derive(Debug, Clone)]
pub struct LoanOrigination {
    /// The created loan
    pub loan: loan::Model,
    /// The group-level account with its schedule
    pub group_account: current_account::Model,
    /// The group-level installments
    pub group_installments: Vec<installment::Model>,
    /// One person-level account (with schedule) per member
    pub member_accounts: Vec<(current_account::Model, Vec<installment::Model>)>,
}

/// Originates a loan, creating the loan, both principal partitions, and all
/// current accounts in a single transaction.
///
/// # Errors
/// * [`Error::GroupNotEligible`] when the group is empty or a member is not approved
/// * [`Error::InvalidAmount`] / [`Error::InvalidInstallmentCount`] for bad terms
/// * [`Error::ContributionMismatch`] when either partition misses the principal
/// * [`Error::AccountExists`] when an owner already holds an active account
pub async fn originate_loan(
    db: &DatabaseConnection,
    application: LoanApplication,
) -> Result<LoanOrigination> {
    let schedule = compute_schedule(
        application.principal,
        application.installment_count,
        application.rate_per_installment,
    )?;
    let due_dates = installment_due_dates(application.start_date, application.installment_count)?;

    let members = eligible_members(db, application.group_id).await?;

    // Member sub-split: supplied explicitly, or an equal division of the principal
    let member_shares: Vec<MemberShareInput> = if application.member_amounts.is_empty() {
        // Cast safety: group sizes are small
        #[allow(clippy::cast_precision_loss)]
        let equal_share = application.principal / members.len() as f64;
        members
            .iter()
            .map(|m| MemberShareInput {
                person_id: m.id,
                amount: equal_share,
            })
            .collect()
    } else {
        for share in &application.member_amounts {
            if !members.iter().any(|m| m.id == share.person_id) {
                return Err(Error::Config {
                    message: format!(
                        "person {} is not a member of group {}",
                        share.person_id, application.group_id
                    ),
                });
            }
        }
        application.member_amounts.clone()
    };

    let txn = db.begin().await?;

    let loan = loan::ActiveModel {
        group_id: Set(application.group_id),
        principal: Set(application.principal),
        installment_count: Set(application.installment_count),
        rate_per_installment: Set(application.rate_per_installment),
        start_date: Set(application.start_date),
        status: Set(LoanStatus::Active.as_str().to_string()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    allocate_contributions(&txn, loan.id, application.principal, &application.contributions)
        .await?;
    allocate_member_shares(&txn, loan.id, application.principal, &member_shares).await?;

    let (group_account, group_installments) = open_account(
        &txn,
        AccountOwner::Group(application.group_id),
        loan.id,
        schedule.total_payable,
        schedule.per_installment_amount,
        &due_dates,
    )
    .await?;

    let mut member_accounts = Vec::with_capacity(member_shares.len());
    for share in &member_shares {
        let member_schedule = compute_schedule(
            share.amount,
            application.installment_count,
            application.rate_per_installment,
        )?;
        let account = open_account(
            &txn,
            AccountOwner::Person(share.person_id),
            loan.id,
            member_schedule.total_payable,
            member_schedule.per_installment_amount,
            &due_dates,
        )
        .await?;
        member_accounts.push(account);
    }

    txn.commit().await?;

    info!(
        loan_id = loan.id,
        group_id = application.group_id,
        principal = application.principal,
        installments = application.installment_count,
        "loan originated"
    );

    Ok(LoanOrigination {
        loan,
        group_account,
        group_installments,
        member_accounts,
    })
}

/// Finds a loan by its unique ID.
pub async fn get_loan_by_id(db: &DatabaseConnection, loan_id: i64) -> Result<Option<loan::Model>> {
    Loan::find_by_id(loan_id).one(db).await.map_err(Into::into)
}

/// Retrieves all loans, newest first.
pub async fn get_all_loans(db: &DatabaseConnection) -> Result<Vec<loan::Model>> {
    Loan::find()
        .order_by_desc(loan::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves the loans originated against a group, newest first.
pub async fn get_loans_for_group(
    db: &DatabaseConnection,
    group_id: i64,
) -> Result<Vec<loan::Model>> {
    Loan::find()
        .filter(loan::Column::GroupId.eq(group_id))
        .order_by_desc(loan::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Re-derives a loan's status from its group-level ledger and persists it.
///
/// `Paid` when every installment is settled, `Mora` when any is overdue,
/// otherwise `Active`. Intended to run after payments and reschedules.
pub async fn refresh_loan_status(db: &DatabaseConnection, loan_id: i64) -> Result<loan::Model> {
    let loan = Loan::find_by_id(loan_id)
        .one(db)
        .await?
        .ok_or(Error::NotFound {
            entity: "loan",
            id: loan_id,
        })?;

    let account = CurrentAccount::find()
        .filter(current_account::Column::LoanId.eq(loan_id))
        .filter(current_account::Column::AccountType.eq("group"))
        .one(db)
        .await?
        .ok_or(Error::Config {
            message: format!("loan {loan_id} has no group-level account"),
        })?;

    let installments = Installment::find()
        .filter(installment::Column::AccountId.eq(account.id))
        .all(db)
        .await?;

    let derived = derive_loan_status(&installments, Utc::now().date_naive());
    if loan.status == derived.as_str() {
        return Ok(loan);
    }

    info!(loan_id, from = %loan.status, to = derived.as_str(), "loan status refreshed");
    let mut model: loan::ActiveModel = loan.into();
    model.status = Set(derived.as_str().to_string());
    model.update(db).await.map_err(Into::into)
}
