//! Shareholder contribution and member sub-split allocation.
//!
//! A loan's principal is partitioned twice, independently: once across the
//! funding shareholders and (optionally) once across the member borrowers.
//! Both partitions must sum to the principal within an absolute tolerance of
//! 0.01; the two need not mirror each other's granularity. Validation happens
//! before any row is written.

use crate::{
    entities::{Person, Shareholder, contribution, member_share},
    errors::{Error, Result},
};
use sea_orm::{ConnectionTrait, Set, prelude::*};

/// Absolute tolerance when comparing a partition's sum to the principal.
pub const AMOUNT_TOLERANCE: f64 = 0.01;

/// One shareholder's committed amount toward a loan principal.
#[derive(Debug, Clone, Copy)]
pub struct ContributionInput {
    /// Contributing shareholder
    pub shareholder_id: i64,
    /// Amount committed
    pub amount: f64,
}

/// One member's sub-share of a group loan principal.
#[derive(Debug, Clone, Copy)]
pub struct MemberShareInput {
    /// Member person
    pub person_id: i64,
    /// Principal amount allotted to this member
    pub amount: f64,
}

/// Validates that a set of amounts partitions the principal.
///
/// Each amount must be finite and positive; the sum must match the principal
/// within [`AMOUNT_TOLERANCE`].
///
/// # Errors
/// * [`Error::InvalidAmount`] for a non-finite or non-positive amount
/// * [`Error::ContributionMismatch`] when the sum misses the principal
pub fn validate_partition(principal: f64, amounts: &[f64]) -> Result<()> {
    for &amount in amounts {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(Error::InvalidAmount { amount });
        }
    }

    let actual: f64 = amounts.iter().sum();
    if (actual - principal).abs() > AMOUNT_TOLERANCE {
        return Err(Error::ContributionMismatch {
            expected: principal,
            actual,
        });
    }

    Ok(())
}

/// Validates and persists the shareholder contributions for a loan.
///
/// Every referenced shareholder must exist and the amounts must partition the
/// principal. Called inside the origination transaction so a failure leaves
/// no partial writes.
pub async fn allocate_contributions<C>(
    db: &C,
    loan_id: i64,
    principal: f64,
    contributions: &[ContributionInput],
) -> Result<Vec<contribution::Model>>
where
    C: ConnectionTrait,
{
    let amounts: Vec<f64> = contributions.iter().map(|c| c.amount).collect();
    validate_partition(principal, &amounts)?;

    for input in contributions {
        Shareholder::find_by_id(input.shareholder_id)
            .one(db)
            .await?
            .ok_or(Error::NotFound {
                entity: "shareholder",
                id: input.shareholder_id,
            })?;
    }

    let mut created = Vec::with_capacity(contributions.len());
    for input in contributions {
        let model = contribution::ActiveModel {
            loan_id: Set(loan_id),
            shareholder_id: Set(input.shareholder_id),
            amount: Set(input.amount),
            ..Default::default()
        };
        created.push(model.insert(db).await?);
    }

    Ok(created)
}

/// Validates and persists the per-member sub-split of a group loan.
///
/// Applies the same partition rule as [`allocate_contributions`] but against
/// member persons, and independently of the shareholder split.
pub async fn allocate_member_shares<C>(
    db: &C,
    loan_id: i64,
    principal: f64,
    shares: &[MemberShareInput],
) -> Result<Vec<member_share::Model>>
where
    C: ConnectionTrait,
{
    let amounts: Vec<f64> = shares.iter().map(|s| s.amount).collect();
    validate_partition(principal, &amounts)?;

    for input in shares {
        Person::find_by_id(input.person_id)
            .one(db)
            .await?
            .ok_or(Error::NotFound {
                entity: "person",
                id: input.person_id,
            })?;
    }

    let mut created = Vec::with_capacity(shares.len());
    for input in shares {
        let model = member_share::ActiveModel {
            loan_id: Set(loan_id),
            person_id: Set(input.person_id),
            amount: Set(input.amount),
            ..Default::default()
        };
        created.push(model.insert(db).await?);
    }

    Ok(created)
}
