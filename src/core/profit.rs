//! Shareholder profit projection.
//!
//! For each contribution the shareholder's ratio within the loan is
//! `contribution / principal`. Every settled (realized) or outstanding
//! (projected) installment is split into a capital component - the ratio's
//! share of `principal / installment_count` - and an interest component, the
//! ratio's share of the rest. Projections read the group-level account only;
//! person-level accounts mirror the member sub-schedules and would double
//! count. Nothing is cached: every query recomputes against the requested
//! window.

use crate::{
    core::{schedule::principal_component, status::InstallmentState},
    entities::{
        Contribution, CurrentAccount, Installment, Loan, Shareholder, contribution,
        current_account, installment, loan, shareholder,
    },
    errors::Result,
};
use chrono::NaiveDate;
use sea_orm::{QueryOrder, prelude::*};
use std::collections::BTreeMap;

/// Whether to report collected interest or expected interest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectionMode {
    /// Paid installments, filtered by payment date
    Realized,
    /// Unpaid installments, filtered by due date
    Projected,
}

/// An optionally bounded, inclusive calendar date range.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateRange {
    /// First day included, if bounded
    pub start: Option<NaiveDate>,
    /// Last day included, if bounded
    pub end: Option<NaiveDate>,
}

impl DateRange {
    /// An unbounded range containing every date.
    #[must_use]
    pub const fn unbounded() -> Self {
        Self {
            start: None,
            end: None,
        }
    }

    /// True when the date falls inside the range.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.is_none_or(|s| date >= s) && self.end.is_none_or(|e| date <= e)
    }
}

/// One installment's contribution to a shareholder's return.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfitDetail {
    /// Loan the installment belongs to
    pub loan_id: i64,
    /// Installment number within the group-level account
    pub installment_number: i32,
    /// Payment date (realized) or due date (projected)
    pub date: NaiveDate,
    /// Capital returned to the shareholder by this installment
    pub capital_recovered: f64,
    /// Interest earned by the shareholder on this installment
    pub interest_earned: f64,
}

/// Aggregated realized or projected returns for one shareholder.
#[derive(Debug, Clone, PartialEq)]
pub struct ShareholderProfitRow {
    /// The shareholder
    pub shareholder: shareholder::Model,
    /// Sum of capital recovered across the matched installments
    pub total_capital_recovered: f64,
    /// Sum of interest earned across the matched installments
    pub total_profit: f64,
    /// Per-installment breakdown for drill-down
    pub details: Vec<ProfitDetail>,
}

/// Splits one installment into (capital, interest) for a contribution ratio.
///
/// The capital component of an equal installment is `principal / count`; the
/// remainder of the installment amount is interest. Both are scaled by the
/// shareholder's ratio.
#[must_use]
pub fn split_installment(
    loan: &loan::Model,
    installment_amount: f64,
    ratio: f64,
) -> (f64, f64) {
    let capital_share = principal_component(loan.principal, loan.installment_count);
    let capital = capital_share * ratio;
    let interest = (installment_amount - capital_share) * ratio;
    (capital, interest)
}

/// Computes per-shareholder profit rows across all loans.
///
/// Realized mode matches paid installments by payment date; projected mode
/// matches unpaid installments by due date. Shareholders with no matching
/// installments are omitted.
pub async fn project(
    db: &DatabaseConnection,
    mode: ProjectionMode,
    range: DateRange,
) -> Result<Vec<ShareholderProfitRow>> {
    let loans = Loan::find().all(db).await?;

    // shareholder id -> accumulated row, ordered for deterministic output
    let mut accumulated: BTreeMap<i64, (f64, f64, Vec<ProfitDetail>)> = BTreeMap::new();

    for loan in &loans {
        let contributions = Contribution::find()
            .filter(contribution::Column::LoanId.eq(loan.id))
            .all(db)
            .await?;
        if contributions.is_empty() {
            continue;
        }

        let Some(account) = CurrentAccount::find()
            .filter(current_account::Column::LoanId.eq(loan.id))
            .filter(current_account::Column::AccountType.eq("group"))
            .one(db)
            .await?
        else {
            continue;
        };

        let installments = Installment::find()
            .filter(installment::Column::AccountId.eq(account.id))
            .order_by_asc(installment::Column::Number)
            .all(db)
            .await?;

        let matched: Vec<(&installment::Model, NaiveDate)> = installments
            .iter()
            .filter_map(|inst| match mode {
                ProjectionMode::Realized => {
                    if inst.status == InstallmentState::Paid.as_str() {
                        inst.paid_date.filter(|d| range.contains(*d)).map(|d| (inst, d))
                    } else {
                        None
                    }
                }
                ProjectionMode::Projected => {
                    if inst.status == InstallmentState::Paid.as_str() {
                        None
                    } else if range.contains(inst.due_date) {
                        Some((inst, inst.due_date))
                    } else {
                        None
                    }
                }
            })
            .collect();

        for contrib in &contributions {
            let ratio = contrib.amount / loan.principal;
            let entry = accumulated
                .entry(contrib.shareholder_id)
                .or_insert_with(|| (0.0, 0.0, Vec::new()));

            for (inst, date) in &matched {
                let (capital, interest) = split_installment(loan, inst.amount, ratio);
                entry.0 += capital;
                entry.1 += interest;
                entry.2.push(ProfitDetail {
                    loan_id: loan.id,
                    installment_number: inst.number,
                    date: *date,
                    capital_recovered: capital,
                    interest_earned: interest,
                });
            }
        }
    }

    let mut rows = Vec::new();
    for (shareholder_id, (total_capital, total_profit, details)) in accumulated {
        if details.is_empty() {
            continue;
        }
        let Some(shareholder) = Shareholder::find_by_id(shareholder_id).one(db).await? else {
            continue;
        };
        rows.push(ShareholderProfitRow {
            shareholder,
            total_capital_recovered: total_capital,
            total_profit,
            details,
        });
    }

    rows.sort_by(|a, b| a.shareholder.full_name.cmp(&b.shareholder.full_name));
    Ok(rows)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::core::{
        contribution::ContributionInput,
        ledger::{PaymentMethod, apply_payment},
        loan::{LoanApplication, originate_loan},
    };
    use crate::test_utils::{
        create_approved_person, create_test_group, create_test_shareholder, setup_test_db,
    };

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    /// Loan of 1000 over 4 installments at 0.15, funded 600/400.
    async fn setup_projection_scenario(
        db: &DatabaseConnection,
    ) -> Result<(crate::core::loan::LoanOrigination, i64, i64)> {
        let group = create_test_group(db, "Group A").await?;
        create_approved_person(db, "Ana", "1001", group.id).await?;
        create_approved_person(db, "Beatriz", "1002", group.id).await?;
        let s1 = create_test_shareholder(db, "Major Holder").await?;
        let s2 = create_test_shareholder(db, "Minor Holder").await?;

        let origination = originate_loan(
            db,
            LoanApplication {
                group_id: group.id,
                principal: 1000.0,
                installment_count: 4,
                rate_per_installment: 0.15,
                start_date: d(2025, 1, 15),
                contributions: vec![
                    ContributionInput {
                        shareholder_id: s1.id,
                        amount: 600.0,
                    },
                    ContributionInput {
                        shareholder_id: s2.id,
                        amount: 400.0,
                    },
                ],
                member_amounts: vec![],
            },
        )
        .await?;

        Ok((origination, s1.id, s2.id))
    }

    #[test]
    fn test_split_installment() {
        let loan = loan::Model {
            id: 1,
            group_id: 1,
            principal: 1000.0,
            installment_count: 4,
            rate_per_installment: 0.15,
            start_date: d(2025, 1, 15),
            status: "Active".to_string(),
        };

        // Installment amount 400, principal component 250
        let (capital, interest) = split_installment(&loan, 400.0, 0.6);
        assert_close(capital, 150.0);
        assert_close(interest, 90.0);

        let (capital, interest) = split_installment(&loan, 400.0, 0.4);
        assert_close(capital, 100.0);
        assert_close(interest, 60.0);
    }

    #[tokio::test]
    async fn test_realized_projection_after_one_payment() -> Result<()> {
        let db = setup_test_db().await?;
        let (origination, s1, s2) = setup_projection_scenario(&db).await?;

        apply_payment(
            &db,
            origination.group_account.id,
            1,
            d(2025, 2, 15),
            PaymentMethod::Cash,
            None,
        )
        .await?;

        let rows = project(&db, ProjectionMode::Realized, DateRange::unbounded()).await?;
        assert_eq!(rows.len(), 2);

        let major = rows.iter().find(|r| r.shareholder.id == s1).unwrap();
        assert_close(major.total_capital_recovered, 150.0);
        assert_close(major.total_profit, 90.0);
        assert_eq!(major.details.len(), 1);
        assert_eq!(major.details[0].installment_number, 1);
        assert_eq!(major.details[0].date, d(2025, 2, 15));

        let minor = rows.iter().find(|r| r.shareholder.id == s2).unwrap();
        assert_close(minor.total_capital_recovered, 100.0);
        assert_close(minor.total_profit, 60.0);

        Ok(())
    }

    #[tokio::test]
    async fn test_projected_mode_covers_unpaid_installments() -> Result<()> {
        let db = setup_test_db().await?;
        let (origination, s1, _) = setup_projection_scenario(&db).await?;

        apply_payment(
            &db,
            origination.group_account.id,
            1,
            d(2025, 2, 15),
            PaymentMethod::Cash,
            None,
        )
        .await?;

        let rows = project(&db, ProjectionMode::Projected, DateRange::unbounded()).await?;
        let major = rows.iter().find(|r| r.shareholder.id == s1).unwrap();

        // Three unpaid installments remain: 3 * 150 capital, 3 * 90 interest
        assert_eq!(major.details.len(), 3);
        assert_close(major.total_capital_recovered, 450.0);
        assert_close(major.total_profit, 270.0);

        Ok(())
    }

    #[tokio::test]
    async fn test_realized_respects_date_range() -> Result<()> {
        let db = setup_test_db().await?;
        let (origination, _, _) = setup_projection_scenario(&db).await?;

        apply_payment(
            &db,
            origination.group_account.id,
            1,
            d(2025, 2, 15),
            PaymentMethod::Cash,
            None,
        )
        .await?;

        // Window that misses the payment date
        let range = DateRange {
            start: Some(d(2025, 3, 1)),
            end: Some(d(2025, 3, 31)),
        };
        let rows = project(&db, ProjectionMode::Realized, range).await?;
        assert!(rows.is_empty());

        // Window that covers it
        let range = DateRange {
            start: Some(d(2025, 2, 1)),
            end: Some(d(2025, 2, 28)),
        };
        let rows = project(&db, ProjectionMode::Realized, range).await?;
        assert_eq!(rows.len(), 2);

        Ok(())
    }

    #[tokio::test]
    async fn test_projected_mode_filters_by_due_date() -> Result<()> {
        let db = setup_test_db().await?;
        let (_, s1, _) = setup_projection_scenario(&db).await?;

        // Due dates are Feb 15 .. May 15; a March window matches exactly one
        let range = DateRange {
            start: Some(d(2025, 3, 1)),
            end: Some(d(2025, 3, 31)),
        };
        let rows = project(&db, ProjectionMode::Projected, range).await?;
        let major = rows.iter().find(|r| r.shareholder.id == s1).unwrap();
        assert_eq!(major.details.len(), 1);
        assert_eq!(major.details[0].installment_number, 2);
        assert_eq!(major.details[0].date, d(2025, 3, 15));

        Ok(())
    }

    #[tokio::test]
    async fn test_settlement_attribution_sixty_forty_split() -> Result<()> {
        // Loan 2000 over 4 at 0.15 funded 1200/800; settling one group
        // installment of 800 recovers 300/200 of capital.
        let db = setup_test_db().await?;
        let group = create_test_group(&db, "Group B").await?;
        create_approved_person(&db, "Carla", "2001", group.id).await?;
        create_approved_person(&db, "Diana", "2002", group.id).await?;
        let s1 = create_test_shareholder(&db, "Holder A").await?;
        let s2 = create_test_shareholder(&db, "Holder B").await?;

        let origination = originate_loan(
            &db,
            LoanApplication {
                group_id: group.id,
                principal: 2000.0,
                installment_count: 4,
                rate_per_installment: 0.15,
                start_date: d(2025, 1, 15),
                contributions: vec![
                    ContributionInput {
                        shareholder_id: s1.id,
                        amount: 1200.0,
                    },
                    ContributionInput {
                        shareholder_id: s2.id,
                        amount: 800.0,
                    },
                ],
                member_amounts: vec![],
            },
        )
        .await?;

        apply_payment(
            &db,
            origination.group_account.id,
            1,
            d(2025, 2, 15),
            PaymentMethod::Transfer,
            None,
        )
        .await?;

        let rows = project(&db, ProjectionMode::Realized, DateRange::unbounded()).await?;
        let holder_a = rows.iter().find(|r| r.shareholder.id == s1.id).unwrap();
        let holder_b = rows.iter().find(|r| r.shareholder.id == s2.id).unwrap();

        assert_close(holder_a.total_capital_recovered, 300.0);
        assert_close(holder_b.total_capital_recovered, 200.0);
        // Installment 800, capital component 500, interest 300 split 0.6/0.4
        assert_close(holder_a.total_profit, 180.0);
        assert_close(holder_b.total_profit, 120.0);

        Ok(())
    }
}
