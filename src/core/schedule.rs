//! Money and amortization math.
//!
//! All installments are equal-sized; there is no declining-balance
//! amortization. The functions here are pure and carry full floating-point
//! precision internally so equal installments never drift - rounding is the
//! presentation layer's concern.

use crate::errors::{Error, Result};
use chrono::{Months, NaiveDate};

/// Minimum number of installments a loan may have
pub const MIN_INSTALLMENTS: i32 = 2;
/// Maximum number of installments a loan may have
pub const MAX_INSTALLMENTS: i32 = 6;

/// An amortization schedule computed from principal, count, and rate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Schedule {
    /// Total amount payable: `principal * (1 + rate * installments)`
    pub total_payable: f64,
    /// Fixed amount of each installment: `total_payable / installments`
    pub per_installment_amount: f64,
}

/// Computes the amortization schedule for a loan.
///
/// `total_payable = principal * (1 + rate_per_installment * installments)`;
/// every installment is an equal share of the total.
///
/// # Errors
/// * [`Error::InvalidAmount`] if the principal is not finite or not positive
/// * [`Error::InvalidInstallmentCount`] if `installments` is outside `[2, 6]`
pub fn compute_schedule(
    principal: f64,
    installments: i32,
    rate_per_installment: f64,
) -> Result<Schedule> {
    if !principal.is_finite() || principal <= 0.0 {
        return Err(Error::InvalidAmount { amount: principal });
    }

    if !(MIN_INSTALLMENTS..=MAX_INSTALLMENTS).contains(&installments) {
        return Err(Error::InvalidInstallmentCount {
            count: installments,
        });
    }

    let total_payable = principal * (1.0 + rate_per_installment * f64::from(installments));
    let per_installment_amount = total_payable / f64::from(installments);

    Ok(Schedule {
        total_payable,
        per_installment_amount,
    })
}

/// The principal component of one equal installment: `principal / installments`.
/// The remainder of the installment amount is interest.
#[must_use]
pub fn principal_component(principal: f64, installments: i32) -> f64 {
    principal / f64::from(installments)
}

/// Generates the due dates for a schedule: one per installment, at monthly
/// intervals starting one month after the loan start date.
///
/// # Errors
/// Returns a configuration error if a due date would overflow the calendar
/// (only possible for absurd start dates).
pub fn installment_due_dates(start_date: NaiveDate, installments: i32) -> Result<Vec<NaiveDate>> {
    if !(MIN_INSTALLMENTS..=MAX_INSTALLMENTS).contains(&installments) {
        return Err(Error::InvalidInstallmentCount {
            count: installments,
        });
    }

    // Cast safety: installments ∈ [2, 6]
    #[allow(clippy::cast_sign_loss)]
    (1..=installments as u32)
        .map(|k| {
            start_date
                .checked_add_months(Months::new(k))
                .ok_or_else(|| Error::Config {
                    message: format!("due date overflow adding {k} months to {start_date}"),
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::errors::Error;

    #[test]
    fn test_compute_schedule_basic() {
        let schedule = compute_schedule(1000.0, 4, 0.15).unwrap();
        assert_eq!(schedule.total_payable, 1600.0);
        assert_eq!(schedule.per_installment_amount, 400.0);
    }

    #[test]
    fn test_compute_schedule_sum_matches_total() {
        for n in MIN_INSTALLMENTS..=MAX_INSTALLMENTS {
            let schedule = compute_schedule(1234.56, n, 0.15).unwrap();
            let sum = schedule.per_installment_amount * f64::from(n);
            assert!(
                (sum - schedule.total_payable).abs() < 1e-9,
                "installments should sum to the total for n={n}"
            );
            assert_eq!(
                schedule.total_payable,
                1234.56 * (1.0 + 0.15 * f64::from(n))
            );
        }
    }

    #[test]
    fn test_compute_schedule_rejects_non_positive_principal() {
        assert!(matches!(
            compute_schedule(0.0, 3, 0.15).unwrap_err(),
            Error::InvalidAmount { amount: 0.0 }
        ));
        assert!(matches!(
            compute_schedule(-500.0, 3, 0.15).unwrap_err(),
            Error::InvalidAmount { amount: -500.0 }
        ));
        assert!(matches!(
            compute_schedule(f64::NAN, 3, 0.15).unwrap_err(),
            Error::InvalidAmount { amount: _ }
        ));
        assert!(matches!(
            compute_schedule(f64::INFINITY, 3, 0.15).unwrap_err(),
            Error::InvalidAmount { amount: _ }
        ));
    }

    #[test]
    fn test_compute_schedule_rejects_bad_installment_count() {
        assert!(matches!(
            compute_schedule(1000.0, 1, 0.15).unwrap_err(),
            Error::InvalidInstallmentCount { count: 1 }
        ));
        assert!(matches!(
            compute_schedule(1000.0, 7, 0.15).unwrap_err(),
            Error::InvalidInstallmentCount { count: 7 }
        ));
        assert!(matches!(
            compute_schedule(1000.0, 0, 0.15).unwrap_err(),
            Error::InvalidInstallmentCount { count: 0 }
        ));
        assert!(matches!(
            compute_schedule(1000.0, -3, 0.15).unwrap_err(),
            Error::InvalidInstallmentCount { count: -3 }
        ));
    }

    #[test]
    fn test_principal_component() {
        assert_eq!(principal_component(1000.0, 4), 250.0);
        assert_eq!(principal_component(2000.0, 4), 500.0);
    }

    #[test]
    fn test_installment_due_dates_monthly() {
        let start = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
        let dates = installment_due_dates(start, 3).unwrap();
        assert_eq!(
            dates,
            vec![
                NaiveDate::from_ymd_opt(2025, 2, 15).unwrap(),
                NaiveDate::from_ymd_opt(2025, 3, 15).unwrap(),
                NaiveDate::from_ymd_opt(2025, 4, 15).unwrap(),
            ]
        );
    }

    #[test]
    fn test_installment_due_dates_clamps_short_months() {
        // Jan 31 + 1 month clamps to Feb 28 in a non-leap year
        let start = NaiveDate::from_ymd_opt(2025, 1, 31).unwrap();
        let dates = installment_due_dates(start, 2).unwrap();
        assert_eq!(dates[0], NaiveDate::from_ymd_opt(2025, 2, 28).unwrap());
        assert_eq!(dates[1], NaiveDate::from_ymd_opt(2025, 3, 31).unwrap());
    }

    #[test]
    fn test_installment_due_dates_rejects_bad_count() {
        let start = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
        assert!(installment_due_dates(start, 1).is_err());
        assert!(installment_due_dates(start, 7).is_err());
    }
}
