//! Core business logic - framework-agnostic lending operations.
//!
//! Pure computations (amortization, status derivation, date-window filtering,
//! profit math) are synchronous; everything touching the database is async
//! and returns `Result` with typed domain errors.

/// Shareholder contribution and member sub-split allocation
pub mod contribution;
/// Credit group management and derived aggregates
pub mod group;
/// Installment ledger: accounts, payments, reschedules, date filters
pub mod ledger;
/// Loan origination and status refresh
pub mod loan;
/// Person management: identity, verification flags, group membership
pub mod person;
/// Shareholder profit projection (realized and projected)
pub mod profit;
/// Money and amortization math
pub mod schedule;
/// Shareholder management and account summaries
pub mod shareholder;
/// Status derivation for persons, groups, loans, and installments
pub mod status;
