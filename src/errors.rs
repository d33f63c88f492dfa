//! Unified error types for the lending engine.
//!
//! Every domain operation returns `Result<T>` with a typed failure; validation
//! errors are raised before any write so callers never observe partial state.

use thiserror::Error;

/// Unified error type covering validation, domain, and infrastructure failures.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration loading or parsing failure
    #[error("Configuration error: {message}")]
    Config {
        /// Human-readable description of what went wrong
        message: String,
    },

    /// Database error from `SeaORM`
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Principal or payment amount is non-positive or not finite
    #[error("Invalid amount: {amount}")]
    InvalidAmount {
        /// The rejected amount
        amount: f64,
    },

    /// Installment count outside the allowed [2, 6] range
    #[error("Invalid installment count: {count} (must be between 2 and 6)")]
    InvalidInstallmentCount {
        /// The rejected count
        count: i32,
    },

    /// Contribution or member-share amounts do not sum to the loan principal
    #[error("Contributions sum to {actual} but the principal is {expected}")]
    ContributionMismatch {
        /// The principal the amounts must sum to
        expected: f64,
        /// The actual sum of the supplied amounts
        actual: f64,
    },

    /// No installment with the given number exists on the account
    #[error("Installment {number} not found on account {account_id}")]
    InstallmentNotFound {
        /// Account the lookup ran against
        account_id: i64,
        /// The missing installment number
        number: i32,
    },

    /// Payment attempted against an installment already settled in full
    #[error("Installment {number} is already paid")]
    AlreadyPaid {
        /// The installment number
        number: i32,
    },

    /// Group cannot receive a loan (empty, or members not all approved)
    #[error("Group {group_id} is not eligible for a loan: {reason}")]
    GroupNotEligible {
        /// The group that failed the gate
        group_id: i64,
        /// Why the group failed
        reason: String,
    },

    /// Person already belongs to another group; reassignment must be forced
    #[error("Person {person_id} already belongs to group {group_id}")]
    PersonAlreadyInGroup {
        /// The person being reassigned
        person_id: i64,
        /// Their current group
        group_id: i64,
    },

    /// An active current account already exists for this owner
    #[error("An active current account already exists for {owner}")]
    AccountExists {
        /// Description of the owner ("person 3" / "group 7")
        owner: String,
    },

    /// A person with this national ID is already registered
    #[error("National ID {national_id} is already registered")]
    DuplicateNationalId {
        /// The duplicated national ID
        national_id: String,
    },

    /// Referenced entity does not exist
    #[error("{entity} {id} not found")]
    NotFound {
        /// Entity kind ("person", "group", "loan", "account", "shareholder")
        entity: &'static str,
        /// The missing id
        id: i64,
    },
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
