//! Status derivation for persons, groups, loans, and installments.
//!
//! Statuses are stored as strings in the database and converted here to
//! explicit enums. Person status is never stored at all: it is derived from
//! the verification flags unless a manual override is set, and the override
//! is never auto-cleared - it must be reset explicitly.

use crate::entities::{installment, person};
use chrono::{Datelike, NaiveDate};

/// Derived status of a person.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersonStatus {
    /// Not all verification flags passed yet
    Pending,
    /// All six verification flags passed with no rejection markers
    Approved,
    /// At least one explicit rejection marker set
    Rejected,
}

impl PersonStatus {
    /// String form stored in the `status_override` column.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
        }
    }

    /// Parses the stored string form; unknown values yield `None`.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Pending" => Some(Self::Pending),
            "Approved" => Some(Self::Approved),
            "Rejected" => Some(Self::Rejected),
            _ => None,
        }
    }
}

/// Financial standing of a person.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FinancialStatus {
    /// No information yet
    #[default]
    Unknown,
    /// Good standing
    Good,
    /// Bad standing
    Bad,
}

impl FinancialStatus {
    /// String form stored in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unknown => "Unknown",
            Self::Good => "Good",
            Self::Bad => "Bad",
        }
    }

    /// Parses the stored string form; unknown values yield `None`.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Unknown" => Some(Self::Unknown),
            "Good" => Some(Self::Good),
            "Bad" => Some(Self::Bad),
            _ => None,
        }
    }
}

/// Externally mutated workflow status of a credit group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupStatus {
    /// Newly created, verification incomplete
    Pending,
    /// Every member approved, no loan yet
    Approved,
    /// Group rejected during verification
    Rejected,
    /// Active without a running loan
    Active,
    /// Active with a running loan
    ActiveLoan,
    /// In arrears
    Moroso,
    /// No longer operating
    Inactive,
}

impl GroupStatus {
    /// String form stored in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
            Self::Active => "Active",
            Self::ActiveLoan => "Active Loan",
            Self::Moroso => "Moroso",
            Self::Inactive => "Inactive",
        }
    }

    /// Parses the stored string form; unknown values yield `None`.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Pending" => Some(Self::Pending),
            "Approved" => Some(Self::Approved),
            "Rejected" => Some(Self::Rejected),
            "Active" => Some(Self::Active),
            "Active Loan" => Some(Self::ActiveLoan),
            "Moroso" => Some(Self::Moroso),
            "Inactive" => Some(Self::Inactive),
            _ => None,
        }
    }
}

/// Status of a loan, derived from its group-level ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoanStatus {
    /// Installments outstanding, none overdue
    Active,
    /// Every installment settled in full
    Paid,
    /// At least one installment overdue
    Mora,
}

impl LoanStatus {
    /// String form stored in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Paid => "Paid",
            Self::Mora => "Mora",
        }
    }

    /// Parses the stored string form; unknown values yield `None`.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Active" => Some(Self::Active),
            "Paid" => Some(Self::Paid),
            "Mora" => Some(Self::Mora),
            _ => None,
        }
    }
}

/// Stored state of an installment. Overdue is a view, not a stored state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallmentState {
    /// Nothing paid yet
    Pending,
    /// Partially paid
    Partial,
    /// Settled in full
    Paid,
}

impl InstallmentState {
    /// String form stored in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Partial => "partial",
            Self::Paid => "paid",
        }
    }

    /// Parses the stored string form; unknown values yield `None`.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "partial" => Some(Self::Partial),
            "paid" => Some(Self::Paid),
            _ => None,
        }
    }
}

/// The six verification checks plus their explicit rejection markers.
#[derive(Debug, Clone, Copy, Default)]
pub struct VerificationFlags {
    /// Identity documents verified
    pub id_docs: bool,
    /// Service bill verified
    pub service_bill: bool,
    /// Guarantor verified
    pub guarantor: bool,
    /// Financial standing verified
    pub financial: bool,
    /// Application folder complete
    pub full_folder: bool,
    /// General verification passed
    pub general: bool,
    /// Identity documents rejected
    pub id_docs_rejected: bool,
    /// Service bill rejected
    pub service_bill_rejected: bool,
    /// Guarantor rejected
    pub guarantor_rejected: bool,
    /// Financial standing rejected
    pub financial_rejected: bool,
    /// Application folder rejected
    pub full_folder_rejected: bool,
    /// General verification rejected
    pub general_rejected: bool,
}

impl VerificationFlags {
    /// Extracts the flag set from a person model.
    #[must_use]
    pub const fn from_person(person: &person::Model) -> Self {
        Self {
            id_docs: person.id_docs_checked,
            service_bill: person.service_bill_checked,
            guarantor: person.guarantor_checked,
            financial: person.financial_checked,
            full_folder: person.full_folder_checked,
            general: person.general_checked,
            id_docs_rejected: person.id_docs_rejected,
            service_bill_rejected: person.service_bill_rejected,
            guarantor_rejected: person.guarantor_rejected,
            financial_rejected: person.financial_rejected,
            full_folder_rejected: person.full_folder_rejected,
            general_rejected: person.general_rejected,
        }
    }

    /// True when every check passed.
    #[must_use]
    pub const fn all_checked(&self) -> bool {
        self.id_docs
            && self.service_bill
            && self.guarantor
            && self.financial
            && self.full_folder
            && self.general
    }

    /// True when any explicit rejection marker is set.
    #[must_use]
    pub const fn any_rejected(&self) -> bool {
        self.id_docs_rejected
            || self.service_bill_rejected
            || self.guarantor_rejected
            || self.financial_rejected
            || self.full_folder_rejected
            || self.general_rejected
    }
}

/// Derives a person's status from their flags and optional manual override.
///
/// The override, when present, wins unconditionally. Otherwise: `Rejected` if
/// any rejection marker is set, `Approved` if all six checks passed, else
/// `Pending`.
#[must_use]
pub fn derive_person_status(
    flags: &VerificationFlags,
    manual_override: Option<PersonStatus>,
) -> PersonStatus {
    if let Some(status) = manual_override {
        return status;
    }

    if flags.any_rejected() {
        PersonStatus::Rejected
    } else if flags.all_checked() {
        PersonStatus::Approved
    } else {
        PersonStatus::Pending
    }
}

/// Convenience wrapper deriving a person model's displayed status.
#[must_use]
pub fn person_status(person: &person::Model) -> PersonStatus {
    let manual_override = person
        .status_override
        .as_deref()
        .and_then(PersonStatus::parse);
    derive_person_status(&VerificationFlags::from_person(person), manual_override)
}

/// True when the installment is unpaid and its due date has passed.
#[must_use]
pub fn is_overdue(installment: &installment::Model, today: NaiveDate) -> bool {
    installment.status != InstallmentState::Paid.as_str() && installment.due_date < today
}

/// Derives a loan's status from its group-level ledger: `Paid` when every
/// installment is settled, `Mora` when any is overdue, otherwise `Active`.
#[must_use]
pub fn derive_loan_status(installments: &[installment::Model], today: NaiveDate) -> LoanStatus {
    if installments
        .iter()
        .all(|i| i.status == InstallmentState::Paid.as_str())
    {
        return LoanStatus::Paid;
    }

    if installments.iter().any(|i| is_overdue(i, today)) {
        LoanStatus::Mora
    } else {
        LoanStatus::Active
    }
}

/// True when `date` falls in the same calendar month as `today`.
#[must_use]
pub fn same_calendar_month(date: NaiveDate, today: NaiveDate) -> bool {
    date.year() == today.year() && date.month() == today.month()
}
