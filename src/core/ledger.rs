//! Installment ledger - current accounts, payment application, due-date
//! rescheduling, date-window queries, and recomputed-on-read aggregates.
//!
//! Mutations run inside a database transaction and re-validate state after
//! acquiring it, so a concurrent writer losing the race observes
//! `AlreadyPaid` instead of double-applying. Aggregates are always recomputed
//! from the installment rows; nothing is cached.

use crate::{
    core::status::{InstallmentState, is_overdue, same_calendar_month},
    entities::{
        CreditGroup, CurrentAccount, Installment, Person, SystemState, current_account,
        installment, system_state,
    },
    errors::{Error, Result},
};
use chrono::{Duration, NaiveDate, Utc};
use sea_orm::{ConnectionTrait, QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::{info, warn};

/// `system_state` key tracking the last issued receipt number.
const RECEIPT_COUNTER_KEY: &str = "last_receipt_number";

/// The owner of a current account: exactly one person or one group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountOwner {
    /// Person-level account
    Person(i64),
    /// Group-level account
    Group(i64),
}

impl AccountOwner {
    /// Short description used in error messages ("person 3" / "group 7").
    #[must_use]
    pub fn describe(self) -> String {
        match self {
            Self::Person(id) => format!("person {id}"),
            Self::Group(id) => format!("group {id}"),
        }
    }
}

/// How a payment was made.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentMethod {
    /// Cash payment
    Cash,
    /// Bank transfer
    Transfer,
}

impl PaymentMethod {
    /// String form recorded on receipts.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::Transfer => "transfer",
        }
    }
}

/// Value object describing a settled payment, for downstream presentation.
/// The engine does not render it.
#[derive(Debug, Clone, PartialEq)]
pub struct Receipt {
    /// Sequential receipt number
    pub number: i64,
    /// Date the payment was made
    pub date: NaiveDate,
    /// Amount settled by this payment
    pub amount: f64,
    /// Name of the paying person or group
    pub payer_name: String,
    /// Installment number settled
    pub installment_number: i32,
    /// How the payment was made
    pub payment_method: PaymentMethod,
}

/// Date-window predicates for installment queries.
///
/// `OverdueNow`, `DueWithinNext7Days`, and `DueThisCalendarMonth` implicitly
/// exclude already-paid installments; `All` and `DueInRange` do not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateWindow {
    /// Every installment
    All,
    /// Unpaid installments whose due date has passed
    OverdueNow,
    /// Unpaid installments due between today and today + 7 days, inclusive
    DueWithinNext7Days,
    /// Unpaid installments due in the current calendar month
    DueThisCalendarMonth,
    /// Installments due within an inclusive custom range, paid or not
    DueInRange {
        /// First day of the range
        start: NaiveDate,
        /// Last day of the range
        end: NaiveDate,
    },
}

/// Aggregates over an account's installments, recomputed on every read.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LedgerSummary {
    /// Sum of all amounts paid so far
    pub total_paid: f64,
    /// Sum of all unpaid remainders
    pub total_pending: f64,
    /// Number of installments not yet settled in full
    pub pending_count: usize,
    /// Number of unpaid installments past their due date
    pub overdue_count: usize,
}

/// Opens a current account with its installment schedule.
///
/// Enforces the single-account invariant: at most one active account may
/// exist per owner. Installment numbers are 1-based and equal-sized.
pub async fn open_account<C>(
    db: &C,
    owner: AccountOwner,
    loan_id: i64,
    total_amount: f64,
    per_installment_amount: f64,
    due_dates: &[NaiveDate],
) -> Result<(current_account::Model, Vec<installment::Model>)>
where
    C: ConnectionTrait,
{
    let existing = match owner {
        AccountOwner::Person(person_id) => {
            CurrentAccount::find()
                .filter(current_account::Column::PersonId.eq(person_id))
                .filter(current_account::Column::Status.eq("active"))
                .one(db)
                .await?
        }
        AccountOwner::Group(group_id) => {
            CurrentAccount::find()
                .filter(current_account::Column::GroupId.eq(group_id))
                .filter(current_account::Column::Status.eq("active"))
                .one(db)
                .await?
        }
    };
    if existing.is_some() {
        return Err(Error::AccountExists {
            owner: owner.describe(),
        });
    }

    let (account_type, person_id, group_id) = match owner {
        AccountOwner::Person(id) => ("person", Some(id), None),
        AccountOwner::Group(id) => ("group", None, Some(id)),
    };

    let account = current_account::ActiveModel {
        account_type: Set(account_type.to_string()),
        person_id: Set(person_id),
        group_id: Set(group_id),
        loan_id: Set(loan_id),
        total_amount: Set(total_amount),
        status: Set("active".to_string()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    let mut installments = Vec::with_capacity(due_dates.len());
    for (idx, due_date) in due_dates.iter().enumerate() {
        // Cast safety: installment counts are at most 6
        #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
        let number = (idx + 1) as i32;
        let row = installment::ActiveModel {
            account_id: Set(account.id),
            number: Set(number),
            amount: Set(per_installment_amount),
            due_date: Set(*due_date),
            status: Set(InstallmentState::Pending.as_str().to_string()),
            amount_paid: Set(0.0),
            paid_date: Set(None),
            observation: Set(None),
            ..Default::default()
        };
        installments.push(row.insert(db).await?);
    }

    info!(
        account_id = account.id,
        owner = %owner.describe(),
        installments = installments.len(),
        "opened current account"
    );
    Ok((account, installments))
}

/// Finds an account by its unique ID.
pub async fn get_account_by_id(
    db: &DatabaseConnection,
    account_id: i64,
) -> Result<Option<current_account::Model>> {
    CurrentAccount::find_by_id(account_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds the active account owned by a person, if any.
pub async fn get_account_for_person(
    db: &DatabaseConnection,
    person_id: i64,
) -> Result<Option<current_account::Model>> {
    CurrentAccount::find()
        .filter(current_account::Column::PersonId.eq(person_id))
        .filter(current_account::Column::Status.eq("active"))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds the active account owned by a group, if any.
pub async fn get_account_for_group(
    db: &DatabaseConnection,
    group_id: i64,
) -> Result<Option<current_account::Model>> {
    CurrentAccount::find()
        .filter(current_account::Column::GroupId.eq(group_id))
        .filter(current_account::Column::Status.eq("active"))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves all current accounts.
pub async fn get_all_accounts(db: &DatabaseConnection) -> Result<Vec<current_account::Model>> {
    CurrentAccount::find().all(db).await.map_err(Into::into)
}

/// Retrieves an account's installments ordered by installment number.
pub async fn get_installments(
    db: &DatabaseConnection,
    account_id: i64,
) -> Result<Vec<installment::Model>> {
    Installment::find()
        .filter(installment::Column::AccountId.eq(account_id))
        .order_by_asc(installment::Column::Number)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Settles the remaining balance of an installment and issues a receipt.
///
/// The whole remaining balance (`amount - amount_paid`) is applied in one
/// operation; the installment transitions to `paid` with `paid_date` set and
/// the observation recorded. Runs in a transaction and re-checks the status
/// after acquiring it, so a payment can never double-apply. A caller retrying
/// a settle re-validates and gets [`Error::AlreadyPaid`]; a writer losing a
/// truly concurrent race may instead see [`Error::Database`] (SQLite busy or
/// snapshot conflict) and must re-validate on retry, which then surfaces
/// [`Error::AlreadyPaid`].
pub async fn apply_payment(
    db: &DatabaseConnection,
    account_id: i64,
    installment_number: i32,
    paid_date: NaiveDate,
    payment_method: PaymentMethod,
    observation: Option<String>,
) -> Result<(installment::Model, Receipt)> {
    let txn = db.begin().await?;

    let account = CurrentAccount::find_by_id(account_id)
        .one(&txn)
        .await?
        .ok_or(Error::NotFound {
            entity: "account",
            id: account_id,
        })?;

    let row = Installment::find()
        .filter(installment::Column::AccountId.eq(account_id))
        .filter(installment::Column::Number.eq(installment_number))
        .one(&txn)
        .await?
        .ok_or(Error::InstallmentNotFound {
            account_id,
            number: installment_number,
        })?;

    if row.status == InstallmentState::Paid.as_str() {
        return Err(Error::AlreadyPaid {
            number: installment_number,
        });
    }

    let settled_amount = row.amount - row.amount_paid;
    let full_amount = row.amount;

    let mut model: installment::ActiveModel = row.into();
    model.amount_paid = Set(full_amount);
    model.status = Set(InstallmentState::Paid.as_str().to_string());
    model.paid_date = Set(Some(paid_date));
    model.observation = Set(observation);
    let updated = model.update(&txn).await?;

    let payer_name = resolve_payer_name(&txn, &account).await?;
    let receipt_number = next_receipt_number(&txn).await?;

    txn.commit().await?;

    info!(
        account_id,
        installment = installment_number,
        amount = settled_amount,
        receipt = receipt_number,
        "payment applied"
    );

    let receipt = Receipt {
        number: receipt_number,
        date: paid_date,
        amount: settled_amount,
        payer_name,
        installment_number,
        payment_method,
    };
    Ok((updated, receipt))
}

/// Moves an installment's due date. Allowed only while the installment is
/// not yet paid; the domain does not forbid moving a due date into the past,
/// but doing so is logged.
pub async fn reschedule_due_date(
    db: &DatabaseConnection,
    account_id: i64,
    installment_number: i32,
    new_due_date: NaiveDate,
) -> Result<installment::Model> {
    let txn = db.begin().await?;

    let row = Installment::find()
        .filter(installment::Column::AccountId.eq(account_id))
        .filter(installment::Column::Number.eq(installment_number))
        .one(&txn)
        .await?
        .ok_or(Error::InstallmentNotFound {
            account_id,
            number: installment_number,
        })?;

    if row.status == InstallmentState::Paid.as_str() {
        return Err(Error::AlreadyPaid {
            number: installment_number,
        });
    }

    if new_due_date < Utc::now().date_naive() {
        warn!(
            account_id,
            installment = installment_number,
            %new_due_date,
            "rescheduling installment into the past"
        );
    }

    let mut model: installment::ActiveModel = row.into();
    model.due_date = Set(new_due_date);
    let updated = model.update(&txn).await?;

    txn.commit().await?;
    Ok(updated)
}

/// Filters installments by a date window. Pure; `today` is passed explicitly
/// so queries run against a consistent snapshot.
#[must_use]
pub fn filter_by_date_window(
    installments: &[installment::Model],
    window: DateWindow,
    today: NaiveDate,
) -> Vec<installment::Model> {
    installments
        .iter()
        .filter(|inst| {
            let unpaid = inst.status != InstallmentState::Paid.as_str();
            match window {
                DateWindow::All => true,
                DateWindow::OverdueNow => is_overdue(inst, today),
                DateWindow::DueWithinNext7Days => {
                    unpaid
                        && inst.due_date >= today
                        && inst.due_date <= today + Duration::days(7)
                }
                DateWindow::DueThisCalendarMonth => {
                    unpaid && same_calendar_month(inst.due_date, today)
                }
                DateWindow::DueInRange { start, end } => {
                    inst.due_date >= start && inst.due_date <= end
                }
            }
        })
        .cloned()
        .collect()
}

/// Computes an account's aggregates from its installment rows.
#[must_use]
pub fn summarize(installments: &[installment::Model], today: NaiveDate) -> LedgerSummary {
    let total_paid = installments.iter().map(|i| i.amount_paid).sum();
    let total_pending = installments
        .iter()
        .map(|i| i.amount - i.amount_paid)
        .sum();
    let pending_count = installments
        .iter()
        .filter(|i| i.status != InstallmentState::Paid.as_str())
        .count();
    let overdue_count = installments
        .iter()
        .filter(|i| is_overdue(i, today))
        .count();

    LedgerSummary {
        total_paid,
        total_pending,
        pending_count,
        overdue_count,
    }
}

/// Lists settled installments ("collections") whose payment date falls within
/// the given inclusive range. Open bounds are allowed on either side.
pub async fn list_collections(
    db: &DatabaseConnection,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<Vec<installment::Model>> {
    let paid = Installment::find()
        .filter(installment::Column::Status.eq(InstallmentState::Paid.as_str()))
        .order_by_asc(installment::Column::PaidDate)
        .all(db)
        .await?;

    Ok(paid
        .into_iter()
        .filter(|inst| {
            inst.paid_date.is_some_and(|d| {
                start.is_none_or(|s| d >= s) && end.is_none_or(|e| d <= e)
            })
        })
        .collect())
}

/// Resolves the payer name from the account owner.
async fn resolve_payer_name<C>(db: &C, account: &current_account::Model) -> Result<String>
where
    C: ConnectionTrait,
{
    if let Some(person_id) = account.person_id {
        let person = Person::find_by_id(person_id)
            .one(db)
            .await?
            .ok_or(Error::NotFound {
                entity: "person",
                id: person_id,
            })?;
        return Ok(person.full_name);
    }

    if let Some(group_id) = account.group_id {
        let group = CreditGroup::find_by_id(group_id)
            .one(db)
            .await?
            .ok_or(Error::NotFound {
                entity: "group",
                id: group_id,
            })?;
        return Ok(group.name);
    }

    Err(Error::Config {
        message: format!("account {} has no owner", account.id),
    })
}

/// Increments and returns the sequential receipt number stored in
/// `system_state`.
async fn next_receipt_number<C>(db: &C) -> Result<i64>
where
    C: ConnectionTrait,
{
    let now = Utc::now().naive_utc();
    let existing = SystemState::find()
        .filter(system_state::Column::Key.eq(RECEIPT_COUNTER_KEY))
        .one(db)
        .await?;

    match existing {
        Some(state) => {
            let last: i64 = state.value.parse().map_err(|e| Error::Config {
                message: format!("Failed to parse receipt counter: {e}"),
            })?;
            let next = last + 1;
            let mut model: system_state::ActiveModel = state.into();
            model.value = Set(next.to_string());
            model.updated_at = Set(now);
            model.update(db).await?;
            Ok(next)
        }
        None => {
            let model = system_state::ActiveModel {
                key: Set(RECEIPT_COUNTER_KEY.to_string()),
                value: Set("1".to_string()),
                updated_at: Set(now),
                ..Default::default()
            };
            model.insert(db).await?;
            Ok(1)
        }
    }
}
