//! Shared helpers for tests that need a database with real tables.
//!
//! Every helper runs against a fresh in-memory SQLite connection so tests
//! stay independent of each other and of any on-disk state.

#![allow(clippy::unwrap_used)]

use crate::{
    core::{
        ledger::{AccountOwner, open_account},
        status::VerificationFlags,
    },
    entities::{credit_group, current_account, installment, loan, person, shareholder},
    errors::Result,
};
use chrono::NaiveDate;
use sea_orm::{Database, DatabaseConnection, Set, prelude::*};

/// Connects to an in-memory SQLite database and creates all tables.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates a person with the given name and national ID, no group, all
/// verification flags unset.
pub async fn create_test_person(
    db: &DatabaseConnection,
    name: &str,
    national_id: &str,
) -> Result<person::Model> {
    crate::core::person::create_person(
        db,
        name.to_string(),
        national_id.to_string(),
        "123 Test St".to_string(),
    )
    .await
}

/// Creates a person with all six verification checks passed and assigns them
/// to the given group, so they count toward loan eligibility.
pub async fn create_approved_person(
    db: &DatabaseConnection,
    name: &str,
    national_id: &str,
    group_id: i64,
) -> Result<person::Model> {
    let person = create_test_person(db, name, national_id).await?;
    let flags = VerificationFlags {
        id_docs: true,
        service_bill: true,
        guarantor: true,
        financial: true,
        full_folder: true,
        general: true,
        ..VerificationFlags::default()
    };
    crate::core::person::update_verification(db, person.id, flags).await?;
    crate::core::person::assign_to_group(db, person.id, group_id, false).await
}

/// Creates a group with the given name.
pub async fn create_test_group(
    db: &DatabaseConnection,
    name: &str,
) -> Result<credit_group::Model> {
    crate::core::group::create_group(db, name.to_string(), String::new()).await
}

/// Creates a shareholder; the national ID is derived from the name so that
/// differently named shareholders never collide.
pub async fn create_test_shareholder(
    db: &DatabaseConnection,
    name: &str,
) -> Result<shareholder::Model> {
    crate::core::shareholder::create_shareholder(
        db,
        name.to_string(),
        format!("SH-{name}"),
        None,
        None,
        10_000.0,
    )
    .await
}

/// Inserts a loan row directly, with its own backing group, bypassing the
/// origination workflow. For tests that exercise lower layers in isolation.
pub async fn insert_raw_loan(
    db: &DatabaseConnection,
    principal: f64,
    installment_count: i32,
) -> Result<loan::Model> {
    let group = create_test_group(db, "Funding Group").await?;
    insert_loan_for_group(db, group.id, principal, installment_count).await
}

async fn insert_loan_for_group(
    db: &DatabaseConnection,
    group_id: i64,
    principal: f64,
    installment_count: i32,
) -> Result<loan::Model> {
    let model = loan::ActiveModel {
        group_id: Set(group_id),
        principal: Set(principal),
        installment_count: Set(installment_count),
        rate_per_installment: Set(0.15),
        start_date: Set(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()),
        status: Set("Active".to_string()),
        ..Default::default()
    };
    model.insert(db).await.map_err(Into::into)
}

/// Sets up a group named "Test Group" with a loan of 2000 over 4 installments
/// at 0.15 and an open group-level ledger: total 3200, four installments of
/// 800 due monthly from 2025-02-01.
pub async fn setup_group_ledger()
-> Result<(DatabaseConnection, current_account::Model, Vec<installment::Model>)> {
    let db = setup_test_db().await?;
    let group = create_test_group(&db, "Test Group").await?;
    let loan = insert_loan_for_group(&db, group.id, 2000.0, 4).await?;

    let due_dates = vec![
        NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(),
        NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
        NaiveDate::from_ymd_opt(2025, 4, 1).unwrap(),
        NaiveDate::from_ymd_opt(2025, 5, 1).unwrap(),
    ];
    let (account, installments) = open_account(
        &db,
        AccountOwner::Group(group.id),
        loan.id,
        3200.0,
        800.0,
        &due_dates,
    )
    .await?;

    Ok((db, account, installments))
}
