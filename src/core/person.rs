//! Person business logic - identity, verification flags, and group membership.
//!
//! Verification updates and group membership changes are distinct operations:
//! the former feed the derived status, the latter must keep the single-active-
//! group rule consistent. The displayed status is always derived on read via
//! `core::status::person_status`.

use crate::{
    core::status::{FinancialStatus, PersonStatus, VerificationFlags},
    entities::{CreditGroup, Person, person},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::info;

/// Creates a new person with a unique national ID.
///
/// All verification flags start false, financial status starts `Unknown`,
/// and the person belongs to no group.
pub async fn create_person(
    db: &DatabaseConnection,
    full_name: String,
    national_id: String,
    address: String,
) -> Result<person::Model> {
    if full_name.trim().is_empty() {
        return Err(Error::Config {
            message: "Person name cannot be empty".to_string(),
        });
    }
    if national_id.trim().is_empty() {
        return Err(Error::Config {
            message: "National ID cannot be empty".to_string(),
        });
    }

    let national_id = national_id.trim().to_string();
    let existing = Person::find()
        .filter(person::Column::NationalId.eq(national_id.clone()))
        .one(db)
        .await?;
    if existing.is_some() {
        return Err(Error::DuplicateNationalId { national_id });
    }

    let model = person::ActiveModel {
        full_name: Set(full_name.trim().to_string()),
        national_id: Set(national_id),
        address: Set(address),
        financial_status: Set(FinancialStatus::Unknown.as_str().to_string()),
        id_docs_checked: Set(false),
        service_bill_checked: Set(false),
        guarantor_checked: Set(false),
        financial_checked: Set(false),
        full_folder_checked: Set(false),
        general_checked: Set(false),
        id_docs_rejected: Set(false),
        service_bill_rejected: Set(false),
        guarantor_rejected: Set(false),
        financial_rejected: Set(false),
        full_folder_rejected: Set(false),
        general_rejected: Set(false),
        status_override: Set(None),
        group_id: Set(None),
        ..Default::default()
    };

    let result = model.insert(db).await?;
    info!(person_id = result.id, "created person");
    Ok(result)
}

/// Finds a person by their unique ID.
pub async fn get_person_by_id(
    db: &DatabaseConnection,
    person_id: i64,
) -> Result<Option<person::Model>> {
    Person::find_by_id(person_id).one(db).await.map_err(Into::into)
}

/// Retrieves all persons, ordered alphabetically by name.
pub async fn get_all_persons(db: &DatabaseConnection) -> Result<Vec<person::Model>> {
    Person::find()
        .order_by_asc(person::Column::FullName)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Updates a person's basic details (name and address).
///
/// The national ID is immutable once registered; group membership and
/// verification flags change through their own operations.
pub async fn update_person(
    db: &DatabaseConnection,
    person_id: i64,
    full_name: String,
    address: String,
) -> Result<person::Model> {
    if full_name.trim().is_empty() {
        return Err(Error::Config {
            message: "Person name cannot be empty".to_string(),
        });
    }

    let person = Person::find_by_id(person_id)
        .one(db)
        .await?
        .ok_or(Error::NotFound {
            entity: "person",
            id: person_id,
        })?;

    let mut model: person::ActiveModel = person.into();
    model.full_name = Set(full_name.trim().to_string());
    model.address = Set(address);
    model.update(db).await.map_err(Into::into)
}

/// Replaces a person's verification flags and rejection markers.
///
/// This is a distinct operation from general edits so that status derivation
/// inputs change in one place. The derived status is not stored; callers read
/// it back via [`crate::core::status::person_status`].
pub async fn update_verification(
    db: &DatabaseConnection,
    person_id: i64,
    flags: VerificationFlags,
) -> Result<person::Model> {
    let person = Person::find_by_id(person_id)
        .one(db)
        .await?
        .ok_or(Error::NotFound {
            entity: "person",
            id: person_id,
        })?;

    let mut model: person::ActiveModel = person.into();
    model.id_docs_checked = Set(flags.id_docs);
    model.service_bill_checked = Set(flags.service_bill);
    model.guarantor_checked = Set(flags.guarantor);
    model.financial_checked = Set(flags.financial);
    model.full_folder_checked = Set(flags.full_folder);
    model.general_checked = Set(flags.general);
    model.id_docs_rejected = Set(flags.id_docs_rejected);
    model.service_bill_rejected = Set(flags.service_bill_rejected);
    model.guarantor_rejected = Set(flags.guarantor_rejected);
    model.financial_rejected = Set(flags.financial_rejected);
    model.full_folder_rejected = Set(flags.full_folder_rejected);
    model.general_rejected = Set(flags.general_rejected);

    model.update(db).await.map_err(Into::into)
}

/// Sets a person's financial standing.
pub async fn set_financial_status(
    db: &DatabaseConnection,
    person_id: i64,
    status: FinancialStatus,
) -> Result<person::Model> {
    let person = Person::find_by_id(person_id)
        .one(db)
        .await?
        .ok_or(Error::NotFound {
            entity: "person",
            id: person_id,
        })?;

    let mut model: person::ActiveModel = person.into();
    model.financial_status = Set(status.as_str().to_string());
    model.update(db).await.map_err(Into::into)
}

/// Sets or clears a person's manual status override.
///
/// `None` re-selects automatic derivation; the override is never cleared by
/// any other operation.
pub async fn set_status_override(
    db: &DatabaseConnection,
    person_id: i64,
    status: Option<PersonStatus>,
) -> Result<person::Model> {
    let person = Person::find_by_id(person_id)
        .one(db)
        .await?
        .ok_or(Error::NotFound {
            entity: "person",
            id: person_id,
        })?;

    let mut model: person::ActiveModel = person.into();
    model.status_override = Set(status.map(|s| s.as_str().to_string()));
    model.update(db).await.map_err(Into::into)
}

/// Assigns a person to a group.
///
/// A person may belong to at most one group at a time. If they already belong
/// to a different group the call fails with [`Error::PersonAlreadyInGroup`]
/// unless `force` is set, in which case the prior membership is cleared by
/// the reassignment. Assigning to the current group is a no-op.
pub async fn assign_to_group(
    db: &DatabaseConnection,
    person_id: i64,
    group_id: i64,
    force: bool,
) -> Result<person::Model> {
    let person = Person::find_by_id(person_id)
        .one(db)
        .await?
        .ok_or(Error::NotFound {
            entity: "person",
            id: person_id,
        })?;

    CreditGroup::find_by_id(group_id)
        .one(db)
        .await?
        .ok_or(Error::NotFound {
            entity: "group",
            id: group_id,
        })?;

    if let Some(current) = person.group_id {
        if current == group_id {
            return Ok(person);
        }
        if !force {
            return Err(Error::PersonAlreadyInGroup {
                person_id,
                group_id: current,
            });
        }
        info!(person_id, from_group = current, to_group = group_id, "forced group reassignment");
    }

    let mut model: person::ActiveModel = person.into();
    model.group_id = Set(Some(group_id));
    model.update(db).await.map_err(Into::into)
}

/// Removes a person from their current group, if any.
pub async fn detach_from_group(
    db: &DatabaseConnection,
    person_id: i64,
) -> Result<person::Model> {
    let person = Person::find_by_id(person_id)
        .one(db)
        .await?
        .ok_or(Error::NotFound {
            entity: "person",
            id: person_id,
        })?;

    let mut model: person::ActiveModel = person.into();
    model.group_id = Set(None);
    model.update(db).await.map_err(Into::into)
}
