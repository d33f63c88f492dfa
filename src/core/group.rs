//! Credit group business logic - creation, membership queries, status, and
//! derived aggregates.
//!
//! Group status is an externally mutated enum with no pure derivation; it
//! gates the origination workflow but the hard eligibility rule (non-empty
//! membership, every member approved) is checked here at origination time
//! regardless of the stored status.

use crate::{
    core::status::{GroupStatus, PersonStatus, person_status},
    entities::{CreditGroup, Person, credit_group, current_account, installment, person},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::info;

/// Creates a new credit group in `Pending` status.
pub async fn create_group(
    db: &DatabaseConnection,
    name: String,
    description: String,
) -> Result<credit_group::Model> {
    if name.trim().is_empty() {
        return Err(Error::Config {
            message: "Group name cannot be empty".to_string(),
        });
    }

    let model = credit_group::ActiveModel {
        name: Set(name.trim().to_string()),
        description: Set(description),
        status: Set(GroupStatus::Pending.as_str().to_string()),
        ..Default::default()
    };

    let result = model.insert(db).await?;
    info!(group_id = result.id, "created group");
    Ok(result)
}

/// Finds a group by its unique ID.
pub async fn get_group_by_id(
    db: &DatabaseConnection,
    group_id: i64,
) -> Result<Option<credit_group::Model>> {
    CreditGroup::find_by_id(group_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves all groups, ordered alphabetically by name.
pub async fn get_all_groups(db: &DatabaseConnection) -> Result<Vec<credit_group::Model>> {
    CreditGroup::find()
        .order_by_asc(credit_group::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Lists the members of a group, ordered by name.
pub async fn get_members(db: &DatabaseConnection, group_id: i64) -> Result<Vec<person::Model>> {
    Person::find()
        .filter(person::Column::GroupId.eq(group_id))
        .order_by_asc(person::Column::FullName)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Updates a group's name and description. Status changes go through
/// [`set_group_status`].
pub async fn update_group(
    db: &DatabaseConnection,
    group_id: i64,
    name: String,
    description: String,
) -> Result<credit_group::Model> {
    if name.trim().is_empty() {
        return Err(Error::Config {
            message: "Group name cannot be empty".to_string(),
        });
    }

    let group = CreditGroup::find_by_id(group_id)
        .one(db)
        .await?
        .ok_or(Error::NotFound {
            entity: "group",
            id: group_id,
        })?;

    let mut model: credit_group::ActiveModel = group.into();
    model.name = Set(name.trim().to_string());
    model.description = Set(description);
    model.update(db).await.map_err(Into::into)
}

/// Sets a group's workflow status. The enum is validated here; transitions
/// themselves are at the operator's discretion.
pub async fn set_group_status(
    db: &DatabaseConnection,
    group_id: i64,
    status: GroupStatus,
) -> Result<credit_group::Model> {
    let group = CreditGroup::find_by_id(group_id)
        .one(db)
        .await?
        .ok_or(Error::NotFound {
            entity: "group",
            id: group_id,
        })?;

    let mut model: credit_group::ActiveModel = group.into();
    model.status = Set(status.as_str().to_string());
    model.update(db).await.map_err(Into::into)
}

/// Returns the group's members if the group may receive a loan.
///
/// A group is eligible when it has at least one member and every member's
/// derived status is `Approved`.
///
/// # Errors
/// [`Error::GroupNotEligible`] naming the first failing condition.
pub async fn eligible_members(
    db: &DatabaseConnection,
    group_id: i64,
) -> Result<Vec<person::Model>> {
    CreditGroup::find_by_id(group_id)
        .one(db)
        .await?
        .ok_or(Error::NotFound {
            entity: "group",
            id: group_id,
        })?;

    let members = get_members(db, group_id).await?;
    if members.is_empty() {
        return Err(Error::GroupNotEligible {
            group_id,
            reason: "group has no members".to_string(),
        });
    }

    for member in &members {
        if person_status(member) != PersonStatus::Approved {
            return Err(Error::GroupNotEligible {
                group_id,
                reason: format!("member {} is not approved", member.full_name),
            });
        }
    }

    Ok(members)
}

/// Derived total debt of a group: the unpaid remainder across the group-level
/// account's installments. Recomputed on read, never stored.
pub async fn total_debt(db: &DatabaseConnection, group_id: i64) -> Result<f64> {
    let account = current_account::Entity::find()
        .filter(current_account::Column::GroupId.eq(group_id))
        .filter(current_account::Column::Status.eq("active"))
        .one(db)
        .await?;

    let Some(account) = account else {
        return Ok(0.0);
    };

    let installments = installment::Entity::find()
        .filter(installment::Column::AccountId.eq(account.id))
        .all(db)
        .await?;

    Ok(installments
        .iter()
        .map(|i| i.amount - i.amount_paid)
        .sum())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::{
        create_approved_person, create_test_group, create_test_person, setup_test_db,
    };

    #[tokio::test]
    async fn test_create_group_validation() -> Result<()> {
        let db = setup_test_db().await?;

        let result = create_group(&db, "   ".to_string(), String::new()).await;
        assert!(matches!(result.unwrap_err(), Error::Config { message: _ }));

        let group = create_group(&db, "Las Flores".to_string(), "Weekly group".to_string()).await?;
        assert_eq!(group.name, "Las Flores");
        assert_eq!(group.status, "Pending");

        Ok(())
    }

    #[tokio::test]
    async fn test_update_group_rename_keeps_status() -> Result<()> {
        let db = setup_test_db().await?;
        let group = create_test_group(&db, "Las Flores").await?;
        let group = set_group_status(&db, group.id, GroupStatus::Approved).await?;

        let updated =
            update_group(&db, group.id, "Las Rosas".to_string(), "Renamed".to_string()).await?;
        assert_eq!(updated.name, "Las Rosas");
        assert_eq!(updated.description, "Renamed");
        assert_eq!(updated.status, "Approved");

        let result = update_group(&db, group.id, "  ".to_string(), String::new()).await;
        assert!(matches!(result.unwrap_err(), Error::Config { message: _ }));

        let result = update_group(&db, 999, "Name".to_string(), String::new()).await;
        assert!(matches!(result.unwrap_err(), Error::NotFound { .. }));

        Ok(())
    }

    #[tokio::test]
    async fn test_get_members_lists_only_group_members() -> Result<()> {
        let db = setup_test_db().await?;
        let group = create_test_group(&db, "Group A").await?;
        let other = create_test_group(&db, "Group B").await?;

        create_approved_person(&db, "Ana", "1001", group.id).await?;
        create_approved_person(&db, "Beatriz", "1002", group.id).await?;
        create_approved_person(&db, "Carla", "1003", other.id).await?;

        let members = get_members(&db, group.id).await?;
        assert_eq!(members.len(), 2);
        assert_eq!(members[0].full_name, "Ana");
        assert_eq!(members[1].full_name, "Beatriz");

        Ok(())
    }

    #[tokio::test]
    async fn test_eligible_members_empty_group() -> Result<()> {
        let db = setup_test_db().await?;
        let group = create_test_group(&db, "Empty Group").await?;

        let result = eligible_members(&db, group.id).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::GroupNotEligible { .. }
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_eligible_members_unapproved_member() -> Result<()> {
        let db = setup_test_db().await?;
        let group = create_test_group(&db, "Group A").await?;

        create_approved_person(&db, "Ana", "1001", group.id).await?;
        // Pending member: created but never verified
        let pending = create_test_person(&db, "Beatriz", "1002").await?;
        crate::core::person::assign_to_group(&db, pending.id, group.id, false).await?;

        let result = eligible_members(&db, group.id).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::GroupNotEligible { .. }
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_eligible_members_all_approved() -> Result<()> {
        let db = setup_test_db().await?;
        let group = create_test_group(&db, "Group A").await?;

        create_approved_person(&db, "Ana", "1001", group.id).await?;
        create_approved_person(&db, "Beatriz", "1002", group.id).await?;

        let members = eligible_members(&db, group.id).await?;
        assert_eq!(members.len(), 2);

        Ok(())
    }

    #[tokio::test]
    async fn test_set_group_status() -> Result<()> {
        let db = setup_test_db().await?;
        let group = create_test_group(&db, "Group A").await?;

        let group = set_group_status(&db, group.id, GroupStatus::ActiveLoan).await?;
        assert_eq!(group.status, "Active Loan");

        Ok(())
    }

    #[tokio::test]
    async fn test_total_debt_no_account_is_zero() -> Result<()> {
        let db = setup_test_db().await?;
        let group = create_test_group(&db, "Group A").await?;

        assert_eq!(total_debt(&db, group.id).await?, 0.0);

        Ok(())
    }
}
