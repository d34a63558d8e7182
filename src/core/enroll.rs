//! Enrollment business logic.
//!
//! Creates districts, schools, and authorities, and resolves the principal
//! handles the identity layer passes in. The core never authenticates; it
//! only trusts the resolved `user_id` it receives.

use crate::{
    entities::{
        Authority, District, School, authority, district, school,
    },
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};

/// Creates a new district with a unique name.
pub async fn create_district(db: &DatabaseConnection, name: &str) -> Result<district::Model> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::Validation {
            field: "name",
            message: "District name cannot be empty".to_string(),
        });
    }

    if get_district_by_name(db, name).await?.is_some() {
        return Err(Error::Validation {
            field: "name",
            message: format!("District `{name}` already exists"),
        });
    }

    district::ActiveModel {
        name: Set(name.to_string()),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Finds a district by its unique name.
pub async fn get_district_by_name(
    db: &DatabaseConnection,
    name: &str,
) -> Result<Option<district::Model>> {
    District::find()
        .filter(district::Column::Name.eq(name))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Lists all districts, ordered alphabetically by name.
pub async fn list_districts(db: &DatabaseConnection) -> Result<Vec<district::Model>> {
    District::find()
        .order_by_asc(district::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Enrolls a school for a principal in a district, optionally assigning its
/// authority right away (assignment may also lag, see `assign_authority`).
pub async fn enroll_school(
    db: &DatabaseConnection,
    user_id: &str,
    name: &str,
    district_id: i64,
    authority_id: Option<i64>,
) -> Result<school::Model> {
    let user_id = user_id.trim();
    if user_id.is_empty() {
        return Err(Error::Validation {
            field: "user_id",
            message: "Account handle cannot be empty".to_string(),
        });
    }
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::Validation {
            field: "name",
            message: "School name cannot be empty".to_string(),
        });
    }

    District::find_by_id(district_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::NotFound {
            entity: "district",
            key: district_id.to_string(),
        })?;

    if let Some(authority_id) = authority_id {
        Authority::find_by_id(authority_id)
            .one(db)
            .await?
            .ok_or_else(|| Error::NotFound {
                entity: "authority",
                key: authority_id.to_string(),
            })?;
    }

    if get_school_by_user(db, user_id).await?.is_some() {
        return Err(Error::Validation {
            field: "user_id",
            message: format!("A school is already enrolled for account `{user_id}`"),
        });
    }

    school::ActiveModel {
        user_id: Set(user_id.to_string()),
        name: Set(name.to_string()),
        district_id: Set(district_id),
        authority_id: Set(authority_id),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Enrolls an authority for a principal over a district. Each district has
/// at most one authority and each account at most one authority role.
pub async fn enroll_authority(
    db: &DatabaseConnection,
    user_id: &str,
    district_id: i64,
) -> Result<authority::Model> {
    let user_id = user_id.trim();
    if user_id.is_empty() {
        return Err(Error::Validation {
            field: "user_id",
            message: "Account handle cannot be empty".to_string(),
        });
    }

    District::find_by_id(district_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::NotFound {
            entity: "district",
            key: district_id.to_string(),
        })?;

    if get_authority_by_user(db, user_id).await?.is_some() {
        return Err(Error::Validation {
            field: "user_id",
            message: format!("An authority is already enrolled for account `{user_id}`"),
        });
    }

    let district_taken = Authority::find()
        .filter(authority::Column::DistrictId.eq(district_id))
        .one(db)
        .await?
        .is_some();
    if district_taken {
        return Err(Error::Validation {
            field: "district_id",
            message: format!("District {district_id} already has an authority"),
        });
    }

    authority::ActiveModel {
        user_id: Set(user_id.to_string()),
        district_id: Set(district_id),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Sets or clears a school's authority assignment. The assignment is an
/// administrative override: it need not match the district's own authority.
pub async fn assign_authority(
    db: &DatabaseConnection,
    school_id: i64,
    authority_id: Option<i64>,
) -> Result<school::Model> {
    let school = School::find_by_id(school_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::NotFound {
            entity: "school",
            key: school_id.to_string(),
        })?;

    if let Some(authority_id) = authority_id {
        Authority::find_by_id(authority_id)
            .one(db)
            .await?
            .ok_or_else(|| Error::NotFound {
                entity: "authority",
                key: authority_id.to_string(),
            })?;
    }

    let mut active: school::ActiveModel = school.into();
    active.authority_id = Set(authority_id);
    active.update(db).await.map_err(Into::into)
}

/// Resolves the school enrolled for a principal handle.
pub async fn get_school_by_user(
    db: &DatabaseConnection,
    user_id: &str,
) -> Result<Option<school::Model>> {
    School::find()
        .filter(school::Column::UserId.eq(user_id))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Resolves the authority enrolled for a principal handle.
pub async fn get_authority_by_user(
    db: &DatabaseConnection,
    user_id: &str,
) -> Result<Option<authority::Model>> {
    Authority::find()
        .filter(authority::Column::UserId.eq(user_id))
        .one(db)
        .await
        .map_err(Into::into)
}
