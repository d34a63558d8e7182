//! Shared test utilities for mealtally.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.

use crate::{
    core::{enroll, report},
    entities,
    errors::Result,
};
use chrono::NaiveDate;
use sea_orm::DatabaseConnection;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// A fixed reporting date: 2020-08-03, a Monday.
#[must_use]
pub fn test_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 8, 3).unwrap()
}

/// Creates a district with the given name.
pub async fn create_test_district(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::district::Model> {
    enroll::create_district(db, name).await
}

/// Creates a school in the district. The principal handle is derived from the
/// name, so distinct names give distinct principals.
pub async fn create_test_school(
    db: &DatabaseConnection,
    district_id: i64,
    name: &str,
) -> Result<entities::school::Model> {
    let user_id = format!("{}-user", name.to_lowercase());
    enroll::enroll_school(db, &user_id, name, district_id, None).await
}

/// Creates the authority overseeing the district.
pub async fn create_test_authority(
    db: &DatabaseConnection,
    district_id: i64,
) -> Result<entities::authority::Model> {
    enroll::enroll_authority(db, &format!("authority-{district_id}"), district_id).await
}

/// Submits an actual report (`added_by_school = true`).
pub async fn submit_actual(
    db: &DatabaseConnection,
    school_id: i64,
    for_date: NaiveDate,
    student_count: i32,
    items: &[&str],
) -> Result<entities::report::Model> {
    report::submit_report(
        db,
        school_id,
        for_date,
        student_count,
        true,
        items.iter().map(ToString::to_string).collect(),
    )
    .await
}

/// Submits an estimate report (`added_by_school = false`).
pub async fn submit_estimate(
    db: &DatabaseConnection,
    school_id: i64,
    for_date: NaiveDate,
    student_count: i32,
    items: &[&str],
) -> Result<entities::report::Model> {
    report::submit_report(
        db,
        school_id,
        for_date,
        student_count,
        false,
        items.iter().map(ToString::to_string).collect(),
    )
    .await
}

/// Sets up a database with one district and one unassigned school.
/// Returns (db, district, school) for common report tests.
pub async fn setup_with_school() -> Result<(
    DatabaseConnection,
    entities::district::Model,
    entities::school::Model,
)> {
    let db = setup_test_db().await?;
    let district = create_test_district(&db, "chennai").await?;
    let school = create_test_school(&db, district.id, "SBOI").await?;
    Ok((db, district, school))
}

/// Sets up a database with a district, its authority, and one school on the
/// authority's roster. Returns (db, district, authority, school).
pub async fn setup_with_authority() -> Result<(
    DatabaseConnection,
    entities::district::Model,
    entities::authority::Model,
    entities::school::Model,
)> {
    let db = setup_test_db().await?;
    let district = create_test_district(&db, "chennai").await?;
    let authority = create_test_authority(&db, district.id).await?;
    let school = create_test_school(&db, district.id, "SBOI").await?;
    let school = enroll::assign_authority(&db, school.id, Some(authority.id)).await?;
    Ok((db, district, authority, school))
}
