//! Database configuration module for mealtally.
//!
//! This module handles `SQLite` database connection and table creation using `SeaORM`.
//! Tables are generated from the entity definitions with
//! `Schema::create_table_from_entity`, so the schema always matches the Rust
//! structs. The composite uniqueness rules (one actual and one estimate report
//! per school and date, one item per report, one menu item per district and
//! weekday, one pairing per school and date) cannot be expressed in the entity
//! derive, so they are built here as explicit unique indexes.

use crate::entities::{
    Authority, AuthorityReport, District, Report, ReportItem, Schedule, School,
    authority_report, report, report_item, schedule,
};
use crate::errors::Result;
use sea_orm::sea_query::{Index, IndexCreateStatement};
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};

/// Gets the database URL from environment variable or returns default `SQLite` path.
pub fn get_database_url() -> Result<String> {
    Ok(std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "sqlite://data/mealtally.sqlite".to_string()))
}

/// Establishes a connection to the `SQLite` database using the `DATABASE_URL`
/// environment variable, falling back to a default local file.
pub async fn create_connection() -> Result<DatabaseConnection> {
    let database_url = get_database_url()?;
    Database::connect(&database_url).await.map_err(Into::into)
}

/// Creates all tables from the entity definitions, then the unique indexes
/// that back the one-report-per-(school, date, flag) family of invariants.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let district_table = schema.create_table_from_entity(District);
    let authority_table = schema.create_table_from_entity(Authority);
    let school_table = schema.create_table_from_entity(School);
    let schedule_table = schema.create_table_from_entity(Schedule);
    let report_table = schema.create_table_from_entity(Report);
    let report_item_table = schema.create_table_from_entity(ReportItem);
    let authority_report_table = schema.create_table_from_entity(AuthorityReport);

    db.execute(builder.build(&district_table)).await?;
    db.execute(builder.build(&authority_table)).await?;
    db.execute(builder.build(&school_table)).await?;
    db.execute(builder.build(&schedule_table)).await?;
    db.execute(builder.build(&report_table)).await?;
    db.execute(builder.build(&report_item_table)).await?;
    db.execute(builder.build(&authority_report_table)).await?;

    for index in unique_indexes() {
        db.execute(builder.build(&index)).await?;
    }

    Ok(())
}

/// Composite unique indexes. The report index is the serialization point for
/// same-key submission races: the loser of a race hits it and surfaces a
/// `DuplicateReport` conflict instead of overwriting.
fn unique_indexes() -> Vec<IndexCreateStatement> {
    vec![
        Index::create()
            .name("uq_schedules_district_day_item")
            .table(Schedule)
            .col(schedule::Column::DistrictId)
            .col(schedule::Column::Day)
            .col(schedule::Column::Item)
            .unique()
            .to_owned(),
        Index::create()
            .name("uq_reports_school_date_flag")
            .table(Report)
            .col(report::Column::SchoolId)
            .col(report::Column::ForDate)
            .col(report::Column::AddedBySchool)
            .unique()
            .to_owned(),
        Index::create()
            .name("uq_report_items_report_item")
            .table(ReportItem)
            .col(report_item::Column::ReportId)
            .col(report_item::Column::Item)
            .unique()
            .to_owned(),
        Index::create()
            .name("uq_authority_reports_school_date")
            .table(AuthorityReport)
            .col(authority_report::Column::SchoolId)
            .col(authority_report::Column::ForDate)
            .unique()
            .to_owned(),
    ]
}
