use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Validation failed on `{field}`: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    #[error(
        "A report for school {school_id} on {for_date} with added_by_school={added_by_school} already exists"
    )]
    DuplicateReport {
        school_id: i64,
        for_date: NaiveDate,
        added_by_school: bool,
    },

    #[error("School {school_id} does not own report {report_id}")]
    NotOwner { report_id: i64, school_id: i64 },

    #[error("{entity} not found: {key}")]
    NotFound { entity: &'static str, key: String },

    #[error("Inconsistent report pair for school {school_id} on {for_date}")]
    InconsistentPair {
        school_id: i64,
        for_date: NaiveDate,
    },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),
}

// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
