//! Authority report entity - Materialized pairing of an actual and an
//! estimate report for the same school and date.
//!
//! Rows exist only while both sides exist; the reconciliation engine creates,
//! rewrites, and deletes them. A unique index on (`school_id`, `for_date`)
//! keeps one row per key regardless of which side was saved last.
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Authority report database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "authority_reports")]
pub struct Model {
    /// Unique identifier for the pairing
    #[sea_orm(primary_key)]
    pub id: i64,
    /// School both sides belong to
    pub school_id: i64,
    /// Date both sides report for
    pub for_date: Date,
    /// The actual report (`added_by_school = true`)
    pub actual_id: i64,
    /// The estimate report (`added_by_school = false`)
    pub estimate_id: i64,
    /// Whether the two student counts disagree
    pub is_discrepant: bool,
}

/// Defines relationships between AuthorityReport and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each pairing belongs to one school
    #[sea_orm(
        belongs_to = "super::school::Entity",
        from = "Column::SchoolId",
        to = "super::school::Column::Id",
        on_delete = "Cascade"
    )]
    School,
    /// The actual side of the pairing
    #[sea_orm(
        belongs_to = "super::report::Entity",
        from = "Column::ActualId",
        to = "super::report::Column::Id"
    )]
    Actual,
    /// The estimate side of the pairing
    #[sea_orm(
        belongs_to = "super::report::Entity",
        from = "Column::EstimateId",
        to = "super::report::Column::Id"
    )]
    Estimate,
}

impl Related<super::school::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::School.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
