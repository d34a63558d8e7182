//! Report entity - One meal count figure submitted by a school for a date.
//!
//! `added_by_school` distinguishes the two flavors: `true` is an *actual*
//! report (what was served), `false` is an *estimate* (submitted in advance).
//! A school may hold at most one of each per date, enforced by a unique index
//! on (`school_id`, `for_date`, `added_by_school`). The self-link
//! `actual_report_id` lives on the estimate side and points at its matched
//! actual; the reconciliation engine maintains it.
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Report database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "reports")]
pub struct Model {
    /// Unique identifier for the report
    #[sea_orm(primary_key)]
    pub id: i64,
    /// School that submitted the report
    pub school_id: i64,
    /// Number of students, never negative
    pub student_count: i32,
    /// Calendar date the count is reported for
    pub for_date: Date,
    /// When the report was submitted
    pub on_datetime: DateTimeUtc,
    /// `true` for an actual report, `false` for an estimate
    pub added_by_school: bool,
    /// On an estimate, the matched actual report (set by reconciliation)
    pub actual_report_id: Option<i64>,
}

/// Defines relationships between Report and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each report belongs to one school
    #[sea_orm(
        belongs_to = "super::school::Entity",
        from = "Column::SchoolId",
        to = "super::school::Column::Id",
        on_delete = "Cascade"
    )]
    School,
    /// A report owns its menu items
    #[sea_orm(has_many = "super::report_item::Entity")]
    ReportItem,
    /// Estimate-side link to the matched actual report
    #[sea_orm(
        belongs_to = "Entity",
        from = "Column::ActualReportId",
        to = "Column::Id"
    )]
    ActualReport,
}

impl Related<super::school::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::School.def()
    }
}

impl Related<super::report_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ReportItem.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
