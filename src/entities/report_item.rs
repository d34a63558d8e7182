//! Report item entity - One menu item attached to a report.
//!
//! Item lifecycle is wholly owned by the parent report: rows are created with
//! the report and replaced wholesale on update, never diffed. Uniqueness on
//! (`report_id`, `item`) is enforced by an index built in `config::database`.
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Report item database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "report_items")]
pub struct Model {
    /// Unique identifier for the item row
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Report this item belongs to
    pub report_id: i64,
    /// Menu item name
    pub item: String,
}

/// Defines relationships between ReportItem and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each item belongs to one report
    #[sea_orm(
        belongs_to = "super::report::Entity",
        from = "Column::ReportId",
        to = "super::report::Column::Id",
        on_delete = "Cascade"
    )]
    Report,
}

impl Related<super::report::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Report.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
