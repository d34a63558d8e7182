//! Schedule entity - One expected menu item for a district on a weekday.
//!
//! `day` uses the Monday=0 through Friday=4 convention; weekends carry no rows.
//! A district+day maps to a *set* of items, so uniqueness is enforced on
//! (`district_id`, `day`, `item`) by an index built in `config::database`.
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Schedule database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "schedules")]
pub struct Model {
    /// Unique identifier for the schedule row
    #[sea_orm(primary_key)]
    pub id: i64,
    /// District this menu row belongs to
    pub district_id: i64,
    /// Weekday index, Monday=0 through Friday=4
    pub day: i32,
    /// Menu item expected on that weekday
    pub item: String,
}

/// Defines relationships between Schedule and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each schedule row belongs to one district
    #[sea_orm(
        belongs_to = "super::district::Entity",
        from = "Column::DistrictId",
        to = "super::district::Column::Id"
    )]
    District,
}

impl Related<super::district::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::District.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
