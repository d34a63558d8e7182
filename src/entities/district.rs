//! District entity - The administrative unit that groups schools.
//!
//! A district owns the weekly menu schedule and is overseen by at most one
//! authority. District names are unique across the system.
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// District database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "districts")]
pub struct Model {
    /// Unique identifier for the district
    #[sea_orm(primary_key)]
    pub id: i64,
    /// District name, unique across the system
    #[sea_orm(unique)]
    pub name: String,
}

/// Defines relationships between District and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// A district contains many schools
    #[sea_orm(has_many = "super::school::Entity")]
    School,
    /// A district has many schedule rows (one per weekday item)
    #[sea_orm(has_many = "super::schedule::Entity")]
    Schedule,
    /// A district is overseen by at most one authority
    #[sea_orm(has_one = "super::authority::Entity")]
    Authority,
}

impl Related<super::school::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::School.def()
    }
}

impl Related<super::schedule::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Schedule.def()
    }
}

impl Related<super::authority::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Authority.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
