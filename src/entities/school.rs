//! School entity - A reporting school inside a district.
//!
//! `authority_id` is nullable because authority assignment may lag school
//! registration, and it is independently settable: a school's authority need
//! not match its district's sole authority (administrative override).
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// School database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "schools")]
pub struct Model {
    /// Unique identifier for the school
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owning account handle, one school per account
    #[sea_orm(unique)]
    pub user_id: String,
    /// Display name of the school
    pub name: String,
    /// District this school belongs to
    pub district_id: i64,
    /// Authority this school reports to, if one has been assigned
    pub authority_id: Option<i64>,
}

/// Defines relationships between School and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each school belongs to one district
    #[sea_orm(
        belongs_to = "super::district::Entity",
        from = "Column::DistrictId",
        to = "super::district::Column::Id"
    )]
    District,
    /// Each school optionally reports to one authority
    #[sea_orm(
        belongs_to = "super::authority::Entity",
        from = "Column::AuthorityId",
        to = "super::authority::Column::Id"
    )]
    Authority,
    /// A school submits many reports
    #[sea_orm(has_many = "super::report::Entity")]
    Report,
}

impl Related<super::district::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::District.def()
    }
}

impl Related<super::authority::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Authority.def()
    }
}

impl Related<super::report::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Report.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
