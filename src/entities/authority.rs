//! Authority entity - The principal overseeing one district's schools.
//!
//! `user_id` is the resolved account handle passed in by the identity layer;
//! the core never authenticates it. Each district has at most one authority.
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Authority database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "authorities")]
pub struct Model {
    /// Unique identifier for the authority
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owning account handle, one authority per account
    #[sea_orm(unique)]
    pub user_id: String,
    /// District this authority oversees, one authority per district
    #[sea_orm(unique)]
    pub district_id: i64,
}

/// Defines relationships between Authority and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each authority oversees exactly one district
    #[sea_orm(
        belongs_to = "super::district::Entity",
        from = "Column::DistrictId",
        to = "super::district::Column::Id"
    )]
    District,
    /// Schools explicitly assigned to this authority
    #[sea_orm(has_many = "super::school::Entity")]
    School,
}

impl Related<super::district::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::District.def()
    }
}

impl Related<super::school::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::School.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
