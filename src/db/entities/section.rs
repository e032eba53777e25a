//! Section entity - administrative/geographic grouping

use sea_orm::entity::prelude::*;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "sections")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "tipo")]
    pub kind: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::point::Entity")]
    Points,
    #[sea_orm(has_many = "super::precinct::Entity")]
    Precincts,
    #[sea_orm(has_many = "super::election::Entity")]
    Elections,
    #[sea_orm(has_many = "super::position::Entity")]
    Positions,
}

impl Related<super::point::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Points.def()
    }
}

impl Related<super::precinct::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Precincts.def()
    }
}

impl Related<super::election::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Elections.def()
    }
}

impl Related<super::position::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Positions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
