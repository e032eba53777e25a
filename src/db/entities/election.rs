//! Election entity

use sea_orm::entity::prelude::*;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "elections")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "fecha")]
    pub date: Date,
    #[serde(rename = "seccion")]
    pub section_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::section::Entity",
        from = "Column::SectionId",
        to = "super::section::Column::Id",
        on_delete = "Cascade"
    )]
    Section,
    #[sea_orm(has_many = "super::polling_table::Entity")]
    Tables,
    #[sea_orm(has_many = "super::candidacy::Entity")]
    Candidacies,
    #[sea_orm(has_many = "super::voter::Entity")]
    Voters,
}

impl Related<super::section::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Section.def()
    }
}

impl Related<super::polling_table::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tables.def()
    }
}

impl Related<super::candidacy::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Candidacies.def()
    }
}

impl Related<super::voter::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Voters.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
