//! Position entity - an office contested within a section

use sea_orm::entity::prelude::*;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "positions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    #[serde(rename = "nombre")]
    pub name: String,
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
    #[sea_orm(has_many = "super::candidacy::Entity")]
    Candidacies,
}

impl Related<super::section::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Section.def()
    }
}

impl Related<super::candidacy::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Candidacies.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
