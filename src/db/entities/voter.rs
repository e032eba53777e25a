//! Voter assignment entity (votante) - binds an external voter to a table

use sea_orm::entity::prelude::*;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "voters")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[serde(rename = "votante_id")]
    pub voter_id: i32,
    #[serde(rename = "voto")]
    pub has_voted: bool,
    /// Mirrors the table's election; NULL while the table is unbound
    #[serde(rename = "eleccion")]
    pub election_id: Option<i32>,
    #[serde(rename = "mesa")]
    pub table_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::election::Entity",
        from = "Column::ElectionId",
        to = "super::election::Column::Id",
        on_delete = "Cascade"
    )]
    Election,
    #[sea_orm(
        belongs_to = "super::polling_table::Entity",
        from = "Column::TableId",
        to = "super::polling_table::Column::Id",
        on_delete = "Cascade"
    )]
    Table,
}

impl Related<super::election::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Election.def()
    }
}

impl Related<super::polling_table::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Table.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
