//! Candidacy entity - a party or ticket running for a position in an election

use sea_orm::entity::prelude::*;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "candidacies")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[serde(rename = "partido_politico")]
    pub party: String,
    #[serde(rename = "sigla")]
    pub acronym: String,
    /// Candidate id owned by the voter registry, not a local reference
    #[serde(rename = "candidato_id")]
    pub candidate_id: Option<i32>,
    pub color: String,
    #[serde(rename = "cargo")]
    pub position_id: i32,
    #[serde(rename = "eleccion")]
    pub election_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::position::Entity",
        from = "Column::PositionId",
        to = "super::position::Column::Id",
        on_delete = "Cascade"
    )]
    Position,
    #[sea_orm(
        belongs_to = "super::election::Entity",
        from = "Column::ElectionId",
        to = "super::election::Column::Id",
        on_delete = "Cascade"
    )]
    Election,
}

impl Related<super::position::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Position.def()
    }
}

impl Related<super::election::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Election.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
