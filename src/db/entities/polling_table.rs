//! Polling table entity (mesa)
//!
//! A table groups a share of an election's roster at one precinct.
//! (number, precinct_id, election_id) is unique. Tables provisioned ahead of
//! an election carry `election_id = NULL` and capacity 0 until they are
//! distributed and bound.

use sea_orm::entity::prelude::*;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "polling_tables")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[serde(rename = "numero")]
    pub number: i32,
    /// Number of voters assigned by the last distribution
    #[serde(rename = "cantidad")]
    pub capacity: i32,
    /// External voter id of the presiding officer
    #[serde(rename = "jefe_id")]
    pub chair_id: Option<i32>,
    #[serde(rename = "recinto")]
    pub precinct_id: i32,
    #[serde(rename = "eleccion")]
    pub election_id: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::precinct::Entity",
        from = "Column::PrecinctId",
        to = "super::precinct::Column::Id",
        on_delete = "Cascade"
    )]
    Precinct,
    #[sea_orm(
        belongs_to = "super::election::Entity",
        from = "Column::ElectionId",
        to = "super::election::Column::Id",
        on_delete = "Cascade"
    )]
    Election,
    #[sea_orm(has_many = "super::voter::Entity")]
    Voters,
}

impl Related<super::precinct::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Precinct.def()
    }
}

impl Related<super::election::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Election.def()
    }
}

impl Related<super::voter::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Voters.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
