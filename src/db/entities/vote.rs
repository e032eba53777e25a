//! Vote entity - an append-only cast ballot
//!
//! Every reference is a bare id issued by the voting service; none of them
//! is a foreign key.

use sea_orm::entity::prelude::*;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "votes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[serde(rename = "mesa_id")]
    pub table_id: i32,
    #[serde(rename = "votante_id")]
    pub voter_id: i32,
    #[serde(rename = "candidatura_id")]
    pub candidacy_id: i32,
    #[serde(rename = "eleccion_id")]
    pub election_id: i32,
    #[serde(rename = "cargo_id")]
    pub position_id: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
