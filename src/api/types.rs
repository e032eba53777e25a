//! Request and response bodies of the HTTP API.
//!
//! Field names on the wire are the Spanish ones used by the rest of the
//! electoral system; the Rust side keeps English names.

use sea_orm::{ActiveValue, EntityTrait, Set};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::db::entities::{
    candidacy, election, point, polling_table, position, precinct, section, vote, voter,
};
use crate::distribution::{PrecinctTables, VoterId};

// ============================================================================
// Catalog bodies
// ============================================================================

/// Body accepted by the create and update routes of one entity.
///
/// Updates replace every writable column, so create and update share it.
pub trait CatalogInput: DeserializeOwned + Send + 'static {
    type Entity: EntityTrait;

    /// `id` is `NotSet` on create and `Unchanged` on update
    fn into_row(self, id: ActiveValue<i32>) -> <Self::Entity as EntityTrait>::ActiveModel;
}

#[derive(Debug, Deserialize)]
pub struct SectionInput {
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "tipo", default)]
    pub kind: Option<String>,
}

impl CatalogInput for SectionInput {
    type Entity = section::Entity;

    fn into_row(self, id: ActiveValue<i32>) -> section::ActiveModel {
        section::ActiveModel {
            id,
            name: Set(self.name),
            kind: Set(self.kind),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PointInput {
    #[serde(rename = "latitud")]
    pub latitude: f64,
    #[serde(rename = "longitud")]
    pub longitude: f64,
    #[serde(rename = "seccion")]
    pub section_id: i32,
}

impl CatalogInput for PointInput {
    type Entity = point::Entity;

    fn into_row(self, id: ActiveValue<i32>) -> point::ActiveModel {
        point::ActiveModel {
            id,
            latitude: Set(self.latitude),
            longitude: Set(self.longitude),
            section_id: Set(self.section_id),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PrecinctInput {
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "latitud")]
    pub latitude: f64,
    #[serde(rename = "longitud")]
    pub longitude: f64,
    #[serde(rename = "seccion", default)]
    pub section_id: Option<i32>,
}

impl CatalogInput for PrecinctInput {
    type Entity = precinct::Entity;

    fn into_row(self, id: ActiveValue<i32>) -> precinct::ActiveModel {
        precinct::ActiveModel {
            id,
            name: Set(self.name),
            latitude: Set(self.latitude),
            longitude: Set(self.longitude),
            section_id: Set(self.section_id),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ElectionInput {
    #[serde(rename = "nombre")]
    pub name: String,
    /// `YYYY-MM-DD`
    #[serde(rename = "fecha")]
    pub date: chrono::NaiveDate,
    #[serde(rename = "seccion")]
    pub section_id: i32,
}

impl CatalogInput for ElectionInput {
    type Entity = election::Entity;

    fn into_row(self, id: ActiveValue<i32>) -> election::ActiveModel {
        election::ActiveModel {
            id,
            name: Set(self.name),
            date: Set(self.date),
            section_id: Set(self.section_id),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PositionInput {
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "seccion")]
    pub section_id: i32,
}

impl CatalogInput for PositionInput {
    type Entity = position::Entity;

    fn into_row(self, id: ActiveValue<i32>) -> position::ActiveModel {
        position::ActiveModel {
            id,
            name: Set(self.name),
            section_id: Set(self.section_id),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CandidacyInput {
    #[serde(rename = "partido_politico")]
    pub party: String,
    #[serde(rename = "sigla")]
    pub acronym: String,
    #[serde(rename = "candidato_id", default)]
    pub candidate_id: Option<i32>,
    pub color: String,
    #[serde(rename = "cargo")]
    pub position_id: i32,
    #[serde(rename = "eleccion")]
    pub election_id: i32,
}

impl CatalogInput for CandidacyInput {
    type Entity = candidacy::Entity;

    fn into_row(self, id: ActiveValue<i32>) -> candidacy::ActiveModel {
        candidacy::ActiveModel {
            id,
            party: Set(self.party),
            acronym: Set(self.acronym),
            candidate_id: Set(self.candidate_id),
            color: Set(self.color),
            position_id: Set(self.position_id),
            election_id: Set(self.election_id),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct TableInput {
    #[serde(rename = "numero")]
    pub number: i32,
    #[serde(rename = "cantidad", default)]
    pub capacity: i32,
    #[serde(rename = "jefe_id", default)]
    pub chair_id: Option<i32>,
    #[serde(rename = "recinto")]
    pub precinct_id: i32,
    #[serde(rename = "eleccion", default)]
    pub election_id: Option<i32>,
}

impl CatalogInput for TableInput {
    type Entity = polling_table::Entity;

    fn into_row(self, id: ActiveValue<i32>) -> polling_table::ActiveModel {
        polling_table::ActiveModel {
            id,
            number: Set(self.number),
            capacity: Set(self.capacity),
            chair_id: Set(self.chair_id),
            precinct_id: Set(self.precinct_id),
            election_id: Set(self.election_id),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct VoterInput {
    #[serde(rename = "votante_id")]
    pub voter_id: i32,
    #[serde(rename = "voto", default)]
    pub has_voted: bool,
    #[serde(rename = "eleccion", default)]
    pub election_id: Option<i32>,
    #[serde(rename = "mesa")]
    pub table_id: i32,
}

impl CatalogInput for VoterInput {
    type Entity = voter::Entity;

    fn into_row(self, id: ActiveValue<i32>) -> voter::ActiveModel {
        voter::ActiveModel {
            id,
            voter_id: Set(self.voter_id),
            has_voted: Set(self.has_voted),
            election_id: Set(self.election_id),
            table_id: Set(self.table_id),
        }
    }
}

/// Votes are only ever created; there is no update route for them.
#[derive(Debug, Deserialize)]
pub struct VoteInput {
    #[serde(rename = "mesa_id")]
    pub table_id: i32,
    #[serde(rename = "votante_id")]
    pub voter_id: i32,
    #[serde(rename = "candidatura_id")]
    pub candidacy_id: i32,
    #[serde(rename = "eleccion_id")]
    pub election_id: i32,
    #[serde(rename = "cargo_id", default)]
    pub position_id: Option<i32>,
}

impl CatalogInput for VoteInput {
    type Entity = vote::Entity;

    fn into_row(self, id: ActiveValue<i32>) -> vote::ActiveModel {
        vote::ActiveModel {
            id,
            table_id: Set(self.table_id),
            voter_id: Set(self.voter_id),
            candidacy_id: Set(self.candidacy_id),
            election_id: Set(self.election_id),
            position_id: Set(self.position_id),
        }
    }
}

// ============================================================================
// Table operation bodies
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct PrecinctTablesRequest {
    #[serde(rename = "recinto")]
    pub precinct_id: i32,
    #[serde(rename = "mesas")]
    pub tables: u32,
}

impl From<PrecinctTablesRequest> for PrecinctTables {
    fn from(req: PrecinctTablesRequest) -> Self {
        PrecinctTables {
            precinct_id: req.precinct_id,
            tables: req.tables,
        }
    }
}

/// POST /mesas/crear-distribuir request body
#[derive(Debug, Deserialize)]
pub struct CreateAndDistributeRequest {
    #[serde(rename = "eleccion", default)]
    pub election_id: Option<i32>,
    #[serde(rename = "recintos", default)]
    pub precincts: Vec<PrecinctTablesRequest>,
    #[serde(rename = "votantes", default)]
    pub voters: Vec<VoterId>,
}

/// POST /mesas/crear-mesas request body
#[derive(Debug, Deserialize)]
pub struct ProvisionTablesRequest {
    pub recinto_id: i32,
    pub cantidad_mesas: u32,
}

/// POST /mesas/asignar-jurado request body
#[derive(Debug, Deserialize)]
pub struct AssignChairRequest {
    #[serde(rename = "mesaId")]
    pub table_id: i32,
    #[serde(rename = "jefeId")]
    pub chair: VoterId,
}

/// POST /mesas/asignar-eleccion request body
#[derive(Debug, Deserialize)]
pub struct BindElectionRequest {
    #[serde(rename = "seccionId")]
    pub section_id: i32,
    #[serde(rename = "eleccionId")]
    pub election_id: i32,
}

/// POST /mesas/distribuir request body
#[derive(Debug, Deserialize)]
pub struct DistributeSectionRequest {
    #[serde(rename = "seccionId")]
    pub section_id: i32,
    #[serde(rename = "votantes", default)]
    pub voters: Vec<VoterId>,
}

// ============================================================================
// Response Types
// ============================================================================

/// Acknowledgement of an operation with no entity to return
#[derive(Debug, Serialize)]
pub struct Ack {
    #[serde(rename = "mensaje")]
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct BindElectionResponse {
    #[serde(rename = "mesas_asignadas")]
    pub tables_bound: u64,
}

#[derive(Debug, Serialize)]
pub struct VoteCountResponse {
    pub cantidad_votos: u64,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}
