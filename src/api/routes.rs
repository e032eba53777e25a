//! Route table of the HTTP API.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{self, create, destroy, list, retrieve, update};
use super::types::*;
use super::{tables, votes, AppState};
use crate::db::entities::{
    Candidacy, Election, Point, PollingTable, Position, Precinct, Section, Vote, Voter,
};

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(handlers::health))
        // ================================================================
        // Geography
        // ================================================================
        .route("/secciones", get(list::<Section>).post(create::<SectionInput>))
        .route(
            "/secciones/:id",
            get(retrieve::<Section>)
                .put(update::<SectionInput>)
                .delete(destroy::<Section>),
        )
        .route("/puntos", get(list::<Point>).post(create::<PointInput>))
        .route(
            "/puntos/:id",
            get(retrieve::<Point>)
                .put(update::<PointInput>)
                .delete(destroy::<Point>),
        )
        .route("/puntos/seccion/:seccion", get(handlers::points_by_section))
        .route("/recintos", get(list::<Precinct>).post(create::<PrecinctInput>))
        .route(
            "/recintos/:id",
            get(retrieve::<Precinct>)
                .put(update::<PrecinctInput>)
                .delete(destroy::<Precinct>),
        )
        .route("/recintos/seccion/:seccion", get(handlers::precincts_by_section))
        .route("/recintos/eleccion/:eleccion", get(handlers::precincts_by_election))
        // ================================================================
        // Elections and ballots
        // ================================================================
        .route("/elecciones", get(list::<Election>).post(create::<ElectionInput>))
        .route(
            "/elecciones/:id",
            get(retrieve::<Election>)
                .put(update::<ElectionInput>)
                .delete(destroy::<Election>),
        )
        .route("/cargos", get(list::<Position>).post(create::<PositionInput>))
        .route(
            "/cargos/:id",
            get(retrieve::<Position>)
                .put(update::<PositionInput>)
                .delete(destroy::<Position>),
        )
        .route("/candidaturas", get(list::<Candidacy>).post(create::<CandidacyInput>))
        .route(
            "/candidaturas/:id",
            get(retrieve::<Candidacy>)
                .put(update::<CandidacyInput>)
                .delete(destroy::<Candidacy>),
        )
        .route(
            "/candidaturas/cargo/:cargo/eleccion/:eleccion",
            get(handlers::ballot),
        )
        // ================================================================
        // Tables and voter assignments
        // ================================================================
        .route("/mesas", get(list::<PollingTable>).post(create::<TableInput>))
        .route(
            "/mesas/:id",
            get(retrieve::<PollingTable>)
                .put(update::<TableInput>)
                .delete(destroy::<PollingTable>),
        )
        .route("/mesas/crear-distribuir", post(tables::create_and_distribute))
        .route("/mesas/crear-mesas", post(tables::provision_tables))
        .route("/mesas/asignar-jurado", post(tables::assign_chair))
        .route("/mesas/asignar-eleccion", post(tables::bind_election))
        .route("/mesas/distribuir", post(tables::distribute_section))
        .route(
            "/mesas/recinto/:recinto/eleccion/:eleccion",
            get(tables::tables_by_precinct),
        )
        .route("/votantes", get(list::<Voter>).post(create::<VoterInput>))
        .route(
            "/votantes/:id",
            get(retrieve::<Voter>)
                .put(update::<VoterInput>)
                .delete(destroy::<Voter>),
        )
        // ================================================================
        // Votes (append-only)
        // ================================================================
        .route("/votos", get(list::<Vote>).post(create::<VoteInput>))
        .route("/votos/:id", get(retrieve::<Vote>))
        .route(
            "/votos/eleccion/:eleccion/votante/:votante",
            get(votes::count_by_voter),
        )
        .route("/votos/candidatura/:candidatura", get(votes::count_by_candidacy))
        .route(
            "/votos/cargo/:cargo/eleccion/:eleccion/candidaturas",
            get(votes::position_results),
        )
}
