//! Polling table operations: allocation, distribution, chairs and binding.

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Json,
};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};

use super::types::{
    Ack, AssignChairRequest, BindElectionRequest, BindElectionResponse,
    CreateAndDistributeRequest, DistributeSectionRequest, ProvisionTablesRequest,
};
use super::AppState;
use crate::db::entities::polling_table;
use crate::distribution::{self, DistributionPlan, DistributionSummary};
use crate::error::{Result, ServerError};

/// POST /mesas/crear-distribuir
///
/// Replaces every table of the election. Responds with the created tables.
pub async fn create_and_distribute(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<CreateAndDistributeRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Vec<polling_table::Model>>)> {
    let Json(req) = payload?;
    let election_id = req.election_id.ok_or_else(|| {
        ServerError::InvalidRequest("'eleccion', 'recintos' and 'votantes' are required".to_string())
    })?;

    let plan = DistributionPlan {
        election_id,
        precincts: req.precincts.into_iter().map(Into::into).collect(),
        roster: req.voters,
    };
    let tables = distribution::create_and_distribute(&state.db, plan).await?;
    Ok((StatusCode::CREATED, Json(tables)))
}

/// POST /mesas/crear-mesas
pub async fn provision_tables(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<ProvisionTablesRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Vec<polling_table::Model>>)> {
    let Json(req) = payload?;
    let tables = distribution::provision(&state.db, req.recinto_id, req.cantidad_mesas).await?;
    Ok((StatusCode::CREATED, Json(tables)))
}

/// POST /mesas/asignar-jurado
pub async fn assign_chair(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<AssignChairRequest>, JsonRejection>,
) -> Result<Json<Ack>> {
    let Json(req) = payload?;
    let table = distribution::set_chair(&state.db, req.table_id, req.chair).await?;

    tracing::info!("Table {}: chair set to voter {}", table.id, req.chair.0);
    Ok(Json(Ack {
        message: format!("Jefe de mesa asignado a la mesa {}", table.id),
    }))
}

/// POST /mesas/asignar-eleccion
pub async fn bind_election(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<BindElectionRequest>, JsonRejection>,
) -> Result<Json<BindElectionResponse>> {
    let Json(req) = payload?;
    let tables_bound =
        distribution::bind_section_to_election(&state.db, req.section_id, req.election_id).await?;
    Ok(Json(BindElectionResponse { tables_bound }))
}

/// POST /mesas/distribuir
pub async fn distribute_section(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<DistributeSectionRequest>, JsonRejection>,
) -> Result<Json<DistributionSummary>> {
    let Json(req) = payload?;
    let summary = distribution::distribute_section(&state.db, req.section_id, req.voters).await?;
    Ok(Json(summary))
}

/// GET /mesas/recinto/:recinto/eleccion/:eleccion
pub async fn tables_by_precinct(
    State(state): State<Arc<AppState>>,
    path: std::result::Result<Path<(i32, i32)>, PathRejection>,
) -> Result<Json<Vec<polling_table::Model>>> {
    let Path((precinct_id, election_id)) = path?;
    let tables = polling_table::Entity::find()
        .filter(polling_table::Column::PrecinctId.eq(precinct_id))
        .filter(polling_table::Column::ElectionId.eq(election_id))
        .order_by_asc(polling_table::Column::Number)
        .all(&state.db)
        .await?;
    Ok(Json(tables))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::handlers::precincts_by_election;
    use crate::db::entities::{election, precinct, section, voter};
    use crate::db::test_database;
    use axum::response::IntoResponse;
    use sea_orm::{ActiveModelTrait, PaginatorTrait, Set};

    struct Fixture {
        state: Arc<AppState>,
        section_id: i32,
        election_id: i32,
        precincts: Vec<i32>,
    }

    async fn fixture() -> Fixture {
        let db = test_database().await;
        let section = section::ActiveModel {
            name: Set("Cercado".to_string()),
            kind: Set(None),
            ..Default::default()
        }
        .insert(&db)
        .await
        .unwrap();
        let election = election::ActiveModel {
            name: Set("Subnacionales 2026".to_string()),
            date: Set(chrono::NaiveDate::from_ymd_opt(2026, 3, 8).unwrap()),
            section_id: Set(section.id),
            ..Default::default()
        }
        .insert(&db)
        .await
        .unwrap();

        let mut precincts = Vec::new();
        for name in ["Colegio Sucre", "Escuela Bolivar", "Unidad Educativa Junin"] {
            let p = precinct::ActiveModel {
                name: Set(name.to_string()),
                latitude: Set(-17.39),
                longitude: Set(-66.15),
                section_id: Set(Some(section.id)),
                ..Default::default()
            }
            .insert(&db)
            .await
            .unwrap();
            precincts.push(p.id);
        }

        Fixture {
            state: Arc::new(AppState::new(db)),
            section_id: section.id,
            election_id: election.id,
            precincts,
        }
    }

    fn body<T: serde::de::DeserializeOwned>(value: serde_json::Value) -> Json<T> {
        Json(serde_json::from_value(value).unwrap())
    }

    #[tokio::test]
    async fn test_create_and_distribute_endpoint() {
        let f = fixture().await;
        let req = body(serde_json::json!({
            "eleccion": f.election_id,
            "recintos": [
                { "recinto": f.precincts[0], "mesas": 2 },
                { "recinto": f.precincts[1], "mesas": 1 }
            ],
            "votantes": [11, 12, 13, 14, 15, 16, 17, 18, 19, 20]
        }));

        let (status, Json(tables)) = create_and_distribute(State(f.state.clone()), Ok(req))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(tables.len(), 3);

        let json = serde_json::to_value(&tables[0]).unwrap();
        assert_eq!(json["numero"], 1);
        assert_eq!(json["cantidad"], 4);
        assert_eq!(json["jefe_id"], 11);
        assert_eq!(json["recinto"], f.precincts[0]);
        assert_eq!(json["eleccion"], f.election_id);

        let Json(at_first) = tables_by_precinct(
            State(f.state.clone()),
            Ok(Path((f.precincts[0], f.election_id))),
        )
        .await
        .unwrap();
        assert_eq!(at_first.iter().map(|t| t.number).collect::<Vec<_>>(), vec![1, 2]);

        let Json(hosting) = precincts_by_election(State(f.state.clone()), Ok(Path(f.election_id)))
            .await
            .unwrap();
        assert_eq!(
            hosting.iter().map(|p| p.id).collect::<Vec<_>>(),
            vec![f.precincts[0], f.precincts[1]]
        );
    }

    #[tokio::test]
    async fn test_create_and_distribute_rejects_bad_bodies() {
        let f = fixture().await;

        let missing_election = body(serde_json::json!({
            "recintos": [{ "recinto": f.precincts[0], "mesas": 1 }],
            "votantes": [1, 2]
        }));
        let err = create_and_distribute(State(f.state.clone()), Ok(missing_election))
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);

        let too_many_tables = body(serde_json::json!({
            "eleccion": f.election_id,
            "recintos": [{ "recinto": f.precincts[0], "mesas": 5 }],
            "votantes": [1, 2, 3]
        }));
        let err = create_and_distribute(State(f.state.clone()), Ok(too_many_tables))
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let overflowing = body(serde_json::json!({
            "eleccion": f.election_id,
            "recintos": [
                { "recinto": f.precincts[0], "mesas": 4294967295u64 },
                { "recinto": f.precincts[1], "mesas": 2 }
            ],
            "votantes": [1]
        }));
        let err = create_and_distribute(State(f.state.clone()), Ok(overflowing))
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);

        let unknown_election = body(serde_json::json!({
            "eleccion": 4242,
            "recintos": [{ "recinto": f.precincts[0], "mesas": 1 }],
            "votantes": [1, 2]
        }));
        let err = create_and_distribute(State(f.state.clone()), Ok(unknown_election))
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);

        let tables = polling_table::Entity::find().count(&f.state.db).await.unwrap();
        assert_eq!(tables, 0);
    }

    #[tokio::test]
    async fn test_provision_distribute_bind_flow() {
        let f = fixture().await;

        let req = body(serde_json::json!({ "recinto_id": f.precincts[2], "cantidad_mesas": 3 }));
        let (status, Json(tables)) = provision_tables(State(f.state.clone()), Ok(req))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(tables.iter().map(|t| t.number).collect::<Vec<_>>(), vec![1, 2, 3]);
        assert!(tables.iter().all(|t| t.capacity == 0 && t.election_id.is_none()));

        let req = body(serde_json::json!({ "seccionId": f.section_id, "votantes": [1, 2, 3, 4, 5] }));
        let Json(summary) = distribute_section(State(f.state.clone()), Ok(req))
            .await
            .unwrap();
        assert_eq!(
            serde_json::to_value(&summary).unwrap(),
            serde_json::json!({ "mesas": 3, "votantes_asignados": 5 })
        );

        let req = body(serde_json::json!({ "seccionId": f.section_id, "eleccionId": f.election_id }));
        let Json(bound) = bind_election(State(f.state.clone()), Ok(req)).await.unwrap();
        assert_eq!(bound.tables_bound, 3);

        let voters = voter::Entity::find()
            .filter(voter::Column::ElectionId.eq(f.election_id))
            .count(&f.state.db)
            .await
            .unwrap();
        assert_eq!(voters, 5);

        let req = body(serde_json::json!({ "mesaId": tables[1].id, "jefeId": 5 }));
        let Json(ack) = assign_chair(State(f.state.clone()), Ok(req)).await.unwrap();
        assert!(ack.message.contains(&tables[1].id.to_string()));

        let table = polling_table::Entity::find_by_id(tables[1].id)
            .one(&f.state.db)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(table.chair_id, Some(5));
    }

    #[tokio::test]
    async fn test_table_operations_not_found() {
        let f = fixture().await;

        let req = body(serde_json::json!({ "recinto_id": 4242, "cantidad_mesas": 1 }));
        let err = provision_tables(State(f.state.clone()), Ok(req)).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);

        let req = body(serde_json::json!({ "mesaId": 4242, "jefeId": 1 }));
        let err = assign_chair(State(f.state.clone()), Ok(req)).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);

        // Precincts exist but none has unbound tables yet
        let req = body(serde_json::json!({ "seccionId": f.section_id, "votantes": [1] }));
        let err = distribute_section(State(f.state.clone()), Ok(req)).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);

        let req = body(serde_json::json!({ "seccionId": f.section_id, "eleccionId": f.election_id }));
        let err = bind_election(State(f.state), Ok(req)).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_request_bodies_require_fields() {
        let missing: std::result::Result<ProvisionTablesRequest, _> =
            serde_json::from_value(serde_json::json!({ "recinto_id": 5 }));
        assert!(missing.is_err());

        let negative: std::result::Result<ProvisionTablesRequest, _> =
            serde_json::from_value(serde_json::json!({ "recinto_id": 5, "cantidad_mesas": -1 }));
        assert!(negative.is_err());
    }
}
