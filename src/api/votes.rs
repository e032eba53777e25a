//! Vote tally endpoints.

use std::sync::Arc;

use axum::{
    extract::{rejection::PathRejection, Path, State},
    Json,
};

use super::types::VoteCountResponse;
use super::AppState;
use crate::error::Result;
use crate::tally::{self, CandidacyTally};

/// GET /votos/eleccion/:eleccion/votante/:votante
pub async fn count_by_voter(
    State(state): State<Arc<AppState>>,
    path: std::result::Result<Path<(i32, i32)>, PathRejection>,
) -> Result<Json<VoteCountResponse>> {
    let Path((election_id, voter_id)) = path?;
    let cantidad_votos = tally::votes_by_voter(&state.db, election_id, voter_id).await?;
    Ok(Json(VoteCountResponse { cantidad_votos }))
}

/// GET /votos/candidatura/:candidatura
pub async fn count_by_candidacy(
    State(state): State<Arc<AppState>>,
    path: std::result::Result<Path<i32>, PathRejection>,
) -> Result<Json<VoteCountResponse>> {
    let Path(candidacy_id) = path?;
    let cantidad_votos = tally::votes_for_candidacy(&state.db, candidacy_id).await?;
    Ok(Json(VoteCountResponse { cantidad_votos }))
}

/// GET /votos/cargo/:cargo/eleccion/:eleccion/candidaturas
pub async fn position_results(
    State(state): State<Arc<AppState>>,
    path: std::result::Result<Path<(i32, i32)>, PathRejection>,
) -> Result<Json<Vec<CandidacyTally>>> {
    let Path((position_id, election_id)) = path?;
    let results = tally::position_results(&state.db, position_id, election_id).await?;
    Ok(Json(results))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use crate::api::handlers::create;
    use crate::api::types::VoteInput;
    use crate::db::test_database;

    async fn cast(state: &Arc<AppState>, voter_id: i32, candidacy_id: i32) {
        let input: VoteInput = serde_json::from_value(serde_json::json!({
            "mesa_id": 1,
            "votante_id": voter_id,
            "candidatura_id": candidacy_id,
            "eleccion_id": 1,
            "cargo_id": 2
        }))
        .unwrap();
        let (status, _) = create::<VoteInput>(State(state.clone()), Ok(Json(input)))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::CREATED);
    }

    #[tokio::test]
    async fn test_tally_endpoints() {
        let state = Arc::new(AppState::new(test_database().await));
        cast(&state, 1, 30).await;
        cast(&state, 2, 20).await;
        cast(&state, 3, 20).await;

        let Json(count) = count_by_voter(State(state.clone()), Ok(Path((1, 2))))
            .await
            .unwrap();
        assert_eq!(serde_json::to_value(&count).unwrap(), serde_json::json!({ "cantidad_votos": 1 }));

        let Json(count) = count_by_candidacy(State(state.clone()), Ok(Path(20)))
            .await
            .unwrap();
        assert_eq!(count.cantidad_votos, 2);

        let Json(results) = position_results(State(state.clone()), Ok(Path((2, 1))))
            .await
            .unwrap();
        assert_eq!(
            serde_json::to_value(&results).unwrap(),
            serde_json::json!([
                { "candidatura_id": 20, "cantidad": 2 },
                { "candidatura_id": 30, "cantidad": 1 }
            ])
        );

        let Json(empty) = position_results(State(state), Ok(Path((9, 1))))
            .await
            .unwrap();
        assert!(empty.is_empty());
    }
}
