//! Catalog handlers: generic list/retrieve/create/update/delete plus the
//! per-entity read endpoints.

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Json,
};
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection,
    EntityName, EntityTrait, IntoActiveModel, PrimaryKeyTrait, QueryFilter, QueryOrder, QuerySelect,
};
use serde::Serialize;

use super::types::{CatalogInput, HealthResponse};
use super::AppState;
use crate::db::entities::{candidacy, point, polling_table, precinct};
use crate::error::{Result, ServerError};

type ModelOf<E> = <E as EntityTrait>::Model;
type ActiveModelOf<E> = <E as EntityTrait>::ActiveModel;
type PrimaryKeyOf<E> = <<E as EntityTrait>::PrimaryKey as PrimaryKeyTrait>::ValueType;

/// Health check
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

async fn find_or_404<E>(db: &DatabaseConnection, id: i32) -> Result<ModelOf<E>>
where
    E: EntityTrait,
    i32: Into<PrimaryKeyOf<E>>,
{
    E::find_by_id(id).one(db).await?.ok_or_else(|| {
        ServerError::NotFound(format!("{} {} not found", E::default().table_name(), id))
    })
}

// ============================================================================
// Generic CRUD
// ============================================================================

/// GET /{collection}
pub async fn list<E>(State(state): State<Arc<AppState>>) -> Result<Json<Vec<ModelOf<E>>>>
where
    E: EntityTrait,
    ModelOf<E>: Serialize,
{
    Ok(Json(E::find().all(&state.db).await?))
}

/// GET /{collection}/:id
pub async fn retrieve<E>(
    State(state): State<Arc<AppState>>,
    path: std::result::Result<Path<i32>, PathRejection>,
) -> Result<Json<ModelOf<E>>>
where
    E: EntityTrait,
    ModelOf<E>: Serialize,
    i32: Into<PrimaryKeyOf<E>>,
{
    let Path(id) = path?;
    Ok(Json(find_or_404::<E>(&state.db, id).await?))
}

/// POST /{collection}
pub async fn create<I>(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<I>, JsonRejection>,
) -> Result<(StatusCode, Json<ModelOf<I::Entity>>)>
where
    I: CatalogInput,
    ModelOf<I::Entity>: IntoActiveModel<ActiveModelOf<I::Entity>> + Serialize,
    ActiveModelOf<I::Entity>: ActiveModelTrait<Entity = I::Entity> + ActiveModelBehavior + Send,
{
    let Json(input) = payload?;
    let model = input
        .into_row(ActiveValue::NotSet)
        .insert(&state.db)
        .await?;

    tracing::debug!("Created {} row", I::Entity::default().table_name());
    Ok((StatusCode::CREATED, Json(model)))
}

/// PUT /{collection}/:id - replaces every writable column
pub async fn update<I>(
    State(state): State<Arc<AppState>>,
    path: std::result::Result<Path<i32>, PathRejection>,
    payload: std::result::Result<Json<I>, JsonRejection>,
) -> Result<Json<ModelOf<I::Entity>>>
where
    I: CatalogInput,
    ModelOf<I::Entity>: IntoActiveModel<ActiveModelOf<I::Entity>> + Serialize,
    ActiveModelOf<I::Entity>: ActiveModelTrait<Entity = I::Entity> + ActiveModelBehavior + Send,
    i32: Into<PrimaryKeyOf<I::Entity>>,
{
    let Path(id) = path?;
    let Json(input) = payload?;

    find_or_404::<I::Entity>(&state.db, id).await?;
    let model = input
        .into_row(ActiveValue::Unchanged(id))
        .update(&state.db)
        .await?;
    Ok(Json(model))
}

/// DELETE /{collection}/:id
pub async fn destroy<E>(
    State(state): State<Arc<AppState>>,
    path: std::result::Result<Path<i32>, PathRejection>,
) -> Result<StatusCode>
where
    E: EntityTrait,
    i32: Into<PrimaryKeyOf<E>>,
{
    let Path(id) = path?;
    let deleted = E::delete_by_id(id).exec(&state.db).await?.rows_affected;
    if deleted == 0 {
        return Err(ServerError::NotFound(format!(
            "{} {} not found",
            E::default().table_name(),
            id
        )));
    }

    tracing::info!("Deleted {} {}", E::default().table_name(), id);
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Catalog Reads
// ============================================================================

/// GET /recintos/seccion/:seccion
pub async fn precincts_by_section(
    State(state): State<Arc<AppState>>,
    path: std::result::Result<Path<i32>, PathRejection>,
) -> Result<Json<Vec<precinct::Model>>> {
    let Path(section_id) = path?;
    let precincts = precinct::Entity::find()
        .filter(precinct::Column::SectionId.eq(section_id))
        .order_by_asc(precinct::Column::Id)
        .all(&state.db)
        .await?;
    Ok(Json(precincts))
}

/// GET /recintos/eleccion/:eleccion - precincts hosting at least one table of the election
pub async fn precincts_by_election(
    State(state): State<Arc<AppState>>,
    path: std::result::Result<Path<i32>, PathRejection>,
) -> Result<Json<Vec<precinct::Model>>> {
    let Path(election_id) = path?;

    let precinct_ids: Vec<i32> = polling_table::Entity::find()
        .select_only()
        .column(polling_table::Column::PrecinctId)
        .distinct()
        .filter(polling_table::Column::ElectionId.eq(election_id))
        .into_tuple()
        .all(&state.db)
        .await?;

    let precincts = precinct::Entity::find()
        .filter(precinct::Column::Id.is_in(precinct_ids))
        .order_by_asc(precinct::Column::Id)
        .all(&state.db)
        .await?;
    Ok(Json(precincts))
}

/// GET /puntos/seccion/:seccion - boundary points in drawing order
pub async fn points_by_section(
    State(state): State<Arc<AppState>>,
    path: std::result::Result<Path<i32>, PathRejection>,
) -> Result<Json<Vec<point::Model>>> {
    let Path(section_id) = path?;
    let points = point::Entity::find()
        .filter(point::Column::SectionId.eq(section_id))
        .order_by_asc(point::Column::Id)
        .all(&state.db)
        .await?;
    Ok(Json(points))
}

/// GET /candidaturas/cargo/:cargo/eleccion/:eleccion - the ballot for one position
pub async fn ballot(
    State(state): State<Arc<AppState>>,
    path: std::result::Result<Path<(i32, i32)>, PathRejection>,
) -> Result<Json<Vec<candidacy::Model>>> {
    let Path((position_id, election_id)) = path?;
    let candidacies = candidacy::Entity::find()
        .filter(candidacy::Column::PositionId.eq(position_id))
        .filter(candidacy::Column::ElectionId.eq(election_id))
        .order_by_asc(candidacy::Column::Id)
        .all(&state.db)
        .await?;
    Ok(Json(candidacies))
}
