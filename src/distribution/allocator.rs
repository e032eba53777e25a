//! Table allocation for an election's precincts.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};

use super::partition::balanced_sizes;
use crate::db::entities::{polling_table, precinct, voter};
use crate::error::{Result, ServerError};

/// Number of tables requested for one precinct
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PrecinctTables {
    pub precinct_id: i32,
    pub tables: u32,
}

pub(crate) async fn require_precinct<C: ConnectionTrait>(
    conn: &C,
    precinct_id: i32,
) -> Result<precinct::Model> {
    precinct::Entity::find_by_id(precinct_id)
        .one(conn)
        .await?
        .ok_or_else(|| ServerError::NotFound(format!("Precinct {} not found", precinct_id)))
}

/// Replace every table of `election_id` with fresh ones.
///
/// Destructive: previous tables, their voter assignments and chair overrides
/// are deleted first. Capacities come from one partition of `voter_count`
/// over the `total_tables` of all precincts combined, handed out in creation
/// order. `total_tables` must be the checked sum of `precincts`.
/// Must run inside the caller's transaction so a missing precinct undoes the
/// whole run.
pub async fn allocate_tables<C: ConnectionTrait>(
    conn: &C,
    election_id: i32,
    precincts: &[PrecinctTables],
    total_tables: u32,
    voter_count: u32,
) -> Result<Vec<polling_table::Model>> {
    let removed_voters = voter::Entity::delete_many()
        .filter(voter::Column::ElectionId.eq(election_id))
        .exec(conn)
        .await?
        .rows_affected;
    let removed_tables = polling_table::Entity::delete_many()
        .filter(polling_table::Column::ElectionId.eq(election_id))
        .exec(conn)
        .await?
        .rows_affected;
    if removed_tables > 0 {
        tracing::debug!(
            "Election {}: discarded {} tables and {} voter assignments from the previous run",
            election_id,
            removed_tables,
            removed_voters
        );
    }

    let mut sizes = balanced_sizes(voter_count, total_tables)?.into_iter();

    let mut created = Vec::with_capacity(total_tables as usize);
    for request in precincts {
        require_precinct(conn, request.precinct_id).await?;

        for number in 1..=request.tables {
            let capacity = sizes.next().unwrap_or(0);
            let table = polling_table::ActiveModel {
                number: Set(number as i32),
                capacity: Set(capacity as i32),
                chair_id: Set(None),
                precinct_id: Set(request.precinct_id),
                election_id: Set(Some(election_id)),
                ..Default::default()
            }
            .insert(conn)
            .await?;
            created.push(table);
        }
    }

    Ok(created)
}

/// Create `count` empty tables at a precinct with no election bound yet.
///
/// Numbers continue after the precinct's existing unbound tables.
pub async fn provision_tables<C: ConnectionTrait>(
    conn: &C,
    precinct_id: i32,
    count: u32,
) -> Result<Vec<polling_table::Model>> {
    require_precinct(conn, precinct_id).await?;

    let last_number = polling_table::Entity::find()
        .filter(polling_table::Column::PrecinctId.eq(precinct_id))
        .filter(polling_table::Column::ElectionId.is_null())
        .order_by_desc(polling_table::Column::Number)
        .one(conn)
        .await?
        .map(|t| t.number)
        .unwrap_or(0);

    let mut created = Vec::with_capacity(count as usize);
    for offset in 1..=count as i32 {
        let table = polling_table::ActiveModel {
            number: Set(last_number + offset),
            capacity: Set(0),
            chair_id: Set(None),
            precinct_id: Set(precinct_id),
            election_id: Set(None),
            ..Default::default()
        }
        .insert(conn)
        .await?;
        created.push(table);
    }

    Ok(created)
}
