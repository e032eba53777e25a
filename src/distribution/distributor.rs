//! Draining a roster into allocated tables.

use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set};

use super::roster::{RosterQueue, VoterId};
use super::SQL_CHUNK;
use crate::db::entities::{polling_table, voter};
use crate::error::Result;

/// Voters placed on one table, in the order they were dequeued
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableAssignment {
    pub table_id: i32,
    pub voters: Vec<VoterId>,
}

/// Fill `tables` in order, taking `capacity` voters from the roster for each.
///
/// Existing assignments of these tables are deleted first. A roster that runs
/// dry leaves the remaining tables short without failing.
pub async fn assign_voters<C: ConnectionTrait>(
    conn: &C,
    tables: &[polling_table::Model],
    roster: &mut RosterQueue,
) -> Result<Vec<TableAssignment>> {
    let table_ids: Vec<i32> = tables.iter().map(|t| t.id).collect();
    for ids in table_ids.chunks(SQL_CHUNK) {
        voter::Entity::delete_many()
            .filter(voter::Column::TableId.is_in(ids.iter().copied()))
            .exec(conn)
            .await?;
    }

    let mut assignments = Vec::with_capacity(tables.len());
    for table in tables {
        let capacity = usize::try_from(table.capacity).unwrap_or(0);
        let voters = roster.take(capacity);

        if voters.len() < capacity {
            tracing::debug!(
                "Roster exhausted: table {} got {} of {} voters",
                table.id,
                voters.len(),
                capacity
            );
        }

        for batch in voters.chunks(SQL_CHUNK) {
            let rows = batch.iter().map(|v| voter::ActiveModel {
                voter_id: Set(v.0),
                has_voted: Set(false),
                election_id: Set(table.election_id),
                table_id: Set(table.id),
                ..Default::default()
            });
            voter::Entity::insert_many(rows).exec(conn).await?;
        }

        assignments.push(TableAssignment {
            table_id: table.id,
            voters,
        });
    }

    if !roster.is_empty() {
        tracing::warn!("{} voters left without a table", roster.len());
    }

    Ok(assignments)
}
