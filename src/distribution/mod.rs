//! Table allocation and voter distribution.
//!
//! Every entry point here runs in a single store transaction: either all
//! tables, voter assignments and chairs of a run become visible, or none do.
//! Runs are replace-all. Re-running for the same election or section wipes
//! the previous tables/assignments instead of diffing against them.

mod allocator;
mod chair;
mod distributor;
mod partition;
mod roster;

use std::collections::HashSet;

use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DatabaseConnection,
    DatabaseTransaction, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use sea_orm::sea_query::Expr;
use serde::Serialize;

pub use allocator::PrecinctTables;
pub use chair::set_chair;
pub use roster::VoterId;

use allocator::{allocate_tables, provision_tables};
use chair::assign_default_chairs;
use distributor::assign_voters;
use partition::balanced_sizes;
use roster::RosterQueue;

use crate::db::entities::{election, polling_table, precinct, section, voter};
use crate::error::{Result, ServerError};

/// Ids bound per `IN (..)` filter or rows per multi-row insert. Keeps every
/// statement far below SQLite's bound-variable limit.
const SQL_CHUNK: usize = 1000;

/// Input of a combined allocate-and-distribute run
#[derive(Clone, Debug)]
pub struct DistributionPlan {
    pub election_id: i32,
    pub precincts: Vec<PrecinctTables>,
    /// Ordered roster; position decides table and chair
    pub roster: Vec<VoterId>,
}

impl DistributionPlan {
    pub fn total_tables(&self) -> Result<u32> {
        self.precincts
            .iter()
            .try_fold(0u32, |sum, p| sum.checked_add(p.tables))
            .ok_or_else(|| ServerError::InvalidRequest("Too many tables requested".to_string()))
    }

    /// Reject plans that could never produce a valid distribution, before any write.
    /// Returns the total number of tables.
    pub fn validate(&self) -> Result<u32> {
        if self.precincts.is_empty() || self.roster.is_empty() {
            return Err(ServerError::InvalidRequest(
                "'eleccion', 'recintos' and 'votantes' are required".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for p in &self.precincts {
            if !seen.insert(p.precinct_id) {
                return Err(ServerError::InvalidRequest(format!(
                    "Precinct {} is listed more than once",
                    p.precinct_id
                )));
            }
        }

        let total_tables = self.total_tables()?;
        if total_tables < 1 {
            return Err(ServerError::InvalidRequest(
                "There must be at least one table".to_string(),
            ));
        }
        if total_tables as usize > self.roster.len() {
            return Err(ServerError::InvalidRequest(format!(
                "More tables ({}) than voters ({})",
                total_tables,
                self.roster.len()
            )));
        }

        Ok(total_tables)
    }
}

/// Outcome of distributing a roster over a section's unbound tables
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DistributionSummary {
    #[serde(rename = "mesas")]
    pub tables: usize,
    #[serde(rename = "votantes_asignados")]
    pub assigned: usize,
}

async fn finish<T>(txn: DatabaseTransaction, outcome: Result<T>, operation: &str) -> Result<T> {
    match outcome {
        Ok(value) => {
            txn.commit().await?;
            Ok(value)
        }
        Err(e) => {
            tracing::warn!("{} rolled back: {}", operation, e);
            txn.rollback().await?;
            Err(e)
        }
    }
}

async fn require_election<C: ConnectionTrait>(conn: &C, election_id: i32) -> Result<election::Model> {
    election::Entity::find_by_id(election_id)
        .one(conn)
        .await?
        .ok_or_else(|| ServerError::NotFound(format!("Election {} not found", election_id)))
}

async fn section_precinct_ids<C: ConnectionTrait>(conn: &C, section_id: i32) -> Result<Vec<i32>> {
    section::Entity::find_by_id(section_id)
        .one(conn)
        .await?
        .ok_or_else(|| ServerError::NotFound(format!("Section {} not found", section_id)))?;

    let ids: Vec<i32> = precinct::Entity::find()
        .select_only()
        .column(precinct::Column::Id)
        .filter(precinct::Column::SectionId.eq(section_id))
        .into_tuple()
        .all(conn)
        .await?;

    if ids.is_empty() {
        return Err(ServerError::NotFound(format!(
            "Section {} has no precincts",
            section_id
        )));
    }
    Ok(ids)
}

async fn unbound_tables<C: ConnectionTrait>(
    conn: &C,
    section_id: i32,
) -> Result<Vec<polling_table::Model>> {
    let precinct_ids = section_precinct_ids(conn, section_id).await?;

    let mut tables = Vec::new();
    for ids in precinct_ids.chunks(SQL_CHUNK) {
        let batch = polling_table::Entity::find()
            .filter(polling_table::Column::PrecinctId.is_in(ids.iter().copied()))
            .filter(polling_table::Column::ElectionId.is_null())
            .order_by_asc(polling_table::Column::Id)
            .all(conn)
            .await?;
        tables.extend(batch);
    }
    tables.sort_by_key(|t| t.id);

    if tables.is_empty() {
        return Err(ServerError::NotFound(format!(
            "Section {} has no unassigned tables",
            section_id
        )));
    }
    Ok(tables)
}

/// Allocate an election's tables and distribute the roster over them.
///
/// Destructive: all previous tables and assignments of the election are
/// replaced. Returns the created tables, with capacities and default chairs,
/// in creation order.
pub async fn create_and_distribute(
    db: &DatabaseConnection,
    plan: DistributionPlan,
) -> Result<Vec<polling_table::Model>> {
    let total_tables = plan.validate()?;
    let voter_count = u32::try_from(plan.roster.len())
        .map_err(|_| ServerError::InvalidRequest("Roster is too large".to_string()))?;

    let txn = db.begin().await?;
    let outcome = async {
        require_election(&txn, plan.election_id).await?;

        let tables = allocate_tables(
            &txn,
            plan.election_id,
            &plan.precincts,
            total_tables,
            voter_count,
        )
        .await?;
        let mut roster = RosterQueue::from(plan.roster.clone());
        let assignments = assign_voters(&txn, &tables, &mut roster).await?;
        assign_default_chairs(&txn, &assignments).await
    }
    .await;
    let tables = finish(txn, outcome, "Table allocation").await?;

    tracing::info!(
        "Election {}: distributed {} voters over {} tables",
        plan.election_id,
        voter_count,
        tables.len()
    );
    Ok(tables)
}

/// Pre-provision `count` tables at a precinct with capacity 0 and no election
pub async fn provision(
    db: &DatabaseConnection,
    precinct_id: i32,
    count: u32,
) -> Result<Vec<polling_table::Model>> {
    if count < 1 {
        return Err(ServerError::InvalidRequest(
            "'cantidad_mesas' must be at least 1".to_string(),
        ));
    }

    let txn = db.begin().await?;
    let outcome = provision_tables(&txn, precinct_id, count).await;
    let tables = finish(txn, outcome, "Table provisioning").await?;

    tracing::info!("Precinct {}: provisioned {} tables", precinct_id, tables.len());
    Ok(tables)
}

/// Distribute a roster over the unbound tables of a section's precincts.
///
/// Capacities of those tables are recomputed from the roster size. Previous
/// assignments of the tables are replaced.
pub async fn distribute_section(
    db: &DatabaseConnection,
    section_id: i32,
    roster: Vec<VoterId>,
) -> Result<DistributionSummary> {
    if roster.is_empty() {
        return Err(ServerError::InvalidRequest(
            "'votantes' must not be empty".to_string(),
        ));
    }
    let voter_count = u32::try_from(roster.len())
        .map_err(|_| ServerError::InvalidRequest("Roster is too large".to_string()))?;

    let txn = db.begin().await?;
    let outcome = async {
        let tables = unbound_tables(&txn, section_id).await?;
        let sizes = balanced_sizes(voter_count, tables.len() as u32)?;

        let mut sized = Vec::with_capacity(tables.len());
        for (table, size) in tables.into_iter().zip(sizes) {
            let table = polling_table::ActiveModel {
                id: ActiveValue::Unchanged(table.id),
                capacity: Set(size as i32),
                ..Default::default()
            }
            .update(&txn)
            .await?;
            sized.push(table);
        }

        let mut queue = RosterQueue::from(roster);
        let assignments = assign_voters(&txn, &sized, &mut queue).await?;
        assign_default_chairs(&txn, &assignments).await?;

        Ok::<_, ServerError>(DistributionSummary {
            tables: assignments.len(),
            assigned: assignments.iter().map(|a| a.voters.len()).sum(),
        })
    }
    .await;
    let summary = finish(txn, outcome, "Section distribution").await?;

    tracing::info!(
        "Section {}: distributed {} voters over {} unassigned tables",
        section_id,
        summary.assigned,
        summary.tables
    );
    Ok(summary)
}

/// Bind every unbound table of a section, and the voters seated at them, to an election.
///
/// Returns the number of tables bound.
pub async fn bind_section_to_election(
    db: &DatabaseConnection,
    section_id: i32,
    election_id: i32,
) -> Result<u64> {
    let txn = db.begin().await?;
    let outcome = async {
        require_election(&txn, election_id).await?;
        let table_ids: Vec<i32> = unbound_tables(&txn, section_id)
            .await?
            .into_iter()
            .map(|t| t.id)
            .collect();

        let mut bound = 0;
        for ids in table_ids.chunks(SQL_CHUNK) {
            bound += polling_table::Entity::update_many()
                .col_expr(polling_table::Column::ElectionId, Expr::value(election_id))
                .filter(polling_table::Column::Id.is_in(ids.iter().copied()))
                .exec(&txn)
                .await?
                .rows_affected;

            voter::Entity::update_many()
                .col_expr(voter::Column::ElectionId, Expr::value(election_id))
                .filter(voter::Column::TableId.is_in(ids.iter().copied()))
                .exec(&txn)
                .await?;
        }

        Ok::<_, ServerError>(bound)
    }
    .await;
    let bound = finish(txn, outcome, "Election binding").await?;

    tracing::info!(
        "Section {}: bound {} tables to election {}",
        section_id,
        bound,
        election_id
    );
    Ok(bound)
}
