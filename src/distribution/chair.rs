//! Table chair (presiding officer) selection.

use sea_orm::{ActiveModelTrait, ActiveValue, ConnectionTrait, EntityTrait, IntoActiveModel, Set};

use super::distributor::TableAssignment;
use super::roster::VoterId;
use crate::db::entities::polling_table;
use crate::error::{Result, ServerError};

/// Make the first voter dequeued into each table its chair.
///
/// Tables that received nobody end up without a chair. Returns the updated
/// tables in the order of `assignments`.
pub async fn assign_default_chairs<C: ConnectionTrait>(
    conn: &C,
    assignments: &[TableAssignment],
) -> Result<Vec<polling_table::Model>> {
    let mut tables = Vec::with_capacity(assignments.len());
    for assignment in assignments {
        let table = polling_table::ActiveModel {
            id: ActiveValue::Unchanged(assignment.table_id),
            chair_id: Set(assignment.voters.first().map(|v| v.0)),
            ..Default::default()
        }
        .update(conn)
        .await?;
        tables.push(table);
    }
    Ok(tables)
}

/// Overwrite a table's chair.
///
/// The voter is not checked against the table's assignments; callers relying
/// on chairs being seated at their own table must verify that beforehand.
pub async fn set_chair<C: ConnectionTrait>(
    conn: &C,
    table_id: i32,
    chair: VoterId,
) -> Result<polling_table::Model> {
    let table = polling_table::Entity::find_by_id(table_id)
        .one(conn)
        .await?
        .ok_or_else(|| ServerError::NotFound(format!("Table {} not found", table_id)))?;

    let mut active = table.into_active_model();
    active.chair_id = Set(Some(chair.0));
    Ok(active.update(conn).await?)
}
