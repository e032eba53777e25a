//! Read-only vote tallies.
//!
//! Plain reads over the append-only `votes` table, no transaction needed.
//! A candidacy or position without votes yields zero / an empty list.

use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, FromQueryResult, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect,
};
use serde::Serialize;

use crate::db::entities::vote;
use crate::error::Result;

/// Votes received by one candidacy
#[derive(Clone, Debug, PartialEq, Eq, Serialize, FromQueryResult)]
pub struct CandidacyTally {
    #[serde(rename = "candidatura_id")]
    pub candidacy_id: i32,
    #[serde(rename = "cantidad")]
    pub votes: i64,
}

/// Votes cast by `voter_id` in an election. More than one means a double vote got through.
pub async fn votes_by_voter<C: ConnectionTrait>(conn: &C, election_id: i32, voter_id: i32) -> Result<u64> {
    Ok(vote::Entity::find()
        .filter(vote::Column::ElectionId.eq(election_id))
        .filter(vote::Column::VoterId.eq(voter_id))
        .count(conn)
        .await?)
}

pub async fn votes_for_candidacy<C: ConnectionTrait>(conn: &C, candidacy_id: i32) -> Result<u64> {
    Ok(vote::Entity::find()
        .filter(vote::Column::CandidacyId.eq(candidacy_id))
        .count(conn)
        .await?)
}

/// Results ballot for one position: votes per candidacy, most voted first.
/// Ties go to the lower candidacy id.
pub async fn position_results<C: ConnectionTrait>(
    conn: &C,
    position_id: i32,
    election_id: i32,
) -> Result<Vec<CandidacyTally>> {
    Ok(vote::Entity::find()
        .select_only()
        .column_as(vote::Column::CandidacyId, "candidacy_id")
        .column_as(vote::Column::Id.count(), "votes")
        .filter(vote::Column::PositionId.eq(position_id))
        .filter(vote::Column::ElectionId.eq(election_id))
        .group_by(vote::Column::CandidacyId)
        .order_by_desc(vote::Column::Id.count())
        .order_by_asc(vote::Column::CandidacyId)
        .into_model::<CandidacyTally>()
        .all(conn)
        .await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_database;
    use sea_orm::{DatabaseConnection, Set};

    const ELECTION: i32 = 1;
    const MAYOR: i32 = 10;
    const COUNCIL: i32 = 11;

    async fn cast(db: &DatabaseConnection, voter_id: i32, candidacy_id: i32, position_id: Option<i32>) {
        vote::Entity::insert(vote::ActiveModel {
            table_id: Set(1),
            voter_id: Set(voter_id),
            candidacy_id: Set(candidacy_id),
            election_id: Set(ELECTION),
            position_id: Set(position_id),
            ..Default::default()
        })
        .exec(db)
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_position_results_ranked_by_count() {
        let db = test_database().await;
        let (a, b, c) = (100, 200, 300);

        let mut voter = 0;
        for (candidacy, n) in [(a, 5), (b, 8), (c, 2)] {
            for _ in 0..n {
                voter += 1;
                cast(&db, voter, candidacy, Some(MAYOR)).await;
            }
        }
        // Another office and a ballot without position must not leak in
        cast(&db, 900, a, Some(COUNCIL)).await;
        cast(&db, 901, a, None).await;

        let results = position_results(&db, MAYOR, ELECTION).await.unwrap();
        assert_eq!(
            results,
            vec![
                CandidacyTally { candidacy_id: b, votes: 8 },
                CandidacyTally { candidacy_id: a, votes: 5 },
                CandidacyTally { candidacy_id: c, votes: 2 },
            ]
        );

        let json = serde_json::to_value(&results[0]).unwrap();
        assert_eq!(json, serde_json::json!({ "candidatura_id": b, "cantidad": 8 }));
    }

    #[tokio::test]
    async fn test_ties_broken_by_candidacy_id() {
        let db = test_database().await;
        cast(&db, 1, 7, Some(MAYOR)).await;
        cast(&db, 2, 3, Some(MAYOR)).await;

        let results = position_results(&db, MAYOR, ELECTION).await.unwrap();
        let ids: Vec<i32> = results.iter().map(|r| r.candidacy_id).collect();
        assert_eq!(ids, vec![3, 7]);
    }

    #[tokio::test]
    async fn test_counts() {
        let db = test_database().await;
        cast(&db, 42, 100, Some(MAYOR)).await;
        cast(&db, 42, 101, Some(COUNCIL)).await;
        cast(&db, 43, 100, Some(MAYOR)).await;

        assert_eq!(votes_by_voter(&db, ELECTION, 42).await.unwrap(), 2);
        assert_eq!(votes_by_voter(&db, ELECTION + 1, 42).await.unwrap(), 0);
        assert_eq!(votes_for_candidacy(&db, 100).await.unwrap(), 2);
        assert_eq!(votes_for_candidacy(&db, 555).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_empty_position_is_empty_list() {
        let db = test_database().await;
        assert!(position_results(&db, MAYOR, ELECTION).await.unwrap().is_empty());
    }
}
