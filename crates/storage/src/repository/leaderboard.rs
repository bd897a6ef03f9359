use sqlx::{PgPool, QueryBuilder};
use uuid::Uuid;

use crate::dto::leaderboard::{LeaderboardFilter, ScoredGuessRow};
use crate::error::Result;

/// Repository assembling the scored-guess row set that feeds leaderboard
/// aggregation. Filters are composed dynamically; dimension tables are only
/// joined when a filter actually needs them.
pub struct LeaderboardRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> LeaderboardRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Fetch every guess that counts under the filter: the entry's actual
    /// value is recorded and points have been assigned. Guesses that are not
    /// yet scored never reach aggregation.
    pub async fn fetch_scored_guesses(
        &self,
        filter: &LeaderboardFilter,
    ) -> Result<Vec<ScoredGuessRow>> {
        let mut query = QueryBuilder::new(
            r#"
            SELECT g.player_id, p.username, g.points
            FROM guesses g
            INNER JOIN players p ON g.player_id = p.player_id
            INNER JOIN entries e ON g.entry_id = e.entry_id
            INNER JOIN competitions c ON e.competition_id = c.competition_id
            "#,
        );

        // The athlete dimension is only needed for the gender filter; an
        // unconditional join would be a useless scan on every other query.
        if filter.gender.is_some() {
            query.push(" INNER JOIN athletes a ON e.athlete_id = a.athlete_id ");
        }

        query.push(" WHERE e.actual_value IS NOT NULL AND g.points IS NOT NULL ");

        if let Some(competition_id) = filter.competition_id {
            query.push(" AND e.competition_id = ");
            query.push_bind(competition_id);
        }

        if let Some(discipline_id) = filter.discipline_id {
            query.push(" AND e.discipline_id = ");
            query.push_bind(discipline_id);
        }

        if let Some(ref gender) = filter.gender {
            query.push(" AND a.gender = ");
            query.push_bind(gender);
        }

        if let Some(date_from) = filter.date_from {
            query.push(" AND c.starts_at >= ");
            query.push_bind(date_from);
        }

        if let Some(date_to) = filter.date_to {
            query.push(" AND c.starts_at <= ");
            query.push_bind(date_to);
        }

        query.push(" ORDER BY p.username, g.submitted_at ");

        let rows: Vec<ScoredGuessRow> = query.build_query_as().fetch_all(self.pool).await?;

        Ok(rows)
    }

    /// Sum of a player's scored points, optionally restricted to one
    /// competition. Players without scored guesses sum to 0.
    pub async fn sum_points(
        &self,
        player_id: Uuid,
        competition_id: Option<Uuid>,
    ) -> Result<i64> {
        let mut query = QueryBuilder::new(
            r#"
            SELECT COALESCE(SUM(g.points), 0)::BIGINT
            FROM guesses g
            INNER JOIN entries e ON g.entry_id = e.entry_id
            WHERE g.points IS NOT NULL AND g.player_id =
            "#,
        );
        query.push_bind(player_id);

        if let Some(competition_id) = competition_id {
            query.push(" AND e.competition_id = ");
            query.push_bind(competition_id);
        }

        let total = query
            .build_query_scalar::<i64>()
            .fetch_one(self.pool)
            .await?;

        Ok(total)
    }
}
