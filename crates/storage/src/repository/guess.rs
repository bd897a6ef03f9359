use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::guess::{EntryWithGuess, PlayerCompetitionSummary};
use crate::error::{Result, StorageError};
use crate::models::Guess;

/// Repository for guess database operations
pub struct GuessRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> GuessRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a guess, or replace the predicted value of an existing one.
    /// One guess per player and entry; `submitted_at` keeps the time of the
    /// first submission and `points` stays null until scoring runs.
    pub async fn upsert(&self, player_id: Uuid, entry_id: Uuid, predicted: Decimal) -> Result<Guess> {
        let guess = sqlx::query_as::<_, Guess>(
            r#"
            INSERT INTO guesses (player_id, entry_id, predicted)
            VALUES ($1, $2, $3)
            ON CONFLICT (player_id, entry_id)
            DO UPDATE SET predicted = EXCLUDED.predicted, updated_at = now()
            RETURNING guess_id, player_id, entry_id, predicted, points,
                      submitted_at, updated_at, points_updated_at
            "#,
        )
        .bind(player_id)
        .bind(entry_id)
        .bind(predicted)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.code().as_deref() == Some("23503")
            {
                return StorageError::NotFound;
            }
            StorageError::from(e)
        })?;

        Ok(guess)
    }

    /// Delete a single guess
    pub async fn delete(&self, player_id: Uuid, entry_id: Uuid) -> Result<()> {
        let result = sqlx::query(
            r#"
            DELETE FROM guesses
            WHERE player_id = $1 AND entry_id = $2
            "#,
        )
        .bind(player_id)
        .bind(entry_id)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }

    /// Delete all of a player's guesses for one competition
    pub async fn delete_for_competition(
        &self,
        player_id: Uuid,
        competition_id: Uuid,
    ) -> Result<u64> {
        let result = sqlx::query(
            r#"
            DELETE FROM guesses g
            USING entries e
            WHERE g.entry_id = e.entry_id
              AND g.player_id = $1
              AND e.competition_id = $2
            "#,
        )
        .bind(player_id)
        .bind(competition_id)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// All entries of a competition with the given player's guesses merged in
    /// (left join, entries without a guess included)
    pub async fn entries_with_guesses(
        &self,
        competition_id: Uuid,
        player_id: Uuid,
    ) -> Result<Vec<EntryWithGuess>> {
        let rows = sqlx::query_as::<_, EntryWithGuess>(
            r#"
            SELECT e.entry_id,
                   a.name AS athlete_name,
                   a.team,
                   a.gender,
                   d.name AS discipline_name,
                   g.predicted,
                   e.actual_value,
                   g.points,
                   g.points_updated_at,
                   e.actual_recorded_at
            FROM entries e
            INNER JOIN athletes a ON e.athlete_id = a.athlete_id
            INNER JOIN disciplines d ON e.discipline_id = d.discipline_id
            LEFT JOIN guesses g ON g.entry_id = e.entry_id AND g.player_id = $2
            WHERE e.competition_id = $1
            ORDER BY a.name, d.name
            "#,
        )
        .bind(competition_id)
        .bind(player_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Per-competition guessing progress for a player, most recent first
    pub async fn competition_summaries(
        &self,
        player_id: Uuid,
    ) -> Result<Vec<PlayerCompetitionSummary>> {
        let summaries = sqlx::query_as::<_, PlayerCompetitionSummary>(
            r#"
            SELECT c.competition_id,
                   c.name AS competition_name,
                   c.starts_at,
                   c.status,
                   COUNT(e.entry_id) AS total_entries,
                   COUNT(g.guess_id) AS predicted_entries
            FROM competitions c
            INNER JOIN entries e ON e.competition_id = c.competition_id
            LEFT JOIN guesses g ON g.entry_id = e.entry_id AND g.player_id = $1
            GROUP BY c.competition_id, c.name, c.starts_at, c.status
            ORDER BY c.starts_at DESC
            "#,
        )
        .bind(player_id)
        .fetch_all(self.pool)
        .await?;

        Ok(summaries)
    }
}
