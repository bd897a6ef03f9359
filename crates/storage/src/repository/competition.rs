use chrono::{DateTime, Duration, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::competition::CreateCompetitionRequest;
use crate::error::{Result, StorageError};
use crate::models::{Competition, Entry, PREDICTION_DEADLINE_MINUTES};

/// Repository for competition and entry database operations
pub struct CompetitionRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CompetitionRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all competitions, most recent first
    pub async fn list(&self) -> Result<Vec<Competition>> {
        let competitions = sqlx::query_as::<_, Competition>(
            r#"
            SELECT competition_id, name, status, starts_at, created_at
            FROM competitions
            ORDER BY starts_at DESC, created_at DESC
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(competitions)
    }

    /// List competitions still open for guesses: upcoming, with the deadline
    /// (30 minutes before start) not yet reached at `now`
    pub async fn list_open(&self, now: DateTime<Utc>) -> Result<Vec<Competition>> {
        let horizon = now + Duration::minutes(PREDICTION_DEADLINE_MINUTES);

        let competitions = sqlx::query_as::<_, Competition>(
            r#"
            SELECT competition_id, name, status, starts_at, created_at
            FROM competitions
            WHERE status = 'upcoming' AND starts_at > $1
            ORDER BY starts_at ASC
            "#,
        )
        .bind(horizon)
        .fetch_all(self.pool)
        .await?;

        Ok(competitions)
    }

    /// Get a competition by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Competition> {
        let competition = sqlx::query_as::<_, Competition>(
            r#"
            SELECT competition_id, name, status, starts_at, created_at
            FROM competitions
            WHERE competition_id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(competition)
    }

    /// Create a new competition
    pub async fn create(&self, req: &CreateCompetitionRequest) -> Result<Competition> {
        let competition = sqlx::query_as::<_, Competition>(
            r#"
            INSERT INTO competitions (name, starts_at)
            VALUES ($1, $2)
            RETURNING competition_id, name, status, starts_at, created_at
            "#,
        )
        .bind(&req.name)
        .bind(req.starts_at)
        .fetch_one(self.pool)
        .await?;

        Ok(competition)
    }

    /// Get an entry by ID
    pub async fn find_entry(&self, entry_id: Uuid) -> Result<Entry> {
        let entry = sqlx::query_as::<_, Entry>(
            r#"
            SELECT entry_id, competition_id, athlete_id, discipline_id,
                   actual_value, actual_recorded_at
            FROM entries
            WHERE entry_id = $1
            "#,
        )
        .bind(entry_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(entry)
    }
}
