use sqlx::PgPool;

use crate::error::Result;
use crate::models::Athlete;

/// Repository for athlete reference data
pub struct AthleteRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> AthleteRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all athletes by name
    pub async fn list(&self) -> Result<Vec<Athlete>> {
        let athletes = sqlx::query_as::<_, Athlete>(
            r#"
            SELECT athlete_id, name, team, gender
            FROM athletes
            ORDER BY name
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(athletes)
    }
}
