use sqlx::PgPool;

use crate::error::Result;
use crate::models::Discipline;

/// Repository for discipline reference data
pub struct DisciplineRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> DisciplineRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all disciplines by name
    pub async fn list(&self) -> Result<Vec<Discipline>> {
        let disciplines = sqlx::query_as::<_, Discipline>(
            r#"
            SELECT discipline_id, name
            FROM disciplines
            ORDER BY name
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(disciplines)
    }
}
