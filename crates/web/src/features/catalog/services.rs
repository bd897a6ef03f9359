use sqlx::PgPool;
use storage::{
    error::Result,
    models::{Athlete, Discipline},
    repository::{athlete::AthleteRepository, discipline::DisciplineRepository},
};

/// List all athletes
pub async fn list_athletes(pool: &PgPool) -> Result<Vec<Athlete>> {
    let repo = AthleteRepository::new(pool);
    repo.list().await
}

/// List all disciplines
pub async fn list_disciplines(pool: &PgPool) -> Result<Vec<Discipline>> {
    let repo = DisciplineRepository::new(pool);
    repo.list().await
}
