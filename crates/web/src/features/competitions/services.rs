use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use storage::{
    dto::{competition::CreateCompetitionRequest, guess::EntryWithGuess},
    error::Result,
    models::Competition,
    repository::{competition::CompetitionRepository, guess::GuessRepository},
    services::scoring,
};
use uuid::Uuid;

/// List all competitions
pub async fn list_competitions(pool: &PgPool) -> Result<Vec<Competition>> {
    let repo = CompetitionRepository::new(pool);
    repo.list().await
}

/// List competitions whose guess window is still open at `now`
pub async fn list_open_competitions(pool: &PgPool, now: DateTime<Utc>) -> Result<Vec<Competition>> {
    let repo = CompetitionRepository::new(pool);
    repo.list_open(now).await
}

/// Get a competition by ID
pub async fn get_competition(pool: &PgPool, id: Uuid) -> Result<Competition> {
    let repo = CompetitionRepository::new(pool);
    repo.find_by_id(id).await
}

/// Create a new competition
pub async fn create_competition(
    pool: &PgPool,
    request: &CreateCompetitionRequest,
) -> Result<Competition> {
    let repo = CompetitionRepository::new(pool);
    repo.create(request).await
}

/// A competition's entries with the given player's guesses merged in
pub async fn list_entries_with_guesses(
    pool: &PgPool,
    competition_id: Uuid,
    player_id: Uuid,
) -> Result<Vec<EntryWithGuess>> {
    // 404 for an unknown competition instead of an empty grid
    CompetitionRepository::new(pool).find_by_id(competition_id).await?;

    let repo = GuessRepository::new(pool);
    let mut entries = repo.entries_with_guesses(competition_id, player_id).await?;

    for entry in &mut entries {
        entry.resolve_points_state();
    }

    Ok(entries)
}

/// Record an entry's actual value and score its guesses
pub async fn record_actual(pool: &PgPool, entry_id: Uuid, actual: Decimal) -> Result<u64> {
    scoring::record_actual(pool, entry_id, actual).await
}

/// Rescore one entry's guesses against its recorded actual value
pub async fn rescore_entry(pool: &PgPool, entry_id: Uuid) -> Result<u64> {
    scoring::score_entry(pool, entry_id).await
}

/// Rescore every resolved entry of a competition
pub async fn rescore_competition(pool: &PgPool, competition_id: Uuid) -> Result<u64> {
    scoring::rescore_competition(pool, competition_id).await
}
