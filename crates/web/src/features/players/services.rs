use chrono::Utc;
use sqlx::PgPool;
use storage::{
    dto::guess::PlayerCompetitionSummary,
    error::Result,
    models::{CompetitionStatus, Player},
    repository::{guess::GuessRepository, player::PlayerRepository},
    services::{leaderboard, scoring},
};
use uuid::Uuid;

/// Register a new player
pub async fn register_player(pool: &PgPool, username: &str) -> Result<Player> {
    let repo = PlayerRepository::new(pool);
    repo.create(username).await
}

/// Get a player by ID
pub async fn get_player(pool: &PgPool, id: Uuid) -> Result<Player> {
    let repo = PlayerRepository::new(pool);
    repo.find_by_id(id).await
}

/// Per-competition guessing progress for a player. `is_editable` reflects
/// the guess window at the time of the call.
pub async fn competition_summaries(
    pool: &PgPool,
    player_id: Uuid,
) -> Result<Vec<PlayerCompetitionSummary>> {
    PlayerRepository::new(pool).find_by_id(player_id).await?;

    let mut summaries = GuessRepository::new(pool)
        .competition_summaries(player_id)
        .await?;

    let now = Utc::now();
    for summary in &mut summaries {
        let editable = summary.status == CompetitionStatus::Upcoming
            && now < scoring::prediction_deadline(summary.starts_at);
        summary.resolve_progress(editable);
    }

    Ok(summaries)
}

/// Total points for a player, overall or for one competition
pub async fn player_total(
    pool: &PgPool,
    player_id: Uuid,
    competition_id: Option<Uuid>,
) -> Result<i64> {
    PlayerRepository::new(pool).find_by_id(player_id).await?;

    leaderboard::player_total(pool, player_id, competition_id).await
}
