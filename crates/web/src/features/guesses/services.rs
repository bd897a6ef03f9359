use chrono::Utc;
use sqlx::PgPool;
use storage::{
    dto::guess::SubmitGuessRequest,
    models::{Competition, Guess},
    repository::{competition::CompetitionRepository, guess::GuessRepository},
};
use uuid::Uuid;

use crate::error::{WebError, WebResult};

/// Save or replace a guess. The deadline gate runs here at submission time;
/// scoring re-checks it independently later.
pub async fn submit_guess(pool: &PgPool, req: &SubmitGuessRequest) -> WebResult<Guess> {
    let competitions = CompetitionRepository::new(pool);
    let entry = competitions.find_entry(req.entry_id).await?;
    let competition = competitions.find_by_id(entry.competition_id).await?;

    ensure_open(&competition)?;

    let guess = GuessRepository::new(pool)
        .upsert(req.player_id, req.entry_id, req.predicted)
        .await?;

    tracing::info!(
        player_id = %req.player_id,
        entry_id = %req.entry_id,
        "guess saved"
    );
    Ok(guess)
}

/// Withdraw a single guess; only possible while the window is open.
pub async fn delete_guess(pool: &PgPool, player_id: Uuid, entry_id: Uuid) -> WebResult<()> {
    let competitions = CompetitionRepository::new(pool);
    let entry = competitions.find_entry(entry_id).await?;
    let competition = competitions.find_by_id(entry.competition_id).await?;

    ensure_open(&competition)?;

    GuessRepository::new(pool).delete(player_id, entry_id).await?;

    tracing::info!(%player_id, %entry_id, "guess deleted");
    Ok(())
}

/// Withdraw all of a player's guesses for a competition; only possible while
/// the window is open.
pub async fn delete_competition_guesses(
    pool: &PgPool,
    player_id: Uuid,
    competition_id: Uuid,
) -> WebResult<u64> {
    let competitions = CompetitionRepository::new(pool);
    let competition = competitions.find_by_id(competition_id).await?;

    ensure_open(&competition)?;

    let deleted = GuessRepository::new(pool)
        .delete_for_competition(player_id, competition_id)
        .await?;

    tracing::info!(%player_id, %competition_id, deleted, "guesses deleted");
    Ok(deleted)
}

fn ensure_open(competition: &Competition) -> WebResult<()> {
    if !competition.accepts_guesses(Utc::now()) {
        return Err(WebError::DeadlinePassed(competition.name.clone()));
    }
    Ok(())
}
