use sqlx::PgPool;
use storage::{
    dto::leaderboard::{LeaderboardEntry, LeaderboardFilter},
    error::Result,
    services::leaderboard,
};
use uuid::Uuid;

/// Leaderboard under the given filter, with the viewer's row flagged
pub async fn get_leaderboard(
    pool: &PgPool,
    filter: &LeaderboardFilter,
    viewer: Option<Uuid>,
) -> Result<Vec<LeaderboardEntry>> {
    leaderboard::leaderboard(pool, filter, viewer).await
}
