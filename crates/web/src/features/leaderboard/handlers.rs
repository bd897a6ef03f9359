use axum::{
    Json,
    extract::{Query, State},
};
use storage::{
    Database,
    dto::leaderboard::{LeaderboardEntry, LeaderboardQuery},
};

use crate::error::WebError;

use super::services;

#[utoipa::path(
    get,
    path = "/api/leaderboard",
    params(LeaderboardQuery),
    responses(
        (status = 200, description = "Ranked leaderboard under the active filters", body = Vec<LeaderboardEntry>),
        (status = 400, description = "Invalid query parameters")
    ),
    tag = "leaderboard"
)]
pub async fn get_leaderboard(
    State(db): State<Database>,
    Query(query): Query<LeaderboardQuery>,
) -> Result<Json<Vec<LeaderboardEntry>>, WebError> {
    query.filter.validate().map_err(WebError::BadRequest)?;

    let entries = services::get_leaderboard(db.pool(), &query.filter, query.player_id).await?;

    Ok(Json(entries))
}
