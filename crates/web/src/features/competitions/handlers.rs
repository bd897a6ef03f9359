use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use storage::{
    Database,
    dto::{
        competition::{
            CompetitionResponse, CreateCompetitionRequest, RecordActualRequest, RescoreResponse,
        },
        guess::EntryWithGuess,
    },
};
use utoipa::IntoParams;
use uuid::Uuid;
use validator::Validate;

use crate::error::WebError;

use super::services;

#[derive(Debug, Deserialize, IntoParams)]
pub struct EntriesQuery {
    /// Player whose guesses are merged into the entry grid
    pub player_id: Uuid,
}

#[utoipa::path(
    get,
    path = "/api/competitions",
    responses(
        (status = 200, description = "List all competitions successfully", body = Vec<CompetitionResponse>)
    ),
    tag = "competitions"
)]
pub async fn list_competitions(
    State(db): State<Database>,
) -> Result<Json<Vec<CompetitionResponse>>, WebError> {
    let competitions = services::list_competitions(db.pool()).await?;

    let response: Vec<CompetitionResponse> = competitions
        .into_iter()
        .map(CompetitionResponse::from)
        .collect();

    Ok(Json(response))
}

#[utoipa::path(
    get,
    path = "/api/competitions/open",
    responses(
        (status = 200, description = "List competitions still accepting guesses", body = Vec<CompetitionResponse>)
    ),
    tag = "competitions"
)]
pub async fn list_open_competitions(
    State(db): State<Database>,
) -> Result<Json<Vec<CompetitionResponse>>, WebError> {
    let competitions = services::list_open_competitions(db.pool(), chrono::Utc::now()).await?;

    let response: Vec<CompetitionResponse> = competitions
        .into_iter()
        .map(CompetitionResponse::from)
        .collect();

    Ok(Json(response))
}

#[utoipa::path(
    get,
    path = "/api/competitions/{id}",
    params(
        ("id" = Uuid, Path, description = "Competition ID")
    ),
    responses(
        (status = 200, description = "Competition found", body = CompetitionResponse),
        (status = 404, description = "Competition not found")
    ),
    tag = "competitions"
)]
pub async fn get_competition(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    let competition = services::get_competition(db.pool(), id).await?;

    Ok(Json(CompetitionResponse::from(competition)).into_response())
}

#[utoipa::path(
    post,
    path = "/api/competitions",
    request_body = CreateCompetitionRequest,
    responses(
        (status = 201, description = "Competition created successfully", body = CompetitionResponse),
        (status = 400, description = "Validation error")
    ),
    tag = "competitions"
)]
pub async fn create_competition(
    State(db): State<Database>,
    Json(req): Json<CreateCompetitionRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let competition = services::create_competition(db.pool(), &req).await?;

    Ok((
        StatusCode::CREATED,
        Json(CompetitionResponse::from(competition)),
    )
        .into_response())
}

#[utoipa::path(
    get,
    path = "/api/competitions/{id}/entries",
    params(
        ("id" = Uuid, Path, description = "Competition ID"),
        EntriesQuery
    ),
    responses(
        (status = 200, description = "Entries with the player's guesses", body = Vec<EntryWithGuess>),
        (status = 404, description = "Competition not found")
    ),
    tag = "competitions"
)]
pub async fn list_entries(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
    Query(query): Query<EntriesQuery>,
) -> Result<Json<Vec<EntryWithGuess>>, WebError> {
    let entries = services::list_entries_with_guesses(db.pool(), id, query.player_id).await?;

    Ok(Json(entries))
}

#[utoipa::path(
    post,
    path = "/api/competitions/{id}/rescore",
    params(
        ("id" = Uuid, Path, description = "Competition ID")
    ),
    responses(
        (status = 200, description = "Points recalculated for every resolved entry", body = RescoreResponse),
        (status = 404, description = "Competition not found"),
        (status = 409, description = "A rescore for this competition is already running")
    ),
    tag = "competitions"
)]
pub async fn rescore_competition(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
) -> Result<Json<RescoreResponse>, WebError> {
    let guesses_updated = services::rescore_competition(db.pool(), id).await?;

    Ok(Json(RescoreResponse { guesses_updated }))
}

#[utoipa::path(
    post,
    path = "/api/entries/{id}/rescore",
    params(
        ("id" = Uuid, Path, description = "Entry ID")
    ),
    responses(
        (status = 200, description = "Points recalculated for the entry", body = RescoreResponse),
        (status = 404, description = "Entry not found"),
        (status = 409, description = "Entry has no actual value yet, or a rescore is already running")
    ),
    tag = "competitions"
)]
pub async fn rescore_entry(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
) -> Result<Json<RescoreResponse>, WebError> {
    let guesses_updated = services::rescore_entry(db.pool(), id).await?;

    Ok(Json(RescoreResponse { guesses_updated }))
}

#[utoipa::path(
    put,
    path = "/api/entries/{id}/actual",
    params(
        ("id" = Uuid, Path, description = "Entry ID")
    ),
    request_body = RecordActualRequest,
    responses(
        (status = 200, description = "Actual value recorded and guesses scored", body = RescoreResponse),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Entry not found"),
        (status = 409, description = "A rescore for this competition is already running")
    ),
    tag = "competitions"
)]
pub async fn record_actual(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
    Json(req): Json<RecordActualRequest>,
) -> Result<Json<RescoreResponse>, WebError> {
    req.validate()?;

    let guesses_updated = services::record_actual(db.pool(), id, req.actual_value).await?;

    Ok(Json(RescoreResponse { guesses_updated }))
}
