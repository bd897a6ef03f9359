use axum::{Json, extract::State};
use storage::{
    Database,
    models::{Athlete, Discipline},
};

use crate::error::WebError;

use super::services;

#[utoipa::path(
    get,
    path = "/api/athletes",
    responses(
        (status = 200, description = "List all athletes successfully", body = Vec<Athlete>)
    ),
    tag = "catalog"
)]
pub async fn list_athletes(State(db): State<Database>) -> Result<Json<Vec<Athlete>>, WebError> {
    let athletes = services::list_athletes(db.pool()).await?;

    Ok(Json(athletes))
}

#[utoipa::path(
    get,
    path = "/api/disciplines",
    responses(
        (status = 200, description = "List all disciplines successfully", body = Vec<Discipline>)
    ),
    tag = "catalog"
)]
pub async fn list_disciplines(
    State(db): State<Database>,
) -> Result<Json<Vec<Discipline>>, WebError> {
    let disciplines = services::list_disciplines(db.pool()).await?;

    Ok(Json(disciplines))
}
