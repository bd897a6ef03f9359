use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::{Competition, CompetitionStatus};

/// Request payload for creating a new competition
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateCompetitionRequest {
    #[validate(length(
        min = 1,
        max = 255,
        message = "Name must be between 1 and 255 characters"
    ))]
    pub name: String,

    pub starts_at: DateTime<Utc>,
}

/// Request payload for recording an entry's actual value
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct RecordActualRequest {
    #[validate(custom(function = "crate::dto::guess::validate_score_range"))]
    pub actual_value: Decimal,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CompetitionResponse {
    pub competition_id: Uuid,
    pub name: String,
    pub status: CompetitionStatus,
    pub starts_at: DateTime<Utc>,
    pub prediction_deadline: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl From<Competition> for CompetitionResponse {
    fn from(competition: Competition) -> Self {
        let prediction_deadline = competition.prediction_deadline();
        Self {
            competition_id: competition.competition_id,
            name: competition.name,
            status: competition.status,
            starts_at: competition.starts_at,
            prediction_deadline,
            created_at: competition.created_at,
        }
    }
}

/// Result of rescoring an entry or a whole competition.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RescoreResponse {
    pub guesses_updated: u64,
}
