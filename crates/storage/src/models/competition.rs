use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Minutes before a competition starts after which guesses are locked.
pub const PREDICTION_DEADLINE_MINUTES: i64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "competition_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum CompetitionStatus {
    Upcoming,
    Live,
    Finished,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Competition {
    pub competition_id: Uuid,
    pub name: String,
    pub status: CompetitionStatus,
    pub starts_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Competition {
    /// Guesses must be in before this moment; the lead window is fixed,
    /// never negotiable per entry.
    pub fn prediction_deadline(&self) -> DateTime<Utc> {
        self.starts_at - Duration::minutes(PREDICTION_DEADLINE_MINUTES)
    }

    pub fn accepts_guesses(&self, now: DateTime<Utc>) -> bool {
        self.status == CompetitionStatus::Upcoming && now < self.prediction_deadline()
    }
}
