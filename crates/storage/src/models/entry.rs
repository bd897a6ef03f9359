use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// One predictable result inside a competition: an athlete performing a
/// discipline. `actual_value` stays null until the result is recorded.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Entry {
    pub entry_id: Uuid,
    pub competition_id: Uuid,
    pub athlete_id: Uuid,
    pub discipline_id: Uuid,
    pub actual_value: Option<Decimal>,
    pub actual_recorded_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl Entry {
    pub fn is_resolved(&self) -> bool {
        self.actual_value.is_some()
    }
}
