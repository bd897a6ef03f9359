use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::models::{CompetitionStatus, PointsState};

/// Request payload for submitting or replacing a guess. One guess per player
/// and entry; resubmitting overwrites the predicted value.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct SubmitGuessRequest {
    pub player_id: Uuid,
    pub entry_id: Uuid,
    #[validate(custom(function = "validate_score_range"))]
    pub predicted: Decimal,
}

pub fn validate_score_range(value: &Decimal) -> Result<(), ValidationError> {
    if *value < Decimal::ZERO || *value > Decimal::from(20) {
        let mut err = ValidationError::new("score_range");
        err.message = Some("Score must be between 0.000 and 20.000".into());
        return Err(err);
    }
    if value.scale() > 3 {
        let mut err = ValidationError::new("score_scale");
        err.message = Some("Score precision is limited to 3 decimal places".into());
        return Err(err);
    }
    Ok(())
}

/// An entry of a competition together with the requesting player's guess, if
/// any. Backs the prediction grid.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct EntryWithGuess {
    pub entry_id: Uuid,
    pub athlete_name: String,
    pub team: Option<String>,
    pub gender: String,
    pub discipline_name: String,
    pub predicted: Option<Decimal>,
    pub actual_value: Option<Decimal>,
    pub points: Option<i16>,
    #[serde(skip)]
    pub points_updated_at: Option<DateTime<Utc>>,
    #[serde(skip)]
    pub actual_recorded_at: Option<DateTime<Utc>>,
    /// Scoring state of the player's guess; absent when there is no guess.
    #[sqlx(skip)]
    pub points_state: Option<PointsState>,
}

impl EntryWithGuess {
    pub fn has_guess(&self) -> bool {
        self.predicted.is_some()
    }

    pub fn resolve_points_state(&mut self) {
        self.points_state = self.has_guess().then(|| {
            PointsState::classify(self.points, self.points_updated_at, self.actual_recorded_at)
        });
    }
}

/// Result of withdrawing a player's guesses for a competition.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DeletedGuessesResponse {
    pub deleted: u64,
}

/// A player's guessing progress for one competition. The derived display
/// fields are filled with `resolve_progress` after the row is fetched.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct PlayerCompetitionSummary {
    pub competition_id: Uuid,
    pub competition_name: String,
    pub starts_at: DateTime<Utc>,
    pub status: CompetitionStatus,
    pub total_entries: i64,
    pub predicted_entries: i64,
    #[sqlx(skip)]
    pub completion_percentage: i64,
    #[sqlx(skip)]
    pub is_complete: bool,
    #[sqlx(skip)]
    pub is_editable: bool,
}

impl PlayerCompetitionSummary {
    pub fn resolve_progress(&mut self, editable: bool) {
        self.completion_percentage = if self.total_entries == 0 {
            0
        } else {
            self.predicted_entries * 100 / self.total_entries
        };
        self.is_complete = self.total_entries > 0 && self.predicted_entries == self.total_entries;
        self.is_editable = editable;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn accepts_full_range_inclusive() {
        assert!(validate_score_range(&dec("0.000")).is_ok());
        assert!(validate_score_range(&dec("14.725")).is_ok());
        assert!(validate_score_range(&dec("20.000")).is_ok());
    }

    #[test]
    fn rejects_out_of_range() {
        assert!(validate_score_range(&dec("-0.001")).is_err());
        assert!(validate_score_range(&dec("20.001")).is_err());
    }

    #[test]
    fn rejects_more_than_three_decimals() {
        assert!(validate_score_range(&dec("14.5001")).is_err());
    }

    fn grid_row(predicted: Option<Decimal>, points: Option<i16>) -> EntryWithGuess {
        EntryWithGuess {
            entry_id: Uuid::nil(),
            athlete_name: "Mara Keller".to_string(),
            team: None,
            gender: "F".to_string(),
            discipline_name: "Floor".to_string(),
            predicted,
            actual_value: None,
            points,
            points_updated_at: None,
            actual_recorded_at: None,
            points_state: None,
        }
    }

    #[test]
    fn entries_without_a_guess_have_no_points_state() {
        let mut row = grid_row(None, None);
        row.resolve_points_state();
        assert!(row.points_state.is_none());
        assert!(!row.has_guess());
    }

    #[test]
    fn unscored_guesses_resolve_to_unscored() {
        let mut row = grid_row(Some(dec("14.5")), None);
        row.resolve_points_state();
        assert_eq!(row.points_state, Some(PointsState::Unscored));
    }

    #[test]
    fn scored_guesses_resolve_to_their_points() {
        let mut row = grid_row(Some(dec("14.5")), Some(2));
        row.points_updated_at = Some(Utc::now());
        row.actual_recorded_at = Some(Utc::now() - chrono::Duration::hours(1));
        row.resolve_points_state();
        assert_eq!(row.points_state, Some(PointsState::Scored(2)));
    }

    fn summary(total_entries: i64, predicted_entries: i64) -> PlayerCompetitionSummary {
        PlayerCompetitionSummary {
            competition_id: Uuid::nil(),
            competition_name: "Regional Final".to_string(),
            starts_at: Utc::now(),
            status: CompetitionStatus::Upcoming,
            total_entries,
            predicted_entries,
            completion_percentage: 0,
            is_complete: false,
            is_editable: false,
        }
    }

    #[test]
    fn completion_percentage_handles_empty_competition() {
        let mut summary = summary(0, 0);
        summary.resolve_progress(true);
        assert_eq!(summary.completion_percentage, 0);
        assert!(!summary.is_complete);
        assert!(summary.is_editable);
    }

    #[test]
    fn completion_percentage_rounds_down() {
        let mut summary = summary(3, 2);
        summary.resolve_progress(false);
        assert_eq!(summary.completion_percentage, 66);
        assert!(!summary.is_complete);
        assert!(!summary.is_editable);
    }

    #[test]
    fn fully_predicted_competition_is_complete() {
        let mut summary = summary(4, 4);
        summary.resolve_progress(true);
        assert_eq!(summary.completion_percentage, 100);
        assert!(summary.is_complete);
    }
}
