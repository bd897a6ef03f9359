use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::error::{Result, StorageError};
use crate::models::{Competition, Entry, Guess, PREDICTION_DEADLINE_MINUTES};

/// Points for a guess matching the actual value within the exact threshold.
pub const EXACT_MATCH_POINTS: i16 = 3;
/// Points for a deviation of at most 5%.
pub const FIVE_PERCENT_POINTS: i16 = 2;
/// Points for a deviation of at most 10%.
pub const TEN_PERCENT_POINTS: i16 = 1;
pub const NO_POINTS: i16 = 0;

/// Two scores closer than this count as equal; absorbs representation noise
/// in 3-decimal fixed-point values.
fn exact_match_threshold() -> Decimal {
    Decimal::new(1, 3)
}

fn is_valid_score(score: Decimal) -> bool {
    score >= Decimal::ZERO && score <= Decimal::from(20)
}

/// Convert one (predicted, actual) pair into points.
///
/// Out-of-range inputs are not an error: they score 0 so that a bulk
/// recomputation keeps going over corrupt historical rows. Percentage
/// deviation is undefined at an actual of zero, so only an exact match
/// scores there. Both percentage boundaries are inclusive: a deviation of
/// exactly 5.0% still earns 2 points, exactly 10.0% still earns 1.
///
/// The arithmetic stays in `Decimal` throughout; the boundary cases
/// (15.225 vs 14.50 is exactly 5%) do not survive a detour through f64.
pub fn score_guess(predicted: Decimal, actual: Decimal) -> i16 {
    if !is_valid_score(actual) || !is_valid_score(predicted) {
        tracing::warn!(%predicted, %actual, "score outside valid range, awarding 0 points");
        return NO_POINTS;
    }

    let threshold = exact_match_threshold();

    if actual < threshold {
        return if (predicted - actual).abs() < threshold {
            EXACT_MATCH_POINTS
        } else {
            NO_POINTS
        };
    }

    let difference = (predicted - actual).abs();

    if difference < threshold {
        return EXACT_MATCH_POINTS;
    }

    let deviation_pct = difference / actual * Decimal::from(100);

    if deviation_pct <= Decimal::from(5) {
        FIVE_PERCENT_POINTS
    } else if deviation_pct <= Decimal::from(10) {
        TEN_PERCENT_POINTS
    } else {
        NO_POINTS
    }
}

/// The moment guesses for a competition close: 30 minutes before start.
pub fn prediction_deadline(starts_at: DateTime<Utc>) -> DateTime<Utc> {
    starts_at - Duration::minutes(PREDICTION_DEADLINE_MINUTES)
}

/// A guess counts only if it was submitted strictly before the deadline.
pub fn submitted_before_deadline(submitted_at: DateTime<Utc>, starts_at: DateTime<Utc>) -> bool {
    submitted_at < prediction_deadline(starts_at)
}

/// Points for one stored guess. The deadline is re-derived from the
/// competition here rather than trusted from the submission path, so a late
/// guess that slipped in scores 0 no matter how accurate it was.
fn score_submission(guess: &Guess, actual: Decimal, starts_at: DateTime<Utc>) -> i16 {
    if !submitted_before_deadline(guess.submitted_at, starts_at) {
        tracing::debug!(guess_id = %guess.guess_id, "guess submitted after deadline, awarding 0 points");
        return NO_POINTS;
    }
    score_guess(guess.predicted, actual)
}

/// Score every guess of one entry. Fails with `NotFound` if the entry or its
/// competition is missing and `InvalidState` if no actual value has been
/// recorded yet. Returns the number of guesses updated.
pub async fn score_entry(pool: &PgPool, entry_id: Uuid) -> Result<u64> {
    tracing::info!(%entry_id, "calculating points for entry");

    let mut tx = pool.begin().await?;

    let entry = fetch_entry(&mut tx, entry_id).await?;

    let Some(actual) = entry.actual_value else {
        return Err(StorageError::InvalidState(format!(
            "entry {entry_id} has no actual value"
        )));
    };

    let competition = fetch_competition(&mut tx, entry.competition_id).await?;
    lock_competition(&mut tx, competition.competition_id).await?;

    let updated = score_entry_guesses(&mut tx, entry_id, actual, competition.starts_at).await?;

    tx.commit().await?;

    tracing::info!(%entry_id, updated, "updated points for entry");
    Ok(updated)
}

/// Rescore every guess of every resolved entry in a competition, atomically:
/// either all points are rewritten or none are. Entries without an actual
/// value are skipped; a competition with none is a no-op returning 0.
/// Overwrites prior points unconditionally, so rerunning with unchanged data
/// is idempotent.
pub async fn rescore_competition(pool: &PgPool, competition_id: Uuid) -> Result<u64> {
    tracing::info!(%competition_id, "recalculating points for competition");

    let mut tx = pool.begin().await?;

    let competition = fetch_competition(&mut tx, competition_id).await?;
    lock_competition(&mut tx, competition_id).await?;

    let entries = sqlx::query_as::<_, Entry>(
        r#"
        SELECT entry_id, competition_id, athlete_id, discipline_id,
               actual_value, actual_recorded_at
        FROM entries
        WHERE competition_id = $1 AND actual_value IS NOT NULL
        "#,
    )
    .bind(competition_id)
    .fetch_all(&mut *tx)
    .await?;

    if entries.is_empty() {
        tracing::info!(%competition_id, "no entries with actual values, nothing to recalculate");
        return Ok(0);
    }

    let mut total_updated = 0u64;

    for entry in entries {
        let Some(actual) = entry.actual_value else {
            continue;
        };
        total_updated +=
            score_entry_guesses(&mut tx, entry.entry_id, actual, competition.starts_at).await?;
    }

    tx.commit().await?;

    tracing::info!(%competition_id, total_updated, "recalculated points for competition");
    Ok(total_updated)
}

/// Record an entry's actual value and score its guesses in the same
/// transaction, so readers never observe a resolved entry with unscored
/// guesses. Returns the number of guesses updated.
pub async fn record_actual(pool: &PgPool, entry_id: Uuid, actual: Decimal) -> Result<u64> {
    tracing::info!(%entry_id, %actual, "recording actual value for entry");

    let mut tx = pool.begin().await?;

    let entry = fetch_entry(&mut tx, entry_id).await?;
    let competition = fetch_competition(&mut tx, entry.competition_id).await?;
    lock_competition(&mut tx, competition.competition_id).await?;

    sqlx::query(
        r#"
        UPDATE entries
        SET actual_value = $2, actual_recorded_at = now()
        WHERE entry_id = $1
        "#,
    )
    .bind(entry_id)
    .bind(actual)
    .execute(&mut *tx)
    .await?;

    let updated = score_entry_guesses(&mut tx, entry_id, actual, competition.starts_at).await?;

    tx.commit().await?;

    tracing::info!(%entry_id, updated, "recorded actual value and scored guesses");
    Ok(updated)
}

async fn fetch_entry(tx: &mut Transaction<'_, Postgres>, entry_id: Uuid) -> Result<Entry> {
    sqlx::query_as::<_, Entry>(
        r#"
        SELECT entry_id, competition_id, athlete_id, discipline_id,
               actual_value, actual_recorded_at
        FROM entries
        WHERE entry_id = $1
        "#,
    )
    .bind(entry_id)
    .fetch_optional(&mut **tx)
    .await?
    .ok_or(StorageError::NotFound)
}

async fn fetch_competition(
    tx: &mut Transaction<'_, Postgres>,
    competition_id: Uuid,
) -> Result<Competition> {
    sqlx::query_as::<_, Competition>(
        r#"
        SELECT competition_id, name, status, starts_at, created_at
        FROM competitions
        WHERE competition_id = $1
        "#,
    )
    .bind(competition_id)
    .fetch_optional(&mut **tx)
    .await?
    .ok_or(StorageError::NotFound)
}

/// Serialize recomputations per competition. Two overlapping runs racing to
/// overwrite the same points could interleave inconsistently, so the loser
/// fails fast instead of waiting.
async fn lock_competition(
    tx: &mut Transaction<'_, Postgres>,
    competition_id: Uuid,
) -> Result<()> {
    let locked: bool = sqlx::query_scalar("SELECT pg_try_advisory_xact_lock($1)")
        .bind(advisory_lock_key(competition_id))
        .fetch_one(&mut **tx)
        .await?;

    if !locked {
        return Err(StorageError::Conflict(format!(
            "competition {competition_id} is already being rescored"
        )));
    }

    Ok(())
}

fn advisory_lock_key(competition_id: Uuid) -> i64 {
    let mut key = [0u8; 8];
    key.copy_from_slice(&competition_id.as_bytes()[..8]);
    i64::from_be_bytes(key)
}

async fn score_entry_guesses(
    tx: &mut Transaction<'_, Postgres>,
    entry_id: Uuid,
    actual: Decimal,
    starts_at: DateTime<Utc>,
) -> Result<u64> {
    let guesses = sqlx::query_as::<_, Guess>(
        r#"
        SELECT guess_id, player_id, entry_id, predicted, points,
               submitted_at, updated_at, points_updated_at
        FROM guesses
        WHERE entry_id = $1
        "#,
    )
    .bind(entry_id)
    .fetch_all(&mut **tx)
    .await?;

    let mut updated = 0u64;

    for guess in guesses {
        let points = score_submission(&guess, actual, starts_at);

        sqlx::query(
            r#"
            UPDATE guesses
            SET points = $2, points_updated_at = now()
            WHERE guess_id = $1
            "#,
        )
        .bind(guess.guess_id)
        .bind(points)
        .execute(&mut **tx)
        .await?;

        updated += 1;
    }

    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn starts_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 9, 6, 14, 0, 0).unwrap()
    }

    fn guess_at(submitted_at: DateTime<Utc>, predicted: Decimal) -> Guess {
        Guess {
            guess_id: Uuid::new_v4(),
            player_id: Uuid::new_v4(),
            entry_id: Uuid::new_v4(),
            predicted,
            points: None,
            submitted_at,
            updated_at: submitted_at,
            points_updated_at: None,
        }
    }

    // --- score_guess ---

    #[test]
    fn exact_match_scores_three() {
        assert_eq!(score_guess(dec("14.50"), dec("14.50")), 3);
    }

    #[test]
    fn small_deviation_scores_two() {
        // 1.38% deviation
        assert_eq!(score_guess(dec("14.70"), dec("14.50")), 2);
    }

    #[test]
    fn five_percent_boundary_is_inclusive() {
        // 0.725 / 14.50 is exactly 5.0%
        assert_eq!(score_guess(dec("15.225"), dec("14.50")), 2);
    }

    #[test]
    fn between_five_and_ten_percent_scores_one() {
        // 5.52% deviation
        assert_eq!(score_guess(dec("15.30"), dec("14.50")), 1);
    }

    #[test]
    fn ten_percent_boundary_is_inclusive() {
        // 1.45 / 14.50 is exactly 10.0%
        assert_eq!(score_guess(dec("15.95"), dec("14.50")), 1);
    }

    #[test]
    fn just_over_ten_percent_scores_zero() {
        // 10.07% deviation
        assert_eq!(score_guess(dec("15.96"), dec("14.50")), 0);
    }

    #[test]
    fn deviation_direction_does_not_matter() {
        // 3.45% deviation from below
        assert_eq!(score_guess(dec("14.00"), dec("14.50")), 2);
        assert_eq!(
            score_guess(dec("13.05"), dec("14.50")),
            score_guess(dec("15.95"), dec("14.50"))
        );
    }

    #[test]
    fn zero_actual_only_rewards_exact_match() {
        assert_eq!(score_guess(dec("0.00"), dec("0.00")), 3);
        assert_eq!(score_guess(dec("0.0005"), dec("0.00")), 3);
        assert_eq!(score_guess(dec("5.00"), dec("0.00")), 0);
        assert_eq!(score_guess(dec("0.001"), dec("0.00")), 0);
    }

    #[test]
    fn out_of_range_inputs_degrade_to_zero() {
        assert_eq!(score_guess(dec("21.00"), dec("14.50")), 0);
        assert_eq!(score_guess(dec("-1.00"), dec("14.50")), 0);
        assert_eq!(score_guess(dec("14.50"), dec("25.00")), 0);
        assert_eq!(score_guess(dec("14.50"), dec("-0.01")), 0);
    }

    #[test]
    fn range_boundaries_are_valid_inputs() {
        assert_eq!(score_guess(dec("20.000"), dec("20.000")), 3);
        assert_eq!(score_guess(dec("19.0"), dec("20.0")), 2);
    }

    // --- eligibility gate ---

    #[test]
    fn deadline_is_thirty_minutes_before_start() {
        let deadline = prediction_deadline(starts_at());
        assert_eq!(starts_at() - deadline, Duration::minutes(30));
    }

    #[test]
    fn submission_on_the_deadline_is_late() {
        let deadline = prediction_deadline(starts_at());
        assert!(submitted_before_deadline(deadline - Duration::seconds(1), starts_at()));
        assert!(!submitted_before_deadline(deadline, starts_at()));
        assert!(!submitted_before_deadline(deadline + Duration::seconds(1), starts_at()));
    }

    #[test]
    fn late_guess_scores_zero_even_when_exact() {
        let late = guess_at(prediction_deadline(starts_at()), dec("14.50"));
        assert_eq!(score_submission(&late, dec("14.50"), starts_at()), 0);

        let on_time = guess_at(
            prediction_deadline(starts_at()) - Duration::minutes(1),
            dec("14.50"),
        );
        assert_eq!(score_submission(&on_time, dec("14.50"), starts_at()), 3);
    }

    // --- properties ---

    fn score_value() -> impl Strategy<Value = Decimal> {
        // any representable 3-decimal value in [0.000, 20.000]
        (0i64..=20_000).prop_map(|thousandths| Decimal::new(thousandths, 3))
    }

    proptest! {
        #[test]
        fn points_stay_in_range(predicted in score_value(), actual in score_value()) {
            let points = score_guess(predicted, actual);
            prop_assert!((0..=3).contains(&points));
        }

        #[test]
        fn larger_deviation_never_scores_more(
            actual in (1i64..=20_000).prop_map(|t| Decimal::new(t, 3)),
            a in score_value(),
            b in score_value(),
        ) {
            let (closer, farther) = if (a - actual).abs() <= (b - actual).abs() {
                (a, b)
            } else {
                (b, a)
            };
            prop_assert!(score_guess(closer, actual) >= score_guess(farther, actual));
        }

        #[test]
        fn only_magnitude_of_deviation_matters(
            actual in score_value(),
            delta in (0i64..=10_000).prop_map(|t| Decimal::new(t, 3)),
        ) {
            let above = actual + delta;
            let below = actual - delta;
            prop_assume!(above <= Decimal::from(20) && below >= Decimal::ZERO);
            prop_assert_eq!(score_guess(above, actual), score_guess(below, actual));
        }
    }
}
