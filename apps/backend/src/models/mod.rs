//! Database models and API types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::error::{ApiError, Result};

// Re-export shared types from review-core
pub use review_core::types::{Difficulty, PriorState, WordRecord, WordScheduleState};

// === Database Entity Types ===

/// Learner record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Learner {
    pub id: Uuid,
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Saved word with its schedule state, one per learner-word pair
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbWordReview {
    pub id: i64,
    pub learner_id: Uuid,
    pub word: String,
    pub translation: String,
    pub dialect: String,
    pub ease_factor: f64,
    pub interval_days: i32,
    pub repetitions: i32,
    /// Epoch milliseconds
    pub next_review_date: Option<i64>,
    /// Epoch milliseconds
    pub last_review_date: Option<i64>,
    pub is_learning: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DbWordReview {
    /// Convert to review-core schedule state
    pub fn to_core_state(&self) -> WordScheduleState {
        WordScheduleState {
            ease_factor: self.ease_factor,
            interval_days: u32::try_from(self.interval_days).unwrap_or(0),
            repetitions: u32::try_from(self.repetitions).unwrap_or(0),
            next_review_date: self.next_review_date.and_then(from_millis),
            is_learning: self.is_learning,
        }
    }

    /// Projection used by the due/new selection helpers
    pub fn to_record(&self) -> WordRecord {
        WordRecord::from_state(self.id, &self.to_core_state())
    }

    /// Convert to API word type
    pub fn to_api_word(&self) -> WordView {
        WordView {
            id: self.id,
            word: self.word.clone(),
            translation: self.translation.clone(),
            dialect: self.dialect.clone(),
            state: self.to_core_state(),
            last_review_date: self.last_review_date,
        }
    }
}

/// Columns written back after a review
#[derive(Debug, Clone, PartialEq)]
pub struct DbScheduleUpdate {
    pub ease_factor: f64,
    pub interval_days: i32,
    pub repetitions: i32,
    pub next_review_date: Option<i64>,
    pub last_review_date: i64,
    pub is_learning: bool,
}

impl DbScheduleUpdate {
    pub fn from_core_state(state: &WordScheduleState, reviewed_at: DateTime<Utc>) -> Result<Self> {
        Ok(Self {
            ease_factor: state.ease_factor,
            interval_days: to_db_int("interval_days", state.interval_days)?,
            repetitions: to_db_int("repetitions", state.repetitions)?,
            next_review_date: state.next_review_date.map(|d| d.timestamp_millis()),
            last_review_date: reviewed_at.timestamp_millis(),
            is_learning: state.is_learning,
        })
    }
}

/// Append-only review audit entry
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbReviewHistory {
    pub id: Uuid,
    pub word_review_id: i64,
    pub learner_id: Uuid,
    pub difficulty: i16,
    pub ease_factor: f64,
    pub interval_days: i32,
    pub repetitions: i32,
    pub next_review_date: i64,
    pub reviewed_at: i64,
}

impl DbReviewHistory {
    /// Build the audit entry for a completed review
    pub fn new(
        word_review_id: i64,
        learner_id: Uuid,
        difficulty: Difficulty,
        state: &WordScheduleState,
        reviewed_at: DateTime<Utc>,
    ) -> Result<Self> {
        let reviewed_at = reviewed_at.timestamp_millis();
        Ok(Self {
            id: Uuid::new_v4(),
            word_review_id,
            learner_id,
            difficulty: i16::from(difficulty.to_value()),
            ease_factor: state.ease_factor,
            interval_days: to_db_int("interval_days", state.interval_days)?,
            repetitions: to_db_int("repetitions", state.repetitions)?,
            next_review_date: state
                .next_review_date
                .map_or(reviewed_at, |d| d.timestamp_millis()),
            reviewed_at,
        })
    }
}

fn from_millis(ms: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_millis(ms)
}

/// `INTEGER` columns cannot hold every `u32`; refuse to write a wrapped value.
fn to_db_int(column: &str, value: u32) -> Result<i32> {
    i32::try_from(value)
        .map_err(|_| ApiError::Internal(format!("{} {} does not fit in an INTEGER column", column, value)))
}

// === API Request/Response Types ===

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateLearnerRequest {
    pub name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateLearnerResponse {
    pub learner_id: Uuid,
}

// Word types
#[derive(Debug, Serialize, Deserialize)]
pub struct SaveWordRequest {
    pub word: String,
    pub translation: String,
    pub dialect: String,
}

/// Saved word as returned by the API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WordView {
    pub id: i64,
    pub word: String,
    pub translation: String,
    pub dialect: String,
    #[serde(flatten)]
    pub state: WordScheduleState,
    pub last_review_date: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WordListResponse {
    pub words: Vec<WordView>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteWordResponse {
    pub deleted: bool,
}

// Review types
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct BatchQuery {
    pub limit: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReviewBatchResponse {
    pub words: Vec<WordView>,
    /// Matching words before the batch cap was applied
    pub total: usize,
    pub limit: u32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReviewStatsResponse {
    pub total_words: usize,
    pub new_words: usize,
    pub due_words: usize,
    pub mastered_words: usize,
}

/// Difficulty arrives as a raw number so the configured mode decides
/// what happens to values outside 1..=3.
#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitReviewRequest {
    pub difficulty: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitReviewResponse {
    pub word_review_id: i64,
    pub difficulty: Difficulty,
    pub state: WordScheduleState,
    /// Epoch milliseconds
    pub reviewed_at: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReviewHistoryResponse {
    pub entries: Vec<DbReviewHistory>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use pretty_assertions::assert_eq;

    fn row() -> DbWordReview {
        DbWordReview {
            id: 7,
            learner_id: Uuid::nil(),
            word: "brrr".to_string(),
            translation: "outside".to_string(),
            dialect: "levantine".to_string(),
            ease_factor: 2.3,
            interval_days: 8,
            repetitions: 3,
            next_review_date: Some(1_715_000_000_000),
            last_review_date: Some(1_714_300_000_000),
            is_learning: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_row_to_core_state() {
        let state = row().to_core_state();
        assert_eq!(state.ease_factor, 2.3);
        assert_eq!(state.interval_days, 8);
        assert_eq!(state.repetitions, 3);
        assert_eq!(
            state.next_review_date.map(|d| d.timestamp_millis()),
            Some(1_715_000_000_000)
        );
        assert!(state.is_learning);
    }

    #[test]
    fn test_negative_columns_clamp_to_zero() {
        let mut row = row();
        row.interval_days = -4;
        row.repetitions = -1;
        let state = row.to_core_state();
        assert_eq!(state.interval_days, 0);
        assert_eq!(state.repetitions, 0);
    }

    #[test]
    fn test_schedule_update_stores_millis() {
        let reviewed_at = Utc.with_ymd_and_hms(2024, 5, 10, 8, 0, 0).unwrap();
        let state = WordScheduleState {
            ease_factor: 2.1,
            interval_days: 4,
            repetitions: 2,
            next_review_date: Some(reviewed_at + Duration::days(4)),
            is_learning: true,
        };
        let update = DbScheduleUpdate::from_core_state(&state, reviewed_at).unwrap();
        assert_eq!(update.last_review_date, reviewed_at.timestamp_millis());
        assert_eq!(
            update.next_review_date,
            Some(reviewed_at.timestamp_millis() + 4 * 86_400_000)
        );
        assert_eq!(update.interval_days, 4);
    }

    #[test]
    fn test_history_entry_copies_computed_fields() {
        let reviewed_at = Utc.with_ymd_and_hms(2024, 5, 10, 8, 0, 0).unwrap();
        let state = WordScheduleState {
            ease_factor: 2.45,
            interval_days: 1,
            repetitions: 1,
            next_review_date: Some(reviewed_at + Duration::days(1)),
            is_learning: true,
        };
        let entry =
            DbReviewHistory::new(7, Uuid::nil(), Difficulty::Medium, &state, reviewed_at).unwrap();
        assert_eq!(entry.difficulty, 2);
        assert_eq!(entry.ease_factor, 2.45);
        assert_eq!(entry.reviewed_at, reviewed_at.timestamp_millis());
        assert_eq!(entry.next_review_date - entry.reviewed_at, 86_400_000);
    }

    #[test]
    fn test_oversized_counters_are_rejected() {
        let reviewed_at = Utc.with_ymd_and_hms(2024, 5, 10, 8, 0, 0).unwrap();
        let state = WordScheduleState {
            ease_factor: 2.5,
            interval_days: 3,
            repetitions: u32::MAX,
            next_review_date: Some(reviewed_at + Duration::days(3)),
            is_learning: true,
        };

        let err = DbScheduleUpdate::from_core_state(&state, reviewed_at).unwrap_err();
        assert!(matches!(err, ApiError::Internal(ref msg) if msg.contains("repetitions")));

        let err = DbReviewHistory::new(7, Uuid::nil(), Difficulty::Easy, &state, reviewed_at)
            .unwrap_err();
        assert!(matches!(err, ApiError::Internal(_)));
    }

    #[test]
    fn test_capped_interval_fits_column() {
        let reviewed_at = Utc.with_ymd_and_hms(2024, 5, 10, 8, 0, 0).unwrap();
        let state = WordScheduleState {
            ease_factor: 2.5,
            interval_days: review_core::MAXIMUM_INTERVAL_DAYS,
            repetitions: 200,
            next_review_date: Some(
                reviewed_at + Duration::days(i64::from(review_core::MAXIMUM_INTERVAL_DAYS)),
            ),
            is_learning: false,
        };
        let update = DbScheduleUpdate::from_core_state(&state, reviewed_at).unwrap();
        assert_eq!(update.interval_days, 1_000_000);
    }

    #[test]
    fn test_word_view_flattens_state() {
        let json = serde_json::to_value(row().to_api_word()).unwrap();
        assert_eq!(json["word"], "brrr");
        assert_eq!(json["interval_days"], 8);
        assert_eq!(json["next_review_date"], 1_715_000_000_000_i64);
        assert_eq!(json["is_learning"], true);
    }
}
