//! Core types for word review scheduling.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ReviewError;

/// Initial ease factor for a newly saved word.
pub const INITIAL_EASE: f64 = 2.5;

/// Ease factor ceiling.
pub const MAXIMUM_EASE: f64 = 2.5;

/// Ease factor floor.
pub const MINIMUM_EASE: f64 = 1.3;

/// Words with an interval below this many days are still being learned.
pub const LEARNING_THRESHOLD_DAYS: u32 = 30;

/// Longest interval the scheduler hands out (about 2,700 years). Keeps
/// `now + interval` representable and the interval within an `i32` column.
pub const MAXIMUM_INTERVAL_DAYS: u32 = 1_000_000;

/// Difficulty rating given by the learner after a review.
///
/// Crosses the wire as its numeric value (1, 2 or 3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Convert to 3-point numeric value (1-3).
    pub fn to_value(self) -> u8 {
        match self {
            Self::Easy => 1,
            Self::Medium => 2,
            Self::Hard => 3,
        }
    }

    /// Create from 3-point numeric value.
    pub fn from_value(value: i64) -> Option<Self> {
        match value {
            1 => Some(Self::Easy),
            2 => Some(Self::Medium),
            3 => Some(Self::Hard),
            _ => None,
        }
    }

    /// Map a raw rating the way stored clients always have: anything that
    /// is not 1 or 2 is scheduled as Hard.
    pub fn from_legacy(value: i64) -> Self {
        match value {
            1 => Self::Easy,
            2 => Self::Medium,
            _ => Self::Hard,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }
}

impl TryFrom<i64> for Difficulty {
    type Error = ReviewError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::from_value(value).ok_or(ReviewError::InvalidDifficulty { value })
    }
}

impl From<Difficulty> for i64 {
    fn from(difficulty: Difficulty) -> Self {
        i64::from(difficulty.to_value())
    }
}

/// Scheduling state of one learner-word pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordScheduleState {
    pub ease_factor: f64,
    pub interval_days: u32,
    pub repetitions: u32,
    /// Epoch milliseconds on the wire; absent before the first review.
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub next_review_date: Option<DateTime<Utc>>,
    pub is_learning: bool,
}

impl WordScheduleState {
    /// State of a word that has just been saved and never reviewed.
    pub fn initial() -> Self {
        Self {
            ease_factor: INITIAL_EASE,
            interval_days: 0,
            repetitions: 0,
            next_review_date: None,
            is_learning: true,
        }
    }

    /// The inputs the scheduler reads from this state.
    pub fn prior(&self) -> PriorState {
        PriorState {
            ease_factor: self.ease_factor,
            interval_days: self.interval_days,
            repetitions: self.repetitions,
        }
    }
}

impl Default for WordScheduleState {
    fn default() -> Self {
        Self::initial()
    }
}

/// Scheduler input taken from the stored state before a review.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriorState {
    pub ease_factor: f64,
    pub interval_days: u32,
    pub repetitions: u32,
}

impl Default for PriorState {
    fn default() -> Self {
        Self {
            ease_factor: INITIAL_EASE,
            interval_days: 0,
            repetitions: 0,
        }
    }
}

impl From<&WordScheduleState> for PriorState {
    fn from(state: &WordScheduleState) -> Self {
        state.prior()
    }
}

/// Projection of a saved word used by the selection helpers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordRecord<Id = i64> {
    pub id: Id,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub next_review_date: Option<DateTime<Utc>>,
    pub is_learning: bool,
    pub repetitions: u32,
}

impl<Id> WordRecord<Id> {
    /// Build a record from an id and its stored schedule state.
    pub fn from_state(id: Id, state: &WordScheduleState) -> Self {
        Self {
            id,
            next_review_date: state.next_review_date,
            is_learning: state.is_learning,
            repetitions: state.repetitions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    #[test]
    fn strict_lookup_rejects_out_of_domain_values() {
        assert_eq!(Difficulty::from_value(1), Some(Difficulty::Easy));
        assert_eq!(Difficulty::from_value(3), Some(Difficulty::Hard));
        assert_eq!(Difficulty::from_value(0), None);
        assert_eq!(Difficulty::from_value(4), None);
        assert_eq!(
            Difficulty::try_from(-1),
            Err(ReviewError::InvalidDifficulty { value: -1 })
        );
    }

    #[test]
    fn legacy_lookup_folds_unknown_values_into_hard() {
        assert_eq!(Difficulty::from_legacy(1), Difficulty::Easy);
        assert_eq!(Difficulty::from_legacy(2), Difficulty::Medium);
        assert_eq!(Difficulty::from_legacy(3), Difficulty::Hard);
        assert_eq!(Difficulty::from_legacy(0), Difficulty::Hard);
        assert_eq!(Difficulty::from_legacy(42), Difficulty::Hard);
    }

    #[test]
    fn difficulty_serializes_as_number() {
        assert_eq!(serde_json::to_string(&Difficulty::Medium).unwrap(), "2");
        let parsed: Difficulty = serde_json::from_str("3").unwrap();
        assert_eq!(parsed, Difficulty::Hard);
        assert!(serde_json::from_str::<Difficulty>("5").is_err());
    }

    #[test]
    fn initial_state_matches_a_freshly_saved_word() {
        let state = WordScheduleState::initial();
        assert_eq!(state.ease_factor, 2.5);
        assert_eq!(state.interval_days, 0);
        assert_eq!(state.repetitions, 0);
        assert_eq!(state.next_review_date, None);
        assert!(state.is_learning);
        assert_eq!(state.prior(), PriorState::default());
    }

    #[test]
    fn next_review_date_uses_epoch_millis() {
        let state = WordScheduleState {
            next_review_date: Some(Utc.timestamp_millis_opt(1_700_000_000_123).unwrap()),
            ..WordScheduleState::initial()
        };
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["next_review_date"], 1_700_000_000_123_i64);

        let missing: WordScheduleState = serde_json::from_str(
            r#"{"ease_factor":2.5,"interval_days":0,"repetitions":0,"is_learning":true}"#,
        )
        .unwrap();
        assert_eq!(missing.next_review_date, None);
    }
}
