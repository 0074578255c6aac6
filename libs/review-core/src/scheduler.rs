//! Three-level spaced repetition scheduling.
//!
//! A simplified SM-2: Easy and Medium advance the word (fixed 1 and 3 day
//! steps for the first repetitions, then multiplicative growth), Hard is a
//! lapse that halves the interval and steps the repetition count back by one
//! instead of resetting it.

use chrono::{DateTime, Duration, Utc};

use crate::clock::{Clock, SystemClock};
use crate::error::Result;
use crate::types::{
    Difficulty, PriorState, WordScheduleState, LEARNING_THRESHOLD_DAYS, MAXIMUM_EASE,
    MAXIMUM_INTERVAL_DAYS, MINIMUM_EASE,
};

const EASY_EASE_BONUS: f64 = 0.15;
const MEDIUM_EASE_PENALTY: f64 = 0.05;
const HARD_EASE_PENALTY: f64 = 0.2;
const MEDIUM_INTERVAL_MODIFIER: f64 = 0.8;
const HARD_INTERVAL_MODIFIER: f64 = 0.5;

/// Compute the state of a word after a review at `now`.
pub fn calculate_next_review(
    difficulty: Difficulty,
    prior: PriorState,
    now: DateTime<Utc>,
) -> WordScheduleState {
    let (ease_factor, repetitions, interval_days) = match difficulty {
        Difficulty::Easy => {
            let ease = (prior.ease_factor + EASY_EASE_BONUS).min(MAXIMUM_EASE);
            let repetitions = prior.repetitions.saturating_add(1);
            let interval = match repetitions {
                1 => 1,
                2 => 3,
                _ => round_days(f64::from(prior.interval_days) * ease),
            };
            (ease, repetitions, interval)
        }
        Difficulty::Medium => {
            let ease = (prior.ease_factor - MEDIUM_EASE_PENALTY).max(MINIMUM_EASE);
            let repetitions = prior.repetitions.saturating_add(1);
            let interval = match repetitions {
                1 => 1,
                _ => round_days(f64::from(prior.interval_days) * ease * MEDIUM_INTERVAL_MODIFIER),
            };
            (ease, repetitions, interval)
        }
        Difficulty::Hard => {
            let ease = (prior.ease_factor - HARD_EASE_PENALTY).max(MINIMUM_EASE);
            let repetitions = prior.repetitions.saturating_sub(1);
            let interval = round_days(f64::from(prior.interval_days) * HARD_INTERVAL_MODIFIER);
            (ease, repetitions, interval)
        }
    };

    WordScheduleState {
        ease_factor: round_ease(ease_factor),
        interval_days,
        repetitions,
        next_review_date: Some(due_after(now, interval_days)),
        is_learning: interval_days < LEARNING_THRESHOLD_DAYS,
    }
}

/// Round half-up to whole days. Negative and NaN products floor at 0,
/// large ones stop at `MAXIMUM_INTERVAL_DAYS`.
fn round_days(days: f64) -> u32 {
    (days.round().max(0.0) as u32).min(MAXIMUM_INTERVAL_DAYS)
}

/// `now` plus whole days, saturating at the latest representable instant.
fn due_after(now: DateTime<Utc>, interval_days: u32) -> DateTime<Utc> {
    now.checked_add_signed(Duration::days(i64::from(interval_days)))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Two decimal places for stable storage, kept inside the ease bounds.
fn round_ease(ease: f64) -> f64 {
    ((ease * 100.0).round() / 100.0).clamp(MINIMUM_EASE, MAXIMUM_EASE)
}

/// Scheduler bound to a time source.
#[derive(Debug, Clone, Default)]
pub struct ReviewScheduler<C = SystemClock> {
    clock: C,
}

impl<C: Clock> ReviewScheduler<C> {
    pub fn new(clock: C) -> Self {
        Self { clock }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Schedule a review rated with a typed difficulty.
    pub fn review(&self, difficulty: Difficulty, prior: PriorState) -> WordScheduleState {
        calculate_next_review(difficulty, prior, self.clock.now())
    }

    /// Schedule a raw numeric rating, treating anything but 1 or 2 as Hard.
    pub fn review_legacy(&self, raw: i64, prior: PriorState) -> WordScheduleState {
        self.review(Difficulty::from_legacy(raw), prior)
    }

    /// Schedule a raw numeric rating, rejecting values outside 1..=3.
    pub fn review_strict(&self, raw: i64, prior: PriorState) -> Result<WordScheduleState> {
        let difficulty = Difficulty::try_from(raw)?;
        Ok(self.review(difficulty, prior))
    }
}
