//! Review service: runs the scheduler against stored word state.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use review_core::{
    classify_words, order_for_presentation, select_due_words, select_new_words, Clock,
    ReviewScheduler,
};

use crate::config::DifficultyMode;
use crate::error::Result;
use crate::models::*;

/// Scheduler shared across requests; the clock is injected at startup.
pub type SharedScheduler = ReviewScheduler<std::sync::Arc<dyn Clock>>;

/// Resolve a raw rating under the configured mode.
pub fn resolve_difficulty(raw: i64, mode: DifficultyMode) -> Result<Difficulty> {
    match mode {
        DifficultyMode::Strict => Ok(Difficulty::try_from(raw)?),
        DifficultyMode::Legacy => {
            let difficulty = Difficulty::from_legacy(raw);
            if Difficulty::from_value(raw).is_none() {
                tracing::warn!(raw, "out-of-range difficulty scheduled as hard");
            }
            Ok(difficulty)
        }
    }
}

/// Compute the row update and audit entry for one review.
///
/// Reads the clock once so the stored next review date, the last review date
/// and the history timestamp all agree.
pub fn schedule_review(
    scheduler: &SharedScheduler,
    current: &DbWordReview,
    difficulty: Difficulty,
) -> Result<(DbScheduleUpdate, DbReviewHistory)> {
    let now = scheduler.clock().now();
    let prior = current.to_core_state().prior();
    let state = review_core::calculate_next_review(difficulty, prior, now);

    tracing::debug!(
        word_review_id = current.id,
        difficulty = difficulty.as_str(),
        interval_before = prior.interval_days,
        interval_after = state.interval_days,
        ease_before = prior.ease_factor,
        ease_after = state.ease_factor,
        "scheduled review"
    );

    Ok((
        DbScheduleUpdate::from_core_state(&state, now)?,
        DbReviewHistory::new(current.id, current.learner_id, difficulty, &state, now)?,
    ))
}

/// A capped batch of words in presentation order.
#[derive(Debug)]
pub struct Batch {
    pub words: Vec<DbWordReview>,
    pub total: usize,
}

/// Due words, learning words first then by next review date, capped at `limit`.
pub fn due_batch(words: Vec<DbWordReview>, now: DateTime<Utc>, limit: u32) -> Batch {
    let records: Vec<WordRecord> = words.iter().map(DbWordReview::to_record).collect();
    let due_ids = select_due_words(&records, now);
    batch_from_ids(words, &due_ids, limit, true)
}

/// Never-reviewed words in save order, capped at `limit`.
pub fn new_batch(words: Vec<DbWordReview>, limit: u32) -> Batch {
    let records: Vec<WordRecord> = words.iter().map(DbWordReview::to_record).collect();
    let new_ids = select_new_words(&records);
    batch_from_ids(words, &new_ids, limit, false)
}

fn batch_from_ids(words: Vec<DbWordReview>, ids: &[i64], limit: u32, ordered: bool) -> Batch {
    let mut by_id: HashMap<i64, DbWordReview> = words.into_iter().map(|w| (w.id, w)).collect();
    let mut selected: Vec<DbWordReview> = ids.iter().filter_map(|id| by_id.remove(id)).collect();

    if ordered {
        let mut records: Vec<WordRecord> = selected.iter().map(DbWordReview::to_record).collect();
        order_for_presentation(&mut records);
        let mut by_id: HashMap<i64, DbWordReview> =
            selected.into_iter().map(|w| (w.id, w)).collect();
        selected = records.iter().filter_map(|r| by_id.remove(&r.id)).collect();
    }

    let total = selected.len();
    selected.truncate(limit as usize);
    Batch { words: selected, total }
}

/// Bucket counts for a learner's saved words.
pub fn stats(words: &[DbWordReview], now: DateTime<Utc>) -> ReviewStatsResponse {
    let records: Vec<WordRecord> = words.iter().map(DbWordReview::to_record).collect();
    let buckets = classify_words(&records, now);
    ReviewStatsResponse {
        total_words: records.len(),
        new_words: buckets.new.len(),
        due_words: buckets.due.len(),
        mastered_words: buckets.mastered.len(),
    }
}
