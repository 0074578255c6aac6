//! Word selection: which saved words are due, new, or mastered.

use chrono::{DateTime, Utc};

use crate::types::WordRecord;

/// Whether a word should be offered for review at `now`.
///
/// Learning words and never-reviewed words are always due.
pub fn is_due<Id>(word: &WordRecord<Id>, now: DateTime<Utc>) -> bool {
    word.is_learning || word.next_review_date.map_or(true, |due| due <= now)
}

/// Whether a word has never been through a review cycle.
pub fn is_new<Id>(word: &WordRecord<Id>) -> bool {
    word.next_review_date.is_none() && word.repetitions == 0
}

/// Ids of due words, in input order.
pub fn select_due_words<Id: Clone>(words: &[WordRecord<Id>], now: DateTime<Utc>) -> Vec<Id> {
    words
        .iter()
        .filter(|w| is_due(w, now))
        .map(|w| w.id.clone())
        .collect()
}

/// Ids of never-reviewed words, in input order.
pub fn select_new_words<Id: Clone>(words: &[WordRecord<Id>]) -> Vec<Id> {
    words
        .iter()
        .filter(|w| is_new(w))
        .map(|w| w.id.clone())
        .collect()
}

/// Words split into disjoint buckets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordBuckets<Id = i64> {
    pub new: Vec<Id>,
    /// Due words that have been reviewed at least once.
    pub due: Vec<Id>,
    pub mastered: Vec<Id>,
}

impl<Id> Default for WordBuckets<Id> {
    fn default() -> Self {
        Self {
            new: Vec::new(),
            due: Vec::new(),
            mastered: Vec::new(),
        }
    }
}

/// Place every word in exactly one bucket, preserving input order.
pub fn classify_words<Id: Clone>(words: &[WordRecord<Id>], now: DateTime<Utc>) -> WordBuckets<Id> {
    let mut buckets = WordBuckets::default();
    for word in words {
        let id = word.id.clone();
        if is_new(word) {
            buckets.new.push(id);
        } else if is_due(word, now) {
            buckets.due.push(id);
        } else {
            buckets.mastered.push(id);
        }
    }
    buckets
}

/// Sort for presentation: learning words first, then by next review date
/// (unscheduled words before scheduled ones). Stable within ties.
pub fn order_for_presentation<Id>(words: &mut [WordRecord<Id>]) {
    words.sort_by(|a, b| {
        b.is_learning
            .cmp(&a.is_learning)
            .then_with(|| a.next_review_date.cmp(&b.next_review_date))
    });
}
