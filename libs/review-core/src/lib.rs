//! Vocabulary review scheduler shared by the review service.
//!
//! Provides:
//! - Three-level difficulty model (Easy, Medium, Hard)
//! - Simplified SM-2 scheduling (`calculate_next_review`)
//! - Due/new/mastered word selection
//! - Injectable time source for deterministic scheduling

pub mod clock;
pub mod error;
pub mod scheduler;
pub mod selection;
pub mod types;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{ReviewError, Result};
pub use scheduler::{calculate_next_review, ReviewScheduler};
pub use selection::{
    classify_words, order_for_presentation, select_due_words, select_new_words, WordBuckets,
};
pub use types::{
    Difficulty, PriorState, WordRecord, WordScheduleState, MAXIMUM_INTERVAL_DAYS,
};
