//! Test fixtures and factory functions for creating test data.

use serde_json::json;
use uuid::Uuid;

/// Create a learner request body.
pub fn create_learner_request(name: Option<&str>) -> serde_json::Value {
    match name {
        Some(n) => json!({ "name": n }),
        None => json!({}),
    }
}

/// Create a save word request body.
pub fn save_word_request(word: &str, translation: &str, dialect: &str) -> serde_json::Value {
    json!({
        "word": word,
        "translation": translation,
        "dialect": dialect
    })
}

/// Create a submit review request body.
pub fn submit_review_request(difficulty: i64) -> serde_json::Value {
    json!({ "difficulty": difficulty })
}

/// Generate a unique word to avoid collisions between test runs.
pub fn unique_word(prefix: &str) -> String {
    format!("{}_{}", prefix, &Uuid::new_v4().to_string()[..8])
}

/// Path of a learner-scoped endpoint.
pub fn learner_path(learner_id: Uuid, rest: &str) -> String {
    format!("/api/learners/{}/{}", learner_id, rest)
}
