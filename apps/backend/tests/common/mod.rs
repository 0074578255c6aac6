//! Common test utilities and fixtures for integration tests.
//!
//! This module provides shared test infrastructure including:
//! - TestContext for setting up test environment with database
//! - A pinned clock so scheduling can be stepped through days
//! - Helper functions for creating test data
//!
//! # Requirements
//! Integration tests require a PostgreSQL database (set DATABASE_URL env var).

#![allow(dead_code)]

pub mod fixtures;

use std::collections::HashMap;
use std::sync::Arc;

use axum::Router;
use axum_test::TestServer;
use chrono::{DateTime, TimeZone, Utc};
use uuid::Uuid;

use dialect_review_backend::config::Config;
use dialect_review_backend::db::Database;
use dialect_review_backend::{router, AppState};
use review_core::{Clock, FixedClock};

/// Test context containing database connection, clock and router.
pub struct TestContext {
    pub db: Arc<Database>,
    pub clock: Arc<FixedClock>,
    app: Router,
}

impl TestContext {
    /// Create a new test context in strict difficulty mode.
    ///
    /// # Panics
    /// Panics if DATABASE_URL is not set or database connection fails.
    pub async fn new() -> Self {
        Self::with_env(&[]).await
    }

    /// Create a test context with extra configuration variables.
    pub async fn with_env(vars: &[(&str, &str)]) -> Self {
        dotenvy::dotenv().ok();

        let database_url =
            std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for integration tests");

        let mut env: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        env.insert("DATABASE_URL".to_string(), database_url.clone());
        let config = Config::from_lookup(|key| env.get(key).cloned())
            .expect("Invalid test configuration");

        let db = Database::connect(&database_url, 5)
            .await
            .expect("Failed to connect to test database");

        db.run_migrations()
            .await
            .expect("Failed to run migrations");

        let clock = Arc::new(FixedClock::new(start_time()));
        let state = AppState::new(db, config, clock.clone());
        let db = state.db.clone();
        let app = router(state);

        Self { db, clock, app }
    }

    /// Get the router for use with axum-test.
    pub fn router(&self) -> Router {
        self.app.clone()
    }

    pub fn server(&self) -> TestServer {
        TestServer::new(self.router()).expect("Failed to start test server")
    }

    /// Create a learner through the API and return its id.
    pub async fn create_learner(&self, server: &TestServer) -> Uuid {
        let response = server
            .post("/api/learners")
            .json(&fixtures::create_learner_request(Some("test learner")))
            .await;
        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        Uuid::parse_str(body["learner_id"].as_str().unwrap()).unwrap()
    }

    /// Save a word through the API and return its word review id.
    pub async fn save_word(&self, server: &TestServer, learner_id: Uuid, word: &str) -> i64 {
        let response = server
            .post(&format!("/api/learners/{}/words", learner_id))
            .json(&fixtures::save_word_request(word, "meaning", "levantine"))
            .await;
        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        body["id"].as_i64().unwrap()
    }

    /// Current test clock time in epoch milliseconds.
    pub fn clock_millis(&self) -> i64 {
        self.clock.now().timestamp_millis()
    }

    /// Clean up test data for a learner.
    pub async fn cleanup_learner(&self, learner_id: Uuid) {
        // History and words cascade from the learner
        let _ = sqlx::query("DELETE FROM learners WHERE id = $1")
            .bind(learner_id)
            .execute(self.db.pool())
            .await;
    }
}

/// Instant the test clock starts at.
pub fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 10, 8, 0, 0).unwrap()
}
