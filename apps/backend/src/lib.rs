pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

use std::sync::Arc;

use axum::{
    routing::{delete, get, post},
    Router,
};
use review_core::{Clock, ReviewScheduler, SystemClock};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::db::Database;
use crate::services::review::SharedScheduler;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub config: Arc<Config>,
    pub scheduler: Arc<SharedScheduler>,
}

impl AppState {
    pub fn new(db: Database, config: Config, clock: Arc<dyn Clock>) -> Self {
        Self {
            db: Arc::new(db),
            config: Arc::new(config),
            scheduler: Arc::new(ReviewScheduler::new(clock)),
        }
    }
}

/// Build the router with all routes.
pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/api/learners", post(routes::learners::create))
        // Word routes
        .route(
            "/api/learners/{learner_id}/words",
            get(routes::words::list).post(routes::words::save),
        )
        .route(
            "/api/learners/{learner_id}/words/{word_review_id}",
            delete(routes::words::delete),
        )
        // Review routes
        .route("/api/learners/{learner_id}/review/due", get(routes::review::due))
        .route("/api/learners/{learner_id}/review/new", get(routes::review::new_words))
        .route("/api/learners/{learner_id}/review/stats", get(routes::review::stats))
        .route(
            "/api/learners/{learner_id}/review/{word_review_id}",
            post(routes::review::submit),
        )
        .route(
            "/api/learners/{learner_id}/review/{word_review_id}/history",
            get(routes::review::history),
        );

    Router::new()
        .route("/health", get(health_check))
        .merge(api)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

pub async fn run() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.log_filter))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Connecting to database...");
    let db = Database::connect(&config.database_url, config.db_max_connections).await?;

    tracing::info!("Running migrations...");
    db.run_migrations().await?;

    tracing::info!(
        difficulty_mode = ?config.difficulty_mode,
        review_batch_size = config.review_batch_size,
        "Review scheduler configured"
    );

    let addr = config.bind_addr();
    let state = AppState::new(db, config, Arc::new(SystemClock));
    let app = router(state);

    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_check() -> &'static str {
    "OK"
}
