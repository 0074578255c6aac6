//! Service configuration loaded from the environment.

use std::str::FromStr;

use crate::error::{ApiError, Result};

/// How numeric difficulty ratings outside 1..=3 are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DifficultyMode {
    /// Reject with 400.
    Strict,
    /// Schedule as Hard, matching older clients.
    Legacy,
}

impl FromStr for DifficultyMode {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(Self::Strict),
            "legacy" => Ok(Self::Legacy),
            other => Err(ApiError::Config(format!(
                "DIFFICULTY_MODE must be 'strict' or 'legacy', got '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub log_filter: String,
    pub db_max_connections: u32,
    /// Due words surfaced per request when the client does not ask for a limit.
    pub review_batch_size: u32,
    /// Ceiling on a client-requested limit.
    pub max_review_batch_size: u32,
    pub difficulty_mode: DifficultyMode,
}

impl Config {
    /// Read configuration from process environment (after `.env`).
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL")
            .ok_or_else(|| ApiError::Config("DATABASE_URL must be set".to_string()))?;

        let review_batch_size = parse_or(&lookup, "REVIEW_BATCH_SIZE", 20)?;
        let max_review_batch_size = parse_or(&lookup, "MAX_REVIEW_BATCH_SIZE", 100)?;
        if review_batch_size == 0 || review_batch_size > max_review_batch_size {
            return Err(ApiError::Config(format!(
                "REVIEW_BATCH_SIZE must be between 1 and {}",
                max_review_batch_size
            )));
        }

        Ok(Self {
            database_url,
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or(&lookup, "PORT", 3000)?,
            log_filter: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            db_max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", 10)?,
            review_batch_size,
            max_review_batch_size,
            difficulty_mode: match lookup("DIFFICULTY_MODE") {
                Some(value) => value.parse()?,
                None => DifficultyMode::Strict,
            },
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Effective batch size for a request, capped at the configured ceiling.
    pub fn batch_limit(&self, requested: Option<u32>) -> u32 {
        requested
            .unwrap_or(self.review_batch_size)
            .clamp(1, self.max_review_batch_size)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ApiError::Config(format!("{} has invalid value '{}'", key, raw))),
        None => Ok(default),
    }
}
