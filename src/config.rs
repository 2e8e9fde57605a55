//! Client configuration loaded from environment variables.
//!
//! - `STUDYFLOW_API_URL` - backend origin (default: http://localhost:8000)
//! - `STUDYFLOW_DATABASE_URL` - local storage database (default: sqlite://studyflow.db?mode=rwc)
//! - `STUDYFLOW_SEARCH_DEBOUNCE_MS` - delay before a course search fires (default: 500)
//! - `STUDYFLOW_REQUEST_TIMEOUT_SECS` - per-request timeout (default: 30)

use std::env;
use std::time::Duration;

use reqwest::Url;

use crate::error::AppError;

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const DEFAULT_DATABASE_URL: &str = "sqlite://studyflow.db?mode=rwc";
pub const DEFAULT_SEARCH_DEBOUNCE_MS: u64 = 500;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub api_url: Url,
    pub database_url: String,
    pub search_debounce: Duration,
    pub request_timeout: Duration,
}

impl ClientConfig {
    pub fn new(api_url: &str) -> Result<Self, AppError> {
        Ok(Self {
            api_url: parse_api_url(api_url)?,
            database_url: DEFAULT_DATABASE_URL.to_string(),
            search_debounce: Duration::from_millis(DEFAULT_SEARCH_DEBOUNCE_MS),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        })
    }

    pub fn new_from_env() -> Result<Self, AppError> {
        let api_url = env::var("STUDYFLOW_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let mut config = Self::new(&api_url)?;

        if let Ok(url) = env::var("STUDYFLOW_DATABASE_URL") {
            config.database_url = url;
        }
        if let Some(ms) = parse_u64_var("STUDYFLOW_SEARCH_DEBOUNCE_MS")? {
            config.search_debounce = Duration::from_millis(ms);
        }
        if let Some(secs) = parse_u64_var("STUDYFLOW_REQUEST_TIMEOUT_SECS")? {
            config.request_timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }
}

fn parse_api_url(raw: &str) -> Result<Url, AppError> {
    let url = Url::parse(raw)
        .map_err(|e| AppError::Config(format!("STUDYFLOW_API_URL is invalid: {}", e)))?;
    if url.cannot_be_a_base() {
        return Err(AppError::Config(format!(
            "STUDYFLOW_API_URL cannot be used as a base: {}",
            raw
        )));
    }
    Ok(url)
}

fn parse_u64_var(name: &str) -> Result<Option<u64>, AppError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(|_| AppError::Config(format!("{} must be a whole number", name))),
        Err(_) => Ok(None),
    }
}
