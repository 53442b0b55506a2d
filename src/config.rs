//! Application configuration read from the environment.
//!
//! A `.env` file in the working directory is loaded first, so every setting
//! can live there instead of the shell.

use crate::dictionary::client::DEFAULT_BASE_URL;
use crate::error::ConfigError;
use crate::models::IntervalTable;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DB_PATH_VAR: &str = "VOCAB_DB_PATH";
pub const DICTIONARY_URL_VAR: &str = "VOCAB_DICTIONARY_URL";
pub const HTTP_TIMEOUT_VAR: &str = "VOCAB_HTTP_TIMEOUT_SECS";
pub const REVIEW_INTERVALS_VAR: &str = "VOCAB_REVIEW_INTERVALS";

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub dictionary_url: String,
    pub http_timeout: Duration,
    pub intervals: IntervalTable,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("vocab.sqlite3"),
            dictionary_url: DEFAULT_BASE_URL.to_string(),
            http_timeout: Duration::from_secs(10),
            intervals: IntervalTable::default(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), "loaded .env");
        }
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key lookup; unset keys keep defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let db_path = lookup(DB_PATH_VAR)
            .map(PathBuf::from)
            .unwrap_or(defaults.db_path);

        let dictionary_url = lookup(DICTIONARY_URL_VAR).unwrap_or(defaults.dictionary_url);

        let http_timeout = match lookup(HTTP_TIMEOUT_VAR) {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    tracing::warn!("ignoring invalid {HTTP_TIMEOUT_VAR}={raw}");
                    defaults.http_timeout
                }
            },
            None => defaults.http_timeout,
        };

        let intervals = match lookup(REVIEW_INTERVALS_VAR) {
            Some(raw) => raw.parse()?,
            None => defaults.intervals,
        };

        Ok(Self {
            db_path,
            dictionary_url,
            http_timeout,
            intervals,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]).unwrap();
        assert_eq!(config.db_path, PathBuf::from("vocab.sqlite3"));
        assert_eq!(config.dictionary_url, DEFAULT_BASE_URL);
        assert_eq!(config.http_timeout, Duration::from_secs(10));
        assert_eq!(config.intervals, IntervalTable::default());
    }

    #[test]
    fn test_overrides() {
        let config = config(&[
            (DB_PATH_VAR, "/tmp/words.db"),
            (HTTP_TIMEOUT_VAR, "3"),
            (REVIEW_INTERVALS_VAR, "1,2,4"),
        ])
        .unwrap();
        assert_eq!(config.db_path, PathBuf::from("/tmp/words.db"));
        assert_eq!(config.http_timeout, Duration::from_secs(3));
        assert_eq!(config.intervals.as_slice(), &[1, 2, 4]);
    }

    #[test]
    fn test_bad_timeout_falls_back() {
        let config = config(&[(HTTP_TIMEOUT_VAR, "soon")]).unwrap();
        assert_eq!(config.http_timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_bad_intervals_are_an_error() {
        assert!(config(&[(REVIEW_INTERVALS_VAR, "1,,x")]).is_err());
    }
}
