//! Environment configuration

use crate::voice::{Language, LanguageParseError};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_LISTEN_TIMEOUT: Duration = Duration::from_millis(6500);
pub const DEFAULT_CALLER_NAME: &str = "Abena";
pub const DEFAULT_LOG_FILTER: &str = "koni_health=info";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} has invalid value '{value}': {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KoniConfig {
    pub db_path: PathBuf,
    pub listen_timeout: Duration,
    pub language: Language,
    pub caller_name: String,
}

impl KoniConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from an arbitrary variable lookup. Invalid values are logged and
    /// replaced by their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let db_path = lookup("KONI_DB_PATH").map_or_else(
            || {
                let home = lookup("HOME").unwrap_or_else(|| "/tmp".to_string());
                PathBuf::from(format!("{home}/.koni-health/koni.db"))
            },
            PathBuf::from,
        );

        let listen_timeout = lookup("KONI_LISTEN_TIMEOUT_MS")
            .map(|raw| parse_timeout(&raw))
            .transpose()
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Using default listen timeout");
                None
            })
            .unwrap_or(DEFAULT_LISTEN_TIMEOUT);

        let language = lookup("KONI_LANGUAGE")
            .map(|raw| parse_language(&raw))
            .transpose()
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Using default language");
                None
            })
            .unwrap_or_default();

        let caller_name = lookup("KONI_CALLER_NAME")
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| DEFAULT_CALLER_NAME.to_string());

        Self {
            db_path,
            listen_timeout,
            language,
            caller_name,
        }
    }
}

fn parse_timeout(raw: &str) -> Result<Duration, ConfigError> {
    let invalid = |reason: &str| ConfigError::Invalid {
        var: "KONI_LISTEN_TIMEOUT_MS",
        value: raw.to_string(),
        reason: reason.to_string(),
    };
    match raw.trim().parse::<u64>() {
        Ok(0) => Err(invalid("must be positive")),
        Ok(ms) => Ok(Duration::from_millis(ms)),
        Err(e) => Err(invalid(&e.to_string())),
    }
}

fn parse_language(raw: &str) -> Result<Language, ConfigError> {
    raw.parse().map_err(|e: LanguageParseError| ConfigError::Invalid {
        var: "KONI_LANGUAGE",
        value: raw.to_string(),
        reason: e.to_string(),
    })
}
