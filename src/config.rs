use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryConfig {
    /// Registry archive to open or create
    pub registry_file: PathBuf,
    /// Recorded as the encoder of new applicants
    pub encoder: String,
    /// Rows per page in list views
    pub page_size: usize,
    pub session_refresh: Duration,
    /// Lifetime granted by each refresh; longer than the refresh period
    pub session_ttl: Duration,
    pub enforce_status_transitions: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            registry_file: PathBuf::from("registry.gipreg"),
            encoder: "Administrator".to_string(),
            page_size: 10,
            session_refresh: Duration::from_secs(30 * 60),
            session_ttl: Duration::from_secs(60 * 60),
            enforce_status_transitions: true,
        }
    }
}

impl RegistryConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from any key lookup; unset keys take defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let registry_file = lookup("REGISTRY_FILE")
            .map(PathBuf::from)
            .unwrap_or(defaults.registry_file);
        let encoder = lookup("REGISTRY_ENCODER").unwrap_or(defaults.encoder);
        let page_size: usize = parse_or(&lookup, "REGISTRY_PAGE_SIZE", defaults.page_size)?;
        if page_size == 0 {
            return Err(invalid("REGISTRY_PAGE_SIZE", "must be greater than zero"));
        }
        let refresh_minutes: u64 = parse_or(&lookup, "REGISTRY_SESSION_REFRESH_MINUTES", 30)?;
        let ttl_minutes: u64 = parse_or(&lookup, "REGISTRY_SESSION_TTL_MINUTES", 60)?;
        if refresh_minutes == 0 {
            return Err(invalid(
                "REGISTRY_SESSION_REFRESH_MINUTES",
                "must be greater than zero",
            ));
        }
        if ttl_minutes <= refresh_minutes {
            return Err(invalid(
                "REGISTRY_SESSION_TTL_MINUTES",
                "must exceed the refresh period",
            ));
        }
        let enforce_status_transitions = parse_or(
            &lookup,
            "REGISTRY_ENFORCE_STATUS_TRANSITIONS",
            defaults.enforce_status_transitions,
        )?;

        Ok(Self {
            registry_file,
            encoder,
            page_size,
            session_refresh: Duration::from_secs(refresh_minutes * 60),
            session_ttl: Duration::from_secs(ttl_minutes * 60),
            enforce_status_transitions,
        })
    }
}

fn invalid(key: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidEnvVar(key.to_string(), reason.to_string())
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string())),
        None => Ok(default),
    }
}
