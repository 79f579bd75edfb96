//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `PIZZERIA_DATA_DIR` - Directory for the file-backed store (default: `.pizzeria`)
//! - `PIZZERIA_PROFILE_SYNC_DELAY_MS` - Mock profile sync latency (default: 500)
//! - `PIZZERIA_CART_SYNC_DELAY_MS` - Mock cart sync latency (default: 1000)
//! - `PIZZERIA_CART_PERSISTENCE` - Mirror the cart to the store (default: true)
//! - `PIZZERIA_CLEAR_CART_ON_LOGOUT` - Empty the cart when logging out (default: false)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront state model configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorefrontConfig {
    /// Directory holding the file-backed key-value store
    pub data_dir: PathBuf,
    /// Simulated latency of the profile sync backend
    pub profile_sync_delay: Duration,
    /// Simulated latency of the cart sync backend
    pub cart_sync_delay: Duration,
    /// Whether cart contents are mirrored to the persistent store
    pub cart_persistence: bool,
    /// Whether logging out also empties the cart
    pub clear_cart_on_logout: bool,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(".pizzeria"),
            profile_sync_delay: Duration::from_millis(500),
            cart_sync_delay: Duration::from_millis(1000),
            cart_persistence: true,
            clear_cart_on_logout: false,
            sentry_dsn: None,
            sentry_environment: None,
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an unparseable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// Unset variables fall back to [`StorefrontConfig::default`].
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an unparseable value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let data_dir = lookup("PIZZERIA_DATA_DIR").map_or(defaults.data_dir, PathBuf::from);
        let profile_sync_delay = parse_millis(
            "PIZZERIA_PROFILE_SYNC_DELAY_MS",
            lookup("PIZZERIA_PROFILE_SYNC_DELAY_MS"),
            defaults.profile_sync_delay,
        )?;
        let cart_sync_delay = parse_millis(
            "PIZZERIA_CART_SYNC_DELAY_MS",
            lookup("PIZZERIA_CART_SYNC_DELAY_MS"),
            defaults.cart_sync_delay,
        )?;
        let cart_persistence = parse_bool(
            "PIZZERIA_CART_PERSISTENCE",
            lookup("PIZZERIA_CART_PERSISTENCE"),
            defaults.cart_persistence,
        )?;
        let clear_cart_on_logout = parse_bool(
            "PIZZERIA_CLEAR_CART_ON_LOGOUT",
            lookup("PIZZERIA_CLEAR_CART_ON_LOGOUT"),
            defaults.clear_cart_on_logout,
        )?;

        Ok(Self {
            data_dir,
            profile_sync_delay,
            cart_sync_delay,
            cart_persistence,
            clear_cart_on_logout,
            sentry_dsn: lookup("SENTRY_DSN").filter(|dsn| !dsn.is_empty()),
            sentry_environment: lookup("SENTRY_ENVIRONMENT"),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse a millisecond count, falling back to `default` when unset.
fn parse_millis(
    key: &str,
    value: Option<String>,
    default: Duration,
) -> Result<Duration, ConfigError> {
    value.map_or(Ok(default), |raw| {
        raw.trim()
            .parse::<u64>()
            .map(Duration::from_millis)
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    })
}

/// Parse a boolean flag, falling back to `default` when unset.
fn parse_bool(key: &str, value: Option<String>, default: bool) -> Result<bool, ConfigError> {
    let Some(raw) = value else {
        return Ok(default);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("expected a boolean, got '{other}'"),
        )),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = StorefrontConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, StorefrontConfig::default());
    }

    #[test]
    fn test_overrides() {
        let config = StorefrontConfig::from_lookup(lookup_from(&[
            ("PIZZERIA_DATA_DIR", "/tmp/pizza"),
            ("PIZZERIA_PROFILE_SYNC_DELAY_MS", "0"),
            ("PIZZERIA_CART_SYNC_DELAY_MS", "250"),
            ("PIZZERIA_CART_PERSISTENCE", "off"),
            ("PIZZERIA_CLEAR_CART_ON_LOGOUT", "TRUE"),
            ("SENTRY_DSN", "https://key@sentry.example/1"),
        ]))
        .unwrap();

        assert_eq!(config.data_dir, PathBuf::from("/tmp/pizza"));
        assert_eq!(config.profile_sync_delay, Duration::ZERO);
        assert_eq!(config.cart_sync_delay, Duration::from_millis(250));
        assert!(!config.cart_persistence);
        assert!(config.clear_cart_on_logout);
        assert!(config.sentry_dsn.is_some());
    }

    #[test]
    fn test_empty_sentry_dsn_is_none() {
        let config = StorefrontConfig::from_lookup(lookup_from(&[("SENTRY_DSN", "")])).unwrap();
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_invalid_delay() {
        let err = StorefrontConfig::from_lookup(lookup_from(&[(
            "PIZZERIA_CART_SYNC_DELAY_MS",
            "soon",
        )]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(key, _) if key == "PIZZERIA_CART_SYNC_DELAY_MS"));
    }

    #[test]
    fn test_invalid_bool() {
        let err = StorefrontConfig::from_lookup(lookup_from(&[(
            "PIZZERIA_CLEAR_CART_ON_LOGOUT",
            "maybe",
        )]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(_, msg) if msg.contains("maybe")));
    }
}
