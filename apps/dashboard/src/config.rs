//! # Application Configuration
//!
//! Configuration is loaded from environment variables with fallback to
//! defaults. It is read-only after startup, so no lock is needed.
//!
//! ## Environment Variables
//! | Variable                        | Default                     |
//! |---------------------------------|-----------------------------|
//! | `MELATEA_STORE_NAME`            | `MelaTea`                   |
//! | `MELATEA_STORE_ADDRESS`         | `Jl. Raya No. 123, Jakarta` |
//! | `MELATEA_SAVE_DELAY_MS`         | `1500`                      |
//! | `MELATEA_PAYMENT_DELAY_MS`      | `2000`                      |
//! | `MELATEA_LOGIN_DELAY_MS`        | `1500`                      |
//! | `MELATEA_REFRESH_DELAY_MS`      | `500`                       |
//! | `MELATEA_ALLOW_NEGATIVE_STOCK`  | `false`                     |

use std::env;
use std::str::FromStr;
use std::time::Duration;

use melatea_core::settings::GeneralSettings;
use serde::Serialize;

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}

/// Startup configuration.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    /// Store name seeded into the general settings
    pub store_name: String,

    /// Store address seeded into the general settings
    pub store_address: String,

    /// Simulated latency of saving settings
    pub save_delay: Duration,

    /// Simulated latency of processing a payment
    pub payment_delay: Duration,

    /// Simulated latency of logging in
    pub login_delay: Duration,

    /// Simulated latency of refreshing notifications
    pub refresh_delay: Duration,

    /// Let consumption drive stock below zero
    pub allow_negative_stock: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        let general = GeneralSettings::default();
        AppConfig {
            store_name: general.store_name,
            store_address: general.store_address,
            save_delay: Duration::from_millis(1500),
            payment_delay: Duration::from_millis(2000),
            login_delay: Duration::from_millis(1500),
            refresh_delay: Duration::from_millis(500),
            allow_negative_stock: false,
        }
    }
}

impl AppConfig {
    /// Loads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Loads configuration from any key lookup.
    ///
    /// Unset keys keep their defaults. Set keys must parse.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = AppConfig::default();

        Ok(AppConfig {
            store_name: lookup("MELATEA_STORE_NAME").unwrap_or(defaults.store_name),
            store_address: lookup("MELATEA_STORE_ADDRESS").unwrap_or(defaults.store_address),
            save_delay: millis(&lookup, "MELATEA_SAVE_DELAY_MS", defaults.save_delay)?,
            payment_delay: millis(&lookup, "MELATEA_PAYMENT_DELAY_MS", defaults.payment_delay)?,
            login_delay: millis(&lookup, "MELATEA_LOGIN_DELAY_MS", defaults.login_delay)?,
            refresh_delay: millis(&lookup, "MELATEA_REFRESH_DELAY_MS", defaults.refresh_delay)?,
            allow_negative_stock: parsed(
                &lookup,
                "MELATEA_ALLOW_NEGATIVE_STOCK",
                defaults.allow_negative_stock,
            )?,
        })
    }

    /// Defaults with every simulated delay removed.
    pub fn without_delays() -> Self {
        AppConfig {
            save_delay: Duration::ZERO,
            payment_delay: Duration::ZERO,
            login_delay: Duration::ZERO,
            refresh_delay: Duration::ZERO,
            ..AppConfig::default()
        }
    }

    /// General settings the store starts with.
    pub fn general_settings(&self) -> GeneralSettings {
        GeneralSettings {
            store_name: self.store_name.clone(),
            store_address: self.store_address.clone(),
            ..GeneralSettings::default()
        }
    }
}

fn parsed<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(key.to_string())),
        None => Ok(default),
    }
}

fn millis<F>(lookup: &F, key: &str, default: Duration) -> Result<Duration, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let ms = parsed(lookup, key, default.as_millis() as u64)?;
    Ok(Duration::from_millis(ms))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();

        assert_eq!(config.store_name, "MelaTea");
        assert_eq!(config.save_delay, Duration::from_millis(1500));
        assert_eq!(config.payment_delay, Duration::from_millis(2000));
        assert_eq!(config.refresh_delay, Duration::from_millis(500));
        assert!(!config.allow_negative_stock);
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_lookup(lookup(&[
            ("MELATEA_STORE_NAME", "MelaTea Bandung"),
            ("MELATEA_PAYMENT_DELAY_MS", "0"),
            ("MELATEA_ALLOW_NEGATIVE_STOCK", "true"),
        ]))
        .unwrap();

        assert_eq!(config.general_settings().store_name, "MelaTea Bandung");
        assert_eq!(config.payment_delay, Duration::ZERO);
        assert!(config.allow_negative_stock);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = AppConfig::from_lookup(lookup(&[("MELATEA_SAVE_DELAY_MS", "soon")]))
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid value for MELATEA_SAVE_DELAY_MS");

        assert!(
            AppConfig::from_lookup(lookup(&[("MELATEA_ALLOW_NEGATIVE_STOCK", "maybe")])).is_err()
        );
    }
}
