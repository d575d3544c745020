//! Process configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `LOOKUP_TIMEOUT_MS` - How long one product lookup waits for its reply (default: 10000)
//! - `DETAILS_REQUEST_TOPIC` - Topic details requests go to (default: product-details-request)
//! - `DETAILS_REPLY_TOPIC` - Topic replies come back on (default: product-details-response)
//! - `ENRICHMENT_POLICY` - `degrade` or `fail`, see [`EnrichmentPolicy`] (default: degrade)
//! - `ACTOR_BUFFER` - Request channel capacity of each entity store (default: 32)
//! - `BUS_CAPACITY` - Queue length of each bus subscription (default: 256)
//! - `LOOKUP_CONCURRENCY` - Product lookups the order service keeps in flight (default: 16)
//! - `HTTP_ADDR` - Listen address (default: 127.0.0.1:8080)

use crate::bridge::lookup::{DEFAULT_LOOKUP_TIMEOUT, DEFAULT_REPLY_TOPIC, DEFAULT_REQUEST_TOPIC};
use crate::bridge::BridgeSettings;
use crate::service::DEFAULT_LOOKUP_CONCURRENCY;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// What a failed product lookup does to an enrichment call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EnrichmentPolicy {
    /// Record the failure in the affected entry and carry on.
    #[default]
    Degrade,
    /// Fail the whole call with the lookup error.
    Fail,
}

impl FromStr for EnrichmentPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "degrade" => Ok(Self::Degrade),
            "fail" => Ok(Self::Fail),
            other => Err(format!("expected `degrade` or `fail`, got `{other}`")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub lookup_timeout: Duration,
    pub request_topic: String,
    pub reply_topic: String,
    pub enrichment_policy: EnrichmentPolicy,
    pub actor_buffer: usize,
    pub bus_capacity: usize,
    pub lookup_concurrency: usize,
    pub http_addr: SocketAddr,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            lookup_timeout: DEFAULT_LOOKUP_TIMEOUT,
            request_topic: DEFAULT_REQUEST_TOPIC.to_string(),
            reply_topic: DEFAULT_REPLY_TOPIC.to_string(),
            enrichment_policy: EnrichmentPolicy::Degrade,
            actor_buffer: 32,
            bus_capacity: message_bus::DEFAULT_CAPACITY,
            lookup_concurrency: DEFAULT_LOOKUP_CONCURRENCY,
            http_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
        }
    }
}

impl AppConfig {
    /// Load configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from any key/value source. Unset keys keep their default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            lookup_timeout: parse_or(&lookup, "LOOKUP_TIMEOUT_MS", defaults.lookup_timeout.as_millis() as u64)
                .map(Duration::from_millis)?,
            request_topic: lookup("DETAILS_REQUEST_TOPIC").unwrap_or(defaults.request_topic),
            reply_topic: lookup("DETAILS_REPLY_TOPIC").unwrap_or(defaults.reply_topic),
            enrichment_policy: parse_or(&lookup, "ENRICHMENT_POLICY", defaults.enrichment_policy)?,
            actor_buffer: positive(parse_or(&lookup, "ACTOR_BUFFER", defaults.actor_buffer)?, "ACTOR_BUFFER")?,
            bus_capacity: positive(parse_or(&lookup, "BUS_CAPACITY", defaults.bus_capacity)?, "BUS_CAPACITY")?,
            lookup_concurrency: positive(
                parse_or(&lookup, "LOOKUP_CONCURRENCY", defaults.lookup_concurrency)?,
                "LOOKUP_CONCURRENCY",
            )?,
            http_addr: parse_or(&lookup, "HTTP_ADDR", defaults.http_addr)?,
        })
    }

    pub fn bridge_settings(&self) -> BridgeSettings {
        BridgeSettings {
            request_topic: self.request_topic.clone(),
            reply_topic: self.reply_topic.clone(),
            timeout: self.lookup_timeout,
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| ConfigError::InvalidEnvVar(key.to_string(), e.to_string())),
        None => Ok(default),
    }
}

fn positive(value: usize, key: &str) -> Result<usize, ConfigError> {
    if value == 0 {
        return Err(ConfigError::InvalidEnvVar(key.to_string(), "must be at least 1".to_string()));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.lookup_timeout, Duration::from_secs(10));
        assert_eq!(config.request_topic, "product-details-request");
        assert_eq!(config.reply_topic, "product-details-response");
        assert_eq!(config.enrichment_policy, EnrichmentPolicy::Degrade);
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("LOOKUP_TIMEOUT_MS", "250"),
            ("DETAILS_REQUEST_TOPIC", "req"),
            ("ENRICHMENT_POLICY", "FAIL"),
            ("HTTP_ADDR", "0.0.0.0:9000"),
            ("LOOKUP_CONCURRENCY", "4"),
        ])
        .unwrap();

        assert_eq!(config.lookup_timeout, Duration::from_millis(250));
        assert_eq!(config.request_topic, "req");
        assert_eq!(config.enrichment_policy, EnrichmentPolicy::Fail);
        assert_eq!(config.http_addr.port(), 9000);
        assert_eq!(config.lookup_concurrency, 4);

        let settings = config.bridge_settings();
        assert_eq!(settings.timeout, Duration::from_millis(250));
        assert_eq!(settings.reply_topic, "product-details-response");
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(matches!(
            load(&[("LOOKUP_TIMEOUT_MS", "soon")]),
            Err(ConfigError::InvalidEnvVar(key, _)) if key == "LOOKUP_TIMEOUT_MS"
        ));
        assert!(load(&[("ENRICHMENT_POLICY", "ignore")]).is_err());
        assert!(load(&[("ACTOR_BUFFER", "0")]).is_err());
        assert!(load(&[("LOOKUP_CONCURRENCY", "0")]).is_err());
    }
}
