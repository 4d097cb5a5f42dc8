// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use crate::error::ConfigError;
use std::env;
use std::time::Duration;

const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration for the log aggregator
#[derive(Debug, Clone)]
pub struct AggregatorConfig {
    /// Upper bound on every single backend call
    pub call_timeout: Duration,
    /// Run the selected collectors concurrently instead of one after another
    pub concurrent: bool,
    /// Log level (e.g., trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            call_timeout: DEFAULT_CALL_TIMEOUT,
            concurrent: true,
            log_level: "info".to_string(),
        }
    }
}

impl AggregatorConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let call_timeout = env::var("APPLOGS_CALL_TIMEOUT_MS")
            .ok()
            .and_then(|ms| ms.parse::<u64>().ok())
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_CALL_TIMEOUT);
        let concurrent = env::var("APPLOGS_CONCURRENT")
            .map(|val| val.to_lowercase() != "false")
            .unwrap_or(true);
        let log_level = env::var("APPLOGS_LOG_LEVEL")
            .map(|val| val.to_lowercase())
            .unwrap_or_else(|_| "info".to_string());

        let config = Self {
            call_timeout,
            concurrent,
            log_level,
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.call_timeout.is_zero() {
            return Err(ConfigError::InvalidConfig(
                "call timeout must be greater than 0".to_string(),
            ));
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&self.log_level.as_str()) {
            return Err(ConfigError::InvalidConfig(format!(
                "Invalid log level '{}'. Must be one of: trace, debug, info, warn, error",
                self.log_level
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: [&str; 3] = [
        "APPLOGS_CALL_TIMEOUT_MS",
        "APPLOGS_CONCURRENT",
        "APPLOGS_LOG_LEVEL",
    ];

    fn clear_env() {
        for key in VARS {
            env::remove_var(key);
        }
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = AggregatorConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_zero_timeout() {
        let config = AggregatorConfig {
            call_timeout: Duration::ZERO,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_invalid_log_level() {
        let config = AggregatorConfig {
            log_level: "verbose".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        clear_env();

        let config = AggregatorConfig::from_env().unwrap();
        assert_eq!(config.call_timeout, Duration::from_secs(10));
        assert!(config.concurrent);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    #[serial]
    fn test_from_env_overrides() {
        clear_env();
        env::set_var("APPLOGS_CALL_TIMEOUT_MS", "2500");
        env::set_var("APPLOGS_CONCURRENT", "FALSE");
        env::set_var("APPLOGS_LOG_LEVEL", "DEBUG");

        let config = AggregatorConfig::from_env().unwrap();
        clear_env();

        assert_eq!(config.call_timeout, Duration::from_millis(2500));
        assert!(!config.concurrent);
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    #[serial]
    fn test_from_env_unparsable_timeout_falls_back() {
        clear_env();
        env::set_var("APPLOGS_CALL_TIMEOUT_MS", "soon");

        let config = AggregatorConfig::from_env().unwrap();
        clear_env();

        assert_eq!(config.call_timeout, Duration::from_secs(10));
    }

    #[test]
    #[serial]
    fn test_from_env_rejects_zero_timeout() {
        clear_env();
        env::set_var("APPLOGS_CALL_TIMEOUT_MS", "0");

        let result = AggregatorConfig::from_env();
        clear_env();

        assert!(result.is_err());
    }
}
