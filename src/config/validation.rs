//! Configuration validation.
//!
//! Serde handles syntax; this module checks value ranges and addresses.
//! Validation is a pure function that reports every problem at once rather
//! than stopping at the first.

use std::net::SocketAddr;
use thiserror::Error;

use crate::config::schema::ServiceConfig;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid address for {field}: {value}")]
    InvalidAddress { field: &'static str, value: String },

    #[error("{field} must be greater than 0")]
    NotPositive { field: &'static str },

    #[error("database.min_connections ({min}) exceeds database.max_connections ({max})")]
    PoolBounds { min: u32, max: u32 },
}

/// Validate a parsed configuration.
pub fn validate_config(config: &ServiceConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "listener.bind_address",
            value: config.listener.bind_address.clone(),
        });
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }

    if config.database.max_connections == 0 {
        errors.push(ValidationError::NotPositive { field: "database.max_connections" });
    }
    if config.database.min_connections > config.database.max_connections {
        errors.push(ValidationError::PoolBounds {
            min: config.database.min_connections,
            max: config.database.max_connections,
        });
    }

    if config.profile.trending_limit <= 0 {
        errors.push(ValidationError::NotPositive { field: "profile.trending_limit" });
    }
    if config.profile.posts_limit <= 0 {
        errors.push(ValidationError::NotPositive { field: "profile.posts_limit" });
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::NotPositive { field: "timeouts.request_secs" });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&ServiceConfig::default()).is_ok());
    }

    #[test]
    fn test_reports_all_errors() {
        let mut config = ServiceConfig::default();
        config.listener.bind_address = "not-an-address".into();
        config.database.min_connections = 10;
        config.database.max_connections = 5;
        config.profile.posts_limit = 0;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors.contains(&ValidationError::PoolBounds { min: 10, max: 5 }));
        assert!(errors.contains(&ValidationError::NotPositive { field: "profile.posts_limit" }));
    }

    #[test]
    fn test_metrics_address_only_checked_when_enabled() {
        let mut config = ServiceConfig::default();
        config.observability.metrics_address = "bogus".into();
        assert!(validate_config(&config).is_ok());

        config.observability.metrics_enabled = true;
        assert!(validate_config(&config).is_err());
    }
}
