//! Configuration validation.
//!
//! Semantic checks on top of serde's syntactic ones: addresses must parse,
//! and enabled listeners must not collide. Returns all violations, not just
//! the first.

use std::collections::HashMap;
use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::GatewayConfig;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field}: `{value}` is not a valid socket address")]
    InvalidAddress { field: &'static str, value: String },

    #[error("{first} and {second} are both bound to {address}")]
    AddressCollision {
        first: &'static str,
        second: &'static str,
        address: String,
    },
}

/// Validate a loaded configuration.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let mut bound: HashMap<String, &'static str> = HashMap::new();

    let mut check = |field: &'static str, value: &str, errors: &mut Vec<ValidationError>| {
        if value.parse::<SocketAddr>().is_err() {
            errors.push(ValidationError::InvalidAddress {
                field,
                value: value.to_string(),
            });
            return;
        }
        if let Some(first) = bound.insert(value.to_string(), field) {
            errors.push(ValidationError::AddressCollision {
                first,
                second: field,
                address: value.to_string(),
            });
        }
    };

    check("http.bind_address", &config.http.bind_address, &mut errors);
    if config.grpc.enabled {
        check("grpc.bind_address", &config.grpc.bind_address, &mut errors);
    }
    if config.telemetry.metrics_enabled {
        check(
            "telemetry.metrics_address",
            &config.telemetry.metrics_address,
            &mut errors,
        );
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
