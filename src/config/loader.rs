//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::GatewayConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<GatewayConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: GatewayConfig = toml::from_str(&content)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_partial_config() {
        let config: GatewayConfig = toml::from_str(
            r#"
            [http]
            bind_address = "127.0.0.1:9000"

            [telemetry]
            metrics_enabled = false
            "#,
        )
        .unwrap();

        assert_eq!(config.http.bind_address, "127.0.0.1:9000");
        assert!(!config.telemetry.metrics_enabled);
        // Untouched sections keep their defaults.
        assert!(config.grpc.enabled);
        assert_eq!(config.grpc.bind_address, "0.0.0.0:50051");
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_config(Path::new("does_not_exist.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_bad_address_is_validation_error() {
        let path = std::env::temp_dir().join("gateway_bad_address.toml");
        std::fs::write(&path, "[http]\nbind_address = \"nope\"\n").unwrap();

        let err = load_config(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("not a valid socket address"));

        std::fs::remove_file(&path).unwrap_or_default();
    }
}
