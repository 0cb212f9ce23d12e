//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the reservation gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// HTTP listener hosting the REST, GraphQL and SOAP adapters.
    pub http: HttpConfig,

    /// gRPC listener settings.
    pub grpc: GrpcConfig,

    /// Telemetry settings (Prometheus exporter, latency log).
    pub telemetry: TelemetryConfig,
}

/// HTTP listener configuration. REST (`/api`), GraphQL (`/graphql`) and
/// SOAP (`/ws/reservations`) share this listener.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// gRPC listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GrpcConfig {
    /// Whether to start the gRPC transport at all.
    pub enabled: bool,

    /// Bind address (e.g., "0.0.0.0:50051").
    pub bind_address: String,
}

impl Default for GrpcConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            bind_address: "0.0.0.0:50051".to_string(),
        }
    }
}

/// Telemetry configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Expose counters/histograms for Prometheus scraping.
    pub metrics_enabled: bool,

    /// Bind address of the scrape endpoint.
    pub metrics_address: String,

    /// Append-only latency log; `None` disables file logging.
    pub latency_log_path: Option<String>,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            metrics_enabled: true,
            metrics_address: "0.0.0.0:9090".to_string(),
            latency_log_path: Some("gateway_latency.log".to_string()),
        }
    }
}
