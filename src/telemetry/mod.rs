//! Telemetry sidecar.
//!
//! # Data Flow
//! ```text
//! adapter handler
//!     → Telemetry::observe(protocol, operation)
//!         → request counter incremented immediately
//!     → RequestTimer dropped on every exit path
//!         → latency histogram sample
//!         → one line to the latency log (single writer task)
//! ```
//!
//! # Design Decisions
//! - One `Telemetry` handle is built at startup and cloned into every
//!   adapter; there is no global mutable registry.
//! - Counters and histograms go through the `metrics` facade so the
//!   Prometheus exporter can scrape them; the handle also keeps its own
//!   atomic counts for introspection.
//! - Log writes are serialized through an mpsc channel to one writer task;
//!   a write failure is logged and swallowed, never returned to the caller.

pub mod latency_log;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use dashmap::DashMap;
use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use thiserror::Error;

use crate::config::TelemetryConfig;
use crate::telemetry::latency_log::LatencyLog;

/// Transport a request arrived on; used as the metric label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Protocol {
    Rest,
    Graphql,
    Soap,
    Grpc,
}

impl Protocol {
    pub fn as_str(self) -> &'static str {
        match self {
            Protocol::Rest => "rest",
            Protocol::Graphql => "graphql",
            Protocol::Soap => "soap",
            Protocol::Grpc => "grpc",
        }
    }
}

/// Errors raised while bringing telemetry up at startup.
#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("invalid metrics address {0}: {1}")]
    InvalidAddress(String, std::net::AddrParseError),

    #[error("failed to install Prometheus exporter: {0}")]
    Exporter(String),
}

/// Process-wide telemetry handle. Cheap to clone; all clones share state.
#[derive(Clone, Default)]
pub struct Telemetry {
    requests: Arc<DashMap<(&'static str, &'static str), u64>>,
    samples: Arc<DashMap<&'static str, u64>>,
    log: Option<LatencyLog>,
}

impl Telemetry {
    /// Build the handle from config: install the Prometheus exporter when
    /// metrics are enabled and spawn the latency-log writer when a path is
    /// configured. Must run inside a Tokio runtime.
    pub fn new(config: &TelemetryConfig) -> Result<Self, TelemetryError> {
        if config.metrics_enabled {
            let addr: SocketAddr = config
                .metrics_address
                .parse()
                .map_err(|e| TelemetryError::InvalidAddress(config.metrics_address.clone(), e))?;
            PrometheusBuilder::new()
                .with_http_listener(addr)
                .install()
                .map_err(|e| TelemetryError::Exporter(e.to_string()))?;
            tracing::info!(address = %addr, "Prometheus exporter listening");
        }

        let log = config
            .latency_log_path
            .as_ref()
            .map(|path| LatencyLog::spawn(path.clone().into()));

        Ok(Self {
            requests: Arc::new(DashMap::new()),
            samples: Arc::new(DashMap::new()),
            log,
        })
    }

    /// Handle with no exporter and no log file, for tests and disabled runs.
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Handle without an exporter but with a latency log, for tests that
    /// assert on log output.
    pub fn with_log(path: impl Into<std::path::PathBuf>) -> Self {
        Self {
            requests: Arc::new(DashMap::new()),
            samples: Arc::new(DashMap::new()),
            log: Some(LatencyLog::spawn(path.into())),
        }
    }

    /// Record one inbound call. Increments the request counter now and
    /// returns a timer whose drop records the latency sample and log line
    /// on every exit path.
    pub fn observe(&self, protocol: Protocol, operation: &'static str) -> RequestTimer {
        counter!(
            "gateway_requests_total",
            "protocol" => protocol.as_str(),
            "operation" => operation
        )
        .increment(1);
        *self
            .requests
            .entry((protocol.as_str(), operation))
            .or_insert(0) += 1;

        RequestTimer {
            telemetry: self.clone(),
            protocol,
            operation,
            start: Instant::now(),
        }
    }

    /// How many calls were counted for one operation.
    pub fn request_count(&self, protocol: Protocol, operation: &'static str) -> u64 {
        self.requests
            .get(&(protocol.as_str(), operation))
            .map(|c| *c)
            .unwrap_or(0)
    }

    /// How many latency samples were recorded for one protocol.
    pub fn sample_count(&self, protocol: Protocol) -> u64 {
        self.samples
            .get(protocol.as_str())
            .map(|c| *c)
            .unwrap_or(0)
    }

    fn record_duration(&self, protocol: Protocol, operation: &'static str, seconds: f64) {
        histogram!(
            "gateway_request_duration_seconds",
            "protocol" => protocol.as_str()
        )
        .record(seconds);
        *self.samples.entry(protocol.as_str()).or_insert(0) += 1;
        if let Some(log) = &self.log {
            log.append(operation, seconds);
        }
    }
}

/// Scoped latency timer. Dropping it records exactly one sample, whether the
/// wrapped operation succeeded or failed.
pub struct RequestTimer {
    telemetry: Telemetry,
    protocol: Protocol,
    operation: &'static str,
    start: Instant,
}

impl Drop for RequestTimer {
    fn drop(&mut self) {
        let seconds = self.start.elapsed().as_secs_f64();
        self.telemetry
            .record_duration(self.protocol, self.operation, seconds);
    }
}
