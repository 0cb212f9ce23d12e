//! Hotel Reservation Gateway
//!
//! Four protocol front ends over one reservation core.
//!
//! # Architecture Overview
//!
//! ```text
//!   REST /api ───────┐
//!   GraphQL /graphql ┤   ┌────────────────┐    ┌──────────────┐
//!   SOAP /ws/...  ───┼──▶│ domain services│───▶│ memory store │
//!   gRPC :50051 ─────┘   └───────┬────────┘    └──────────────┘
//!                                │
//!                        ┌───────▼────────┐
//!                        │   telemetry    │──▶ Prometheus scrape
//!                        │ counter/timer  │──▶ latency log file
//!                        └────────────────┘
//! ```

use std::path::Path;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use hotel_gateway::adapters::{self, GatewayState};
use hotel_gateway::config::{load_config, GatewayConfig};
use hotel_gateway::domain::{ChambreService, ClientService, ReservationService};
use hotel_gateway::lifecycle::{shutdown, Shutdown};
use hotel_gateway::store::memory::MemoryStore;
use hotel_gateway::telemetry::Telemetry;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hotel_gateway=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("hotel-gateway v{} starting", env!("CARGO_PKG_VERSION"));

    // Load configuration; defaults when no file is given.
    let config = match std::env::args().nth(1) {
        Some(path) => load_config(Path::new(&path))?,
        None => GatewayConfig::default(),
    };

    tracing::info!(
        http_address = %config.http.bind_address,
        grpc_enabled = config.grpc.enabled,
        grpc_address = %config.grpc.bind_address,
        metrics_enabled = config.telemetry.metrics_enabled,
        "Configuration loaded"
    );

    let telemetry = Telemetry::new(&config.telemetry)?;

    let store = Arc::new(MemoryStore::new());
    let state = GatewayState {
        reservations: Arc::new(ReservationService::new(
            store.clone(),
            store.clone(),
            store.clone(),
        )),
        clients: Arc::new(ClientService::new(store.clone())),
        chambres: Arc::new(ChambreService::new(store)),
        telemetry,
    };

    let coordinator = Shutdown::new();
    coordinator.trigger_on_signals();

    // gRPC transport on its own listener.
    let mut grpc_task = None;
    if config.grpc.enabled {
        let addr = config.grpc.bind_address.parse()?;
        let rx = coordinator.subscribe();
        let grpc_state = state.clone();
        tracing::info!(address = %addr, "gRPC server starting");
        grpc_task = Some(tokio::spawn(async move {
            let result = adapters::grpc::serve(addr, grpc_state, rx).await;
            // Logged here so a bind failure is visible immediately, not
            // only once the HTTP server has exited.
            if let Err(error) = &result {
                tracing::error!(%error, "gRPC server failed");
            }
            result
        }));
    }

    // REST + GraphQL + SOAP share the HTTP listener.
    let listener = TcpListener::bind(&config.http.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "HTTP server starting");

    let app = adapters::http_router(state);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown::wait(coordinator.subscribe()))
        .await?;

    if let Some(task) = grpc_task {
        task.await??;
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
