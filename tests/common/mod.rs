//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;

use hotel_gateway::adapters::{self, GatewayState};
use hotel_gateway::domain::{ChambreService, ClientService, NewChambre, NewClient, ReservationService};
use hotel_gateway::store::memory::MemoryStore;
use hotel_gateway::telemetry::Telemetry;

/// Build a gateway over a fresh in-memory store.
pub fn gateway_state(telemetry: Telemetry) -> GatewayState {
    let store = Arc::new(MemoryStore::new());
    GatewayState {
        reservations: Arc::new(ReservationService::new(
            store.clone(),
            store.clone(),
            store.clone(),
        )),
        clients: Arc::new(ClientService::new(store.clone())),
        chambres: Arc::new(ChambreService::new(store)),
        telemetry,
    }
}

/// Seed one client and one chambre; returns their ids.
pub async fn seed_references(state: &GatewayState) -> (i64, i64) {
    let client = state
        .clients
        .create(NewClient {
            nom: "Durand".to_string(),
            email: "durand@example.com".to_string(),
        })
        .await
        .unwrap();
    let chambre = state
        .chambres
        .create(NewChambre {
            numero: "101".to_string(),
            prix_par_nuit: 120.0,
        })
        .await
        .unwrap();
    (client.id, chambre.id)
}

/// Serve the HTTP adapters (REST, GraphQL, SOAP) on an ephemeral port.
#[allow(dead_code)]
pub async fn spawn_http(state: GatewayState) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = adapters::http_router(state);
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}
