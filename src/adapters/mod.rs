//! Protocol adapters.
//!
//! # Data Flow
//! ```text
//!   REST (/api)  ─┐
//!   GraphQL      ─┤
//!   (/graphql)    ├─▶ GatewayState ─▶ domain services ─▶ store
//!   SOAP          │        │
//!   (/ws/...)    ─┤        └─▶ Telemetry (counter + timer per call)
//!   gRPC         ─┘
//! ```
//!
//! # Design Decisions
//! - Each adapter only decodes its wire shape and translates outcomes; the
//!   shared resolve-references-and-delegate logic lives in the domain
//!   services, so it is written once instead of four times.
//! - Each adapter owns one error-translation function mapping `DomainError`
//!   and absent-value results to its protocol's failure signal.

pub mod graphql;
pub mod grpc;
pub mod rest;
pub mod soap;

use std::sync::Arc;

use axum::Router;
use tower_http::trace::TraceLayer;

use crate::domain::{ChambreService, ClientService, ReservationService};
use crate::telemetry::Telemetry;

/// Shared handle injected into every adapter.
#[derive(Clone)]
pub struct GatewayState {
    pub reservations: Arc<ReservationService>,
    pub clients: Arc<ClientService>,
    pub chambres: Arc<ChambreService>,
    pub telemetry: Telemetry,
}

/// Build the HTTP router hosting the REST, GraphQL and SOAP adapters.
pub fn http_router(state: GatewayState) -> Router {
    Router::new()
        .merge(rest::router(state.clone()))
        .merge(soap::router(state.clone()))
        .merge(graphql::router(state))
        .layer(TraceLayer::new_for_http())
}
