//! Reservation domain subsystem.
//!
//! # Data Flow
//! ```text
//! protocol adapter (REST/GraphQL/SOAP/gRPC)
//!     → ReservationService / ClientService (business operations)
//!     → store traits (persistence gateway)
//!
//! Results flow back as DomainResult:
//!     Ok(value)            → encoded by the adapter
//!     Ok(None) / Ok(false) → "not found", translated per protocol
//!     Err(DomainError)     → translated per protocol (404 / fault / Status)
//! ```
//!
//! # Design Decisions
//! - Foreign-key resolution (client, chambre) lives here, not in the four
//!   adapters, so the lookup-or-fail rule is written once.
//! - Absence of the *target* record is a value (`None`/`false`), never an
//!   error; absence of a *referenced* record is `DomainError::NotFound`.
//! - Update replaces dates, preferences and both references as one contract
//!   shared by every transport.

pub mod chambre;
pub mod client;
pub mod error;
pub mod model;
pub mod reservation;

pub use chambre::ChambreService;
pub use client::ClientService;
pub use error::{DomainError, DomainResult};
pub use reservation::ReservationService;
pub use model::{
    Chambre, Client, NewChambre, NewClient, NewReservation, Reservation, ReservationPatch,
    ReservationStats,
};
