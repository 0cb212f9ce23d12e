//! Persistence gateway.
//!
//! # Design Decisions
//! - "Not found" is `Option::None` at this boundary, never an error; only
//!   backend failures surface as `StoreError`.
//! - The traits are the seam for a relational implementation; the in-memory
//!   store is the one shipped here, with the storage engine itself treated
//!   as an external collaborator.
//! - Identifiers are assigned by the store (one monotonic sequence per
//!   entity), mirroring a database identity column.

pub mod memory;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{Chambre, Client, NewChambre, NewClient, NewReservation, Reservation};

/// Errors raised by a store backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing engine rejected or failed the operation.
    #[error("store backend error: {0}")]
    Backend(String),
}

/// CRUD + find-by-relation over reservations.
#[async_trait]
pub trait ReservationStore: Send + Sync {
    /// Persist a new reservation and return it with its assigned id.
    async fn insert(&self, reservation: NewReservation) -> Result<Reservation, StoreError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Reservation>, StoreError>;

    /// Overwrite an existing record in place.
    async fn save(&self, reservation: &Reservation) -> Result<(), StoreError>;

    /// Remove a record; false when it was already absent.
    async fn delete(&self, id: i64) -> Result<bool, StoreError>;

    /// Every record, ordered by id. Unpaginated by contract.
    async fn find_all(&self) -> Result<Vec<Reservation>, StoreError>;

    async fn find_by_client(&self, client_id: i64) -> Result<Vec<Reservation>, StoreError>;

    async fn find_by_chambre(&self, chambre_id: i64) -> Result<Vec<Reservation>, StoreError>;
}

/// CRUD over clients.
#[async_trait]
pub trait ClientStore: Send + Sync {
    async fn insert(&self, client: NewClient) -> Result<Client, StoreError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Client>, StoreError>;

    async fn find_all(&self) -> Result<Vec<Client>, StoreError>;

    async fn delete(&self, id: i64) -> Result<bool, StoreError>;
}

/// Create/read over chambres; rooms are referenced by reservations but their
/// broader lifecycle is out of scope.
#[async_trait]
pub trait ChambreStore: Send + Sync {
    async fn insert(&self, chambre: NewChambre) -> Result<Chambre, StoreError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Chambre>, StoreError>;

    async fn find_all(&self) -> Result<Vec<Chambre>, StoreError>;
}
