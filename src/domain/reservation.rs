//! Reservation business operations.

use std::sync::Arc;

use crate::domain::{
    DomainError, DomainResult, NewReservation, Reservation, ReservationPatch, ReservationStats,
};
use crate::store::{ChambreStore, ClientStore, ReservationStore};

/// Transport-independent reservation operations.
///
/// All four protocol adapters delegate here; this is the single place where
/// client and chambre references are resolved (lookup-or-fail) before any
/// write touches the store.
pub struct ReservationService {
    reservations: Arc<dyn ReservationStore>,
    clients: Arc<dyn ClientStore>,
    chambres: Arc<dyn ChambreStore>,
}

impl ReservationService {
    pub fn new(
        reservations: Arc<dyn ReservationStore>,
        clients: Arc<dyn ClientStore>,
        chambres: Arc<dyn ChambreStore>,
    ) -> Self {
        Self {
            reservations,
            clients,
            chambres,
        }
    }

    /// Fail if either referenced entity is absent. Runs before every write,
    /// so a rejected reference never leaves a partial mutation behind.
    async fn resolve_references(&self, client_id: i64, chambre_id: i64) -> DomainResult<()> {
        if self.clients.find_by_id(client_id).await?.is_none() {
            return Err(DomainError::NotFound {
                entity: "client",
                id: client_id,
            });
        }
        if self.chambres.find_by_id(chambre_id).await?.is_none() {
            return Err(DomainError::NotFound {
                entity: "chambre",
                id: chambre_id,
            });
        }
        Ok(())
    }

    /// Persist a new reservation and return it with its assigned id.
    ///
    /// Date ordering and room availability are deliberately not checked;
    /// the persisted contract allows overlapping and inverted ranges.
    pub async fn create(&self, new: NewReservation) -> DomainResult<Reservation> {
        self.resolve_references(new.client_id, new.chambre_id)
            .await?;
        let stored = self.reservations.insert(new).await?;
        tracing::debug!(id = stored.id, "reservation created");
        Ok(stored)
    }

    /// `Ok(None)` when the reservation does not exist.
    pub async fn get(&self, id: i64) -> DomainResult<Option<Reservation>> {
        Ok(self.reservations.find_by_id(id).await?)
    }

    /// Whole-record replace: dates, preferences and both references.
    ///
    /// `Ok(None)` when the target reservation is absent. References are
    /// re-validated before the record is touched.
    pub async fn update(
        &self,
        id: i64,
        patch: ReservationPatch,
    ) -> DomainResult<Option<Reservation>> {
        let Some(mut existing) = self.reservations.find_by_id(id).await? else {
            return Ok(None);
        };
        self.resolve_references(patch.client_id, patch.chambre_id)
            .await?;

        existing.date_debut = patch.date_debut;
        existing.date_fin = patch.date_fin;
        existing.preferences = patch.preferences;
        existing.client_id = patch.client_id;
        existing.chambre_id = patch.chambre_id;
        self.reservations.save(&existing).await?;
        tracing::debug!(id, "reservation updated");
        Ok(Some(existing))
    }

    /// `Ok(false)` when the reservation was already absent; a repeated
    /// delete is a failure outcome, not an error.
    pub async fn delete(&self, id: i64) -> DomainResult<bool> {
        let deleted = self.reservations.delete(id).await?;
        if deleted {
            tracing::debug!(id, "reservation deleted");
        }
        Ok(deleted)
    }

    /// Every reservation, ordered by id. Unpaginated by contract.
    pub async fn list_all(&self) -> DomainResult<Vec<Reservation>> {
        Ok(self.reservations.find_all().await?)
    }

    pub async fn list_by_client(&self, client_id: i64) -> DomainResult<Vec<Reservation>> {
        if self.clients.find_by_id(client_id).await?.is_none() {
            return Err(DomainError::NotFound {
                entity: "client",
                id: client_id,
            });
        }
        Ok(self.reservations.find_by_client(client_id).await?)
    }

    pub async fn list_by_chambre(&self, chambre_id: i64) -> DomainResult<Vec<Reservation>> {
        if self.chambres.find_by_id(chambre_id).await?.is_none() {
            return Err(DomainError::NotFound {
                entity: "chambre",
                id: chambre_id,
            });
        }
        Ok(self.reservations.find_by_chambre(chambre_id).await?)
    }

    /// Mean stay length in days over all reservations, or over one client's
    /// reservations. 0.0 over the empty set.
    pub async fn average_duration(&self, client_id: Option<i64>) -> DomainResult<f64> {
        let stats = self.stats(client_id).await?;
        Ok(stats.avg_duration)
    }

    /// Count plus mean duration, with the same optional client filter.
    pub async fn stats(&self, client_id: Option<i64>) -> DomainResult<ReservationStats> {
        let reservations = match client_id {
            Some(id) => self.list_by_client(id).await?,
            None => self.list_all().await?,
        };
        if reservations.is_empty() {
            return Ok(ReservationStats {
                count: 0,
                avg_duration: 0.0,
            });
        }
        let total: i64 = reservations.iter().map(Reservation::duration_days).sum();
        Ok(ReservationStats {
            count: reservations.len() as u64,
            avg_duration: total as f64 / reservations.len() as f64,
        })
    }
}
