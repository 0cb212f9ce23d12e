//! Concurrent in-memory store.
//!
//! Backed by `DashMap`, so every operation is safely callable from the
//! per-request workers of all four transports without extra locking.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;

use crate::domain::{Chambre, Client, NewChambre, NewClient, NewReservation, Reservation};
use crate::store::{ChambreStore, ClientStore, ReservationStore, StoreError};

/// In-memory persistence gateway shared by all adapters.
#[derive(Clone, Default)]
pub struct MemoryStore {
    reservations: Arc<DashMap<i64, Reservation>>,
    clients: Arc<DashMap<i64, Client>>,
    chambres: Arc<DashMap<i64, Chambre>>,
    reservation_seq: Arc<AtomicI64>,
    client_seq: Arc<AtomicI64>,
    chambre_seq: Arc<AtomicI64>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(seq: &AtomicI64) -> i64 {
        seq.fetch_add(1, Ordering::Relaxed) + 1
    }

    fn sorted_by_id<T: Clone>(map: &DashMap<i64, T>) -> Vec<T> {
        let mut entries: Vec<(i64, T)> = map
            .iter()
            .map(|r| (*r.key(), r.value().clone()))
            .collect();
        entries.sort_by_key(|(id, _)| *id);
        entries.into_iter().map(|(_, v)| v).collect()
    }
}

#[async_trait]
impl ReservationStore for MemoryStore {
    async fn insert(&self, reservation: NewReservation) -> Result<Reservation, StoreError> {
        let id = Self::next_id(&self.reservation_seq);
        let stored = Reservation {
            id,
            date_debut: reservation.date_debut,
            date_fin: reservation.date_fin,
            preferences: reservation.preferences,
            client_id: reservation.client_id,
            chambre_id: reservation.chambre_id,
        };
        self.reservations.insert(id, stored.clone());
        Ok(stored)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Reservation>, StoreError> {
        Ok(self.reservations.get(&id).map(|r| r.value().clone()))
    }

    async fn save(&self, reservation: &Reservation) -> Result<(), StoreError> {
        self.reservations
            .insert(reservation.id, reservation.clone());
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        Ok(self.reservations.remove(&id).is_some())
    }

    async fn find_all(&self) -> Result<Vec<Reservation>, StoreError> {
        Ok(Self::sorted_by_id(&self.reservations))
    }

    async fn find_by_client(&self, client_id: i64) -> Result<Vec<Reservation>, StoreError> {
        let mut found: Vec<Reservation> = self
            .reservations
            .iter()
            .filter(|r| r.value().client_id == client_id)
            .map(|r| r.value().clone())
            .collect();
        found.sort_by_key(|r| r.id);
        Ok(found)
    }

    async fn find_by_chambre(&self, chambre_id: i64) -> Result<Vec<Reservation>, StoreError> {
        let mut found: Vec<Reservation> = self
            .reservations
            .iter()
            .filter(|r| r.value().chambre_id == chambre_id)
            .map(|r| r.value().clone())
            .collect();
        found.sort_by_key(|r| r.id);
        Ok(found)
    }
}

#[async_trait]
impl ClientStore for MemoryStore {
    async fn insert(&self, client: NewClient) -> Result<Client, StoreError> {
        let id = Self::next_id(&self.client_seq);
        let stored = Client {
            id,
            nom: client.nom,
            email: client.email,
        };
        self.clients.insert(id, stored.clone());
        Ok(stored)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Client>, StoreError> {
        Ok(self.clients.get(&id).map(|c| c.value().clone()))
    }

    async fn find_all(&self) -> Result<Vec<Client>, StoreError> {
        Ok(Self::sorted_by_id(&self.clients))
    }

    async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        Ok(self.clients.remove(&id).is_some())
    }
}

#[async_trait]
impl ChambreStore for MemoryStore {
    async fn insert(&self, chambre: NewChambre) -> Result<Chambre, StoreError> {
        let id = Self::next_id(&self.chambre_seq);
        let stored = Chambre {
            id,
            numero: chambre.numero,
            prix_par_nuit: chambre.prix_par_nuit,
        };
        self.chambres.insert(id, stored.clone());
        Ok(stored)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Chambre>, StoreError> {
        Ok(self.chambres.get(&id).map(|c| c.value().clone()))
    }

    async fn find_all(&self) -> Result<Vec<Chambre>, StoreError> {
        Ok(Self::sorted_by_id(&self.chambres))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn new_reservation(client_id: i64, chambre_id: i64) -> NewReservation {
        NewReservation {
            date_debut: NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(),
            date_fin: NaiveDate::from_ymd_opt(2025, 7, 4).unwrap(),
            preferences: "vue mer".to_string(),
            client_id,
            chambre_id,
        }
    }

    #[tokio::test]
    async fn test_insert_assigns_monotonic_ids() {
        let store = MemoryStore::new();
        let a = ReservationStore::insert(&store, new_reservation(1, 1))
            .await
            .unwrap();
        let b = ReservationStore::insert(&store, new_reservation(1, 1))
            .await
            .unwrap();
        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
    }

    #[tokio::test]
    async fn test_find_by_relation() {
        let store = MemoryStore::new();
        ReservationStore::insert(&store, new_reservation(1, 7))
            .await
            .unwrap();
        ReservationStore::insert(&store, new_reservation(2, 7))
            .await
            .unwrap();
        ReservationStore::insert(&store, new_reservation(1, 8))
            .await
            .unwrap();

        let by_client = store.find_by_client(1).await.unwrap();
        assert_eq!(by_client.len(), 2);
        let by_chambre = store.find_by_chambre(7).await.unwrap();
        assert_eq!(by_chambre.len(), 2);
    }

    #[tokio::test]
    async fn test_delete_reports_absence() {
        let store = MemoryStore::new();
        let r = ReservationStore::insert(&store, new_reservation(1, 1))
            .await
            .unwrap();
        assert!(ReservationStore::delete(&store, r.id).await.unwrap());
        assert!(!ReservationStore::delete(&store, r.id).await.unwrap());
    }
}
