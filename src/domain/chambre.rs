//! Chambre operations.
//!
//! Rooms are referenced by reservations; only the create/list surface needed
//! to make references resolvable is exposed here.

use std::sync::Arc;

use crate::domain::{Chambre, DomainResult, NewChambre};
use crate::store::ChambreStore;

pub struct ChambreService {
    chambres: Arc<dyn ChambreStore>,
}

impl ChambreService {
    pub fn new(chambres: Arc<dyn ChambreStore>) -> Self {
        Self { chambres }
    }

    pub async fn create(&self, new: NewChambre) -> DomainResult<Chambre> {
        let stored = self.chambres.insert(new).await?;
        tracing::debug!(id = stored.id, "chambre created");
        Ok(stored)
    }

    pub async fn get(&self, id: i64) -> DomainResult<Option<Chambre>> {
        Ok(self.chambres.find_by_id(id).await?)
    }

    pub async fn list_all(&self) -> DomainResult<Vec<Chambre>> {
        Ok(self.chambres.find_all().await?)
    }
}
