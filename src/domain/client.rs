//! Client business operations.

use std::sync::Arc;

use crate::domain::{Client, DomainResult, NewClient};
use crate::store::ClientStore;

/// Transport-independent client operations. Clients are created and deleted
/// independently of the reservations that reference them.
pub struct ClientService {
    clients: Arc<dyn ClientStore>,
}

impl ClientService {
    pub fn new(clients: Arc<dyn ClientStore>) -> Self {
        Self { clients }
    }

    pub async fn create(&self, new: NewClient) -> DomainResult<Client> {
        let stored = self.clients.insert(new).await?;
        tracing::debug!(id = stored.id, "client created");
        Ok(stored)
    }

    pub async fn get(&self, id: i64) -> DomainResult<Option<Client>> {
        Ok(self.clients.find_by_id(id).await?)
    }

    pub async fn list_all(&self) -> DomainResult<Vec<Client>> {
        Ok(self.clients.find_all().await?)
    }

    /// `Ok(false)` when the client was already absent.
    pub async fn delete(&self, id: i64) -> DomainResult<bool> {
        Ok(self.clients.delete(id).await?)
    }
}
