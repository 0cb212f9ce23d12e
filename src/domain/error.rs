//! Domain error taxonomy.

use thiserror::Error;

use crate::store::StoreError;

/// Errors that can abort a domain operation.
///
/// Absence of the operation's *target* record is not an error (services
/// return `Ok(None)` / `Ok(false)` for that); `NotFound` here means a
/// *referenced* entity was missing during lookup-or-fail resolution.
#[derive(Debug, Error)]
pub enum DomainError {
    /// A referenced client or chambre does not exist.
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    /// Input rejected before touching the store.
    #[error("validation error: {0}")]
    Validation(String),

    /// The persistence gateway failed.
    #[error("storage error: {0}")]
    Storage(String),
}

impl From<StoreError> for DomainError {
    fn from(err: StoreError) -> Self {
        DomainError::Storage(err.to_string())
    }
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
