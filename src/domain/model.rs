//! Domain entities and input shapes.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A booking: a date range for one chambre, held by one client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reservation {
    /// Server-assigned, monotonically increasing identifier.
    pub id: i64,
    pub date_debut: NaiveDate,
    pub date_fin: NaiveDate,
    /// Free-text preference blob (late check-in, floor, ...).
    pub preferences: String,
    pub client_id: i64,
    pub chambre_id: i64,
}

impl Reservation {
    /// Length of the stay in whole days.
    ///
    /// Negative when date_fin precedes date_debut; date ordering is not
    /// enforced anywhere, matching the persisted contract.
    pub fn duration_days(&self) -> i64 {
        (self.date_fin - self.date_debut).num_days()
    }
}

/// Input for creating a reservation. The identifier is assigned by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewReservation {
    pub date_debut: NaiveDate,
    pub date_fin: NaiveDate,
    pub preferences: String,
    pub client_id: i64,
    pub chambre_id: i64,
}

/// Whole-record replacement for an update: dates, preferences and both
/// references are reassigned together on every transport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReservationPatch {
    pub date_debut: NaiveDate,
    pub date_fin: NaiveDate,
    pub preferences: String,
    pub client_id: i64,
    pub chambre_id: i64,
}

/// A hotel guest. Referenced, not owned, by reservations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    pub id: i64,
    pub nom: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewClient {
    pub nom: String,
    pub email: String,
}

/// A room. Its lifecycle is external to the reservation core; it exists here
/// so reservations have something to reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chambre {
    pub id: i64,
    pub numero: String,
    pub prix_par_nuit: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewChambre {
    pub numero: String,
    pub prix_par_nuit: f64,
}

/// Aggregate over a set of reservations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReservationStats {
    pub count: u64,
    /// Arithmetic mean of (date_fin - date_debut) in days; 0.0 when empty.
    pub avg_duration: f64,
}
