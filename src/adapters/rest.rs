//! REST adapter.
//!
//! JSON over `/api/reservations`, `/api/clients` and `/api/chambres`.
//! Absence is an HTTP 404; creation answers 201, deletion 204.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::adapters::GatewayState;
use crate::domain::{
    Chambre, Client, DomainError, NewChambre, NewClient, NewReservation, Reservation,
    ReservationPatch,
};
use crate::telemetry::Protocol;

pub fn router(state: GatewayState) -> Router {
    Router::new()
        .route(
            "/api/reservations",
            post(create_reservation).get(list_reservations),
        )
        .route(
            "/api/reservations/{id}",
            get(get_reservation)
                .put(update_reservation)
                .delete(delete_reservation),
        )
        .route("/api/clients", post(create_client).get(list_clients))
        .route("/api/clients/{id}", get(get_client).delete(delete_client))
        .route("/api/chambres", post(create_chambre).get(list_chambres))
        .with_state(state)
}

/// Wire shape of a reservation, camelCase like the JSON surface.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationDto {
    pub id: i64,
    pub date_debut: NaiveDate,
    pub date_fin: NaiveDate,
    pub preferences: String,
    pub client_id: i64,
    pub chambre_id: i64,
}

impl From<Reservation> for ReservationDto {
    fn from(r: Reservation) -> Self {
        Self {
            id: r.id,
            date_debut: r.date_debut,
            date_fin: r.date_fin,
            preferences: r.preferences,
            client_id: r.client_id,
            chambre_id: r.chambre_id,
        }
    }
}

/// Request body for create and update; the id comes from the path.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationBody {
    pub date_debut: NaiveDate,
    pub date_fin: NaiveDate,
    #[serde(default)]
    pub preferences: String,
    pub client_id: i64,
    pub chambre_id: i64,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientDto {
    pub id: i64,
    pub nom: String,
    pub email: String,
}

impl From<Client> for ClientDto {
    fn from(c: Client) -> Self {
        Self {
            id: c.id,
            nom: c.nom,
            email: c.email,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChambreDto {
    pub id: i64,
    pub numero: String,
    pub prix_par_nuit: f64,
}

impl From<Chambre> for ChambreDto {
    fn from(c: Chambre) -> Self {
        Self {
            id: c.id,
            numero: c.numero,
            prix_par_nuit: c.prix_par_nuit,
        }
    }
}

/// REST error translation: DomainError → status code + plain-text body.
fn error_response(err: DomainError) -> Response {
    let status = match &err {
        DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
        DomainError::Validation(_) => StatusCode::BAD_REQUEST,
        DomainError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status == StatusCode::INTERNAL_SERVER_ERROR {
        tracing::error!(error = %err, "REST request failed");
    }
    (status, err.to_string()).into_response()
}

async fn create_reservation(
    State(state): State<GatewayState>,
    Json(body): Json<ReservationBody>,
) -> Response {
    let _timer = state.telemetry.observe(Protocol::Rest, "createReservation");
    let new = NewReservation {
        date_debut: body.date_debut,
        date_fin: body.date_fin,
        preferences: body.preferences,
        client_id: body.client_id,
        chambre_id: body.chambre_id,
    };
    match state.reservations.create(new).await {
        Ok(created) => (StatusCode::CREATED, Json(ReservationDto::from(created))).into_response(),
        Err(err) => error_response(err),
    }
}

async fn get_reservation(State(state): State<GatewayState>, Path(id): Path<i64>) -> Response {
    let _timer = state.telemetry.observe(Protocol::Rest, "getReservation");
    match state.reservations.get(id).await {
        Ok(Some(r)) => Json(ReservationDto::from(r)).into_response(),
        Ok(None) => StatusCode::NOT_FOUND.into_response(),
        Err(err) => error_response(err),
    }
}

async fn update_reservation(
    State(state): State<GatewayState>,
    Path(id): Path<i64>,
    Json(body): Json<ReservationBody>,
) -> Response {
    let _timer = state.telemetry.observe(Protocol::Rest, "updateReservation");
    let patch = ReservationPatch {
        date_debut: body.date_debut,
        date_fin: body.date_fin,
        preferences: body.preferences,
        client_id: body.client_id,
        chambre_id: body.chambre_id,
    };
    match state.reservations.update(id, patch).await {
        Ok(Some(r)) => Json(ReservationDto::from(r)).into_response(),
        Ok(None) => StatusCode::NOT_FOUND.into_response(),
        Err(err) => error_response(err),
    }
}

async fn delete_reservation(State(state): State<GatewayState>, Path(id): Path<i64>) -> Response {
    let _timer = state.telemetry.observe(Protocol::Rest, "deleteReservation");
    match state.reservations.delete(id).await {
        Ok(true) => StatusCode::NO_CONTENT.into_response(),
        Ok(false) => StatusCode::NOT_FOUND.into_response(),
        Err(err) => error_response(err),
    }
}

async fn list_reservations(State(state): State<GatewayState>) -> Response {
    let _timer = state.telemetry.observe(Protocol::Rest, "getAllReservations");
    match state.reservations.list_all().await {
        Ok(all) => Json(
            all.into_iter()
                .map(ReservationDto::from)
                .collect::<Vec<_>>(),
        )
        .into_response(),
        Err(err) => error_response(err),
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientBody {
    pub nom: String,
    #[serde(default)]
    pub email: String,
}

async fn create_client(
    State(state): State<GatewayState>,
    Json(body): Json<ClientBody>,
) -> Response {
    let _timer = state.telemetry.observe(Protocol::Rest, "createClient");
    let new = NewClient {
        nom: body.nom,
        email: body.email,
    };
    match state.clients.create(new).await {
        Ok(created) => (StatusCode::CREATED, Json(ClientDto::from(created))).into_response(),
        Err(err) => error_response(err),
    }
}

async fn list_clients(State(state): State<GatewayState>) -> Response {
    let _timer = state.telemetry.observe(Protocol::Rest, "getAllClients");
    match state.clients.list_all().await {
        Ok(all) => Json(all.into_iter().map(ClientDto::from).collect::<Vec<_>>()).into_response(),
        Err(err) => error_response(err),
    }
}

async fn get_client(State(state): State<GatewayState>, Path(id): Path<i64>) -> Response {
    let _timer = state.telemetry.observe(Protocol::Rest, "getClient");
    match state.clients.get(id).await {
        Ok(Some(c)) => Json(ClientDto::from(c)).into_response(),
        Ok(None) => StatusCode::NOT_FOUND.into_response(),
        Err(err) => error_response(err),
    }
}

async fn delete_client(State(state): State<GatewayState>, Path(id): Path<i64>) -> Response {
    let _timer = state.telemetry.observe(Protocol::Rest, "deleteClient");
    match state.clients.delete(id).await {
        Ok(true) => StatusCode::NO_CONTENT.into_response(),
        Ok(false) => StatusCode::NOT_FOUND.into_response(),
        Err(err) => error_response(err),
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChambreBody {
    pub numero: String,
    #[serde(default)]
    pub prix_par_nuit: f64,
}

async fn create_chambre(
    State(state): State<GatewayState>,
    Json(body): Json<ChambreBody>,
) -> Response {
    let _timer = state.telemetry.observe(Protocol::Rest, "createChambre");
    let new = NewChambre {
        numero: body.numero,
        prix_par_nuit: body.prix_par_nuit,
    };
    match state.chambres.create(new).await {
        Ok(created) => (StatusCode::CREATED, Json(ChambreDto::from(created))).into_response(),
        Err(err) => error_response(err),
    }
}

async fn list_chambres(State(state): State<GatewayState>) -> Response {
    let _timer = state.telemetry.observe(Protocol::Rest, "getAllChambres");
    match state.chambres.list_all().await {
        Ok(all) => Json(all.into_iter().map(ChambreDto::from).collect::<Vec<_>>()).into_response(),
        Err(err) => error_response(err),
    }
}
