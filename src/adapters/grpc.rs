//! gRPC adapter.
//!
//! Tonic service generated from `proto/reservation.proto`. Dates travel as
//! ISO-8601 strings; absence of the target reservation is a
//! `Status::not_found`, bad dates are `Status::invalid_argument`.

use chrono::NaiveDate;
use tonic::{Request, Response, Status};

use crate::adapters::GatewayState;
use crate::domain::{DomainError, NewReservation, Reservation, ReservationPatch};
use crate::telemetry::Protocol;

pub mod pb {
    tonic::include_proto!("reservation.v1");
}

use pb::reservation_service_server::{
    ReservationService as ReservationRpc, ReservationServiceServer,
};

/// The gRPC front end over the shared gateway state.
pub struct ReservationGrpc {
    state: GatewayState,
}

impl ReservationGrpc {
    pub fn new(state: GatewayState) -> Self {
        Self { state }
    }
}

/// Build the tonic service ready for `Server::add_service`.
pub fn service(state: GatewayState) -> ReservationServiceServer<ReservationGrpc> {
    ReservationServiceServer::new(ReservationGrpc::new(state))
}

/// Serve the gRPC transport until the shutdown signal fires.
///
/// Bind failures (the address already taken by another process, for
/// instance) surface here as soon as they happen, not at shutdown.
pub async fn serve(
    addr: std::net::SocketAddr,
    state: GatewayState,
    shutdown: tokio::sync::broadcast::Receiver<()>,
) -> Result<(), tonic::transport::Error> {
    tonic::transport::Server::builder()
        .add_service(service(state))
        .serve_with_shutdown(addr, crate::lifecycle::shutdown::wait(shutdown))
        .await
}

/// gRPC error translation.
fn to_status(err: DomainError) -> Status {
    match &err {
        DomainError::NotFound { .. } => Status::not_found(err.to_string()),
        DomainError::Validation(_) => Status::invalid_argument(err.to_string()),
        DomainError::Storage(_) => {
            tracing::error!(error = %err, "gRPC request failed");
            Status::internal(err.to_string())
        }
    }
}

fn parse_date(field: &str, value: &str) -> Result<NaiveDate, Status> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        Status::invalid_argument(format!("{field}: expected YYYY-MM-DD, got `{value}`"))
    })
}

fn to_response(r: Reservation) -> pb::ReservationResponse {
    pb::ReservationResponse {
        id: r.id,
        date_debut: r.date_debut.to_string(),
        date_fin: r.date_fin.to_string(),
        preferences: r.preferences,
        client_id: r.client_id,
        chambre_id: r.chambre_id,
    }
}

#[tonic::async_trait]
impl ReservationRpc for ReservationGrpc {
    async fn get_all_reservations(
        &self,
        _request: Request<pb::Empty>,
    ) -> Result<Response<pb::ReservationList>, Status> {
        let _timer = self
            .state
            .telemetry
            .observe(Protocol::Grpc, "getAllReservations");
        let all = self
            .state
            .reservations
            .list_all()
            .await
            .map_err(to_status)?;
        Ok(Response::new(pb::ReservationList {
            reservations: all.into_iter().map(to_response).collect(),
        }))
    }

    async fn get_reservation(
        &self,
        request: Request<pb::ReservationId>,
    ) -> Result<Response<pb::ReservationResponse>, Status> {
        let _timer = self.state.telemetry.observe(Protocol::Grpc, "getReservation");
        let id = request.into_inner().id;
        let reservation = self
            .state
            .reservations
            .get(id)
            .await
            .map_err(to_status)?
            .ok_or_else(|| Status::not_found(format!("Reservation {id} not found")))?;
        Ok(Response::new(to_response(reservation)))
    }

    async fn create_reservation(
        &self,
        request: Request<pb::CreateReservationRequest>,
    ) -> Result<Response<pb::ReservationResponse>, Status> {
        let _timer = self
            .state
            .telemetry
            .observe(Protocol::Grpc, "createReservation");
        let req = request.into_inner();
        let new = NewReservation {
            date_debut: parse_date("date_debut", &req.date_debut)?,
            date_fin: parse_date("date_fin", &req.date_fin)?,
            preferences: req.preferences,
            client_id: req.client_id,
            chambre_id: req.chambre_id,
        };
        let created = self
            .state
            .reservations
            .create(new)
            .await
            .map_err(to_status)?;
        Ok(Response::new(to_response(created)))
    }

    async fn update_reservation(
        &self,
        request: Request<pb::UpdateReservationRequest>,
    ) -> Result<Response<pb::ReservationResponse>, Status> {
        let _timer = self
            .state
            .telemetry
            .observe(Protocol::Grpc, "updateReservation");
        let req = request.into_inner();
        let patch = ReservationPatch {
            date_debut: parse_date("date_debut", &req.date_debut)?,
            date_fin: parse_date("date_fin", &req.date_fin)?,
            preferences: req.preferences,
            client_id: req.client_id,
            chambre_id: req.chambre_id,
        };
        let updated = self
            .state
            .reservations
            .update(req.id, patch)
            .await
            .map_err(to_status)?
            .ok_or_else(|| Status::not_found(format!("Reservation {} not found", req.id)))?;
        Ok(Response::new(to_response(updated)))
    }

    async fn delete_reservation(
        &self,
        request: Request<pb::ReservationId>,
    ) -> Result<Response<pb::DeleteResponse>, Status> {
        let _timer = self
            .state
            .telemetry
            .observe(Protocol::Grpc, "deleteReservation");
        let success = self
            .state
            .reservations
            .delete(request.into_inner().id)
            .await
            .map_err(to_status)?;
        Ok(Response::new(pb::DeleteResponse { success }))
    }
}
