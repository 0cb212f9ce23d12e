//! GraphQL adapter.
//!
//! Mounted at `/graphql`. Absence of the target reservation is raised as a
//! GraphQL error, unlike REST's 404 — the transport surfaces it in the
//! `errors` array of the response.

use async_graphql::{Context, EmptySubscription, InputObject, Object, Result, Schema, SimpleObject};
use async_graphql_axum::GraphQL;
use axum::{routing::post_service, Router};
use chrono::NaiveDate;

use crate::adapters::GatewayState;
use crate::domain::{DomainError, NewReservation, Reservation, ReservationPatch, ReservationStats};
use crate::telemetry::Protocol;

pub type GatewaySchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

/// Build the schema with the gateway state in the context.
pub fn schema(state: GatewayState) -> GatewaySchema {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(state)
        .finish()
}

pub fn router(state: GatewayState) -> Router {
    Router::new().route("/graphql", post_service(GraphQL::new(schema(state))))
}

/// GraphQL error translation.
fn to_graphql_error(err: DomainError) -> async_graphql::Error {
    if let DomainError::Storage(_) = &err {
        tracing::error!(error = %err, "GraphQL request failed");
    }
    async_graphql::Error::new(err.to_string())
}

fn reservation_not_found(id: i64) -> async_graphql::Error {
    async_graphql::Error::new(format!("Reservation {id} not found"))
}

#[derive(SimpleObject)]
#[graphql(name = "Reservation")]
pub struct ReservationGql {
    pub id: i64,
    pub date_debut: NaiveDate,
    pub date_fin: NaiveDate,
    pub preferences: String,
    pub client_id: i64,
    pub chambre_id: i64,
}

impl From<Reservation> for ReservationGql {
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

#[derive(SimpleObject)]
#[graphql(name = "ReservationStats")]
pub struct StatsGql {
    pub count: u64,
    pub avg_duration: f64,
}

impl From<ReservationStats> for StatsGql {
    fn from(s: ReservationStats) -> Self {
        Self {
            count: s.count,
            avg_duration: s.avg_duration,
        }
    }
}

/// Input for `updateReservation`; replaces the whole record.
#[derive(InputObject)]
#[graphql(name = "ReservationInput")]
pub struct ReservationInput {
    pub date_debut: NaiveDate,
    pub date_fin: NaiveDate,
    #[graphql(default)]
    pub preferences: String,
    pub client_id: i64,
    pub chambre_id: i64,
}

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    async fn all_reservations(&self, ctx: &Context<'_>) -> Result<Vec<ReservationGql>> {
        let state = ctx.data_unchecked::<GatewayState>();
        let _timer = state.telemetry.observe(Protocol::Graphql, "allReservations");
        let all = state.reservations.list_all().await.map_err(to_graphql_error)?;
        Ok(all.into_iter().map(ReservationGql::from).collect())
    }

    async fn reservation_by_id(&self, ctx: &Context<'_>, id: i64) -> Result<ReservationGql> {
        let state = ctx.data_unchecked::<GatewayState>();
        let _timer = state.telemetry.observe(Protocol::Graphql, "reservationById");
        state
            .reservations
            .get(id)
            .await
            .map_err(to_graphql_error)?
            .map(ReservationGql::from)
            .ok_or_else(|| reservation_not_found(id))
    }

    async fn reservation_stats(&self, ctx: &Context<'_>) -> Result<StatsGql> {
        let state = ctx.data_unchecked::<GatewayState>();
        let _timer = state.telemetry.observe(Protocol::Graphql, "reservationStats");
        let stats = state.reservations.stats(None).await.map_err(to_graphql_error)?;
        Ok(stats.into())
    }

    async fn reservations_by_client_id(
        &self,
        ctx: &Context<'_>,
        client_id: i64,
    ) -> Result<Vec<ReservationGql>> {
        let state = ctx.data_unchecked::<GatewayState>();
        let _timer = state
            .telemetry
            .observe(Protocol::Graphql, "reservationsByClientId");
        let found = state
            .reservations
            .list_by_client(client_id)
            .await
            .map_err(to_graphql_error)?;
        Ok(found.into_iter().map(ReservationGql::from).collect())
    }

    async fn reservations_by_chambre_id(
        &self,
        ctx: &Context<'_>,
        chambre_id: i64,
    ) -> Result<Vec<ReservationGql>> {
        let state = ctx.data_unchecked::<GatewayState>();
        let _timer = state
            .telemetry
            .observe(Protocol::Graphql, "reservationsByChambreId");
        let found = state
            .reservations
            .list_by_chambre(chambre_id)
            .await
            .map_err(to_graphql_error)?;
        Ok(found.into_iter().map(ReservationGql::from).collect())
    }

    /// Count and mean duration of one client's reservations.
    async fn reservation_state(&self, ctx: &Context<'_>, client_id: i64) -> Result<StatsGql> {
        let state = ctx.data_unchecked::<GatewayState>();
        let _timer = state.telemetry.observe(Protocol::Graphql, "reservationState");
        let stats = state
            .reservations
            .stats(Some(client_id))
            .await
            .map_err(to_graphql_error)?;
        Ok(stats.into())
    }
}

pub struct MutationRoot;

#[Object]
impl MutationRoot {
    async fn save_reservation(
        &self,
        ctx: &Context<'_>,
        date_debut: NaiveDate,
        date_fin: NaiveDate,
        client_id: i64,
        chambre_id: i64,
        #[graphql(default)] preferences: String,
    ) -> Result<ReservationGql> {
        let state = ctx.data_unchecked::<GatewayState>();
        let _timer = state.telemetry.observe(Protocol::Graphql, "saveReservation");
        let created = state
            .reservations
            .create(NewReservation {
                date_debut,
                date_fin,
                preferences,
                client_id,
                chambre_id,
            })
            .await
            .map_err(to_graphql_error)?;
        Ok(created.into())
    }

    async fn update_reservation(
        &self,
        ctx: &Context<'_>,
        id: i64,
        reservation: ReservationInput,
    ) -> Result<ReservationGql> {
        let state = ctx.data_unchecked::<GatewayState>();
        let _timer = state.telemetry.observe(Protocol::Graphql, "updateReservation");
        state
            .reservations
            .update(
                id,
                ReservationPatch {
                    date_debut: reservation.date_debut,
                    date_fin: reservation.date_fin,
                    preferences: reservation.preferences,
                    client_id: reservation.client_id,
                    chambre_id: reservation.chambre_id,
                },
            )
            .await
            .map_err(to_graphql_error)?
            .map(ReservationGql::from)
            .ok_or_else(|| reservation_not_found(id))
    }

    async fn delete_reservation(&self, ctx: &Context<'_>, id: i64) -> Result<bool> {
        let state = ctx.data_unchecked::<GatewayState>();
        let _timer = state.telemetry.observe(Protocol::Graphql, "deleteReservation");
        let deleted = state
            .reservations
            .delete(id)
            .await
            .map_err(to_graphql_error)?;
        if !deleted {
            return Err(reservation_not_found(id));
        }
        Ok(true)
    }
}
