//! Cross-protocol behavior: parity of not-found handling, telemetry
//! discipline, and concurrent creation.

use std::time::Duration;

use tonic::Request;

use hotel_gateway::adapters::graphql;
use hotel_gateway::adapters::grpc::{self, pb};
use hotel_gateway::telemetry::{Protocol, Telemetry};

mod common;

use hotel_gateway::adapters::grpc::pb::reservation_service_server::ReservationService as ReservationRpc;

#[tokio::test]
async fn test_update_missing_id_is_not_found_on_every_protocol() {
    let state = common::gateway_state(Telemetry::disabled());
    let (client_id, chambre_id) = common::seed_references(&state).await;
    let missing_id = 9999;

    // REST
    let addr = common::spawn_http(state.clone()).await;
    let http = reqwest::Client::new();
    let resp = http
        .put(format!("http://{addr}/api/reservations/{missing_id}"))
        .json(&serde_json::json!({
            "dateDebut": "2025-09-10",
            "dateFin": "2025-09-12",
            "clientId": client_id,
            "chambreId": chambre_id,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::NOT_FOUND);

    // GraphQL
    let schema = graphql::schema(state.clone());
    let mutation = format!(
        "mutation {{ updateReservation(id: {missing_id}, reservation: {{ \
           dateDebut: \"2025-09-10\", dateFin: \"2025-09-12\", \
           clientId: {client_id}, chambreId: {chambre_id} }}) {{ id }} }}"
    );
    let response = schema.execute(mutation.as_str()).await;
    assert!(!response.errors.is_empty());
    assert!(response.errors[0].message.contains("not found"));

    // SOAP
    let envelope = format!(
        r#"<soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/">
             <soap:Body>
               <updateReservation>
                 <id>{missing_id}</id>
                 <reservation>
                   <dateDebut>2025-09-10</dateDebut>
                   <dateFin>2025-09-12</dateFin>
                   <clientId>{client_id}</clientId>
                   <chambreId>{chambre_id}</chambreId>
                 </reservation>
               </updateReservation>
             </soap:Body>
           </soap:Envelope>"#
    );
    let resp = http
        .post(format!("http://{addr}/ws/reservations"))
        .header("content-type", "text/xml; charset=utf-8")
        .body(envelope)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::INTERNAL_SERVER_ERROR);
    let body = resp.text().await.unwrap();
    assert!(body.contains("soap:Fault"));
    assert!(body.contains("not found"));

    // gRPC
    let rpc = grpc::ReservationGrpc::new(state.clone());
    let status = rpc
        .update_reservation(Request::new(pb::UpdateReservationRequest {
            id: missing_id,
            date_debut: "2025-09-10".to_string(),
            date_fin: "2025-09-12".to_string(),
            preferences: String::new(),
            client_id,
            chambre_id,
        }))
        .await
        .unwrap_err();
    assert_eq!(status.code(), tonic::Code::NotFound);

    // No partial mutation happened anywhere.
    assert!(state.reservations.list_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_every_call_is_counted_once_regardless_of_outcome() {
    let telemetry = Telemetry::disabled();
    let state = common::gateway_state(telemetry.clone());
    let (client_id, chambre_id) = common::seed_references(&state).await;
    let addr = common::spawn_http(state.clone()).await;
    let http = reqwest::Client::new();

    // REST: one success, one not-found.
    http.get(format!("http://{addr}/api/reservations"))
        .send()
        .await
        .unwrap();
    http.get(format!("http://{addr}/api/reservations/424242"))
        .send()
        .await
        .unwrap();
    assert_eq!(telemetry.request_count(Protocol::Rest, "getAllReservations"), 1);
    assert_eq!(telemetry.request_count(Protocol::Rest, "getReservation"), 1);

    // GraphQL: a failing query still counts.
    let schema = graphql::schema(state.clone());
    let response = schema.execute("{ reservationById(id: 424242) { id } }").await;
    assert!(!response.errors.is_empty());
    assert_eq!(telemetry.request_count(Protocol::Graphql, "reservationById"), 1);

    // SOAP
    let envelope = r#"<Envelope><Body><getAllReservations></getAllReservations></Body></Envelope>"#;
    http.post(format!("http://{addr}/ws/reservations"))
        .body(envelope)
        .send()
        .await
        .unwrap();
    assert_eq!(telemetry.request_count(Protocol::Soap, "getAllReservations"), 1);

    // gRPC: failure path counts too.
    let rpc = grpc::ReservationGrpc::new(state.clone());
    let _ = rpc
        .get_reservation(Request::new(pb::ReservationId { id: 424242 }))
        .await
        .unwrap_err();
    assert_eq!(telemetry.request_count(Protocol::Grpc, "getReservation"), 1);
    assert_eq!(telemetry.sample_count(Protocol::Grpc), 1);

    // One latency sample per protocol call, success or not.
    assert_eq!(telemetry.sample_count(Protocol::Rest), 2);
    assert_eq!(telemetry.sample_count(Protocol::Graphql), 1);
    assert_eq!(telemetry.sample_count(Protocol::Soap), 1);

    // A successful create keeps the discipline.
    let resp = http
        .post(format!("http://{addr}/api/reservations"))
        .json(&serde_json::json!({
            "dateDebut": "2025-08-02",
            "dateFin": "2025-08-05",
            "clientId": client_id,
            "chambreId": chambre_id,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::CREATED);
    assert_eq!(telemetry.request_count(Protocol::Rest, "createReservation"), 1);
    assert_eq!(telemetry.sample_count(Protocol::Rest), 3);
}

#[tokio::test]
async fn test_concurrent_creates_yield_distinct_records_and_intact_log() {
    let log_path = "test_gateway_concurrent.log";
    let _ = std::fs::remove_file(log_path);

    let telemetry = Telemetry::with_log(log_path);
    let state = common::gateway_state(telemetry.clone());
    let (client_id, chambre_id) = common::seed_references(&state).await;
    let addr = common::spawn_http(state.clone()).await;

    let concurrency = 32;
    let mut handles = Vec::new();
    for _ in 0..concurrency {
        let url = format!("http://{addr}/api/reservations");
        handles.push(tokio::spawn(async move {
            let http = reqwest::Client::new();
            let body: serde_json::Value = http
                .post(url)
                .json(&serde_json::json!({
                    "dateDebut": "2025-08-02",
                    "dateFin": "2025-08-05",
                    "clientId": client_id,
                    "chambreId": chambre_id,
                }))
                .send()
                .await
                .unwrap()
                .error_for_status()
                .unwrap()
                .json()
                .await
                .unwrap();
            body["id"].as_i64().unwrap()
        }));
    }

    let mut ids = Vec::new();
    for handle in handles {
        ids.push(handle.await.unwrap());
    }
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), concurrency, "every create produced a distinct id");

    let stored = state.reservations.list_all().await.unwrap();
    assert_eq!(stored.len(), concurrency);
    assert_eq!(
        telemetry.request_count(Protocol::Rest, "createReservation"),
        concurrency as u64
    );

    // Let the writer task drain, then check no line was interleaved.
    tokio::time::sleep(Duration::from_millis(300)).await;
    let contents = std::fs::read_to_string(log_path).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), concurrency);
    for line in lines {
        assert!(
            line.starts_with("Method: createReservation, Latency: ") && line.ends_with(" seconds"),
            "corrupted log line: {line:?}"
        );
    }

    std::fs::remove_file(log_path).unwrap_or_default();
}

#[tokio::test]
async fn test_graphql_stats_queries() {
    let state = common::gateway_state(Telemetry::disabled());
    let (client_id, chambre_id) = common::seed_references(&state).await;
    let schema = graphql::schema(state.clone());

    // Empty set: defined, not an error.
    let response = schema.execute("{ reservationStats { count avgDuration } }").await;
    assert!(response.errors.is_empty());
    let data = response.data.into_json().unwrap();
    assert_eq!(data["reservationStats"]["count"], 0);
    assert_eq!(data["reservationStats"]["avgDuration"], 0.0);

    // Spans of 3 and 1 days → mean 2.0.
    for (from, to) in [("2025-08-02", "2025-08-05"), ("2025-08-10", "2025-08-11")] {
        let mutation = format!(
            "mutation {{ saveReservation(dateDebut: \"{from}\", dateFin: \"{to}\", \
               clientId: {client_id}, chambreId: {chambre_id}, preferences: \"calme\") {{ id }} }}"
        );
        let response = schema.execute(mutation.as_str()).await;
        assert!(response.errors.is_empty(), "{:?}", response.errors);
    }

    let response = schema
        .execute(format!("{{ reservationState(clientId: {client_id}) {{ count avgDuration }} }}").as_str())
        .await;
    assert!(response.errors.is_empty());
    let data = response.data.into_json().unwrap();
    assert_eq!(data["reservationState"]["count"], 2);
    assert_eq!(data["reservationState"]["avgDuration"], 2.0);

    let response = schema
        .execute(format!("{{ reservationsByChambreId(chambreId: {chambre_id}) {{ id }} }}").as_str())
        .await;
    assert!(response.errors.is_empty());
    let data = response.data.into_json().unwrap();
    assert_eq!(data["reservationsByChambreId"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_soap_crud_round_trip() {
    let state = common::gateway_state(Telemetry::disabled());
    let (client_id, chambre_id) = common::seed_references(&state).await;
    let addr = common::spawn_http(state).await;
    let http = reqwest::Client::new();
    let endpoint = format!("http://{addr}/ws/reservations");

    let create = format!(
        r#"<soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/">
             <soap:Body>
               <createReservation>
                 <dateDebut>2025-08-02</dateDebut>
                 <dateFin>2025-08-05</dateFin>
                 <clientId>{client_id}</clientId>
                 <chambreId>{chambre_id}</chambreId>
                 <preference>vue mer</preference>
               </createReservation>
             </soap:Body>
           </soap:Envelope>"#
    );
    let body = http
        .post(&endpoint)
        .body(create)
        .send()
        .await
        .unwrap()
        .error_for_status()
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(body.contains("<createReservationResponse>"));
    assert!(body.contains("<dateDebut>2025-08-02</dateDebut>"));
    assert!(body.contains("<preferences>vue mer</preferences>"));

    // getAll carries the stored record.
    let body = http
        .post(&endpoint)
        .body("<Envelope><Body><getAllReservations><x/></getAllReservations></Body></Envelope>")
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(body.contains("<getAllReservationsResponse>"));
    assert!(body.contains("<id>1</id>"));

    // Delete twice: success then failure, no fault.
    for expected in ["<success>true</success>", "<success>false</success>"] {
        let body = http
            .post(&endpoint)
            .body("<Envelope><Body><deleteReservation><id>1</id></deleteReservation></Body></Envelope>")
            .send()
            .await
            .unwrap()
            .text()
            .await
            .unwrap();
        assert!(body.contains(expected), "expected {expected} in {body}");
    }
}

#[tokio::test]
async fn test_grpc_serve_reports_bind_failure() {
    let state = common::gateway_state(Telemetry::disabled());

    // Occupy a port so the gRPC listener cannot bind it.
    let taken = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = taken.local_addr().unwrap();

    let shutdown = hotel_gateway::Shutdown::new();
    let result = grpc::serve(addr, state, shutdown.subscribe()).await;
    assert!(result.is_err(), "bind conflict must surface as an error");
}

#[tokio::test]
async fn test_grpc_crud_round_trip() {
    let state = common::gateway_state(Telemetry::disabled());
    let (client_id, chambre_id) = common::seed_references(&state).await;
    let rpc = grpc::ReservationGrpc::new(state);

    let created = rpc
        .create_reservation(Request::new(pb::CreateReservationRequest {
            date_debut: "2025-08-02".to_string(),
            date_fin: "2025-08-05".to_string(),
            preferences: "vue mer".to_string(),
            client_id,
            chambre_id,
        }))
        .await
        .unwrap()
        .into_inner();
    assert!(created.id > 0);
    assert_eq!(created.date_debut, "2025-08-02");

    let fetched = rpc
        .get_reservation(Request::new(pb::ReservationId { id: created.id }))
        .await
        .unwrap()
        .into_inner();
    assert_eq!(fetched, created);

    let status = rpc
        .create_reservation(Request::new(pb::CreateReservationRequest {
            date_debut: "not-a-date".to_string(),
            date_fin: "2025-08-05".to_string(),
            preferences: String::new(),
            client_id,
            chambre_id,
        }))
        .await
        .unwrap_err();
    assert_eq!(status.code(), tonic::Code::InvalidArgument);

    let deleted = rpc
        .delete_reservation(Request::new(pb::ReservationId { id: created.id }))
        .await
        .unwrap()
        .into_inner();
    assert!(deleted.success);

    let deleted = rpc
        .delete_reservation(Request::new(pb::ReservationId { id: created.id }))
        .await
        .unwrap()
        .into_inner();
    assert!(!deleted.success);
}
