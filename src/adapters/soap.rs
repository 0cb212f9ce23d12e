//! SOAP adapter.
//!
//! A single service published at `/ws/reservations`, speaking SOAP 1.1
//! envelopes. Requests are parsed with a namespace-tolerant event reader
//! (operation and parameters matched by local name, whatever the prefix),
//! responses are rendered with escaped text content. Failures become
//! `soap:Fault` envelopes: `soap:Client` for malformed requests,
//! `soap:Server` for missing entities and storage errors.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use chrono::NaiveDate;
use quick_xml::escape::escape;
use quick_xml::events::Event;
use quick_xml::Reader;
use thiserror::Error;

use crate::adapters::GatewayState;
use crate::domain::{DomainError, NewReservation, Reservation, ReservationPatch};
use crate::telemetry::Protocol;

const SOAP_NS: &str = "http://schemas.xmlsoap.org/soap/envelope/";

pub fn router(state: GatewayState) -> Router {
    Router::new()
        .route("/ws/reservations", post(handle_soap))
        .with_state(state)
}

#[derive(Debug, Error, PartialEq)]
pub enum SoapError {
    #[error("malformed SOAP request: {0}")]
    Malformed(String),

    #[error("unknown operation: {0}")]
    UnknownOperation(String),

    #[error("missing parameter: {0}")]
    MissingParameter(&'static str),
}

/// Decoded operation request.
#[derive(Debug, PartialEq)]
pub enum SoapOperation {
    GetAll,
    GetById {
        id: i64,
    },
    Create {
        date_debut: NaiveDate,
        date_fin: NaiveDate,
        preference: String,
        client_id: i64,
        chambre_id: i64,
    },
    Update {
        id: i64,
        patch: ReservationPatch,
    },
    Delete {
        id: i64,
    },
}

/// Leaf parameter: local name, text content, nesting depth below the
/// operation element (0 for a direct child).
type Param = (String, String, usize);

/// Parse a SOAP 1.1 envelope into an operation.
///
/// The first element inside `Body` names the operation; its descendant leaf
/// elements are the parameters, recorded with their nesting depth. The
/// target `id` of an operation must be a direct child of the operation
/// element, so an id nested inside a `reservation` element never selects
/// the target.
pub fn parse_envelope(xml: &str) -> Result<SoapOperation, SoapError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut in_body = false;
    let mut operation: Option<String> = None;
    let mut depth_in_operation = 0usize;
    let mut current_text = String::new();
    let mut params: Vec<Param> = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                if !in_body {
                    if name == "Body" {
                        in_body = true;
                    }
                } else if operation.is_none() {
                    operation = Some(name);
                } else {
                    depth_in_operation += 1;
                    current_text.clear();
                }
            }
            Ok(Event::Empty(e)) => {
                if in_body {
                    let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                    if operation.is_none() {
                        // Parameterless operation sent as a self-closing tag.
                        operation = Some(name);
                    } else {
                        params.push((name, String::new(), depth_in_operation));
                    }
                }
            }
            Ok(Event::Text(t)) => {
                if depth_in_operation > 0 {
                    let text = t
                        .unescape()
                        .map_err(|e| SoapError::Malformed(e.to_string()))?;
                    current_text.push_str(&text);
                }
            }
            Ok(Event::End(e)) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                if depth_in_operation > 0 {
                    depth_in_operation -= 1;
                    if !current_text.is_empty() {
                        params.push((name, std::mem::take(&mut current_text), depth_in_operation));
                    }
                } else if in_body && name == "Body" {
                    break;
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(SoapError::Malformed(e.to_string())),
            _ => {}
        }
    }

    let operation = operation.ok_or_else(|| SoapError::Malformed("empty Body".to_string()))?;
    build_operation(&operation, &params)
}

/// First occurrence of a parameter by local name, at any depth.
fn param<'a>(params: &'a [Param], name: &str) -> Option<&'a str> {
    params
        .iter()
        .find(|(n, _, _)| n == name)
        .map(|(_, v, _)| v.as_str())
}

/// First occurrence among the operation element's direct children only.
fn direct_param<'a>(params: &'a [Param], name: &str) -> Option<&'a str> {
    params
        .iter()
        .find(|(n, _, depth)| *depth == 0 && n == name)
        .map(|(_, v, _)| v.as_str())
}

fn parse_i64(value: &str, name: &'static str) -> Result<i64, SoapError> {
    value
        .parse()
        .map_err(|_| SoapError::Malformed(format!("{name}: expected an integer, got `{value}`")))
}

fn required_i64(params: &[Param], name: &'static str) -> Result<i64, SoapError> {
    let value = param(params, name).ok_or(SoapError::MissingParameter(name))?;
    parse_i64(value, name)
}

/// The target id must sit directly under the operation element.
fn required_target_id(params: &[Param]) -> Result<i64, SoapError> {
    let value = direct_param(params, "id").ok_or(SoapError::MissingParameter("id"))?;
    parse_i64(value, "id")
}

fn required_date(params: &[Param], name: &'static str) -> Result<NaiveDate, SoapError> {
    let value = param(params, name).ok_or(SoapError::MissingParameter(name))?;
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| SoapError::Malformed(format!("{name}: expected YYYY-MM-DD, got `{value}`")))
}

fn build_operation(operation: &str, params: &[Param]) -> Result<SoapOperation, SoapError> {
    match operation {
        "getAllReservations" => Ok(SoapOperation::GetAll),
        "getReservationById" => Ok(SoapOperation::GetById {
            id: required_target_id(params)?,
        }),
        "createReservation" => Ok(SoapOperation::Create {
            date_debut: required_date(params, "dateDebut")?,
            date_fin: required_date(params, "dateFin")?,
            // The published WSDL names this parameter in the singular.
            preference: param(params, "preference")
                .or_else(|| param(params, "preferences"))
                .unwrap_or_default()
                .to_string(),
            client_id: required_i64(params, "clientId")?,
            chambre_id: required_i64(params, "chambreId")?,
        }),
        "updateReservation" => Ok(SoapOperation::Update {
            id: required_target_id(params)?,
            patch: ReservationPatch {
                date_debut: required_date(params, "dateDebut")?,
                date_fin: required_date(params, "dateFin")?,
                preferences: param(params, "preferences")
                    .or_else(|| param(params, "preference"))
                    .unwrap_or_default()
                    .to_string(),
                client_id: required_i64(params, "clientId")?,
                chambre_id: required_i64(params, "chambreId")?,
            },
        }),
        "deleteReservation" => Ok(SoapOperation::Delete {
            id: required_target_id(params)?,
        }),
        other => Err(SoapError::UnknownOperation(other.to_string())),
    }
}

fn soap_envelope(inner: &str) -> String {
    format!(
        "<soap:Envelope xmlns:soap=\"{SOAP_NS}\"><soap:Body>{inner}</soap:Body></soap:Envelope>"
    )
}

fn reservation_xml(r: &Reservation) -> String {
    format!(
        "<return><id>{}</id><dateDebut>{}</dateDebut><dateFin>{}</dateFin>\
         <preferences>{}</preferences><clientId>{}</clientId><chambreId>{}</chambreId></return>",
        r.id,
        r.date_debut,
        r.date_fin,
        escape(r.preferences.as_str()),
        r.client_id,
        r.chambre_id,
    )
}

fn xml_response(status: StatusCode, body: String) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "text/xml; charset=utf-8")],
        body,
    )
        .into_response()
}

fn fault_response(faultcode: &str, message: &str) -> Response {
    let inner = format!(
        "<soap:Fault><faultcode>{faultcode}</faultcode><faultstring>{}</faultstring></soap:Fault>",
        escape(message)
    );
    xml_response(StatusCode::INTERNAL_SERVER_ERROR, soap_envelope(&inner))
}

/// SOAP error translation for domain failures.
fn domain_fault(err: DomainError) -> Response {
    match &err {
        DomainError::NotFound { .. } => fault_response("soap:Server", &err.to_string()),
        DomainError::Validation(_) => fault_response("soap:Client", &err.to_string()),
        DomainError::Storage(_) => {
            tracing::error!(error = %err, "SOAP request failed");
            fault_response("soap:Server", &err.to_string())
        }
    }
}

async fn handle_soap(State(state): State<GatewayState>, body: String) -> Response {
    let operation = match parse_envelope(&body) {
        Ok(op) => op,
        // Malformed input never reaches a domain operation, so it is not
        // counted against any method.
        Err(err) => return fault_response("soap:Client", &err.to_string()),
    };
    dispatch(&state, operation).await
}

async fn dispatch(state: &GatewayState, operation: SoapOperation) -> Response {
    match operation {
        SoapOperation::GetAll => {
            let _timer = state.telemetry.observe(Protocol::Soap, "getAllReservations");
            match state.reservations.list_all().await {
                Ok(all) => {
                    let returns: String = all.iter().map(reservation_xml).collect();
                    xml_response(
                        StatusCode::OK,
                        soap_envelope(&format!(
                            "<getAllReservationsResponse>{returns}</getAllReservationsResponse>"
                        )),
                    )
                }
                Err(err) => domain_fault(err),
            }
        }
        SoapOperation::GetById { id } => {
            let _timer = state.telemetry.observe(Protocol::Soap, "getReservationById");
            match state.reservations.get(id).await {
                Ok(Some(r)) => xml_response(
                    StatusCode::OK,
                    soap_envelope(&format!(
                        "<getReservationByIdResponse>{}</getReservationByIdResponse>",
                        reservation_xml(&r)
                    )),
                ),
                Ok(None) => {
                    fault_response("soap:Server", &format!("Reservation {id} not found"))
                }
                Err(err) => domain_fault(err),
            }
        }
        SoapOperation::Create {
            date_debut,
            date_fin,
            preference,
            client_id,
            chambre_id,
        } => {
            let _timer = state.telemetry.observe(Protocol::Soap, "createReservation");
            let new = NewReservation {
                date_debut,
                date_fin,
                preferences: preference,
                client_id,
                chambre_id,
            };
            match state.reservations.create(new).await {
                Ok(created) => xml_response(
                    StatusCode::OK,
                    soap_envelope(&format!(
                        "<createReservationResponse>{}</createReservationResponse>",
                        reservation_xml(&created)
                    )),
                ),
                Err(err) => domain_fault(err),
            }
        }
        SoapOperation::Update { id, patch } => {
            let _timer = state.telemetry.observe(Protocol::Soap, "updateReservation");
            match state.reservations.update(id, patch).await {
                Ok(Some(updated)) => xml_response(
                    StatusCode::OK,
                    soap_envelope(&format!(
                        "<updateReservationResponse>{}</updateReservationResponse>",
                        reservation_xml(&updated)
                    )),
                ),
                Ok(None) => {
                    fault_response("soap:Server", &format!("Reservation {id} not found"))
                }
                Err(err) => domain_fault(err),
            }
        }
        SoapOperation::Delete { id } => {
            let _timer = state.telemetry.observe(Protocol::Soap, "deleteReservation");
            match state.reservations.delete(id).await {
                Ok(deleted) => xml_response(
                    StatusCode::OK,
                    soap_envelope(&format!(
                        "<deleteReservationResponse><success>{deleted}</success></deleteReservationResponse>"
                    )),
                ),
                Err(err) => domain_fault(err),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_create_envelope() {
        let xml = r#"
            <soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/">
              <soap:Body>
                <ns2:createReservation xmlns:ns2="http://gateway.example.com/">
                  <dateDebut>2025-08-02</dateDebut>
                  <dateFin>2025-08-05</dateFin>
                  <clientId>1</clientId>
                  <chambreId>2</chambreId>
                  <preference>vue mer</preference>
                </ns2:createReservation>
              </soap:Body>
            </soap:Envelope>
        "#;
        let op = parse_envelope(xml).unwrap();
        assert_eq!(
            op,
            SoapOperation::Create {
                date_debut: NaiveDate::from_ymd_opt(2025, 8, 2).unwrap(),
                date_fin: NaiveDate::from_ymd_opt(2025, 8, 5).unwrap(),
                preference: "vue mer".to_string(),
                client_id: 1,
                chambre_id: 2,
            }
        );
    }

    #[test]
    fn test_parse_update_with_nested_reservation() {
        let xml = r#"
            <soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/">
              <soap:Body>
                <updateReservation>
                  <id>42</id>
                  <reservation>
                    <id>9</id>
                    <dateDebut>2025-09-01</dateDebut>
                    <dateFin>2025-09-03</dateFin>
                    <preferences>calme</preferences>
                    <clientId>3</clientId>
                    <chambreId>4</chambreId>
                  </reservation>
                </updateReservation>
              </soap:Body>
            </soap:Envelope>
        "#;
        match parse_envelope(xml).unwrap() {
            SoapOperation::Update { id, patch } => {
                assert_eq!(id, 42);
                assert_eq!(patch.client_id, 3);
                assert_eq!(patch.chambre_id, 4);
                assert_eq!(patch.preferences, "calme");
            }
            other => panic!("unexpected operation: {other:?}"),
        }
    }

    #[test]
    fn test_parse_get_by_id_without_prefix() {
        let xml = r#"
            <Envelope><Body>
              <getReservationById><id>7</id></getReservationById>
            </Body></Envelope>
        "#;
        assert_eq!(
            parse_envelope(xml).unwrap(),
            SoapOperation::GetById { id: 7 }
        );
    }

    #[test]
    fn test_update_without_direct_id_is_rejected() {
        let xml = r#"
            <Envelope><Body>
              <updateReservation>
                <reservation>
                  <id>9</id>
                  <dateDebut>2025-09-01</dateDebut>
                  <dateFin>2025-09-03</dateFin>
                  <clientId>3</clientId>
                  <chambreId>4</chambreId>
                </reservation>
              </updateReservation>
            </Body></Envelope>
        "#;
        assert_eq!(
            parse_envelope(xml).unwrap_err(),
            SoapError::MissingParameter("id")
        );
    }

    #[test]
    fn test_parse_self_closing_operation() {
        let xml = "<Envelope><Body><getAllReservations/></Body></Envelope>";
        assert_eq!(parse_envelope(xml).unwrap(), SoapOperation::GetAll);
    }

    #[test]
    fn test_unknown_operation() {
        let err = parse_envelope(
            "<Envelope><Body><frobnicate><x>1</x></frobnicate></Body></Envelope>",
        )
        .unwrap_err();
        assert_eq!(err, SoapError::UnknownOperation("frobnicate".to_string()));
    }

    #[test]
    fn test_missing_parameter() {
        let xml = r#"
            <Envelope><Body>
              <getReservationById></getReservationById>
            </Body></Envelope>
        "#;
        assert_eq!(
            parse_envelope(xml).unwrap_err(),
            SoapError::MissingParameter("id")
        );
    }

    #[test]
    fn test_reservation_xml_escapes_text() {
        let r = Reservation {
            id: 1,
            date_debut: NaiveDate::from_ymd_opt(2025, 8, 2).unwrap(),
            date_fin: NaiveDate::from_ymd_opt(2025, 8, 5).unwrap(),
            preferences: "lit <double> & calme".to_string(),
            client_id: 1,
            chambre_id: 2,
        };
        let xml = reservation_xml(&r);
        assert!(xml.contains("lit &lt;double&gt; &amp; calme"));
    }
}
