use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use bytes::Bytes;
use metrics::counter;
use tracing::instrument;

use crate::api::{HealthResponse, IngestError, IngestResponse, RouteFailure};
use crate::payload::{extract_xml_topic, looks_like_xml, IngestRecord, RecordKind};
use crate::router;

/// Strict data ingestion, the Server URI configured in the Vivotek
/// app: best-effort JSON parse, wrapped envelope on disk, 400 with an
/// error body on anything unexpected.
#[instrument(skip_all, fields(payload_size = body.len()))]
pub async fn data(
    state: State<router::State>,
    body: Bytes,
) -> Result<Json<IngestResponse>, RouteFailure> {
    counter!("ingest_requests_received_total", "route" => "data").increment(1);

    let record = wrapped_record(&state, body).map_err(RouteFailure::data)?;
    state
        .sink
        .store(RecordKind::Data, record)
        .await
        .map_err(RouteFailure::data)?;

    Ok(Json(IngestResponse {
        message: "Data received successfully",
        timestamp: state.timesource.current_time(),
    }))
}

/// Strict log ingestion, same contract as `data` but persisted as a
/// log-kind record in the logs directory.
#[instrument(skip_all, fields(payload_size = body.len()))]
pub async fn logs(
    state: State<router::State>,
    body: Bytes,
) -> Result<Json<IngestResponse>, RouteFailure> {
    counter!("ingest_requests_received_total", "route" => "logs").increment(1);

    let record = wrapped_record(&state, body).map_err(RouteFailure::log)?;
    state
        .sink
        .store(RecordKind::Log, record)
        .await
        .map_err(RouteFailure::log)?;

    Ok(Json(IngestResponse {
        message: "Log received successfully",
        timestamp: state.timesource.current_time(),
    }))
}

/// Raw push notifications. Devices retry aggressively on any non-200,
/// so this route reports success even when persistence fails.
#[instrument(skip_all, fields(payload_size = body.len()))]
pub async fn push(state: State<router::State>, body: Bytes) -> (StatusCode, &'static str) {
    counter!("ingest_requests_received_total", "route" => "push").increment(1);

    let raw = String::from_utf8_lossy(&body).into_owned();
    let received_at = state.timesource.current_time();
    if let Err(err) = state.sink.store_raw(raw, received_at).await {
        swallow("push", err);
    }

    (StatusCode::OK, "OK")
}

/// JSON flavor of the push route: wrapped envelope on disk, but the
/// same never-fail response policy as `push`.
#[instrument(skip_all, fields(payload_size = body.len()))]
pub async fn push_json(state: State<router::State>, body: Bytes) -> (StatusCode, &'static str) {
    counter!("ingest_requests_received_total", "route" => "push_json").increment(1);

    let raw = String::from_utf8_lossy(&body).into_owned();
    let record = IngestRecord::from_raw(raw, state.timesource.current_time());
    if let Err(err) = state.sink.store(RecordKind::Data, record).await {
        swallow("push_json", err);
    }

    (StatusCode::OK, "OK")
}

/// XML/SOAP notifications. Every non-empty body is persisted as
/// received; the content-type check is advisory and only decides
/// whether to look for a Topic element to log.
#[instrument(skip_all, fields(payload_size = body.len()))]
pub async fn push_xml(
    state: State<router::State>,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, &'static str) {
    counter!("ingest_requests_received_total", "route" => "push_xml").increment(1);

    if body.is_empty() {
        return (StatusCode::OK, "OK");
    }

    let raw = String::from_utf8_lossy(&body).into_owned();
    let content_type = headers
        .get("content-type")
        .and_then(|value| value.to_str().ok());
    if looks_like_xml(content_type, &raw) {
        match extract_xml_topic(&raw) {
            Some(topic) => tracing::info!(topic = %topic, "xml notification"),
            None => tracing::debug!("xml notification without a Topic element"),
        }
    }

    let received_at = state.timesource.current_time();
    if let Err(err) = state.sink.store_raw(raw, received_at).await {
        swallow("push_xml", err);
    }

    (StatusCode::OK, "OK")
}

/// Always healthy, no side effects, independent of storage
/// configuration.
pub async fn health(state: State<router::State>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        timestamp: state.timesource.current_time(),
    })
}

fn wrapped_record(state: &router::State, body: Bytes) -> Result<IngestRecord, IngestError> {
    let raw = String::from_utf8(body.into()).map_err(|err| {
        tracing::error!("failed to decode body: {}", err);
        IngestError::InvalidBodyEncoding
    })?;
    tracing::debug!(raw = %raw, "received payload");
    Ok(IngestRecord::from_raw(raw, state.timesource.current_time()))
}

fn swallow(route: &'static str, err: IngestError) {
    counter!("ingest_errors_swallowed_total", "route" => route).increment(1);
    tracing::error!("failed to persist payload on {}, replying OK anyway: {}", route, err);
}
