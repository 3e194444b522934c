use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use time::OffsetDateTime;

/// Success body returned by the strict ingestion routes.
#[derive(Debug, Serialize)]
pub struct IngestResponse {
    pub message: &'static str,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
}

/// Body returned by the health routes, independent of storage
/// configuration. Pushing devices use it to probe the server.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: &'static str,
    pub message: String,
}

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("request body is not valid UTF-8")]
    InvalidBodyEncoding,

    #[error("{0} is not configured")]
    MissingStorageDir(&'static str),
    #[error("failed to write payload to disk: {0}")]
    StorageError(#[from] std::io::Error),
    #[error("failed to serialize envelope: {0}")]
    EnvelopeError(#[from] serde_json::Error),
}

/// Failure surfaced by the strict routes: a per-route error string
/// alongside the underlying message. Only the strict routes report
/// errors at all; the push routes swallow them in the handler.
#[derive(Debug)]
pub struct RouteFailure {
    error: &'static str,
    source: IngestError,
}

impl RouteFailure {
    pub fn data(source: IngestError) -> RouteFailure {
        RouteFailure {
            error: "Failed to process data",
            source,
        }
    }

    pub fn log(source: IngestError) -> RouteFailure {
        RouteFailure {
            error: "Failed to process log",
            source,
        }
    }
}

impl IntoResponse for RouteFailure {
    fn into_response(self) -> Response {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: self.error,
                message: self.source.to_string(),
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum::response::IntoResponse;

    use super::{IngestError, RouteFailure};

    #[test]
    fn failures_map_to_bad_request() {
        let res = RouteFailure::data(IngestError::MissingStorageDir("data_folder_path"))
            .into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);

        let res = RouteFailure::log(IngestError::InvalidBodyEncoding).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}
