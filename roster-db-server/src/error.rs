//! Server error types with HTTP status code mapping

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

/// Result type for request handlers
pub type Result<T> = std::result::Result<T, ServerError>;

/// Server error type wrapping engine construction errors and request-shape
/// errors, with HTTP status mapping
#[derive(Error, Debug)]
pub enum ServerError {
    /// Filter/group construction failure from the query engine
    #[error("{0}")]
    Query(#[from] roster_db_query::QueryError),

    /// Filter queries must carry a result-size limit
    #[error("limit not specified")]
    MissingLimit,

    /// Group queries must carry an order flag
    #[error("order not specified")]
    MissingOrder,

    /// Unparsable limit value
    #[error("Invalid limit: {0}")]
    InvalidLimit(std::num::ParseIntError),

    /// Source data unreadable during startup load
    #[error("Ingest error: {0}")]
    Ingest(#[from] roster_db_ingest::IngestError),

    /// Source data malformed during startup load
    #[error("Load error: {0}")]
    Load(#[from] roster_db_core::Error),
}

impl ServerError {
    /// Map error to HTTP status
    fn status(&self) -> StatusCode {
        match self {
            ServerError::Query(_)
            | ServerError::MissingLimit
            | ServerError::MissingOrder
            | ServerError::InvalidLimit(_) => StatusCode::BAD_REQUEST,

            // load errors are fatal at startup and never reach a handler;
            // mapped anyway so the type is total
            ServerError::Ingest(_) | ServerError::Load(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// JSON error body
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        tracing::debug!(error = %self, status = %status, "request rejected");
        (
            status,
            Json(ErrorBody {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roster_db_query::QueryError;

    #[test]
    fn request_shape_errors_map_to_bad_request() {
        assert_eq!(
            ServerError::MissingLimit.into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ServerError::MissingOrder.into_response().status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn construction_errors_map_to_bad_request() {
        let err = ServerError::Query(QueryError::InvalidSex("x".to_string()));
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);

        let parse_err = "ten".parse::<usize>().unwrap_err();
        let err = ServerError::InvalidLimit(parse_err);
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }
}
