//! Error types for the server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::error::CkdError;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("{0}")]
    Ingestion(String),

    #[error("{0}")]
    ShapeMismatch(String),

    #[error("{0}")]
    Untrained(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Training(String),

    #[error("{0}")]
    Internal(String),
}

/// Response extension tagging handler errors, so the legacy layer can find them
#[derive(Debug, Clone, Copy)]
pub struct ErrorMarker;

impl ServerError {
    /// Status used when strict status codes are enabled
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::Ingestion(_) | ServerError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::ShapeMismatch(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ServerError::Untrained(_) => StatusCode::CONFLICT,
            ServerError::Training(_) | ServerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn untrained() -> Self {
        ServerError::Untrained("Models are not trained yet. Call /train first".to_string())
    }
}

impl From<CkdError> for ServerError {
    fn from(err: CkdError) -> Self {
        let message = err.to_string();
        match err {
            CkdError::Ingestion(_) | CkdError::Io(_) => ServerError::Ingestion(message),
            CkdError::ShapeMismatch { .. } => ServerError::ShapeMismatch(message),
            CkdError::ModelNotFitted => ServerError::untrained(),
            CkdError::Preprocessing(_) | CkdError::ColumnNotFound(_) | CkdError::InvalidInput(_) => {
                ServerError::BadRequest(message)
            }
            CkdError::Training(_) => ServerError::Training(message),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();

        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), detail = %message, "Request failed");
        } else {
            tracing::warn!(status = status.as_u16(), detail = %message, "Request rejected");
        }

        let mut response = (status, Json(json!({ "error": message }))).into_response();
        response.extensions_mut().insert(ErrorMarker);
        response
    }
}

pub type Result<T> = std::result::Result<T, ServerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strict_status_mapping() {
        assert_eq!(ServerError::from(CkdError::ModelNotFitted).status(), StatusCode::CONFLICT);
        assert_eq!(
            ServerError::from(CkdError::shape("25 columns", "3 columns")).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ServerError::from(CkdError::Ingestion("empty".into())).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ServerError::from(CkdError::Training("diverged".into())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_message_is_library_error_text() {
        let err = ServerError::from(CkdError::shape("25 columns", "3 columns"));
        assert_eq!(err.to_string(), "Shape mismatch: expected 25 columns, got 3 columns");
    }

    #[test]
    fn test_response_carries_marker() {
        let response = ServerError::BadRequest("nope".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(response.extensions().get::<ErrorMarker>().is_some());
    }
}
