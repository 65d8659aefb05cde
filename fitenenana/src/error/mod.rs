//! Error types and error handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::catalogue::LoadError;
use crate::export::ExportError;
use crate::session::SessionError;

/// Application error type
#[derive(Debug, Error)]
pub enum FitenenanaError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Catalogue could not be loaded
    #[error("Catalogue error: {0}")]
    Load(#[from] LoadError),

    /// Session error
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// Export error
    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    /// Template rendering error
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),

    /// Response payload serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Bad request error
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Not Found (404)
    #[error("Not found: {0}")]
    NotFound(String),
}

impl FitenenanaError {
    /// HTTP status for this error
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_)
            | Self::Session(
                SessionError::UnknownField(_)
                | SessionError::UnknownVariable(_)
                | SessionError::InvalidSessionId,
            ) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) | Self::Session(SessionError::UnknownCase(_)) => StatusCode::NOT_FOUND,
            Self::Session(SessionError::NoSelection) => StatusCode::CONFLICT,
            Self::Load(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Config(_) | Self::Export(_) | Self::Template(_) | Self::Serialization(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for FitenenanaError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::warn!(error = %self, "Request rejected");
        }
        (status, self.to_string()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::FieldId;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            FitenenanaError::from(SessionError::UnknownField(FieldId::new(0, 3))).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            FitenenanaError::from(SessionError::NoSelection).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            FitenenanaError::from(LoadError::Status(500)).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            FitenenanaError::from(ExportError::Exhausted).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_into_response_carries_message() {
        let response = FitenenanaError::NotFound("didi-poatra".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
