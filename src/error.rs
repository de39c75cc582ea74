//! Error taxonomy for catalog operations.

use axum::http::StatusCode;
use serde_json::Value;
use thiserror::Error;

/// Errors that can occur while serving catalog data.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Upstream unreachable, timed out, answered with a non-2xx status
    /// or with a body that is not JSON.
    #[error("{0}")]
    Http(#[from] reqwest::Error),

    /// Upstream answered without a success code or without a payload.
    #[error("Failed to fetch characters")]
    Rejected { envelope: Value },

    /// Payload was neither an array nor one of the known wrappers.
    #[error("Unexpected API response format")]
    UnrecognizedShape,

    /// Neither lookup strategy produced a character.
    #[error("Character not found")]
    NotFound { id: String },

    /// Endpoint URL could not be built from the configured base.
    #[error("Invalid upstream URL: {0}")]
    Url(#[from] url::ParseError),
}

impl CatalogError {
    /// HTTP status used when this error reaches a client.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Raw upstream envelope, when the upstream rejected the request.
    pub fn details(&self) -> Option<&Value> {
        match self {
            Self::Rejected { envelope } => Some(envelope),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_not_found_maps_to_404() {
        let err = CatalogError::NotFound { id: "7".to_string() };
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "Character not found");
    }

    #[test]
    fn test_other_errors_map_to_500() {
        assert_eq!(
            CatalogError::UnrecognizedShape.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            CatalogError::Rejected { envelope: json!({"code": 0}) }.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_rejected_carries_details() {
        let err = CatalogError::Rejected {
            envelope: json!({"code": 0, "msg": "maintenance"}),
        };
        assert_eq!(err.details(), Some(&json!({"code": 0, "msg": "maintenance"})));
        assert!(CatalogError::UnrecognizedShape.details().is_none());
        assert_eq!(
            CatalogError::UnrecognizedShape.to_string(),
            "Unexpected API response format"
        );
    }
}
