//! Gateway error types with HTTP status code mapping.
//!
//! The domain layer itself never fails; [`GatewayError`] covers the outer
//! surfaces (REST, WebSocket commands) where names are parsed and lookups
//! must report what went wrong.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 2001,
///     "message": "domain not found: lobby",
///     "details": null
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code.
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Server-side error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category        | HTTP Status                |
/// |-----------|-----------------|----------------------------|
/// | 1000–1999 | Validation      | 400 Bad Request            |
/// | 2000–2999 | Not Found       | 404 Not Found              |
/// | 3000–3999 | Server          | 503 Service Unavailable    |
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Request validation failed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// A domain name or member id was rejected.
    #[error("invalid name: {0}")]
    InvalidName(String),

    /// Domain with the given name does not exist.
    #[error("domain not found: {0}")]
    DomainNotFound(String),

    /// The registry has no transport to create domains on.
    #[error("transport unavailable")]
    TransportUnavailable,
}

impl GatewayError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidRequest(_) => 1001,
            Self::InvalidName(_) => 1002,
            Self::DomainNotFound(_) => 2001,
            Self::TransportUnavailable => 3001,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) | Self::InvalidName(_) => StatusCode::BAD_REQUEST,
            Self::DomainNotFound(_) => StatusCode::NOT_FOUND,
            Self::TransportUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Builds the JSON body for this error.
    #[must_use]
    pub fn to_body(&self) -> ErrorResponse {
        ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
                details: None,
            },
        }
    }
}

impl From<JsonRejection> for GatewayError {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidRequest(rejection.body_text())
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let mut response = axum::Json(self.to_body()).into_response();
        *response.status_mut() = status;
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_maps_to_404() {
        let err = GatewayError::DomainNotFound("lobby".to_string());
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.error_code(), 2001);
        assert_eq!(err.to_string(), "domain not found: lobby");
    }

    #[test]
    fn invalid_name_maps_to_400() {
        let err = GatewayError::InvalidName("bad".to_string());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn invalid_request_maps_to_1001() {
        let err = GatewayError::InvalidRequest("missing field `event`".to_string());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.error_code(), 1001);
    }

    #[test]
    fn body_serializes_without_details() {
        let body = GatewayError::TransportUnavailable.to_body();
        let json = serde_json::to_value(&body).unwrap_or_default();
        assert_eq!(json["error"]["code"], 3001);
        assert!(json["error"].get("details").is_none());
    }
}
