//! Request extractors that report failures as [`GatewayError`]s.

use axum::extract::FromRequest;

use crate::error::GatewayError;

/// JSON body extractor whose rejection is [`GatewayError::InvalidRequest`].
///
/// Malformed or incomplete bodies answer 400 with the usual error body
/// instead of axum's plain-text 422.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(GatewayError))]
pub struct ApiJson<T>(pub T);
