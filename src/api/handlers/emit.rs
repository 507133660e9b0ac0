//! Emit handlers: send, broadcast, and the set-algebra emits.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};

use crate::api::dto::{EmitRequest, EmitResponse, SendResponse, SetEmitRequest};
use crate::api::extract::ApiJson;
use crate::app_state::AppState;
use crate::error::{ErrorResponse, GatewayError};
use crate::service::SetOperation;

/// `POST /domains/{name}/members/{member_id}/send` — Emit to one member.
///
/// # Errors
///
/// Returns [`GatewayError::InvalidRequest`] for a malformed body, or
/// [`GatewayError::DomainNotFound`] if the domain does not exist.
#[utoipa::path(
    post,
    path = "/api/v1/domains/{name}/members/{member_id}/send",
    tag = "Emit",
    summary = "Send to a member",
    description = "Emits the event to every connection in the member's room. The id does not need to be tracked.",
    params(
        ("name" = String, Path, description = "Domain name"),
        ("member_id" = String, Path, description = "Member id"),
    ),
    request_body = EmitRequest,
    responses(
        (status = 200, description = "Event queued", body = SendResponse),
        (status = 400, description = "Invalid request body", body = ErrorResponse),
        (status = 404, description = "Domain not found", body = ErrorResponse),
    )
)]
pub async fn send(
    State(state): State<AppState>,
    Path((name, member_id)): Path<(String, String)>,
    ApiJson(req): ApiJson<EmitRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    let delivered = state
        .domain_service
        .send(&name, &member_id, &req.event, &req.data)
        .await?;
    Ok(Json(SendResponse { delivered }))
}

/// `POST /domains/{name}/broadcast` — Emit once per tracked member.
///
/// # Errors
///
/// Returns [`GatewayError::InvalidRequest`] for a malformed body, or
/// [`GatewayError::DomainNotFound`] if the domain does not exist.
#[utoipa::path(
    post,
    path = "/api/v1/domains/{name}/broadcast",
    tag = "Emit",
    summary = "Broadcast to a domain",
    description = "Sends the event once to each tracked member id, in insertion order.",
    params(
        ("name" = String, Path, description = "Domain name"),
    ),
    request_body = EmitRequest,
    responses(
        (status = 200, description = "Recipients", body = EmitResponse),
        (status = 400, description = "Invalid request body", body = ErrorResponse),
        (status = 404, description = "Domain not found", body = ErrorResponse),
    )
)]
pub async fn broadcast(
    State(state): State<AppState>,
    Path(name): Path<String>,
    ApiJson(req): ApiJson<EmitRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    let recipients = state
        .domain_service
        .broadcast(&name, &req.event, &req.data)
        .await?;
    Ok(Json(EmitResponse::from(recipients)))
}

/// `POST /domains/{name}/union` — Emit to members of either side.
///
/// # Errors
///
/// Returns [`GatewayError::InvalidRequest`] for a malformed body, or
/// [`GatewayError::DomainNotFound`] if the domain does not exist.
#[utoipa::path(
    post,
    path = "/api/v1/domains/{name}/union",
    tag = "Emit",
    summary = "Emit to a union",
    description = "Sends once to each id tracked by this domain or present on the other side.",
    params(
        ("name" = String, Path, description = "Domain name"),
    ),
    request_body = SetEmitRequest,
    responses(
        (status = 200, description = "Recipients", body = EmitResponse),
        (status = 400, description = "Invalid request body", body = ErrorResponse),
        (status = 404, description = "Domain not found", body = ErrorResponse),
    )
)]
pub async fn union(
    state: State<AppState>,
    name: Path<String>,
    req: ApiJson<SetEmitRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    emit_set(state, name, SetOperation::Union, req).await
}

/// `POST /domains/{name}/intersection` — Emit to members of both sides.
///
/// # Errors
///
/// Returns [`GatewayError::InvalidRequest`] for a malformed body, or
/// [`GatewayError::DomainNotFound`] if the domain does not exist.
#[utoipa::path(
    post,
    path = "/api/v1/domains/{name}/intersection",
    tag = "Emit",
    summary = "Emit to an intersection",
    description = "Sends once to each id tracked by this domain that is also present on the other side.",
    params(
        ("name" = String, Path, description = "Domain name"),
    ),
    request_body = SetEmitRequest,
    responses(
        (status = 200, description = "Recipients", body = EmitResponse),
        (status = 400, description = "Invalid request body", body = ErrorResponse),
        (status = 404, description = "Domain not found", body = ErrorResponse),
    )
)]
pub async fn intersection(
    state: State<AppState>,
    name: Path<String>,
    req: ApiJson<SetEmitRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    emit_set(state, name, SetOperation::Intersection, req).await
}

/// `POST /domains/{name}/difference` — Emit to members of this side only.
///
/// # Errors
///
/// Returns [`GatewayError::InvalidRequest`] for a malformed body, or
/// [`GatewayError::DomainNotFound`] if the domain does not exist.
#[utoipa::path(
    post,
    path = "/api/v1/domains/{name}/difference",
    tag = "Emit",
    summary = "Emit to a difference",
    description = "Sends once to each id tracked by this domain that is absent from the other side.",
    params(
        ("name" = String, Path, description = "Domain name"),
    ),
    request_body = SetEmitRequest,
    responses(
        (status = 200, description = "Recipients", body = EmitResponse),
        (status = 400, description = "Invalid request body", body = ErrorResponse),
        (status = 404, description = "Domain not found", body = ErrorResponse),
    )
)]
pub async fn difference(
    state: State<AppState>,
    name: Path<String>,
    req: ApiJson<SetEmitRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    emit_set(state, name, SetOperation::Difference, req).await
}

async fn emit_set(
    State(state): State<AppState>,
    Path(name): Path<String>,
    op: SetOperation,
    ApiJson(req): ApiJson<SetEmitRequest>,
) -> Result<Json<EmitResponse>, GatewayError> {
    let recipients = state
        .domain_service
        .emit_set(&name, op, &req.other.into(), &req.event, &req.data)
        .await?;
    Ok(Json(EmitResponse::from(recipients)))
}

/// Emit routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/domains/{name}/members/{member_id}/send", post(send))
        .route("/domains/{name}/broadcast", post(broadcast))
        .route("/domains/{name}/union", post(union))
        .route("/domains/{name}/intersection", post(intersection))
        .route("/domains/{name}/difference", post(difference))
}
