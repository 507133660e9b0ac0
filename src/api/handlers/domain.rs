//! Domain handlers: list, get, delete, and member removal.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{delete, get};
use axum::{Json, Router};

use crate::api::dto::{
    DomainDetailResponse, DomainListResponse, DomainSummaryDto, PaginationParams,
};
use crate::app_state::AppState;
use crate::error::{ErrorResponse, GatewayError};

/// `GET /domains` — List domains with pagination.
#[utoipa::path(
    get,
    path = "/api/v1/domains",
    tag = "Domains",
    summary = "List domains",
    description = "Returns a paginated list of domains sorted by name, with member counts.",
    params(PaginationParams),
    responses(
        (status = 200, description = "Paginated domain list", body = DomainListResponse),
    )
)]
pub async fn list_domains(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> Json<DomainListResponse> {
    let summaries = state.domain_service.list_domains().await;
    let dtos: Vec<DomainSummaryDto> = summaries.iter().map(DomainSummaryDto::from).collect();
    let (data, pagination) = params.paginate(dtos);
    Json(DomainListResponse { data, pagination })
}

/// `GET /domains/{name}` — Get a domain and its members.
///
/// # Errors
///
/// Returns [`GatewayError::DomainNotFound`] if the domain does not exist.
#[utoipa::path(
    get,
    path = "/api/v1/domains/{name}",
    tag = "Domains",
    summary = "Get domain details",
    description = "Returns the tracked member ids of a domain in insertion order.",
    params(
        ("name" = String, Path, description = "Domain name"),
    ),
    responses(
        (status = 200, description = "Domain details", body = DomainDetailResponse),
        (status = 400, description = "Invalid domain name", body = ErrorResponse),
        (status = 404, description = "Domain not found", body = ErrorResponse),
    )
)]
pub async fn get_domain(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, GatewayError> {
    let summary = state.domain_service.describe(&name).await?;
    Ok(Json(DomainDetailResponse::from(summary)))
}

/// `DELETE /domains/{name}` — Empty and delete a domain.
///
/// # Errors
///
/// Returns [`GatewayError::DomainNotFound`] if the domain does not exist.
#[utoipa::path(
    delete,
    path = "/api/v1/domains/{name}",
    tag = "Domains",
    summary = "Delete a domain",
    description = "Makes every live connection leave the domain's rooms and removes the domain.",
    params(
        ("name" = String, Path, description = "Domain name"),
    ),
    responses(
        (status = 204, description = "Domain deleted"),
        (status = 404, description = "Domain not found", body = ErrorResponse),
    )
)]
pub async fn delete_domain(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, GatewayError> {
    state.domain_service.delete_domain(&name).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `DELETE /domains/{name}/members/{member_id}` — Remove a member id.
///
/// Removing an id that is not tracked still succeeds.
///
/// # Errors
///
/// Returns [`GatewayError::DomainNotFound`] if the domain does not exist.
#[utoipa::path(
    delete,
    path = "/api/v1/domains/{name}/members/{member_id}",
    tag = "Domains",
    summary = "Remove a member",
    description = "Makes every live connection leave the member's room and forgets the id.",
    params(
        ("name" = String, Path, description = "Domain name"),
        ("member_id" = String, Path, description = "Member id"),
    ),
    responses(
        (status = 204, description = "Member removed (or was not tracked)"),
        (status = 404, description = "Domain not found", body = ErrorResponse),
    )
)]
pub async fn remove_member(
    State(state): State<AppState>,
    Path((name, member_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, GatewayError> {
    state
        .domain_service
        .remove_member(&name, &member_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Domain management routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/domains", get(list_domains))
        .route("/domains/{name}", get(get_domain).delete(delete_domain))
        .route("/domains/{name}/members/{member_id}", delete(remove_member))
}
