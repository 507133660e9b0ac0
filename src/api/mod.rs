//! REST API layer: route handlers, DTOs, and router composition.
//!
//! All resource endpoints are mounted under `/api/v1`; `/health` and the
//! `/ws` upgrade live at the root.

pub mod dto;
pub mod extract;
pub mod handlers;

use axum::Router;
use axum::routing::get;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

use crate::app_state::AppState;
use crate::ws::handler::ws_handler;

/// OpenAPI document for the REST API.
#[derive(Debug, OpenApi)]
#[openapi(
    info(title = "domain-gateway", description = "Named connection groups with set-algebra broadcast"),
    paths(
        handlers::system::health_handler,
        handlers::domain::list_domains,
        handlers::domain::get_domain,
        handlers::domain::delete_domain,
        handlers::domain::remove_member,
        handlers::emit::send,
        handlers::emit::broadcast,
        handlers::emit::union,
        handlers::emit::intersection,
        handlers::emit::difference,
    ),
    tags(
        (name = "System", description = "Health"),
        (name = "Domains", description = "Domain inspection and teardown"),
        (name = "Emit", description = "Send, broadcast and set-algebra emits"),
    )
)]
pub struct ApiDoc;

/// Builds the complete API router with all REST endpoints.
pub fn build_router() -> Router<AppState> {
    Router::new()
        .nest("/api/v1", handlers::routes())
        .merge(handlers::system::routes())
}

/// Builds the full application: REST, WebSocket, tracing and CORS layers.
pub fn build_app(state: AppState) -> Router {
    let router = build_router().route("/ws", get(ws_handler));

    #[cfg(feature = "swagger-ui")]
    let router = router.merge(
        utoipa_swagger_ui::SwaggerUi::new("/swagger-ui")
            .url("/api-docs/openapi.json", ApiDoc::openapi()),
    );

    router
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
