//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::service::DomainService;
use crate::ws::ConnectionHub;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Domain service for all membership and emit logic.
    pub domain_service: Arc<DomainService>,
    /// Connection hub backing the `/ws` endpoint.
    pub hub: Arc<ConnectionHub>,
}
