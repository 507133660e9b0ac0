//! REST endpoint handlers organized by resource.

pub mod domain;
pub mod emit;
pub mod system;

use axum::Router;

use crate::app_state::AppState;

/// Composes all resource routes under `/api/v1`.
pub fn routes() -> Router<AppState> {
    Router::new().merge(domain::routes()).merge(emit::routes())
}
