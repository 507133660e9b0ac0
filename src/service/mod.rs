//! Service layer: orchestration between the outer surfaces and domains.
//!
//! [`DomainService`] parses raw names coming from REST and WebSocket
//! clients, resolves domains through the [`super::domain::DomainRegistry`]
//! and logs every membership change and emit.

pub mod domain_service;

pub use domain_service::{DomainService, DomainSummary, OtherIds, SetOperation};
