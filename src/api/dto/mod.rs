//! Data Transfer Objects for REST request/response serialization.

pub mod common_dto;
pub mod domain_dto;
pub mod emit_dto;

pub use common_dto::*;
pub use domain_dto::*;
pub use emit_dto::*;
