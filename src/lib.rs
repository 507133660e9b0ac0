//! # domain-gateway
//!
//! Named groups ("domains") of real-time connections with set-based
//! broadcast primitives across groups.
//!
//! A domain maps caller-chosen member ids onto transport rooms keyed
//! `domain:member`. On top of plain `send` and `broadcast`, domains can emit
//! to the union, intersection or difference of their members and another
//! domain (or an explicit id list). The core only speaks to a
//! [`domain::Transport`]; the bundled [`ws::ConnectionHub`] implements it
//! for WebSocket clients.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP, WebSocket)
//!     │
//!     ├── REST Handlers (api/)
//!     ├── WS Handler (ws/)
//!     │
//!     ├── DomainService (service/)
//!     │
//!     ├── DomainRegistry → Domain (domain/)
//!     │
//!     └── Transport ← ConnectionHub (ws/)
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod service;
pub mod ws;
