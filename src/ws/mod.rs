//! WebSocket layer: the connection hub, per-connection loops, and messages.
//!
//! The WebSocket endpoint at `/ws` lets clients join and leave domains.
//! [`hub::ConnectionHub`] is the [`crate::domain::Transport`] every domain
//! emits through.

pub mod connection;
pub mod handler;
pub mod hub;
pub mod membership;
pub mod messages;

pub use hub::ConnectionHub;
