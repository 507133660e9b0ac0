//! Boundary to the real-time pub/sub transport.
//!
//! Domains never talk to sockets directly. Everything they do resolves to
//! the four primitives of [`Transport`]: enumerate connections, join a room,
//! leave a room, and emit to a room.

use std::fmt;

use super::{ConnectionId, RoomKey};

/// Real-time transport with per-connection room membership.
///
/// Calls are synchronous and must not block: implementations queue
/// outbound frames instead of writing to the network inline.
pub trait Transport: fmt::Debug + Send + Sync {
    /// Returns a snapshot of every live connection.
    fn connections(&self) -> Vec<ConnectionId>;

    /// Makes `connection` a member of `room`. Unknown connections are ignored.
    fn join(&self, connection: ConnectionId, room: &RoomKey);

    /// Removes `connection` from `room`. Unknown connections are ignored.
    fn leave(&self, connection: ConnectionId, room: &RoomKey);

    /// Delivers `event` with `data` to every connection currently in `room`.
    ///
    /// Returns the number of connections the event was queued for.
    fn emit(&self, room: &RoomKey, event: &str, data: &serde_json::Value) -> usize;
}
