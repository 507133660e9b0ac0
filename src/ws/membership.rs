//! Per-connection room membership.
//!
//! Tracks which rooms a WebSocket connection has joined and decides which
//! room events the connection receives.

use std::collections::HashSet;

use crate::domain::RoomKey;

/// The set of rooms a single WebSocket connection is in.
#[derive(Debug, Default)]
pub struct RoomMembership {
    rooms: HashSet<RoomKey>,
}

impl RoomMembership {
    /// Creates an empty membership.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `room`. Returns `false` if it was already joined.
    pub fn join(&mut self, room: RoomKey) -> bool {
        self.rooms.insert(room)
    }

    /// Removes `room`. Returns `false` if it was not joined.
    pub fn leave(&mut self, room: &RoomKey) -> bool {
        self.rooms.remove(room)
    }

    /// Returns `true` if events for `room` should reach this connection.
    #[must_use]
    pub fn contains(&self, room: &RoomKey) -> bool {
        self.rooms.contains(room)
    }

    /// Returns the number of joined rooms.
    #[must_use]
    pub fn count(&self) -> usize {
        self.rooms.len()
    }

    /// Iterates over the joined rooms in no particular order.
    pub fn rooms(&self) -> impl Iterator<Item = &RoomKey> {
        self.rooms.iter()
    }
}
