//! Connection hub: the WebSocket implementation of [`Transport`].
//!
//! Every live WebSocket registers here and receives a bounded queue of
//! [`RoomEvent`]s. The connection task drains the queue into the socket, so
//! emitting never waits on the network.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use super::membership::RoomMembership;
use super::messages::RoomEvent;
use crate::domain::{ConnectionId, RoomKey, Transport};

#[derive(Debug)]
struct ConnectionSlot {
    rooms: RoomMembership,
    outbound: mpsc::Sender<RoomEvent>,
}

/// Table of live connections and the rooms each one is in.
///
/// Locks are held only for in-memory updates and non-blocking queue
/// pushes, never across an `.await`.
#[derive(Debug)]
pub struct ConnectionHub {
    buffer: usize,
    connections: RwLock<HashMap<ConnectionId, ConnectionSlot>>,
}

impl ConnectionHub {
    /// Creates an empty hub whose per-connection queues hold `buffer` events.
    #[must_use]
    pub fn new(buffer: usize) -> Self {
        Self {
            buffer: buffer.max(1),
            connections: RwLock::new(HashMap::new()),
        }
    }

    /// Registers a new connection.
    ///
    /// Returns its id and the receiving end of its outbound queue.
    pub fn register(&self) -> (ConnectionId, mpsc::Receiver<RoomEvent>) {
        let id = ConnectionId::new();
        let (outbound, rx) = mpsc::channel(self.buffer);
        self.write().insert(
            id,
            ConnectionSlot {
                rooms: RoomMembership::new(),
                outbound,
            },
        );
        tracing::debug!(connection = %id, "connection registered");
        (id, rx)
    }

    /// Drops a connection together with all of its room memberships.
    ///
    /// Returns `false` if the connection was not registered.
    pub fn disconnect(&self, connection: ConnectionId) -> bool {
        let removed = self.write().remove(&connection);
        if let Some(slot) = &removed {
            tracing::debug!(
                connection = %connection,
                rooms = slot.rooms.count(),
                "connection dropped"
            );
        }
        removed.is_some()
    }

    /// Returns the rooms `connection` is in, rendered as `domain:member`
    /// and sorted.
    #[must_use]
    pub fn rooms_of(&self, connection: ConnectionId) -> Vec<String> {
        let mut rooms: Vec<String> = self
            .read()
            .get(&connection)
            .map(|slot| slot.rooms.rooms().map(ToString::to_string).collect())
            .unwrap_or_default();
        rooms.sort();
        rooms
    }

    /// Returns the number of live connections.
    #[must_use]
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Returns `true` if no connection is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<ConnectionId, ConnectionSlot>> {
        self.connections
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<ConnectionId, ConnectionSlot>> {
        self.connections
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Transport for ConnectionHub {
    fn connections(&self) -> Vec<ConnectionId> {
        self.read().keys().copied().collect()
    }

    fn join(&self, connection: ConnectionId, room: &RoomKey) {
        if let Some(slot) = self.write().get_mut(&connection) {
            slot.rooms.join(room.clone());
        }
    }

    fn leave(&self, connection: ConnectionId, room: &RoomKey) {
        if let Some(slot) = self.write().get_mut(&connection) {
            slot.rooms.leave(room);
        }
    }

    fn emit(&self, room: &RoomKey, event: &str, data: &serde_json::Value) -> usize {
        let connections = self.read();
        let mut delivered = 0usize;
        for (id, slot) in connections.iter().filter(|(_, s)| s.rooms.contains(room)) {
            let frame = RoomEvent {
                room: room.to_string(),
                event: event.to_string(),
                data: data.clone(),
            };
            match slot.outbound.try_send(frame) {
                Ok(()) => delivered = delivered.saturating_add(1),
                Err(TrySendError::Full(_)) => {
                    tracing::warn!(connection = %id, %room, event, "ws client lagged; event dropped");
                }
                Err(TrySendError::Closed(_)) => {
                    tracing::debug!(connection = %id, %room, "outbound queue closed");
                }
            }
        }
        delivered
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::{DomainName, MemberId};

    fn room(domain: &str, member: &str) -> RoomKey {
        let (Ok(d), Ok(m)) = (DomainName::parse(domain), MemberId::parse(member)) else {
            panic!("valid names");
        };
        RoomKey::new(d, m)
    }

    #[tokio::test]
    async fn emit_reaches_joined_connections_only() {
        let hub = ConnectionHub::new(8);
        let (a, mut rx_a) = hub.register();
        let (_b, mut rx_b) = hub.register();
        hub.join(a, &room("lobby", "u1"));

        let delivered = hub.emit(&room("lobby", "u1"), "ping", &serde_json::json!({"x": 1}));
        assert_eq!(delivered, 1);

        let Some(event) = rx_a.recv().await else {
            panic!("expected an event");
        };
        assert_eq!(event.room, "lobby:u1");
        assert_eq!(event.event, "ping");
        assert_eq!(event.data, serde_json::json!({"x": 1}));
        assert!(rx_b.try_recv().is_err());
    }

    #[test]
    fn leave_stops_delivery() {
        let hub = ConnectionHub::new(8);
        let (a, _rx) = hub.register();
        hub.join(a, &room("lobby", "u1"));
        hub.leave(a, &room("lobby", "u1"));
        assert_eq!(hub.emit(&room("lobby", "u1"), "ping", &serde_json::Value::Null), 0);
        assert!(hub.rooms_of(a).is_empty());
    }

    #[test]
    fn full_queue_drops_events() {
        let hub = ConnectionHub::new(1);
        let (a, _rx) = hub.register();
        hub.join(a, &room("lobby", "u1"));
        assert_eq!(hub.emit(&room("lobby", "u1"), "one", &serde_json::Value::Null), 1);
        assert_eq!(hub.emit(&room("lobby", "u1"), "two", &serde_json::Value::Null), 0);
    }

    #[test]
    fn disconnect_forgets_connection_and_rooms() {
        let hub = ConnectionHub::new(8);
        let (a, _rx) = hub.register();
        hub.join(a, &room("lobby", "u1"));
        assert_eq!(hub.len(), 1);

        assert!(hub.disconnect(a));
        assert!(!hub.disconnect(a));
        assert!(hub.is_empty());
        assert!(hub.connections().is_empty());
        assert_eq!(hub.emit(&room("lobby", "u1"), "ping", &serde_json::Value::Null), 0);
    }

    #[test]
    fn join_unknown_connection_is_ignored() {
        let hub = ConnectionHub::new(8);
        let ghost = ConnectionId::new();
        hub.join(ghost, &room("lobby", "u1"));
        assert!(hub.rooms_of(ghost).is_empty());
        assert!(hub.is_empty());
    }

    #[test]
    fn rooms_of_is_sorted() {
        let hub = ConnectionHub::new(8);
        let (a, _rx) = hub.register();
        hub.join(a, &room("vip", "u2"));
        hub.join(a, &room("lobby", "u1"));
        assert_eq!(hub.rooms_of(a), vec!["lobby:u1", "vip:u2"]);
    }
}
