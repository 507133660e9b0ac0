//! A named group of members backed by transport rooms.
//!
//! Every member id of a [`Domain`] maps to the room `name:id`. The domain
//! keeps an ordered cache of the ids it has seen; the transport remains the
//! owner of which connection sits in which room. The two may drift (a
//! connection can disconnect without the id being removed), and every
//! operation tolerates that silently.

use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::RwLock;

use super::{ConnectionId, DomainName, IdSource, MemberId, RoomKey, Transport};

/// What to take out of a domain with [`Domain::remove`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoveTarget {
    /// Remove a member id and every connection in its room.
    Member(MemberId),
    /// Make one connection leave every room of the domain.
    Connection(ConnectionId),
}

impl From<MemberId> for RemoveTarget {
    fn from(id: MemberId) -> Self {
        Self::Member(id)
    }
}

impl From<ConnectionId> for RemoveTarget {
    fn from(connection: ConnectionId) -> Self {
        Self::Connection(connection)
    }
}

/// Named group of addressable members.
///
/// # Concurrency
///
/// The member list sits behind a [`tokio::sync::RwLock`]; each operation
/// holds the lock for its whole duration, so operations on one domain never
/// interleave. Set operations snapshot the other side first, which keeps
/// `a.emit_to_union(&a, ..)` deadlock-free.
#[derive(Debug)]
pub struct Domain {
    name: DomainName,
    transport: Arc<dyn Transport>,
    members: RwLock<Vec<MemberId>>,
}

impl Domain {
    /// Creates an empty domain bound to `transport`.
    #[must_use]
    pub fn new(name: DomainName, transport: Arc<dyn Transport>) -> Self {
        Self {
            name,
            transport,
            members: RwLock::new(Vec::new()),
        }
    }

    /// Returns the domain name.
    #[must_use]
    pub fn name(&self) -> &DomainName {
        &self.name
    }

    /// Returns the room key of `id` within this domain.
    #[must_use]
    pub fn room_key(&self, id: &MemberId) -> RoomKey {
        RoomKey::new(self.name.clone(), id.clone())
    }

    /// Joins `connection` to the room of `id`, tracking `id` if new.
    ///
    /// Adding a second connection under a known id only joins that
    /// connection; the id is not tracked twice.
    pub async fn add(&self, id: MemberId, connection: ConnectionId) {
        let mut members = self.members.write().await;
        self.transport.join(connection, &self.room_key(&id));
        if !members.contains(&id) {
            tracing::debug!(domain = %self.name, member = %id, "member added");
            members.push(id);
        }
    }

    /// Removes a member id or a single connection.
    pub async fn remove(&self, target: impl Into<RemoveTarget>) {
        match target.into() {
            RemoveTarget::Member(id) => {
                self.remove_by_id(&id).await;
            }
            RemoveTarget::Connection(connection) => self.remove_connection(connection).await,
        }
    }

    /// Makes `connection` leave every room this domain tracks.
    ///
    /// One leave per tracked id, whether or not the connection ever joined
    /// it. The member list is left untouched.
    pub async fn remove_connection(&self, connection: ConnectionId) {
        let members = self.members.read().await;
        for id in members.iter() {
            self.transport.leave(connection, &self.room_key(id));
        }
    }

    /// Removes `id`, making every live connection leave its room.
    ///
    /// Returns `false` (and does nothing) if `id` is not tracked.
    pub async fn remove_by_id(&self, id: &MemberId) -> bool {
        let mut members = self.members.write().await;
        let Some(pos) = members.iter().position(|m| m == id) else {
            return false;
        };
        let room = self.room_key(id);
        for connection in self.transport.connections() {
            self.transport.leave(connection, &room);
        }
        members.remove(pos);
        tracing::debug!(domain = %self.name, member = %id, "member removed");
        true
    }

    /// Makes every live connection leave every tracked room, then forgets
    /// all members.
    pub async fn empty(&self) {
        let mut members = self.members.write().await;
        let rooms: Vec<RoomKey> = members.iter().map(|id| self.room_key(id)).collect();
        for connection in self.transport.connections() {
            for room in &rooms {
                self.transport.leave(connection, room);
            }
        }
        tracing::debug!(domain = %self.name, members = members.len(), "domain emptied");
        members.clear();
    }

    /// Emits to the room of `id` without checking that `id` is tracked.
    ///
    /// Returns the number of connections reached.
    pub fn send(&self, id: &MemberId, event: &str, data: &serde_json::Value) -> usize {
        self.transport.emit(&self.room_key(id), event, data)
    }

    /// Sends once per tracked id, in member order.
    ///
    /// Returns the ids sent to.
    pub async fn broadcast(&self, event: &str, data: &serde_json::Value) -> Vec<MemberId> {
        let members = self.members.read().await;
        self.send_all(members.iter().cloned(), event, data)
    }

    /// Sends once per id tracked here or in `other`.
    ///
    /// Own ids go first in member order, then ids only `other` has.
    pub async fn emit_to_union<'a>(
        &self,
        other: impl Into<IdSource<'a>>,
        event: &str,
        data: &serde_json::Value,
    ) -> Vec<MemberId> {
        let other_ids = other.into().to_vec().await;
        let members = self.members.read().await;
        let mut seen: HashSet<&MemberId> = HashSet::with_capacity(members.len() + other_ids.len());
        let union = members
            .iter()
            .chain(other_ids.iter())
            .filter(|id| seen.insert(*id))
            .cloned();
        self.send_all(union, event, data)
    }

    /// Sends once per tracked id that `other` also has.
    pub async fn emit_to_intersection<'a>(
        &self,
        other: impl Into<IdSource<'a>>,
        event: &str,
        data: &serde_json::Value,
    ) -> Vec<MemberId> {
        let other_ids = other.into().resolve().await;
        let members = self.members.read().await;
        let both = members.iter().filter(|id| other_ids.contains(*id)).cloned();
        self.send_all(both, event, data)
    }

    /// Sends once per tracked id that `other` does not have.
    pub async fn emit_to_difference<'a>(
        &self,
        other: impl Into<IdSource<'a>>,
        event: &str,
        data: &serde_json::Value,
    ) -> Vec<MemberId> {
        let other_ids = other.into().resolve().await;
        let members = self.members.read().await;
        let only_here = members.iter().filter(|id| !other_ids.contains(*id)).cloned();
        self.send_all(only_here, event, data)
    }

    /// Returns a snapshot of the tracked ids in member order.
    pub async fn ids(&self) -> Vec<MemberId> {
        self.members.read().await.clone()
    }

    /// Returns `true` if `id` is tracked.
    pub async fn contains(&self, id: &MemberId) -> bool {
        self.members.read().await.contains(id)
    }

    /// Returns the number of tracked ids.
    pub async fn len(&self) -> usize {
        self.members.read().await.len()
    }

    /// Returns `true` if no id is tracked.
    pub async fn is_empty(&self) -> bool {
        self.members.read().await.is_empty()
    }

    fn send_all(
        &self,
        ids: impl Iterator<Item = MemberId>,
        event: &str,
        data: &serde_json::Value,
    ) -> Vec<MemberId> {
        let recipients: Vec<MemberId> = ids
            .inspect(|id| {
                self.send(id, event, data);
            })
            .collect();
        tracing::debug!(
            domain = %self.name,
            event,
            recipients = recipients.len(),
            "domain emit"
        );
        recipients
    }
}
