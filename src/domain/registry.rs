//! Registry of named domains.
//!
//! [`DomainRegistry`] stores every live [`Domain`] in a `HashMap` behind a
//! [`tokio::sync::RwLock`]. Domains are handed out as `Arc<Domain>` so that
//! two lookups of the same name return the same instance.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use super::{ConnectionId, Domain, DomainName, MemberId, RoomKey, Transport};

/// Lookup and creation point for [`Domain`]s.
///
/// Constructed once at startup and passed around by `Arc`. A registry built
/// with [`DomainRegistry::lookup_only`] never creates domains.
#[derive(Debug)]
pub struct DomainRegistry {
    transport: Option<Arc<dyn Transport>>,
    domains: RwLock<HashMap<DomainName, Arc<Domain>>>,
}

impl DomainRegistry {
    /// Creates an empty registry that creates domains on `transport`.
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport: Some(transport),
            domains: RwLock::new(HashMap::new()),
        }
    }

    /// Creates an empty registry without a transport.
    ///
    /// [`DomainRegistry::domain`] then behaves like [`DomainRegistry::get`].
    #[must_use]
    pub fn lookup_only() -> Self {
        Self {
            transport: None,
            domains: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the domain called `name`, creating it if needed.
    ///
    /// Returns `None` only when the domain does not exist and the registry
    /// has no transport to create it on.
    pub async fn domain(&self, name: &DomainName) -> Option<Arc<Domain>> {
        if let Some(existing) = self.get(name).await {
            return Some(existing);
        }
        let transport = self.transport.as_ref()?;
        let mut map = self.domains.write().await;
        // another caller may have created it between the two locks
        let domain = map.entry(name.clone()).or_insert_with(|| {
            tracing::info!(domain = %name, "domain created");
            Arc::new(Domain::new(name.clone(), Arc::clone(transport)))
        });
        Some(Arc::clone(domain))
    }

    /// Adds `connection` to the domain called `name` as `id`, creating the
    /// domain if needed, and returns the joined room.
    ///
    /// The map lock is held until the member is tracked, so a concurrent
    /// [`DomainRegistry::delete_domain`] either empties the room afterwards
    /// or the join lands on the recreated domain. A join never leaves a
    /// room behind on a domain the registry no longer holds.
    ///
    /// Returns `None` under the same condition as [`DomainRegistry::domain`].
    pub async fn join(
        &self,
        name: &DomainName,
        id: MemberId,
        connection: ConnectionId,
    ) -> Option<RoomKey> {
        {
            let map = self.domains.read().await;
            if let Some(domain) = map.get(name) {
                let room = domain.room_key(&id);
                domain.add(id, connection).await;
                return Some(room);
            }
        }
        let transport = self.transport.as_ref()?;
        let mut map = self.domains.write().await;
        let domain = map.entry(name.clone()).or_insert_with(|| {
            tracing::info!(domain = %name, "domain created");
            Arc::new(Domain::new(name.clone(), Arc::clone(transport)))
        });
        let room = domain.room_key(&id);
        domain.add(id, connection).await;
        Some(room)
    }

    /// Returns the domain called `name` without creating it.
    pub async fn get(&self, name: &DomainName) -> Option<Arc<Domain>> {
        self.domains.read().await.get(name).cloned()
    }

    /// Empties and forgets the domain called `name`.
    ///
    /// Returns `false` if there was no such domain.
    pub async fn delete_domain(&self, name: &DomainName) -> bool {
        let removed = self.domains.write().await.remove(name);
        let Some(domain) = removed else {
            return false;
        };
        domain.empty().await;
        tracing::info!(domain = %name, "domain deleted");
        true
    }

    /// Returns all domain names, sorted.
    pub async fn names(&self) -> Vec<DomainName> {
        let mut names: Vec<DomainName> = self.domains.read().await.keys().cloned().collect();
        names.sort();
        names
    }

    /// Returns the number of domains.
    pub async fn len(&self) -> usize {
        self.domains.read().await.len()
    }

    /// Returns `true` if the registry holds no domains.
    pub async fn is_empty(&self) -> bool {
        self.domains.read().await.is_empty()
    }

    /// Empties and forgets every domain.
    pub async fn shutdown(&self) {
        let drained: Vec<Arc<Domain>> = self.domains.write().await.drain().map(|(_, d)| d).collect();
        for domain in &drained {
            domain.empty().await;
        }
        tracing::info!(domains = drained.len(), "domain registry shut down");
    }
}
