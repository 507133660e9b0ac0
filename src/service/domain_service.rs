//! Domain service: resolves names and drives domain operations.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::domain::{
    ConnectionId, Domain, DomainName, DomainRegistry, IdSource, MemberId, RemoveTarget, RoomKey,
};
use crate::error::GatewayError;

/// Which set-algebra emit to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SetOperation {
    /// Ids in either side.
    Union,
    /// Ids in both sides.
    Intersection,
    /// Ids in the target domain only.
    Difference,
}

impl fmt::Display for SetOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Union => "union",
            Self::Intersection => "intersection",
            Self::Difference => "difference",
        })
    }
}

/// Unparsed other side of a set operation, as received from a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OtherIds {
    /// Name of another domain.
    Domain(String),
    /// Explicit member ids.
    Ids(Vec<String>),
}

/// Snapshot of one domain.
#[derive(Debug, Clone)]
pub struct DomainSummary {
    /// Domain name.
    pub name: DomainName,
    /// Tracked member ids, in insertion order.
    pub members: Vec<MemberId>,
}

impl DomainSummary {
    async fn of(domain: &Domain) -> Self {
        Self {
            name: domain.name().clone(),
            members: domain.ids().await,
        }
    }
}

/// Orchestration layer between the outer surfaces and the domain registry.
///
/// Every method parses raw names first, so the domain layer only ever sees
/// valid [`DomainName`]s and [`MemberId`]s.
#[derive(Debug, Clone)]
pub struct DomainService {
    registry: Arc<DomainRegistry>,
}

impl DomainService {
    /// Creates a new `DomainService`.
    #[must_use]
    pub fn new(registry: Arc<DomainRegistry>) -> Self {
        Self { registry }
    }

    /// Returns a reference to the inner [`DomainRegistry`].
    #[must_use]
    pub fn registry(&self) -> &Arc<DomainRegistry> {
        &self.registry
    }

    /// Adds `connection` to `domain` as `member`, creating the domain on
    /// first use.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidName`] for a rejected name, or
    /// [`GatewayError::TransportUnavailable`] if the registry cannot create
    /// domains.
    pub async fn join(
        &self,
        domain: &str,
        member: &str,
        connection: ConnectionId,
    ) -> Result<RoomKey, GatewayError> {
        let name = DomainName::parse(domain)?;
        let member = MemberId::parse(member)?;
        let room = self
            .registry
            .join(&name, member, connection)
            .await
            .ok_or(GatewayError::TransportUnavailable)?;
        tracing::info!(%connection, %room, "connection joined");
        Ok(room)
    }

    /// Makes `connection` leave every room of `domain`.
    ///
    /// Returns `false` if the domain does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidName`] for a rejected name.
    pub async fn leave(&self, domain: &str, connection: ConnectionId) -> Result<bool, GatewayError> {
        let name = DomainName::parse(domain)?;
        let Some(target) = self.registry.get(&name).await else {
            return Ok(false);
        };
        target.remove(RemoveTarget::Connection(connection)).await;
        tracing::info!(%connection, domain = %name, "connection left");
        Ok(true)
    }

    /// Returns a snapshot of every domain, sorted by name.
    pub async fn list_domains(&self) -> Vec<DomainSummary> {
        let mut summaries = Vec::new();
        for name in self.registry.names().await {
            if let Some(domain) = self.registry.get(&name).await {
                summaries.push(DomainSummary::of(&domain).await);
            }
        }
        summaries
    }

    /// Returns a snapshot of one domain.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::DomainNotFound`] if no such domain exists.
    pub async fn describe(&self, domain: &str) -> Result<DomainSummary, GatewayError> {
        let target = self.existing(domain).await?;
        Ok(DomainSummary::of(&target).await)
    }

    /// Empties and deletes a domain.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::DomainNotFound`] if no such domain exists.
    pub async fn delete_domain(&self, domain: &str) -> Result<(), GatewayError> {
        let name = DomainName::parse(domain)?;
        if !self.registry.delete_domain(&name).await {
            return Err(GatewayError::DomainNotFound(name.to_string()));
        }
        Ok(())
    }

    /// Removes a member id from a domain.
    ///
    /// Returns `false` if the id was not tracked.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::DomainNotFound`] if no such domain exists.
    pub async fn remove_member(&self, domain: &str, member: &str) -> Result<bool, GatewayError> {
        let target = self.existing(domain).await?;
        let member = MemberId::parse(member)?;
        let removed = target.remove_by_id(&member).await;
        tracing::info!(domain = %target.name(), %member, removed, "member removal");
        Ok(removed)
    }

    /// Emits to a single member's room.
    ///
    /// Returns the number of connections reached.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::DomainNotFound`] if no such domain exists.
    pub async fn send(
        &self,
        domain: &str,
        member: &str,
        event: &str,
        data: &serde_json::Value,
    ) -> Result<usize, GatewayError> {
        let target = self.existing(domain).await?;
        let member = MemberId::parse(member)?;
        let delivered = target.send(&member, event, data);
        tracing::info!(domain = %target.name(), %member, event, delivered, "send");
        Ok(delivered)
    }

    /// Emits once per tracked member of a domain.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::DomainNotFound`] if no such domain exists.
    pub async fn broadcast(
        &self,
        domain: &str,
        event: &str,
        data: &serde_json::Value,
    ) -> Result<Vec<MemberId>, GatewayError> {
        let target = self.existing(domain).await?;
        let recipients = target.broadcast(event, data).await;
        tracing::info!(domain = %target.name(), event, recipients = recipients.len(), "broadcast");
        Ok(recipients)
    }

    /// Runs a set-algebra emit of `domain` against `other`.
    ///
    /// An `other` domain that does not exist or whose name is rejected
    /// counts as an empty id set; rejected ids in an `other` list are
    /// skipped.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::DomainNotFound`] if `domain` does not exist,
    /// or [`GatewayError::InvalidName`] if its name is rejected.
    pub async fn emit_set(
        &self,
        domain: &str,
        op: SetOperation,
        other: &OtherIds,
        event: &str,
        data: &serde_json::Value,
    ) -> Result<Vec<MemberId>, GatewayError> {
        let target = self.existing(domain).await?;

        let other_domain;
        let other_ids: Vec<MemberId>;
        let source = match other {
            OtherIds::Domain(raw) => {
                let found = match DomainName::parse(raw.as_str()) {
                    Ok(name) => self.registry.get(&name).await,
                    Err(_) => None,
                };
                match found {
                    Some(found) => {
                        other_domain = found;
                        IdSource::Domain(&other_domain)
                    }
                    None => IdSource::Ids(&[]),
                }
            }
            OtherIds::Ids(raw) => {
                other_ids = raw
                    .iter()
                    .filter_map(|id| MemberId::parse(id.as_str()).ok())
                    .collect();
                IdSource::Ids(&other_ids)
            }
        };

        let recipients = match op {
            SetOperation::Union => target.emit_to_union(source, event, data).await,
            SetOperation::Intersection => target.emit_to_intersection(source, event, data).await,
            SetOperation::Difference => target.emit_to_difference(source, event, data).await,
        };
        tracing::info!(
            domain = %target.name(),
            %op,
            event,
            recipients = recipients.len(),
            "set emit"
        );
        Ok(recipients)
    }

    /// Empties and forgets every domain.
    pub async fn shutdown(&self) {
        self.registry.shutdown().await;
    }

    async fn existing(&self, domain: &str) -> Result<Arc<Domain>, GatewayError> {
        let name = DomainName::parse(domain)?;
        self.registry
            .get(&name)
            .await
            .ok_or_else(|| GatewayError::DomainNotFound(name.to_string()))
    }
}
