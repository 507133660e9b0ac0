//! The "other side" of a set-algebra emit.

use std::collections::HashSet;

use super::{Domain, MemberId};

/// Source of member ids for set operations: another domain, or a plain list.
#[derive(Debug, Clone, Copy)]
pub enum IdSource<'a> {
    /// The ids currently tracked by another domain.
    Domain(&'a Domain),
    /// An explicit list of ids.
    Ids(&'a [MemberId]),
}

impl IdSource<'_> {
    /// Returns the ids in source order, duplicates included.
    ///
    /// For a domain this is a snapshot: the domain's lock is released before
    /// returning, so the caller may lock any domain afterwards.
    pub async fn to_vec(&self) -> Vec<MemberId> {
        match self {
            Self::Domain(domain) => domain.ids().await,
            Self::Ids(ids) => ids.to_vec(),
        }
    }

    /// Returns the ids as a set.
    pub async fn resolve(&self) -> HashSet<MemberId> {
        self.to_vec().await.into_iter().collect()
    }
}

impl<'a> From<&'a Domain> for IdSource<'a> {
    fn from(domain: &'a Domain) -> Self {
        Self::Domain(domain)
    }
}

impl<'a> From<&'a [MemberId]> for IdSource<'a> {
    fn from(ids: &'a [MemberId]) -> Self {
        Self::Ids(ids)
    }
}

impl<'a> From<&'a Vec<MemberId>> for IdSource<'a> {
    fn from(ids: &'a Vec<MemberId>) -> Self {
        Self::Ids(ids.as_slice())
    }
}
