//! Validated names for domains, members and transport rooms.
//!
//! [`DomainName`] and [`MemberId`] are newtypes over `String` so the two
//! cannot be swapped by accident. [`RoomKey`] is the structured identity of
//! a transport room and renders as `domain:member` on the wire.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::GatewayError;

/// Separator between the domain and member parts of a rendered room key.
pub const ROOM_SEPARATOR: char = ':';

/// Name of a domain.
///
/// Must be non-empty and must not contain [`ROOM_SEPARATOR`], so that a
/// rendered [`RoomKey`] always splits back into the same pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct DomainName(String);

impl DomainName {
    /// Parses a domain name.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidName`] if `name` is empty or contains
    /// the room separator.
    pub fn parse(name: impl Into<String>) -> Result<Self, GatewayError> {
        let name = name.into();
        if name.is_empty() {
            return Err(GatewayError::InvalidName(
                "domain name must not be empty".to_string(),
            ));
        }
        if name.contains(ROOM_SEPARATOR) {
            return Err(GatewayError::InvalidName(format!(
                "domain name {name:?} must not contain '{ROOM_SEPARATOR}'"
            )));
        }
        Ok(Self(name))
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DomainName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for DomainName {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(raw).map_err(serde::de::Error::custom)
    }
}

/// Caller-chosen identifier of a member within a domain.
///
/// One member id may stand for several live connections.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct MemberId(String);

impl MemberId {
    /// Parses a member id.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidName`] if `id` is empty.
    pub fn parse(id: impl Into<String>) -> Result<Self, GatewayError> {
        let id = id.into();
        if id.is_empty() {
            return Err(GatewayError::InvalidName(
                "member id must not be empty".to_string(),
            ));
        }
        Ok(Self(id))
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for MemberId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(raw).map_err(serde::de::Error::custom)
    }
}

/// Identity of a transport room: one member inside one domain.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RoomKey {
    domain: DomainName,
    member: MemberId,
}

impl RoomKey {
    /// Builds the room key for `member` inside `domain`.
    #[must_use]
    pub fn new(domain: DomainName, member: MemberId) -> Self {
        Self { domain, member }
    }
}

impl fmt::Display for RoomKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{ROOM_SEPARATOR}{}", self.domain, self.member)
    }
}

impl Serialize for RoomKey {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn domain(name: &str) -> DomainName {
        let Ok(d) = DomainName::parse(name) else {
            panic!("valid domain name");
        };
        d
    }

    fn member(id: &str) -> MemberId {
        let Ok(m) = MemberId::parse(id) else {
            panic!("valid member id");
        };
        m
    }

    #[test]
    fn domain_name_rejects_separator() {
        let result = DomainName::parse("lobby:a");
        assert!(matches!(result, Err(GatewayError::InvalidName(_))));
    }

    #[test]
    fn domain_name_rejects_empty() {
        assert!(DomainName::parse("").is_err());
    }

    #[test]
    fn member_id_allows_separator() {
        assert_eq!(member("a:b").as_str(), "a:b");
    }

    #[test]
    fn member_id_rejects_empty() {
        assert!(MemberId::parse(String::new()).is_err());
    }

    #[test]
    fn room_key_renders_domain_then_member() {
        let key = RoomKey::new(domain("lobby"), member("u1"));
        assert_eq!(key.to_string(), "lobby:u1");
    }

    #[test]
    fn room_keys_across_domains_are_distinct() {
        let a = RoomKey::new(domain("lobby"), member("u1"));
        let b = RoomKey::new(domain("vip"), member("u1"));
        assert_ne!(a, b);
        assert_ne!(a.to_string(), b.to_string());
    }

    #[test]
    fn deserialize_validates() {
        let ok: Result<DomainName, _> = serde_json::from_str("\"lobby\"");
        assert!(ok.is_ok());
        let bad: Result<DomainName, _> = serde_json::from_str("\"lob:by\"");
        assert!(bad.is_err());
    }

    #[test]
    fn room_key_serializes_as_string() {
        let key = RoomKey::new(domain("vip"), member("u3"));
        let json = serde_json::to_string(&key).unwrap_or_default();
        assert_eq!(json, "\"vip:u3\"");
    }
}
