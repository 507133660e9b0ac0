//! Emit DTOs: send, broadcast and set-algebra requests.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::MemberId;
use crate::service::OtherIds;

/// Request body for send and broadcast.
#[derive(Debug, Deserialize, ToSchema)]
pub struct EmitRequest {
    /// Event name.
    pub event: String,
    /// Event payload. Defaults to `null`.
    #[serde(default)]
    #[schema(value_type = Object)]
    pub data: serde_json::Value,
}

/// Other side of a set-algebra emit: a domain name or an id list.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum OtherDto {
    /// Another domain, by name.
    Domain {
        /// Domain name.
        domain: String,
    },
    /// Explicit member ids.
    Ids {
        /// Member ids.
        ids: Vec<String>,
    },
}

impl From<OtherDto> for OtherIds {
    fn from(dto: OtherDto) -> Self {
        match dto {
            OtherDto::Domain { domain } => Self::Domain(domain),
            OtherDto::Ids { ids } => Self::Ids(ids),
        }
    }
}

/// Request body for union, intersection and difference.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SetEmitRequest {
    /// The other side of the operation.
    pub other: OtherDto,
    /// Event name.
    pub event: String,
    /// Event payload. Defaults to `null`.
    #[serde(default)]
    #[schema(value_type = Object)]
    pub data: serde_json::Value,
}

/// Response body for broadcast and set-algebra emits.
#[derive(Debug, Serialize, ToSchema)]
pub struct EmitResponse {
    /// Member ids the event was sent to, in send order.
    pub recipients: Vec<String>,
    /// Number of recipients.
    pub count: usize,
}

impl From<Vec<MemberId>> for EmitResponse {
    fn from(ids: Vec<MemberId>) -> Self {
        Self {
            count: ids.len(),
            recipients: ids.iter().map(ToString::to_string).collect(),
        }
    }
}

/// Response body for a single-member send.
#[derive(Debug, Serialize, ToSchema)]
pub struct SendResponse {
    /// Number of connections the event was queued for.
    pub delivered: usize,
}
