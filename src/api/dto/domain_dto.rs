//! Domain-related DTOs for list and get operations.

use serde::Serialize;
use utoipa::ToSchema;

use super::common_dto::PaginationMeta;
use crate::service::DomainSummary;

/// Domain summary for list responses.
#[derive(Debug, Serialize, ToSchema)]
pub struct DomainSummaryDto {
    /// Domain name.
    pub name: String,
    /// Number of tracked member ids.
    pub member_count: usize,
}

impl From<&DomainSummary> for DomainSummaryDto {
    fn from(summary: &DomainSummary) -> Self {
        Self {
            name: summary.name.to_string(),
            member_count: summary.members.len(),
        }
    }
}

/// Paginated list response for `GET /domains`.
#[derive(Debug, Serialize, ToSchema)]
pub struct DomainListResponse {
    /// Domain summaries.
    pub data: Vec<DomainSummaryDto>,
    /// Pagination metadata.
    pub pagination: PaginationMeta,
}

/// Single domain detail for `GET /domains/{name}`.
#[derive(Debug, Serialize, ToSchema)]
pub struct DomainDetailResponse {
    /// Domain name.
    pub name: String,
    /// Tracked member ids, in insertion order.
    pub members: Vec<String>,
    /// Number of tracked member ids.
    pub member_count: usize,
}

impl From<DomainSummary> for DomainDetailResponse {
    fn from(summary: DomainSummary) -> Self {
        let members: Vec<String> = summary.members.iter().map(ToString::to_string).collect();
        Self {
            name: summary.name.to_string(),
            member_count: members.len(),
            members,
        }
    }
}
