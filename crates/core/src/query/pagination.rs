//! Pagination metadata for list responses.

use serde::{Deserialize, Serialize};

/// Address of an adjacent page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRef {
    pub page: u64,
    pub limit: u64,
}

/// `next`/`prev` links; serializes as `{}` when neither applies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<PageRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prev: Option<PageRef>,
}

impl Pagination {
    /// `next` is present iff records exist past this window, `prev` iff
    /// `page > 1`.
    pub fn compute(page: u64, limit: u64, total: u64) -> Self {
        let next = (page.saturating_mul(limit) < total).then_some(PageRef {
            page: page + 1,
            limit,
        });
        let prev = (page > 1).then_some(PageRef {
            page: page - 1,
            limit,
        });
        Self { next, prev }
    }
}
