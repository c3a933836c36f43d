//! Filtering and paging log rows.

use serde::Serialize;

use super::predicate::Query;
use crate::zeeklog::{OwnedRecord, ZeekLog};

/// Default page size.
pub const DEFAULT_PAGE_LIMIT: i64 = 200;

/// Largest page size a request may ask for.
pub const MAX_PAGE_LIMIT: i64 = 5000;

/// A page request against one log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRequest {
    pub query: String,
    pub offset: i64,
    pub limit: i64,
}

impl Default for LogRequest {
    fn default() -> Self {
        Self {
            query: String::new(),
            offset: 0,
            limit: DEFAULT_PAGE_LIMIT,
        }
    }
}

impl LogRequest {
    /// First page of `query` with the default limit.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }

    pub fn with_offset(mut self, offset: i64) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_limit(mut self, limit: i64) -> Self {
        self.limit = limit;
        self
    }

    /// Offset floored at zero.
    pub fn clamped_offset(&self) -> usize {
        usize::try_from(self.offset.max(0)).unwrap_or(usize::MAX)
    }

    /// Limit clamped to `1..=MAX_PAGE_LIMIT`.
    pub fn clamped_limit(&self) -> usize {
        self.limit.clamp(1, MAX_PAGE_LIMIT) as usize
    }
}

/// One page of matching rows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LogPage {
    pub fields: Vec<String>,
    pub offset: usize,
    pub limit: usize,
    /// Number of matching rows across all pages.
    pub total: usize,
    pub rows: Vec<OwnedRecord>,
    pub header: Vec<String>,
}

/// Evaluate `request` against `log`.
///
/// Rows are tested in file order and the matches sliced to
/// `[offset, offset + limit)`.
pub fn select(log: &ZeekLog, request: &LogRequest) -> LogPage {
    let offset = request.clamped_offset();
    let limit = request.clamped_limit();
    let query = Query::compile(&request.query);

    let fields = log.field_names();
    let mut total = 0;
    let mut rows = Vec::new();
    for record in log.records(&fields) {
        if !query.matches(&record) {
            continue;
        }
        if total >= offset && rows.len() < limit {
            rows.push(record.to_owned_record());
        }
        total += 1;
    }

    LogPage {
        fields,
        offset,
        limit,
        total,
        rows,
        header: log.header.clone(),
    }
}
