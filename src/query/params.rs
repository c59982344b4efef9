use std::fmt;
use std::str::FromStr;

use crate::api::types::{Severity, Status};
use crate::error::QueryError;
use crate::query::cursor::Cursor;

/// Columns the listing endpoint accepts for `sort`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortField {
    Id,
    Title,
    Severity,
    Status,
    CreatedAt,
}

impl SortField {
    pub const ALL: [SortField; 5] = [
        SortField::Id,
        SortField::Title,
        SortField::Severity,
        SortField::Status,
        SortField::CreatedAt,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SortField::Id => "id",
            SortField::Title => "title",
            SortField::Severity => "severity",
            SortField::Status => "status",
            SortField::CreatedAt => "createdAt",
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortField {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortField::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| QueryError::UnknownSortField(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

impl FromStr for SortOrder {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(QueryError::UnknownSortOrder(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Sort {
    pub field: SortField,
    pub order: SortOrder,
}

impl Sort {
    pub const fn new(field: SortField, order: SortOrder) -> Self {
        Self { field, order }
    }
}

impl Default for Sort {
    fn default() -> Self {
        Self::new(SortField::CreatedAt, SortOrder::Desc)
    }
}

/// The allowed page sizes, in display order. The first one is the default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSizes(Vec<u32>);

impl PageSizes {
    pub fn new(sizes: Vec<u32>) -> Result<Self, QueryError> {
        let mut deduped: Vec<u32> = Vec::with_capacity(sizes.len());
        for size in sizes {
            if size == 0 {
                return Err(QueryError::PageSizeNotAllowed {
                    size,
                    allowed: deduped,
                });
            }
            if !deduped.contains(&size) {
                deduped.push(size);
            }
        }
        if deduped.is_empty() {
            return Err(QueryError::NoPageSizes);
        }
        Ok(Self(deduped))
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.0
    }

    pub fn default_size(&self) -> u32 {
        self.0[0]
    }

    pub fn validate(&self, size: u32) -> Result<u32, QueryError> {
        if self.0.contains(&size) {
            Ok(size)
        } else {
            Err(QueryError::PageSizeNotAllowed {
                size,
                allowed: self.0.clone(),
            })
        }
    }

    /// The size after `current`, wrapping around.
    pub fn next_after(&self, current: u32) -> u32 {
        match self.0.iter().position(|s| *s == current) {
            Some(idx) => self.0[(idx + 1) % self.0.len()],
            None => self.default_size(),
        }
    }
}

impl Default for PageSizes {
    fn default() -> Self {
        Self(vec![10, 20, 40])
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filters {
    pub status: Option<Status>,
    pub severity: Option<Severity>,
    pub service: Option<String>,
    pub search: Option<String>,
}

impl Filters {
    /// Normalizes free text: blank input means no search.
    pub fn search_term(raw: &str) -> Option<String> {
        let trimmed = raw.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }

    fn push_pairs(&self, pairs: &mut Vec<(&'static str, String)>) {
        if let Some(status) = self.status {
            pairs.push(("status", status.as_str().to_string()));
        }
        if let Some(severity) = self.severity {
            pairs.push(("severity", severity.as_str().to_string()));
        }
        if let Some(search) = &self.search {
            pairs.push(("search", search.clone()));
        }
        if let Some(service) = &self.service {
            pairs.push(("service", service.clone()));
        }
    }
}

/// Parameters for `GET /incidents`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub filters: Filters,
    pub sort: Sort,
    pub limit: u32,
    pub cursor: Option<Cursor>,
}

impl ListQuery {
    pub fn first_page(limit: u32, sort: Sort) -> Self {
        Self {
            filters: Filters::default(),
            sort,
            limit,
            cursor: None,
        }
    }

    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("limit", self.limit.to_string())];
        self.filters.push_pairs(&mut pairs);
        pairs.push(("sort", self.sort.field.as_str().to_string()));
        pairs.push(("order", self.sort.order.as_str().to_string()));
        if let Some(cursor) = &self.cursor {
            pairs.push(("cursor", cursor.as_str().to_string()));
        }
        pairs
    }
}

/// Parameters for `GET /incidents/counts`: filters only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CountsQuery {
    pub filters: Filters,
}

impl CountsQuery {
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        self.filters.push_pairs(&mut pairs);
        pairs
    }
}
