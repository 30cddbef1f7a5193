//! Page requests and the query rewriting each paging strategy needs.
//!
//! A `PageRequest` is decided once at the call boundary (see
//! [`PageRequest::resolve`]) and never re-derived downstream.

use super::query::Query;
use super::scanner::{
    contains_keyword, find_top_level, infer_alias, is_distinct_projection, locate_clause_keyword,
    strip_paging_clauses,
};
use crate::config::PaginationConfig;
use crate::constants::{keywords, parameters, COUNT_PROJECTION, OFFSET_LIMIT_CLAUSE};
use crate::error::{QueryError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Paging parameters as they arrive from the calling layer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageParams {
    pub continuation_token: Option<String>,
    pub offset: Option<i64>,
    pub items_per_page: Option<i64>,
    pub order_by: Option<String>,
}

/// Represents one page request under one of the three paging strategies
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "strategy")]
pub enum PageRequest {
    #[serde(rename_all = "camelCase")]
    Continuation {
        continuation_token: Option<String>,
        items_per_page: u32,
    },
    #[serde(rename_all = "camelCase")]
    Offset { offset: u32, items_per_page: u32 },
    #[serde(rename_all = "camelCase")]
    OrderedOffset {
        offset: u32,
        items_per_page: u32,
        order_by: String,
    },
}

/// Strategy label, used for logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagingStrategy {
    Continuation,
    OffsetLimit,
    OrderedOffsetLimit,
}

impl fmt::Display for PagingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PagingStrategy::Continuation => write!(f, "continuation"),
            PagingStrategy::OffsetLimit => write!(f, "offset_limit"),
            PagingStrategy::OrderedOffsetLimit => write!(f, "ordered_offset_limit"),
        }
    }
}

impl PageRequest {
    /// First page of a continuation-token walk
    pub fn first_page(items_per_page: u32) -> Self {
        Self::Continuation {
            continuation_token: None,
            items_per_page,
        }
    }

    pub fn continuation(token: impl Into<String>, items_per_page: u32) -> Self {
        Self::Continuation {
            continuation_token: Some(token.into()),
            items_per_page,
        }
    }

    pub fn offset(offset: u32, items_per_page: u32) -> Self {
        Self::Offset {
            offset,
            items_per_page,
        }
    }

    pub fn ordered(offset: u32, items_per_page: u32, order_by: &str) -> Self {
        Self::OrderedOffset {
            offset,
            items_per_page,
            order_by: order_by.to_string(),
        }
    }

    /// Decide the strategy from the populated fields.
    ///
    /// A missing `itemsPerPage` falls back to the configured default. An
    /// `orderBy` without `offset` starts at offset 0.
    pub fn resolve(params: &PageParams, config: &PaginationConfig) -> Result<Self> {
        let items_per_page = params
            .items_per_page
            .unwrap_or_else(|| i64::from(config.default_items_per_page));
        if items_per_page <= 0 {
            return Err(QueryError::invalid_page_request(format!(
                "itemsPerPage must be positive, got {items_per_page}"
            )));
        }
        let items_per_page = u32::try_from(items_per_page).map_err(|_| {
            QueryError::invalid_page_request(format!("itemsPerPage {items_per_page} is too large"))
        })?;

        let offset = match params.offset {
            Some(offset) if offset < 0 => {
                return Err(QueryError::invalid_page_request(format!(
                    "offset must not be negative, got {offset}"
                )))
            }
            Some(offset) => Some(u32::try_from(offset).map_err(|_| {
                QueryError::invalid_page_request(format!("offset {offset} is too large"))
            })?),
            None => None,
        };

        let token = params
            .continuation_token
            .as_deref()
            .filter(|token| !token.is_empty());
        if token.is_some() && (offset.is_some() || params.order_by.is_some()) {
            return Err(QueryError::invalid_page_request(
                "continuationToken cannot be combined with offset or orderBy",
            ));
        }

        let request = match (offset, params.order_by.as_deref()) {
            (offset, Some(order_by)) => {
                Self::ordered(offset.unwrap_or(0), items_per_page, order_by)
            }
            (Some(offset), None) => Self::offset(offset, items_per_page),
            (None, None) => Self::Continuation {
                continuation_token: token.map(str::to_string),
                items_per_page,
            },
        };

        request.validate(config)?;
        Ok(request)
    }

    pub fn items_per_page(&self) -> u32 {
        match self {
            Self::Continuation { items_per_page, .. }
            | Self::Offset { items_per_page, .. }
            | Self::OrderedOffset { items_per_page, .. } => *items_per_page,
        }
    }

    pub fn offset_value(&self) -> Option<u32> {
        match self {
            Self::Continuation { .. } => None,
            Self::Offset { offset, .. } | Self::OrderedOffset { offset, .. } => Some(*offset),
        }
    }

    pub fn continuation_token(&self) -> Option<&str> {
        match self {
            Self::Continuation {
                continuation_token, ..
            } => continuation_token.as_deref(),
            _ => None,
        }
    }

    pub fn strategy(&self) -> PagingStrategy {
        match self {
            Self::Continuation { .. } => PagingStrategy::Continuation,
            Self::Offset { .. } => PagingStrategy::OffsetLimit,
            Self::OrderedOffset { .. } => PagingStrategy::OrderedOffsetLimit,
        }
    }

    /// Get current page number (1-indexed) for offset strategies
    pub fn current_page(&self) -> Option<u32> {
        let items_per_page = self.items_per_page();
        self.offset_value()
            .filter(|_| items_per_page > 0)
            .map(|offset| offset / items_per_page + 1)
    }

    /// Reject requests no adapter call should be made for
    pub fn validate(&self, config: &PaginationConfig) -> Result<()> {
        let items_per_page = self.items_per_page();
        if items_per_page == 0 {
            return Err(QueryError::invalid_page_request(
                "itemsPerPage must be positive, got 0",
            ));
        }
        if let Some(max) = config.max_items_per_page {
            if items_per_page > max {
                return Err(QueryError::invalid_page_request(format!(
                    "itemsPerPage {items_per_page} exceeds the maximum of {max}"
                )));
            }
        }
        if let Self::OrderedOffset { order_by, .. } = self {
            validate_field_path(order_by)?;
        }
        Ok(())
    }

    /// The query actually sent for the page fetch.
    ///
    /// `ORDER BY` and `OFFSET ... LIMIT ...` are only added when the text does
    /// not already contain them, so applying a request twice is a no-op.
    pub fn effective_query(&self, query: &Query) -> Result<Query> {
        match self {
            Self::Continuation { .. } => Ok(query.clone()),
            Self::Offset {
                offset,
                items_per_page,
            } => Ok(with_offset_limit(query.clone(), *offset, *items_per_page)),
            Self::OrderedOffset {
                offset,
                items_per_page,
                order_by,
            } => {
                let ordered = with_order_by(query, order_by)?;
                Ok(with_offset_limit(ordered, *offset, *items_per_page))
            }
        }
    }
}

/// Order-by fields are spliced into query text, so only identifier paths
/// (`name`, `u.lastName`) are accepted.
fn validate_field_path(field: &str) -> Result<()> {
    let mut chars = field.chars();
    let valid = match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
                && !field.ends_with('.')
                && !field.contains("..")
        }
        _ => false,
    };

    if valid {
        Ok(())
    } else {
        Err(QueryError::invalid_page_request(format!(
            "orderBy '{field}' is not a valid field path"
        )))
    }
}

fn with_order_by(query: &Query, field: &str) -> Result<Query> {
    let text = query.text();
    if contains_keyword(text, keywords::ORDER_BY) {
        return Ok(query.clone());
    }

    let qualified = if field.contains('.') {
        field.to_string()
    } else {
        format!("{}.{field}", infer_alias(text)?)
    };
    let clause = format!("{} {qualified}", keywords::ORDER_BY);

    // ORDER BY has to precede an OFFSET the caller already wrote
    let rewritten = match find_top_level(text, keywords::OFFSET) {
        Some(index) => format!("{} {clause} {}", text[..index].trim_end(), &text[index..]),
        None => format!("{} {clause}", text.trim_end()),
    };

    Ok(Query::from_parts(rewritten, query.parameters().to_vec()))
}

fn with_offset_limit(query: Query, offset: u32, items_per_page: u32) -> Query {
    let mut query = if contains_keyword(query.text(), keywords::OFFSET) {
        query
    } else {
        let text = format!("{} {OFFSET_LIMIT_CLAUSE}", query.text().trim_end());
        Query::from_parts(text, query.parameters().to_vec())
    };

    let referenced = query.referenced_parameters();
    for (name, value) in [
        (parameters::OFFSET, offset),
        (parameters::ITEMS_PER_PAGE, items_per_page),
    ] {
        if referenced.iter().any(|r| r == name) && !query.has_parameter(name) {
            query.bind(name, serde_json::Value::from(value));
        }
    }
    query
}

/// Derive the total-count query from the original, unmodified query.
///
/// `SELECT VALUE COUNT(1)` replaces everything before the top-level `FROM`;
/// any top-level `ORDER BY`/`OFFSET` tail is dropped since it cannot change
/// cardinality. Grouped or distinct projections are counted as a subquery so
/// the count reflects rows, not groups. Bindings are reused, minus any that
/// only the dropped tail referenced.
pub fn derive_count_query(query: &Query) -> Result<Query> {
    let text = query.text();
    locate_clause_keyword(text, keywords::FROM)?;

    let body = strip_paging_clauses(text);
    let from = locate_clause_keyword(body, keywords::FROM)?;
    let count_text = if find_top_level(body, keywords::GROUP_BY).is_some()
        || is_distinct_projection(body)
    {
        format!("{COUNT_PROJECTION} FROM ({body})")
    } else {
        format!("{COUNT_PROJECTION} {}", &body[from..])
    };

    Ok(Query::from_parts(count_text, query.parameters().to_vec()).retain_referenced())
}
