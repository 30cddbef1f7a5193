//! # Execution Adapter
//!
//! The seam between this crate and the document store's query engine. An
//! adapter executes a parameterized [`Query`] and returns one page of typed
//! rows, or a single scalar. Connection and session management live behind
//! the implementation.

use crate::error::AdapterError;
use crate::query_builder::Query;
use async_trait::async_trait;
use serde::de::DeserializeOwned;

pub type AdapterResult<T> = std::result::Result<T, AdapterError>;

/// One page of rows as returned by the store
#[derive(Debug, Clone, PartialEq)]
pub struct FeedPage<T> {
    pub rows: Vec<T>,
    /// Opaque cursor for the next page; `None` when iteration is exhausted
    pub continuation_token: Option<String>,
    /// Store-reported cost of producing this page
    pub request_charge: f64,
}

/// A single scalar result with its cost
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarResponse<T> {
    pub value: T,
    pub request_charge: f64,
}

/// Executes compiled queries against the document store
#[async_trait]
pub trait ExecutionAdapter: Send + Sync {
    /// Fetch exactly one page. `max_item_count` is the store's native page
    /// size hint.
    async fn execute_page<T>(
        &self,
        query: &Query,
        continuation_token: Option<&str>,
        max_item_count: Option<u32>,
    ) -> AdapterResult<FeedPage<T>>
    where
        T: DeserializeOwned + Send + 'static;

    /// Execute a query whose result is a single value (e.g. `SELECT VALUE COUNT(1)`)
    async fn execute_scalar<T>(&self, query: &Query) -> AdapterResult<ScalarResponse<T>>
    where
        T: DeserializeOwned + Send + 'static;
}
