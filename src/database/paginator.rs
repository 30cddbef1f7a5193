//! # Paginator
//!
//! Executes one page of a compiled query plus its derived count query and
//! assembles a [`PagedResult`]. Every call is stateless given its
//! [`PageRequest`]; nothing is carried between calls.
//!
//! Per call:
//! 1. validate the request and derive the count query from the original
//!    query text (a missing top-level `FROM` fails here, before any I/O)
//! 2. resolve the effective query (inject `ORDER BY` / `OFFSET ... LIMIT ...`
//!    only when absent); it and the count query must bind exactly the
//!    parameters they reference, or the call fails before any I/O
//! 3. fetch one page, then the count (or both at once when
//!    `concurrent_count` is set)
//! 4. assemble the result; any failure discards both halves

use super::adapter::{ExecutionAdapter, FeedPage, ScalarResponse};
use crate::config::PaginationConfig;
use crate::criteria::Criteria;
use crate::error::{AdapterError, PageOperation, QueryError, Result};
use crate::logging::{log_error, log_query_operation};
use crate::models::PagedResult;
use crate::query_builder::{derive_count_query, PageRequest, Query};
use serde::de::DeserializeOwned;
use std::future::Future;
use std::sync::Arc;
use tokio::time::Instant;
use tracing::{debug, instrument, warn};

/// Pages queries through an [`ExecutionAdapter`]
#[derive(Debug)]
pub struct Paginator<A> {
    adapter: Arc<A>,
    config: PaginationConfig,
}

impl<A> Clone for Paginator<A> {
    fn clone(&self) -> Self {
        Self {
            adapter: Arc::clone(&self.adapter),
            config: self.config.clone(),
        }
    }
}

impl<A: ExecutionAdapter> Paginator<A> {
    pub fn new(adapter: Arc<A>, config: PaginationConfig) -> Self {
        Self { adapter, config }
    }

    pub fn config(&self) -> &PaginationConfig {
        &self.config
    }

    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    /// Page `query` under the configured query timeout
    pub async fn paginate<T>(&self, query: &Query, request: &PageRequest) -> Result<PagedResult<T>>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let deadline = Instant::now() + self.config.query_timeout();
        self.paginate_until(query, request, deadline).await
    }

    /// Compile `criteria` and page the result
    pub async fn paginate_criteria<C, T>(
        &self,
        criteria: &C,
        request: &PageRequest,
    ) -> Result<PagedResult<T>>
    where
        C: Criteria + ?Sized,
        T: DeserializeOwned + Send + 'static,
    {
        let query = criteria.compile();
        self.paginate(&query, request).await
    }

    /// Page `query`, failing with `DeadlineExceeded` if either adapter call
    /// is still outstanding at `deadline`
    #[instrument(skip_all, fields(strategy = %request.strategy()))]
    pub async fn paginate_until<T>(
        &self,
        query: &Query,
        request: &PageRequest,
        deadline: Instant,
    ) -> Result<PagedResult<T>>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let strategy = request.strategy().to_string();
        request.validate(&self.config)?;

        let count_query = derive_count_query(query)?;
        let effective = request.effective_query(query)?;

        effective.validate()?;
        count_query.validate()?;
        debug!(query = %effective, count_query = %count_query, "paginating query");

        let started = Instant::now();
        let page_fetch = self.fetch_page::<T>(&effective, request, deadline);
        let count_fetch = self.fetch_count(&count_query, deadline);

        let outcome = if self.config.concurrent_count {
            futures::try_join!(page_fetch, count_fetch)
        } else {
            match page_fetch.await {
                Ok(page) => count_fetch.await.map(|count| (page, count)),
                Err(e) => Err(e),
            }
        };

        let (page, count) = match outcome {
            Ok(parts) => parts,
            Err(e) => {
                log_query_operation("paginate", &strategy, "failed", None, Some(&e.to_string()));
                return Err(e);
            }
        };

        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        let result = assemble(request, page, count, elapsed_ms);

        log_query_operation(
            "paginate",
            &strategy,
            "completed",
            Some(elapsed_ms),
            Some(&format!(
                "items={} total={} cost={:.2}",
                result.items().len(),
                result.total_count(),
                result.cost_metric()
            )),
        );

        Ok(result)
    }

    async fn fetch_page<T>(
        &self,
        query: &Query,
        request: &PageRequest,
        deadline: Instant,
    ) -> Result<FeedPage<T>>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let call = self.adapter.execute_page::<T>(
            query,
            request.continuation_token(),
            Some(request.items_per_page()),
        );
        with_deadline(PageOperation::PageFetch, deadline, call).await
    }

    async fn fetch_count(&self, query: &Query, deadline: Instant) -> Result<ScalarResponse<u64>> {
        let call = self.adapter.execute_scalar::<u64>(query);
        with_deadline(PageOperation::CountFetch, deadline, call).await
    }
}

async fn with_deadline<F, T>(operation: PageOperation, deadline: Instant, call: F) -> Result<T>
where
    F: Future<Output = std::result::Result<T, AdapterError>>,
{
    match tokio::time::timeout_at(deadline, call).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(source)) => {
            log_error(
                "paginator",
                &operation.to_string(),
                &source.to_string(),
                Some(&format!("status_code={}", source.status_code)),
            );
            Err(QueryError::adapter(operation, source))
        }
        Err(_) => Err(QueryError::DeadlineExceeded { operation }),
    }
}

fn assemble<T>(
    request: &PageRequest,
    page: FeedPage<T>,
    count: ScalarResponse<u64>,
    elapsed_ms: u64,
) -> PagedResult<T> {
    let items_per_page = request.items_per_page();
    let mut rows = page.rows;
    if rows.len() > items_per_page as usize {
        warn!(
            returned = rows.len(),
            items_per_page, "adapter returned more rows than requested; truncating"
        );
        rows.truncate(items_per_page as usize);
    }

    let result = PagedResult::new(
        rows,
        page.continuation_token,
        items_per_page,
        count.value,
        page.request_charge + count.request_charge,
        elapsed_ms,
    );

    match request.offset_value() {
        Some(offset) => result.with_offset(offset),
        None => result,
    }
}
