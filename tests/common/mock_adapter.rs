use async_trait::async_trait;
use scouting_query::database::{AdapterResult, ExecutionAdapter, FeedPage, ScalarResponse};
use scouting_query::error::AdapterError;
use scouting_query::query_builder::Query;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Mutex;
use std::time::Duration;

/// Which adapter method a recorded call went through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    Page,
    Scalar,
}

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub kind: CallKind,
    pub query: Query,
    pub continuation_token: Option<String>,
    pub max_item_count: Option<u32>,
}

/// In-memory execution adapter.
///
/// Every query matches all `rows`; filters are not evaluated. Queries carrying
/// `@offset`/`@itemsPerPage` bindings are sliced by them, otherwise the
/// continuation token is the index of the next row. Scalar queries return
/// the row count.
#[derive(Debug, Default)]
pub struct MockExecutionAdapter {
    rows: Vec<Value>,
    page_charge: f64,
    count_charge: f64,
    page_failure: Option<AdapterError>,
    count_failure: Option<AdapterError>,
    page_delay: Option<Duration>,
    count_delay: Option<Duration>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockExecutionAdapter {
    pub fn new(rows: Vec<Value>) -> Self {
        Self {
            rows,
            page_charge: 2.5,
            count_charge: 1.0,
            ..Default::default()
        }
    }

    /// `count` user documents with ids `user-0`, `user-1`, ...
    pub fn with_users(count: usize) -> Self {
        let rows = (0..count)
            .map(|i| {
                serde_json::json!({
                    "id": format!("user-{i}"),
                    "firstName": format!("First{i}"),
                    "lastName": format!("Last{i}"),
                    "email": format!("user{i}@example.org"),
                    "roles": [],
                    "createdAt": null
                })
            })
            .collect();
        Self::new(rows)
    }

    pub fn fail_page(mut self, error: AdapterError) -> Self {
        self.page_failure = Some(error);
        self
    }

    pub fn fail_count(mut self, error: AdapterError) -> Self {
        self.count_failure = Some(error);
        self
    }

    pub fn delay_page(mut self, delay: Duration) -> Self {
        self.page_delay = Some(delay);
        self
    }

    pub fn delay_count(mut self, delay: Duration) -> Self {
        self.count_delay = Some(delay);
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_of(&self, kind: CallKind) -> Vec<RecordedCall> {
        self.calls().into_iter().filter(|c| c.kind == kind).collect()
    }

    fn record(&self, kind: CallKind, query: &Query, token: Option<&str>, max: Option<u32>) {
        self.calls.lock().unwrap().push(RecordedCall {
            kind,
            query: query.clone(),
            continuation_token: token.map(String::from),
            max_item_count: max,
        });
    }

    fn window(&self, query: &Query, token: Option<&str>, max: Option<u32>) -> AdapterResult<(usize, usize, bool)> {
        let as_index = |value: Option<&Value>| value.and_then(Value::as_u64).map(|v| v as usize);

        if let (Some(offset), Some(limit)) = (
            as_index(query.parameter("@offset")),
            as_index(query.parameter("@itemsPerPage")),
        ) {
            let start = offset.min(self.rows.len());
            let end = (offset + limit).min(self.rows.len());
            return Ok((start, end, false));
        }

        let start = match token {
            Some(token) => token
                .parse::<usize>()
                .map_err(|_| AdapterError::new(400, format!("malformed continuation token '{token}'")))?,
            None => 0,
        };
        let size = max.map_or(self.rows.len(), |m| m as usize);
        let start = start.min(self.rows.len());
        let end = (start + size).min(self.rows.len());
        Ok((start, end, end < self.rows.len()))
    }
}

#[async_trait]
impl ExecutionAdapter for MockExecutionAdapter {
    async fn execute_page<T>(
        &self,
        query: &Query,
        continuation_token: Option<&str>,
        max_item_count: Option<u32>,
    ) -> AdapterResult<FeedPage<T>>
    where
        T: DeserializeOwned + Send + 'static,
    {
        self.record(CallKind::Page, query, continuation_token, max_item_count);
        if let Some(delay) = self.page_delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(error) = &self.page_failure {
            return Err(error.clone());
        }

        let (start, end, more) = self.window(query, continuation_token, max_item_count)?;
        let rows = self.rows[start..end]
            .iter()
            .map(|row| serde_json::from_value(row.clone()))
            .collect::<Result<Vec<T>, _>>()
            .map_err(|e| AdapterError::new(500, e.to_string()))?;

        Ok(FeedPage {
            rows,
            continuation_token: more.then(|| end.to_string()),
            request_charge: self.page_charge,
        })
    }

    async fn execute_scalar<T>(&self, query: &Query) -> AdapterResult<ScalarResponse<T>>
    where
        T: DeserializeOwned + Send + 'static,
    {
        self.record(CallKind::Scalar, query, None, None);
        if let Some(delay) = self.count_delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(error) = &self.count_failure {
            return Err(error.clone());
        }

        let value = serde_json::from_value(Value::from(self.rows.len() as u64))
            .map_err(|e| AdapterError::new(500, e.to_string()))?;
        Ok(ScalarResponse {
            value,
            request_charge: self.count_charge,
        })
    }
}
