//! # Query Error Types
//!
//! Structured errors for query compilation, page-request validation and
//! datastore execution, using thiserror instead of `Box<dyn Error>`.

use std::fmt;
use thiserror::Error;

/// Which adapter call of a paginated request an error came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageOperation {
    PageFetch,
    CountFetch,
}

impl fmt::Display for PageOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageOperation::PageFetch => write!(f, "page fetch"),
            PageOperation::CountFetch => write!(f, "count fetch"),
        }
    }
}

/// Failure reported by the datastore execution adapter
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("datastore returned status {status_code}: {message}")]
pub struct AdapterError {
    pub status_code: u16,
    pub message: String,
}

impl AdapterError {
    pub fn new(status_code: u16, message: impl Into<String>) -> Self {
        Self {
            status_code,
            message: message.into(),
        }
    }
}

/// Errors surfaced by the compiler and paginator
#[derive(Error, Debug)]
pub enum QueryError {
    /// The query text does not have the shape the scanner needs. Never retried.
    #[error("Query compilation error: {message}")]
    QueryCompilation { message: String },

    #[error("Adapter error during {operation}: {source}")]
    Adapter {
        operation: PageOperation,
        #[source]
        source: AdapterError,
    },

    #[error("Invalid page request: {reason}")]
    InvalidPageRequest { reason: String },

    #[error("Deadline exceeded during {operation}")]
    DeadlineExceeded { operation: PageOperation },

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl QueryError {
    pub fn clause_not_found(keyword: &str) -> Self {
        Self::QueryCompilation {
            message: format!("clause keyword '{keyword}' not found at top level"),
        }
    }

    pub fn compilation(message: impl Into<String>) -> Self {
        Self::QueryCompilation {
            message: message.into(),
        }
    }

    pub fn invalid_page_request(reason: impl Into<String>) -> Self {
        Self::InvalidPageRequest {
            reason: reason.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn adapter(operation: PageOperation, source: AdapterError) -> Self {
        Self::Adapter { operation, source }
    }

    /// Status code of the underlying datastore failure, if any
    pub fn status_code(&self) -> Option<u16> {
        match self {
            QueryError::Adapter { source, .. } => Some(source.status_code),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, QueryError>;
