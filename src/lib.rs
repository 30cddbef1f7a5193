#![allow(clippy::doc_markdown)] // Allow technical terms like ARRAY_CONTAINS, OFFSET in docs
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Scouting Query Core
//!
//! Dynamic query compilation and pagination for a document database.
//!
//! ## Overview
//!
//! Search screens (users, roles, applications, scouting activities) describe
//! what they want with a typed criteria object. This crate compiles that
//! criteria into a parameterized query, rewrites it for the requested paging
//! strategy, derives a matching count query, and assembles a uniform
//! [`PagedResult`](models::PagedResult) from the two adapter calls.
//!
//! ## Module Organization
//!
//! - [`query_builder`] - query values, clause scanning, filters, paging rewrites
//! - [`criteria`] - per-entity criteria and the compiler that folds them
//! - [`database`] - the execution adapter seam and the paginator
//! - [`models`] - document rows and the paged result
//! - [`config`] - paging defaults and limits
//! - [`error`] - structured error handling
//! - [`logging`] - structured logging setup
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use scouting_query::config::PaginationConfig;
//! use scouting_query::criteria::{Criteria, UserCriteria};
//! use scouting_query::database::{ExecutionAdapter, Paginator};
//! use scouting_query::models::{PagedResult, User};
//! use scouting_query::query_builder::PageRequest;
//! use std::sync::Arc;
//!
//! # async fn example<A: ExecutionAdapter>(adapter: Arc<A>) -> scouting_query::Result<()> {
//! let paginator = Paginator::new(adapter, PaginationConfig::default());
//!
//! let criteria = UserCriteria {
//!     containing_text: Some("john doe".to_string()),
//!     ..Default::default()
//! };
//! let page: PagedResult<User> = paginator
//!     .paginate(&criteria.compile(), &PageRequest::offset(0, 20))
//!     .await?;
//!
//! println!("{} of {} users", page.items().len(), page.total_count());
//! # Ok(())
//! # }
//! ```
//!
//! ## Testing
//!
//! ```bash
//! cargo test --lib    # Unit tests
//! cargo test          # All tests, including property tests
//! ```

pub mod config;
pub mod constants;
pub mod criteria;
pub mod database;
pub mod error;
pub mod logging;
pub mod models;
pub mod query_builder;

pub use config::PaginationConfig;
pub use criteria::{
    ApplicationCriteria, Criteria, CriteriaCompiler, DocumentSource, RoleCriteria,
    ScoutingActivityCriteria, UserCriteria,
};
pub use database::{ExecutionAdapter, FeedPage, Paginator, ScalarResponse};
pub use error::{AdapterError, PageOperation, QueryError, Result};
pub use models::{PageMetadata, PagedResult};
pub use query_builder::{
    derive_count_query, Filter, PageParams, PageRequest, PagingStrategy, Query, QueryBuilder,
};
