//! # Database Execution
//!
//! Paging over an external query engine. This crate never talks to the store
//! directly; an [`ExecutionAdapter`] implementation does.

pub mod adapter;
pub mod paginator;

pub use adapter::{AdapterResult, ExecutionAdapter, FeedPage, ScalarResponse};
pub use paginator::Paginator;
