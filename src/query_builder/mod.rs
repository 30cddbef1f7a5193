//! # Query Builder System
//!
//! Builds parameterized queries for the document store and rewrites them for
//! paging.
//!
//! ## Key Components
//!
//! - [`query`] - `Query` value: text plus ordered `@name` bindings
//! - [`scanner`] - depth-aware clause keyword location
//! - [`conditions`] - filter variants and their predicate text
//! - [`joins`] - `JOIN <alias> IN <path>` unnesting
//! - [`parameters`] - collision-free parameter naming
//! - [`builder`] - folds filters into a query
//! - [`pagination`] - page requests, ORDER BY / OFFSET injection, count queries
//!
//! ## Example Usage
//!
//! ```rust
//! use scouting_query::query_builder::{Filter, Membership, QueryBuilder, TextMatch};
//!
//! let query = QueryBuilder::new("u")
//!     .select(&["u.id", "u.email"])
//!     .filter(&Filter::contains_text(&["u.email"], "akela", TextMatch::Tokens))
//!     .filter(&Filter::any_of("roleIds", Membership::exists("u.roles", "id"), &["leader"]))
//!     .build();
//!
//! assert!(query.text().starts_with("SELECT u.id, u.email FROM u WHERE 1=1 AND ("));
//! assert!(query.validate().is_ok());
//! ```

pub mod builder;
pub mod conditions;
pub mod joins;
pub mod pagination;
pub mod parameters;
pub mod query;
pub mod scanner;

pub use builder::QueryBuilder;
pub use conditions::{Filter, Membership, Predicate, TextMatch};
pub use joins::Join;
pub use pagination::{derive_count_query, PageParams, PageRequest, PagingStrategy};
pub use parameters::ParameterAllocator;
pub use query::{Query, QueryParameter};
pub use scanner::{find_top_level, locate_clause_keyword, split_on_keyword};
