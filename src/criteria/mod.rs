//! # Criteria Compiler
//!
//! Turns a typed criteria object into a parameterized [`Query`]. Each entity
//! criteria lists its filters in a fixed order; the compiler folds them into a
//! [`QueryBuilder`] rooted at the entity's projection. Compilation is pure: it
//! never executes anything, and a criteria with no filters set compiles to
//! "select all".

pub mod application;
pub mod role;
pub mod scouting_activity;
pub mod user;

pub use application::ApplicationCriteria;
pub use role::RoleCriteria;
pub use scouting_activity::ScoutingActivityCriteria;
pub use user::UserCriteria;

use crate::query_builder::{Filter, Query, QueryBuilder};
use std::fmt;
use tracing::debug;

/// Document collection a compiled query runs against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentSource {
    Users,
    Roles,
    Applications,
    ScoutingActivities,
}

impl DocumentSource {
    pub fn container_name(&self) -> &'static str {
        match self {
            DocumentSource::Users => "users",
            DocumentSource::Roles => "roles",
            DocumentSource::Applications => "applications",
            DocumentSource::ScoutingActivities => "activities",
        }
    }
}

impl fmt::Display for DocumentSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.container_name())
    }
}

/// A filterable entity's criteria
pub trait Criteria {
    /// Collection the compiled query targets
    fn source(&self) -> DocumentSource;

    /// Root alias used in FROM
    fn alias(&self) -> &'static str;

    /// Projected fields, in output order
    fn projection(&self) -> Vec<&'static str>;

    /// Present filters, in the order they are applied
    fn filters(&self) -> Vec<Filter>;

    fn compile(&self) -> Query {
        CriteriaCompiler::compile(self)
    }
}

/// Folds criteria filters into a query
pub struct CriteriaCompiler;

impl CriteriaCompiler {
    pub fn compile<C: Criteria + ?Sized>(criteria: &C) -> Query {
        let filters = criteria.filters();
        let query = QueryBuilder::new(criteria.alias())
            .select(&criteria.projection())
            .filters(&filters)
            .build();

        debug!(
            source = %criteria.source(),
            filters = filters.len(),
            parameters = query.parameters().len(),
            query = %query,
            "compiled criteria"
        );

        query
    }
}

/// Non-empty list values only; an empty any-of set adds no predicate
pub(crate) fn present<T>(values: &Option<Vec<T>>) -> Option<&[T]> {
    values.as_deref().filter(|values| !values.is_empty())
}

/// Non-blank text only
pub(crate) fn present_text(text: &Option<String>) -> Option<&str> {
    text.as_deref().filter(|text| !text.trim().is_empty())
}
