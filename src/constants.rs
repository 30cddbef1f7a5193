//! # Query Constants
//!
//! Clause keywords, reserved parameter names and fixed query fragments shared
//! by the criteria compiler, the scanner and the paginator.

/// Clause keywords located by the scanner. Matching is case-sensitive.
pub mod keywords {
    pub const SELECT: &str = "SELECT";
    pub const FROM: &str = "FROM";
    pub const GROUP_BY: &str = "GROUP BY";
    pub const ORDER_BY: &str = "ORDER BY";
    pub const OFFSET: &str = "OFFSET";
    pub const DISTINCT: &str = "DISTINCT";
    pub const VALUE: &str = "VALUE";
    pub const TOP: &str = "TOP";
}

/// Parameter names owned by the paginator
pub mod parameters {
    pub const OFFSET: &str = "@offset";
    pub const ITEMS_PER_PAGE: &str = "@itemsPerPage";
    pub const CONTAINS_TEXT: &str = "containsText";
}

/// Neutral predicate every compiled query starts from
pub const WHERE_TRUE: &str = "WHERE 1=1";

/// Projection used to derive the total-count query
pub const COUNT_PROJECTION: &str = "SELECT VALUE COUNT(1)";

/// Clause appended by the offset-limit strategies
pub const OFFSET_LIMIT_CLAUSE: &str = "OFFSET @offset LIMIT @itemsPerPage";
