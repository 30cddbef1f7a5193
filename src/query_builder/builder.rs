use super::conditions::Filter;
use super::joins::Join;
use super::parameters::ParameterAllocator;
use super::query::{Query, QueryParameter};
use crate::constants::{parameters, WHERE_TRUE};

/// Query builder for document-store queries.
///
/// Starts from `SELECT <fields> FROM <alias> WHERE 1=1` and folds filters in
/// left to right: joins widen the FROM clause, every other filter appends
/// `AND (<predicate>)` and binds its parameters. Building never executes
/// anything.
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    from_alias: String,
    select_fields: Vec<String>,
    joins: Vec<Join>,
    where_clauses: Vec<String>,
    parameters: Vec<QueryParameter>,
    allocator: ParameterAllocator,
}

impl QueryBuilder {
    /// Create a new query builder rooted at the given alias.
    ///
    /// The paginator's `@offset` and `@itemsPerPage` are reserved up front so a
    /// filter can never bind either name.
    pub fn new(from_alias: &str) -> Self {
        let mut allocator = ParameterAllocator::new();
        allocator.reserve(parameters::OFFSET);
        allocator.reserve(parameters::ITEMS_PER_PAGE);

        Self {
            from_alias: from_alias.to_string(),
            select_fields: vec!["*".to_string()],
            joins: Vec::new(),
            where_clauses: Vec::new(),
            parameters: Vec::new(),
            allocator,
        }
    }

    /// Set specific fields to select
    pub fn select(mut self, fields: &[&str]) -> Self {
        self.select_fields = fields.iter().map(|f| f.to_string()).collect();
        self
    }

    /// Add a JOIN clause. A second join on the same alias is ignored.
    pub fn join(mut self, join: Join) -> Self {
        if !self.joins.iter().any(|j| j.alias == join.alias) {
            self.joins.push(join);
        }
        self
    }

    /// Fold one filter into the query
    pub fn filter(mut self, filter: &Filter) -> Self {
        if let Filter::Join(join) = filter {
            return self.join(join.clone());
        }

        for predicate in filter.predicates(&mut self.allocator) {
            self.where_clauses.push(predicate.sql);
            self.parameters
                .extend(predicate.bindings.into_iter().map(|(name, value)| QueryParameter { name, value }));
        }
        self
    }

    /// Fold filters in order
    pub fn filters<'a>(self, filters: impl IntoIterator<Item = &'a Filter>) -> Self {
        filters.into_iter().fold(self, |builder, filter| builder.filter(filter))
    }

    /// A joined one-to-many relation fans out rows, so any join with an
    /// explicit projection is grouped back on the projected fields.
    fn requires_group_by(&self) -> bool {
        !self.joins.is_empty() && !self.select_fields.iter().any(|f| f == "*")
    }

    /// Build the complete SQL query string
    pub fn build_sql(&self) -> String {
        let fields = self.select_fields.join(", ");
        let mut sql = format!("SELECT {fields} FROM {}", self.from_alias);

        for join in &self.joins {
            sql.push(' ');
            sql.push_str(&join.to_sql());
        }

        sql.push(' ');
        sql.push_str(WHERE_TRUE);
        for clause in &self.where_clauses {
            sql.push_str(&format!(" AND ({clause})"));
        }

        if self.requires_group_by() {
            sql.push_str(&format!(" GROUP BY {fields}"));
        }

        sql
    }

    pub fn build(self) -> Query {
        let sql = self.build_sql();
        Query::from_parts(sql, self.parameters)
    }
}
