/// A document-scoped join that unnests a one-to-many collection:
/// `JOIN r IN u.roles` yields one row per element of `u.roles`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Join {
    pub alias: String,
    pub path: String,
}

impl Join {
    /// Join `alias` over the collection at `path`
    pub fn new(alias: &str, path: &str) -> Self {
        Self {
            alias: alias.to_string(),
            path: path.to_string(),
        }
    }

    /// Convert to SQL string
    pub fn to_sql(&self) -> String {
        format!("JOIN {} IN {}", self.alias, self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_sql() {
        let join = Join::new("r", "u.roles");
        assert_eq!(join.to_sql(), "JOIN r IN u.roles");
    }
}
