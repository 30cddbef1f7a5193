use super::joins::Join;
use super::parameters::ParameterAllocator;
use crate::constants::parameters::CONTAINS_TEXT;

/// How a contains-text filter treats its input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextMatch {
    /// Every whitespace-delimited token must match at least one field
    #[default]
    Tokens,
    /// The trimmed input is matched as one keyword
    Keyword,
}

/// How one element of an any-of set is tested against a document
#[derive(Debug, Clone, PartialEq)]
pub enum Membership {
    /// `ARRAY_CONTAINS(collection, @p)` for collections of scalars
    ArrayContains { collection: String },
    /// `EXISTS(SELECT VALUE x FROM x IN collection WHERE x.field = @p)` for
    /// collections of objects
    Exists {
        collection: String,
        element_field: String,
    },
    /// `field = @p`
    Equals { field: String },
}

/// One filter of a criteria object, folded into a query in declaration order
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    ExactMatch {
        field: String,
        parameter: String,
        value: serde_json::Value,
    },
    ContainsText {
        fields: Vec<String>,
        text: String,
        mode: TextMatch,
    },
    AnyOfSet {
        kind: String,
        membership: Membership,
        values: Vec<serde_json::Value>,
    },
    /// Widens the FROM clause; renders no predicate of its own
    Join(Join),
}

/// Rendered predicate text with the bindings it references
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    pub sql: String,
    pub bindings: Vec<(String, serde_json::Value)>,
}

impl Filter {
    pub fn exact(field: &str, parameter: &str, value: impl Into<serde_json::Value>) -> Self {
        Filter::ExactMatch {
            field: field.to_string(),
            parameter: parameter.to_string(),
            value: value.into(),
        }
    }

    pub fn contains_text(fields: &[&str], text: &str, mode: TextMatch) -> Self {
        Filter::ContainsText {
            fields: fields.iter().map(|f| f.to_string()).collect(),
            text: text.to_string(),
            mode,
        }
    }

    pub fn any_of<V>(kind: &str, membership: Membership, values: &[V]) -> Self
    where
        V: Clone + Into<serde_json::Value>,
    {
        Filter::AnyOfSet {
            kind: kind.to_string(),
            membership,
            values: values.iter().cloned().map(Into::into).collect(),
        }
    }

    pub fn join(alias: &str, path: &str) -> Self {
        Filter::Join(Join::new(alias, path))
    }

    /// Render this filter's predicates, allocating parameter names as it goes.
    /// Each returned predicate is ANDed onto the query on its own.
    pub fn predicates(&self, allocator: &mut ParameterAllocator) -> Vec<Predicate> {
        match self {
            Filter::ExactMatch {
                field,
                parameter,
                value,
            } => {
                let name = allocator.scalar(parameter);
                vec![Predicate {
                    sql: format!("{field} = {name}"),
                    bindings: vec![(name, value.clone())],
                }]
            }
            Filter::ContainsText { fields, text, mode } => {
                if fields.is_empty() {
                    return Vec::new();
                }
                search_tokens(text, *mode)
                    .into_iter()
                    .map(|token| {
                        // one binding per token, shared by every field in the group
                        let name = allocator.indexed(CONTAINS_TEXT);
                        let sql = fields
                            .iter()
                            .map(|field| format!("CONTAINS(UPPER({field}), {name})"))
                            .collect::<Vec<_>>()
                            .join(" OR ");
                        Predicate {
                            sql,
                            bindings: vec![(name, serde_json::Value::String(token))],
                        }
                    })
                    .collect()
            }
            Filter::AnyOfSet {
                kind,
                membership,
                values,
            } => {
                if values.is_empty() {
                    return Vec::new();
                }
                let mut parts = Vec::with_capacity(values.len());
                let mut bindings = Vec::with_capacity(values.len());
                for value in values {
                    let name = allocator.indexed(kind);
                    parts.push(membership.to_sql(&name));
                    bindings.push((name, value.clone()));
                }
                vec![Predicate {
                    sql: parts.join(" OR "),
                    bindings,
                }]
            }
            Filter::Join(_) => Vec::new(),
        }
    }
}

impl Membership {
    pub fn array_contains(collection: &str) -> Self {
        Membership::ArrayContains {
            collection: collection.to_string(),
        }
    }

    pub fn exists(collection: &str, element_field: &str) -> Self {
        Membership::Exists {
            collection: collection.to_string(),
            element_field: element_field.to_string(),
        }
    }

    pub fn equals(field: &str) -> Self {
        Membership::Equals {
            field: field.to_string(),
        }
    }

    /// Convert to SQL string for a single bound element
    pub fn to_sql(&self, parameter: &str) -> String {
        match self {
            Membership::ArrayContains { collection } => {
                format!("ARRAY_CONTAINS({collection}, {parameter})")
            }
            Membership::Exists {
                collection,
                element_field,
            } => {
                let alias = element_alias(collection);
                format!(
                    "EXISTS(SELECT VALUE {alias} FROM {alias} IN {collection} WHERE {alias}.{element_field} = {parameter})"
                )
            }
            Membership::Equals { field } => format!("{field} = {parameter}"),
        }
    }
}

/// Alias for the element of an unnested collection: the collection name
/// without its plural `s` (`u.roles` gives `role`), kept distinct from the
/// collection's own root alias.
fn element_alias(collection: &str) -> String {
    let root = collection.split('.').next().unwrap_or_default();
    let leaf = collection.rsplit('.').next().unwrap_or_default();
    let singular = match leaf.strip_suffix('s') {
        Some(stem) if !stem.is_empty() => stem,
        _ => leaf,
    };
    let alias = if singular.is_empty() {
        "x".to_string()
    } else {
        singular.to_string()
    };

    if alias == root {
        format!("{alias}1")
    } else {
        alias
    }
}

/// Uppercased search tokens; duplicates are dropped so each binding is
/// distinct
fn search_tokens(text: &str, mode: TextMatch) -> Vec<String> {
    match mode {
        TextMatch::Keyword => {
            let keyword = text.trim();
            if keyword.is_empty() {
                Vec::new()
            } else {
                vec![keyword.to_uppercase()]
            }
        }
        TextMatch::Tokens => {
            let mut tokens: Vec<String> = Vec::new();
            for token in text.split_whitespace().map(str::to_uppercase) {
                if !tokens.contains(&token) {
                    tokens.push(token);
                }
            }
            tokens
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_exact_match_predicate() {
        let mut allocator = ParameterAllocator::new();
        let predicates = Filter::exact("u.id", "id", "u-1").predicates(&mut allocator);
        assert_eq!(predicates.len(), 1);
        assert_eq!(predicates[0].sql, "u.id = @id");
        assert_eq!(predicates[0].bindings, vec![("@id".to_string(), json!("u-1"))]);
    }

    #[test]
    fn test_contains_text_binds_one_parameter_per_token() {
        let mut allocator = ParameterAllocator::new();
        let filter = Filter::contains_text(&["u.name", "u.email"], "john  doe", TextMatch::Tokens);
        let predicates = filter.predicates(&mut allocator);

        assert_eq!(predicates.len(), 2);
        assert_eq!(
            predicates[0].sql,
            "CONTAINS(UPPER(u.name), @containsText0) OR CONTAINS(UPPER(u.email), @containsText0)"
        );
        assert_eq!(predicates[0].bindings, vec![("@containsText0".to_string(), json!("JOHN"))]);
        assert_eq!(predicates[1].bindings, vec![("@containsText1".to_string(), json!("DOE"))]);
    }

    #[test]
    fn test_contains_text_keyword_and_duplicates() {
        let mut allocator = ParameterAllocator::new();
        let keyword = Filter::contains_text(&["r.name"], " camp fire ", TextMatch::Keyword)
            .predicates(&mut allocator);
        assert_eq!(keyword.len(), 1);
        assert_eq!(keyword[0].bindings[0].1, json!("CAMP FIRE"));

        let deduped = Filter::contains_text(&["r.name"], "Camp camp CAMP", TextMatch::Tokens)
            .predicates(&mut allocator);
        assert_eq!(deduped.len(), 1);

        let blank = Filter::contains_text(&["r.name"], "   ", TextMatch::Tokens)
            .predicates(&mut allocator);
        assert!(blank.is_empty());
    }

    #[test]
    fn test_any_of_set_distinct_parameters() {
        let mut allocator = ParameterAllocator::new();
        let filter = Filter::any_of("roleIds", Membership::exists("u.roles", "id"), &["admin", "leader"]);
        let predicates = filter.predicates(&mut allocator);

        assert_eq!(predicates.len(), 1);
        assert_eq!(
            predicates[0].sql,
            "EXISTS(SELECT VALUE role FROM role IN u.roles WHERE role.id = @roleIds0) OR EXISTS(SELECT VALUE role FROM role IN u.roles WHERE role.id = @roleIds1)"
        );
        assert_eq!(predicates[0].bindings.len(), 2);
    }

    #[test]
    fn test_empty_any_of_set_adds_nothing() {
        let mut allocator = ParameterAllocator::new();
        let empty: [&str; 0] = [];
        let filter = Filter::any_of("tags", Membership::array_contains("s.tags"), &empty);
        assert!(filter.predicates(&mut allocator).is_empty());
        assert_eq!(allocator.issued_count(), 0);
    }

    #[test]
    fn test_element_alias_avoids_root_alias() {
        assert_eq!(
            Membership::exists("role.roles", "id").to_sql("@p0"),
            "EXISTS(SELECT VALUE role1 FROM role1 IN role.roles WHERE role1.id = @p0)"
        );
        assert_eq!(Membership::array_contains("s.tags").to_sql("@tags0"), "ARRAY_CONTAINS(s.tags, @tags0)");
        assert_eq!(Membership::equals("r.id").to_sql("@usedInRoles0"), "r.id = @usedInRoles0");
    }
}
