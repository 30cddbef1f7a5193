use super::scanner::skip_quoted;
use crate::error::{QueryError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A named value bound to an `@name` token in the query text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryParameter {
    pub name: String,
    pub value: serde_json::Value,
}

/// Parameterized query text plus its ordered bindings.
///
/// Serializes in the document store's query-spec shape:
/// `{ "query": "...", "parameters": [{ "name": "@id", "value": ... }] }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Query {
    #[serde(rename = "query")]
    text: String,
    parameters: Vec<QueryParameter>,
}

fn normalize_name(name: &str) -> String {
    if name.starts_with('@') {
        name.to_string()
    } else {
        format!("@{name}")
    }
}

impl Query {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            parameters: Vec::new(),
        }
    }

    /// Bind `name` (with or without the leading `@`). Rebinding an existing
    /// name replaces its value and keeps its position.
    pub fn with_parameter(mut self, name: &str, value: impl Into<serde_json::Value>) -> Self {
        self.bind(name, value.into());
        self
    }

    pub(crate) fn bind(&mut self, name: &str, value: serde_json::Value) {
        let name = normalize_name(name);
        match self.parameters.iter_mut().find(|p| p.name == name) {
            Some(existing) => existing.value = value,
            None => self.parameters.push(QueryParameter { name, value }),
        }
    }

    pub(crate) fn from_parts(text: String, parameters: Vec<QueryParameter>) -> Self {
        Self { text, parameters }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn parameters(&self) -> &[QueryParameter] {
        &self.parameters
    }

    pub fn parameter(&self, name: &str) -> Option<&serde_json::Value> {
        let name = normalize_name(name);
        self.parameters
            .iter()
            .find(|p| p.name == name)
            .map(|p| &p.value)
    }

    pub fn has_parameter(&self, name: &str) -> bool {
        self.parameter(name).is_some()
    }

    /// `@name` tokens referenced by the text, in order of first appearance.
    /// Tokens inside quoted literals are not references.
    pub fn referenced_parameters(&self) -> Vec<String> {
        let bytes = self.text.as_bytes();
        let mut names: Vec<String> = Vec::new();
        let mut i = 0;

        while i < bytes.len() {
            match bytes[i] {
                quote @ (b'\'' | b'"') => i = skip_quoted(bytes, i, quote),
                b'@' if i == 0 || !is_word_byte(bytes[i - 1]) => {
                    let start = i + 1;
                    let end = bytes[start..]
                        .iter()
                        .position(|b| !is_word_byte(*b))
                        .map_or(bytes.len(), |len| start + len);
                    if end > start && !bytes[start].is_ascii_digit() {
                        let name = format!("@{}", &self.text[start..end]);
                        if !names.contains(&name) {
                            names.push(name);
                        }
                    }
                    i = end.saturating_sub(1);
                }
                _ => {}
            }
            i += 1;
        }

        names
    }

    /// Check that every referenced `@name` is bound and every binding is
    /// referenced
    pub fn validate(&self) -> Result<()> {
        let referenced = self.referenced_parameters();

        if let Some(unbound) = referenced.iter().find(|name| !self.has_parameter(name)) {
            return Err(QueryError::compilation(format!(
                "parameter {unbound} is referenced but not bound"
            )));
        }

        if let Some(unused) = self
            .parameters
            .iter()
            .find(|p| !referenced.contains(&p.name))
        {
            return Err(QueryError::compilation(format!(
                "parameter {} is bound but never referenced",
                unused.name
            )));
        }

        Ok(())
    }

    /// Drop bindings the text no longer references
    pub fn retain_referenced(mut self) -> Self {
        let referenced = self.referenced_parameters();
        self.parameters.retain(|p| referenced.contains(&p.name));
        self
    }
}

fn is_word_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_'
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_referenced_parameters_in_order() {
        let query = Query::new(
            "SELECT u.id FROM u WHERE 1=1 AND (u.id = @id) AND (CONTAINS(UPPER(u.email), @containsText0) OR CONTAINS(UPPER(u.lastName), @containsText0))",
        );
        assert_eq!(query.referenced_parameters(), vec!["@id", "@containsText0"]);
    }

    #[test]
    fn test_literals_and_emails_are_not_references() {
        let query = Query::new("SELECT * FROM c WHERE c.email = 'scout@example.org' OR c.x = foo@bar");
        assert!(query.referenced_parameters().is_empty());
    }

    #[test]
    fn test_validate_detects_unbound_and_unused() {
        let unbound = Query::new("SELECT * FROM c WHERE c.id = @id");
        assert!(unbound.validate().is_err());

        let unused = Query::new("SELECT * FROM c").with_parameter("id", "u1");
        assert!(unused.validate().is_err());

        let ok = Query::new("SELECT * FROM c WHERE c.id = @id").with_parameter("@id", "u1");
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn test_rebinding_replaces_value() {
        let query = Query::new("SELECT * FROM c WHERE c.id = @id")
            .with_parameter("id", "a")
            .with_parameter("@id", "b");
        assert_eq!(query.parameters().len(), 1);
        assert_eq!(query.parameter("id"), Some(&json!("b")));
    }

    #[test]
    fn test_retain_referenced_drops_stale_bindings() {
        let query = Query::new("SELECT VALUE COUNT(1) FROM c WHERE c.id = @id")
            .with_parameter("id", "a")
            .with_parameter("offset", 10)
            .retain_referenced();
        assert_eq!(query.parameters().len(), 1);
        assert!(query.has_parameter("@id"));
    }

    #[test]
    fn test_serializes_as_query_spec() {
        let query = Query::new("SELECT * FROM c WHERE c.id = @id").with_parameter("id", "u1");
        assert_eq!(
            serde_json::to_value(&query).unwrap(),
            json!({
                "query": "SELECT * FROM c WHERE c.id = @id",
                "parameters": [{ "name": "@id", "value": "u1" }]
            })
        );
    }
}
