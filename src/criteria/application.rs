use super::{present, present_text, Criteria, DocumentSource};
use crate::query_builder::{Filter, Membership, TextMatch};
use serde::{Deserialize, Serialize};

/// Filters for application listings.
///
/// With `used_in_roles` set the listing is answered from role documents: each
/// role's `applications` are unnested through a join and grouped back so an
/// application granted by several of the roles appears once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationCriteria {
    pub id: Option<String>,
    pub containing_text: Option<String>,
    pub used_in_roles: Option<Vec<String>>,
}

impl ApplicationCriteria {
    fn through_roles(&self) -> bool {
        present(&self.used_in_roles).is_some()
    }
}

impl Criteria for ApplicationCriteria {
    fn source(&self) -> DocumentSource {
        if self.through_roles() {
            DocumentSource::Roles
        } else {
            DocumentSource::Applications
        }
    }

    fn alias(&self) -> &'static str {
        if self.through_roles() {
            "r"
        } else {
            "a"
        }
    }

    fn projection(&self) -> Vec<&'static str> {
        if self.through_roles() {
            vec!["a.id", "a.name"]
        } else {
            vec!["a.id", "a.name", "a.description", "a.url"]
        }
    }

    fn filters(&self) -> Vec<Filter> {
        let mut filters = Vec::new();

        if let Some(role_ids) = present(&self.used_in_roles) {
            filters.push(Filter::join("a", "r.applications"));
            filters.push(Filter::any_of(
                "usedInRoles",
                Membership::equals("r.id"),
                role_ids,
            ));
        }
        if let Some(id) = &self.id {
            filters.push(Filter::exact("a.id", "id", id.as_str()));
        }
        if let Some(text) = present_text(&self.containing_text) {
            let fields: &[&str] = if self.through_roles() {
                &["a.name"]
            } else {
                &["a.name", "a.description"]
            };
            filters.push(Filter::contains_text(fields, text, TextMatch::Tokens));
        }

        filters
    }
}
