use super::{present, present_text, Criteria, DocumentSource};
use crate::query_builder::{Filter, Membership, TextMatch};
use serde::{Deserialize, Serialize};

/// Filters for role listings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleCriteria {
    pub id: Option<String>,
    /// Matched against name and description
    pub containing_text: Option<String>,
    /// Roles granting at least one of these applications
    pub application_ids: Option<Vec<String>>,
}

impl Criteria for RoleCriteria {
    fn source(&self) -> DocumentSource {
        DocumentSource::Roles
    }

    fn alias(&self) -> &'static str {
        "r"
    }

    fn projection(&self) -> Vec<&'static str> {
        vec!["r.id", "r.name", "r.description", "r.applications"]
    }

    fn filters(&self) -> Vec<Filter> {
        let mut filters = Vec::new();

        if let Some(id) = &self.id {
            filters.push(Filter::exact("r.id", "id", id.as_str()));
        }
        if let Some(text) = present_text(&self.containing_text) {
            filters.push(Filter::contains_text(
                &["r.name", "r.description"],
                text,
                TextMatch::Tokens,
            ));
        }
        if let Some(application_ids) = present(&self.application_ids) {
            filters.push(Filter::any_of(
                "applicationIds",
                Membership::exists("r.applications", "id"),
                application_ids,
            ));
        }

        filters
    }
}
