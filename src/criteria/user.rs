use super::{present, present_text, Criteria, DocumentSource};
use crate::query_builder::{Filter, Membership, TextMatch};
use serde::{Deserialize, Serialize};

/// Filters for user listings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserCriteria {
    pub id: Option<String>,
    /// Matched against first name, last name and email
    pub containing_text: Option<String>,
    /// Users holding at least one of these roles
    pub role_ids: Option<Vec<String>>,
    /// Users reaching at least one of these applications through a role
    pub application_ids: Option<Vec<String>>,
}

impl Criteria for UserCriteria {
    fn source(&self) -> DocumentSource {
        DocumentSource::Users
    }

    fn alias(&self) -> &'static str {
        "u"
    }

    fn projection(&self) -> Vec<&'static str> {
        vec!["u.id", "u.firstName", "u.lastName", "u.email"]
    }

    fn filters(&self) -> Vec<Filter> {
        let mut filters = Vec::new();

        if let Some(id) = &self.id {
            filters.push(Filter::exact("u.id", "id", id.as_str()));
        }
        if let Some(text) = present_text(&self.containing_text) {
            filters.push(Filter::contains_text(
                &["u.firstName", "u.lastName", "u.email"],
                text,
                TextMatch::Tokens,
            ));
        }
        if let Some(role_ids) = present(&self.role_ids) {
            filters.push(Filter::any_of(
                "roleIds",
                Membership::exists("u.roles", "id"),
                role_ids,
            ));
        }
        if let Some(application_ids) = present(&self.application_ids) {
            filters.push(Filter::join("r", "u.roles"));
            filters.push(Filter::any_of(
                "applicationIds",
                Membership::exists("r.applications", "id"),
                application_ids,
            ));
        }

        filters
    }
}
