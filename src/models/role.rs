use serde::{Deserialize, Serialize};

use super::application::ApplicationRef;

/// Role document as stored in the `roles` collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub applications: Vec<ApplicationRef>,
}

/// Role embedded in a user document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleRef {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub applications: Vec<ApplicationRef>,
}

impl Role {
    /// Applications this role grants, for unnesting role pages into
    /// application pages
    pub fn into_applications(self) -> Vec<ApplicationRef> {
        self.applications
    }
}
