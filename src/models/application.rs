use serde::{Deserialize, Serialize};

/// Application document as stored in the `applications` collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub url: Option<String>,
}

/// Application reference embedded in roles
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationRef {
    pub id: String,
    pub name: String,
}

impl ApplicationRef {
    /// Two references to the same application are duplicates regardless of
    /// the role they were reached through
    pub fn same_application(&self, other: &ApplicationRef) -> bool {
        self.id == other.id
    }
}
