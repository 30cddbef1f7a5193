use super::{present, present_text, Criteria, DocumentSource};
use crate::query_builder::{Filter, Membership, TextMatch};
use serde::{Deserialize, Serialize};

/// Filters for scouting activity listings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoutingActivityCriteria {
    pub id: Option<String>,
    pub organizer_id: Option<String>,
    /// Matched token by token against title, description and location
    pub containing_text: Option<String>,
    /// Matched as one keyword against the location
    pub location: Option<String>,
    pub participant_ids: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
}

impl Criteria for ScoutingActivityCriteria {
    fn source(&self) -> DocumentSource {
        DocumentSource::ScoutingActivities
    }

    fn alias(&self) -> &'static str {
        "s"
    }

    fn projection(&self) -> Vec<&'static str> {
        vec![
            "s.id",
            "s.title",
            "s.description",
            "s.location",
            "s.organizerId",
            "s.participants",
            "s.tags",
            "s.startsAt",
        ]
    }

    fn filters(&self) -> Vec<Filter> {
        let mut filters = Vec::new();

        if let Some(id) = &self.id {
            filters.push(Filter::exact("s.id", "id", id.as_str()));
        }
        if let Some(organizer_id) = &self.organizer_id {
            filters.push(Filter::exact("s.organizerId", "organizerId", organizer_id.as_str()));
        }
        if let Some(text) = present_text(&self.containing_text) {
            filters.push(Filter::contains_text(
                &["s.title", "s.description", "s.location"],
                text,
                TextMatch::Tokens,
            ));
        }
        if let Some(location) = present_text(&self.location) {
            filters.push(Filter::contains_text(&["s.location"], location, TextMatch::Keyword));
        }
        if let Some(participant_ids) = present(&self.participant_ids) {
            filters.push(Filter::any_of(
                "participantIds",
                Membership::exists("s.participants", "id"),
                participant_ids,
            ));
        }
        if let Some(tags) = present(&self.tags) {
            filters.push(Filter::any_of("tags", Membership::array_contains("s.tags"), tags));
        }

        filters
    }
}
