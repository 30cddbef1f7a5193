//! Criteria Compiler Tests
//!
//! Compiles entity criteria end to end and checks the query text, its
//! bindings and the count query derived from it.

use scouting_query::criteria::{
    ApplicationCriteria, Criteria, CriteriaCompiler, DocumentSource, RoleCriteria,
    ScoutingActivityCriteria, UserCriteria,
};
use scouting_query::query_builder::{derive_count_query, PageRequest};
use serde_json::json;

#[test]
fn contains_text_tokens_bind_uppercased_values() {
    let criteria = UserCriteria {
        containing_text: Some("john doe".into()),
        ..Default::default()
    };
    let query = CriteriaCompiler::compile(&criteria);

    let group = |p: &str| {
        format!(
            "(CONTAINS(UPPER(u.firstName), {p}) OR CONTAINS(UPPER(u.lastName), {p}) OR CONTAINS(UPPER(u.email), {p}))"
        )
    };
    assert_eq!(
        query.text(),
        format!(
            "SELECT u.id, u.firstName, u.lastName, u.email FROM u WHERE 1=1 AND {} AND {}",
            group("@containsText0"),
            group("@containsText1")
        )
    );
    assert_eq!(query.parameters().len(), 2);
    assert_eq!(query.parameter("@containsText0"), Some(&json!("JOHN")));
    assert_eq!(query.parameter("@containsText1"), Some(&json!("DOE")));
}

#[test]
fn every_filter_kind_on_one_activity_criteria() {
    let criteria = ScoutingActivityCriteria {
        id: Some("act-1".into()),
        organizer_id: Some("u-7".into()),
        containing_text: Some("hike".into()),
        location: Some("Lake Placid".into()),
        participant_ids: Some(vec!["u-1".into(), "u-2".into(), "u-3".into()]),
        tags: Some(vec!["outdoor".into()]),
    };
    let query = criteria.compile();
    let text = query.text();

    assert_eq!(criteria.source(), DocumentSource::ScoutingActivities);
    assert!(text.contains("AND (s.id = @id) AND (s.organizerId = @organizerId)"));
    assert!(text.contains("AND (CONTAINS(UPPER(s.location), @containsText1))"));
    assert!(text.contains("WHERE participant.id = @participantIds2"));
    assert!(text.ends_with("AND (ARRAY_CONTAINS(s.tags, @tags0))"));

    assert_eq!(query.parameter("@containsText1"), Some(&json!("LAKE PLACID")));
    assert_eq!(query.parameters().len(), 8);
    assert!(query.validate().is_ok());

    // filters land in declaration order
    let id_at = text.find("@id").unwrap();
    let tags_at = text.find("@tags0").unwrap();
    assert!(id_at < tags_at);
}

#[test]
fn grouped_listing_counts_rows_not_groups() {
    let criteria = ApplicationCriteria {
        used_in_roles: Some(vec!["leader".into()]),
        ..Default::default()
    };
    let query = criteria.compile();
    let count = derive_count_query(&query).unwrap();

    assert_eq!(
        count.text(),
        "SELECT VALUE COUNT(1) FROM (SELECT a.id, a.name FROM r JOIN a IN r.applications WHERE 1=1 \
         AND (r.id = @usedInRoles0) GROUP BY a.id, a.name)"
    );
    assert_eq!(count.parameters(), query.parameters());
}

#[test]
fn compiled_queries_survive_every_paging_rewrite() {
    let criteria = RoleCriteria {
        containing_text: Some("den".into()),
        application_ids: Some(vec!["badges".into()]),
        ..Default::default()
    };
    let query = criteria.compile();

    for request in [
        PageRequest::first_page(10),
        PageRequest::offset(30, 10),
        PageRequest::ordered(0, 10, "name"),
    ] {
        let effective = request.effective_query(&query).unwrap();
        assert!(effective.validate().is_ok(), "{effective}");
        assert_eq!(request.effective_query(&effective).unwrap(), effective);
    }
}

#[test]
fn empty_criteria_select_everything() {
    let roles = RoleCriteria::default().compile();
    assert!(roles.text().ends_with("FROM r WHERE 1=1"));
    assert!(roles.parameters().is_empty());

    let count = derive_count_query(&roles).unwrap();
    assert_eq!(count.text(), "SELECT VALUE COUNT(1) FROM r WHERE 1=1");
}

#[test]
fn criteria_arrive_as_camel_case_json() {
    let criteria: ScoutingActivityCriteria = serde_json::from_value(json!({
        "organizerId": "u-7",
        "participantIds": [],
        "tags": ["water", "overnight"]
    }))
    .unwrap();

    let query = criteria.compile();
    assert!(!query.text().contains("@participantIds"));
    assert_eq!(query.parameter("@tags1"), Some(&json!("overnight")));
}
