use proptest::prelude::*;
use scouting_query::query_builder::PageRequest;

/// Strategy for generating query aliases
pub fn alias_strategy() -> impl Strategy<Value = String> {
    "[a-z]{1,3}".prop_filter("aliases must not collide with keywords", |a| {
        !matches!(a.to_uppercase().as_str(), "IN" | "AND" | "OR" | "NOT" | "BY" | "AS" | "TOP")
    })
}

/// Strategy for generating free-text search input
pub fn search_text_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec("[a-zA-Z0-9]{1,8}", 0..6).prop_map(|words| words.join(" "))
}

/// Strategy for generating identifier sets for any-of filters
pub fn id_set_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-z0-9-]{1,12}", 0..12)
}

/// Strategy for generating page requests under all three strategies
pub fn page_request_strategy() -> impl Strategy<Value = PageRequest> {
    prop_oneof![
        (1u32..100).prop_map(PageRequest::first_page),
        ("[0-9]{1,4}", 1u32..100).prop_map(|(token, ipp)| PageRequest::continuation(token, ipp)),
        (0u32..10_000, 1u32..100).prop_map(|(offset, ipp)| PageRequest::offset(offset, ipp)),
        (0u32..10_000, 1u32..100, "[a-z][a-zA-Z]{0,10}")
            .prop_map(|(offset, ipp, field)| PageRequest::ordered(offset, ipp, &field)),
    ]
}
