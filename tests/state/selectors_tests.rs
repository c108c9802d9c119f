//! Selector tests: pure views over the engine state.

use std::sync::Arc;

use prosecheck::service::Suggestion;
use prosecheck::state::{
    PluginState, select_all_auto_fixable_matches, select_block_queries_in_flight_for_set,
    select_match_by_match_id, select_new_block_queries_in_flight, select_percent_remaining,
    select_single_block_query_in_flight_by_id, select_suggestion_and_range,
};

use crate::helpers::fixtures::*;

#[test]
fn finds_a_match_by_its_id() {
    let state = PluginState {
        current_matches: Arc::new(vec![match_at(0, 5), match_at(10, 15)]),
        ..initial_state()
    };
    let found = select_match_by_match_id(&state, "match-from:0-to:5").unwrap();
    assert_eq!(found.from, 0);
    assert!(select_match_by_match_id(&state, "no-such-match").is_none());
}

#[test]
fn finds_a_single_block_query_in_flight_by_its_id() {
    let query1 = block_query(0, 5, "first");
    let query2 = block_query(10, 15, "second");
    let state = PluginState {
        block_queries_in_flight: in_flight_registry(
            VALIDATION_SET_ID,
            vec![query1.clone(), query2],
            None,
        ),
        ..initial_state()
    };
    let found =
        select_single_block_query_in_flight_by_id(&state, VALIDATION_SET_ID, "0-from:0-to:5")
            .unwrap();
    assert_eq!(found.block_query, query1);
    assert!(
        select_single_block_query_in_flight_by_id(&state, VALIDATION_SET_ID, "missing").is_none()
    );
    assert!(select_block_queries_in_flight_for_set(&state, "missing-set").is_none());
}

#[test]
fn diffs_new_validation_sets_between_states() {
    let query1 = block_query(0, 5, "first");
    let query2 = block_query(10, 15, "second");
    let old = PluginState {
        block_queries_in_flight: in_flight_registry(VALIDATION_SET_ID, vec![query1.clone()], None),
        ..initial_state()
    };
    let new = PluginState {
        block_queries_in_flight: in_flight_registry(VALIDATION_SET_ID, vec![query1.clone()], None)
            .with_set(
                "set-id-2".into(),
                prosecheck::state::ValidationSetInFlight::new(
                    vec![query2],
                    &example_category_ids(),
                ),
            ),
        ..initial_state()
    };
    let fresh = select_new_block_queries_in_flight(&old, &new);
    assert_eq!(fresh.len(), 1);
    assert_eq!(fresh[0].0.as_str(), "set-id-2");

    // Sets that disappeared are not "new".
    assert!(select_new_block_queries_in_flight(&new, &old).is_empty());
}

#[test]
fn resolves_a_suggestion_with_its_range() {
    let mut m = match_at(0, 5);
    m.suggestions = vec![text_suggestion("example"), text_suggestion("suggestion")];
    let state = PluginState {
        current_matches: Arc::new(vec![m.clone()]),
        ..initial_state()
    };

    assert!(select_suggestion_and_range(&state, "invalid-id", 5).is_none());
    assert!(select_suggestion_and_range(&state, m.match_id.as_str(), 15).is_none());

    let first = select_suggestion_and_range(&state, m.match_id.as_str(), 0).unwrap();
    assert_eq!(first.from, 0);
    assert_eq!(first.to, 5);
    assert_eq!(first.suggestion, &text_suggestion("example"));

    let second = select_suggestion_and_range(&state, m.match_id.as_str(), 1).unwrap();
    assert_eq!(second.suggestion, &text_suggestion("suggestion"));
}

#[test]
fn percent_remaining_is_zero_with_nothing_in_flight() {
    assert_eq!(select_percent_remaining(&initial_state()), 0.0);
}

#[test]
fn percent_remaining_for_a_single_set() {
    let queries = vec![block_query(0, 5, "a"), block_query(10, 15, "b")];
    let all_pending = PluginState {
        block_queries_in_flight: in_flight_registry(VALIDATION_SET_ID, queries.clone(), None),
        ..initial_state()
    };
    assert_eq!(select_percent_remaining(&all_pending), 100.0);

    // 2 of 4 original blocks still pending.
    let half_done = PluginState {
        block_queries_in_flight: in_flight_registry(VALIDATION_SET_ID, queries, Some(4)),
        ..initial_state()
    };
    assert_eq!(select_percent_remaining(&half_done), 50.0);
}

#[test]
fn percent_remaining_sums_across_sets() {
    let query1 = block_query(0, 5, "a");
    let query2 = block_query(10, 15, "b");
    let query3 = block_query(20, 25, "c");
    // 3 of 6 combined blocks still pending.
    let state = PluginState {
        block_queries_in_flight: in_flight_registry(
            VALIDATION_SET_ID,
            vec![query1, query2],
            Some(3),
        )
        .with_set(
            "set-id-2".into(),
            prosecheck::state::ValidationSetInFlight::with_total(
                vec![query3],
                &example_category_ids(),
                3,
            ),
        ),
        ..initial_state()
    };
    assert_eq!(select_percent_remaining(&state), 50.0);
}

#[test]
fn auto_fixable_means_exactly_one_text_suggestion() {
    let mut fixable = match_at(0, 5);
    fixable.suggestions = vec![text_suggestion("fix")];

    let mut ambiguous = match_at(10, 15);
    ambiguous.suggestions = vec![text_suggestion("one"), text_suggestion("two")];

    let mut structured = match_at(20, 25);
    structured.suggestions = vec![Suggestion::Rewrite {
        text: "rewrite".into(),
        label: "Rewrite this".into(),
    }];

    let bare = match_at(30, 35);

    let state = PluginState {
        current_matches: Arc::new(vec![
            fixable.clone(),
            ambiguous,
            structured,
            bare,
        ]),
        ..initial_state()
    };
    let auto = select_all_auto_fixable_matches(&state);
    assert_eq!(auto, vec![&fixable]);
}
