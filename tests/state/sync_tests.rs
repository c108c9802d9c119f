//! Decoration-synchronization and filtering tests.
//!
//! The decoration set is maintained incrementally; these tests check it
//! against the from-scratch derivation after every step of an action
//! sequence, and exercise the filtered-view helpers.

use std::sync::Arc;

use prosecheck::base::Range;
use prosecheck::decoration::{DecorationSet, decoration_set_from_parts};
use prosecheck::state::{
    Action, PluginState, TransactionContext, add_matches_to_state, apply_filter,
    filter_by_excluded_categories, include_all_matches, is_filter_state_stale, reduce,
};

use crate::helpers::fixtures::*;

/// The oracle: rebuild the decoration set from its sources of truth.
fn derived(state: &PluginState) -> DecorationSet {
    decoration_set_from_parts(
        &state.current_matches,
        &state.config.match_colours,
        state.hover_id.as_ref(),
        state.selected_match.as_ref(),
        state.debug,
        &state.dirtied_ranges,
        &state.block_queries_in_flight.pending_ranges(),
    )
}

#[test]
fn incremental_decorations_always_match_the_derivation() {
    let document = default_doc();
    let ctx = TransactionContext::identity(&document);
    let m1 = match_at(2, 6);
    let m2 = match_at(8, 12);

    let actions: Vec<Action> = vec![
        Action::SetDebugState(true),
        Action::ApplyNewDirtiedRanges(vec![Range::new(5, 10)]),
        Action::RequestForDirtyRanges {
            set_id: VALIDATION_SET_ID.into(),
            category_ids: example_category_ids(),
        },
        Action::RequestSuccess(prosecheck::CheckSuccess {
            set_id: VALIDATION_SET_ID.into(),
            block_results: vec![block_result(1, 25, vec![m1.clone(), m2.clone()])],
        }),
        Action::NewHoverIdReceived {
            match_id: Some(m2.match_id.clone()),
            hover_info: None,
        },
        Action::SelectMatch(Some(m1.match_id.clone())),
        Action::ApplyNewDirtiedRanges(vec![Range::new(3, 4)]),
        Action::SetDebugState(false),
    ];

    let mut state = initial_state();
    assert_eq!(state.decorations, derived(&state));
    for action in actions {
        state = reduce(&state, &ctx, Some(action));
        assert_eq!(state.decorations, derived(&state));
    }
}

#[test]
fn error_paths_keep_decorations_consistent_too() {
    let document = default_doc();
    let ctx = TransactionContext::identity(&document);
    let mut state = reduce(
        &initial_state(),
        &ctx,
        Some(Action::SetDebugState(true)),
    );
    state = reduce(
        &state,
        &ctx,
        Some(Action::ApplyNewDirtiedRanges(vec![Range::new(1, 3)])),
    );
    state = reduce(
        &state,
        &ctx,
        Some(Action::RequestForDirtyRanges {
            set_id: VALIDATION_SET_ID.into(),
            category_ids: example_category_ids(),
        }),
    );
    state = reduce(
        &state,
        &ctx,
        Some(Action::RequestError(prosecheck::CheckError {
            set_id: VALIDATION_SET_ID.into(),
            validation_id: "0-from:1-to:25".into(),
            message: "Too many requests".into(),
        })),
    );
    assert_eq!(state.decorations, derived(&state));
}

#[test]
fn filter_staleness_uses_identity_not_deep_comparison() {
    let state = initial_state();
    assert!(!is_filter_state_stale(&state, &state.clone()));

    let filtered = state.with_filter_state(Some(vec!["1".into()]));
    assert!(is_filter_state_stale(&state, &filtered));
    // Same Arc on both sides: nothing to recompute.
    assert!(!is_filter_state_stale(&filtered, &filtered.clone()));

    // New matches with no filter applied anywhere: nothing to recompute.
    let with_matches = PluginState {
        current_matches: Arc::new(vec![match_at(0, 5)]),
        ..state.clone()
    };
    assert!(!is_filter_state_stale(&state, &with_matches));

    // New matches while a filter is active: recompute.
    let filtered_with_matches = PluginState {
        current_matches: Arc::new(vec![match_at(0, 5)]),
        ..filtered.clone()
    };
    assert!(is_filter_state_stale(&filtered, &filtered_with_matches));
}

#[test]
fn applying_a_filter_swaps_only_affected_decorations() {
    let kept = match_at(0, 5);
    let hidden = match_with_category(
        10,
        15,
        prosecheck::Category::new("2", "Grammar", "00ff00"),
    );
    let state = add_matches_to_state(
        &initial_state(),
        vec![kept.clone(), hidden.clone()],
        include_all_matches,
    );

    let filtered = apply_filter(
        &state.with_filter_state(Some(vec!["2".into()])),
        filter_by_excluded_categories,
    );
    assert_eq!(*filtered.filtered_matches.as_ref().unwrap().as_slice(), [kept.clone()]);
    assert_eq!(filtered.decorations.match_ids().len(), 1);
    assert!(filtered.decorations.match_ids().contains(&kept.match_id));

    // Clearing the filter restores the hidden match's decoration.
    let unfiltered = apply_filter(
        &filtered.with_filter_state(None),
        filter_by_excluded_categories,
    );
    assert_eq!(unfiltered.filtered_matches.as_ref().unwrap().len(), 2);
    assert_eq!(unfiltered.decorations.match_ids().len(), 2);
}

#[test]
fn ignored_matches_are_dropped_when_seeding_state() {
    let kept = match_at(0, 5);
    let ignored = match_at(10, 15);
    let ignored_id = ignored.match_id.clone();
    let state = add_matches_to_state(
        &initial_state(),
        vec![kept.clone(), ignored],
        move |m| m.match_id == ignored_id,
    );
    assert_eq!(*state.current_matches, vec![kept]);
    assert_eq!(state.decorations.len(), 1);
}
