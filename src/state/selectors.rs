//! Pure derived views over [`PluginState`].
//!
//! State in, value out; no side effects and no mutation, so every
//! selector is safe to call on every render. Lookup misses are `None`,
//! never a panic.

use crate::base::SetId;
use crate::service::{Match, Suggestion};

use super::in_flight::{InFlightBlockQuery, ValidationSetInFlight};
use super::reducer::PluginState;

/// Percentage of requested blocks still outstanding across all
/// validation sets. No sets in flight means nothing remains to wait for:
/// 0.
pub fn select_percent_remaining(state: &PluginState) -> f64 {
    let (pending, total) = state.block_queries_in_flight.totals();
    if total == 0 {
        0.0
    } else {
        f64::from(pending) / f64::from(total) * 100.0
    }
}

/// Find a current match by its id.
pub fn select_match_by_match_id<'a>(state: &'a PluginState, match_id: &str) -> Option<&'a Match> {
    state
        .current_matches
        .iter()
        .find(|m| m.match_id == match_id)
}

/// A suggestion resolved together with the range it applies to.
#[derive(Debug, Clone, PartialEq)]
pub struct SuggestionAndRange<'a> {
    pub suggestion: &'a Suggestion,
    pub from: u32,
    pub to: u32,
}

/// The suggestion at `index` for the given match, with the match's range.
pub fn select_suggestion_and_range<'a>(
    state: &'a PluginState,
    match_id: &str,
    index: usize,
) -> Option<SuggestionAndRange<'a>> {
    let m = select_match_by_match_id(state, match_id)?;
    let suggestion = m.suggestions.get(index)?;
    Some(SuggestionAndRange {
        suggestion,
        from: m.from,
        to: m.to,
    })
}

/// The in-flight bookkeeping for one validation set.
pub fn select_block_queries_in_flight_for_set<'a>(
    state: &'a PluginState,
    set_id: &str,
) -> Option<&'a ValidationSetInFlight> {
    state.block_queries_in_flight.get(set_id)
}

/// One outstanding block query within a set.
pub fn select_single_block_query_in_flight_by_id<'a>(
    state: &'a PluginState,
    set_id: &str,
    query_id: &str,
) -> Option<&'a InFlightBlockQuery> {
    select_block_queries_in_flight_for_set(state, set_id)?.get(query_id)
}

/// Validation sets present in `new` but absent from `old`, or whose
/// contents changed. This is what the dispatch layer sends to the
/// checking service after a transition.
pub fn select_new_block_queries_in_flight<'a>(
    old: &PluginState,
    new: &'a PluginState,
) -> Vec<(&'a SetId, &'a ValidationSetInFlight)> {
    new.block_queries_in_flight
        .iter()
        .filter(|(set_id, set)| old.block_queries_in_flight.get(set_id) != Some(*set))
        .collect()
}

/// Matches whose fix is unambiguous: exactly one suggestion, and it is a
/// plain text replacement. The bulk-apply surface.
pub fn select_all_auto_fixable_matches(state: &PluginState) -> Vec<&Match> {
    state
        .current_matches
        .iter()
        .filter(|m| matches!(m.suggestions.as_slice(), [Suggestion::Text { .. }]))
        .collect()
}
