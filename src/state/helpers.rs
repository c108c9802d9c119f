//! State construction and filtering helpers for embedders.

use std::sync::Arc;

use rustc_hash::FxHashSet;

use crate::base::MatchId;
use crate::decoration::Decoration;
use crate::service::Match;

use super::reducer::{FilterState, PluginState};

/// An ignore predicate that keeps every match.
pub fn include_all_matches(_: &Match) -> bool {
    false
}

/// Seed a state with matches and their derived decorations, e.g. when
/// hydrating from cached results. Matches the `ignore` predicate rejects
/// are dropped.
pub fn add_matches_to_state(
    state: &PluginState,
    matches: Vec<Match>,
    ignore: impl Fn(&Match) -> bool,
) -> PluginState {
    let mut next = state.clone();
    let kept: Vec<Match> = matches.into_iter().filter(|m| !ignore(m)).collect();
    let decorations: Vec<Decoration> = kept
        .iter()
        .flat_map(|m| {
            crate::decoration::decorations_for_match(m, &next.config.match_colours, false, false)
        })
        .collect();
    next.decorations = next.decorations.add(decorations);
    next.current_matches = Arc::new(kept);
    next
}

/// Is the derived filtered view stale, given the old and new states?
///
/// Identity comparisons, not deep ones: the filtered view is only
/// recomputed when the filter state or the match collection is actually
/// a different value.
pub fn is_filter_state_stale(old: &PluginState, new: &PluginState) -> bool {
    let matches_changed = !Arc::ptr_eq(&old.current_matches, &new.current_matches);
    let filter_state_changed = match (&old.filter_state, &new.filter_state) {
        (Some(a), Some(b)) => !Arc::ptr_eq(a, b),
        (None, None) => false,
        _ => true,
    };
    let no_filter_applied = old.filter_state.is_none() && new.filter_state.is_none();
    filter_state_changed || (matches_changed && !no_filter_applied)
}

/// The default filter: hide matches whose category is listed in the
/// filter state.
pub fn filter_by_excluded_categories(
    filter_state: Option<&FilterState>,
    matches: &[Match],
) -> Vec<Match> {
    match filter_state {
        Some(excluded) => matches
            .iter()
            .filter(|m| !excluded.contains(&m.category.id))
            .cloned()
            .collect(),
        None => matches.to_vec(),
    }
}

/// Recompute the filtered view and swap only the decorations whose
/// membership changed. Debug decorations are untouched.
pub fn apply_filter(
    state: &PluginState,
    filter: impl Fn(Option<&FilterState>, &[Match]) -> Vec<Match>,
) -> PluginState {
    let filtered = filter(state.filter_state.as_deref(), &state.current_matches);
    let filtered_ids: FxHashSet<&MatchId> = filtered.iter().map(|m| &m.match_id).collect();

    let decorated_ids = state.decorations.match_ids();
    let missing: Vec<Decoration> = filtered
        .iter()
        .filter(|m| !decorated_ids.contains(&m.match_id))
        .flat_map(|m| {
            let hovered = state.hover_id.as_ref() == Some(&m.match_id);
            let selected = state.selected_match.as_ref() == Some(&m.match_id);
            crate::decoration::decorations_for_match(
                m,
                &state.config.match_colours,
                hovered,
                selected,
            )
        })
        .collect();

    let decorations = state
        .decorations
        .remove_where(|d| d.match_id().is_some_and(|id| !filtered_ids.contains(id)))
        .add(missing);

    PluginState {
        filtered_matches: Some(Arc::new(filtered)),
        decorations,
        ..state.clone()
    }
}
