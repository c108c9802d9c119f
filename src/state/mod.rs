//! The validation state machine and its derived views.
//!
//! One pure reducer ([`reduce`]) composes the dirty-range tracker, the
//! block-query registry, the supersession/staleness resolver, and the
//! decoration synchronizer into a single transition function over
//! [`PluginState`]. Selectors expose read views; helpers cover state
//! seeding and match filtering.

mod actions;
mod helpers;
mod in_flight;
mod reducer;
mod selectors;

pub use actions::{Action, HoverInfo};
pub use helpers::{
    add_matches_to_state, apply_filter, filter_by_excluded_categories, include_all_matches,
    is_filter_state_stale,
};
pub use in_flight::{BlockQueriesInFlight, InFlightBlockQuery, ValidationSetInFlight};
pub use reducer::{Config, FilterState, PluginState, TransactionContext, reduce};
pub use selectors::{
    SuggestionAndRange, select_all_auto_fixable_matches, select_block_queries_in_flight_for_set,
    select_match_by_match_id, select_new_block_queries_in_flight, select_percent_remaining,
    select_single_block_query_in_flight_by_id, select_suggestion_and_range,
};
