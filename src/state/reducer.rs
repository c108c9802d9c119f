//! The validation state machine.
//!
//! A single pure transition function over [`PluginState`]: each action
//! produces a new state value and structurally shares whatever it did not
//! touch. There is no named state enumeration — the state *is* the full
//! `PluginState`, and every action is total over it.
//!
//! All logical concurrency (overlapping validation sets, results arriving
//! out of order, edits landing between issue and completion) is resolved
//! here, synchronously, one action at a time.

use std::sync::Arc;

use rustc_hash::FxHashSet;
use tracing::{debug, trace, warn};

use crate::base::{Category, CategoryId, MatchId, Range, SetId, merge_ranges};
use crate::decoration::{
    DebugKind, DecorationSet, MatchColours, debug_decoration, decorations_for_match,
};
use crate::document::{Document, Mapping, SkipPolicy, blocks_from_document, expand_to_blocks};
use crate::service::{BlockQuery, CheckError, CheckSuccess, Match};

use super::actions::{Action, HoverInfo};
use super::in_flight::BlockQueriesInFlight;

/// Filter state: category ids currently hidden by the presentation layer.
pub type FilterState = Vec<CategoryId>;

/// Engine configuration. Opaque pass-through apart from the category set,
/// which scopes future requests.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Config {
    pub categories: Vec<Category>,
    pub match_colours: MatchColours,
    pub skip: SkipPolicy,
}

/// The full engine state. Created once per document session; every
/// subsequent value is a transition output of [`reduce`].
#[derive(Debug, Clone, PartialEq)]
pub struct PluginState {
    pub config: Arc<Config>,
    /// Matches currently owned by the engine. At most one per
    /// (category, overlapping range); never overlapping a dirty range.
    pub current_matches: Arc<Vec<Match>>,
    /// Derived filtered view; maintained by [`super::helpers::apply_filter`].
    pub filtered_matches: Option<Arc<Vec<Match>>>,
    pub filter_state: Option<Arc<FilterState>>,
    pub block_queries_in_flight: BlockQueriesInFlight,
    /// Ranges awaiting re-validation, coalesced.
    pub dirtied_ranges: Vec<Range>,
    pub validation_pending: bool,
    /// Derived overlay; always reconstructible from the fields above.
    pub decorations: DecorationSet,
    pub selected_match: Option<MatchId>,
    pub hover_id: Option<MatchId>,
    pub hover_info: Option<HoverInfo>,
    pub debug: bool,
    pub error: Option<String>,
}

impl PluginState {
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
            current_matches: Arc::new(Vec::new()),
            filtered_matches: None,
            filter_state: None,
            block_queries_in_flight: BlockQueriesInFlight::new(),
            dirtied_ranges: Vec::new(),
            validation_pending: false,
            decorations: DecorationSet::new(),
            selected_match: None,
            hover_id: None,
            hover_info: None,
            debug: false,
            error: None,
        }
    }

    /// Add a category to the config. Affects future requests only;
    /// existing matches are untouched.
    pub fn with_category(&self, category: Category) -> Self {
        if self.config.categories.iter().any(|c| c.id == category.id) {
            return self.clone();
        }
        let mut config = (*self.config).clone();
        config.categories.push(category);
        Self {
            config: Arc::new(config),
            ..self.clone()
        }
    }

    /// Remove a category from the config. Existing matches of that
    /// category are untouched.
    pub fn without_category(&self, category_id: &str) -> Self {
        if !self.config.categories.iter().any(|c| c.id == category_id) {
            return self.clone();
        }
        let mut config = (*self.config).clone();
        config.categories.retain(|c| c.id != category_id);
        Self {
            config: Arc::new(config),
            ..self.clone()
        }
    }

    /// Replace the filter state. The filtered view itself is recomputed
    /// by [`super::helpers::apply_filter`].
    pub fn with_filter_state(&self, filter_state: Option<FilterState>) -> Self {
        Self {
            filter_state: filter_state.map(Arc::new),
            ..self.clone()
        }
    }

    fn decorations_for(&self, m: &Match) -> Vec<crate::decoration::Decoration> {
        let hovered = self.hover_id.as_ref() == Some(&m.match_id);
        let selected = self.selected_match.as_ref() == Some(&m.match_id);
        decorations_for_match(m, &self.config.match_colours, hovered, selected)
    }
}

/// What an action is applied against: the current document snapshot and
/// the mapping of any edits since the prior state version.
///
/// The engine never reaches into ambient editor state; everything it
/// needs to remap stored positions arrives here.
pub struct TransactionContext<'a> {
    doc: &'a Document,
    mapping: Mapping,
}

impl<'a> TransactionContext<'a> {
    pub fn new(doc: &'a Document, mapping: Mapping) -> Self {
        Self { doc, mapping }
    }

    /// A context for actions arriving without intervening edits.
    pub fn identity(doc: &'a Document) -> Self {
        Self {
            doc,
            mapping: Mapping::identity(),
        }
    }

    pub fn doc(&self) -> &Document {
        self.doc
    }

    pub fn mapping(&self) -> &Mapping {
        &self.mapping
    }
}

/// Apply one action (or none) to the prior state.
///
/// Stored positions are first remapped through the context's edit
/// mapping, then the action dispatches. `None` is the identity
/// transition over the remapped state.
pub fn reduce(
    state: &PluginState,
    ctx: &TransactionContext<'_>,
    action: Option<Action>,
) -> PluginState {
    let state = map_through_edits(state, ctx.mapping());
    let Some(action) = action else {
        return state;
    };
    match action {
        Action::ApplyNewDirtiedRanges(ranges) => handle_new_dirtied_ranges(state, ranges),
        Action::RequestForDocument {
            set_id,
            category_ids,
        } => handle_request_for_document(state, ctx, set_id, category_ids),
        Action::RequestForDirtyRanges {
            set_id,
            category_ids,
        } => handle_request_for_dirty_ranges(state, ctx, set_id, category_ids),
        Action::RequestSuccess(success) => handle_request_success(state, success),
        Action::RequestError(error) => handle_request_error(state, error),
        Action::SelectMatch(match_id) => handle_select_match(state, match_id),
        Action::NewHoverIdReceived {
            match_id,
            hover_info,
        } => handle_new_hover_id(state, match_id, hover_info),
        Action::SetDebugState(debug) => handle_set_debug_state(state, debug),
    }
}

/// Remap every stored position through the edits since the last version.
///
/// In-flight query ranges are deliberately *not* remapped: the staleness
/// check compares the range as submitted against current dirty ranges,
/// and remapping it would defeat the conservative discard.
fn map_through_edits(state: &PluginState, mapping: &Mapping) -> PluginState {
    if mapping.is_identity() {
        return state.clone();
    }
    let remap = |matches: &[Match]| -> Vec<Match> {
        matches
            .iter()
            .map(|m| {
                let range = mapping.map_range(m.range());
                Match {
                    from: range.from,
                    to: range.to,
                    ..m.clone()
                }
            })
            .collect()
    };
    PluginState {
        current_matches: Arc::new(remap(&state.current_matches)),
        filtered_matches: state
            .filtered_matches
            .as_ref()
            .map(|matches| Arc::new(remap(matches))),
        // Mapped one-to-one, not merged: coalescing is not required to be
        // eager, and keeping each range intact keeps its debug marker
        // aligned with it.
        dirtied_ranges: state
            .dirtied_ranges
            .iter()
            .map(|r| mapping.map_range(*r))
            .collect(),
        decorations: state.decorations.map(mapping),
        ..state.clone()
    }
}

fn handle_new_dirtied_ranges(mut state: PluginState, ranges: Vec<Range>) -> PluginState {
    let evicted: FxHashSet<MatchId> = state
        .current_matches
        .iter()
        .filter(|m| m.range().touches_any(&ranges))
        .map(|m| m.match_id.clone())
        .collect();
    if !evicted.is_empty() {
        trace!(count = evicted.len(), "evicting matches touched by dirty ranges");
        state.current_matches = Arc::new(
            state
                .current_matches
                .iter()
                .filter(|m| !evicted.contains(&m.match_id))
                .cloned()
                .collect(),
        );
        state.decorations = state
            .decorations
            .remove_where(|d| d.match_id().is_some_and(|id| evicted.contains(id)));
    }
    state.dirtied_ranges =
        merge_ranges(&[state.dirtied_ranges.as_slice(), ranges.as_slice()].concat());
    if state.debug {
        // Rebuild the dirty markers from the merged set so repeated
        // dirtying stays idempotent.
        state.decorations = state
            .decorations
            .remove_where(|d| d.debug_kind() == Some(DebugKind::Dirty))
            .add(
                state
                    .dirtied_ranges
                    .iter()
                    .map(|r| debug_decoration(*r, DebugKind::Dirty)),
            );
    }
    state.validation_pending = true;
    state
}

fn handle_request_for_document(
    mut state: PluginState,
    ctx: &TransactionContext<'_>,
    set_id: SetId,
    category_ids: Vec<CategoryId>,
) -> PluginState {
    let blocks = blocks_from_document(ctx.doc(), 0, state.config.skip);
    if blocks.is_empty() {
        return state;
    }
    let queries: Vec<BlockQuery> = blocks
        .into_iter()
        .map(|b| BlockQuery {
            id: b.id,
            from: b.from,
            to: b.to,
            input_string: b.text,
        })
        .collect();
    if state.debug {
        state.decorations = state.decorations.add(
            queries
                .iter()
                .map(|q| debug_decoration(q.range(), DebugKind::InFlight)),
        );
    }
    state.block_queries_in_flight =
        state
            .block_queries_in_flight
            .register(set_id, queries, &category_ids);
    state
}

fn handle_request_for_dirty_ranges(
    mut state: PluginState,
    ctx: &TransactionContext<'_>,
    set_id: SetId,
    category_ids: Vec<CategoryId>,
) -> PluginState {
    let mut seen: FxHashSet<crate::base::BlockId> = FxHashSet::default();
    let mut queries: Vec<BlockQuery> = Vec::new();
    let mut unconverted: Vec<Range> = Vec::new();
    for range in &state.dirtied_ranges {
        let expansion = expand_to_blocks(
            ctx.doc(),
            0,
            state.config.skip,
            std::slice::from_ref(range),
        )
        .pop();
        match expansion {
            Some(block) if seen.insert(block.id.clone()) => queries.push(BlockQuery {
                id: block.id,
                from: block.from,
                to: block.to,
                input_string: block.text,
            }),
            Some(_) => {} // dedup: another dirty range already expanded to this block
            None => unconverted.push(*range),
        }
    }
    if queries.is_empty() {
        return state;
    }
    debug!(
        set_id = %set_id,
        consumed = state.dirtied_ranges.len() - unconverted.len(),
        blocks = queries.len(),
        "dirty ranges converted to block queries"
    );
    state.dirtied_ranges = unconverted;
    state.validation_pending = false;
    if state.debug {
        let in_flight = queries
            .iter()
            .map(|q| debug_decoration(q.range(), DebugKind::InFlight));
        let still_dirty = state
            .dirtied_ranges
            .iter()
            .map(|r| debug_decoration(*r, DebugKind::Dirty));
        state.decorations = state
            .decorations
            .remove_where(|d| d.debug_kind() == Some(DebugKind::Dirty))
            .add(in_flight.chain(still_dirty));
    }
    state.block_queries_in_flight =
        state
            .block_queries_in_flight
            .register(set_id, queries, &category_ids);
    state
}

fn handle_request_success(mut state: PluginState, success: CheckSuccess) -> PluginState {
    if success.block_results.is_empty() {
        return state;
    }
    for result in success.block_results {
        let (registry, removed) = state
            .block_queries_in_flight
            .remove_query(&success.set_id, &result.block_query_id);
        state.block_queries_in_flight = registry;
        let Some(in_flight) = removed else {
            trace!(
                set_id = %success.set_id,
                query_id = %result.block_query_id,
                "result for unknown block query, skipping"
            );
            continue;
        };
        let query_range = in_flight.block_query.range();
        state.decorations = state.decorations.remove_where(|d| {
            d.debug_kind() == Some(DebugKind::InFlight) && d.range == query_range
        });

        // A result computed against text that has since been dirtied
        // again must not be applied; the range stays dirty instead.
        if query_range.touches_any(&state.dirtied_ranges) {
            warn!(
                query_id = %in_flight.block_query.id,
                from = query_range.from,
                to = query_range.to,
                "discarding stale result for re-dirtied range"
            );
            state.validation_pending = true;
            continue;
        }

        // Category-scoped supersession: only matches inside the query
        // range whose category was requested for this block give way.
        let superseded: FxHashSet<MatchId> = state
            .current_matches
            .iter()
            .filter(|m| {
                query_range.contains_range(m.range())
                    && result.category_ids.contains(&m.category.id)
            })
            .map(|m| m.match_id.clone())
            .collect();
        trace!(
            query_id = %in_flight.block_query.id,
            superseded = superseded.len(),
            incoming = result.matches.len(),
            "applying block result"
        );

        let mut next_matches: Vec<Match> = state
            .current_matches
            .iter()
            .filter(|m| !superseded.contains(&m.match_id))
            .cloned()
            .collect();
        let mut decorations = state
            .decorations
            .remove_where(|d| d.match_id().is_some_and(|id| superseded.contains(id)));
        for m in &result.matches {
            decorations = decorations.add(state.decorations_for(m));
        }
        next_matches.extend(result.matches);
        state.current_matches = Arc::new(next_matches);
        state.decorations = decorations;
    }
    state
}

fn handle_request_error(mut state: PluginState, error: CheckError) -> PluginState {
    let (registry, removed) = state
        .block_queries_in_flight
        .remove_query(&error.set_id, &error.validation_id);
    state.block_queries_in_flight = registry;
    if let Some(in_flight) = removed {
        let range = in_flight.block_query.range();
        warn!(
            set_id = %error.set_id,
            query_id = %error.validation_id,
            message = %error.message,
            "block query failed, re-dirtying its range"
        );
        state.decorations = state
            .decorations
            .remove_where(|d| d.debug_kind() == Some(DebugKind::InFlight) && d.range == range);
        state.dirtied_ranges =
            merge_ranges(&[state.dirtied_ranges.as_slice(), &[range]].concat());
        if state.debug {
            state.decorations = state
                .decorations
                .remove_where(|d| d.debug_kind() == Some(DebugKind::Dirty))
                .add(
                    state
                        .dirtied_ranges
                        .iter()
                        .map(|r| debug_decoration(*r, DebugKind::Dirty)),
                );
        }
    }
    state.error = Some(error.message);
    state
}

fn handle_select_match(mut state: PluginState, match_id: Option<MatchId>) -> PluginState {
    let previous = state.selected_match.take();
    state.selected_match = match_id.clone();
    refresh_match_decorations(&mut state, &[previous, match_id]);
    state
}

fn handle_new_hover_id(
    mut state: PluginState,
    match_id: Option<MatchId>,
    hover_info: Option<HoverInfo>,
) -> PluginState {
    let previous = state.hover_id.take();
    state.hover_id = match_id.clone();
    state.hover_info = hover_info;
    refresh_match_decorations(&mut state, &[previous, match_id]);
    state
}

/// Regenerate decorations for just the named matches — a targeted update,
/// not a rebuild, so unrelated visual state is left alone.
fn refresh_match_decorations(state: &mut PluginState, ids: &[Option<MatchId>]) {
    for id in ids.iter().flatten() {
        let Some(m) = state.current_matches.iter().find(|m| &m.match_id == id) else {
            continue;
        };
        let fresh = state.decorations_for(m);
        state.decorations = state
            .decorations
            .remove_where(|d| d.match_id() == Some(id))
            .add(fresh);
    }
}

fn handle_set_debug_state(mut state: PluginState, debug: bool) -> PluginState {
    if state.debug == debug {
        return state;
    }
    state.debug = debug;
    if debug {
        let dirty = state
            .dirtied_ranges
            .iter()
            .map(|r| debug_decoration(*r, DebugKind::Dirty));
        let in_flight = state
            .block_queries_in_flight
            .pending_ranges()
            .into_iter()
            .map(|r| debug_decoration(r, DebugKind::InFlight));
        state.decorations = state.decorations.add(dirty.chain(in_flight));
    } else {
        state.decorations = state.decorations.remove_where(|d| d.is_debug());
    }
    state
}
