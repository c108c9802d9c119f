//! Renderer-facing decorations derived from engine state.
//!
//! The decoration set is a projection, never the source of truth:
//! `current_matches` plus the hover/selection/debug flags are. Everything
//! here is rebuildable from those inputs, and
//! [`decoration_set_from_parts`] is exactly that rebuild — the oracle the
//! incrementally maintained set is property-checked against.

use rustc_hash::{FxHashMap, FxHashSet};
use smol_str::SmolStr;

use crate::base::{CategoryId, MatchId, Range};
use crate::document::Mapping;
use crate::service::Match;

/// Per-category colour overrides, applied over each category's own colour.
pub type MatchColours = FxHashMap<CategoryId, SmolStr>;

/// What a debug decoration marks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DebugKind {
    /// A range awaiting conversion into block queries.
    Dirty,
    /// A range covered by an outstanding block query.
    InFlight,
}

/// The payload of a decoration.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum DecorationKind {
    /// Highlight for one match, tagged with its id.
    Match {
        match_id: MatchId,
        category_id: CategoryId,
        colour: SmolStr,
        hovered: bool,
        selected: bool,
    },
    /// Debug-mode marker for a dirty or in-flight range.
    Debug { kind: DebugKind },
}

/// A positional annotation for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Decoration {
    pub range: Range,
    pub kind: DecorationKind,
}

impl Decoration {
    /// The match id this decoration is tagged with, if it is a match
    /// highlight.
    pub fn match_id(&self) -> Option<&MatchId> {
        match &self.kind {
            DecorationKind::Match { match_id, .. } => Some(match_id),
            DecorationKind::Debug { .. } => None,
        }
    }

    pub fn is_debug(&self) -> bool {
        matches!(self.kind, DecorationKind::Debug { .. })
    }

    pub fn debug_kind(&self) -> Option<DebugKind> {
        match &self.kind {
            DecorationKind::Debug { kind } => Some(*kind),
            DecorationKind::Match { .. } => None,
        }
    }
}

/// Decorations for one match, tagged with its id and carrying the visual
/// state flags for the current hover/selection.
pub fn decorations_for_match(
    m: &Match,
    colours: &MatchColours,
    hovered: bool,
    selected: bool,
) -> Vec<Decoration> {
    let colour = colours
        .get(&m.category.id)
        .cloned()
        .unwrap_or_else(|| m.category.colour.clone());
    vec![Decoration {
        range: m.range(),
        kind: DecorationKind::Match {
            match_id: m.match_id.clone(),
            category_id: m.category.id.clone(),
            colour,
            hovered,
            selected,
        },
    }]
}

/// A debug-mode marker over a range.
pub fn debug_decoration(range: Range, kind: DebugKind) -> Decoration {
    Decoration {
        range,
        kind: DecorationKind::Debug { kind },
    }
}

/// An ordered, rebuildable index of decorations.
///
/// Updates return a new set; a held snapshot never changes underneath its
/// reader.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DecorationSet {
    decorations: Vec<Decoration>,
}

impl DecorationSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_decorations(mut decorations: Vec<Decoration>) -> Self {
        decorations.sort();
        Self { decorations }
    }

    pub fn len(&self) -> usize {
        self.decorations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decorations.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Decoration> {
        self.decorations.iter()
    }

    /// A new set with `extra` added.
    pub fn add(&self, extra: impl IntoIterator<Item = Decoration>) -> Self {
        let mut decorations = self.decorations.clone();
        decorations.extend(extra);
        decorations.sort();
        Self { decorations }
    }

    /// A new set without the decorations matching `pred`.
    pub fn remove_where(&self, pred: impl Fn(&Decoration) -> bool) -> Self {
        Self {
            decorations: self
                .decorations
                .iter()
                .filter(|d| !pred(d))
                .cloned()
                .collect(),
        }
    }

    /// Decorations matching `pred`.
    pub fn find(&self, pred: impl Fn(&Decoration) -> bool) -> Vec<&Decoration> {
        self.decorations.iter().filter(|d| pred(d)).collect()
    }

    /// Ids of all matches that currently have a decoration.
    pub fn match_ids(&self) -> FxHashSet<MatchId> {
        self.decorations
            .iter()
            .filter_map(|d| d.match_id().cloned())
            .collect()
    }

    /// Remap every decoration through an edit mapping.
    pub fn map(&self, mapping: &Mapping) -> Self {
        if mapping.is_identity() {
            return self.clone();
        }
        let mut decorations: Vec<Decoration> = self
            .decorations
            .iter()
            .map(|d| Decoration {
                range: mapping.map_range(d.range),
                kind: d.kind.clone(),
            })
            .collect();
        decorations.sort();
        Self { decorations }
    }
}

/// Build the full decoration set from its sources of truth.
///
/// Dirty and in-flight ranges only contribute when `debug` is set.
pub fn decoration_set_from_parts(
    matches: &[Match],
    colours: &MatchColours,
    hover_id: Option<&MatchId>,
    selected_match: Option<&MatchId>,
    debug: bool,
    dirtied_ranges: &[Range],
    in_flight_ranges: &[Range],
) -> DecorationSet {
    let mut decorations = Vec::with_capacity(matches.len());
    for m in matches {
        let hovered = hover_id == Some(&m.match_id);
        let selected = selected_match == Some(&m.match_id);
        decorations.extend(decorations_for_match(m, colours, hovered, selected));
    }
    if debug {
        decorations.extend(
            dirtied_ranges
                .iter()
                .map(|r| debug_decoration(*r, DebugKind::Dirty)),
        );
        decorations.extend(
            in_flight_ranges
                .iter()
                .map(|r| debug_decoration(*r, DebugKind::InFlight)),
        );
    }
    DecorationSet::from_decorations(decorations)
}
