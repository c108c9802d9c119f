//! The closed action set driving the reducer.

use serde::{Deserialize, Serialize};

use crate::base::{CategoryId, MatchId, Range, SetId};
use crate::service::{CheckError, CheckSuccess};

/// Tooltip geometry captured by the presentation layer when a hover
/// begins. Opaque pass-through data; the engine stores and returns it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoverInfo {
    pub container_left: f64,
    pub container_top: f64,
    pub left: f64,
    pub top: f64,
    pub height: f64,
}

/// Every transition the engine knows. Anything else is the identity.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Ranges invalidated by an edit; evicts overlapping matches.
    ApplyNewDirtiedRanges(Vec<Range>),
    /// Snapshot the whole document into one validation set.
    RequestForDocument {
        set_id: SetId,
        category_ids: Vec<CategoryId>,
    },
    /// Convert accumulated dirty ranges into one validation set.
    RequestForDirtyRanges {
        set_id: SetId,
        category_ids: Vec<CategoryId>,
    },
    /// The checking service resolved some block queries.
    RequestSuccess(CheckSuccess),
    /// The checking service failed one block query.
    RequestError(CheckError),
    /// Select a match (or clear the selection with `None`).
    SelectMatch(Option<MatchId>),
    /// The pointer moved over (or off) a match decoration.
    NewHoverIdReceived {
        match_id: Option<MatchId>,
        hover_info: Option<HoverInfo>,
    },
    /// Toggle debug-mode range markers.
    SetDebugState(bool),
}
