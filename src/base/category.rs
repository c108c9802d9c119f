//! Check categories — immutable reference data.

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use super::id::CategoryId;

/// A classification of checks (e.g. style, grammar).
///
/// Categories are reference data: adding or removing one from the engine's
/// config never invalidates existing matches, it only affects which
/// categories future requests ask for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub colour: SmolStr,
}

impl Category {
    pub fn new(
        id: impl Into<CategoryId>,
        name: impl Into<String>,
        colour: impl Into<SmolStr>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            colour: colour.into(),
        }
    }
}
