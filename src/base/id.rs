//! Identifier derivation for blocks, queries, and validation sets.

use smol_str::SmolStr;
use uuid::Uuid;

use super::range::Range;

/// Id of one addressable block / block query.
pub type BlockId = SmolStr;
/// Id of one match, assigned by the checking service.
pub type MatchId = SmolStr;
/// Id of one validation set (a group of queries issued together).
pub type SetId = SmolStr;
/// Id of a match category.
pub type CategoryId = SmolStr;

/// Derive the deterministic id for a block at a given range.
///
/// The same (seed, range) pair always reproduces the same id, so a block
/// re-validated at the same position keys to the same in-flight entry.
pub fn block_id(seed: u64, range: Range) -> BlockId {
    SmolStr::new(format!("{seed}-from:{}-to:{}", range.from, range.to))
}

/// Mint a fresh validation set id.
///
/// Set ids only need to be unique within the lifetime of one state; a v4
/// UUID comfortably clears that bar.
pub fn new_set_id() -> SetId {
    SmolStr::new(Uuid::new_v4().to_string())
}
