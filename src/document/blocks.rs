//! Block enumeration and range→block expansion.
//!
//! Blocks are the granularity of validation requests: each leaf
//! text-block of the document becomes one addressable unit with a
//! deterministic id.

use crate::base::{BlockId, Range, block_id};

use super::node::{Document, Node};

/// One addressable validation unit: a leaf block's text and position.
///
/// For whole-block enumeration `to` is the block node's end position (one
/// past the content); for dirty-range expansion queries `to` is the
/// content end. Both shapes key to distinct, reproducible ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub id: BlockId,
    pub from: u32,
    pub to: u32,
    pub text: String,
}

impl Block {
    pub fn range(&self) -> Range {
        Range::new(self.from, self.to)
    }
}

/// Which leaf blocks to leave out of validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SkipPolicy {
    /// Validate every leaf block.
    #[default]
    Nothing,
    /// Leave code blocks unvalidated.
    CodeBlocks,
}

impl SkipPolicy {
    pub fn skips(&self, node: &Node) -> bool {
        match self {
            SkipPolicy::Nothing => false,
            SkipPolicy::CodeBlocks => node.is_code(),
        }
    }
}

/// Enumerate every qualifying leaf block in document order.
///
/// Ids are derived from `(seed, range)`, so enumerating the same document
/// with the same seed reproduces the same ids.
pub fn blocks_from_document(document: &Document, seed: u64, skip: SkipPolicy) -> Vec<Block> {
    document
        .leaves()
        .iter()
        .filter(|leaf| !skip.skips(leaf.node))
        .map(|leaf| {
            let range = Range::new(leaf.content_start, leaf.node_end());
            Block {
                id: block_id(seed, range),
                from: range.from,
                to: range.to,
                text: leaf.text.to_string(),
            }
        })
        .collect()
}

/// Expand each range outward to its enclosing block's content range.
///
/// Ranges that touch no qualifying block are dropped. Overlapping
/// expansions are not deduplicated here; the query registry does that.
pub fn expand_ranges_to_block_boundaries(
    document: &Document,
    skip: SkipPolicy,
    ranges: &[Range],
) -> Vec<Range> {
    expand_to_blocks(document, 0, skip, ranges)
        .into_iter()
        .map(|b| b.range())
        .collect()
}

/// Expand each range to a full [`Block`] query over its enclosing block.
///
/// The block's `to` is the content end (not the node end), and
/// `input_string` is the block's full text — a dirty range anywhere in a
/// block re-validates the whole block.
pub fn expand_to_blocks(
    document: &Document,
    seed: u64,
    skip: SkipPolicy,
    ranges: &[Range],
) -> Vec<Block> {
    let leaves = document.leaves();
    ranges
        .iter()
        .filter_map(|range| {
            leaves
                .iter()
                .filter(|leaf| !skip.skips(leaf.node))
                .find(|leaf| {
                    Range::new(leaf.content_start, leaf.content_end).touches(*range)
                })
                .map(|leaf| {
                    let content = Range::new(leaf.content_start, leaf.content_end);
                    Block {
                        id: block_id(seed, content),
                        from: content.from,
                        to: content.to,
                        text: leaf.text.to_string(),
                    }
                })
        })
        .collect()
}
