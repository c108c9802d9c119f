//! Document geometry — the Range/Block model.
//!
//! A minimal addressable document tree standing in for the editor
//! runtime, plus the two reductions the engine needs from it:
//! - leaf-block enumeration with deterministic ids ([`blocks_from_document`])
//! - dirtied-range extraction and position mapping for transactions
//!   ([`dirtied_ranges_from_steps`], [`Mapping`])

mod blocks;
mod error;
mod node;
mod transaction;

pub use blocks::{
    Block, SkipPolicy, blocks_from_document, expand_ranges_to_block_boundaries, expand_to_blocks,
};
pub use error::DocumentError;
pub use node::{Document, Node, code_block, doc, li, p, ul};
pub use transaction::{Assoc, Mapping, ReplaceStep, StepMap, dirtied_ranges_from_steps};
