//! # prosecheck
//!
//! Incremental prose-validation state engine for block-structured,
//! mutable documents.
//!
//! Ranges of text are sent to an external checking service; the results
//! arrive asynchronously against a document that may have changed in the
//! meantime. This crate owns the reconciliation: dirty-range tracking,
//! in-flight request bookkeeping, match supersession, staleness discard,
//! and the derived decoration overlay — all as one pure reducer over an
//! immutable-per-version state value.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! state      → reducer, actions, in-flight registry, selectors
//!   ↓
//! decoration → derived overlay (match highlights, debug markers)
//!   ↓
//! service    → checking-service wire contract
//!   ↓
//! document   → document tree, blocks, transactions, position mapping
//!   ↓
//! base       → primitives (Range, id derivation, categories)
//! ```
//!
//! Rendering, the network client, the editor runtime, and debounce
//! policy are external collaborators; the engine only consumes block
//! enumeration plus edit notifications, and exposes state snapshots plus
//! a closed action set.

/// Foundation types: Range, id derivation, categories
pub mod base;

/// Document geometry: block tree, transactions, position mapping
pub mod document;

/// Checking-service wire contract
pub mod service;

/// Renderer-facing decorations derived from engine state
pub mod decoration;

/// The validation state machine: reducer, actions, selectors
pub mod state;

// Re-export commonly needed items
pub use base::{Category, Range};
pub use service::{BlockQuery, CheckError, CheckRequest, CheckSuccess, Match, Suggestion};
pub use state::{Action, Config, PluginState, TransactionContext, reduce};
