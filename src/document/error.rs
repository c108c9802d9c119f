//! Error types for document operations.

use thiserror::Error;

/// Errors that can occur when applying edits to a document.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DocumentError {
    /// A position lies past the end of the document.
    #[error("position {position} out of bounds (document size {size})")]
    OutOfBounds { position: u32, size: u32 },

    /// A range's start lies past its end.
    #[error("invalid range: start {from} past end {to}")]
    InvalidRange { from: u32, to: u32 },

    /// A replacement spans more than one leaf block.
    #[error("replacement {from} to {to} crosses a block boundary")]
    CrossesBlockBoundary { from: u32, to: u32 },

    /// A position falls on a node boundary rather than inside text.
    #[error("position {position} does not address text content")]
    NotInText { position: u32 },
}
