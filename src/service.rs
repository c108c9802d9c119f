//! Checking-service wire contract.
//!
//! The engine is agnostic to transport; these are the request/response
//! shapes it exchanges with whatever client performs the linguistic
//! checking. Field names are camelCase on the wire.

use serde::{Deserialize, Serialize};

use crate::base::{BlockId, Category, CategoryId, MatchId, Range, SetId};

/// One pending unit of work: the exact text and range submitted for
/// checking. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockQuery {
    pub id: BlockId,
    pub from: u32,
    pub to: u32,
    pub input_string: String,
}

impl BlockQuery {
    pub fn range(&self) -> Range {
        Range::new(self.from, self.to)
    }
}

/// A replacement proposed by the checking service.
///
/// Either a plain text replacement or a richer structured rewrite;
/// consumers dispatch on the variant at the point of application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Suggestion {
    #[serde(rename = "TEXT_SUGGESTION")]
    Text { text: String },
    #[serde(rename = "REWRITE_SUGGESTION")]
    Rewrite { text: String, label: String },
}

/// One validation output, owned by the engine from the moment it is
/// accepted until superseded or invalidated by a later dirty range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub match_id: MatchId,
    pub from: u32,
    pub to: u32,
    pub category: Category,
    pub annotation: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<Suggestion>,
    pub input_string: String,
}

impl Match {
    pub fn range(&self) -> Range {
        Range::new(self.from, self.to)
    }
}

/// A validation request: one set of block queries issued together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckRequest {
    pub set_id: SetId,
    pub category_ids: Vec<CategoryId>,
    pub block_queries: Vec<BlockQuery>,
}

/// The service's result for one block query.
///
/// `category_ids` are the categories that were *requested* for this block
/// — the scope of supersession — not the categories of the returned
/// matches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockResult {
    pub block_query_id: BlockId,
    pub category_ids: Vec<CategoryId>,
    pub matches: Vec<Match>,
}

/// A successful response for a validation set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckSuccess {
    pub set_id: SetId,
    pub block_results: Vec<BlockResult>,
}

/// A failed block query within a validation set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckError {
    pub set_id: SetId,
    pub validation_id: BlockId,
    pub message: String,
}
