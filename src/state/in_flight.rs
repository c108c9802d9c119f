//! Bookkeeping for outstanding validation requests.
//!
//! Queries are grouped into validation sets; each set remembers how many
//! blocks it originally contained so aggregate progress can be reported
//! while individual queries resolve out of order.

use indexmap::IndexMap;

use crate::base::{BlockId, CategoryId, Range, SetId};
use crate::service::BlockQuery;

/// One outstanding block query and the categories it was issued for.
#[derive(Debug, Clone, PartialEq)]
pub struct InFlightBlockQuery {
    pub block_query: BlockQuery,
    pub category_ids: Vec<CategoryId>,
}

/// One validation set's progress accounting.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationSetInFlight {
    total: u32,
    pending: IndexMap<BlockId, InFlightBlockQuery>,
}

impl ValidationSetInFlight {
    pub fn new(queries: Vec<BlockQuery>, category_ids: &[CategoryId]) -> Self {
        let total = queries.len() as u32;
        Self::with_total(queries, category_ids, total)
    }

    /// A set whose original total differs from the currently pending
    /// count (some queries already resolved).
    pub fn with_total(queries: Vec<BlockQuery>, category_ids: &[CategoryId], total: u32) -> Self {
        let pending = queries
            .into_iter()
            .map(|q| {
                (
                    q.id.clone(),
                    InFlightBlockQuery {
                        block_query: q,
                        category_ids: category_ids.to_vec(),
                    },
                )
            })
            .collect();
        Self { total, pending }
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    pub fn pending_count(&self) -> u32 {
        self.pending.len() as u32
    }

    pub fn pending(&self) -> impl Iterator<Item = &InFlightBlockQuery> {
        self.pending.values()
    }

    pub fn get(&self, query_id: &str) -> Option<&InFlightBlockQuery> {
        self.pending.get(query_id)
    }

    fn remove(&mut self, query_id: &str) -> Option<InFlightBlockQuery> {
        self.pending.shift_remove(query_id)
    }
}

/// All validation sets currently in flight, keyed by set id.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BlockQueriesInFlight {
    sets: IndexMap<SetId, ValidationSetInFlight>,
}

impl BlockQueriesInFlight {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn get(&self, set_id: &str) -> Option<&ValidationSetInFlight> {
        self.sets.get(set_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SetId, &ValidationSetInFlight)> {
        self.sets.iter()
    }

    /// Register a new validation set. Returns the updated registry.
    pub fn register(
        &self,
        set_id: SetId,
        queries: Vec<BlockQuery>,
        category_ids: &[CategoryId],
    ) -> Self {
        tracing::debug!(set_id = %set_id, blocks = queries.len(), "registering validation set");
        let mut next = self.clone();
        next.sets
            .insert(set_id, ValidationSetInFlight::new(queries, category_ids));
        next
    }

    /// Insert a prebuilt set (used to seed states in tests and by
    /// embedders restoring sessions).
    pub fn with_set(&self, set_id: SetId, set: ValidationSetInFlight) -> Self {
        let mut next = self.clone();
        next.sets.insert(set_id, set);
        next
    }

    /// Remove one query from a set; a drained set is deleted outright so
    /// no empty sets persist.
    pub fn remove_query(
        &self,
        set_id: &str,
        query_id: &str,
    ) -> (Self, Option<InFlightBlockQuery>) {
        let mut next = self.clone();
        let Some(set) = next.sets.get_mut(set_id) else {
            return (next, None);
        };
        let removed = set.remove(query_id);
        if removed.is_some() && set.pending.is_empty() {
            tracing::debug!(set_id = %set_id, "validation set complete");
            next.sets.shift_remove(set_id);
        }
        (next, removed)
    }

    /// Ranges of every pending query across all sets.
    pub fn pending_ranges(&self) -> Vec<Range> {
        self.sets
            .values()
            .flat_map(|set| set.pending().map(|q| q.block_query.range()))
            .collect()
    }

    /// `(pending, total)` block counts summed across all sets.
    pub fn totals(&self) -> (u32, u32) {
        self.sets.values().fold((0, 0), |(pending, total), set| {
            (pending + set.pending_count(), total + set.total())
        })
    }
}
