/// Half-open position ranges over document coordinates.
///
/// Positions are editor coordinates (one unit per character, one per
/// block-node boundary), not byte offsets. A `Range` with `from == to` is
/// a zero-width marker; deletions are recorded this way so they still
/// collide with anything sitting at the collapse point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Range {
    pub from: u32,
    pub to: u32,
}

impl Range {
    /// Create a range. `from` must not exceed `to`.
    pub fn new(from: u32, to: u32) -> Self {
        debug_assert!(from <= to, "range start {from} past end {to}");
        Self { from, to }
    }

    /// Zero-width range at a single position.
    pub fn at(pos: u32) -> Self {
        Self { from: pos, to: pos }
    }

    pub fn len(&self) -> u32 {
        self.to - self.from
    }

    pub fn is_empty(&self) -> bool {
        self.from == self.to
    }

    /// Overlap test, inclusive at both boundaries.
    ///
    /// Inclusive so a zero-width deletion marker sitting exactly at a
    /// range's edge still counts as touching it.
    pub fn touches(&self, other: Range) -> bool {
        self.from <= other.to && self.to >= other.from
    }

    /// True if any of `ranges` touches this range.
    pub fn touches_any(&self, ranges: &[Range]) -> bool {
        ranges.iter().any(|r| self.touches(*r))
    }

    /// Containment test, endpoints inclusive.
    pub fn contains_range(&self, other: Range) -> bool {
        other.from >= self.from && other.to <= self.to
    }

    /// Smallest range covering both.
    pub fn cover(&self, other: Range) -> Range {
        Range::new(self.from.min(other.from), self.to.max(other.to))
    }
}

/// Coalesce possibly-overlapping ranges into disjoint sorted ranges.
///
/// Touching ranges (inclusive boundaries) merge, so feeding the same range
/// twice yields it once.
pub fn merge_ranges(ranges: &[Range]) -> Vec<Range> {
    let mut sorted: Vec<Range> = ranges.to_vec();
    sorted.sort_by_key(|r| (r.from, r.to));
    let mut merged: Vec<Range> = Vec::with_capacity(sorted.len());
    for range in sorted {
        match merged.last_mut() {
            Some(last) if last.touches(range) => *last = last.cover(range),
            _ => merged.push(range),
        }
    }
    merged
}
