//! Disjoint-range character class with set algebra.
//!
//! The reference engine keeps ranges in a pointer-based binary search tree and
//! mutates it by rotating to an "increasing vine" (a right-linked list ordered by
//! `lo`), splicing, and rebalancing. That shape exists to let C manage the tree
//! with raw node pointers; a `Vec<(u32, u32)>` kept sorted and merged gives the
//! same invariants (disjoint, strictly increasing, no two ranges adjacent) and the
//! same algorithmic shape (normalize a linear sequence, then binary-search it) with
//! none of the unsafe pointer plumbing. See `DESIGN.md` for the full rationale.

use std::cmp::Ordering;

/// A set of Unicode scalar values, represented as disjoint, non-adjacent, sorted
/// inclusive ranges `[lo, hi]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CharClass {
    ranges: Vec<(u32, u32)>,
}

impl CharClass {
    /// An empty class.
    pub fn new() -> Self {
        CharClass { ranges: Vec::new() }
    }

    /// A class containing a single codepoint.
    pub fn single(cp: u32) -> Self {
        let mut c = Self::new();
        c.insert_range(cp, cp);
        c
    }

    /// A class containing a single inclusive range.
    pub fn from_range(lo: u32, hi: u32) -> Self {
        let mut c = Self::new();
        c.insert_range(lo, hi);
        c
    }

    /// A class containing the union of several inclusive ranges.
    pub fn from_ranges(ranges: impl IntoIterator<Item = (u32, u32)>) -> Self {
        let mut c = Self::new();
        for (lo, hi) in ranges {
            c.insert_range(lo, hi);
        }
        c
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Number of disjoint ranges (the "size" of the underlying tree/vine).
    pub fn size(&self) -> usize {
        self.ranges.len()
    }

    /// Total number of codepoints covered.
    pub fn cardinality(&self) -> u64 {
        self.ranges
            .iter()
            .map(|&(lo, hi)| u64::from(hi - lo) + 1)
            .sum()
    }

    /// In-order disjoint ranges, strictly increasing.
    pub fn ranges(&self) -> &[(u32, u32)] {
        &self.ranges
    }

    pub fn copy(&self) -> Self {
        self.clone()
    }

    /// `O(log n)` membership test via binary search over the disjoint ranges.
    pub fn contains(&self, cp: u32) -> bool {
        self.ranges
            .binary_search_by(|&(lo, hi)| {
                if cp < lo {
                    Ordering::Greater
                } else if cp > hi {
                    Ordering::Less
                } else {
                    Ordering::Equal
                }
            })
            .is_ok()
    }

    /// Alias kept for parity with the spec's `search` operation name.
    pub fn search(&self, cp: u32) -> bool {
        self.contains(cp)
    }

    pub fn insert_codepoint(&mut self, cp: u32) {
        self.insert_range(cp, cp);
    }

    /// Insert `[lo, hi]`, merging with any overlapping or adjacent existing ranges.
    pub fn insert_range(&mut self, lo: u32, hi: u32) {
        assert!(lo <= hi, "insert_range: lo > hi");
        let start = self
            .ranges
            .partition_point(|&(_, existing_hi)| existing_hi + 1 < lo);
        let end = self
            .ranges
            .partition_point(|&(existing_lo, _)| existing_lo <= hi.saturating_add(1));
        let mut new_lo = lo;
        let mut new_hi = hi;
        for &(existing_lo, existing_hi) in &self.ranges[start..end] {
            new_lo = new_lo.min(existing_lo);
            new_hi = new_hi.max(existing_hi);
        }
        self.ranges.splice(start..end, [(new_lo, new_hi)]);
    }

    pub fn delete_codepoint(&mut self, cp: u32) {
        self.delete_range(cp, cp);
    }

    /// Remove `[lo, hi]`, splitting any range that straddles a boundary.
    pub fn delete_range(&mut self, lo: u32, hi: u32) {
        assert!(lo <= hi, "delete_range: lo > hi");
        let start = self.ranges.partition_point(|&(_, existing_hi)| existing_hi < lo);
        let end = self.ranges.partition_point(|&(existing_lo, _)| existing_lo <= hi);
        let mut replacement = Vec::new();
        for &(existing_lo, existing_hi) in &self.ranges[start..end] {
            if existing_lo < lo {
                replacement.push((existing_lo, lo - 1));
            }
            if existing_hi > hi {
                replacement.push((hi + 1, existing_hi));
            }
        }
        self.ranges.splice(start..end, replacement);
    }

    /// `self = self ∪ other`.
    pub fn union(&mut self, other: &CharClass) {
        for &(lo, hi) in &other.ranges {
            self.insert_range(lo, hi);
        }
    }

    /// `self = self − other`.
    pub fn difference(&mut self, other: &CharClass) {
        for &(lo, hi) in &other.ranges {
            self.delete_range(lo, hi);
        }
    }

    /// `self = self ∩ other`, implemented per the spec as `self − (self − other)`.
    pub fn intersection(&mut self, other: &CharClass) {
        let mut complement_within_self = self.clone();
        complement_within_self.difference(other);
        self.difference(&complement_within_self);
    }

    /// True merge-based intersection, used by property tests to cross-check
    /// `intersection` against an independent implementation.
    #[cfg(test)]
    pub(crate) fn intersection_by_merge(a: &CharClass, b: &CharClass) -> CharClass {
        let mut out = Vec::new();
        let (mut i, mut j) = (0, 0);
        while i < a.ranges.len() && j < b.ranges.len() {
            let (a_lo, a_hi) = a.ranges[i];
            let (b_lo, b_hi) = b.ranges[j];
            let lo = a_lo.max(b_lo);
            let hi = a_hi.min(b_hi);
            if lo <= hi {
                out.push((lo, hi));
            }
            if a_hi < b_hi {
                i += 1;
            } else {
                j += 1;
            }
        }
        CharClass { ranges: out }
    }
}

/// `[A-Za-z0-9_]`
pub fn word_class() -> CharClass {
    CharClass::from_ranges([(b'0' as u32, b'9' as u32), (b'A' as u32, b'Z' as u32), (b'_' as u32, b'_' as u32), (b'a' as u32, b'z' as u32)])
}

/// `[0-9]`
pub fn digit_class() -> CharClass {
    CharClass::from_range(b'0' as u32, b'9' as u32)
}

/// `[ \t\n\x0B\f\r]`
pub fn space_class() -> CharClass {
    CharClass::from_ranges([(0x09, 0x0D), (0x20, 0x20)])
}

/// `[ \t]` — horizontal whitespace (`\h`).
pub fn hspace_class() -> CharClass {
    CharClass::from_ranges([(0x09, 0x09), (0x20, 0x20)])
}

/// The set `{\0, \r, \n, \f, \v}` excluded by `.` and `\N` (both lower to a negated
/// class over this set).
pub fn line_terminator_class() -> CharClass {
    CharClass::from_ranges([(0x00, 0x00), (0x0A, 0x0A), (0x0B, 0x0D)])
}
