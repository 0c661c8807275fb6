//! Runtime invariant assertions for the parser, factory, and execution engine.
//!
//! This module centralizes the `debug_assert!`s the rest of the crate relies on
//! instead of scattering ad-hoc checks through `engine`/`factory`/`charclass`.
//! Every assertion here is a structural invariant that should never fail for a
//! correctly-built `Graph` or `CaptureStore`: a failure means a bug in this
//! crate, not bad user input (bad user input is a `CompileError`, not a panic).
//!
//! # Usage
//!
//! Active only in debug builds (`debug_assertions`); compiled to nothing in
//! release for zero overhead, matching the teacher's own `invariants` module.

use crate::captures::CaptureStore;
use crate::codec::MAX_CODEPOINT;
use crate::graph::{CoreId, Graph};

/// Asserts that a codepoint is within the range this crate ever produces or
/// accepts (`codec::decode`'s `MALFORMED` sentinel excepted, since callers that
/// need to tell a real codepoint from the sentinel check for it explicitly).
#[inline]
pub fn assert_valid_codepoint(cp: u32) {
    #[cfg(debug_assertions)]
    {
        debug_assert!(
            cp <= MAX_CODEPOINT || cp == crate::codec::MALFORMED,
            "invariant violation: codepoint {cp:#x} exceeds U+10FFFF"
        );
    }
    #[cfg(not(debug_assertions))]
    {
        let _ = cp;
    }
}

/// Asserts that a [`CoreId`] actually indexes into `graph`'s arena.
///
/// Every `CoreId` in a fully-built `Graph` is produced by `Graph::alloc_core`
/// and never moves or is invalidated afterward (see `graph` module docs), so
/// this should hold for the lifetime of the graph.
#[inline]
pub fn assert_valid_core_id(graph: &Graph, id: CoreId) {
    #[cfg(debug_assertions)]
    {
        // `Graph::core` already panics via slice indexing on an out-of-range id;
        // this call exists so the check shows up explicitly at call sites that
        // want to assert it before doing other work, with a clearer message.
        let _ = graph.core(id);
    }
    #[cfg(not(debug_assertions))]
    {
        let _ = (graph, id);
    }
}

/// Asserts the capture-consistency invariant from the spec's testable
/// properties: every set capture slot nests inside the overall match (slot 0).
///
/// # Panics
///
/// Panics in debug builds if any set slot's `(begin, end)` falls outside
/// `groups[0]`, or if `begin > end` for any slot.
#[inline]
pub fn assert_captures_consistent(groups: &CaptureStore) {
    #[cfg(debug_assertions)]
    {
        let Some((whole_begin, whole_end)) = groups.get(0) else {
            return;
        };
        debug_assert!(whole_begin <= whole_end, "invariant violation: overall match begin > end");
        for slot in 1..groups.len() {
            if let Some((b, e)) = groups.get(slot) {
                debug_assert!(b <= e, "invariant violation: capture slot {slot} has begin > end");
                debug_assert!(
                    whole_begin <= b && e <= whole_end,
                    "invariant violation: capture slot {slot} ({b}..{e}) escapes overall match ({whole_begin}..{whole_end})"
                );
            }
        }
    }
    #[cfg(not(debug_assertions))]
    {
        let _ = groups;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_codepoint_passes() {
        assert_valid_codepoint(0);
        assert_valid_codepoint(MAX_CODEPOINT);
        assert_valid_codepoint(crate::codec::MALFORMED);
    }

    #[test]
    #[should_panic(expected = "invariant violation")]
    #[cfg(debug_assertions)]
    fn codepoint_past_max_panics() {
        assert_valid_codepoint(MAX_CODEPOINT + 1);
    }

    #[test]
    fn captures_nested_in_whole_match_pass() {
        let mut groups = CaptureStore::new(1);
        groups.set(0, (0, 10));
        groups.set(1, (2, 5));
        assert_captures_consistent(&groups);
    }

    #[test]
    #[should_panic(expected = "escapes overall match")]
    #[cfg(debug_assertions)]
    fn captures_outside_whole_match_panics() {
        let mut groups = CaptureStore::new(1);
        groups.set(0, (0, 5));
        groups.set(1, (2, 10));
        assert_captures_consistent(&groups);
    }
}
