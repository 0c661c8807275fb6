//! Property-based tests for the invariants the crate depends on: character-class
//! set algebra, UTF-8 codec roundtrips, capture-span nesting, and leftmost-first
//! scan ordering. Style grounded in the teacher's `proptest`-based test suite.
//! (Parser-internal properties, like `weedeat` idempotence, live as unit tests
//! in `src/parser.rs` since the pass itself is crate-private.)

use proptest::prelude::*;
use vinerex::charclass::{self, CharClass};
use vinerex::codec;
use vinerex::Pattern;

/// A small, dense range so set operations actually produce interesting overlap
/// instead of almost-always-empty intersections.
fn small_range() -> impl Strategy<Value = (u32, u32)> {
    (0u32..64).prop_flat_map(|lo| (lo..64u32.max(lo + 1)).prop_map(move |hi| (lo, hi)))
}

fn small_class() -> impl Strategy<Value = CharClass> {
    prop::collection::vec(small_range(), 0..6).prop_map(CharClass::from_ranges)
}

fn assert_disjoint_and_increasing(class: &CharClass) {
    let ranges = class.ranges();
    for pair in ranges.windows(2) {
        let (prev_lo, prev_hi) = pair[0];
        let (lo, hi) = pair[1];
        prop_assert_is_true(prev_lo <= prev_hi, "range endpoints out of order");
        prop_assert_is_true(lo <= hi, "range endpoints out of order");
        prop_assert_is_true(lo > prev_hi + 1, "adjacent or overlapping ranges were not merged");
    }
}

fn prop_assert_is_true(cond: bool, msg: &str) {
    assert!(cond, "{msg}");
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn class_stays_disjoint_and_increasing_after_union(a in small_class(), b in small_class()) {
        let mut merged = a.copy();
        merged.union(&b);
        assert_disjoint_and_increasing(&merged);
    }

    #[test]
    fn class_stays_disjoint_and_increasing_after_difference(a in small_class(), b in small_class()) {
        let mut diff = a.copy();
        diff.difference(&b);
        assert_disjoint_and_increasing(&diff);
    }

    #[test]
    fn class_stays_disjoint_and_increasing_after_intersection(a in small_class(), b in small_class()) {
        let mut inter = a.copy();
        inter.intersection(&b);
        assert_disjoint_and_increasing(&inter);
    }

    #[test]
    fn union_with_self_is_identity(a in small_class()) {
        let mut doubled = a.copy();
        doubled.union(&a);
        prop_assert_eq!(doubled, a);
    }

    #[test]
    fn intersection_with_self_is_identity(a in small_class()) {
        let mut inter = a.copy();
        inter.intersection(&a);
        prop_assert_eq!(inter, a);
    }

    #[test]
    fn difference_with_self_is_empty(a in small_class()) {
        let mut diff = a.copy();
        diff.difference(&a);
        prop_assert!(diff.is_empty());
    }

    #[test]
    fn cardinality_is_additive_over_union_and_intersection(a in small_class(), b in small_class()) {
        let mut union = a.copy();
        union.union(&b);
        let mut inter = a.copy();
        inter.intersection(&b);
        prop_assert_eq!(union.cardinality() + inter.cardinality(), a.cardinality() + b.cardinality());
    }

    #[test]
    fn utf8_roundtrips_through_encode_and_decode(cp in 0u32..=codec::MAX_CODEPOINT) {
        prop_assume!(!(0xD800..=0xDFFF).contains(&cp));
        let mut bytes = Vec::new();
        let written = codec::encode(cp, &mut bytes);
        prop_assert_eq!(written, codec::bytelen(cp));
        let (decoded, consumed) = codec::decode(&bytes);
        prop_assert_eq!(decoded, cp);
        prop_assert_eq!(consumed, written);
    }

    #[test]
    fn captures_always_nest_inside_the_overall_match(text in "[a-z]{1,3}-[a-z]{1,3}") {
        let pattern = Pattern::compile(r"(\w+)-(\w+)").unwrap();
        if let Some(caps) = pattern.captures(&text) {
            let (whole_begin, whole_end) = (caps.start(), caps.end());
            for i in 1..=caps.num_groups() {
                if let Some((b, e)) = caps.group_range(i) {
                    prop_assert!(whole_begin <= b && b <= e && e <= whole_end);
                }
            }
        }
    }

    #[test]
    fn is_match_agrees_with_search(text in "[a-z0-9 ]{0,24}") {
        let pattern = Pattern::compile(r"\d+").unwrap();
        prop_assert_eq!(pattern.is_match(&text), pattern.search(&text).is_some());
    }

    #[test]
    fn find_iter_matches_are_non_overlapping_and_in_order(text in "[a-z0-9 ]{0,32}") {
        let pattern = Pattern::compile(r"\w+").unwrap();
        let mut last_end = 0;
        for m in pattern.find_iter(&text) {
            prop_assert!(m.start() >= last_end);
            prop_assert!(m.end() >= m.start());
            last_end = m.end();
        }
    }
}

#[test]
fn word_class_contains_ascii_identifier_characters() {
    let word = charclass::word_class();
    assert!(word.contains(b'_' as u32));
    assert!(word.contains(b'a' as u32));
    assert!(word.contains(b'9' as u32));
    assert!(!word.contains(b' ' as u32));
}

#[test]
fn digit_class_matches_only_ascii_digits() {
    let digits = charclass::digit_class();
    for c in '0'..='9' {
        assert!(digits.contains(c as u32));
    }
    assert!(!digits.contains(b'a' as u32));
}
