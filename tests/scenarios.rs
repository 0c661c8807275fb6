//! End-to-end matching scenarios exercising named captures, subroutine calls,
//! alternation-in-repetition capture semantics, backtracking into a later
//! alternation branch, atomic groups, word-boundary scanning, self-referential
//! recursion, and nested character-class intersection.

use vinerex::Pattern;

#[test]
fn named_group_self_reference_via_subroutine() {
    let pattern = Pattern::compile(r"(?<name>123)\g<name>").unwrap();
    let caps = pattern.captures("123123").unwrap();
    assert_eq!(caps.as_str(), "123123");
    assert_eq!(caps.name("name"), Some("123"));
}

#[test]
fn alternation_inside_a_repeated_group_keeps_the_last_taken_branch() {
    let pattern = Pattern::compile(r"a(b|c)*d").unwrap();
    let caps = pattern.captures("abcbcd").unwrap();
    assert_eq!(caps.as_str(), "abcbcd");
    assert_eq!(caps.group(1), Some("c"));
}

#[test]
fn alternation_backtracks_into_a_later_branch_after_the_first_fails_downstream() {
    // The first branch `a` matches, but then `c` fails against the `b` that
    // follows; the engine must retry the group with `ab` rather than give up
    // just because `a`'s own match left nothing else to backtrack into.
    let pattern = Pattern::compile(r"(a|ab)c").unwrap();
    let m = pattern.search("abc").unwrap();
    assert_eq!(m.as_str(), "abc");
    let caps = pattern.captures("abc").unwrap();
    assert_eq!(caps.group(1), Some("ab"));
}

#[test]
fn atomic_group_refuses_to_backtrack_into_its_own_repetition() {
    let atomic = Pattern::compile(r"(?>(a+)+)b").unwrap();
    assert!(atomic.search("aaaaX").is_none());
    assert!(atomic.search("aaaab").is_some());

    // The non-atomic form still matches; it's only the atomic rewrite that
    // commits to its first exhaustive parse of the run of `a`s.
    let plain = Pattern::compile(r"(a+)+b").unwrap();
    assert!(plain.search("aaaab").is_some());
}

#[test]
fn word_boundaries_split_a_sentence_into_its_words() {
    let pattern = Pattern::compile(r"\b\w+\b").unwrap();
    let words: Vec<_> = pattern.find_iter("hello world").collect();
    assert_eq!(words.len(), 2);
    assert_eq!(words[0].as_str(), "hello");
    assert_eq!(words[0].start(), 0);
    assert_eq!(words[1].as_str(), "world");
    assert_eq!(words[1].start(), 6);
}

#[test]
fn optional_self_reference_recurses_to_match_a_run() {
    let pattern = Pattern::compile(r"(?R)?a").unwrap();
    let m = pattern.entire_match("aaa").unwrap();
    assert_eq!(m.as_str(), "aaa");
    assert_eq!(m.start(), 0);
}

#[test]
fn nested_class_intersection_selects_consonants_only() {
    let pattern = Pattern::compile(r"[a-z&&[^aeiou]]+").unwrap();
    let m = pattern.search("rhythm").unwrap();
    assert_eq!(m.as_str(), "rhythm");

    // a vowel breaks the run
    let m2 = pattern.search("sky and bees").unwrap();
    assert_eq!(m2.as_str(), "sky");
}

#[test]
fn unnamed_subroutine_recursion_respects_nesting_depth() {
    // A pattern that recurses into itself only ever as deep as its own
    // grammar nests, not as deep as the input run it matches.
    let pattern = Pattern::compile(r"\((?:[^()]|(?R))*\)").unwrap();
    assert!(pattern.is_match("(a(b(c)d)e)"));
    assert!(pattern.entire_match("(a(b)c").is_none());
}

#[test]
fn backreference_requires_an_exact_repeat() {
    let pattern = Pattern::compile(r"(\w+) \1").unwrap();
    assert!(pattern.is_match("echo echo"));
    assert!(!pattern.is_match("echo igloo"));
}

#[test]
fn lookahead_constrains_without_consuming() {
    let pattern = Pattern::compile(r"\d+(?=px)").unwrap();
    let m = pattern.search("width: 640px").unwrap();
    assert_eq!(m.as_str(), "640");

    let neg = Pattern::compile(r"\d+(?!px)").unwrap();
    let m2 = neg.search("640 units").unwrap();
    assert_eq!(m2.as_str(), "640");
}

#[test]
fn lazy_quantifier_takes_the_shortest_match() {
    let pattern = Pattern::compile(r"<.+?>").unwrap();
    let m = pattern.search("<a><b>").unwrap();
    assert_eq!(m.as_str(), "<a>");
}

#[test]
fn possessive_quantifier_behaves_like_its_atomic_rewrite() {
    let possessive = Pattern::compile(r"a++b").unwrap();
    assert!(possessive.search("aaab").is_some());
    assert!(possessive.search("aaa").is_none());
}
