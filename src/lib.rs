//! # vinerex
//!
//! A pure-Rust backtracking regular-expression engine: compile a pattern source
//! string into a [`Pattern`], then match it against UTF-8 input to get match and
//! capture-group information.
//!
//! Unlike a finite-automaton engine, `vinerex` backtracks explicitly, which is
//! what buys it backreferences, lookaheads, atomic groups, and subroutine calls
//! (`(?R)`, `(?&name)`) — at the usual backtracking-engine cost of potential
//! exponential blowup on adversarial patterns, which atomic groups and
//! possessive quantifiers exist to let callers opt out of.
//!
//! ## Example
//!
//! ```
//! use vinerex::Pattern;
//!
//! let pattern = Pattern::compile(r"(?<year>\d{4})-(?<month>\d{2})-(?<day>\d{2})").unwrap();
//! let caps = pattern.captures("born 1997-08-29 today").unwrap();
//! assert_eq!(caps.get().unwrap(), "1997-08-29");
//! assert_eq!(caps.name("year").unwrap(), "1997");
//! ```
//!
//! ## Supported syntax
//!
//! Literals, character classes (`[...]`, `\d\w\s` and their negations, nested
//! `[a-z&&[^aeiou]]` intersection/difference), anchors (`^$\b\B`), greedy/lazy/
//! possessive repetition (`* + ? {m,n}`), capturing/named/non-capturing/atomic
//! groups, lookaheads (`(?=...)`/`(?!...)`), backreferences (`\1`, `\g<name>`),
//! and subroutine calls (`(?R)`, `(?&name)`). No lookbehind, no POSIX
//! longest-leftmost semantics — matching is leftmost-first, like Perl/PCRE.

pub mod backtrack;
pub mod cache;
pub mod captures;
pub mod charclass;
pub mod codec;
pub mod engine;
pub mod error;
pub mod factory;
pub mod graph;
pub mod invariants;
pub mod parser;
pub mod token;

use std::collections::HashMap;

use rayon::prelude::*;

pub use cache::word_characters;
pub use captures::CaptureStore;
pub use error::CompileError;
pub use graph::Graph;

/// A compiled pattern, ready to match against input strings.
///
/// Immutable and read-only once [`Pattern::compile`] returns: every match call
/// allocates its own [`backtrack::BacktrackStack`] and [`CaptureStore`], so a
/// `Pattern` can be matched from multiple threads concurrently (see
/// [`Pattern::captures_batch`]).
#[derive(Debug, Clone)]
pub struct Pattern {
    graph: Graph,
    names: HashMap<String, i64>,
    total_groups: usize,
    source: String,
}

impl Pattern {
    /// Compile `source` into a [`Pattern`].
    ///
    /// Runs the parser (including its `weedeat` and `badref_check` post-passes)
    /// and then the factory, in that order.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError`] on any syntax error in `source`.
    ///
    /// # Example
    ///
    /// ```
    /// use vinerex::Pattern;
    /// let pattern = Pattern::compile(r"a(b|c)*d").unwrap();
    /// assert!(pattern.is_match("abcbcd"));
    /// ```
    #[must_use = "compile returns a Result that must be handled"]
    pub fn compile(source: &str) -> Result<Pattern, CompileError> {
        let (tokens, names, total_groups) = parser::parse(source)?;
        let graph = factory::build(&tokens);
        Ok(Pattern { graph, names, total_groups, source: source.to_string() })
    }

    /// The source string this pattern was compiled from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Number of capturing groups (not counting the overall match, slot 0).
    pub fn num_groups(&self) -> usize {
        self.total_groups
    }

    /// Leftmost-first search: try matching starting at successive byte offsets,
    /// from the start of `input`, until either a match is found or the end of
    /// the input is reached.
    ///
    /// # Example
    ///
    /// ```
    /// use vinerex::Pattern;
    /// let pattern = Pattern::compile(r"\d+").unwrap();
    /// let m = pattern.search("age: 42").unwrap();
    /// assert_eq!(m.as_str(), "42");
    /// assert_eq!(m.start(), 5);
    /// ```
    pub fn search<'p, 'h>(&'p self, input: &'h str) -> Option<Match<'p, 'h>> {
        self.captures(input).map(Captures::into_match)
    }

    /// True if `search` would find a match anywhere in `input`.
    pub fn is_match(&self, input: &str) -> bool {
        self.search_groups(input, 0).is_some()
    }

    /// Requires the match to span the entire input, start to end. Still
    /// leftmost-first about *where* that whole-input match's internal choices
    /// land; only the end position is constrained to the input's length.
    pub fn entire_match<'p, 'h>(&'p self, input: &'h str) -> Option<Match<'p, 'h>> {
        let caps = self.captures(input)?;
        if caps.end() == input.len() { Some(caps.into_match()) } else { None }
    }

    /// Same search as [`Pattern::search`], but returns the full capture-store view.
    pub fn captures<'p, 'h>(&'p self, input: &'h str) -> Option<Captures<'p, 'h>> {
        let (groups, start) = self.search_groups(input, 0)?;
        Some(Captures { pattern: self, input, groups, start })
    }

    /// Try every start offset from `from` onward (at UTF-8 codepoint boundaries)
    /// until a match is found or the input is exhausted. Shared by `captures`
    /// and the [`Scanner`] (which advances `from` between matches).
    fn search_groups(&self, input: &str, from: usize) -> Option<(CaptureStore, usize)> {
        let ctx = engine::MatchContext::new(&self.graph, input);
        let mut pos = from;
        loop {
            if let Some(groups) = engine::run_from(&ctx, self.graph.root(), pos, self.total_groups) {
                invariants::assert_captures_consistent(&groups);
                return Some((groups, pos));
            }
            if pos >= input.len() {
                return None;
            }
            pos += codec::codepoint_len_at(input, pos).max(1);
        }
    }

    /// An iterator over every non-overlapping match in `input`, in order. A
    /// zero-length match advances one codepoint before the next search attempt
    /// so scanning always terminates.
    pub fn find_iter<'p, 'h>(&'p self, input: &'h str) -> Scanner<'p, 'h> {
        Scanner { pattern: self, input, pos: 0 }
    }

    /// Replace the first (leftmost) match of this pattern in `input` with
    /// `template`, expanded per the `\g<n>`/`\k<name>` syntax described on
    /// [`expand_template`]. Returns `input` unchanged (as an owned `String`) if
    /// there is no match.
    pub fn replace(&self, input: &str, template: &str) -> String {
        match self.captures(input) {
            None => input.to_string(),
            Some(caps) => {
                let mut out = String::with_capacity(input.len());
                out.push_str(&input[..caps.start()]);
                expand_template(&caps, template, &mut out);
                out.push_str(&input[caps.end()..]);
                out
            }
        }
    }

    /// Replace every non-overlapping leftmost match of this pattern in `input`
    /// with `template`, expanded per [`expand_template`] for each match.
    pub fn replace_all(&self, input: &str, template: &str) -> String {
        let mut out = String::with_capacity(input.len());
        let mut last_end = 0;
        for m in self.find_iter(input) {
            out.push_str(&input[last_end..m.start()]);
            expand_template(&m, template, &mut out);
            last_end = m.end();
        }
        out.push_str(&input[last_end..]);
        out
    }

    /// Run [`Pattern::captures`] over every input in `inputs` in parallel via
    /// `rayon`, exploiting that a compiled `Pattern` is read-only at match time.
    /// Grounded in the teacher's `Tokenizer::encode_batch`.
    pub fn captures_batch<'p, 'h>(&'p self, inputs: &[&'h str]) -> Vec<Option<Captures<'p, 'h>>> {
        inputs.par_iter().map(|input| self.captures(input)).collect()
    }
}

/// Shared accessor behavior between [`Match`] and [`Captures`]: anything that
/// carries an overall match span into a borrowed input string.
trait Span<'h> {
    fn input(&self) -> &'h str;
    fn range(&self) -> (usize, usize);

    fn as_str(&self) -> &'h str {
        let (b, e) = self.range();
        &self.input()[b..e]
    }
}

/// The outcome of a single successful match: just the overall span, with no
/// capture-group access. Produced by [`Pattern::search`]/[`Pattern::entire_match`]
/// and yielded by [`Scanner`].
#[derive(Debug, Clone, Copy)]
pub struct Match<'p, 'h> {
    #[allow(dead_code)]
    pattern: &'p Pattern,
    input: &'h str,
    start: usize,
    end: usize,
}

impl<'h> Span<'h> for Match<'_, 'h> {
    fn input(&self) -> &'h str {
        self.input
    }
    fn range(&self) -> (usize, usize) {
        (self.start, self.end)
    }
}

impl<'h> Match<'_, 'h> {
    /// The matched substring.
    pub fn as_str(&self) -> &'h str {
        Span::as_str(self)
    }

    /// Byte offset of the match's start in the original input.
    pub fn start(&self) -> usize {
        self.start
    }

    /// Byte offset of the match's end (one past the last matched byte).
    pub fn end(&self) -> usize {
        self.end
    }

    /// Alias for [`Match::start`], matching the spec's `offset()` naming.
    pub fn offset(&self) -> usize {
        self.start
    }
}

/// The outcome of a successful match, with access to every capture group.
#[derive(Debug, Clone)]
pub struct Captures<'p, 'h> {
    pattern: &'p Pattern,
    input: &'h str,
    groups: CaptureStore,
    start: usize,
}

impl<'h> Span<'h> for Captures<'_, 'h> {
    fn input(&self) -> &'h str {
        self.input
    }
    fn range(&self) -> (usize, usize) {
        self.groups.get(0).expect("Captures always has slot 0 set")
    }
}

impl<'p, 'h> Captures<'p, 'h> {
    fn into_match(self) -> Match<'p, 'h> {
        let (start, end) = self.range();
        Match { pattern: self.pattern, input: self.input, start, end }
    }

    /// The overall matched substring.
    pub fn get(&self) -> Option<&'h str> {
        Some(Span::as_str(self))
    }

    /// The overall matched substring.
    pub fn as_str(&self) -> &'h str {
        Span::as_str(self)
    }

    /// Byte offset of the overall match's start.
    pub fn start(&self) -> usize {
        self.range().0
    }

    /// Byte offset of the overall match's end.
    pub fn end(&self) -> usize {
        self.range().1
    }

    /// Alias for [`Captures::start`], matching the spec's `offset()` naming.
    pub fn offset(&self) -> usize {
        self.start
    }

    /// Number of capturing groups (not counting the overall match).
    pub fn num_groups(&self) -> usize {
        self.pattern.total_groups
    }

    /// The substring captured by group `i` (`1`-based; `0` is the overall
    /// match). `None` if the group didn't participate in the match (e.g. it's
    /// in an untaken alternative) or `i` is out of range.
    pub fn group(&self, i: usize) -> Option<&'h str> {
        let (b, e) = self.groups.get(i)?;
        Some(&self.input[b..e])
    }

    /// The substring captured by the named group `name`.
    pub fn name(&self, name: &str) -> Option<&'h str> {
        let group = *self.pattern.names.get(name)?;
        self.group(group as usize)
    }

    /// Byte range captured by group `i`, if it participated in the match.
    pub fn group_range(&self, i: usize) -> Option<(usize, usize)> {
        self.groups.get(i)
    }
}

/// An iterator over every non-overlapping [`Match`] in an input string.
///
/// If a match is zero-length, the scanner advances one codepoint before
/// resuming so scanning always terminates; a zero-length match at the very end
/// of `input` is the last item this iterator yields.
pub struct Scanner<'p, 'h> {
    pattern: &'p Pattern,
    input: &'h str,
    pos: usize,
}

impl<'p, 'h> Iterator for Scanner<'p, 'h> {
    type Item = Match<'p, 'h>;

    fn next(&mut self) -> Option<Match<'p, 'h>> {
        if self.pos > self.input.len() {
            return None;
        }
        let (groups, start) = self.pattern.search_groups(self.input, self.pos)?;
        let (_, end) = groups.get(0).expect("a successful search always sets slot 0");
        self.pos = if end > start {
            end
        } else if end >= self.input.len() {
            // A zero-length match right at the end of the input: there is
            // nothing left to scan, so bump `pos` past the guard above rather
            // than ask `codepoint_len_at` to look at a byte that isn't there.
            end + 1
        } else {
            end + codec::codepoint_len_at(self.input, end).max(1)
        };
        Some(Match { pattern: self.pattern, input: self.input, start, end })
    }
}

/// Expand `template` into `out`, substituting capture references of the form
/// `\g<n>`, `\g<name>`, `\k<n>`, or `\k<name>` (`\g<0>`/`\k<0>` refer to the
/// whole match). An unresolvable reference (out-of-range number, unknown name,
/// or a group that didn't participate in the match) expands to nothing.
/// Anything else in `template`, including a lone backslash, is copied through
/// verbatim.
fn expand_template<'h>(caps: &impl CaptureRef<'h>, template: &str, out: &mut String) {
    let bytes = template.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match (bytes.get(i), bytes.get(i + 1)) {
            (Some(b'\\'), Some(b'g' | b'k')) => {
                if let Some((body, consumed)) = parse_template_ref(&template[i + 2..]) {
                    if let Some(text) = caps.resolve(body) {
                        out.push_str(text);
                    }
                    i += 2 + consumed;
                    continue;
                }
                out.push('\\');
                i += 1;
            }
            _ => {
                let ch = template[i..].chars().next().unwrap();
                out.push(ch);
                i += ch.len_utf8();
            }
        }
    }
}

/// Parse the `<...>` or `'...'` body right after `\g`/`\k`, returning the body
/// text and how many bytes (including the delimiters) were consumed.
fn parse_template_ref(rest: &str) -> Option<(&str, usize)> {
    let mut chars = rest.char_indices();
    let (_, open) = chars.next()?;
    let close = match open {
        '<' => '>',
        '\'' => '\'',
        _ => return None,
    };
    for (i, c) in chars {
        if c == close {
            return Some((&rest[1..i], i + 1));
        }
    }
    None
}

/// Abstraction so `expand_template` works for both a just-finished [`Captures`]
/// and a [`Match`] yielded mid-scan by [`Scanner`] (which only has the overall
/// span, so `\g<0>` is the only reference it can resolve).
trait CaptureRef<'h> {
    fn resolve(&self, reference: &str) -> Option<&'h str>;
}

impl<'h> CaptureRef<'h> for Captures<'_, 'h> {
    fn resolve(&self, reference: &str) -> Option<&'h str> {
        if reference.chars().all(|c| c.is_ascii_digit()) {
            let n: usize = reference.parse().ok()?;
            self.group(n)
        } else {
            self.name(reference)
        }
    }
}

impl<'h> CaptureRef<'h> for Match<'_, 'h> {
    fn resolve(&self, reference: &str) -> Option<&'h str> {
        if reference == "0" { Some(self.as_str()) } else { None }
    }
}
