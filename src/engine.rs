//! Interprets a [`Graph`] against an input string using an explicit [`BacktrackStack`].
//!
//! Ordinary repetition never recurses the host call stack; `Group`/`Subroutine`
//! atoms do recurse into `core_match`, statically bounded by the pattern's own
//! nesting depth for `Group` (see `parser::MAX_NESTING_DEPTH`). `Subroutine`
//! back-edges are not acyclic, so a self-referential call is additionally bounded
//! at runtime by `MatchContext::subroutine_limit`, scaled to the input length:
//! without it, a pattern like `(?R)?a` recurses into itself at the same input
//! position with no base case and overflows the native stack rather than
//! backtracking to its zero-match alternative.
//!
//! Full alternation backtracking — resuming a group's untried branches after
//! everything that follows it fails — is preserved for the common case of a
//! non-quantified group (`(a|b)`, `(?>...)`, `(?=...)`, a bare `(?R)`/subroutine
//! call: all default to a `[1,1]` repetition range). A *quantified* group
//! (`(a|b){2,3}`) commits to the first alternative that matches on each individual
//! repetition rather than carrying resumability across repetitions; this keeps the
//! repetition loops simple and is documented as a deliberate scope reduction in
//! `DESIGN.md`. Subroutine calls are always treated this way (as if atomic),
//! matching the isolation a subroutine call already needs for its captures.

use std::cell::Cell;

use crate::backtrack::{BacktrackStack, Frame, FrameKind};
use crate::captures::CaptureStore;
use crate::codec;
use crate::graph::{Atom, AtomKind, CoreId, Graph};

pub struct MatchContext<'g, 'h> {
    pub graph: &'g Graph,
    pub input: &'h str,
    /// Live subroutine call depth, shared across the whole match attempt.
    /// Incremented/decremented around each `Subroutine` atom's recursive call
    /// into `core_match`; see `subroutine_limit`.
    pub subroutine_depth: Cell<usize>,
    /// Bound on live subroutine recursion for this match attempt. A `Subroutine`
    /// atom is the only back-edge in the graph (see `graph` module docs), so
    /// it's the only place `core_match` can call into itself without the
    /// pattern's own static nesting depth already having stopped it.
    ///
    /// A self-referential call that hasn't consumed any input since the last
    /// time it was entered (e.g. `(?R)` as the first atom of its own branch)
    /// never reaches a natural base case on its own — each nested attempt
    /// recurses at the identical position. Scaling the bound with the input
    /// length (rather than a fixed constant) means a self-reference that
    /// *does* make progress one character at a time, like `(?R)?a`, recurses
    /// exactly as deep as the remaining input supports before falling back to
    /// its zero-match alternative, instead of the outcome depending on how a
    /// fixed constant happens to divide against the input length.
    subroutine_limit: usize,
}

impl<'g, 'h> MatchContext<'g, 'h> {
    pub fn new(graph: &'g Graph, input: &'h str) -> Self {
        let subroutine_limit = input.len().saturating_sub(1);
        MatchContext { graph, input, subroutine_depth: Cell::new(0), subroutine_limit }
    }
}

/// Run the pattern rooted at `root` against `input` starting at byte offset
/// `start_pos`. `^`/`$` always anchor to the true ends of `input`, regardless of
/// where the search attempt starts — matches `Pattern::search`'s "try successive
/// start offsets" loop without `^` spuriously matching at every one of them.
pub fn run_from(ctx: &MatchContext, root: CoreId, start_pos: usize, total_groups: usize) -> Option<CaptureStore> {
    let mut groups = CaptureStore::new(total_groups);
    let (end, _leftover, _resume_branch) = core_match(ctx, root, start_pos, &mut groups, None, 0)?;
    groups.set(0, (start_pos, end));
    Some(groups)
}

/// Attempt every branch of `core_id` starting from `branch_num`, seeding a fresh
/// search or resuming `inner_stack` for the first one tried. On success, returns
/// the match end, plus (if the winning branch's own stack still holds untried
/// alternatives) a leftover stack and the branch index to resume at — the caller
/// decides whether that's worth keeping as a `Frame::Recursive` backtrack point.
fn core_match(
    ctx: &MatchContext,
    core_id: CoreId,
    pos: usize,
    groups: &mut CaptureStore,
    inner_stack: Option<BacktrackStack>,
    branch_num: usize,
) -> Option<(usize, Option<BacktrackStack>, usize)> {
    let core = ctx.graph.core(core_id);
    if core.group >= 0 {
        groups.clear(core.group as usize);
    }
    let num_branches = core.branches.len();
    let mut branch = branch_num;
    let mut stack = inner_stack.unwrap_or_else(|| BacktrackStack::seeded(pos));
    loop {
        if branch >= num_branches {
            return None;
        }
        match branch_match(ctx, core_id, branch, &mut stack, groups) {
            Some(end) => {
                if core.group >= 0 {
                    groups.set(core.group as usize, (pos, end));
                }
                let (leftover, resume_branch) =
                    if stack.is_empty() { (None, branch + 1) } else { (Some(stack), branch) };
                return Some((end, leftover, resume_branch));
            }
            None => {
                branch += 1;
                if branch < num_branches {
                    stack = BacktrackStack::seeded(pos);
                }
            }
        }
    }
}

/// Drive `stack` to completion for one branch: success returns the match end,
/// failure (stack exhausted with nothing left to try) returns `None`.
fn branch_match(ctx: &MatchContext, core_id: CoreId, branch_num: usize, stack: &mut BacktrackStack, groups: &mut CaptureStore) -> Option<usize> {
    let atoms_len = ctx.graph.core(core_id).branches[branch_num].atoms.len();
    loop {
        let frame = stack.pop()?;
        match frame.kind {
            FrameKind::Advance if frame.atom_index >= atoms_len => return Some(frame.input_pos),
            FrameKind::Advance => {
                dispatch_atom(ctx, core_id, branch_num, frame.atom_index, frame.input_pos, stack, groups);
            }
            FrameKind::Retry { match_count } => {
                resume_retry(ctx, core_id, branch_num, frame.atom_index, match_count, frame.input_pos, stack, groups);
            }
            FrameKind::Recursive { inner, nested, resume_branch } => {
                resume_recursive(ctx, nested, frame.atom_index, frame.input_pos, inner, resume_branch, stack, groups);
            }
        }
    }
}

fn dispatch_atom(
    ctx: &MatchContext,
    core_id: CoreId,
    branch_num: usize,
    atom_index: usize,
    pos: usize,
    stack: &mut BacktrackStack,
    groups: &mut CaptureStore,
) {
    let atom = &ctx.graph.core(core_id).branches[branch_num].atoms[atom_index];
    if !atom.is_repeating() {
        if let Some(end) = match_primitive_once(ctx, atom, pos, groups) {
            stack.push(Frame::advance(atom_index + 1, end));
        }
    } else if atom.min == 1 && atom.max == 1 {
        match_single(ctx, atom, pos, atom_index, stack, groups);
    } else if atom.greedy {
        greedy_repeat(ctx, atom, atom_index, pos, stack, groups);
    } else {
        lazy_repeat(ctx, atom, atom_index, pos, stack, groups);
    }
}

/// The `(min,max) == (1,1)` fast path: exactly one repetition, but (for `Group`
/// only) with full resumability into the nested core's other alternatives.
fn match_single(ctx: &MatchContext, atom: &Atom, pos: usize, atom_index: usize, stack: &mut BacktrackStack, groups: &mut CaptureStore) {
    if let AtomKind::Group(nested) = atom.kind {
        if let Some((end, leftover, resume_branch)) = core_match(ctx, nested, pos, groups, None, 0) {
            stack.push(Frame::advance(atom_index + 1, end));
            push_group_backtrack_point(ctx, nested, atom_index, pos, leftover, resume_branch, stack);
        }
        return;
    }
    if let Some(end) = match_primitive_once(ctx, atom, pos, groups) {
        stack.push(Frame::advance(atom_index + 1, end));
    }
}

fn resume_recursive(
    ctx: &MatchContext,
    nested: CoreId,
    atom_index: usize,
    pos: usize,
    inner: Option<Box<BacktrackStack>>,
    resume_branch: usize,
    stack: &mut BacktrackStack,
    groups: &mut CaptureStore,
) {
    let inner_stack = inner.map(|b| *b);
    if let Some((end, leftover, new_resume_branch)) = core_match(ctx, nested, pos, groups, inner_stack, resume_branch) {
        stack.push(Frame::advance(atom_index + 1, end));
        push_group_backtrack_point(ctx, nested, atom_index, pos, leftover, new_resume_branch, stack);
    }
}

/// Record a `Frame::Recursive` backtrack point whenever `nested` still has an
/// untried branch at `resume_branch`, even if the winning attempt's own stack
/// emptied out (the common case: a branch that is just a literal or a class).
/// Keying this on `resume_branch < num_branches` instead of `leftover.is_some()`
/// is what lets alternation inside a non-quantified group resume correctly —
/// `leftover` only covers "this branch has more to try"; it says nothing about
/// whether a *sibling* branch is still waiting.
fn push_group_backtrack_point(
    ctx: &MatchContext,
    nested: CoreId,
    atom_index: usize,
    pos: usize,
    leftover: Option<BacktrackStack>,
    resume_branch: usize,
    stack: &mut BacktrackStack,
) {
    let num_branches = ctx.graph.core(nested).branches.len();
    if resume_branch < num_branches {
        stack.push(Frame::recursive(atom_index, pos, nested, leftover.map(Box::new), resume_branch));
    }
}

/// Run the greedy loop to completion in one call: try to extend as far as
/// possible, pushing a resumption frame (trying the successor atom) at every
/// valid repetition count along the way, longest first on top of the stack.
fn greedy_repeat(ctx: &MatchContext, atom: &Atom, atom_index: usize, pos: usize, stack: &mut BacktrackStack, groups: &mut CaptureStore) {
    let mut pos = pos;
    let mut match_count = 0u32;
    loop {
        if match_count >= atom.min && match_count <= atom.max {
            stack.push(Frame::advance(atom_index + 1, pos));
        }
        if match_count == atom.max || pos >= ctx.input.len() {
            break;
        }
        match match_primitive_once(ctx, atom, pos, groups) {
            Some(end) => {
                let stalled = end == pos;
                pos = end;
                match_count += 1;
                if stalled {
                    if match_count >= atom.min && match_count <= atom.max {
                        stack.push(Frame::advance(atom_index + 1, pos));
                    }
                    break;
                }
            }
            None => break,
        }
    }
}

/// The lazy loop's first step: try the successor at zero repetitions before
/// committing to matching the primitive at all.
fn lazy_repeat(ctx: &MatchContext, atom: &Atom, atom_index: usize, pos: usize, stack: &mut BacktrackStack, groups: &mut CaptureStore) {
    let _ = groups;
    lazy_step(atom, atom_index, 0, pos, false, stack);
}

/// One step of the lazy loop: push "try the successor now" (if in range), then
/// push "extend by one more repetition" below it, so the successor is tried first.
fn lazy_step(atom: &Atom, atom_index: usize, match_count: u32, pos: usize, stalled: bool, stack: &mut BacktrackStack) {
    if match_count >= atom.min && match_count <= atom.max {
        stack.push(Frame::advance(atom_index + 1, pos));
    }
    if match_count < atom.max && !stalled {
        stack.push(Frame::retry(atom_index, match_count, pos));
    }
}

/// Resume a lazy loop's "extend by one more repetition" frame.
fn resume_retry(
    ctx: &MatchContext,
    core_id: CoreId,
    branch_num: usize,
    atom_index: usize,
    match_count: u32,
    pos: usize,
    stack: &mut BacktrackStack,
    groups: &mut CaptureStore,
) {
    if pos > ctx.input.len() {
        return;
    }
    let atom = &ctx.graph.core(core_id).branches[branch_num].atoms[atom_index];
    if let Some(end) = match_primitive_once(ctx, atom, pos, groups) {
        let stalled = end == pos;
        lazy_step(atom, atom_index, match_count + 1, end, stalled, stack);
    }
}

/// One attempt at an atom's underlying primitive, with no resumability of its own
/// (the caller's repetition loop, or `match_single`'s `(1,1)` path, is what makes
/// the overall atom resumable).
fn match_primitive_once(ctx: &MatchContext, atom: &Atom, pos: usize, groups: &mut CaptureStore) -> Option<usize> {
    match &atom.kind {
        AtomKind::Class(class) => {
            if pos >= ctx.input.len() {
                return None;
            }
            let (cp, len) = codec::decode(&ctx.input.as_bytes()[pos..]);
            if class.contains(cp) != atom.invert {
                Some(pos + len)
            } else {
                None
            }
        }
        AtomKind::Str(bytes) => {
            let end = pos.checked_add(bytes.len())?;
            if end <= ctx.input.len() && &ctx.input.as_bytes()[pos..end] == bytes.as_slice() {
                Some(end)
            } else {
                None
            }
        }
        AtomKind::Backreference(group) => {
            let (b, e) = groups.get(*group as usize)?;
            let text = &ctx.input.as_bytes()[b..e];
            let end = pos.checked_add(text.len())?;
            if end <= ctx.input.len() && &ctx.input.as_bytes()[pos..end] == text {
                Some(end)
            } else {
                None
            }
        }
        AtomKind::Group(nested) | AtomKind::Atomic(nested) => {
            core_match(ctx, *nested, pos, groups, None, 0).map(|(end, _, _)| end)
        }
        AtomKind::Subroutine(nested) => {
            if ctx.subroutine_depth.get() >= ctx.subroutine_limit {
                return None;
            }
            ctx.subroutine_depth.set(ctx.subroutine_depth.get() + 1);
            let mut local = CaptureStore::from_snapshot(groups.snapshot());
            let result = core_match(ctx, *nested, pos, &mut local, None, 0).map(|(end, _, _)| end);
            ctx.subroutine_depth.set(ctx.subroutine_depth.get() - 1);
            result
        }
        AtomKind::LookAhead(nested) => {
            let mut probe = CaptureStore::from_snapshot(groups.snapshot());
            let matched = core_match(ctx, *nested, pos, &mut probe, None, 0).is_some();
            if matched != atom.invert {
                Some(pos)
            } else {
                None
            }
        }
        AtomKind::WordAnchor => {
            if word_anchor_matches(ctx, pos) != atom.invert {
                Some(pos)
            } else {
                None
            }
        }
        AtomKind::EdgeAnchor => {
            let at_target = if atom.invert { pos == 0 } else { pos == ctx.input.len() };
            if at_target {
                Some(pos)
            } else {
                None
            }
        }
    }
}

fn word_anchor_matches(ctx: &MatchContext, pos: usize) -> bool {
    let word = crate::word_characters();
    let before = if pos == 0 {
        false
    } else {
        let prev = codec::prev_codepoint_ix(ctx.input, pos);
        let (cp, _) = codec::decode(&ctx.input.as_bytes()[prev..]);
        word.contains(cp)
    };
    let after = if pos >= ctx.input.len() {
        false
    } else {
        let (cp, _) = codec::decode(&ctx.input.as_bytes()[pos..]);
        word.contains(cp)
    };
    before != after
}
