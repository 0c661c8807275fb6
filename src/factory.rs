//! Lowers a parsed [`TokenStream`] into the matcher [`Graph`] the engine runs.
//!
//! Walks the token sequence front-to-back; each token becomes an atom on the
//! current branch, or (for `Alternator`) starts a new one. `Range` and `Lazy`
//! mutate the most-recently-pushed atom rather than creating their own. `Group`/
//! `Atomic`/`LookAhead`/`NegLookAhead` recurse into their sub-sequence to build a
//! nested core. `Subroutine` is lowered to a placeholder atom and recorded in a
//! pending list; once the whole graph exists, a second pass resolves every pending
//! atom to the `CoreId` that owns its target group number.

use std::collections::HashMap;

use crate::charclass::CharClass;
use crate::graph::{Atom, AtomKind, Branch, CoreId, Graph};
use crate::token::{Token, TokenStream};

struct Pending {
    core: CoreId,
    branch: usize,
    atom: usize,
    target_group: i64,
}

struct FactoryState {
    pending: Vec<Pending>,
    group_index: HashMap<i64, CoreId>,
}

/// Build a [`Graph`] from the root token sequence produced by `parser::parse`.
pub fn build(tokens: &TokenStream) -> Graph {
    let mut graph = Graph::new();
    let mut state = FactoryState { pending: Vec::new(), group_index: HashMap::new() };
    let root = build_core(&mut graph, tokens.as_slice(), 0, &mut state);
    graph.set_root(root);
    resolve_subroutines(&mut graph, &state);
    graph
}

fn build_core(graph: &mut Graph, tokens: &[Token], group: i64, state: &mut FactoryState) -> CoreId {
    let id = graph.alloc_core(group);
    if group >= 0 {
        state.group_index.insert(group, id);
    }
    for branch_tokens in split_branches(tokens) {
        let branch_idx = graph.core(id).branches.len();
        let atoms = build_branch(graph, branch_tokens, id, branch_idx, state);
        graph.core_mut(id).branches.push(Branch { atoms });
    }
    id
}

fn build_branch(graph: &mut Graph, tokens: &[Token], owner: CoreId, branch_idx: usize, state: &mut FactoryState) -> Vec<Atom> {
    let mut atoms: Vec<Atom> = Vec::new();
    for tok in tokens {
        match tok {
            Token::Range(min, max) => {
                if let Some(last) = atoms.last_mut() {
                    last.min = *min;
                    last.max = *max;
                }
            }
            Token::Lazy => {
                if let Some(last) = atoms.last_mut() {
                    last.greedy = false;
                }
            }
            Token::Empty | Token::Alternator => {}
            Token::Possessive => {
                debug_assert!(false, "Possessive token survived weedeat's atomic-group rewrite");
            }
            Token::Literal(cp) => {
                // weedeat lowers every standalone literal to a single-codepoint class
                // (and coalesces runs into Str); seeing one here means that pass was
                // skipped somewhere upstream.
                atoms.push(Atom::once(AtomKind::Class(CharClass::single(*cp)), false));
            }
            Token::Str(bytes) => atoms.push(Atom::once(AtomKind::Str(bytes.clone()), false)),
            Token::Class(class, negated) => atoms.push(Atom::once(AtomKind::Class(class.clone()), *negated)),
            Token::Group(inner, group) => {
                let nested = build_core(graph, inner.as_slice(), *group, state);
                atoms.push(Atom::once(AtomKind::Group(nested), false));
            }
            Token::Atomic(inner, group) => {
                let nested = build_core(graph, inner.as_slice(), *group, state);
                atoms.push(Atom::once(AtomKind::Atomic(nested), false));
            }
            Token::LookAhead(inner, group) => {
                let nested = build_core(graph, inner.as_slice(), *group, state);
                atoms.push(Atom::once(AtomKind::LookAhead(nested), false));
            }
            Token::NegLookAhead(inner, group) => {
                let nested = build_core(graph, inner.as_slice(), *group, state);
                atoms.push(Atom::once(AtomKind::LookAhead(nested), true));
            }
            Token::Reference(group, _offset) => atoms.push(Atom::once(AtomKind::Backreference(*group), false)),
            Token::Subroutine(target_group, _offset) => {
                let atom_idx = atoms.len();
                // Placeholder; every field but `kind` is meaningful immediately, the
                // target core id is filled in once the whole graph exists.
                atoms.push(Atom::once(AtomKind::Subroutine(owner), false));
                state.pending.push(Pending { core: owner, branch: branch_idx, atom: atom_idx, target_group: *target_group });
            }
            Token::WordAnchor => atoms.push(Atom::once(AtomKind::WordAnchor, false)),
            Token::NegWordAnchor => atoms.push(Atom::once(AtomKind::WordAnchor, true)),
            Token::StartAnchor => atoms.push(Atom::once(AtomKind::EdgeAnchor, true)),
            Token::EndAnchor => atoms.push(Atom::once(AtomKind::EdgeAnchor, false)),
            Token::Name(..) => {
                debug_assert!(false, "unresolved Name token survived badref_check");
            }
        }
    }
    atoms
}

/// Split a flat token sequence on its top-level `Alternator`s. Alternators inside
/// a nested `Group`/`Atomic`/`LookAhead` never appear here — they live in that
/// token's own sub-sequence and are split when `build_core` recurses into it.
fn split_branches(tokens: &[Token]) -> Vec<&[Token]> {
    let mut out = Vec::new();
    let mut start = 0;
    for (i, tok) in tokens.iter().enumerate() {
        if matches!(tok, Token::Alternator) {
            out.push(&tokens[start..i]);
            start = i + 1;
        }
    }
    out.push(&tokens[start..]);
    out
}

fn resolve_subroutines(graph: &mut Graph, state: &FactoryState) {
    for p in &state.pending {
        let target = if p.target_group == 0 {
            graph.root()
        } else {
            *state
                .group_index
                .get(&p.target_group)
                .expect("badref_check already validated every subroutine target group exists")
        };
        graph.core_mut(p.core).branches[p.branch].atoms[p.atom].kind = AtomKind::Subroutine(target);
    }
}
