//! The matcher graph produced by `factory` and interpreted by `engine`.
//!
//! The reference engine builds this out of owning pointers (`Core -> Branch -> Atom`)
//! plus a raw, non-owning back-pointer from a `Subroutine` atom to whichever `Core`
//! implements the group it calls — a back-edge that can point anywhere in the tree,
//! including at an ancestor. That shape is awkward to express with owned Rust types
//! (`Box`/`Rc`) because the back-edge is neither a child nor a parent relationship.
//! This rewrite allocates every `Core` in a flat arena (`Vec<Core>`) and has every
//! reference to a core — owning or not — go through a `CoreId` index instead of a
//! pointer. A `Subroutine` atom's `CoreId` is filled in by the factory once the whole
//! graph exists, after which indices never change, so the back-edge is just data: no
//! recursive free, no aliasing, no risk of a dangling pointer. See `DESIGN.md`.

use crate::charclass::CharClass;

/// Index into a [`Graph`]'s core arena. Stable for the arena's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CoreId(pub(crate) usize);

/// What an [`Atom`] actually matches.
#[derive(Debug, Clone)]
pub enum AtomKind {
    Class(CharClass),
    Str(Vec<u8>),
    Group(CoreId),
    Atomic(CoreId),
    LookAhead(CoreId),
    Backreference(i64),
    /// Resolved in a second pass once the whole graph is built; see `factory::resolve_subroutines`.
    Subroutine(CoreId),
    WordAnchor,
    /// `invert = true` means start-of-string; `invert = false` means end-of-string.
    EdgeAnchor,
}

/// One matchable unit on a [`Branch`], with its own repetition range and polarity.
#[derive(Debug, Clone)]
pub struct Atom {
    pub kind: AtomKind,
    /// Flips the primitive's success test (negated class, negated lookahead, start-
    /// vs-end for `EdgeAnchor`, negated word anchor handled one level up in `token`).
    pub invert: bool,
    pub greedy: bool,
    pub min: u32,
    pub max: u32,
}

impl Atom {
    /// A non-repeating atom: `min = max = 1`, matched exactly once.
    pub fn once(kind: AtomKind, invert: bool) -> Self {
        Atom { kind, invert, greedy: true, min: 1, max: 1 }
    }

    /// Whether this atom's primitive repeats under `(min,max)`/`greedy`, or is
    /// matched exactly once regardless of its stored range (`atom_match`'s
    /// non-repeating set: `Str`/`LookAhead`/`WordAnchor`/`EdgeAnchor`).
    pub fn is_repeating(&self) -> bool {
        !matches!(self.kind, AtomKind::Str(_) | AtomKind::LookAhead(_) | AtomKind::WordAnchor | AtomKind::EdgeAnchor)
    }
}

/// An ordered list of [`Atom`]s; one alternative of a [`Core`].
#[derive(Debug, Clone, Default)]
pub struct Branch {
    pub atoms: Vec<Atom>,
}

/// A named position in the graph: the root, a capturing group, or a non-capturing
/// construct (atomic group, lookahead, negative lookahead — all of which own a
/// nested `Core` even though they aren't capturing).
#[derive(Debug, Clone)]
pub struct Core {
    /// `0` for the root, `>=1` for a capturing group, `<0` for everything else.
    pub group: i64,
    pub branches: Vec<Branch>,
}

impl Core {
    pub fn is_capturing(&self) -> bool {
        self.group >= 1
    }
}

/// The arena of [`Core`]s a compiled pattern matches against.
#[derive(Debug, Clone)]
pub struct Graph {
    cores: Vec<Core>,
    root: CoreId,
}

impl Graph {
    pub(crate) fn new() -> Self {
        Graph { cores: Vec::new(), root: CoreId(0) }
    }

    /// Allocate a new, empty `Core` and return its stable id.
    pub(crate) fn alloc_core(&mut self, group: i64) -> CoreId {
        let id = CoreId(self.cores.len());
        self.cores.push(Core { group, branches: Vec::new() });
        id
    }

    pub(crate) fn set_root(&mut self, id: CoreId) {
        self.root = id;
    }

    pub fn root(&self) -> CoreId {
        self.root
    }

    pub fn core(&self, id: CoreId) -> &Core {
        &self.cores[id.0]
    }

    pub(crate) fn core_mut(&mut self, id: CoreId) -> &mut Core {
        &mut self.cores[id.0]
    }
}
