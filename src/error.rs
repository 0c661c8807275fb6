//! Compile-time error type shared by the parser, the backref resolver, and the factory.

/// A failure while compiling a pattern source string into a [`crate::Pattern`].
///
/// Every variant carries the byte offset in the source string where the problem
/// was detected, so callers can point a user at the exact spot.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompileError {
    #[error("bogus escape sequence at byte {0}")]
    BogusEscape(usize),

    #[error("invalid hex escape at byte {0}")]
    HexEscape(usize),

    #[error("empty character class at byte {0}")]
    EmptyClass(usize),

    #[error("invalid range in character class at byte {0}: start is greater than end")]
    BadRange(usize),

    #[error("invalid repetition quantifier at byte {0}")]
    BadQuantifier(usize),

    #[error("invalid integer literal at byte {0}")]
    BadInt(usize),

    #[error("unbalanced '[' starting at byte {0}")]
    UnbalancedBracket(usize),

    #[error("unbalanced '(' starting at byte {0}")]
    UnbalancedParen(usize),

    #[error("dangling '(?' at byte {0}")]
    DanglingQuestionMark(usize),

    #[error("duplicate group name at byte {0}")]
    NameExists(usize),

    #[error("group name starting with a digit at byte {0}")]
    GroupNameStartsWithDigit(usize),

    #[error("quantifier with nothing to repeat at byte {0}")]
    NothingToRepeat(usize),

    #[error("backreference or subroutine call to an unknown group at byte {0}")]
    BadBackreference(usize),

    #[error("pattern nests too deeply (limit is {limit}) at byte {0}", limit = crate::parser::MAX_NESTING_DEPTH)]
    NestingTooDeep(usize),
}

impl CompileError {
    /// Byte offset in the source pattern where the error was detected.
    pub fn offset(&self) -> usize {
        match *self {
            CompileError::BogusEscape(o)
            | CompileError::HexEscape(o)
            | CompileError::EmptyClass(o)
            | CompileError::BadRange(o)
            | CompileError::BadQuantifier(o)
            | CompileError::BadInt(o)
            | CompileError::UnbalancedBracket(o)
            | CompileError::UnbalancedParen(o)
            | CompileError::DanglingQuestionMark(o)
            | CompileError::NameExists(o)
            | CompileError::GroupNameStartsWithDigit(o)
            | CompileError::NothingToRepeat(o)
            | CompileError::BadBackreference(o)
            | CompileError::NestingTooDeep(o) => o,
        }
    }
}
