//! Process-wide pattern cache, keyed by source string, and the `word_characters`
//! singleton.
//!
//! Both are explicit, opt-in global state: nothing here runs unless a caller
//! reaches for it. A caller who wants no hidden global state can ignore this
//! module entirely and hold `Pattern`s in their own data structures.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock};

use crate::charclass::{self, CharClass};
use crate::error::CompileError;
use crate::Pattern;

fn cache() -> &'static Mutex<HashMap<String, Arc<Pattern>>> {
    static CACHE: OnceLock<Mutex<HashMap<String, Arc<Pattern>>>> = OnceLock::new();
    CACHE.get_or_init(|| Mutex::new(HashMap::new()))
}

/// Compile `source`, or return the already-compiled [`Pattern`] for it if this
/// process has compiled it before.
///
/// # Errors
///
/// Returns [`CompileError`] if `source` has never been compiled and fails to
/// compile now. A failed compile is not cached, so a later call with a fixed
/// source (or a retry after the caller patches something external) pays the
/// compile cost again rather than being stuck returning a stale error.
#[must_use = "get_or_compile returns a Result that must be handled"]
pub fn get_or_compile(source: &str) -> Result<Arc<Pattern>, CompileError> {
    if let Some(hit) = cache().lock().unwrap().get(source) {
        return Ok(Arc::clone(hit));
    }
    let compiled = Arc::new(Pattern::compile(source)?);
    cache().lock().unwrap().insert(source.to_string(), Arc::clone(&compiled));
    Ok(compiled)
}

/// Number of patterns currently cached.
pub fn len() -> usize {
    cache().lock().unwrap().len()
}

/// Teardown hook: drop every cached `Pattern`. There is no corresponding
/// `init()` — the cache is created lazily, the same way the teacher's
/// `OnceLock`-backed byte tables are.
pub fn clear() {
    cache().lock().unwrap().clear();
}

/// The word-character class used by `\w`/`\W`/`\b`/`\B`: `[A-Za-z0-9_]`.
///
/// Built once per process via `OnceLock`, directly grounded in the teacher's
/// `byte_encoder::bytes_to_unicode()` singleton.
pub fn word_characters() -> &'static CharClass {
    static WORD_CHARACTERS: OnceLock<CharClass> = OnceLock::new();
    WORD_CHARACTERS.get_or_init(charclass::word_class)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_compiles_return_the_same_cached_pattern() {
        clear();
        let a = get_or_compile("a+b").unwrap();
        let b = get_or_compile("a+b").unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        clear();
    }

    #[test]
    fn a_compile_error_is_not_cached() {
        clear();
        assert!(get_or_compile("(unterminated").is_err());
        assert_eq!(len(), 0);
        clear();
    }

    #[test]
    fn word_characters_is_idempotent() {
        let a = word_characters();
        let b = word_characters();
        assert!(std::ptr::eq(a, b));
        assert!(a.contains(b'_' as u32));
    }
}
