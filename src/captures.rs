//! Per-match capture slots, with snapshot/restore for subroutine calls.
//!
//! Slot 0 is the overall match; slot `g` (`g >= 1`) is capturing group `g`. A slot
//! holds borrowed byte offsets into the caller's input, never an owned string —
//! mirrors the reference engine's "pointers into the input buffer" capture store.

/// Dense array of `(begin, end)` byte-offset pairs, one per capture slot.
#[derive(Debug, Clone)]
pub struct CaptureStore {
    slots: Vec<Option<(usize, usize)>>,
}

impl CaptureStore {
    /// `total_groups` does not include slot 0 (the whole match gets its own slot
    /// regardless of how many named/numbered groups the pattern has).
    pub fn new(total_groups: usize) -> Self {
        CaptureStore { slots: vec![None; total_groups + 1] }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn get(&self, slot: usize) -> Option<(usize, usize)> {
        self.slots.get(slot).copied().flatten()
    }

    pub fn set(&mut self, slot: usize, range: (usize, usize)) {
        self.slots[slot] = Some(range);
    }

    /// Clear a capture slot so a failed attempt does not leak a previous match.
    pub fn clear(&mut self, slot: usize) {
        self.slots[slot] = None;
    }

    /// Snapshot the whole array, for a subroutine call to isolate its own captures
    /// from the caller's.
    pub fn snapshot(&self) -> Vec<Option<(usize, usize)>> {
        self.slots.clone()
    }

    /// Restore a snapshot taken by [`CaptureStore::snapshot`], e.g. on subroutine
    /// backtrack.
    pub fn restore(&mut self, snapshot: Vec<Option<(usize, usize)>>) {
        self.slots = snapshot;
    }

    /// Build a scratch store from a snapshot, used to isolate a subroutine call's
    /// captures from the caller's without mutating the caller's store at all.
    pub fn from_snapshot(snapshot: Vec<Option<(usize, usize)>>) -> Self {
        CaptureStore { slots: snapshot }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_store_is_all_unset() {
        let store = CaptureStore::new(3);
        assert_eq!(store.len(), 4);
        for slot in 0..4 {
            assert_eq!(store.get(slot), None);
        }
    }

    #[test]
    fn set_then_clear_round_trips() {
        let mut store = CaptureStore::new(1);
        store.set(1, (2, 5));
        assert_eq!(store.get(1), Some((2, 5)));
        store.clear(1);
        assert_eq!(store.get(1), None);
    }

    #[test]
    fn snapshot_restore_isolates_mutation() {
        let mut store = CaptureStore::new(2);
        store.set(1, (0, 3));
        let snap = store.snapshot();
        store.set(1, (10, 20));
        store.set(2, (1, 1));
        assert_eq!(store.get(1), Some((10, 20)));
        store.restore(snap);
        assert_eq!(store.get(1), Some((0, 3)));
        assert_eq!(store.get(2), None);
    }
}
