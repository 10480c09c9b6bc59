//! Typed identifier for a row in the symbol table.

use crate::index_vec::Idx;
use std::sync::atomic::{AtomicU32, Ordering};

/// A 1-based, never-reused identifier for a symbol-table row.
///
/// `SymbolIdGenerator` starts counting at 1 so that `SymbolId::DUMMY`
/// (`u32::MAX`) and the value `0` both stay outside the range of real ids
/// and can be used as sentinels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SymbolId(pub u32);

/// Ids are 1-based (see `SymbolIdGenerator`) but `IndexVec` storage is
/// 0-based, so the `Idx` mapping shifts by one in both directions.
impl Idx for SymbolId {
    fn from_usize(idx: usize) -> Self {
        SymbolId((idx + 1) as u32)
    }
    fn index(self) -> usize {
        self.0 as usize - 1
    }
}

impl SymbolId {
    /// Sentinel for "no symbol" contexts (e.g. an unresolved forward reference).
    pub const DUMMY: SymbolId = SymbolId(u32::MAX);

    pub fn is_dummy(self) -> bool {
        self == Self::DUMMY
    }
}

impl std::fmt::Display for SymbolId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Issues ids in increasing order starting at 1. Never reused, per the
/// symbol table's append-only invariant.
pub struct SymbolIdGenerator {
    counter: AtomicU32,
}

impl SymbolIdGenerator {
    pub fn new() -> Self {
        Self {
            counter: AtomicU32::new(1),
        }
    }

    pub fn next(&self) -> SymbolId {
        let id = self.counter.fetch_add(1, Ordering::SeqCst);
        if id == u32::MAX {
            panic!("symbol table exhausted its id space");
        }
        SymbolId(id)
    }
}

impl Default for SymbolIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck_macros::quickcheck;

    #[test]
    fn ids_start_at_one_and_increase() {
        let gen = SymbolIdGenerator::new();
        assert_eq!(gen.next(), SymbolId(1));
        assert_eq!(gen.next(), SymbolId(2));
        assert_eq!(gen.next(), SymbolId(3));
    }

    #[test]
    fn dummy_is_not_a_real_id() {
        assert!(SymbolId::DUMMY.is_dummy());
        assert!(!SymbolId(1).is_dummy());
    }

    /// §8: "for all symbol-table ids issued, 1 <= i <= size" and ids are
    /// issued in strictly increasing order for any run length.
    #[quickcheck]
    fn ids_are_strictly_increasing_for_any_run_length(n: u8) -> bool {
        let gen = SymbolIdGenerator::new();
        let mut last = SymbolId(0);
        for _ in 0..n {
            let next = gen.next();
            if next.0 <= last.0 {
                return false;
            }
            last = next;
        }
        true
    }

    /// Never-reused: every id drawn from one generator is distinct.
    #[quickcheck]
    fn ids_are_never_reused(n: u8) -> bool {
        let gen = SymbolIdGenerator::new();
        let mut seen = std::collections::HashSet::new();
        (0..n).all(|_| seen.insert(gen.next()))
    }
}
