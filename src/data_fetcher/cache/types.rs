//! Cache bookkeeping types

use std::fmt;

/// Hit/miss counters of a table memo.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemoStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
    pub capacity: usize,
}

impl MemoStats {
    /// Number of requests the memo answered, cached or not.
    pub fn lookups(&self) -> u64 {
        self.hits + self.misses
    }
}

impl fmt::Display for MemoStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} hits, {} misses, {}/{} entries",
            self.hits, self.misses, self.entries, self.capacity
        )
    }
}
