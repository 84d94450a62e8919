//! Stylesheet identifiers.
//!
//! Ids are either supplied by the caller or drawn from a
//! [`SheetIdAllocator`]. [`DEFAULT_IDS`] is the process-wide allocator used
//! when neither is given: it starts at zero, hands out each number once and
//! is never reset, so two sheets built with default ids never collide within
//! one process.

use core::fmt;
use core::sync::atomic::{AtomicU64, Ordering};

/// Identifies one stylesheet instance within a document.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct SheetId(String);

impl SheetId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SheetId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

impl From<&str> for SheetId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for SheetId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<u64> for SheetId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

/// Monotonic counter handing out numeric sheet ids.
#[derive(Debug)]
pub struct SheetIdAllocator {
    next: AtomicU64,
}

impl SheetIdAllocator {
    /// Create an allocator whose first id is `0`.
    pub const fn new() -> Self {
        Self::starting_at(0)
    }

    pub const fn starting_at(first: u64) -> Self {
        Self {
            next: AtomicU64::new(first),
        }
    }

    /// Take the next id.
    pub fn next_id(&self) -> SheetId {
        SheetId::from(self.next.fetch_add(1, Ordering::Relaxed))
    }

    /// The id the next call to [`next_id`](Self::next_id) will return.
    pub fn peek(&self) -> u64 {
        self.next.load(Ordering::Relaxed)
    }
}

impl Default for SheetIdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

/// Process-wide allocator for sheets constructed without an explicit id.
pub static DEFAULT_IDS: SheetIdAllocator = SheetIdAllocator::new();

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocator_counts_up_from_its_start() {
        let ids = SheetIdAllocator::starting_at(7);
        assert_eq!(ids.next_id(), SheetId::from("7"));
        assert_eq!(ids.next_id(), SheetId::from("8"));
        assert_eq!(ids.peek(), 9);
    }

    #[test]
    fn default_allocator_never_repeats() {
        let first = DEFAULT_IDS.next_id();
        let second = DEFAULT_IDS.next_id();
        assert_ne!(first, second);
    }
}
