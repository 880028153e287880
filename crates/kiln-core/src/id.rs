//! Allocator identity.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Counter for unique [`AllocatorId`] allocation. Zero is reserved for
/// [`AllocatorId::NONE`].
static ALLOCATOR_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique per-instance identifier for an allocator.
///
/// Every allocator draws a fresh id at construction. A `MemoryHandle`
/// records the id of the allocator that produced it, so resolving a handle
/// against any other allocator is detected without comparing addresses.
/// Ids are never reused within a process, which rules out ABA confusion
/// when an allocator is dropped and another is created at the same address.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AllocatorId(u64);

impl AllocatorId {
    /// The "no allocator" id carried by invalid handles.
    pub const NONE: Self = Self(0);

    /// Allocate a fresh, unique allocator id.
    pub fn next() -> Self {
        Self(ALLOCATOR_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Whether this is [`AllocatorId::NONE`].
    pub fn is_none(self) -> bool {
        self == Self::NONE
    }

    /// Raw numeric value.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for AllocatorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
