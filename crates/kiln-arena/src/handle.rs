//! Memory handles.
//!
//! A [`MemoryHandle`] is a claim on a byte range inside one specific
//! allocator's backing buffer. It does not own the memory; the allocator
//! does. A handle is meaningless outside the allocator that produced it.

use std::fmt;

use kiln_core::AllocatorId;

/// Opaque reference to a byte range owned by an allocator.
///
/// Valid iff it names an allocator and covers at least one byte. Handles
/// are plain values; copying one does not duplicate the memory.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[must_use]
pub struct MemoryHandle {
    /// Identity of the owning allocator.
    pub(crate) allocator: AllocatorId,
    /// Byte offset within the owning allocator's buffer.
    pub(crate) offset: u64,
    /// Length of the range in bytes.
    pub(crate) size: u64,
}

impl MemoryHandle {
    /// The invalid sentinel returned by failed allocations.
    pub const INVALID: Self = Self {
        allocator: AllocatorId::NONE,
        offset: 0,
        size: 0,
    };

    /// Create a handle. Only allocators mint handles.
    pub(crate) fn new(allocator: AllocatorId, offset: u64, size: u64) -> Self {
        Self {
            allocator,
            offset,
            size,
        }
    }

    /// Whether the handle names an allocator and a non-empty range.
    pub fn is_valid(&self) -> bool {
        !self.allocator.is_none() && self.size > 0
    }

    /// Identity of the allocator that issued this handle.
    pub fn allocator(&self) -> AllocatorId {
        self.allocator
    }

    /// Byte offset within the owning buffer.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Size of the range in bytes.
    pub fn size(&self) -> u64 {
        self.size
    }
}

impl Default for MemoryHandle {
    fn default() -> Self {
        Self::INVALID
    }
}

impl fmt::Display for MemoryHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "MemoryHandle(alloc={}, off={}, size={})",
            self.allocator, self.offset, self.size
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_sentinel_is_invalid() {
        assert!(!MemoryHandle::INVALID.is_valid());
        assert_eq!(MemoryHandle::default(), MemoryHandle::INVALID);
    }

    #[test]
    fn zero_size_handle_is_invalid() {
        let h = MemoryHandle::new(AllocatorId::next(), 64, 0);
        assert!(!h.is_valid());
    }

    #[test]
    fn handle_round_trip() {
        let id = AllocatorId::next();
        let h = MemoryHandle::new(id, 1024, 256);
        assert!(h.is_valid());
        assert_eq!(h.allocator(), id);
        assert_eq!(h.offset(), 1024);
        assert_eq!(h.size(), 256);
    }
}
