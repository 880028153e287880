//! Error types for the Kiln memory core.
//!
//! Organized by subsystem: allocation, bitsets, containers, and pools.
//! Every failure that the allocator family can detect is reported through
//! these enums; nothing in the core aborts on a recoverable condition.

use std::error::Error;
use std::fmt;

use crate::id::AllocatorId;

/// Errors from allocators and handle resolution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AllocError {
    /// Not enough space remains in the backing buffer.
    OutOfCapacity {
        /// Number of bytes requested (including alignment padding).
        requested: usize,
        /// Number of bytes still free.
        remaining: usize,
    },
    /// A zero-byte allocation was requested.
    ZeroSized,
    /// The requested alignment is not a power of two.
    InvalidAlignment {
        /// The offending alignment.
        alignment: usize,
    },
    /// `init` was called on an allocator that already owns a buffer.
    AlreadyInitialized,
    /// The handle is the invalid sentinel (no owner or zero size).
    InvalidHandle,
    /// The handle was issued by a different allocator.
    AllocatorMismatch {
        /// Identity of the allocator asked to resolve the handle.
        expected: AllocatorId,
        /// Identity recorded in the handle.
        found: AllocatorId,
    },
    /// The handle's range lies outside the backing buffer.
    OutOfBounds {
        /// Byte offset recorded in the handle.
        offset: u64,
        /// Byte size recorded in the handle.
        size: u64,
        /// Capacity of the backing buffer.
        capacity: usize,
    },
    /// A bulk copy between allocators would not fit in the destination.
    CapacityUnderflow {
        /// Bytes that need to be copied.
        required: usize,
        /// Destination capacity.
        available: usize,
    },
    /// The backing buffer is currently borrowed by another view.
    BufferBorrowed,
    /// A byte range could not be reinterpreted as the requested type.
    Misaligned {
        /// Alignment required by the target type.
        alignment: usize,
    },
}

impl fmt::Display for AllocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfCapacity {
                requested,
                remaining,
            } => write!(
                f,
                "allocator out of capacity: requested {requested} bytes, {remaining} bytes remaining"
            ),
            Self::ZeroSized => write!(f, "zero-sized allocation requested"),
            Self::InvalidAlignment { alignment } => {
                write!(f, "alignment {alignment} is not a power of two")
            }
            Self::AlreadyInitialized => write!(f, "allocator is already initialized"),
            Self::InvalidHandle => write!(f, "invalid memory handle"),
            Self::AllocatorMismatch { expected, found } => write!(
                f,
                "handle belongs to allocator {found}, not allocator {expected}"
            ),
            Self::OutOfBounds {
                offset,
                size,
                capacity,
            } => write!(
                f,
                "handle range {offset}+{size} exceeds buffer capacity {capacity}"
            ),
            Self::CapacityUnderflow {
                required,
                available,
            } => write!(
                f,
                "destination too small: {required} bytes required, {available} bytes available"
            ),
            Self::BufferBorrowed => write!(f, "allocator buffer is already borrowed"),
            Self::Misaligned { alignment } => {
                write!(f, "byte range is not valid for a type aligned to {alignment}")
            }
        }
    }
}

impl Error for AllocError {}

/// Errors from fixed and dynamic bitsets.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BitError {
    /// Bit index at or past the bitset's capacity.
    IndexOutOfRange {
        /// The requested bit index.
        index: usize,
        /// Bit capacity of the bitset.
        capacity: usize,
    },
}

impl fmt::Display for BitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IndexOutOfRange { index, capacity } => {
                write!(f, "bit index {index} out of range for capacity {capacity}")
            }
        }
    }
}

impl Error for BitError {}

/// Errors from allocator-backed containers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ContainerError {
    /// Element index at or past the container's length.
    IndexOutOfRange {
        /// The requested index.
        index: usize,
        /// Current number of elements.
        len: usize,
    },
    /// The owning allocator could not satisfy a request.
    Alloc(AllocError),
}

impl fmt::Display for ContainerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IndexOutOfRange { index, len } => {
                write!(f, "index {index} out of range for length {len}")
            }
            Self::Alloc(err) => write!(f, "container allocation failed: {err}"),
        }
    }
}

impl Error for ContainerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Alloc(err) => Some(err),
            Self::IndexOutOfRange { .. } => None,
        }
    }
}

impl From<AllocError> for ContainerError {
    fn from(err: AllocError) -> Self {
        Self::Alloc(err)
    }
}

/// Errors from generational pools.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PoolError {
    /// The handle's index is outside the pool's slot range.
    IndexOutOfRange {
        /// Slot index encoded in the handle.
        index: u32,
        /// Current slot count.
        slots: usize,
    },
    /// The slot has been recycled since the handle was issued.
    StaleHandle {
        /// Slot index encoded in the handle.
        index: u32,
        /// Generation encoded in the handle.
        handle_generation: u32,
        /// Current generation of the slot.
        slot_generation: u32,
    },
    /// The slot is not occupied.
    Vacant {
        /// Slot index encoded in the handle.
        index: u32,
    },
    /// The pool cannot grow without exceeding the handle's index range.
    PoolFull {
        /// Maximum number of addressable slots.
        max_slots: usize,
    },
    /// The backing allocator could not satisfy a request.
    Alloc(AllocError),
}

impl fmt::Display for PoolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IndexOutOfRange { index, slots } => {
                write!(f, "pool index {index} out of range for {slots} slots")
            }
            Self::StaleHandle {
                index,
                handle_generation,
                slot_generation,
            } => write!(
                f,
                "stale handle for slot {index}: generation {handle_generation}, slot is at {slot_generation}"
            ),
            Self::Vacant { index } => write!(f, "pool slot {index} is vacant"),
            Self::PoolFull { max_slots } => {
                write!(f, "pool is full: {max_slots} addressable slots")
            }
            Self::Alloc(err) => write!(f, "pool allocation failed: {err}"),
        }
    }
}

impl Error for PoolError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Alloc(err) => Some(err),
            _ => None,
        }
    }
}

impl From<AllocError> for PoolError {
    fn from(err: AllocError) -> Self {
        Self::Alloc(err)
    }
}

impl From<ContainerError> for PoolError {
    fn from(err: ContainerError) -> Self {
        match err {
            ContainerError::Alloc(err) => Self::Alloc(err),
            ContainerError::IndexOutOfRange { index, len } => Self::IndexOutOfRange {
                index: u32::try_from(index).unwrap_or(u32::MAX),
                slots: len,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alloc_error_display_mentions_sizes() {
        let err = AllocError::OutOfCapacity {
            requested: 1200,
            remaining: 1024,
        };
        let msg = err.to_string();
        assert!(msg.contains("1200"));
        assert!(msg.contains("1024"));
    }

    #[test]
    fn container_error_exposes_alloc_source() {
        let err = ContainerError::from(AllocError::ZeroSized);
        assert!(err.source().is_some());
        let err = ContainerError::IndexOutOfRange { index: 3, len: 2 };
        assert!(err.source().is_none());
    }

    #[test]
    fn pool_error_from_container_error() {
        let err = PoolError::from(ContainerError::IndexOutOfRange { index: 7, len: 4 });
        assert_eq!(err, PoolError::IndexOutOfRange { index: 7, slots: 4 });
        let err = PoolError::from(ContainerError::Alloc(AllocError::BufferBorrowed));
        assert_eq!(err, PoolError::Alloc(AllocError::BufferBorrowed));
    }
}
