//! The allocator contract.
//!
//! [`Allocator`] is object-safe so that containers can hold a
//! `&dyn Allocator` and stay agnostic of the allocation strategy. All
//! methods take `&self`; implementations keep their cursor and buffer behind
//! `Cell`/`RefCell`.

use std::cell::{Ref, RefMut};

use kiln_core::bits::DEFAULT_ALIGNMENT;
use kiln_core::{AllocError, AllocatorId};

use crate::handle::MemoryHandle;

/// Per-request allocation parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AllocParams {
    /// Required alignment of the returned range's address. Power of two.
    pub alignment: usize,
    /// The range must be one contiguous block (typed helpers set this).
    pub contiguous: bool,
}

impl AllocParams {
    /// Parameters with the given alignment.
    pub fn aligned(alignment: usize) -> Self {
        Self {
            alignment,
            contiguous: false,
        }
    }

    /// Contiguous parameters with the given alignment.
    pub fn contiguous(alignment: usize) -> Self {
        Self {
            alignment,
            contiguous: true,
        }
    }
}

impl Default for AllocParams {
    fn default() -> Self {
        Self::aligned(DEFAULT_ALIGNMENT)
    }
}

/// A process-local resource owning one contiguous backing buffer.
///
/// Handles returned by [`try_allocate`](Allocator::try_allocate) address
/// zero-initialised, aligned, non-overlapping byte ranges inside that
/// buffer. The total bytes covered by live handles never exceed
/// [`size`](Allocator::size).
pub trait Allocator {
    /// Identity stamped into every handle this allocator issues.
    fn id(&self) -> AllocatorId;

    /// Whether the allocator only reclaims memory wholesale.
    fn is_linear(&self) -> bool;

    /// Create the backing buffer. May only be called once.
    fn init(&self, size: usize) -> Result<(), AllocError>;

    /// Allocate `size` zeroed bytes aligned to `params.alignment`.
    fn try_allocate(&self, size: usize, params: AllocParams) -> Result<MemoryHandle, AllocError>;

    /// Allocate, returning [`MemoryHandle::INVALID`] on any failure.
    ///
    /// Callers must check [`MemoryHandle::is_valid`] before resolving.
    fn allocate(&self, size: usize, params: AllocParams) -> MemoryHandle {
        self.try_allocate(size, params)
            .unwrap_or(MemoryHandle::INVALID)
    }

    /// Release a single allocation. Linear allocators ignore this.
    fn free(&self, handle: &MemoryHandle);

    /// Release every allocation at once.
    ///
    /// Previously issued handles must not be resolved afterwards; this is
    /// not detected.
    fn free_all(&self);

    /// Capacity of the backing buffer in bytes.
    fn size(&self) -> usize;

    /// Bytes currently consumed, including alignment padding.
    fn used(&self) -> usize;

    /// Bytes still available.
    fn remaining(&self) -> usize {
        self.size().saturating_sub(self.used())
    }

    /// Whether `handle` was issued by this allocator.
    fn owns(&self, handle: &MemoryHandle) -> bool {
        handle.is_valid() && handle.allocator() == self.id()
    }

    /// Check validity and ownership of `handle`.
    fn check_handle(&self, handle: &MemoryHandle) -> Result<(), AllocError> {
        if !handle.is_valid() {
            return Err(AllocError::InvalidHandle);
        }
        if handle.allocator() != self.id() {
            return Err(AllocError::AllocatorMismatch {
                expected: self.id(),
                found: handle.allocator(),
            });
        }
        Ok(())
    }

    /// Borrow the bytes addressed by `handle`.
    fn bytes(&self, handle: &MemoryHandle) -> Result<Ref<'_, [u8]>, AllocError>;

    /// Mutably borrow the bytes addressed by `handle`.
    fn bytes_mut(&self, handle: &MemoryHandle) -> Result<RefMut<'_, [u8]>, AllocError>;

    /// Copy the first `len` bytes of `src` into `dst`.
    ///
    /// Both handles must belong to this allocator. Used for relocation
    /// (e.g. array growth) where two borrows of the same buffer would
    /// otherwise overlap.
    fn copy_bytes(
        &self,
        src: &MemoryHandle,
        dst: &MemoryHandle,
        len: usize,
    ) -> Result<(), AllocError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_params_use_two_pointer_alignment() {
        let params = AllocParams::default();
        assert_eq!(params.alignment, 2 * std::mem::size_of::<usize>());
        assert!(!params.contiguous);
    }

    #[test]
    fn contiguous_params() {
        let params = AllocParams::contiguous(64);
        assert_eq!(params.alignment, 64);
        assert!(params.contiguous);
    }
}
