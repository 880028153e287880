//! Linear (bump) arena allocator.
//!
//! [`ArenaAllocator`] owns one fixed-size buffer and a cursor. Allocation
//! aligns the cursor, zeroes the requested range, and advances the cursor.
//! Individual frees are ignored; [`Allocator::free_all`] rewinds the cursor
//! in O(1) without touching memory. Stale bytes are zeroed lazily by the
//! next allocation that covers them.

use std::cell::{Cell, Ref, RefCell, RefMut};
use std::ops::Range;

use kiln_core::bits::{checked_align_forward, is_power_of_two};
use kiln_core::{AllocError, AllocatorId};

use crate::allocator::{AllocParams, Allocator};
use crate::config::ArenaConfig;
use crate::handle::MemoryHandle;

/// Width of one backing storage word. The buffer is a slice of `u128` so
/// its base address is aligned for every primitive type.
const WORD_BYTES: usize = std::mem::size_of::<u128>();

/// A bump-pointer arena over a fixed backing buffer.
///
/// # Thread Safety
///
/// Not thread-safe (`!Sync`). Share it between containers on one thread by
/// reference.
///
/// # Example
///
/// ```
/// use kiln_arena::{AllocParams, Allocator, ArenaAllocator};
///
/// let arena = ArenaAllocator::new(2048);
/// let a = arena.allocate(512, AllocParams::default());
/// assert!(a.is_valid());
/// arena.free_all();
/// assert_eq!(arena.used(), 0);
/// ```
pub struct ArenaAllocator {
    id: AllocatorId,
    /// Backing storage, allocated once by `init`.
    storage: RefCell<Box<[u128]>>,
    /// Logical capacity in bytes (storage may round up to a whole word).
    capacity: Cell<usize>,
    /// Bump pointer: byte offset of the first free byte.
    cursor: Cell<usize>,
    initialized: Cell<bool>,
    /// Minimum alignment applied to every request.
    min_alignment: usize,
}

impl ArenaAllocator {
    /// Create an arena with `capacity` bytes.
    ///
    /// A capacity of zero defers buffer creation to [`Allocator::init`].
    pub fn new(capacity: usize) -> Self {
        let arena = Self::uninit(ArenaConfig::DEFAULT_ALIGNMENT);
        if capacity > 0 {
            arena.create_storage(capacity);
        }
        arena
    }

    /// Create an arena from a validated config.
    pub fn with_config(config: ArenaConfig) -> Result<Self, AllocError> {
        config.validate()?;
        let arena = Self::uninit(config.alignment);
        if config.capacity > 0 {
            arena.create_storage(config.capacity);
        }
        Ok(arena)
    }

    fn uninit(min_alignment: usize) -> Self {
        Self {
            id: AllocatorId::next(),
            storage: RefCell::new(Box::default()),
            capacity: Cell::new(0),
            cursor: Cell::new(0),
            initialized: Cell::new(false),
            min_alignment,
        }
    }

    fn create_storage(&self, size: usize) {
        let words = size.div_ceil(WORD_BYTES);
        *self.storage.borrow_mut() = vec![0u128; words].into_boxed_slice();
        self.capacity.set(size);
        self.cursor.set(0);
        self.initialized.set(true);
        tracing::debug!(arena = %self.id, capacity = size, "arena initialized");
    }

    /// Whether the backing buffer has been created.
    pub fn is_initialized(&self) -> bool {
        self.initialized.get()
    }

    /// Minimum alignment applied to every allocation.
    pub fn min_alignment(&self) -> usize {
        self.min_alignment
    }

    /// Borrow the used prefix of the backing buffer.
    pub fn raw_data(&self) -> Result<Ref<'_, [u8]>, AllocError> {
        let used = self.cursor.get();
        let storage = self
            .storage
            .try_borrow()
            .map_err(|_| AllocError::BufferBorrowed)?;
        Ok(Ref::map(storage, |words| {
            &bytemuck::cast_slice::<u128, u8>(words)[..used]
        }))
    }

    /// Resolve a handle to a byte range, checking identity and bounds.
    fn range(&self, handle: &MemoryHandle) -> Result<Range<usize>, AllocError> {
        self.check_handle(handle)?;
        let out_of_bounds = || AllocError::OutOfBounds {
            offset: handle.offset(),
            size: handle.size(),
            capacity: self.capacity.get(),
        };
        let start = usize::try_from(handle.offset()).map_err(|_| out_of_bounds())?;
        let len = usize::try_from(handle.size()).map_err(|_| out_of_bounds())?;
        let end = start.checked_add(len).ok_or_else(out_of_bounds)?;
        if end > self.capacity.get() {
            return Err(out_of_bounds());
        }
        Ok(start..end)
    }
}

impl Allocator for ArenaAllocator {
    fn id(&self) -> AllocatorId {
        self.id
    }

    fn is_linear(&self) -> bool {
        true
    }

    fn init(&self, size: usize) -> Result<(), AllocError> {
        if self.initialized.get() {
            return Err(AllocError::AlreadyInitialized);
        }
        if self.storage.try_borrow_mut().is_err() {
            return Err(AllocError::BufferBorrowed);
        }
        self.create_storage(size);
        Ok(())
    }

    fn try_allocate(&self, size: usize, params: AllocParams) -> Result<MemoryHandle, AllocError> {
        if size == 0 {
            return Err(AllocError::ZeroSized);
        }
        let invalid_alignment = AllocError::InvalidAlignment {
            alignment: params.alignment,
        };
        if !is_power_of_two(params.alignment) {
            return Err(invalid_alignment);
        }
        let alignment = params.alignment.max(self.min_alignment);

        let mut storage = self
            .storage
            .try_borrow_mut()
            .map_err(|_| AllocError::BufferBorrowed)?;
        let bytes: &mut [u8] = bytemuck::cast_slice_mut(&mut storage[..]);

        // Align the actual address, not just the offset, so typed views of
        // the range satisfy the element type's alignment.
        let base = bytes.as_ptr() as usize;
        let cursor = self.cursor.get();
        let capacity = self.capacity.get();
        let aligned = base
            .checked_add(cursor)
            .and_then(|addr| checked_align_forward(addr, alignment))
            .ok_or(invalid_alignment)?;
        let offset = aligned - base;

        let end = match offset.checked_add(size) {
            Some(end) if end <= capacity => end,
            _ => {
                tracing::trace!(
                    arena = %self.id,
                    requested = size,
                    remaining = capacity - cursor,
                    "arena allocation failed"
                );
                return Err(AllocError::OutOfCapacity {
                    requested: size.saturating_add(offset - cursor),
                    remaining: capacity - cursor,
                });
            }
        };

        bytes[offset..end].fill(0);
        self.cursor.set(end);
        Ok(MemoryHandle::new(self.id, offset as u64, size as u64))
    }

    fn free(&self, _handle: &MemoryHandle) {}

    fn free_all(&self) {
        tracing::debug!(arena = %self.id, released = self.cursor.get(), "arena reset");
        self.cursor.set(0);
    }

    fn size(&self) -> usize {
        self.capacity.get()
    }

    fn used(&self) -> usize {
        self.cursor.get()
    }

    fn bytes(&self, handle: &MemoryHandle) -> Result<Ref<'_, [u8]>, AllocError> {
        let range = self.range(handle)?;
        let storage = self
            .storage
            .try_borrow()
            .map_err(|_| AllocError::BufferBorrowed)?;
        Ok(Ref::map(storage, |words| {
            &bytemuck::cast_slice::<u128, u8>(words)[range]
        }))
    }

    fn bytes_mut(&self, handle: &MemoryHandle) -> Result<RefMut<'_, [u8]>, AllocError> {
        let range = self.range(handle)?;
        let storage = self
            .storage
            .try_borrow_mut()
            .map_err(|_| AllocError::BufferBorrowed)?;
        Ok(RefMut::map(storage, |words| {
            &mut bytemuck::cast_slice_mut::<u128, u8>(words)[range]
        }))
    }

    fn copy_bytes(
        &self,
        src: &MemoryHandle,
        dst: &MemoryHandle,
        len: usize,
    ) -> Result<(), AllocError> {
        let from = self.range(src)?;
        let to = self.range(dst)?;
        if len > from.len() || len > to.len() {
            let short = if len > from.len() { src } else { dst };
            return Err(AllocError::OutOfBounds {
                offset: short.offset(),
                size: len as u64,
                capacity: self.capacity.get(),
            });
        }
        let mut storage = self
            .storage
            .try_borrow_mut()
            .map_err(|_| AllocError::BufferBorrowed)?;
        let bytes: &mut [u8] = bytemuck::cast_slice_mut(&mut storage[..]);
        bytes.copy_within(from.start..from.start + len, to.start);
        Ok(())
    }
}

/// Copy the used prefix of `src` into `dst`.
///
/// `dst`'s cursor is set to `src`'s so the copied bytes count as used.
/// Handles issued by `src` still name `src`; they do not resolve against
/// `dst`.
pub fn copy_from(src: &ArenaAllocator, dst: &ArenaAllocator) -> Result<(), AllocError> {
    if src.id == dst.id {
        return Ok(());
    }
    let used = src.used();
    if used > dst.size() {
        return Err(AllocError::CapacityUnderflow {
            required: used,
            available: dst.size(),
        });
    }
    let from = src
        .storage
        .try_borrow()
        .map_err(|_| AllocError::BufferBorrowed)?;
    let mut to = dst
        .storage
        .try_borrow_mut()
        .map_err(|_| AllocError::BufferBorrowed)?;
    let from_bytes: &[u8] = bytemuck::cast_slice(&from[..]);
    let to_bytes: &mut [u8] = bytemuck::cast_slice_mut(&mut to[..]);
    to_bytes[..used].copy_from_slice(&from_bytes[..used]);
    dst.cursor.set(used);
    Ok(())
}

/// Copy the used prefix of `src` into `dst`, then reset `src`.
pub fn move_from(src: &ArenaAllocator, dst: &ArenaAllocator) -> Result<(), AllocError> {
    if src.id == dst.id {
        return Ok(());
    }
    copy_from(src, dst)?;
    tracing::debug!(from = %src.id, to = %dst.id, bytes = dst.used(), "arena contents moved");
    src.free_all();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocations_are_sequential_and_sized() {
        let arena = ArenaAllocator::new(1024);
        let a = arena.try_allocate(100, AllocParams::aligned(1)).unwrap();
        let b = arena.try_allocate(50, AllocParams::aligned(1)).unwrap();
        assert_eq!(a.size(), 100);
        assert_eq!(b.size(), 50);
        assert!(b.offset() >= a.offset() + a.size());
    }

    #[test]
    fn exhaustion_returns_invalid_handle() {
        let arena = ArenaAllocator::new(256);
        assert!(arena.allocate(200, AllocParams::default()).is_valid());
        let h = arena.allocate(200, AllocParams::default());
        assert!(!h.is_valid());
        assert_eq!(h, MemoryHandle::INVALID);
    }

    #[test]
    fn exhaustion_reports_remaining() {
        let arena = ArenaAllocator::new(256);
        arena.try_allocate(256, AllocParams::default()).unwrap();
        let err = arena.try_allocate(1, AllocParams::default()).unwrap_err();
        assert_eq!(
            err,
            AllocError::OutOfCapacity {
                requested: 1,
                remaining: 0
            }
        );
    }

    #[test]
    fn zero_sized_request_rejected() {
        let arena = ArenaAllocator::new(64);
        assert_eq!(
            arena.try_allocate(0, AllocParams::default()),
            Err(AllocError::ZeroSized)
        );
        assert!(!arena.allocate(0, AllocParams::default()).is_valid());
    }

    #[test]
    fn non_power_of_two_alignment_rejected() {
        let arena = ArenaAllocator::new(64);
        assert_eq!(
            arena.try_allocate(8, AllocParams::aligned(24)),
            Err(AllocError::InvalidAlignment { alignment: 24 })
        );
    }

    #[test]
    fn bad_alignment_below_floor_rejected() {
        let arena = ArenaAllocator::new(256);
        for alignment in [0usize, 3, 6, 12] {
            assert_eq!(
                arena.try_allocate(8, AllocParams::aligned(alignment)),
                Err(AllocError::InvalidAlignment { alignment })
            );
        }
        assert_eq!(arena.used(), 0);
    }

    #[test]
    fn addresses_honour_requested_alignment() {
        let arena = ArenaAllocator::new(4096);
        arena.try_allocate(3, AllocParams::aligned(1)).unwrap();
        for align in [16usize, 64, 256] {
            let h = arena.try_allocate(8, AllocParams::aligned(align)).unwrap();
            let bytes = arena.bytes(&h).unwrap();
            assert_eq!(bytes.as_ptr() as usize % align, 0);
        }
    }

    #[test]
    fn allocation_is_zeroed_after_free_all() {
        let arena = ArenaAllocator::new(128);
        let h = arena.try_allocate(64, AllocParams::default()).unwrap();
        arena.bytes_mut(&h).unwrap().fill(0xAB);
        arena.free_all();
        let h = arena.try_allocate(64, AllocParams::default()).unwrap();
        assert!(arena.bytes(&h).unwrap().iter().all(|&b| b == 0));
    }

    #[test]
    fn free_is_a_no_op() {
        let arena = ArenaAllocator::new(128);
        let h = arena.try_allocate(32, AllocParams::default()).unwrap();
        let used = arena.used();
        arena.free(&h);
        assert_eq!(arena.used(), used);
        assert!(arena.is_linear());
    }

    #[test]
    fn foreign_handle_rejected() {
        let a = ArenaAllocator::new(128);
        let b = ArenaAllocator::new(128);
        let h = a.try_allocate(16, AllocParams::default()).unwrap();
        assert!(a.owns(&h));
        assert!(!b.owns(&h));
        assert!(matches!(
            b.bytes(&h),
            Err(AllocError::AllocatorMismatch { .. })
        ));
    }

    #[test]
    fn invalid_handle_rejected() {
        let arena = ArenaAllocator::new(128);
        assert!(matches!(
            arena.bytes(&MemoryHandle::INVALID),
            Err(AllocError::InvalidHandle)
        ));
    }

    #[test]
    fn overlapping_borrow_reports_busy_buffer() {
        let arena = ArenaAllocator::new(128);
        let h = arena.try_allocate(16, AllocParams::default()).unwrap();
        let _view = arena.bytes(&h).unwrap();
        assert_eq!(
            arena.try_allocate(16, AllocParams::default()),
            Err(AllocError::BufferBorrowed)
        );
        assert!(matches!(arena.bytes_mut(&h), Err(AllocError::BufferBorrowed)));
    }

    #[test]
    fn deferred_init() {
        let arena = ArenaAllocator::new(0);
        assert!(!arena.is_initialized());
        assert!(!arena.allocate(8, AllocParams::default()).is_valid());
        arena.init(256).unwrap();
        assert_eq!(arena.size(), 256);
        assert!(arena.allocate(8, AllocParams::default()).is_valid());
    }

    #[test]
    fn init_twice_rejected() {
        let arena = ArenaAllocator::new(64);
        assert_eq!(arena.init(64), Err(AllocError::AlreadyInitialized));
    }

    #[test]
    fn config_alignment_is_a_floor() {
        let arena = ArenaAllocator::with_config(ArenaConfig::new(1024).with_alignment(64)).unwrap();
        arena.try_allocate(1, AllocParams::aligned(1)).unwrap();
        let h = arena.try_allocate(1, AllocParams::aligned(1)).unwrap();
        let bytes = arena.bytes(&h).unwrap();
        assert_eq!(bytes.as_ptr() as usize % 64, 0);
    }

    #[test]
    fn copy_bytes_within_arena() {
        let arena = ArenaAllocator::new(256);
        let a = arena.try_allocate(8, AllocParams::default()).unwrap();
        let b = arena.try_allocate(8, AllocParams::default()).unwrap();
        arena.bytes_mut(&a).unwrap().copy_from_slice(&[1, 2, 3, 4, 5, 6, 7, 8]);
        arena.copy_bytes(&a, &b, 4).unwrap();
        assert_eq!(&*arena.bytes(&b).unwrap(), &[1, 2, 3, 4, 0, 0, 0, 0]);
        assert!(matches!(
            arena.copy_bytes(&a, &b, 9),
            Err(AllocError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn raw_data_is_used_prefix() {
        let arena = ArenaAllocator::new(256);
        arena.try_allocate(10, AllocParams::aligned(1)).unwrap();
        assert_eq!(arena.raw_data().unwrap().len(), arena.used());
    }

    #[test]
    fn copy_from_mirrors_used_prefix() {
        let src = ArenaAllocator::new(128);
        let dst = ArenaAllocator::new(256);
        let h = src.try_allocate(4, AllocParams::aligned(1)).unwrap();
        src.bytes_mut(&h).unwrap().copy_from_slice(&[9, 8, 7, 6]);

        copy_from(&src, &dst).unwrap();
        assert_eq!(dst.used(), src.used());
        assert_eq!(&*dst.raw_data().unwrap(), &*src.raw_data().unwrap());
    }

    #[test]
    fn move_from_resets_source() {
        let src = ArenaAllocator::new(128);
        let dst = ArenaAllocator::new(128);
        src.try_allocate(64, AllocParams::default()).unwrap();
        let used = src.used();
        move_from(&src, &dst).unwrap();
        assert_eq!(src.used(), 0);
        assert_eq!(dst.used(), used);
    }

    #[test]
    fn copy_into_smaller_arena_is_an_error() {
        let src = ArenaAllocator::new(256);
        let dst = ArenaAllocator::new(64);
        src.try_allocate(128, AllocParams::default()).unwrap();
        assert_eq!(
            copy_from(&src, &dst),
            Err(AllocError::CapacityUnderflow {
                required: src.used(),
                available: 64
            })
        );
        assert_eq!(
            move_from(&src, &dst),
            Err(AllocError::CapacityUnderflow {
                required: src.used(),
                available: 64
            })
        );
        assert!(src.used() > 0);
    }

    #[cfg(not(miri))]
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn live_handles_never_overlap_or_exceed_capacity(
                reqs in proptest::collection::vec((1usize..200, 0u32..7), 1..40),
            ) {
                let arena = ArenaAllocator::new(4096);
                let mut live: Vec<MemoryHandle> = Vec::new();
                for (size, shift) in reqs {
                    let align = 1usize << shift;
                    if let Ok(h) = arena.try_allocate(size, AllocParams::aligned(align)) {
                        prop_assert!(h.offset() + h.size() <= arena.size() as u64);
                        for other in &live {
                            let disjoint = h.offset() >= other.offset() + other.size()
                                || other.offset() >= h.offset() + h.size();
                            prop_assert!(disjoint);
                        }
                        live.push(h);
                    }
                }
                prop_assert!(arena.used() <= arena.size());
            }
        }
    }
}
