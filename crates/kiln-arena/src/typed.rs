//! Typed construction helpers layered over raw byte allocation.
//!
//! Every typed path requires [`MemCopy`]: the element type must be valid
//! for any bit pattern and safe to relocate with a byte copy. Containers
//! rely on this when they grow or bulk-assign.

use std::cell::{Ref, RefMut};
use std::mem::{align_of, size_of};

use bytemuck::Pod;
use kiln_core::bits::{align_forward, is_power_of_two, DEFAULT_ALIGNMENT};
use kiln_core::AllocError;

use crate::allocator::{AllocParams, Allocator};
use crate::handle::MemoryHandle;

/// Types that can be moved, copied and zero-initialised as raw bytes.
///
/// Implemented for every [`bytemuck::Pod`] type.
pub trait MemCopy: Pod {}

impl<T: Pod> MemCopy for T {}

/// Distance in bytes between consecutive elements constructed one at a
/// time: `size_of::<T>()` rounded up to `alignment`.
pub fn element_stride<T>(alignment: usize) -> usize {
    align_forward(size_of::<T>(), alignment)
}

fn type_alignment<T>() -> usize {
    align_of::<T>().max(DEFAULT_ALIGNMENT)
}

fn byte_len<T>(count: usize) -> Result<usize, AllocError> {
    size_of::<T>()
        .checked_mul(count)
        .ok_or(AllocError::OutOfCapacity {
            requested: usize::MAX,
            remaining: 0,
        })
}

/// Typed helpers available on every [`Allocator`], including trait objects.
pub trait AllocatorExt: Allocator {
    /// Allocate zeroed storage for one `T`.
    fn allocate_for<T: MemCopy>(&self) -> MemoryHandle {
        self.allocate(size_of::<T>(), AllocParams::contiguous(type_alignment::<T>()))
    }

    /// Allocate storage for one `T` and move `value` into it.
    fn create<T: MemCopy>(&self, value: T) -> Result<MemoryHandle, AllocError> {
        let handle =
            self.try_allocate(size_of::<T>(), AllocParams::contiguous(type_alignment::<T>()))?;
        self.write(&handle, &value)?;
        Ok(handle)
    }

    /// Allocate `count` default (all-zero) elements of `T` laid out densely.
    fn create_array<T: MemCopy>(&self, count: usize) -> Result<MemoryHandle, AllocError> {
        self.try_allocate(
            byte_len::<T>(count)?,
            AllocParams::contiguous(type_alignment::<T>()),
        )
    }

    /// Allocate `count` elements and construct each one with `init(i)`.
    ///
    /// Elements are placed at [`element_stride::<T>(alignment)`](element_stride)
    /// so every element starts on an `alignment` boundary. Read them back
    /// with [`read_element`](AllocatorExt::read_element) using the same
    /// stride.
    fn create_array_with<T, F>(
        &self,
        count: usize,
        alignment: usize,
        mut init: F,
    ) -> Result<MemoryHandle, AllocError>
    where
        T: MemCopy,
        F: FnMut(usize) -> T,
    {
        if !is_power_of_two(alignment) {
            return Err(AllocError::InvalidAlignment { alignment });
        }
        let alignment = alignment.max(align_of::<T>());
        let stride = element_stride::<T>(alignment);
        let total = stride.checked_mul(count).ok_or(AllocError::OutOfCapacity {
            requested: usize::MAX,
            remaining: self.remaining(),
        })?;
        let handle = self.try_allocate(total, AllocParams::contiguous(alignment))?;
        let mut bytes = self.bytes_mut(&handle)?;
        for i in 0..count {
            let value = init(i);
            let start = i * stride;
            bytes[start..start + size_of::<T>()].copy_from_slice(bytemuck::bytes_of(&value));
        }
        Ok(handle)
    }

    /// Read one `T` from the start of `handle`'s range.
    fn read<T: MemCopy>(&self, handle: &MemoryHandle) -> Result<T, AllocError> {
        self.read_element(handle, 0, size_of::<T>())
    }

    /// Read the `index`-th `T` of a range laid out with `stride` bytes per element.
    fn read_element<T: MemCopy>(
        &self,
        handle: &MemoryHandle,
        index: usize,
        stride: usize,
    ) -> Result<T, AllocError> {
        let bytes = self.bytes(handle)?;
        let start = index.saturating_mul(stride);
        let end = start.saturating_add(size_of::<T>());
        if end > bytes.len() {
            return Err(AllocError::OutOfBounds {
                offset: handle.offset(),
                size: end as u64,
                capacity: bytes.len(),
            });
        }
        Ok(bytemuck::pod_read_unaligned(&bytes[start..end]))
    }

    /// Overwrite the start of `handle`'s range with `value`.
    fn write<T: MemCopy>(&self, handle: &MemoryHandle, value: &T) -> Result<(), AllocError> {
        let mut bytes = self.bytes_mut(handle)?;
        let src = bytemuck::bytes_of(value);
        if src.len() > bytes.len() {
            return Err(AllocError::OutOfBounds {
                offset: handle.offset(),
                size: src.len() as u64,
                capacity: bytes.len(),
            });
        }
        bytes[..src.len()].copy_from_slice(src);
        Ok(())
    }

    /// Borrow a densely packed range as a slice of `T`.
    fn slice<T: MemCopy>(&self, handle: &MemoryHandle) -> Result<Ref<'_, [T]>, AllocError> {
        let bytes = self.bytes(handle)?;
        Ref::filter_map(bytes, |b| bytemuck::try_cast_slice::<u8, T>(b).ok()).map_err(|_| {
            AllocError::Misaligned {
                alignment: align_of::<T>(),
            }
        })
    }

    /// Mutably borrow a densely packed range as a slice of `T`.
    fn slice_mut<T: MemCopy>(
        &self,
        handle: &MemoryHandle,
    ) -> Result<RefMut<'_, [T]>, AllocError> {
        let bytes = self.bytes_mut(handle)?;
        RefMut::filter_map(bytes, |b| bytemuck::try_cast_slice_mut::<u8, T>(b).ok()).map_err(
            |_| AllocError::Misaligned {
                alignment: align_of::<T>(),
            },
        )
    }
}

impl<A: Allocator + ?Sized> AllocatorExt for A {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::ArenaAllocator;
    use bytemuck::Zeroable;

    #[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
    #[repr(C)]
    struct Vertex {
        pos: [f32; 3],
        id: u32,
    }

    #[test]
    fn create_round_trip() {
        let arena = ArenaAllocator::new(256);
        let v = Vertex {
            pos: [1.0, 2.0, 3.0],
            id: 7,
        };
        let h = arena.create(v).unwrap();
        assert_eq!(h.size(), size_of::<Vertex>() as u64);
        assert_eq!(arena.read::<Vertex>(&h).unwrap(), v);
    }

    #[test]
    fn allocate_for_is_zeroed() {
        let arena = ArenaAllocator::new(256);
        let h = arena.allocate_for::<u64>();
        assert!(h.is_valid());
        assert_eq!(arena.read::<u64>(&h).unwrap(), 0);
    }

    #[test]
    fn create_array_is_default_constructed() {
        let arena = ArenaAllocator::new(1024);
        let h = arena.create_array::<Vertex>(8).unwrap();
        let slice = arena.slice::<Vertex>(&h).unwrap();
        assert_eq!(slice.len(), 8);
        assert!(slice.iter().all(|v| *v == Vertex::zeroed()));
    }

    #[test]
    fn create_array_with_uses_aligned_stride() {
        let arena = ArenaAllocator::new(1024);
        // 12-byte element, 16-byte alignment: stride must be 16, not 12.
        let stride = element_stride::<[u32; 3]>(16);
        assert_eq!(stride, 16);
        let h = arena
            .create_array_with::<[u32; 3], _>(4, 16, |i| [i as u32; 3])
            .unwrap();
        assert_eq!(h.size(), 64);
        for i in 0..4 {
            let e: [u32; 3] = arena.read_element(&h, i, stride).unwrap();
            assert_eq!(e, [i as u32; 3]);
        }
        let base = arena.bytes(&h).unwrap().as_ptr() as usize;
        assert_eq!(base % 16, 0);
    }

    #[test]
    fn create_array_with_rejects_bad_alignment() {
        let arena = ArenaAllocator::new(1024);
        assert_eq!(
            arena.create_array_with::<u32, _>(4, 6, |_| 0),
            Err(AllocError::InvalidAlignment { alignment: 6 })
        );
    }

    #[test]
    fn read_past_range_is_out_of_bounds() {
        let arena = ArenaAllocator::new(256);
        let h = arena.create(1u32).unwrap();
        assert!(matches!(
            arena.read::<u64>(&h),
            Err(AllocError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn slice_mut_writes_are_visible() {
        let arena = ArenaAllocator::new(256);
        let h = arena.create_array::<u32>(4).unwrap();
        arena.slice_mut::<u32>(&h).unwrap().copy_from_slice(&[1, 2, 3, 4]);
        assert_eq!(&*arena.slice::<u32>(&h).unwrap(), &[1, 2, 3, 4]);
    }

    #[test]
    fn helpers_work_through_trait_objects() {
        let arena = ArenaAllocator::new(256);
        let dynamic: &dyn Allocator = &arena;
        let h = dynamic.create(42u16).unwrap();
        assert_eq!(dynamic.read::<u16>(&h).unwrap(), 42);
    }
}
