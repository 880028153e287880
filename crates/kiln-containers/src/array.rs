//! Allocator-backed growable arrays.
//!
//! An [`Array`] owns one allocation from a single allocator, fixed for the
//! array's lifetime. Growth allocates a new power-of-two buffer, copies the
//! live prefix byte-for-byte, and frees the old buffer. For linear
//! allocators the old buffer is only reclaimed by the allocator's
//! `free_all`.

use std::cell::{Ref, RefMut};
use std::fmt;
use std::marker::PhantomData;
use std::mem::size_of;
use std::ops::Deref;

use kiln_arena::{Allocator, AllocatorExt, MemCopy, MemoryHandle};
use kiln_core::bits::round_up_pow2;
use kiln_core::{AllocError, ContainerError};

use crate::view::View;

/// An owning, resizable sequence of `T` stored in an allocator's buffer.
///
/// Invariants:
/// - `len <= capacity`
/// - `capacity` is a power of two and the handle covers
///   `capacity * size_of::<T>()` bytes.
///
/// Element access goes through the allocator and returns a borrow guard or
/// a copy. While a guard from [`as_slice`](Array::as_slice) is alive, any
/// mutation of a container sharing the same allocator reports
/// [`AllocError::BufferBorrowed`].
pub struct Array<'a, T: MemCopy> {
    allocator: &'a dyn Allocator,
    handle: MemoryHandle,
    len: usize,
    capacity: usize,
    _marker: PhantomData<T>,
}

impl<'a, T: MemCopy> Array<'a, T> {
    /// Create an empty array with room for at least `reserved` elements.
    pub fn new(allocator: &'a dyn Allocator, reserved: usize) -> Result<Self, ContainerError> {
        let capacity = round_up_pow2(reserved);
        let handle = Self::allocate_buffer(allocator, capacity)?;
        Ok(Self {
            allocator,
            handle,
            len: 0,
            capacity,
            _marker: PhantomData,
        })
    }

    /// Create an array of `len` zeroed elements.
    pub fn zeroed(allocator: &'a dyn Allocator, len: usize) -> Result<Self, ContainerError> {
        let mut array = Self::new(allocator, len)?;
        array.len = len;
        Ok(array)
    }

    /// Create an array holding a copy of `elems`.
    pub fn from_slice(allocator: &'a dyn Allocator, elems: &[T]) -> Result<Self, ContainerError> {
        let mut array = Self::new(allocator, elems.len())?;
        array.append(View::new(elems))?;
        Ok(array)
    }

    /// Copy this array into a fresh allocation from the same allocator.
    pub fn try_clone(&self) -> Result<Self, ContainerError> {
        let mut copy = Self::new(self.allocator, self.len)?;
        copy.assign(self)?;
        Ok(copy)
    }

    fn allocate_buffer(
        allocator: &dyn Allocator,
        capacity: usize,
    ) -> Result<MemoryHandle, ContainerError> {
        if size_of::<T>() == 0 {
            return Err(AllocError::ZeroSized.into());
        }
        Ok(allocator.create_array::<T>(capacity)?)
    }

    /// Number of live elements.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the array has no live elements.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of elements the current buffer can hold.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The allocator that owns this array's buffer.
    pub fn allocator(&self) -> &'a dyn Allocator {
        self.allocator
    }

    /// Handle to the current buffer.
    pub fn handle(&self) -> MemoryHandle {
        self.handle
    }

    /// Reallocate to hold `round_up_pow2(new_capacity)` elements.
    ///
    /// The first `min(len, capacity)` elements are preserved byte-for-byte;
    /// a smaller capacity truncates `len`.
    pub fn resize(&mut self, new_capacity: usize) -> Result<(), ContainerError> {
        let capacity = round_up_pow2(new_capacity);
        let handle = Self::allocate_buffer(self.allocator, capacity)?;
        let keep = self.len.min(capacity);
        if keep > 0 {
            self.allocator
                .copy_bytes(&self.handle, &handle, keep * size_of::<T>())?;
        }
        self.allocator.free(&self.handle);
        tracing::trace!(from = self.capacity, to = capacity, "array resized");
        self.handle = handle;
        self.capacity = capacity;
        self.len = keep;
        Ok(())
    }

    /// Grow to at least `capacity` elements; never shrinks.
    pub fn reserve(&mut self, capacity: usize) -> Result<(), ContainerError> {
        if capacity > self.capacity {
            self.resize(capacity)?;
        }
        Ok(())
    }

    /// Set the length to `new_len`, filling new slots with `value`.
    ///
    /// Grows capacity as needed; shrinking only truncates.
    pub fn resize_len(&mut self, new_len: usize, value: T) -> Result<(), ContainerError> {
        if new_len > self.len {
            self.reserve(new_len)?;
            let start = self.len;
            self.slots_mut()?[start..new_len].fill(value);
        }
        self.len = new_len;
        Ok(())
    }

    /// Release unused capacity (down to the next power of two).
    pub fn shrink_to_fit(&mut self) -> Result<(), ContainerError> {
        if round_up_pow2(self.len) < self.capacity {
            self.resize(self.len)?;
        }
        Ok(())
    }

    /// Append one element, returning the new length.
    ///
    /// Capacity doubles once the array is at, or one slot short of, full.
    pub fn push(&mut self, value: T) -> Result<usize, ContainerError> {
        if self.len + 1 >= self.capacity {
            self.reserve((self.capacity * 2).max(2))?;
        }
        let index = self.len;
        self.slots_mut()?[index] = value;
        self.len += 1;
        Ok(self.len)
    }

    /// Append every element of `view` with at most one reallocation.
    pub fn append(&mut self, view: View<'_, T>) -> Result<usize, ContainerError> {
        if view.is_empty() {
            return Ok(self.len);
        }
        let new_len = self.len + view.len();
        self.reserve(new_len)?;
        let start = self.len;
        self.slots_mut()?[start..new_len].copy_from_slice(view.as_slice());
        self.len = new_len;
        Ok(self.len)
    }

    /// Remove and return the last element.
    pub fn pop(&mut self) -> Result<Option<T>, ContainerError> {
        if self.len == 0 {
            return Ok(None);
        }
        let value = self.get(self.len - 1)?;
        self.len -= 1;
        Ok(Some(value))
    }

    /// Drop all elements, keeping the buffer.
    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// Copy of the element at `index`.
    pub fn get(&self, index: usize) -> Result<T, ContainerError> {
        self.check_index(index)?;
        Ok(self.allocator.read_element(&self.handle, index, size_of::<T>())?)
    }

    /// Overwrite the element at `index`.
    pub fn set(&mut self, index: usize, value: T) -> Result<(), ContainerError> {
        self.check_index(index)?;
        self.slots_mut()?[index] = value;
        Ok(())
    }

    /// Overwrite `self` with the contents of `view`, growing if needed.
    ///
    /// On error `self` is left unchanged.
    pub fn assign_view(&mut self, view: View<'_, T>) -> Result<(), ContainerError> {
        self.reserve(view.len())?;
        self.slots_mut()?[..view.len()].copy_from_slice(view.as_slice());
        self.len = view.len();
        Ok(())
    }

    /// Overwrite `self` with the contents of `other`, growing if needed.
    ///
    /// On error `self` is left unchanged.
    pub fn assign(&mut self, other: &Array<'_, T>) -> Result<(), ContainerError> {
        if other.allocator.id() != self.allocator.id() {
            let src = other.as_slice()?;
            return self.assign_view(View::new(&src));
        }
        self.reserve(other.len)?;
        if other.len > 0 {
            self.allocator
                .copy_bytes(&other.handle, &self.handle, other.len * size_of::<T>())?;
        }
        self.len = other.len;
        Ok(())
    }

    /// Borrow the live elements.
    pub fn as_slice(&self) -> Result<Ref<'_, [T]>, ContainerError> {
        let len = self.len;
        let slots = self.allocator.slice::<T>(&self.handle)?;
        Ok(Ref::map(slots, |s| &s[..len]))
    }

    /// Mutably borrow the live elements.
    pub fn as_mut_slice(&mut self) -> Result<RefMut<'_, [T]>, ContainerError> {
        let len = self.len;
        let slots = self.slots_mut()?;
        Ok(RefMut::map(slots, |s| &mut s[..len]))
    }

    /// Copy the live elements into a `Vec`.
    pub fn to_vec(&self) -> Result<Vec<T>, ContainerError> {
        Ok(self.as_slice()?.to_vec())
    }

    /// Iterate over copies of the live elements.
    ///
    /// Each step reads through the allocator, so the iterator holds no
    /// borrow of the buffer between items. A step taken while the buffer is
    /// borrowed mutably elsewhere yields [`AllocError::BufferBorrowed`];
    /// collect into `Result<Vec<T>, _>` to stop at the first error.
    pub fn iter(&self) -> impl Iterator<Item = Result<T, ContainerError>> + '_ {
        (0..self.len).map(move |i| self.get(i))
    }

    /// Borrow `len` elements starting at `start`, clamped to the live range.
    ///
    /// Pass `usize::MAX` as `len` to view through to the end.
    pub fn view(&self, start: usize, len: usize) -> Result<ArrayView<'_, T>, ContainerError> {
        let slice = self.as_slice()?;
        Ok(ArrayView {
            slice: Ref::map(slice, |s| View::of(s, start, len).as_slice()),
        })
    }

    /// The whole buffer, including slots past `len`.
    fn slots_mut(&self) -> Result<RefMut<'_, [T]>, AllocError> {
        self.allocator.slice_mut::<T>(&self.handle)
    }

    fn check_index(&self, index: usize) -> Result<(), ContainerError> {
        if index >= self.len {
            return Err(ContainerError::IndexOutOfRange {
                index,
                len: self.len,
            });
        }
        Ok(())
    }
}

/// A window into an [`Array`], holding a shared borrow of its allocator's
/// buffer until dropped.
pub struct ArrayView<'b, T> {
    slice: Ref<'b, [T]>,
}

impl<T> ArrayView<'_, T> {
    /// The window as a [`View`].
    pub fn as_view(&self) -> View<'_, T> {
        View::new(&self.slice)
    }
}

impl<T> Deref for ArrayView<'_, T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.slice
    }
}

impl<T: MemCopy> Drop for Array<'_, T> {
    fn drop(&mut self) {
        self.allocator.free(&self.handle);
    }
}

impl<T: MemCopy + fmt::Debug> fmt::Debug for Array<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_slice() {
            Ok(slice) => f.debug_list().entries(slice.iter()).finish(),
            Err(_) => f
                .debug_struct("Array")
                .field("len", &self.len)
                .field("capacity", &self.capacity)
                .finish_non_exhaustive(),
        }
    }
}
