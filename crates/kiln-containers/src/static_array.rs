//! Fixed-capacity inline arrays.

use std::ops::{Index, IndexMut};

use kiln_arena::MemCopy;
use kiln_core::ContainerError;

use crate::view::View;

/// Exactly `N` inline elements with value semantics.
///
/// Needs no allocator. Indexing panics on an out-of-range index;
/// [`try_get`](StaticArray::try_get) reports it instead.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StaticArray<T: MemCopy, const N: usize> {
    data: [T; N],
}

impl<T: MemCopy, const N: usize> StaticArray<T, N> {
    /// An array of `N` zeroed (default) elements.
    pub fn new() -> Self {
        Self {
            data: [<T as bytemuck::Zeroable>::zeroed(); N],
        }
    }

    /// An array with every element set to `value`.
    pub fn filled(value: T) -> Self {
        Self { data: [value; N] }
    }

    /// Copy up to `N` leading elements of `elems`; the rest stay zeroed.
    pub fn from_slice(elems: &[T]) -> Self {
        let mut array = Self::new();
        array.assign_view(View::new(elems));
        array
    }

    /// Always `N`.
    pub const fn len(&self) -> usize {
        N
    }

    /// Whether `N == 0`.
    pub const fn is_empty(&self) -> bool {
        N == 0
    }

    /// Whether `index` addresses an element.
    pub const fn is_valid_index(&self, index: usize) -> bool {
        index < N
    }

    /// Element at `index`, or `IndexOutOfRange`.
    pub fn try_get(&self, index: usize) -> Result<&T, ContainerError> {
        self.data
            .get(index)
            .ok_or(ContainerError::IndexOutOfRange { index, len: N })
    }

    /// Mutable element at `index`, or `IndexOutOfRange`.
    pub fn try_get_mut(&mut self, index: usize) -> Result<&mut T, ContainerError> {
        self.data
            .get_mut(index)
            .ok_or(ContainerError::IndexOutOfRange { index, len: N })
    }

    /// Copy `min(N, M)` leading elements from `other`.
    pub fn assign<const M: usize>(&mut self, other: &StaticArray<T, M>) {
        let count = N.min(M);
        self.data[..count].copy_from_slice(&other.data[..count]);
    }

    /// Copy `min(N, view.len())` leading elements from `view`.
    pub fn assign_view(&mut self, view: View<'_, T>) {
        let count = N.min(view.len());
        self.data[..count].copy_from_slice(&view.as_slice()[..count]);
    }

    /// View `len` elements starting at `start`, clamped to the array.
    pub fn view(&self, start: usize, len: usize) -> View<'_, T> {
        View::of(&self.data, start, len)
    }

    /// The elements as a slice.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// The elements as a mutable slice.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Iterate over the elements.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.data.iter()
    }
}

impl<T: MemCopy, const N: usize> Default for StaticArray<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: MemCopy, const N: usize> Index<usize> for StaticArray<T, N> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        assert!(self.is_valid_index(index), "index {index} out of range for StaticArray of {N}");
        &self.data[index]
    }
}

impl<T: MemCopy, const N: usize> IndexMut<usize> for StaticArray<T, N> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        assert!(self.is_valid_index(index), "index {index} out of range for StaticArray of {N}");
        &mut self.data[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_is_zeroed() {
        let a: StaticArray<u32, 4> = StaticArray::new();
        assert_eq!(a.as_slice(), &[0, 0, 0, 0]);
        assert_eq!(a.len(), 4);
    }

    #[test]
    fn filled_sets_every_element() {
        let a: StaticArray<u8, 3> = StaticArray::filled(9);
        assert!(a.iter().all(|&x| x == 9));
    }

    #[test]
    fn from_slice_truncates_long_input() {
        let a: StaticArray<u16, 2> = StaticArray::from_slice(&[1, 2, 3]);
        assert_eq!(a.as_slice(), &[1, 2]);
        let b: StaticArray<u16, 4> = StaticArray::from_slice(&[1, 2]);
        assert_eq!(b.as_slice(), &[1, 2, 0, 0]);
    }

    #[test]
    fn assign_from_smaller_and_larger() {
        let mut a: StaticArray<u32, 4> = StaticArray::filled(7);
        let small: StaticArray<u32, 2> = StaticArray::filled(1);
        a.assign(&small);
        assert_eq!(a.as_slice(), &[1, 1, 7, 7]);

        let large: StaticArray<u32, 6> = StaticArray::filled(3);
        a.assign(&large);
        assert_eq!(a.as_slice(), &[3, 3, 3, 3]);
    }

    #[test]
    fn assign_view_copies_min() {
        let mut a: StaticArray<i32, 3> = StaticArray::new();
        let src = [4, 5];
        a.assign_view(View::new(&src));
        assert_eq!(a.as_slice(), &[4, 5, 0]);
    }

    #[test]
    fn try_get_reports_out_of_range() {
        let a: StaticArray<u8, 2> = StaticArray::new();
        assert_eq!(
            a.try_get(2),
            Err(ContainerError::IndexOutOfRange { index: 2, len: 2 })
        );
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn index_out_of_range_panics() {
        let a: StaticArray<u8, 2> = StaticArray::new();
        let _ = a[2];
    }

    #[test]
    fn view_is_clamped() {
        let mut a: StaticArray<u8, 4> = StaticArray::new();
        a[3] = 1;
        let v = a.view(2, 100);
        assert_eq!(v.as_slice(), &[0, 1]);
    }
}
