//! Non-owning views.

use std::ops::Index;

/// A borrowed window over a contiguous run of `T`.
///
/// Never allocates or frees, and cannot outlive the storage it borrows.
#[derive(Debug, PartialEq, Eq)]
pub struct View<'a, T> {
    data: &'a [T],
}

// Manual impls: a view is copyable regardless of `T`.
impl<T> Clone for View<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for View<'_, T> {}

impl<'a, T> View<'a, T> {
    /// View the whole slice.
    pub fn new(data: &'a [T]) -> Self {
        Self { data }
    }

    /// View up to `len` elements of `data` starting at `start`.
    ///
    /// Over-long requests are clamped to the elements available; a `start`
    /// past the end yields an empty view.
    pub fn of(data: &'a [T], start: usize, len: usize) -> Self {
        let start = start.min(data.len());
        let len = len.min(data.len() - start);
        Self {
            data: &data[start..start + len],
        }
    }

    /// Number of elements in the view.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the view is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Element at `index`, if in range.
    pub fn get(&self, index: usize) -> Option<&'a T> {
        self.data.get(index)
    }

    /// The viewed elements as a slice.
    pub fn as_slice(&self) -> &'a [T] {
        self.data
    }

    /// Iterate over the viewed elements.
    pub fn iter(&self) -> std::slice::Iter<'a, T> {
        self.data.iter()
    }
}

impl<T> Index<usize> for View<'_, T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        assert!(
            index < self.data.len(),
            "view index {index} out of range for length {}",
            self.data.len()
        );
        &self.data[index]
    }
}

impl<'a, T> From<&'a [T]> for View<'a, T> {
    fn from(data: &'a [T]) -> Self {
        Self::new(data)
    }
}

impl<'a, T> IntoIterator for View<'a, T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_view() {
        let data = [1, 2, 3];
        let v = View::new(&data);
        assert_eq!(v.len(), 3);
        assert_eq!(v[2], 3);
    }

    #[test]
    fn over_request_is_clamped() {
        let data = [1, 2, 3, 4, 5];
        let v = View::of(&data, 3, 10);
        assert_eq!(v.as_slice(), &[4, 5]);
    }

    #[test]
    fn start_past_end_is_empty() {
        let data = [1, 2, 3];
        let v = View::of(&data, 7, 2);
        assert!(v.is_empty());
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn index_past_end_panics() {
        let data = [1, 2, 3];
        let v = View::of(&data, 0, 2);
        let _ = v[2];
    }

    #[test]
    fn iterates_in_order() {
        let data = [5u8, 6, 7];
        let collected: Vec<u8> = View::new(&data).into_iter().copied().collect();
        assert_eq!(collected, vec![5, 6, 7]);
    }
}
