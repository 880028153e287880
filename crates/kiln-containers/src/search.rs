//! Linear search over views.

use crate::view::View;

/// Index of the first element equal to `elem`.
pub fn find_linear<T: PartialEq>(view: View<'_, T>, elem: &T) -> Option<usize> {
    find_linear_by(view, elem, |a, b| a == b)
}

/// Index of the first element for which `eq(element, elem)` holds.
pub fn find_linear_by<T, F>(view: View<'_, T>, elem: &T, mut eq: F) -> Option<usize>
where
    F: FnMut(&T, &T) -> bool,
{
    view.iter().position(|candidate| eq(candidate, elem))
}
