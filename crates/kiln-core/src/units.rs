//! Byte-size helpers for sizing allocators.

/// `n` kibibytes in bytes.
#[inline]
pub const fn kb(n: usize) -> usize {
    n * 1024
}

/// `n` mebibytes in bytes.
#[inline]
pub const fn mb(n: usize) -> usize {
    n * 1024 * 1024
}

/// `n` gibibytes in bytes.
#[inline]
pub const fn gb(n: usize) -> usize {
    n * 1024 * 1024 * 1024
}
