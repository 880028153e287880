//! Bit arithmetic and alignment helpers.
//!
//! Pure, stateless functions. Everything that divides by a power of two is
//! done with masks and shifts; callers guarantee the power-of-two
//! precondition (checked with `debug_assert!` in the hot helpers, and by the
//! `checked_*` variants at API boundaries).

/// Default allocation alignment: two pointer widths (16 bytes on 64-bit).
pub const DEFAULT_ALIGNMENT: usize = 2 * std::mem::size_of::<usize>();

/// Returns `true` if `value` is a non-zero power of two.
#[inline]
pub const fn is_power_of_two(value: usize) -> bool {
    value != 0 && (value & (value - 1)) == 0
}

/// Smallest power of two `>= value`. `round_up_pow2(0) == 1`.
///
/// # Panics
///
/// Panics (in debug) if the result does not fit in `usize`.
#[inline]
pub const fn round_up_pow2(value: usize) -> usize {
    value.next_power_of_two()
}

/// Align `ptr` forward to the next multiple of `align`.
///
/// Returns `ptr` unchanged when it is already aligned. `align` must be a
/// power of two, so `ptr % align` is computed as `ptr & (align - 1)`.
#[inline]
pub const fn align_forward(ptr: usize, align: usize) -> usize {
    debug_assert!(is_power_of_two(align));
    let modulo = ptr & (align - 1);
    if modulo != 0 {
        ptr + (align - modulo)
    } else {
        ptr
    }
}

/// Checked form of [`align_forward`].
///
/// Returns `None` if `align` is not a power of two or the aligned value
/// overflows `usize`.
#[inline]
pub const fn checked_align_forward(ptr: usize, align: usize) -> Option<usize> {
    if !is_power_of_two(align) {
        return None;
    }
    let modulo = ptr & (align - 1);
    if modulo == 0 {
        return Some(ptr);
    }
    ptr.checked_add(align - modulo)
}

/// Position of the lowest set bit, or `None` for zero.
#[inline]
pub const fn find_lsb(value: u32) -> Option<u32> {
    if value == 0 {
        None
    } else {
        Some(value.trailing_zeros())
    }
}

/// Largest unsigned value representable in `bits` bits (`bits <= 32`).
#[inline]
pub const fn max_uint_value(bits: u32) -> u32 {
    debug_assert!(bits <= 32);
    if bits >= 32 {
        u32::MAX
    } else {
        (1u32 << bits) - 1
    }
}
