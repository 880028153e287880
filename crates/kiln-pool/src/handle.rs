//! Packed generational handles.
//!
//! A [`PoolHandle<I, G>`] packs a slot index (low `I` bits) and a
//! generation (the remaining `32 - I` bits) into one `u32`. The nominal
//! generation width is `G`; any pad bits left over by `I + G < 32` are
//! folded into the generation so it wraps later. The layout is checked at
//! compile time when a handle is first constructed: the generation field
//! needs at least two bits, so a reused slot never repeats the generation
//! it was freed at.
//!
//! ```compile_fail
//! use kiln_pool::PoolHandle;
//!
//! // One generation bit leaves a single usable generation.
//! let _ = PoolHandle::<31, 1>::new(0, 0);
//! ```

use std::fmt;

use kiln_core::bits::max_uint_value;

/// A handle naming one pool slot at one generation.
///
/// Implemented by [`PoolHandle`]. A [`Pool`](crate::Pool) is generic over
/// this trait so callers can pick the bit split that fits their heap.
pub trait GenerationalHandle: Copy + Eq + fmt::Debug {
    /// Largest index value; reserved for the invalid handle, so a pool
    /// addresses at most `MAX_INDEX` slots.
    const MAX_INDEX: u32;

    /// Generations count modulo this value.
    const MAX_GENERATION: u32;

    /// Build a handle, masking `index` and `generation` to their fields.
    fn from_parts(index: u32, generation: u32) -> Self;

    /// Slot index.
    fn index(&self) -> u32;

    /// Generation the slot had when the handle was issued.
    fn generation(&self) -> u32;
}

/// `I` index bits and `G` nominal generation bits packed into a `u32`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[must_use]
pub struct PoolHandle<const I: u32, const G: u32> {
    raw: u32,
}

/// Handle layout for bindless resource heaps: 24-bit index, 8-bit generation.
pub type BindlessHandle = PoolHandle<24, 8>;

impl<const I: u32, const G: u32> PoolHandle<I, G> {
    const LAYOUT: () = assert!(
        I > 0 && G > 0 && I + G <= u32::BITS && u32::BITS - I >= 2,
        "PoolHandle needs a non-zero index width and at least two generation bits within 32 bits"
    );

    /// Width of the index field.
    pub const INDEX_BITS: u32 = I;

    /// Unused bits between the nominal fields, folded into the generation.
    pub const PAD_BITS: u32 = u32::BITS - I - G;

    const INDEX_MASK: u32 = max_uint_value(I);
    const GENERATION_MASK: u32 = max_uint_value(u32::BITS - I);

    /// The handle that never resolves: index `MAX_INDEX`, generation 0.
    pub const INVALID: Self = Self {
        raw: Self::INDEX_MASK,
    };

    /// Pack `index` and `generation`, masking each to its field.
    pub const fn new(index: u32, generation: u32) -> Self {
        let () = Self::LAYOUT;
        Self {
            raw: (index & Self::INDEX_MASK) | ((generation & Self::GENERATION_MASK) << I),
        }
    }

    /// Reinterpret a packed value, e.g. one read back from a GPU buffer.
    pub const fn from_raw(raw: u32) -> Self {
        let () = Self::LAYOUT;
        Self { raw }
    }

    /// The packed value.
    pub const fn to_raw(self) -> u32 {
        self.raw
    }

    /// Whether this is not [`INVALID`](Self::INVALID).
    ///
    /// Says nothing about whether a pool still holds the slot; use
    /// [`Pool::is_handle_valid`](crate::Pool::is_handle_valid) for that.
    pub const fn is_valid(self) -> bool {
        self.raw & Self::INDEX_MASK != Self::INDEX_MASK
    }
}

impl<const I: u32, const G: u32> GenerationalHandle for PoolHandle<I, G> {
    const MAX_INDEX: u32 = Self::INDEX_MASK;
    const MAX_GENERATION: u32 = Self::GENERATION_MASK;

    fn from_parts(index: u32, generation: u32) -> Self {
        Self::new(index, generation)
    }

    fn index(&self) -> u32 {
        self.raw & Self::INDEX_MASK
    }

    fn generation(&self) -> u32 {
        self.raw >> I
    }
}

impl<const I: u32, const G: u32> Default for PoolHandle<I, G> {
    fn default() -> Self {
        Self::INVALID
    }
}

impl<const I: u32, const G: u32> fmt::Debug for PoolHandle<I, G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PoolHandle")
            .field("index", &self.index())
            .field("generation", &self.generation())
            .finish()
    }
}

impl<const I: u32, const G: u32> fmt::Display for PoolHandle<I, G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.index(), self.generation())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bindless_layout() {
        assert_eq!(BindlessHandle::INDEX_BITS, 24);
        assert_eq!(BindlessHandle::PAD_BITS, 0);
        assert_eq!(BindlessHandle::MAX_INDEX, 0x00FF_FFFF);
        assert_eq!(BindlessHandle::MAX_GENERATION, 0xFF);
    }

    #[test]
    fn pad_bits_widen_generation() {
        type Padded = PoolHandle<16, 8>;
        assert_eq!(Padded::PAD_BITS, 8);
        assert_eq!(Padded::MAX_GENERATION, 0xFFFF);
        let h = Padded::new(7, 0x1234);
        assert_eq!(h.index(), 7);
        assert_eq!(h.generation(), 0x1234);
    }

    #[test]
    fn fields_are_masked() {
        let h = BindlessHandle::new(0x0100_0005, 0x1FF);
        assert_eq!(h.index(), 5);
        assert_eq!(h.generation(), 0xFF);
        assert_eq!(h.to_raw(), 0xFF00_0005);
    }

    #[test]
    fn raw_round_trip() {
        let h = BindlessHandle::new(42, 3);
        assert_eq!(BindlessHandle::from_raw(h.to_raw()), h);
        assert_eq!(h.to_string(), "42v3");
    }

    #[test]
    fn invalid_handle() {
        assert!(!BindlessHandle::INVALID.is_valid());
        assert!(!BindlessHandle::default().is_valid());
        assert!(BindlessHandle::new(0, 0).is_valid());
        assert_eq!(BindlessHandle::INVALID.index(), BindlessHandle::MAX_INDEX);
    }
}
