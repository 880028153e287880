//! Growable bitsets backed by an allocator.

use std::fmt;

use kiln_arena::Allocator;
use kiln_containers::Array;
use kiln_core::ContainerError;

use crate::bitlist::BitList;

/// A bitset made of [`BitList<N, W>`] chunks stored in an [`Array`].
///
/// Capacity is always a whole number of `N`-bit chunks. It grows by appending
/// zeroed chunks and never shrinks. Bit accessors take the same
/// preconditions as [`BitList`] (an out-of-range index panics) and return
/// `Err` only when the backing allocator fails.
pub struct DynamicBitlist<'a, const N: usize = 64, const W: usize = 2> {
    chunks: Array<'a, BitList<N, W>>,
}

impl<'a, const N: usize, const W: usize> DynamicBitlist<'a, N, W> {
    /// Bits per chunk.
    pub const CHUNK_BITS: usize = N;

    /// Create a bitset with room for at least `capacity` bits, all clear.
    pub fn new(allocator: &'a dyn Allocator, capacity: usize) -> Result<Self, ContainerError> {
        let () = BitList::<N, W>::LAYOUT;
        let chunks = Array::zeroed(allocator, capacity.div_ceil(Self::CHUNK_BITS))?;
        Ok(Self { chunks })
    }

    /// Number of addressable bits.
    pub fn capacity(&self) -> usize {
        self.chunks.len() * Self::CHUNK_BITS
    }

    /// Number of chunks.
    pub fn num_chunks(&self) -> usize {
        self.chunks.len()
    }

    /// Grow to at least `new_capacity` bits. No-op if already large enough.
    pub fn resize(&mut self, new_capacity: usize) -> Result<(), ContainerError> {
        let needed = new_capacity.div_ceil(Self::CHUNK_BITS);
        if needed > self.chunks.len() {
            self.chunks.resize_len(needed, BitList::new())?;
        }
        Ok(())
    }

    #[track_caller]
    fn locate(&self, index: usize) -> (usize, usize) {
        assert!(
            index < self.capacity(),
            "bit index {index} out of range for DynamicBitlist of {} bits",
            self.capacity()
        );
        (index / Self::CHUNK_BITS, index % Self::CHUNK_BITS)
    }

    /// Set bit `index`.
    ///
    /// # Panics
    ///
    /// If `index >= capacity()`.
    #[track_caller]
    pub fn set_bit(&mut self, index: usize) -> Result<(), ContainerError> {
        let (chunk, bit) = self.locate(index);
        let mut bits = self.chunks.get(chunk)?;
        bits.set_bit(bit);
        self.chunks.set(chunk, bits)
    }

    /// Clear bit `index`.
    ///
    /// # Panics
    ///
    /// If `index >= capacity()`.
    #[track_caller]
    pub fn unset_bit(&mut self, index: usize) -> Result<(), ContainerError> {
        let (chunk, bit) = self.locate(index);
        let mut bits = self.chunks.get(chunk)?;
        bits.unset_bit(bit);
        self.chunks.set(chunk, bits)
    }

    /// Read bit `index`.
    ///
    /// # Panics
    ///
    /// If `index >= capacity()`.
    #[track_caller]
    pub fn get(&self, index: usize) -> Result<bool, ContainerError> {
        let (chunk, bit) = self.locate(index);
        Ok(self.chunks.get(chunk)?.get(bit))
    }

    /// Index of the first bit equal to `flag` at or after `start`.
    ///
    /// Same semantics as [`BitList::find_first`], across all chunks.
    pub fn find_first(&self, flag: bool, start: usize) -> Result<Option<usize>, ContainerError> {
        let chunks = self.chunks.as_slice()?;
        let first = start / Self::CHUNK_BITS;
        for (i, chunk) in chunks.iter().enumerate().skip(first) {
            let from = if i == first { start % Self::CHUNK_BITS } else { 0 };
            if let Some(bit) = chunk.find_first(flag, from) {
                return Ok(Some(i * Self::CHUNK_BITS + bit));
            }
        }
        Ok(None)
    }

    /// Number of set bits.
    pub fn count_ones(&self) -> Result<usize, ContainerError> {
        Ok(self.chunks.as_slice()?.iter().map(BitList::count_ones).sum())
    }

    /// Clear every bit, keeping the capacity.
    pub fn clear(&mut self) -> Result<(), ContainerError> {
        self.chunks.as_mut_slice()?.fill(BitList::new());
        Ok(())
    }
}

impl<const N: usize, const W: usize> fmt::Debug for DynamicBitlist<'_, N, W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynamicBitlist")
            .field("capacity", &self.capacity())
            .field("chunks", &self.chunks)
            .finish()
    }
}
