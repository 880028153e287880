//! Fixed-width bitsets.
//!
//! A [`BitList<N, W>`] stores `N` bits inline in `W` little-endian-ordered
//! `u32` words, where `W` is [`words_for(N)`](words_for): bit `i` lives in
//! word `i / 32` at position `i % 32`. Bits at or past `N` in the last word
//! are always clear and never addressable. Searches scan a word at a time
//! and use count-trailing-zeros, never a bit-by-bit loop; pool allocation
//! sits on top of this path.

use std::fmt;
use std::ops::Index;

use kiln_core::bits::find_lsb;
use kiln_core::BitError;

const WORD_BITS: usize = u32::BITS as usize;

/// Words folded into one `u128` lane by [`bitlist_changed`].
const CHUNK_WORDS: usize = 4;

/// Number of `u32` words backing an `bits`-bit [`BitList`].
///
/// Stable const generics cannot derive the word count from the bit count,
/// so a custom width is spelled `BitList<100, { words_for(100) }>`.
pub const fn words_for(bits: usize) -> usize {
    bits.div_ceil(WORD_BITS)
}

/// A bitset of `N` bits backed by `W` words.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct BitList<const N: usize, const W: usize> {
    words: [u32; W],
}

/// 16-bit bitset.
pub type BitList16 = BitList<16, 1>;
/// 32-bit bitset.
pub type BitList32 = BitList<32, 1>;
/// 64-bit bitset.
pub type BitList64 = BitList<64, 2>;
/// 128-bit bitset.
pub type BitList128 = BitList<128, 4>;
/// 256-bit bitset.
pub type BitList256 = BitList<256, 8>;

impl<const N: usize, const W: usize> BitList<N, W> {
    pub(crate) const LAYOUT: () = assert!(
        N > 0 && W == words_for(N),
        "BitList<N, W> needs N > 0 and W == words_for(N)"
    );

    /// Number of bits.
    pub const CAPACITY: usize = N;

    /// Valid bits of the last word.
    const TAIL_MASK: u32 = match N % WORD_BITS {
        0 => u32::MAX,
        r => (1u32 << r) - 1,
    };

    /// An empty bitset.
    pub const fn new() -> Self {
        let () = Self::LAYOUT;
        Self { words: [0; W] }
    }

    /// A bitset over the given backing words. Bits at or past `N` are
    /// cleared.
    pub const fn from_words(mut words: [u32; W]) -> Self {
        let () = Self::LAYOUT;
        words[W - 1] &= Self::TAIL_MASK;
        Self { words }
    }

    /// The backing words.
    pub const fn words(&self) -> &[u32; W] {
        &self.words
    }

    /// Number of bits, always [`CAPACITY`](Self::CAPACITY).
    pub const fn capacity(&self) -> usize {
        Self::CAPACITY
    }

    #[inline]
    fn locate(index: usize) -> (usize, u32) {
        (index / WORD_BITS, 1u32 << (index % WORD_BITS))
    }

    #[inline]
    fn check(index: usize) -> Result<(), BitError> {
        if index >= N {
            return Err(BitError::IndexOutOfRange { index, capacity: N });
        }
        Ok(())
    }

    #[track_caller]
    fn assert_in_range(index: usize) {
        assert!(
            index < N,
            "bit index {index} out of range for BitList of {N} bits"
        );
    }

    /// Set bit `index`.
    ///
    /// # Panics
    ///
    /// If `index >= N`.
    #[track_caller]
    pub fn set_bit(&mut self, index: usize) {
        Self::assert_in_range(index);
        let (word, mask) = Self::locate(index);
        self.words[word] |= mask;
    }

    /// Clear bit `index`.
    ///
    /// # Panics
    ///
    /// If `index >= N`.
    #[track_caller]
    pub fn unset_bit(&mut self, index: usize) {
        Self::assert_in_range(index);
        let (word, mask) = Self::locate(index);
        self.words[word] &= !mask;
    }

    /// Read bit `index`.
    ///
    /// # Panics
    ///
    /// If `index >= N`.
    #[track_caller]
    pub fn get(&self, index: usize) -> bool {
        Self::assert_in_range(index);
        let (word, mask) = Self::locate(index);
        self.words[word] & mask != 0
    }

    /// Set bit `index`, or report it out of range.
    pub fn try_set_bit(&mut self, index: usize) -> Result<(), BitError> {
        Self::check(index)?;
        self.set_bit(index);
        Ok(())
    }

    /// Clear bit `index`, or report it out of range.
    pub fn try_unset_bit(&mut self, index: usize) -> Result<(), BitError> {
        Self::check(index)?;
        self.unset_bit(index);
        Ok(())
    }

    /// Read bit `index`, or report it out of range.
    pub fn try_get(&self, index: usize) -> Result<bool, BitError> {
        Self::check(index)?;
        Ok(self.get(index))
    }

    /// Index of the first bit equal to `flag` at or after `start`.
    ///
    /// `start` itself is included; pass `start + 1` to skip it. Returns
    /// `None` when no such bit exists below `N`, including when `start` is
    /// past the end.
    pub fn find_first(&self, flag: bool, start: usize) -> Option<usize> {
        if start >= N {
            return None;
        }
        let first = start / WORD_BITS;
        let mut mask = u32::MAX << (start % WORD_BITS);
        for (i, &word) in self.words.iter().enumerate().skip(first) {
            let candidates = (if flag { word } else { !word }) & mask;
            if let Some(bit) = find_lsb(candidates) {
                let index = i * WORD_BITS + bit as usize;
                return (index < N).then_some(index);
            }
            mask = u32::MAX;
        }
        None
    }

    /// Words with any bits at or past `N` masked off.
    fn live_words(&self) -> impl Iterator<Item = u32> + '_ {
        self.words
            .iter()
            .enumerate()
            .map(|(i, &w)| if i == W - 1 { w & Self::TAIL_MASK } else { w })
    }

    /// Number of set bits.
    pub fn count_ones(&self) -> usize {
        self.live_words().map(|w| w.count_ones() as usize).sum()
    }

    /// Whether no bit is set.
    pub fn is_empty(&self) -> bool {
        self.live_words().all(|w| w == 0)
    }

    /// Clear every bit.
    pub fn clear(&mut self) {
        self.words = [0; W];
    }

    /// Iterate over the indices of set bits in ascending order.
    pub fn iter_ones(&self) -> Ones<'_> {
        Ones::new(&self.words, N)
    }
}

impl<const N: usize, const W: usize> Default for BitList<N, W> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize, const W: usize> Index<usize> for BitList<N, W> {
    type Output = bool;

    #[track_caller]
    fn index(&self, index: usize) -> &bool {
        if self.get(index) {
            &true
        } else {
            &false
        }
    }
}

impl<const N: usize, const W: usize> fmt::Debug for BitList<N, W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BitList<{N}>")?;
        f.debug_set().entries(self.iter_ones()).finish()
    }
}

/// Iterator over set-bit indices of a word slice, in ascending order.
pub struct Ones<'a> {
    words: &'a [u32],
    limit: usize,
    word_idx: usize,
    current: u32,
}

impl<'a> Ones<'a> {
    pub(crate) fn new(words: &'a [u32], limit: usize) -> Self {
        Self {
            words,
            limit,
            word_idx: 0,
            current: words.first().copied().unwrap_or(0),
        }
    }
}

impl Iterator for Ones<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        loop {
            if let Some(bit) = find_lsb(self.current) {
                // Clear the lowest set bit.
                self.current &= self.current - 1;
                let index = self.word_idx * WORD_BITS + bit as usize;
                return (index < self.limit).then_some(index);
            }
            self.word_idx += 1;
            self.current = *self.words.get(self.word_idx)?;
        }
    }
}

/// Bits that differ between `a` and `b` (`a XOR b`).
///
/// Words are combined four at a time as one `u128`. A trailing group of
/// fewer than four words is zero-padded before the XOR, so nothing past
/// the last word reaches the result.
pub fn bitlist_changed<const N: usize, const W: usize>(
    a: &BitList<N, W>,
    b: &BitList<N, W>,
) -> BitList<N, W> {
    let mut out = BitList::<N, W>::new();
    let lanes = a
        .words
        .chunks(CHUNK_WORDS)
        .zip(b.words.chunks(CHUNK_WORDS))
        .zip(out.words.chunks_mut(CHUNK_WORDS));
    for ((lhs, rhs), dst) in lanes {
        store_lane(load_lane(lhs) ^ load_lane(rhs), dst);
    }
    out
}

fn load_lane(words: &[u32]) -> u128 {
    let mut padded = [0u32; CHUNK_WORDS];
    padded[..words.len()].copy_from_slice(words);
    padded
        .iter()
        .enumerate()
        .fold(0u128, |lane, (i, &w)| lane | (u128::from(w) << (i * WORD_BITS)))
}

fn store_lane(lane: u128, dst: &mut [u32]) {
    for (i, w) in dst.iter_mut().enumerate() {
        *w = (lane >> (i * WORD_BITS)) as u32;
    }
}
