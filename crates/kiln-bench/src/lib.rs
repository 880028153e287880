//! Benchmark workloads for the Kiln memory core.
//!
//! - [`sparse_bitlist`]: bitset with every `stride`-th bit set.
//! - [`packed_bitlist`]: bitset with all bits set except one, the
//!   worst case for a free-slot search.
//! - [`churn_schedule`]: deterministic add/remove pattern for pool churn.

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use kiln_pool::BitList;

/// A bitset with bits `0, stride, 2 * stride, ...` set.
pub fn sparse_bitlist<const N: usize, const W: usize>(stride: usize) -> BitList<N, W> {
    let mut bits = BitList::new();
    for i in (0..N).step_by(stride.max(1)) {
        bits.set_bit(i);
    }
    bits
}

/// A bitset with every bit set except `hole`.
pub fn packed_bitlist<const N: usize, const W: usize>(hole: usize) -> BitList<N, W> {
    let mut bits = BitList::from_words([u32::MAX; W]);
    if hole < N {
        bits.unset_bit(hole);
    }
    bits
}

/// `len` steps of pool churn: `true` adds an element, `false` removes the
/// oldest. Every fourth step is a removal, so the pool keeps growing
/// slowly while recycling slots.
pub fn churn_schedule(len: usize) -> Vec<bool> {
    (0..len).map(|i| i % 4 != 3).collect()
}
