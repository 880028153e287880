//! `Pod` capability for bitsets.
//!
//! The derive macros do not cover const-generic structs, so the marker
//! impls are written by hand here. This is the only `unsafe` in the crate.

#![allow(unsafe_code)]

use bytemuck::{Pod, Zeroable};

use crate::bitlist::BitList;

// SAFETY: `BitList<N, W>` is `#[repr(transparent)]` over `[u32; W]`, which
// is `Zeroable`: the all-zero pattern is the empty bitset.
unsafe impl<const N: usize, const W: usize> Zeroable for BitList<N, W> {}

// SAFETY: `[u32; W]` is `Pod` (no padding, every bit pattern valid, `Copy`,
// `'static`) and `BitList<N, W>` adds nothing to its layout. Stray bits at
// or past `N` are masked out of every read.
unsafe impl<const N: usize, const W: usize> Pod for BitList<N, W> {}
