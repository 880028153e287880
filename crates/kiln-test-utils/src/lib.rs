//! Test utilities for Kiln development.
//!
//! Provides arena builders and small `Pod` payload types that stand in for
//! the GPU-facing records the containers are meant to hold.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

pub use fixtures::{alternating_words, Texture, Transform};

use kiln_arena::{ArenaAllocator, ArenaConfig};

/// Build an initialised arena of `capacity` bytes.
pub fn arena_with(capacity: usize) -> ArenaAllocator {
    ArenaAllocator::new(capacity)
}

/// Build an arena whose allocations are all aligned to `alignment`.
///
/// Panics if the config is invalid; tests should pass a power of two.
pub fn aligned_arena(capacity: usize, alignment: usize) -> ArenaAllocator {
    match ArenaAllocator::with_config(ArenaConfig::new(capacity).with_alignment(alignment)) {
        Ok(arena) => arena,
        Err(err) => panic!("invalid test arena config: {err}"),
    }
}
