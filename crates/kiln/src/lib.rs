//! Kiln: handle-based memory management for real-time engines.
//!
//! This is the top-level facade crate that re-exports the public API from all
//! Kiln sub-crates. For most users, adding `kiln` as a single dependency is
//! sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use kiln::prelude::*;
//!
//! // One arena backs every container below.
//! let arena = ArenaAllocator::new(kb(16));
//!
//! let mut ids = Array::<u32>::new(&arena, 4).unwrap();
//! for id in [3, 1, 4, 1, 5] {
//!     ids.push(id).unwrap();
//! }
//! assert_eq!(ids.capacity(), 8);
//!
//! let mut heap: Pool<'_, u64> = Pool::new(&arena, PoolConfig::new(2)).unwrap();
//! let h = heap.add_element(42).unwrap();
//! assert_eq!(heap.get_element(h).unwrap(), 42);
//! heap.remove_element(h).unwrap();
//! assert!(!heap.is_handle_valid(h));
//!
//! let mut bits = BitList64::new();
//! bits.set_bit(12);
//! assert_eq!(bits.find_first(true, 9), Some(12));
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `kiln-core` | Bit arithmetic, byte units, allocator ids, errors |
//! | [`arena`] | `kiln-arena` | `Allocator` trait, `ArenaAllocator`, `MemoryHandle` |
//! | [`containers`] | `kiln-containers` | `View`, `StaticArray`, `Array`, linear search |
//! | [`pool`] | `kiln-pool` | `BitList`, `DynamicBitlist`, `Pool`, `PoolHandle` |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Bit arithmetic, units, ids and error types (`kiln-core`).
pub use kiln_core as types;

/// Allocator contract and the bump arena (`kiln-arena`).
///
/// Handles are resolved only through the allocator that issued them; see
/// [`arena::Allocator::bytes`].
pub use kiln_arena as arena;

/// Views and arrays (`kiln-containers`).
pub use kiln_containers as containers;

/// Bitsets and generational pools (`kiln-pool`).
///
/// [`pool::Pool`] is the main entry point; [`pool::BindlessHandle`] is its
/// default handle layout.
pub use kiln_pool as pool;

/// Common imports for typical Kiln usage.
///
/// ```rust
/// use kiln::prelude::*;
/// ```
pub mod prelude {
    // Units and errors
    pub use kiln_core::{gb, kb, mb, AllocError, BitError, ContainerError, PoolError};

    // Allocation
    pub use kiln_arena::{
        AllocParams, Allocator, AllocatorExt, ArenaAllocator, ArenaConfig, MemCopy, MemoryHandle,
    };

    // Containers
    pub use kiln_containers::{find_linear, Array, ArrayView, StaticArray, View};

    // Bitsets and pools
    pub use kiln_pool::{
        bitlist_changed, BindlessHandle, BitList, BitList128, BitList16, BitList256, BitList32,
        BitList64, DynamicBitlist, GenerationalHandle, Pool, PoolConfig, PoolHandle,
    };
}
