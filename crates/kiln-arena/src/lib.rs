//! Handle-based allocation for the Kiln memory core.
//!
//! Allocators hand out opaque [`MemoryHandle`]s rather than raw pointers.
//! A handle names the allocator that produced it plus a byte range inside
//! that allocator's backing buffer; it is resolved back to bytes only
//! through the owning allocator, which checks identity on every lookup.
//!
//! # Architecture
//!
//! ```text
//! Allocator (trait, object-safe)
//! ├── AllocatorExt (typed helpers, blanket impl over every Allocator)
//! └── ArenaAllocator (linear bump allocator over one fixed buffer)
//!     ├── Cell<usize> cursor      ← advanced by allocate, reset by free_all
//!     └── RefCell<Box<[u128]>>    ← 16-byte aligned backing storage
//! ```
//!
//! Allocators use interior mutability so that several containers can share
//! one `&dyn Allocator`. They are single-threaded (`!Sync`).

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod allocator;
pub mod arena;
pub mod config;
pub mod handle;
pub mod typed;

// Public re-exports for the primary API surface.
pub use allocator::{AllocParams, Allocator};
pub use arena::{copy_from, move_from, ArenaAllocator};
pub use config::ArenaConfig;
pub use handle::MemoryHandle;
pub use typed::{element_stride, AllocatorExt, MemCopy};
