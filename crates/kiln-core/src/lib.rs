//! Core types for the Kiln memory-management crates.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! bit arithmetic every allocator and bitset relies on, byte-size units,
//! allocator identity, and the error types shared across the workspace.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod bits;
pub mod error;
pub mod id;
pub mod units;

pub use error::{AllocError, BitError, ContainerError, PoolError};
pub use id::AllocatorId;
pub use units::{gb, kb, mb};
