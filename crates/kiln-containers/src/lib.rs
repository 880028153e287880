//! Typed containers over allocator-backed storage.
//!
//! - [`View`]: borrowed window over a contiguous run of elements.
//! - [`StaticArray`]: fixed-capacity inline array with value semantics.
//! - [`Array`]: owning, growable array whose buffer comes from one
//!   [`Allocator`](kiln_arena::Allocator) for its whole lifetime.
//!
//! Element types are bounded by [`MemCopy`]: growth and bulk assignment
//! relocate elements with byte copies and never run element-wise
//! constructors.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod array;
pub mod search;
pub mod static_array;
pub mod view;

pub use array::{Array, ArrayView};
pub use kiln_arena::MemCopy;
pub use search::{find_linear, find_linear_by};
pub use static_array::StaticArray;
pub use view::View;
