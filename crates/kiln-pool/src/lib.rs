//! Bitsets and generational pools for the Kiln memory core.
//!
//! - [`BitList`]: `N`-bit bitset over `u32` words with word-at-a-time
//!   [`find_first`](BitList::find_first).
//! - [`DynamicBitlist`]: growable bitset made of allocator-backed
//!   [`BitList`] chunks.
//! - [`Pool`]: slot pool addressed by packed generational handles
//!   ([`PoolHandle`]). A handle stays invalid once its slot is recycled.
//!
//! # Slot layout
//!
//! ```text
//! Pool<T, H>
//! ├── occupancy:   DynamicBitlist   ← bit i set iff slot i is live
//! ├── generations: Array<u32>       ← bumped on every removal
//! └── storage:     Array<T>         ← slot payloads
//! ```
//!
//! All three are resized together and always hold the same slot count.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

pub mod bitlist;
pub mod config;
pub mod dynamic_bitlist;
pub mod handle;
pub mod pool;
mod raw;

pub use bitlist::{
    bitlist_changed, words_for, BitList, BitList128, BitList16, BitList256, BitList32, BitList64,
    Ones,
};
pub use config::PoolConfig;
pub use dynamic_bitlist::DynamicBitlist;
pub use handle::{BindlessHandle, GenerationalHandle, PoolHandle};
pub use pool::Pool;
