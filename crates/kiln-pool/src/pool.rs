//! Generational slot pools.
//!
//! A [`Pool`] stores values of `T` in slots and hands out packed handles
//! `{index, generation}`. Removing a value bumps the slot's generation, so
//! every handle issued before the removal stops validating, even after
//! the slot is reused. Generations wrap modulo `H::MAX_GENERATION`; a
//! handle kept across a full wrap of the same slot validates again.

use std::marker::PhantomData;

use kiln_arena::{Allocator, MemCopy};
use kiln_containers::Array;
use kiln_core::PoolError;

use crate::config::PoolConfig;
use crate::dynamic_bitlist::DynamicBitlist;
use crate::handle::{BindlessHandle, GenerationalHandle};

/// A slot pool of `T` addressed by generational handles `H`.
///
/// Occupancy, generations and storage always hold the same slot count.
/// Slots are reused lowest-index first.
///
/// # Example
///
/// ```
/// use kiln_arena::ArenaAllocator;
/// use kiln_pool::{Pool, PoolConfig};
///
/// let arena = ArenaAllocator::new(4096);
/// let mut pool: Pool<'_, u64> = Pool::new(&arena, PoolConfig::new(2)).unwrap();
/// let h = pool.add_element(7).unwrap();
/// assert_eq!(pool.get_element(h).unwrap(), 7);
/// assert_eq!(pool.remove_element(h).unwrap(), 7);
/// assert!(!pool.is_handle_valid(h));
/// ```
pub struct Pool<'a, T: MemCopy, H: GenerationalHandle = BindlessHandle> {
    occupancy: DynamicBitlist<'a>,
    generations: Array<'a, u32>,
    storage: Array<'a, T>,
    slots: usize,
    live: usize,
    dirty: bool,
    _handle: PhantomData<H>,
}

impl<'a, T: MemCopy, H: GenerationalHandle> Pool<'a, T, H> {
    /// Create a pool whose three slot arrays come from `allocator`.
    pub fn new(allocator: &'a dyn Allocator, config: PoolConfig) -> Result<Self, PoolError> {
        config.validate::<H>()?;
        let slots = config.initial_slots;
        Ok(Self {
            occupancy: DynamicBitlist::new(allocator, slots)?,
            generations: Array::zeroed(allocator, slots)?,
            storage: Array::zeroed(allocator, slots)?,
            slots,
            live: 0,
            dirty: false,
            _handle: PhantomData,
        })
    }

    /// Number of live elements.
    pub fn len(&self) -> usize {
        self.live
    }

    /// Whether the pool holds no live elements.
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Number of allocated slots, live or free.
    pub fn slot_count(&self) -> usize {
        self.slots
    }

    /// Whether the pool changed since the last [`clear_dirty`](Pool::clear_dirty).
    ///
    /// Set by every add, remove and update. Consumers mirroring the pool
    /// elsewhere (e.g. a GPU descriptor heap) poll this to decide when to
    /// re-upload.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Mark the pool as synchronised.
    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    /// Store `elem` in the lowest free slot and return its handle.
    ///
    /// Doubles the slot count when every slot is live.
    pub fn add_element(&mut self, elem: T) -> Result<H, PoolError> {
        let index = match self.occupancy.find_first(false, 0)? {
            Some(index) if index < self.slots => index,
            _ => {
                let index = self.slots;
                self.grow()?;
                index
            }
        };

        self.occupancy.set_bit(index)?;
        self.storage.set(index, elem)?;
        let generation = self.generations.get(index)?;
        self.live += 1;
        self.dirty = true;
        Ok(H::from_parts(slot_index(index), generation))
    }

    /// Remove the element named by `handle` and return it.
    ///
    /// The slot's generation advances, invalidating `handle` and every copy
    /// of it.
    pub fn remove_element(&mut self, handle: H) -> Result<T, PoolError> {
        let index = self.validate(handle)?;
        let value = self.storage.get(index)?;
        self.occupancy.unset_bit(index)?;
        let next = (handle.generation() + 1) % H::MAX_GENERATION;
        self.generations.set(index, next)?;
        self.live -= 1;
        self.dirty = true;
        Ok(value)
    }

    /// Whether `handle` names a live slot at its current generation.
    pub fn is_handle_valid(&self, handle: H) -> bool {
        self.validate(handle).is_ok()
    }

    /// Copy of the element named by `handle`.
    pub fn get_element(&self, handle: H) -> Result<T, PoolError> {
        let index = self.validate(handle)?;
        Ok(self.storage.get(index)?)
    }

    /// Replace the element named by `handle`, returning the old value.
    ///
    /// The handle stays valid.
    pub fn update_element(&mut self, handle: H, new_elem: T) -> Result<T, PoolError> {
        let index = self.validate(handle)?;
        let old = self.storage.get(index)?;
        self.storage.set(index, new_elem)?;
        self.dirty = true;
        Ok(old)
    }

    /// Handles of every live element, in slot order.
    ///
    /// If the allocator's buffer is borrowed mutably elsewhere, the
    /// iterator yields that error once and then ends.
    pub fn handles(&self) -> impl Iterator<Item = Result<H, PoolError>> + '_ {
        let mut next = 0;
        let mut failed = false;
        std::iter::from_fn(move || {
            if failed {
                return None;
            }
            match self.next_live(next) {
                Ok(Some((index, handle))) => {
                    next = index + 1;
                    Some(Ok(handle))
                }
                Ok(None) => None,
                Err(err) => {
                    failed = true;
                    Some(Err(err))
                }
            }
        })
    }

    /// First live slot at or after `start`, with its current handle.
    fn next_live(&self, start: usize) -> Result<Option<(usize, H)>, PoolError> {
        let Some(index) = self.occupancy.find_first(true, start)? else {
            return Ok(None);
        };
        if index >= self.slots {
            return Ok(None);
        }
        let generation = self.generations.get(index)?;
        Ok(Some((index, H::from_parts(slot_index(index), generation))))
    }

    /// Check range, then generation, then occupancy.
    fn validate(&self, handle: H) -> Result<usize, PoolError> {
        let index = handle.index();
        let slot = index as usize;
        if slot >= self.slots {
            return Err(PoolError::IndexOutOfRange {
                index,
                slots: self.slots,
            });
        }
        let slot_generation = self.generations.get(slot)?;
        if slot_generation != handle.generation() {
            return Err(PoolError::StaleHandle {
                index,
                handle_generation: handle.generation(),
                slot_generation,
            });
        }
        if !self.occupancy.get(slot)? {
            return Err(PoolError::Vacant { index });
        }
        Ok(slot)
    }

    /// Double the slot count, capped at `H::MAX_INDEX`.
    fn grow(&mut self) -> Result<(), PoolError> {
        let max_slots = H::MAX_INDEX as usize;
        let new_slots = (self.slots * 2).clamp(1, max_slots);
        if new_slots <= self.slots {
            tracing::trace!(slots = self.slots, max_slots, "pool full");
            return Err(PoolError::PoolFull { max_slots });
        }

        // Lengths change only once every reservation has succeeded.
        self.occupancy.resize(new_slots)?;
        self.generations.reserve(new_slots)?;
        self.storage.reserve(new_slots)?;
        self.generations.resize_len(new_slots, 0)?;
        self.storage
            .resize_len(new_slots, <T as bytemuck::Zeroable>::zeroed())?;
        tracing::debug!(from = self.slots, to = new_slots, live = self.live, "pool grown");
        self.slots = new_slots;
        Ok(())
    }
}

/// Slot indices are bounded by `H::MAX_INDEX`, which is a `u32`.
fn slot_index(index: usize) -> u32 {
    u32::try_from(index).unwrap_or(u32::MAX)
}
