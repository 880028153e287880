//! Pool configuration parameters.

use kiln_core::PoolError;

use crate::handle::GenerationalHandle;

/// Configuration for a [`Pool`](crate::Pool).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PoolConfig {
    /// Slots allocated up front. The pool doubles this when it runs out.
    ///
    /// Zero is allowed; the first insertion then grows to one slot.
    pub initial_slots: usize,
}

impl PoolConfig {
    /// Default initial slot count.
    pub const DEFAULT_INITIAL_SLOTS: usize = 64;

    /// Create a config with `initial_slots` slots.
    pub fn new(initial_slots: usize) -> Self {
        Self { initial_slots }
    }

    /// Check that handle type `H` can address every initial slot.
    pub fn validate<H: GenerationalHandle>(&self) -> Result<(), PoolError> {
        let max_slots = H::MAX_INDEX as usize;
        if self.initial_slots > max_slots {
            return Err(PoolError::PoolFull { max_slots });
        }
        Ok(())
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_INITIAL_SLOTS)
    }
}
