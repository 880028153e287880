//! Arena configuration parameters.

use kiln_core::bits::{is_power_of_two, DEFAULT_ALIGNMENT};
use kiln_core::AllocError;

/// Configuration for an [`ArenaAllocator`](crate::ArenaAllocator).
///
/// Validated at construction; immutable afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArenaConfig {
    /// Size of the backing buffer in bytes.
    ///
    /// Zero defers buffer creation until [`Allocator::init`](crate::Allocator::init).
    pub capacity: usize,

    /// Minimum alignment applied to every allocation.
    ///
    /// Default: two pointer widths. Must be a power of two. Requests with a
    /// larger alignment are honoured; smaller ones are raised to this value.
    pub alignment: usize,
}

impl ArenaConfig {
    /// Default minimum alignment (16 bytes on 64-bit targets).
    pub const DEFAULT_ALIGNMENT: usize = DEFAULT_ALIGNMENT;

    /// Create a config for an arena of `capacity` bytes.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            alignment: Self::DEFAULT_ALIGNMENT,
        }
    }

    /// Override the minimum alignment.
    pub fn with_alignment(mut self, alignment: usize) -> Self {
        self.alignment = alignment;
        self
    }

    /// Check the config's invariants.
    pub fn validate(&self) -> Result<(), AllocError> {
        if !is_power_of_two(self.alignment) {
            return Err(AllocError::InvalidAlignment {
                alignment: self.alignment,
            });
        }
        Ok(())
    }
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self::new(0)
    }
}
