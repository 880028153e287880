//! Payload fixtures.
//!
//! - [`Texture`]: bindless texture descriptor (what pools usually store).
//! - [`Transform`]: 16-byte aligned per-instance record.

use bytemuck::{Pod, Zeroable};

/// A bindless texture descriptor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
#[repr(C)]
pub struct Texture {
    pub id: u32,
    pub width: u32,
    pub height: u32,
    pub mip_levels: u32,
}

impl Texture {
    pub fn new(id: u32, width: u32, height: u32) -> Self {
        Self {
            id,
            width,
            height,
            mip_levels: 1,
        }
    }
}

/// A translation and uniform scale, laid out for direct upload.
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
#[repr(C, align(16))]
pub struct Transform {
    pub translation: [f32; 3],
    pub scale: f32,
}

impl Transform {
    pub fn at(x: f32, y: f32, z: f32) -> Self {
        Self {
            translation: [x, y, z],
            scale: 1.0,
        }
    }
}

/// `W` words of `0xAAAA_AAAA`: every odd bit set.
pub fn alternating_words<const W: usize>() -> [u32; W] {
    [0xAAAA_AAAA; W]
}
