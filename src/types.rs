// Core value types shared by the wave field, the optics and the frame loop.

use glam::{Vec2, Vec3};

#[derive(Clone)]
pub struct FrameBuffer {
    pub width: usize,      // how wide the frame is on screen (pixels)
    pub height: usize,     // how tall the frame is on screen (pixels)
    pub pixels: Vec<u32>,  // each entry is 0x00RRGGBB for minifb
}

impl FrameBuffer {
    /// Black frame of the given size.
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height, pixels: vec![0u32; width * height] }
    }
}

/// One touch on the liquid. Never mutated after creation; the emitter drops it
/// once it falls out of the ring.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RippleEvent {
    pub origin: Vec2,     // normalized [0,1]² position
    pub spawn_time: f32,  // seconds, same clock as `OpticalParams::time`
}

impl RippleEvent {
    pub fn new(origin: Vec2, spawn_time: f32) -> Self {
        Self { origin, spawn_time }
    }
}

/// Height and slope of the ripple field at one pixel.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct WaveSample {
    pub height: f32,
    pub gradient: Vec2,   // d(height)/d(pixel)
}

/// Surface seen by the optics at one pixel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceSample {
    pub normal: Vec3,     // unit length, +Z faces the viewer
    pub height: f32,
    pub coverage: f32,    // 1 inside the liquid, 0 outside (droplet silhouette)
}

impl SurfaceSample {
    /// Flat, empty surface (outside any droplet).
    pub const FLAT: Self = Self { normal: Vec3::Z, height: 0.0, coverage: 0.0 };
}
