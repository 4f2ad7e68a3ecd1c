// Produces ripple events from pointer input. This is the UI side of the
// ripple list: it appends, caps and forgets; the renderer only reads a
// frame-local slice of what is here.

use crate::types::RippleEvent;
use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Emitter tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmitterConfig {
    /// Maximum live ripples; the oldest is dropped to make room.
    pub capacity: usize,
    /// Minimum seconds between ripples spawned by a drag.
    pub drag_interval_secs: f32,
}

impl Default for EmitterConfig {
    fn default() -> Self {
        Self { capacity: 16, drag_interval_secs: 0.5 }
    }
}

pub struct RippleEmitter {
    config: EmitterConfig,
    ripples: VecDeque<RippleEvent>,
    last_drag_spawn: Option<f32>,
}

impl RippleEmitter {
    pub fn new(config: EmitterConfig) -> Self {
        let capacity = config.capacity.max(1);
        Self {
            config: EmitterConfig { capacity, ..config },
            ripples: VecDeque::with_capacity(capacity),
            last_drag_spawn: None,
        }
    }

    fn push(&mut self, uv: Vec2, now: f32) {
        if self.ripples.len() >= self.config.capacity {
            self.ripples.pop_front();
        }
        let origin = uv.clamp(Vec2::ZERO, Vec2::ONE);
        self.ripples.push_back(RippleEvent::new(origin, now));
        log::debug!("ripple at ({:.3}, {:.3}) t={now:.3}, {} live", origin.x, origin.y, self.ripples.len());
    }

    /// A tap always spawns a ripple.
    pub fn tap(&mut self, uv: Vec2, now: f32) {
        self.push(uv, now);
    }

    /// Start of a drag: the first point spawns immediately.
    pub fn begin_drag(&mut self, uv: Vec2, now: f32) {
        self.last_drag_spawn = None;
        self.drag(uv, now);
    }

    /// Drag movement; spawns at most once per `drag_interval_secs`.
    /// Returns whether a ripple was spawned.
    pub fn drag(&mut self, uv: Vec2, now: f32) -> bool {
        if let Some(last) = self.last_drag_spawn {
            if now - last < self.config.drag_interval_secs {
                return false;
            }
        }
        self.last_drag_spawn = Some(now);
        self.push(uv, now);
        true
    }

    pub fn end_drag(&mut self) {
        self.last_drag_spawn = None;
    }

    pub fn clear(&mut self) {
        self.ripples.clear();
    }

    pub fn len(&self) -> usize {
        self.ripples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ripples.is_empty()
    }

    /// Oldest-first snapshot for this frame.
    pub fn events(&mut self) -> &[RippleEvent] {
        self.ripples.make_contiguous()
    }
}

/// Window pixel -> normalized [0,1]² UV.
pub fn point_to_uv(x: f32, y: f32, width: usize, height: usize) -> Vec2 {
    let size = Vec2::new(width.max(1) as f32, height.max(1) as f32);
    (Vec2::new(x, y) / size).clamp(Vec2::ZERO, Vec2::ONE)
}
