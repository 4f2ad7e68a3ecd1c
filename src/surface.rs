// Height field -> surface normal, for both the ripple field and the static drop.

use crate::params::OpticalParams;
use crate::types::{SurfaceSample, WaveSample};
use glam::{Vec2, Vec3};

/// Slope exaggeration of the drop; steep enough that the rim catches light.
const DOME_STEEPNESS: f32 = 3.0;

/// Standard height-field normal; `scale` exaggerates the slope.
#[inline]
pub fn normal_from_gradient(gradient: Vec2, scale: f32) -> Vec3 {
    (-scale * gradient).extend(1.0).normalize()
}

/// Surface of the ripple field. Ripples cover the whole viewport.
pub fn ripple_surface(wave: &WaveSample, scale: f32) -> SurfaceSample {
    SurfaceSample {
        normal: normal_from_gradient(wave.gradient, scale),
        height: wave.height,
        coverage: 1.0,
    }
}

/// Radius of the drop in pixels. Measured against the shorter side so the
/// drop stays round on non-square viewports.
#[inline]
pub fn droplet_radius_px(params: &OpticalParams) -> f32 {
    params.shape_radius * params.size.x.min(params.size.y)
}

/// Dome-shaped drop: height `(1 - d²)²` with `d` the distance from the center
/// in radii. Both height and slope reach zero at the rim, so the silhouette
/// has no crease.
pub fn droplet_surface(pixel: Vec2, params: &OpticalParams) -> SurfaceSample {
    let radius = droplet_radius_px(params);
    if radius <= 0.0 {
        return SurfaceSample::FLAT;
    }

    let delta = pixel - params.shape_center * params.size;
    let dist = delta.length();
    // one pixel of anti-aliasing across the rim
    let coverage = (radius + 0.5 - dist).clamp(0.0, 1.0);
    if dist >= radius {
        return SurfaceSample { coverage, ..SurfaceSample::FLAT };
    }

    let d = dist / radius;
    let rim = 1.0 - d * d;
    let height = rim * rim;

    // slope in "height per radius"; the dome is unit-tall in those units
    let dh_dd = -4.0 * d * rim;
    let gradient = if dist > 0.0 { dh_dd * (delta / dist) } else { Vec2::ZERO };

    SurfaceSample { normal: normal_from_gradient(gradient, DOME_STEEPNESS), height, coverage }
}
