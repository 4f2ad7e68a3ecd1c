// Ripple superposition: every touch sends out a damped ring; a pixel sees the
// plain sum of all rings that have reached it.

use crate::params::OpticalParams;
use crate::types::{RippleEvent, WaveSample};
use glam::Vec2;
use std::f32::consts::TAU;

/// Distance under which a pixel counts as sitting on the ripple origin.
const MIN_RADIUS_PX: f32 = 1e-6;

/// Height and analytic gradient of the ripple field at `pixel` (pixel units).
pub fn evaluate(pixel: Vec2, params: &OpticalParams, ripples: &[RippleEvent]) -> WaveSample {
    let omega = TAU * params.ripple_frequency_hz;     // rad/s
    let v = params.ripple_speed_px_per_sec.max(1.0);  // px/s

    ripples.iter().fold(WaveSample::default(), |acc, ripple| {
        match contribution(pixel, params, ripple, omega, v) {
            Some(s) => WaveSample {
                height: acc.height + s.height,
                gradient: acc.gradient + s.gradient,
            },
            None => acc,
        }
    })
}

/// One ripple's share, or `None` when it cannot affect this pixel yet.
fn contribution(
    pixel: Vec2,
    params: &OpticalParams,
    ripple: &RippleEvent,
    omega: f32,
    v: f32,
) -> Option<WaveSample> {
    let dt = params.time - ripple.spawn_time;
    if dt <= 0.0 {
        return None;
    }

    let d = pixel - ripple.origin * params.size;
    let r = d.length();
    if r <= MIN_RADIUS_PX {
        return None;
    }

    // time since the wavefront passed this pixel
    let tau = dt - r / v;
    if tau <= 0.0 {
        return None;
    }

    let a = params.ripple_amplitude
        * (-params.ripple_decay_time * tau).exp()
        * (-params.ripple_decay_dist * r).exp();
    let (sin, cos) = (omega * tau).sin_cos();

    // tau depends on r through -r/v, hence the 1/v terms.
    let da_dr = a * (params.ripple_decay_time / v - params.ripple_decay_dist);
    let dh_dr = da_dr * sin + a * omega * cos * (-1.0 / v);

    Some(WaveSample { height: a * sin, gradient: dh_dr * (d / r) })
}

/// How strongly ripples are present at a pixel, in [0,1]. Used to fade the
/// normal perturbation and the reflection out where the water is calm.
pub fn ripple_intensity(sample: &WaveSample) -> f32 {
    (sample.height.abs() * 2.0 + sample.gradient.length() * 0.5).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(time: f32) -> OpticalParams {
        OpticalParams { size: Vec2::new(400.0, 300.0), time, ..OpticalParams::ripple() }
    }

    #[test]
    fn no_contribution_before_spawn() {
        let ripples = [RippleEvent::new(Vec2::splat(0.5), 2.0)];
        let p = params(2.0);
        let s = evaluate(Vec2::new(210.0, 150.0), &p, &ripples);
        assert_eq!(s, WaveSample::default());
    }

    #[test]
    fn no_contribution_before_wavefront_arrives() {
        // 280 px/s for 0.1 s reaches 28 px; the pixel is 100 px away.
        let ripples = [RippleEvent::new(Vec2::splat(0.5), 0.0)];
        let p = params(0.1);
        let s = evaluate(Vec2::new(300.0, 150.0), &p, &ripples);
        assert_eq!(s.height, 0.0);
        assert_eq!(s.gradient, Vec2::ZERO);
    }

    #[test]
    fn origin_pixel_is_guarded() {
        let ripples = [RippleEvent::new(Vec2::splat(0.5), 0.0)];
        let p = params(0.5);
        let s = evaluate(Vec2::new(200.0, 150.0), &p, &ripples);
        assert_eq!(s.gradient, Vec2::ZERO);
        assert!(s.height.is_finite());
    }

    #[test]
    fn gradient_matches_finite_difference() {
        let ripples = [
            RippleEvent::new(Vec2::new(0.3, 0.4), 0.0),
            RippleEvent::new(Vec2::new(0.7, 0.6), 0.2),
        ];
        let p = params(1.3);
        let at = Vec2::new(190.0, 140.0);
        let eps = 0.01;
        let s = evaluate(at, &p, &ripples);
        let hx = |dx: f32| evaluate(at + Vec2::new(dx, 0.0), &p, &ripples).height;
        let hy = |dy: f32| evaluate(at + Vec2::new(0.0, dy), &p, &ripples).height;
        let fd = Vec2::new((hx(eps) - hx(-eps)) / (2.0 * eps), (hy(eps) - hy(-eps)) / (2.0 * eps));
        assert!((s.gradient - fd).length() < 1e-2 * (1.0 + fd.length()), "{:?} vs {:?}", s.gradient, fd);
    }

    #[test]
    fn intensity_is_clamped() {
        let calm = WaveSample::default();
        assert_eq!(ripple_intensity(&calm), 0.0);
        let rough = WaveSample { height: -3.0, gradient: Vec2::new(4.0, 0.0) };
        assert_eq!(ripple_intensity(&rough), 1.0);
        let soft = WaveSample { height: 0.1, gradient: Vec2::new(0.0, 0.2) };
        assert!((ripple_intensity(&soft) - 0.3).abs() < 1e-6);
    }
}
