// Kawase-style blur evaluated per pixel: a center tap plus four diagonal taps on
// each of a few rings. Fixed tap count, so the cost does not grow with radius.

use crate::background::BackgroundImage;
use glam::{Vec2, Vec4};

/// Rings of diagonal taps around the center.
const RINGS: usize = 3;

const DIAGONALS: [Vec2; 4] = [
    Vec2::new(1.0, 1.0),
    Vec2::new(-1.0, 1.0),
    Vec2::new(1.0, -1.0),
    Vec2::new(-1.0, -1.0),
];

/// Softened sample of `image` around `uv`. `blur_radius` is in texels;
/// `blur_radius <= 0` is exactly `image.sample(uv)`.
pub fn blur<B: BackgroundImage + ?Sized>(image: &B, uv: Vec2, texel_size: Vec2, blur_radius: f32) -> Vec4 {
    if blur_radius <= 0.0 || blur_radius.is_nan() {
        return image.sample(uv);
    }

    let mut sum = image.sample(uv);
    for ring in 0..RINGS {
        let offset = texel_size * (blur_radius * (ring as f32 + 0.5) / RINGS as f32);
        for dir in DIAGONALS {
            sum += image.sample(uv + dir * offset);
        }
    }
    sum / (1 + RINGS * DIAGONALS.len()) as f32
}
