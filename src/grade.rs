// Final color grading: saturation around perceptual luminance, then a
// lightness gain, clamped to the displayable range.

use glam::Vec3;

const LUMA_WEIGHTS: Vec3 = Vec3::new(0.299, 0.587, 0.114);

#[inline]
pub fn luminance(color: Vec3) -> f32 {
    color.dot(LUMA_WEIGHTS)
}

/// `saturation` 0 = grey, 1 = untouched, >1 boosts. `lightness` scales the result.
pub fn adjust(color: Vec3, saturation: f32, lightness: f32) -> Vec3 {
    let grey = Vec3::splat(luminance(color));
    let saturated = grey.lerp(color, saturation);
    (saturated * lightness).clamp(Vec3::ZERO, Vec3::ONE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neutral_grading_is_identity() {
        let c = Vec3::new(0.2, 0.55, 0.9);
        assert!((adjust(c, 1.0, 1.0) - c).abs().max_element() < 1e-6);
    }

    #[test]
    fn neutral_grading_still_clamps() {
        let c = Vec3::new(-0.5, 0.5, 1.5);
        let graded = adjust(c, 1.0, 1.0);
        assert_eq!(graded.x, 0.0);
        assert!((graded.y - 0.5).abs() < 1e-6);
        assert_eq!(graded.z, 1.0);
    }

    #[test]
    fn zero_saturation_is_grey() {
        let c = adjust(Vec3::new(1.0, 0.0, 0.0), 0.0, 1.0);
        assert!((c.x - 0.299).abs() < 1e-6);
        assert_eq!(c.x, c.y);
        assert_eq!(c.y, c.z);
    }

    #[test]
    fn boosts_stay_in_range() {
        let c = adjust(Vec3::new(0.9, 0.1, 0.4), 3.0, 2.5);
        assert!(c.cmpge(Vec3::ZERO).all() && c.cmple(Vec3::ONE).all());
    }
}
