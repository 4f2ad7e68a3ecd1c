// Refraction through a glass slab: the surface tilt shifts where the
// background is read, each color channel by a slightly different amount.

use crate::background::BackgroundImage;
use crate::blur::blur;
use glam::{Vec2, Vec3, Vec4};

/// Blur radius (texels) at which the blurred sample fully replaces the sharp one.
const FULL_BLUR_RADIUS: f32 = 4.0;

/// In-plane normal length at which the surface counts as fully tilted for blur.
const FULL_BLUR_TILT: f32 = 0.25;

/// Where the refracted ray meets the background, in pixels from the pixel itself.
/// `height` is the normalized surface height in [-1,1]; it thickens or thins
/// the slab locally.
#[inline]
pub fn refraction_offset_px(normal: Vec3, height: f32, thickness: f32, ior: f32) -> Vec2 {
    // (1 - 1/n) vanishes for air, so a non-refracting medium never shifts.
    let bend = 1.0 - 1.0 / ior;
    let slab = thickness * (1.0 + height.clamp(-1.0, 1.0));
    -normal.truncate() * slab * bend
}

/// Per-channel scale of the refraction offset: red bends a little less,
/// blue a little more.
#[inline]
pub fn dispersion_scales(chromatic_aberration: f32) -> Vec3 {
    Vec3::new(1.0 - chromatic_aberration, 1.0, 1.0 + chromatic_aberration)
}

/// Background color seen through the surface at `screen_uv`.
#[allow(clippy::too_many_arguments)]
pub fn refract_sample<B: BackgroundImage + ?Sized>(
    screen_uv: Vec2,
    normal: Vec3,
    height: f32,
    thickness: f32,
    ior: f32,
    chromatic_aberration: f32,
    viewport_size: Vec2,
    background: &B,
    blur_radius: f32,
) -> Vec4 {
    if thickness <= 0.0 {
        return background.sample(screen_uv);
    }

    let offset = refraction_offset_px(normal, height, thickness, ior) / viewport_size.max(Vec2::ONE);
    let scales = dispersion_scales(chromatic_aberration);
    let at = |scale: f32| (screen_uv + offset * scale).clamp(Vec2::ZERO, Vec2::ONE);

    let green = background.sample(at(scales.y));
    let mut color = Vec4::new(
        background.sample(at(scales.x)).x,
        green.y,
        background.sample(at(scales.z)).z,
        green.w,
    );

    // a flat pane stays sharp; frosting grows with the tilt
    let tilt = (normal.truncate().length() / FULL_BLUR_TILT).clamp(0.0, 1.0);
    let blur_mix = (blur_radius / FULL_BLUR_RADIUS).clamp(0.0, 1.0) * tilt;
    if blur_mix > 0.0 {
        let soft = blur(background, at(scales.y), background.texel_size(), blur_radius);
        color = color.lerp(soft, blur_mix);
    }
    color
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::background::Texture;

    /// 16x16 texture whose red channel ramps left to right and blue top to bottom.
    fn gradient_texture() -> Texture {
        let mut texels = Vec::new();
        for y in 0..16 {
            for x in 0..16 {
                texels.push(Vec4::new(x as f32 / 15.0, 0.5, y as f32 / 15.0, 1.0));
            }
        }
        Texture::from_linear(16, 16, texels).unwrap()
    }

    #[test]
    fn zero_thickness_is_passthrough() {
        let t = gradient_texture();
        let uv = Vec2::new(0.4, 0.7);
        let n = Vec3::new(0.6, -0.3, 0.7).normalize();
        let c = refract_sample(uv, n, 0.8, 0.0, 2.4, 0.5, Vec2::splat(16.0), &t, 8.0);
        assert_eq!(c, t.sample(uv));
    }

    #[test]
    fn flat_normal_is_a_sharp_passthrough() {
        let t = gradient_texture();
        let uv = Vec2::new(0.3, 0.6);
        for blur_radius in [0.0, 2.0, 8.0] {
            let c = refract_sample(uv, Vec3::Z, 0.5, 20.0, 1.5, 0.2, Vec2::splat(16.0), &t, blur_radius);
            assert!((c - t.sample(uv)).abs().max_element() < 1e-6, "blur {blur_radius}: {c:?}");
        }
    }

    #[test]
    fn flat_normal_over_stripes_is_not_frosted() {
        let texels = (0..256)
            .map(|i| if (i % 16) % 2 == 0 { Vec4::ONE } else { Vec4::new(0.0, 0.0, 0.0, 1.0) })
            .collect();
        let t = Texture::from_linear(16, 16, texels).unwrap();
        let uv = Vec2::new(0.5 / 16.0, 0.5);
        let c = refract_sample(uv, Vec3::Z, 0.0, 20.0, 1.5, 0.1, Vec2::splat(16.0), &t, 8.0);
        assert_eq!(c, Vec4::ONE);
    }

    #[test]
    fn tilted_surface_over_stripes_is_frosted() {
        let texels = (0..256)
            .map(|i| if (i % 16) % 2 == 0 { Vec4::ONE } else { Vec4::new(0.0, 0.0, 0.0, 1.0) })
            .collect();
        let t = Texture::from_linear(16, 16, texels).unwrap();
        let uv = Vec2::new(0.5 / 16.0, 0.5);
        let n = Vec3::new(0.0, 0.6, 0.8);
        let c = refract_sample(uv, n, 0.0, 1.0, 1.5, 0.0, Vec2::splat(16.0), &t, 8.0);
        assert!(c.x < 0.9 && c.x > 0.1, "{c:?}");
    }

    #[test]
    fn tilt_shifts_the_lookup_against_the_normal() {
        let t = gradient_texture();
        let uv = Vec2::splat(0.5);
        let n = Vec3::new(0.5, 0.0, 0.866);
        let c = refract_sample(uv, n, 0.0, 8.0, 1.5, 0.0, Vec2::splat(16.0), &t, 0.0);
        // offset pushes toward smaller x, where red is darker
        assert!(c.x < t.sample(uv).x);
        assert!((c.z - t.sample(uv).z).abs() < 1e-6);
    }

    #[test]
    fn dispersion_separates_channels() {
        let scales = dispersion_scales(0.1);
        assert!(scales.x < scales.y && scales.y < scales.z);

        // grey ramp: any channel difference comes from the per-channel offsets
        let ramp: Vec<Vec4> = (0..256)
            .map(|i| Vec4::splat((i % 16) as f32 / 15.0).truncate().extend(1.0))
            .collect();
        let t = Texture::from_linear(16, 16, ramp).unwrap();
        let n = Vec3::new(-0.6, 0.0, 0.8);
        let c = refract_sample(Vec2::splat(0.5), n, 0.0, 10.0, 1.6, 0.3, Vec2::splat(16.0), &t, 0.0);
        assert!(c.x < c.y && c.y < c.z, "{c:?}");
    }

    #[test]
    fn lookups_stay_inside_the_image() {
        let t = gradient_texture();
        let n = Vec3::new(-0.99, 0.0, 0.14).normalize();
        let c = refract_sample(Vec2::new(0.99, 0.5), n, 1.0, 500.0, 1.9, 0.5, Vec2::splat(16.0), &t, 0.0);
        assert!(c.is_finite());
        assert!((c.x - 1.0).abs() < 1e-6);
    }
}
