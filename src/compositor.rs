// Per-pixel shading programs and the frame renderer that runs them.
//
// Each program is a pure function of the pixel position, the frame's
// `OpticalParams`, the frame's ripple slice and the background. Nothing is
// shared between pixels, so a frame is rendered row by row on the rayon pool.

use crate::background::BackgroundImage;
use crate::error::Error;
use crate::fresnel::reflectance;
use crate::gamma::GammaLut;
use crate::grade::adjust;
use crate::params::OpticalParams;
use crate::refraction::refract_sample;
use crate::surface::{droplet_surface, ripple_surface};
use crate::types::{FrameBuffer, RippleEvent};
use crate::wave::{evaluate, ripple_intensity};
use glam::{Mat2, Vec2, Vec3, Vec4};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Which surface the glass shows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
pub enum Mode {
    /// Full-screen water that ripples where it is touched.
    #[default]
    Ripple,
    /// A single glass drop that follows the pointer.
    Droplet,
}

impl Mode {
    pub fn toggled(self) -> Self {
        match self {
            Mode::Ripple => Mode::Droplet,
            Mode::Droplet => Mode::Ripple,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Mode::Ripple => "RIPPLE",
            Mode::Droplet => "DROPLET",
        }
    }
}

/// Key light as seen from the screen: tilted toward `light_angle`, 45° above the plane.
#[inline]
fn light_dir(params: &OpticalParams) -> Vec3 {
    let (s, c) = params.light_angle.sin_cos();
    Vec3::new(c, s, 1.0).normalize()
}

/// Ambient + Lambert, normalized so a flat surface keeps its color.
fn diffuse_gain(normal: Vec3, light: Vec3, params: &OpticalParams) -> f32 {
    let lit = params.ambient_strength + params.light_intensity * normal.dot(light).max(0.0);
    let flat = params.ambient_strength + params.light_intensity * light.z.max(0.0);
    if flat > 1e-4 { lit / flat } else { 1.0 }
}

/// Blinn-Phong highlight with the viewer straight above the screen.
fn specular(normal: Vec3, light: Vec3, params: &OpticalParams) -> f32 {
    let half = (light + Vec3::Z).normalize();
    params.specular_intensity * normal.dot(half).max(0.0).powf(params.specular_shininess.max(1.0))
}

/// Water surface shaded from the ripple field.
pub fn shade_ripple<B: BackgroundImage + ?Sized>(
    pixel: Vec2,
    uv: Vec2,
    params: &OpticalParams,
    ripples: &[RippleEvent],
    background: &B,
) -> Vec4 {
    let wave = evaluate(pixel, params, ripples);
    let k = ripple_intensity(&wave);
    let surface = ripple_surface(&wave, params.ripple_normal_scale);

    // calm water is a flat pane: fade the perturbation with the ripple intensity
    let normal = Vec3::Z.lerp(surface.normal, k).normalize();
    let height = wave.height / params.ripple_amplitude.abs().max(1e-6);

    let refracted = refract_sample(
        uv,
        normal,
        height,
        params.thickness * k,
        params.refractive_index,
        params.chromatic_aberration,
        params.size,
        background,
        params.gaussian_blur * k,
    );

    let bounce = Mat2::from_angle(params.env_rotation) * normal.truncate();
    let reflect_uv = uv + bounce * params.reflect_distance_px / params.size.max(Vec2::ONE);
    let reflected = background.sample(reflect_uv.clamp(Vec2::ZERO, Vec2::ONE));

    let fresnel = reflectance(normal.z, params.fresnel_ior).clamp(0.0, 1.0);
    let weight = (fresnel * params.reflect_strength * k).clamp(0.0, 1.0);
    let base = refracted.truncate().lerp(reflected.truncate(), weight);

    let light = light_dir(params);
    let color = base * diffuse_gain(normal, light, params)
        + Vec3::splat(specular(normal, light, params) * params.light_intensity * k);

    adjust(color, params.saturation, params.lightness).extend(1.0)
}

/// Glass drop over the background. Alpha is the drop's coverage, so pixels
/// outside the silhouette leave the background untouched.
pub fn shade_droplet<B: BackgroundImage + ?Sized>(
    pixel: Vec2,
    uv: Vec2,
    params: &OpticalParams,
    background: &B,
) -> Vec4 {
    let surface = droplet_surface(pixel, params);
    if surface.coverage <= 0.0 {
        return background.sample(uv).truncate().extend(0.0);
    }
    let normal = surface.normal;

    let refracted = refract_sample(
        uv,
        normal,
        surface.height,
        params.thickness,
        params.refractive_index,
        params.chromatic_aberration,
        params.size,
        background,
        params.gaussian_blur,
    );

    let light = light_dir(params);
    // rim catches light on the side facing the lamp
    let facing = 0.5 + 0.5 * normal.truncate().normalize_or_zero().dot(light.truncate().normalize_or_zero());
    let rim = reflectance(normal.z, params.refractive_index).clamp(0.0, 1.0) * facing;

    let color = refracted.truncate() * diffuse_gain(normal, light, params)
        + Vec3::splat((rim + specular(normal, light, params)) * params.light_intensity);

    adjust(color, params.saturation, params.lightness).extend(surface.coverage)
}

/// Color and coverage of one pixel for the given program.
pub fn shade_pixel<B: BackgroundImage + ?Sized>(
    mode: Mode,
    pixel: Vec2,
    params: &OpticalParams,
    ripples: &[RippleEvent],
    background: &B,
) -> Vec4 {
    let uv = pixel / params.size.max(Vec2::ONE);
    match mode {
        Mode::Ripple => shade_ripple(pixel, uv, params, ripples, background),
        Mode::Droplet => shade_droplet(pixel, uv, params, background),
    }
}

/// Render one frame into `out`, blending the glass over the background by its
/// alpha. `params` must have been built for `out`'s size.
pub fn render_frame<B: BackgroundImage + ?Sized>(
    mode: Mode,
    params: &OpticalParams,
    ripples: &[RippleEvent],
    background: &B,
    lut: &GammaLut,
    out: &mut FrameBuffer,
) -> Result<(), Error> {
    let expected = Vec2::new(out.width as f32, out.height as f32);
    if params.size != expected {
        return Err(Error::SizeMismatch(format!(
            "params built for {}x{}, frame is {}x{}",
            params.size.x, params.size.y, out.width, out.height
        )));
    }
    if out.pixels.len() != out.width * out.height {
        return Err(Error::SizeMismatch("render: frame buffer length".into()));
    }
    if out.width == 0 {
        return Ok(());
    }

    out.pixels.par_chunks_mut(out.width).enumerate().for_each(|(y, row)| {
        for (x, px) in row.iter_mut().enumerate() {
            let pixel = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
            let glass = shade_pixel(mode, pixel, params, ripples, background);
            let under = background.sample(pixel / params.size);
            let rgb = under.truncate().lerp(glass.truncate(), glass.w.clamp(0.0, 1.0));
            *px = lut.pack_srgb(rgb);
        }
    });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::background::Texture;

    fn scene() -> (Texture, OpticalParams) {
        let lut = GammaLut::new();
        let bg = Texture::checker(64, 48, 8, &lut);
        let params = OpticalParams::ripple().for_frame(64, 48, 1.0);
        (bg, params)
    }

    #[test]
    fn calm_water_only_grades_the_background() {
        let (bg, params) = scene();
        let pixel = Vec2::new(10.5, 20.5);
        let c = shade_pixel(Mode::Ripple, pixel, &params, &[], &bg);
        let expected = adjust(bg.sample(pixel / params.size).truncate(), params.saturation, params.lightness);
        assert!((c.truncate() - expected).abs().max_element() < 1e-5);
        assert_eq!(c.w, 1.0);
    }

    #[test]
    fn ripple_output_is_clamped_and_opaque() {
        let (bg, params) = scene();
        let params = OpticalParams { saturation: 4.0, lightness: 3.0, ..params };
        let ripples = [RippleEvent::new(Vec2::new(0.3, 0.5), 0.0), RippleEvent::new(Vec2::new(0.6, 0.4), 0.4)];
        for y in 0..48 {
            for x in 0..64 {
                let c = shade_pixel(Mode::Ripple, Vec2::new(x as f32 + 0.5, y as f32 + 0.5), &params, &ripples, &bg);
                assert!(c.cmpge(Vec4::ZERO).all() && c.cmple(Vec4::ONE).all(), "{c:?} at {x},{y}");
            }
        }
    }

    #[test]
    fn droplet_outside_is_transparent() {
        let (bg, _) = scene();
        let params = OpticalParams::droplet().for_frame(64, 48, 0.0);
        let corner = shade_pixel(Mode::Droplet, Vec2::new(0.5, 0.5), &params, &[], &bg);
        assert_eq!(corner.w, 0.0);
        let center = shade_pixel(Mode::Droplet, Vec2::new(32.0, 24.0), &params, &[], &bg);
        assert_eq!(center.w, 1.0);
    }

    #[test]
    fn render_rejects_params_for_another_viewport() {
        let (bg, params) = scene();
        let mut out = FrameBuffer::new(32, 32);
        let err = render_frame(Mode::Ripple, &params, &[], &bg, &GammaLut::new(), &mut out);
        assert!(matches!(err, Err(Error::SizeMismatch(_))));
    }

    #[test]
    fn mode_toggles_back_and_forth() {
        assert_eq!(Mode::Ripple.toggled(), Mode::Droplet);
        assert_eq!(Mode::Droplet.toggled().toggled(), Mode::Droplet);
    }
}
