// Per-frame optical configuration.
//
// One `OpticalParams` value is built by the frame loop before rendering and
// then only borrowed by the pixel programs, so nothing can change it while a
// frame is in flight.

use glam::Vec2;
use serde::{Deserialize, Deserializer, Serialize};

/// Snapshot of every knob the ripple and droplet programs read.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpticalParams {
    /// Viewport size in pixels.
    pub size: Vec2,
    /// Glass thickness in pixels; scales the refraction offset.
    pub thickness: f32,
    /// Index of refraction used to bend the background.
    pub refractive_index: f32,
    /// Per-channel spread of the refraction offset.
    pub chromatic_aberration: f32,
    /// Direction of the key light in the screen plane (radians).
    pub light_angle: f32,
    pub light_intensity: f32,
    pub ambient_strength: f32,
    /// Blur radius in texels.
    pub gaussian_blur: f32,
    pub saturation: f32,
    pub lightness: f32,
    /// Droplet center, normalized.
    pub shape_center: Vec2,
    /// Droplet radius, normalized to the shorter viewport side.
    pub shape_radius: f32,
    /// Seconds on the same clock as `RippleEvent::spawn_time`.
    pub time: f32,

    pub ripple_amplitude: f32,
    pub ripple_frequency_hz: f32,
    pub ripple_speed_px_per_sec: f32,
    /// Temporal decay rate (1/s).
    pub ripple_decay_time: f32,
    /// Spatial decay rate (1/px).
    pub ripple_decay_dist: f32,
    pub ripple_normal_scale: f32,

    pub reflect_strength: f32,
    pub reflect_distance_px: f32,
    pub specular_intensity: f32,
    pub specular_shininess: f32,
    /// Rotation applied to the reflection lookup (radians).
    pub env_rotation: f32,
    /// Index of refraction for the Fresnel weight.
    pub fresnel_ior: f32,
}

impl Default for OpticalParams {
    fn default() -> Self {
        Self::ripple()
    }
}

impl OpticalParams {
    /// Thin, lively water surface tuned for touch ripples.
    pub fn ripple() -> Self {
        Self {
            size: Vec2::ZERO,
            thickness: 4.0,
            refractive_index: 1.70,
            chromatic_aberration: 0.02,
            light_angle: std::f32::consts::PI * 0.25,
            light_intensity: 0.8,
            ambient_strength: 0.30,
            gaussian_blur: 1.2,
            saturation: 0.95,
            lightness: 0.98,
            shape_center: Vec2::splat(0.5),
            shape_radius: 0.28,
            time: 0.0,

            ripple_amplitude: 40.0,
            ripple_frequency_hz: 1.0,
            ripple_speed_px_per_sec: 280.0,
            ripple_decay_time: 1.2,
            ripple_decay_dist: 0.002,
            ripple_normal_scale: 3.0,

            reflect_strength: 1.0,
            reflect_distance_px: 200.0,
            specular_intensity: 0.55,
            specular_shininess: 80.0,
            env_rotation: 0.0,
            fresnel_ior: 1.9,
        }
    }

    /// Thick frosted glass drop.
    pub fn droplet() -> Self {
        Self {
            thickness: 32.0,
            refractive_index: 1.65,
            chromatic_aberration: 0.08,
            light_intensity: 1.0,
            ambient_strength: 0.25,
            gaussian_blur: 10.0,
            saturation: 1.0,
            lightness: 1.0,
            fresnel_ior: 1.65,
            ..Self::ripple()
        }
    }

    /// Same params with the ranges the renderer relies on enforced.
    pub fn sanitized(&self) -> Self {
        let mut p = *self;
        p.thickness = p.thickness.max(0.0);
        p.gaussian_blur = p.gaussian_blur.max(0.0);
        p.shape_center = p.shape_center.clamp(Vec2::ZERO, Vec2::ONE);
        p.shape_radius = p.shape_radius.clamp(0.0, 0.5);
        p
    }

    /// Copy for one frame: viewport size and clock filled in, ranges enforced.
    pub fn for_frame(&self, width: usize, height: usize, time: f32) -> Self {
        let mut p = self.sanitized();
        p.size = Vec2::new(width as f32, height as f32);
        p.time = time;
        p
    }
}

/// Reads a field that is present in the input; absent fields stay `None`
/// through `#[serde(default)]`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

// One optional slot per `OpticalParams` field, laid over a preset.
macro_rules! params_overrides {
    ($($field:ident: $ty:ty),* $(,)?) => {
        #[derive(Default, Deserialize)]
        #[serde(default)]
        struct ParamsOverrides {
            $(#[serde(deserialize_with = "present")] $field: Option<$ty>,)*
        }

        impl ParamsOverrides {
            fn over(self, mut base: OpticalParams) -> OpticalParams {
                $(if let Some(v) = self.$field { base.$field = v; })*
                base
            }
        }
    };
}

params_overrides! {
    size: Vec2,
    thickness: f32,
    refractive_index: f32,
    chromatic_aberration: f32,
    light_angle: f32,
    light_intensity: f32,
    ambient_strength: f32,
    gaussian_blur: f32,
    saturation: f32,
    lightness: f32,
    shape_center: Vec2,
    shape_radius: f32,
    time: f32,
    ripple_amplitude: f32,
    ripple_frequency_hz: f32,
    ripple_speed_px_per_sec: f32,
    ripple_decay_time: f32,
    ripple_decay_dist: f32,
    ripple_normal_scale: f32,
    reflect_strength: f32,
    reflect_distance_px: f32,
    specular_intensity: f32,
    specular_shininess: f32,
    env_rotation: f32,
    fresnel_ior: f32,
}

/// Deserialize a droplet section; fields it leaves out come from
/// [`OpticalParams::droplet`] rather than the ripple defaults.
pub fn deserialize_droplet<'de, D>(deserializer: D) -> Result<OpticalParams, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(ParamsOverrides::deserialize(deserializer)?.over(OpticalParams::droplet()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitized_clamps_shape_and_non_negative_terms() {
        let p = OpticalParams {
            thickness: -3.0,
            gaussian_blur: -1.0,
            shape_center: Vec2::new(-0.2, 1.7),
            shape_radius: 0.9,
            ..OpticalParams::droplet()
        }
        .sanitized();
        assert_eq!(p.thickness, 0.0);
        assert_eq!(p.gaussian_blur, 0.0);
        assert_eq!(p.shape_center, Vec2::new(0.0, 1.0));
        assert_eq!(p.shape_radius, 0.5);
    }

    #[test]
    fn for_frame_sets_size_and_time() {
        let p = OpticalParams::ripple().for_frame(320, 200, 2.5);
        assert_eq!(p.size, Vec2::new(320.0, 200.0));
        assert_eq!(p.time, 2.5);
        assert_eq!(p.ripple_amplitude, 40.0);
    }

    #[test]
    fn droplet_section_fills_gaps_from_droplet_preset() {
        let mut de = ron::Deserializer::from_str("(thickness: 20.0, shape_center: (0.25, 0.75))").unwrap();
        let p = deserialize_droplet(&mut de).unwrap();
        assert_eq!(p.thickness, 20.0);
        assert_eq!(p.shape_center, Vec2::new(0.25, 0.75));
        assert_eq!(p.gaussian_blur, 10.0);
        assert_eq!(p, OpticalParams { thickness: 20.0, shape_center: Vec2::new(0.25, 0.75), ..OpticalParams::droplet() });
    }

    #[test]
    fn empty_droplet_section_is_the_preset() {
        let mut de = ron::Deserializer::from_str("()").unwrap();
        assert_eq!(deserialize_droplet(&mut de).unwrap(), OpticalParams::droplet());
    }
}
