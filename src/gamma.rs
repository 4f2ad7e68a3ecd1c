// Backgrounds are decoded into linear light once, when a texture is built;
// every refracted, blurred and blended color stays linear until the frame
// renderer packs the pixel for the window.

use glam::{Vec3, Vec4};

/// Resolution of the linear -> sRGB table.
const LINEAR_STEPS: usize = 4096;

/// sRGB transfer function, decode direction.
fn srgb_decode(c: f32) -> f32 {
    if c <= 0.04045 { c / 12.92 } else { ((c + 0.055) / 1.055).powf(2.4) }
}

/// sRGB transfer function, encode direction.
fn srgb_encode(l: f32) -> f32 {
    if l <= 0.003_130_8 { 12.92 * l } else { 1.055 * l.powf(1.0 / 2.4) - 0.055 }
}

/// Both directions of the sRGB curve as tables, built once per run.
pub struct GammaLut {
    decode: [f32; 256],
    encode: [u8; LINEAR_STEPS],
}

impl Default for GammaLut {
    fn default() -> Self {
        Self::new()
    }
}

impl GammaLut {
    pub fn new() -> Self {
        let decode = std::array::from_fn(|byte| srgb_decode(byte as f32 / 255.0));
        let last = (LINEAR_STEPS - 1) as f32;
        let encode = std::array::from_fn(|i| (srgb_encode(i as f32 / last) * 255.0).round().clamp(0.0, 255.0) as u8);
        Self { decode, encode }
    }

    #[inline]
    pub fn srgb_u8_to_linear(&self, v: u8) -> f32 {
        self.decode[v as usize]
    }

    #[inline]
    pub fn linear_to_srgb_u8(&self, l: f32) -> u8 {
        // NaN saturates to 0 through the float -> usize cast
        let last = LINEAR_STEPS - 1;
        let idx = (l.clamp(0.0, 1.0) * last as f32).round() as usize;
        self.encode[idx.min(last)]
    }

    /// Unpack a 0x00RRGGBB pixel into opaque linear RGBA.
    #[inline]
    pub fn unpack_linear(&self, px: u32) -> Vec4 {
        Vec4::new(
            self.srgb_u8_to_linear(((px >> 16) & 0xFF) as u8),
            self.srgb_u8_to_linear(((px >> 8) & 0xFF) as u8),
            self.srgb_u8_to_linear((px & 0xFF) as u8),
            1.0,
        )
    }

    /// Pack linear RGB into a 0x00RRGGBB pixel.
    #[inline]
    pub fn pack_srgb(&self, rgb: Vec3) -> u32 {
        let r = self.linear_to_srgb_u8(rgb.x) as u32;
        let g = self.linear_to_srgb_u8(rgb.y) as u32;
        let b = self.linear_to_srgb_u8(rgb.z) as u32;
        (r << 16) | (g << 8) | b
    }
}
