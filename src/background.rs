// The picture behind the glass.
//
// Textures hold linear-light RGBA so that refraction, blur and blending mix
// light rather than encoded values. Sampling clamps to the edge: the glass
// never wraps around to the other side of the image.

use crate::error::Error;
use crate::gamma::GammaLut;
use crate::types::FrameBuffer;
use glam::{UVec2, Vec2, Vec4};
use std::path::Path;

/// Anything the optics can read colors from.
pub trait BackgroundImage: Sync {
    /// Size in texels.
    fn size(&self) -> UVec2;

    /// Bilinear sample at normalized `uv`, clamped to the image.
    fn sample(&self, uv: Vec2) -> Vec4;

    /// One texel in UV units.
    fn texel_size(&self) -> Vec2 {
        Vec2::ONE / self.size().max(UVec2::ONE).as_vec2()
    }
}

/// CPU texture in linear light.
#[derive(Clone, Debug)]
pub struct Texture {
    width: usize,
    height: usize,
    texels: Vec<Vec4>,
}

impl Texture {
    /// Wrap linear texels; `texels.len()` must be `width * height`.
    pub fn from_linear(width: usize, height: usize, texels: Vec<Vec4>) -> Result<Self, Error> {
        if width == 0 || height == 0 || texels.len() != width * height {
            return Err(Error::SizeMismatch(format!(
                "texture {width}x{height} needs {} texels, got {}",
                width * height,
                texels.len()
            )));
        }
        Ok(Self { width, height, texels })
    }

    /// Decode sRGB RGBA8 bytes (row-major, 4 bytes per texel).
    pub fn from_rgba8(width: usize, height: usize, bytes: &[u8], lut: &GammaLut) -> Result<Self, Error> {
        if bytes.len() != width * height * 4 {
            return Err(Error::SizeMismatch(format!(
                "rgba8 {width}x{height} needs {} bytes, got {}",
                width * height * 4,
                bytes.len()
            )));
        }
        let texels = bytes
            .chunks_exact(4)
            .map(|p| {
                Vec4::new(
                    lut.srgb_u8_to_linear(p[0]),
                    lut.srgb_u8_to_linear(p[1]),
                    lut.srgb_u8_to_linear(p[2]),
                    p[3] as f32 / 255.0,
                )
            })
            .collect();
        Self::from_linear(width, height, texels)
    }

    /// Convert a window frame (0x00RRGGBB) into an opaque texture.
    pub fn from_frame(frame: &FrameBuffer, lut: &GammaLut) -> Result<Self, Error> {
        let texels = frame.pixels.iter().map(|&px| lut.unpack_linear(px)).collect();
        Self::from_linear(frame.width, frame.height, texels)
    }

    /// Load a PNG/JPEG/... from disk.
    pub fn load(path: &Path, lut: &GammaLut) -> Result<Self, Error> {
        let img = image::open(path)
            .map_err(|e| Error::ImageLoad(format!("{}: {e}", path.display())))?
            .to_rgba8();
        let (w, h) = img.dimensions();
        log::info!("Loaded background {} ({w}x{h})", path.display());
        Self::from_rgba8(w as usize, h as usize, img.as_raw(), lut)
    }

    /// Light grey checkerboard, used when no picture is available.
    pub fn checker(width: usize, height: usize, tile: usize, lut: &GammaLut) -> Self {
        let tile = tile.max(1);
        let on = Vec4::new(lut.srgb_u8_to_linear(230), lut.srgb_u8_to_linear(230), lut.srgb_u8_to_linear(230), 1.0);
        let off = Vec4::new(lut.srgb_u8_to_linear(200), lut.srgb_u8_to_linear(200), lut.srgb_u8_to_linear(200), 1.0);
        let (width, height) = (width.max(1), height.max(1));
        let mut texels = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                let even = ((x / tile) & 1) ^ ((y / tile) & 1) == 0;
                texels.push(if even { on } else { off });
            }
        }
        Self { width, height, texels }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Texel at integer coordinates, clamped to the edge.
    #[inline]
    pub fn texel(&self, x: i64, y: i64) -> Vec4 {
        let x = x.clamp(0, self.width as i64 - 1) as usize;
        let y = y.clamp(0, self.height as i64 - 1) as usize;
        self.texels[y * self.width + x]
    }

    /// Point sample of the texel containing `uv`.
    pub fn sample_nearest(&self, uv: Vec2) -> Vec4 {
        let p = uv.clamp(Vec2::ZERO, Vec2::ONE) * Vec2::new(self.width as f32, self.height as f32);
        self.texel(p.x.floor() as i64, p.y.floor() as i64)
    }
}

impl BackgroundImage for Texture {
    fn size(&self) -> UVec2 {
        UVec2::new(self.width as u32, self.height as u32)
    }

    fn sample(&self, uv: Vec2) -> Vec4 {
        let uv = uv.clamp(Vec2::ZERO, Vec2::ONE);
        // texel centers sit at half-integer positions
        let p = uv * Vec2::new(self.width as f32, self.height as f32) - 0.5;
        let base = p.floor();
        let f = p - base;
        let (x0, y0) = (base.x as i64, base.y as i64);

        let top = self.texel(x0, y0).lerp(self.texel(x0 + 1, y0), f.x);
        let bottom = self.texel(x0, y0 + 1).lerp(self.texel(x0 + 1, y0 + 1), f.x);
        top.lerp(bottom, f.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp() -> Texture {
        // 4x1: 0, 1/3, 2/3, 1 in every channel
        let texels = (0..4).map(|i| Vec4::splat(i as f32 / 3.0)).collect();
        Texture::from_linear(4, 1, texels).unwrap()
    }

    #[test]
    fn bilinear_hits_texel_centers_exactly() {
        let t = ramp();
        assert_eq!(t.sample(Vec2::new(0.125, 0.5)), Vec4::splat(0.0));
        assert!((t.sample(Vec2::new(0.375, 0.5)).x - 1.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn bilinear_interpolates_between_centers() {
        let t = ramp();
        let mid = t.sample(Vec2::new(0.25, 0.5));
        assert!((mid.x - 1.0 / 6.0).abs() < 1e-6);
    }

    #[test]
    fn sampling_clamps_instead_of_wrapping() {
        let t = ramp();
        assert_eq!(t.sample(Vec2::new(-3.0, 0.5)), t.sample(Vec2::new(0.0, 0.5)));
        assert_eq!(t.sample(Vec2::new(1.0, 0.5)).x, 1.0);
        assert_eq!(t.sample(Vec2::new(9.0, 9.0)).x, 1.0);
        assert_eq!(t.sample_nearest(Vec2::new(2.0, -1.0)).x, 1.0);
    }

    #[test]
    fn size_mismatch_is_rejected() {
        assert!(Texture::from_linear(3, 3, vec![Vec4::ZERO; 8]).is_err());
        assert!(Texture::from_rgba8(2, 2, &[0u8; 15], &GammaLut::new()).is_err());
    }

    #[test]
    fn checker_alternates_tiles() {
        let lut = GammaLut::new();
        let t = Texture::checker(8, 8, 4, &lut);
        assert_eq!(t.texel(0, 0), t.texel(4, 4));
        assert_ne!(t.texel(0, 0), t.texel(4, 0));
        assert!((t.texel(0, 0).x - lut.srgb_u8_to_linear(230)).abs() < 1e-6);
    }

    #[test]
    fn load_decodes_a_png_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bg.png");
        let mut img = image::RgbaImage::from_pixel(3, 2, image::Rgba([0, 0, 0, 255]));
        img.put_pixel(2, 1, image::Rgba([255, 128, 0, 255]));
        img.save(&path).unwrap();

        let lut = GammaLut::new();
        let t = Texture::load(&path, &lut).unwrap();
        assert_eq!((t.width(), t.height()), (3, 2));
        assert_eq!(t.size(), UVec2::new(3, 2));
        let c = t.texel(2, 1);
        assert!((c.x - 1.0).abs() < 1e-6);
        assert!((c.y - lut.srgb_u8_to_linear(128)).abs() < 1e-6);
        assert_eq!(c.z, 0.0);
        assert_eq!(t.texel(0, 0), Vec4::new(0.0, 0.0, 0.0, 1.0));
    }

    #[test]
    fn load_reports_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let err = Texture::load(&dir.path().join("nope.png"), &GammaLut::new());
        assert!(matches!(err, Err(Error::ImageLoad(_))));
    }

    #[test]
    fn rgba8_decodes_through_gamma() {
        let lut = GammaLut::new();
        let t = Texture::from_rgba8(1, 1, &[255, 0, 128, 255], &lut).unwrap();
        let c = t.texel(0, 0);
        assert!((c.x - 1.0).abs() < 1e-6);
        assert_eq!(c.y, 0.0);
        assert!((c.z - lut.srgb_u8_to_linear(128)).abs() < 1e-6);
        assert_eq!(c.w, 1.0);
    }
}
