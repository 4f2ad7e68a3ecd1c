// Live camera feed as the picture behind the glass (feature `camera`).
// Each call to `next_texture()` blocks for one frame and hands back a
// linear-light texture ready for the optics.

use crate::background::Texture;
use crate::error::Error;
use crate::gamma::GammaLut;

use nokhwa::{
    Camera,
    pixel_format::RgbFormat,
    utils::{
        CameraFormat, CameraIndex, FrameFormat, RequestedFormat, RequestedFormatType, Resolution,
    },
};

pub struct CameraBackground {
    cam: Camera,
    width: u32,
    height: u32,
}

impl CameraBackground {
    /// Open camera `index`, asking for the closest format to `width`x`height`.
    pub fn new(index: u32, width: u32, height: u32) -> Result<Self, Error> {
        let fmt = CameraFormat::new(
            Resolution::new(width, height),
            FrameFormat::YUYV, // uncompressed; cheap to convert to RGB
            30,
        );
        let req = RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(fmt));

        let mut cam = Camera::new(CameraIndex::Index(index), req)
            .map_err(|e| Error::CameraInit(format!("Create camera: {e}")))?;
        cam.open_stream()
            .map_err(|e| Error::CameraInit(format!("Open stream: {e}")))?;

        // The stream may settle on a different resolution than requested.
        let actual = cam.resolution();
        log::info!("Camera {index} streaming at {}x{}", actual.width(), actual.height());

        Ok(Self { cam, width: actual.width(), height: actual.height() })
    }

    /// Grab one frame and decode it into a texture.
    pub fn next_texture(&mut self, lut: &GammaLut) -> Result<Texture, Error> {
        let frame = self
            .cam
            .frame()
            .map_err(|e| Error::CameraFrame(format!("Fetch frame: {e}")))?;
        let rgb = frame
            .decode_image::<RgbFormat>()
            .map_err(|e| Error::CameraFrame(format!("Decode RGB: {e}")))?;

        let (w, h) = rgb.dimensions();
        let rgba: Vec<u8> = rgb.pixels().flat_map(|p| [p[0], p[1], p[2], 255]).collect();
        Texture::from_rgba8(w as usize, h as usize, &rgba, lut)
    }

    pub fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}
