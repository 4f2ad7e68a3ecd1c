// Liquid glass: a software compositor that bends a background picture through
// a moving height field.
//
// Per pixel: `wave` (or the static drop in `surface`) gives height and slope,
// `surface` turns them into a normal, `fresnel` and `refraction` (with `blur`)
// decide what the glass shows, and `grade` finishes the color. `compositor`
// wires those into the ripple and droplet programs and renders whole frames.

pub mod background;
pub mod blur;
pub mod compositor;
pub mod config;
pub mod emitter;
pub mod error;
pub mod fresnel;
pub mod gamma;
pub mod grade;
pub mod params;
pub mod refraction;
pub mod surface;
pub mod types;
pub mod wave;

#[cfg(feature = "camera")]
pub mod camera;

pub use background::{BackgroundImage, Texture};
pub use compositor::{Mode, render_frame, shade_pixel};
pub use error::Error;
pub use params::OpticalParams;
pub use types::{FrameBuffer, RippleEvent, SurfaceSample, WaveSample};
