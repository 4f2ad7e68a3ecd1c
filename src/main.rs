// What you SEE:
// • A picture (or a grey checkerboard) behind a sheet of liquid glass.
// • RIPPLE mode: click to drop a ripple; click-and-drag to draw a trail of them.
// • DROPLET mode: a glass drop follows the pointer while the left button is held.
// • M switches mode, C clears ripples, ESC quits.

mod draw;

use clap::Parser;
use draw::{Drawer, draw_crosshair, draw_text_5x7};
use glam::Vec2;
use liquid_glass::compositor::{Mode, render_frame};
use liquid_glass::config::{CliArgs, Config};
use liquid_glass::emitter::{RippleEmitter, point_to_uv};
use liquid_glass::gamma::GammaLut;
use liquid_glass::{Error, FrameBuffer, Texture};
use std::time::{Duration, Instant};

/// Pointer travel (px) after which a held click becomes a drag.
const DRAG_THRESHOLD_PX: f32 = 4.0;

/// The picture behind the glass for this run.
enum Backdrop {
    Still(Texture),
    #[cfg(feature = "camera")]
    Live {
        camera: liquid_glass::camera::CameraBackground,
        current: Texture,
    },
}

impl Backdrop {
    fn open(config: &Config, use_camera: bool, lut: &GammaLut) -> Result<Self, Error> {
        if use_camera {
            #[cfg(feature = "camera")]
            {
                let mut camera = liquid_glass::camera::CameraBackground::new(
                    config.background.camera_index,
                    config.window.width,
                    config.window.height,
                )?;
                let (cw, ch) = camera.resolution();
                log::info!("Refracting the live camera ({cw}x{ch})");
                let current = camera.next_texture(lut)?;
                return Ok(Backdrop::Live { camera, current });
            }
            #[cfg(not(feature = "camera"))]
            log::warn!("Built without the `camera` feature; using a still background");
        }

        if let Some(path) = &config.background.image {
            match Texture::load(path, lut) {
                Ok(tex) => return Ok(Backdrop::Still(tex)),
                Err(e) => log::warn!("{e}; falling back to checkerboard"),
            }
        }
        Ok(Backdrop::Still(Texture::checker(
            config.window.width as usize,
            config.window.height as usize,
            config.background.checker_tile as usize,
            lut,
        )))
    }

    /// Pull a new camera frame if this is a live backdrop.
    #[cfg_attr(not(feature = "camera"), allow(unused_variables))]
    fn refresh(&mut self, lut: &GammaLut) -> Result<(), Error> {
        match self {
            Backdrop::Still(_) => Ok(()),
            #[cfg(feature = "camera")]
            Backdrop::Live { camera, current } => {
                *current = camera.next_texture(lut)?;
                Ok(())
            }
        }
    }

    fn texture(&self) -> &Texture {
        match self {
            Backdrop::Still(tex) => tex,
            #[cfg(feature = "camera")]
            Backdrop::Live { current, .. } => current,
        }
    }
}

fn main() -> Result<(), Error> {
    let args = CliArgs::parse();
    let mut config = Config::load_or_default(args.config.as_deref())?;
    config.apply_cli_overrides(&args);

    env_logger::Builder::new()
        .parse_filters(&config.log_level)
        .parse_default_env()
        .init();

    if args.dump_config {
        println!("{}", config.to_ron()?);
        return Ok(());
    }

    let lut = GammaLut::new();
    let mut backdrop = Backdrop::open(&config, args.camera, &lut)?;
    let (w, h) = (config.window.width.max(1) as usize, config.window.height.max(1) as usize);
    let mut drawer = Drawer::new(&config.window.title, w, h)?;
    let mut screen = FrameBuffer::new(w, h);
    log::info!("Window {w}x{h}, starting in {:?} mode", config.mode);

    let mut emitter = RippleEmitter::new(config.emitter);
    let mut mode = config.mode;

    // pointer state for tap vs. drag
    let mut press_at: Option<Vec2> = None;
    let mut dragging = false;

    let clock = Instant::now();
    let mut last_fps_time = Instant::now();
    let mut frames_this_second: u32 = 0;
    let mut hud_fps_text = String::from("FPS: 0.0");

    /* ------------------------------ Main loop ------------------------------ */
    while drawer.is_open() && !drawer.esc_pressed() {
        let now = clock.elapsed().as_secs_f32();

        /* 1) Keys */
        if drawer.m_pressed_once() {
            mode = mode.toggled();
            log::info!("Switched to {mode:?} mode");
        }
        if drawer.c_pressed_once() {
            emitter.clear();
        }

        /* 2) Pointer -> ripples or drop position */
        let down = drawer.left_mouse_down();
        let pointer = drawer.mouse_pos().map(|(x, y)| Vec2::new(x, y));
        match (down, pointer) {
            (true, Some(p)) => {
                let uv = point_to_uv(p.x, p.y, w, h);
                match mode {
                    Mode::Ripple => match press_at {
                        None => {
                            press_at = Some(p);
                            emitter.tap(uv, now);
                        }
                        Some(start) if !dragging && start.distance(p) > DRAG_THRESHOLD_PX => {
                            dragging = true;
                            emitter.begin_drag(uv, now);
                        }
                        Some(_) if dragging => {
                            emitter.drag(uv, now);
                        }
                        Some(_) => {}
                    },
                    Mode::Droplet => config.params_mut(Mode::Droplet).shape_center = uv,
                }
            }
            (false, _) if press_at.is_some() => {
                press_at = None;
                dragging = false;
                emitter.end_drag();
            }
            _ => {}
        }

        /* 3) Render the glass over the backdrop */
        backdrop.refresh(&lut)?;
        let params = config.params(mode).for_frame(w, h, now);
        render_frame(mode, &params, emitter.events(), backdrop.texture(), &lut, &mut screen)?;

        /* 4) Cursor + HUD */
        if mode == Mode::Ripple {
            if let Some(p) = pointer {
                draw_crosshair(&mut screen, p.x as i32, p.y as i32, 8, 0x00_FF_FF_FF);
            }
        }
        let hud = format!("{} | {} | {}", mode.label(), emitter.len(), hud_fps_text);
        draw_text_5x7(&mut screen, 8, 8, &hud, 0x00_FF_FF_FF);

        drawer.present(&screen)?;

        /* 5) FPS once per second */
        frames_this_second += 1;
        let tick = Instant::now();
        if tick.duration_since(last_fps_time) >= Duration::from_secs(1) {
            let secs = tick.duration_since(last_fps_time).as_secs_f32();
            let fps = frames_this_second as f32 / secs;
            log::info!("FPS: {fps:.1} ({} ripples)", emitter.len());
            hud_fps_text = format!("FPS: {fps:.1}");
            frames_this_second = 0;
            last_fps_time = tick;
        }
    }

    Ok(())
}
