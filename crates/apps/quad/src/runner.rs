//! Window, GLES context and redraw loop for the quad scene
//!
//! Follows the usual glutin + winit setup: pick the config with the most
//! samples, create a GLES 3.0 context on the window, load glow from it.

use anyhow::{Context as _, anyhow};
use glow::{Context, HasContext};
use glutin::config::ConfigTemplateBuilder;
use glutin::context::{ContextApi, ContextAttributesBuilder, PossiblyCurrentContext, Version};
use glutin::display::GetGlDisplay;
use glutin::prelude::*;
use glutin::surface::{Surface, SurfaceAttributesBuilder, WindowSurface};
use glutin_winit::DisplayBuilder;
use raw_window_handle::HasWindowHandle;
use std::num::NonZeroU32;
use std::path::{Path, PathBuf};
use tracing::{error, info};
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::WindowEvent;
use winit::event_loop::ActiveEventLoop;
use winit::window::{Window, WindowId};

use crate::config::QuadConfig;
use crate::scene::{QuadScene, SceneError};

/// Debug mode configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebugMode {
    /// Number of frames to run before exiting
    pub frames: u64,
    /// Where the final frame is saved
    pub output_path: PathBuf,
}

/// Runtime state for the quad demo
pub struct QuadApp {
    config: QuadConfig,
    debug_mode: Option<DebugMode>,
    window: Option<Window>,
    gl_context: Option<PossiblyCurrentContext>,
    gl_surface: Option<Surface<WindowSurface>>,
    gl: Option<Context>,
    scene: Option<QuadScene>,
    frame_count: u64,
    error: Option<anyhow::Error>,
}

impl QuadApp {
    pub fn new(config: QuadConfig, debug_mode: Option<DebugMode>) -> Self {
        Self {
            config,
            debug_mode,
            window: None,
            gl_context: None,
            gl_surface: None,
            gl: None,
            scene: None,
            frame_count: 0,
            error: None,
        }
    }

    /// Error that stopped the event loop, if any
    pub fn take_error(&mut self) -> Option<anyhow::Error> {
        self.error.take()
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        error!("{:#}", err);
        self.error = Some(err);
        event_loop.exit();
    }

    fn init_gl(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<()> {
        let window_attributes = Window::default_attributes()
            .with_title(&self.config.window.title)
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.config.window.width,
                self.config.window.height,
            ));

        let template = ConfigTemplateBuilder::new()
            .with_alpha_size(8)
            .with_transparency(false);

        let display_builder = DisplayBuilder::new().with_window_attributes(Some(window_attributes));

        let (window, gl_config) = display_builder
            .build(event_loop, template, |configs| {
                configs
                    .reduce(|accum, config| {
                        if config.num_samples() > accum.num_samples() {
                            config
                        } else {
                            accum
                        }
                    })
                    .expect("display offered no GL configs")
            })
            .map_err(|e| anyhow!("failed to create GL display: {e}"))?;

        let window = window.context("display builder did not create a window")?;
        let window_handle = window
            .window_handle()
            .map_err(|e| anyhow!("window has no native handle: {e}"))?
            .as_raw();
        let gl_display = gl_config.display();

        let context_attributes = ContextAttributesBuilder::new()
            .with_context_api(ContextApi::Gles(Some(Version::new(3, 0))))
            .build(Some(window_handle));

        let gl_context = unsafe { gl_display.create_context(&gl_config, &context_attributes) }
            .context("failed to create OpenGL ES 3.0 context")?;

        let size = window.inner_size();
        let attrs = SurfaceAttributesBuilder::<WindowSurface>::new().build(
            window_handle,
            NonZeroU32::new(size.width).context("window has zero width")?,
            NonZeroU32::new(size.height).context("window has zero height")?,
        );

        let gl_surface = unsafe { gl_display.create_window_surface(&gl_config, &attrs) }
            .context("failed to create window surface")?;

        let gl_context = gl_context
            .make_current(&gl_surface)
            .context("failed to make GL context current")?;

        let gl = unsafe { Context::from_loader_function_cstr(|s| gl_display.get_proc_address(s)) };
        info!(version = ?gl.version(), "OpenGL context created");

        let scene = match unsafe { QuadScene::new(&gl, &self.config) } {
            Ok(scene) => scene,
            Err(SceneError::Shader(err)) => shader::abort_with_report(&err),
            Err(err) => return Err(err.into()),
        };

        self.window = Some(window);
        self.gl_context = Some(gl_context);
        self.gl_surface = Some(gl_surface);
        self.gl = Some(gl);
        self.scene = Some(scene);
        Ok(())
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(window), Some(gl), Some(gl_context), Some(gl_surface), Some(scene)) = (
            self.window.as_ref(),
            self.gl.as_ref(),
            self.gl_context.as_ref(),
            self.gl_surface.as_ref(),
            self.scene.as_ref(),
        ) else {
            return;
        };

        // Minimized windows report 0x0; nothing to draw or capture
        let size = window.inner_size();
        if !has_area(size) {
            return;
        }

        unsafe { scene.draw(gl, size.width, size.height) };
        self.frame_count += 1;

        // Read back before the swap leaves the back buffer undefined
        if let Some(debug_mode) = self.debug_mode.as_ref() {
            if self.frame_count >= debug_mode.frames {
                let captured = capture_frame(gl, size, &debug_mode.output_path);
                if let Err(err) = captured {
                    self.fail(event_loop, err.context("failed to capture frame"));
                    return;
                }
                info!(
                    frames = self.frame_count,
                    path = %debug_mode.output_path.display(),
                    "debug run finished, frame saved"
                );
                event_loop.exit();
                return;
            }
        }

        if let Err(err) = gl_surface.swap_buffers(gl_context) {
            self.fail(event_loop, anyhow!("failed to swap buffers: {err}"));
            return;
        }
        window.request_redraw();
    }
}

impl ApplicationHandler for QuadApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        info!(
            title = %self.config.window.title,
            width = self.config.window.width,
            height = self.config.window.height,
            "creating window and GL context"
        );

        if let Err(err) = self.init_gl(event_loop) {
            self.fail(event_loop, err);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                info!(frames = self.frame_count, "close requested");
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                if let (Some(gl_surface), Some(gl_context), Some(width), Some(height)) = (
                    self.gl_surface.as_ref(),
                    self.gl_context.as_ref(),
                    NonZeroU32::new(size.width),
                    NonZeroU32::new(size.height),
                ) {
                    gl_surface.resize(gl_context, width, height);
                }
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => (),
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = self.window.as_ref() {
            window.request_redraw();
        }
    }
}

fn has_area(size: PhysicalSize<u32>) -> bool {
    size.width > 0 && size.height > 0
}

/// Read the framebuffer and save it as an image
fn capture_frame(gl: &Context, size: PhysicalSize<u32>, output_path: &Path) -> anyhow::Result<()> {
    let (width, height) = (size.width as usize, size.height as usize);
    let mut pixels = vec![0u8; width * height * 4];

    unsafe {
        gl.read_pixels(
            0,
            0,
            size.width as i32,
            size.height as i32,
            glow::RGBA,
            glow::UNSIGNED_BYTE,
            glow::PixelPackData::Slice(Some(&mut pixels)),
        );
    }

    let img = image::RgbaImage::from_raw(size.width, size.height, flip_rows(&pixels, width, height))
        .context("framebuffer size does not match image size")?;

    if let Some(parent) = output_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    img.save(output_path)
        .with_context(|| format!("failed to write {}", output_path.display()))?;
    Ok(())
}

/// Flip RGBA rows vertically (OpenGL has origin at bottom-left)
fn flip_rows(pixels: &[u8], width: usize, height: usize) -> Vec<u8> {
    let row = width * 4;
    let mut flipped = vec![0u8; pixels.len()];
    for y in 0..height {
        let src = y * row;
        let dst = (height - 1 - y) * row;
        flipped[dst..dst + row].copy_from_slice(&pixels[src..src + row]);
    }
    flipped
}
