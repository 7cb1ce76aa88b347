//! Frame presentation through `pixels`
//!
//! Hard modes upload the native 240x144 buffer and let the GPU scale it.
//! Soft mode scales on the CPU into a window-sized buffer, so the GPU only
//! copies it.

use std::sync::Arc;

use anyhow::{Context, Result};
use pixels::{Pixels, PixelsBuilder, SurfaceTexture};
use winit::dpi::PhysicalSize;
use winit::window::Window;

use super::config::DisplayMode;
use crate::console::{VIEW_HEIGHT, VIEW_WIDTH};
use crate::framebuffer::Surface;

/// Largest automatic window scale in soft mode
pub const SOFT_SCALE_CAP: u32 = 3;
/// Room left for window decorations and panels when picking a scale
const MONITOR_MARGIN: (u32, u32) = (16, 64);

/// Integer window scale that fits the monitor.
///
/// An explicit scale wins; otherwise the largest scale leaving a margin for
/// decorations, at least 1, and at most [`SOFT_SCALE_CAP`] in soft mode.
pub fn window_scale(
    monitor: Option<PhysicalSize<u32>>,
    mode: DisplayMode,
    requested: Option<u32>,
) -> u32 {
    if let Some(scale) = requested {
        return scale.max(1);
    }
    let fit = monitor
        .map(|size| {
            let w = size.width.saturating_sub(MONITOR_MARGIN.0) / VIEW_WIDTH;
            let h = size.height.saturating_sub(MONITOR_MARGIN.1) / VIEW_HEIGHT;
            w.min(h)
        })
        .unwrap_or(1)
        .max(1);
    match mode {
        DisplayMode::Soft => fit.min(SOFT_SCALE_CAP),
        DisplayMode::Hard | DisplayMode::HardVsync => fit,
    }
}

/// Presents the frame buffer into a window
pub struct Presenter {
    window: Arc<Window>,
    pixels: Pixels<'static>,
    mode: DisplayMode,
    scale: u32,
}

impl Presenter {
    pub fn new(window: Arc<Window>, mode: DisplayMode, scale: u32) -> Result<Self> {
        let size = window.inner_size();
        let texture = SurfaceTexture::new(
            size.width.max(1),
            size.height.max(1),
            Arc::clone(&window),
        );

        let scale = scale.max(1);
        let (width, height) = match mode {
            DisplayMode::Soft => (VIEW_WIDTH * scale, VIEW_HEIGHT * scale),
            DisplayMode::Hard | DisplayMode::HardVsync => (VIEW_WIDTH, VIEW_HEIGHT),
        };
        let pixels = PixelsBuilder::new(width, height, texture)
            .enable_vsync(mode.vsync())
            .build()
            .context("Failed to create pixel surface")?;

        tracing::info!(
            "Presenter ready: {:?}, buffer {}x{}, window {}x{}",
            mode,
            width,
            height,
            size.width,
            size.height
        );
        Ok(Self {
            window,
            pixels,
            mode,
            scale,
        })
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn vsync(&self) -> bool {
        self.mode.vsync()
    }

    /// Follow a window resize; zero sizes (minimized) are ignored
    pub fn resize(&mut self, size: PhysicalSize<u32>) {
        if size.width == 0 || size.height == 0 {
            return;
        }
        if let Err(e) = self.pixels.resize_surface(size.width, size.height) {
            tracing::warn!("Failed to resize surface: {}", e);
        }
    }

    pub fn present(&mut self, frame: &Surface) -> Result<()> {
        let target = self.pixels.frame_mut();
        match self.mode {
            DisplayMode::Soft => {
                if !frame.scale_into(self.scale, target) {
                    anyhow::bail!("Frame does not match the soft-scaled buffer");
                }
            }
            DisplayMode::Hard | DisplayMode::HardVsync => {
                let bytes = frame.as_bytes();
                if target.len() != bytes.len() {
                    anyhow::bail!("Frame does not match the native buffer");
                }
                target.copy_from_slice(bytes);
            }
        }
        self.pixels.render().context("Failed to render frame")
    }
}
