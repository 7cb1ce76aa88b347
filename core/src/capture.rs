//! Rolling frame capture and screenshots
//!
//! The ring is allocated once at startup. Arming starts copying every
//! presented frame into the next slot; when the last slot is written the
//! whole ring is handed to a [`FrameExporter`] and capture disarms.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use thiserror::Error;

use crate::export::{ExportError, FrameExporter};
use crate::framebuffer::Surface;

/// Fixed screenshot file name, written to the working directory
pub const SCREENSHOT_FILE: &str = "tinybox-sshot.png";
/// Default ring length: 15 seconds at 60 Hz
pub const DEFAULT_CAPTURE_FRAMES: usize = 900;

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("capture buffer was not allocated; recording is unavailable")]
    Disabled,
    #[error("capture export failed: {0}")]
    Export(#[from] ExportError),
}

/// Result of pushing one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushOutcome {
    /// Capture is not armed; the frame was ignored
    Idle,
    /// The frame was stored
    Stored,
    /// The frame filled the ring, which was exported
    Flushed { frames: usize },
}

/// Fixed-length circular store of frame snapshots
pub struct CaptureRing {
    /// None if allocation failed at construction
    slots: Option<Vec<Surface>>,
    capacity: usize,
    cursor: usize,
    armed: bool,
}

impl CaptureRing {
    /// Allocate `capacity` frame-sized slots.
    ///
    /// Allocation failure is logged and leaves the ring permanently disabled.
    pub fn new(capacity: usize, width: u32, height: u32) -> Self {
        let slots = if capacity == 0 {
            tracing::info!("Capture length is zero; recording disabled by configuration");
            None
        } else {
            match allocate_slots(capacity, width, height) {
                Some(slots) => {
                    tracing::debug!("Capture ring allocated: {} slots", capacity);
                    Some(slots)
                }
                None => {
                    tracing::error!(
                        "Failed to allocate {} capture slots; recording disabled",
                        capacity
                    );
                    None
                }
            }
        };
        Self {
            slots,
            capacity,
            cursor: 0,
            armed: false,
        }
    }

    /// A ring with no storage, as if allocation had failed
    pub fn disabled(capacity: usize) -> Self {
        Self {
            slots: None,
            capacity,
            cursor: 0,
            armed: false,
        }
    }

    /// Start (or resume) capturing from the current cursor
    pub fn arm(&mut self) {
        if !self.armed {
            tracing::info!("Recording started at slot {}", self.cursor);
        }
        self.armed = true;
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn is_enabled(&self) -> bool {
        self.slots.is_some()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Store `frame` if armed; export and disarm when the ring fills.
    ///
    /// The cursor is reset before exporting, so an export error still
    /// leaves the ring ready for the next recording.
    pub fn push_frame(
        &mut self,
        frame: &Surface,
        exporter: &mut dyn FrameExporter,
    ) -> Result<PushOutcome, CaptureError> {
        if !self.armed {
            return Ok(PushOutcome::Idle);
        }
        let Some(slots) = self.slots.as_mut() else {
            self.armed = false;
            return Err(CaptureError::Disabled);
        };

        slots[self.cursor].copy_from(frame);
        self.cursor += 1;
        if self.cursor < self.capacity {
            return Ok(PushOutcome::Stored);
        }

        self.cursor = 0;
        self.armed = false;
        tracing::info!("Recording finished, exporting {} slots", self.capacity);
        let frames = exporter.export(slots.as_slice())?;
        Ok(PushOutcome::Flushed { frames })
    }
}

fn allocate_slots(capacity: usize, width: u32, height: u32) -> Option<Vec<Surface>> {
    let mut slots = Vec::new();
    slots.try_reserve_exact(capacity).ok()?;
    for _ in 0..capacity {
        slots.push(Surface::try_new(width, height).ok()?);
    }
    Some(slots)
}

/// Write a surface as an RGBA PNG, overwriting `path`
pub fn save_screenshot(frame: &Surface, path: &Path) -> Result<(), ExportError> {
    let file = File::create(path).map_err(|source| ExportError::Create {
        path: path.to_path_buf(),
        source,
    })?;
    let writer = BufWriter::new(file);

    let mut encoder = png::Encoder::new(writer, frame.width(), frame.height());
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);

    let mut png_writer = encoder.write_header()?;
    png_writer.write_image_data(frame.as_bytes())?;
    png_writer.finish()?;

    tracing::info!("Screenshot saved: {}", path.display());
    Ok(())
}
