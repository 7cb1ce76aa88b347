//! Capture export: pairwise blending into an animated image
//!
//! The ring holds one snapshot per tick. Export halves the rate by blending
//! each odd slot over the even slot before it, then hands the result to an
//! [`AnimationSink`] as raw RGBA rows.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::framebuffer::Surface;

/// Fixed export file name, written to the working directory
pub const EXPORT_FILE: &str = "tinybox-vid.gif";
/// Delay of every exported frame in centiseconds
pub const EXPORT_FRAME_DELAY: u16 = 3;
/// Opacity of the second slot of each pair
const PAIR_BLEND_ALPHA: u8 = 128;
/// NeuQuant sampling factor; 1 is best quality, 30 fastest
const GIF_QUANTIZE_SPEED: i32 = 10;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to create {}: {source}", path.display())]
    Create { path: PathBuf, source: io::Error },
    #[error("failed to allocate the export scratch buffer")]
    Scratch,
    #[error("{width}x{height} frames exceed the GIF size limit")]
    TooLarge { width: u32, height: u32 },
    #[error("frame is {got} bytes, expected {expected}")]
    FrameSize { got: usize, expected: usize },
    #[error("GIF encoding failed: {0}")]
    Gif(#[from] gif::EncodingError),
    #[error("PNG encoding failed: {0}")]
    Png(#[from] png::EncodingError),
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Destination for exported frames
pub trait AnimationSink {
    /// Append one frame of tightly packed RGBA8 rows
    fn write_frame(&mut self, rgba: &[u8], delay_cs: u16) -> Result<(), ExportError>;
    /// Flush and close the animation
    fn finish(&mut self) -> Result<(), ExportError>;
}

/// Seam between the scheduler and whatever turns a full ring into a file.
///
/// Implementations may copy the slots and encode elsewhere; the scheduler
/// only needs the call to return.
pub trait FrameExporter {
    /// Export a full ring in index order, returning the number of frames written
    fn export(&mut self, slots: &[Surface]) -> Result<usize, ExportError>;
}

/// Blend slot pairs and feed them to `sink`. A trailing odd slot is dropped.
pub fn export_pairs(
    slots: &[Surface],
    sink: &mut dyn AnimationSink,
) -> Result<usize, ExportError> {
    let Some(first) = slots.first() else {
        sink.finish()?;
        return Ok(0);
    };
    let mut scratch =
        Surface::try_new(first.width(), first.height()).map_err(|_| ExportError::Scratch)?;

    let mut written = 0;
    for pair in slots.chunks_exact(2) {
        scratch.copy_from(&pair[0]);
        scratch.blend_over(&pair[1], PAIR_BLEND_ALPHA);
        sink.write_frame(scratch.as_bytes(), EXPORT_FRAME_DELAY)?;
        written += 1;
    }
    sink.finish()?;
    Ok(written)
}

/// GIF encoder sink with infinite looping
pub struct GifSink<W: Write> {
    encoder: Option<gif::Encoder<W>>,
    width: u16,
    height: u16,
    rgb: Vec<u8>,
}

impl<W: Write> GifSink<W> {
    pub fn new(writer: W, width: u16, height: u16) -> Result<Self, ExportError> {
        let mut encoder = gif::Encoder::new(writer, width, height, &[])?;
        encoder.set_repeat(gif::Repeat::Infinite)?;
        Ok(Self {
            encoder: Some(encoder),
            width,
            height,
            rgb: Vec::with_capacity(width as usize * height as usize * 3),
        })
    }
}

impl<W: Write> AnimationSink for GifSink<W> {
    fn write_frame(&mut self, rgba: &[u8], delay_cs: u16) -> Result<(), ExportError> {
        let expected = self.width as usize * self.height as usize * 4;
        if rgba.len() != expected {
            return Err(ExportError::FrameSize {
                got: rgba.len(),
                expected,
            });
        }
        let Some(encoder) = self.encoder.as_mut() else {
            return Ok(());
        };

        // Frames are opaque; drop alpha before quantizing
        self.rgb.clear();
        for px in rgba.chunks_exact(4) {
            self.rgb.extend_from_slice(&px[..3]);
        }
        let mut frame =
            gif::Frame::from_rgb_speed(self.width, self.height, &self.rgb, GIF_QUANTIZE_SPEED);
        frame.delay = delay_cs;
        encoder.write_frame(&frame)?;
        Ok(())
    }

    fn finish(&mut self) -> Result<(), ExportError> {
        if let Some(encoder) = self.encoder.take() {
            let mut writer = encoder.into_inner()?;
            writer.flush()?;
        }
        Ok(())
    }
}

/// Synchronous exporter writing a GIF file, overwritten on every export
#[derive(Debug, Clone)]
pub struct GifExporter {
    path: PathBuf,
}

impl GifExporter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for GifExporter {
    fn default() -> Self {
        Self::new(EXPORT_FILE)
    }
}

impl FrameExporter for GifExporter {
    fn export(&mut self, slots: &[Surface]) -> Result<usize, ExportError> {
        let Some(first) = slots.first() else {
            return Ok(0);
        };
        let too_large = || ExportError::TooLarge {
            width: first.width(),
            height: first.height(),
        };
        let width = u16::try_from(first.width()).map_err(|_| too_large())?;
        let height = u16::try_from(first.height()).map_err(|_| too_large())?;

        let file = File::create(&self.path).map_err(|source| ExportError::Create {
            path: self.path.clone(),
            source,
        })?;
        let mut sink = GifSink::new(BufWriter::new(file), width, height)?;
        let frames = export_pairs(slots, &mut sink)?;
        tracing::info!("Capture exported: {} ({} frames)", self.path.display(), frames);
        Ok(frames)
    }
}
