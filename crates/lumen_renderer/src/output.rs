//! Image sinks: where rendered pixels go.
//!
//! [`PixelBuffer`] keeps colors in memory; [`ImageWriter`] wraps one and
//! saves it as an 8-bit image file on [`ImageSink::flush`].

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::ImageError;
use lumen_core::Color;

/// Destination of rendered pixels.
///
/// `write_pixel` takes `&self` so that render workers can write disjoint
/// pixels concurrently.
pub trait ImageSink: Send + Sync {
    /// Image size as `(width, height)` in pixels.
    fn resolution(&self) -> (u32, u32);

    /// Store the color of pixel `(x, y)`. Out of bounds writes are ignored.
    fn write_pixel(&self, x: u32, y: u32, color: Color);

    /// Write out whatever was stored.
    fn flush(&mut self) -> Result<(), ImageError>;
}

/// In-memory image of linear colors on the 0-255 scale.
///
/// Each channel is stored as the bits of an `f64` in an `AtomicU64`.
/// Clones share the same pixels.
#[derive(Debug, Clone)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    channels: Arc<[AtomicU64]>,
}

impl PixelBuffer {
    /// Create a black buffer.
    pub fn new(width: u32, height: u32) -> Self {
        let len = width as usize * height as usize * 3;
        let channels: Vec<AtomicU64> = (0..len).map(|_| AtomicU64::new(0.0f64.to_bits())).collect();
        Self {
            width,
            height,
            channels: channels.into(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    fn offset(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.width && y < self.height)
            .then(|| (y as usize * self.width as usize + x as usize) * 3)
    }

    /// Color of pixel `(x, y)`, `None` when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        let i = self.offset(x, y)?;
        let load = |c: usize| f64::from_bits(self.channels[i + c].load(Ordering::Relaxed));
        Some(Color::new(load(0), load(1), load(2)))
    }

    /// Store a pixel. Returns `false` when `(x, y)` is out of bounds.
    pub fn set_pixel(&self, x: u32, y: u32, color: Color) -> bool {
        let Some(i) = self.offset(x, y) else {
            return false;
        };
        for (c, value) in color.to_array().into_iter().enumerate() {
            self.channels[i + c].store(value.to_bits(), Ordering::Relaxed);
        }
        true
    }

    /// Convert to row-major 8-bit RGB bytes.
    pub fn to_rgb8(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.channels.len());
        for y in 0..self.height {
            for x in 0..self.width {
                let color = self.pixel(x, y).unwrap_or(Color::ZERO);
                bytes.extend_from_slice(&color_to_rgb(color));
            }
        }
        bytes
    }
}

impl ImageSink for PixelBuffer {
    fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn write_pixel(&self, x: u32, y: u32, color: Color) {
        if !self.set_pixel(x, y, color) {
            log::warn!(
                "Ignoring pixel ({}, {}) outside {}x{} image",
                x,
                y,
                self.width,
                self.height
            );
        }
    }

    fn flush(&mut self) -> Result<(), ImageError> {
        Ok(())
    }
}

/// Convert a color to 8-bit RGB, clamping each channel to [0, 255].
pub fn color_to_rgb(color: Color) -> [u8; 3] {
    let clamped = color.clamp(Color::ZERO, Color::splat(255.0));
    [clamped.x as u8, clamped.y as u8, clamped.z as u8]
}

/// Writes the rendered image to a file.
///
/// The format comes from the file extension; files without one are
/// written as PNG.
#[derive(Debug)]
pub struct ImageWriter {
    path: PathBuf,
    buffer: PixelBuffer,
}

impl ImageWriter {
    pub fn new(path: impl Into<PathBuf>, width: u32, height: u32) -> Self {
        Self {
            path: path.into(),
            buffer: PixelBuffer::new(width, height),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The pixels stored so far.
    pub fn buffer(&self) -> &PixelBuffer {
        &self.buffer
    }
}

impl ImageSink for ImageWriter {
    fn resolution(&self) -> (u32, u32) {
        self.buffer.resolution()
    }

    fn write_pixel(&self, x: u32, y: u32, color: Color) {
        self.buffer.write_pixel(x, y, color);
    }

    fn flush(&mut self) -> Result<(), ImageError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let (width, height) = self.buffer.resolution();
        let bytes = self.buffer.to_rgb8();
        if self.path.extension().is_some() {
            image::save_buffer(&self.path, &bytes, width, height, image::ColorType::Rgb8)?;
        } else {
            image::save_buffer_with_format(
                &self.path,
                &bytes,
                width,
                height,
                image::ColorType::Rgb8,
                image::ImageFormat::Png,
            )?;
        }

        log::info!("Wrote {}x{} image to {}", width, height, self.path.display());
        Ok(())
    }
}
