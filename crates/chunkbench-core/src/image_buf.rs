use std::ops::Range;

use crate::error::{FilterError, Result};

/// Samples per pixel. Only interleaved RGB is supported.
pub const CHANNELS: usize = 3;

/// 8-bit RGB image buffer.
///
/// Pixel data is stored row-major as interleaved RGBRGBRGB...
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    /// Flat pixel data: [R, G, B, R, G, B, ...].
    pub data: Vec<u8>,
}

impl ImageBuffer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; width as usize * height as usize * CHANNELS],
        }
    }

    pub fn from_data(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize * CHANNELS;
        if data.len() != expected {
            return Err(FilterError::Decode(format!(
                "expected {expected} samples for {width}x{height} RGB, got {}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Check the preconditions the executors rely on: non-empty, and a sample
    /// count matching the dimensions.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(FilterError::Decode(format!(
                "empty image ({}x{})",
                self.width, self.height
            )));
        }
        let expected = self.pixel_count() * CHANNELS;
        if self.data.len() != expected {
            return Err(FilterError::Decode(format!(
                "expected {expected} samples for {}x{} RGB, got {}",
                self.width,
                self.height,
                self.data.len()
            )));
        }
        Ok(())
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Number of samples in one row.
    pub fn row_len(&self) -> usize {
        self.width as usize * CHANNELS
    }

    pub fn row(&self, y: u32) -> &[u8] {
        let len = self.row_len();
        let start = y as usize * len;
        &self.data[start..start + len]
    }

    /// Copy rows `rows` into a new, independently owned buffer.
    pub fn copy_rows(&self, rows: Range<u32>) -> Self {
        let len = self.row_len();
        let start = rows.start as usize * len;
        let end = rows.end as usize * len;
        Self {
            width: self.width,
            height: rows.end - rows.start,
            data: self.data[start..end].to_vec(),
        }
    }
}
