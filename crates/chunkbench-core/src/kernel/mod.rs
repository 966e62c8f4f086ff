mod blur;
mod grayscale;
mod sobel;

use std::fmt;
use std::ops::Range;
use std::str::FromStr;

use serde::Serialize;

use crate::error::FilterError;
use crate::image_buf::ImageBuffer;

pub use blur::GaussianBlur;
pub use grayscale::Grayscale;
pub use sobel::Sobel;

/// A pure per-image transform.
///
/// `apply_rows` filters rows `rows` of `input` and returns them as a new
/// buffer of the same width. Rows of `input` outside `rows` are read as
/// context only, and anything outside `input` reads as zero. A chunk that
/// carries `halo_rows()` real neighbor rows on each side therefore filters
/// to exactly the same pixels as the whole image would.
pub trait Kernel: Send + Sync {
    fn name(&self) -> &str;
    /// Rows of context needed above and below each output row.
    fn halo_rows(&self) -> u32;
    fn apply_rows(&self, input: &ImageBuffer, rows: Range<u32>) -> ImageBuffer;
}

/// The supported filters. Closed: adding one means extending `kernel()`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum FilterKind {
    Grayscale,
    Blur,
    EdgeDetection,
}

impl FilterKind {
    pub const ALL: [FilterKind; 3] = [
        FilterKind::Grayscale,
        FilterKind::Blur,
        FilterKind::EdgeDetection,
    ];

    pub fn kernel(self) -> &'static dyn Kernel {
        match self {
            FilterKind::Grayscale => &Grayscale,
            FilterKind::Blur => &GaussianBlur,
            FilterKind::EdgeDetection => &Sobel,
        }
    }

    /// Human-readable name, as shown in reports.
    pub fn label(self) -> &'static str {
        match self {
            FilterKind::Grayscale => "Grayscale",
            FilterKind::Blur => "Blur",
            FilterKind::EdgeDetection => "Edge Detection",
        }
    }

    /// Lowercase identifier used in file names.
    pub fn slug(self) -> &'static str {
        match self {
            FilterKind::Grayscale => "grayscale",
            FilterKind::Blur => "blur",
            FilterKind::EdgeDetection => "edge_detection",
        }
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for FilterKind {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "grayscale" => Ok(FilterKind::Grayscale),
            "blur" => Ok(FilterKind::Blur),
            "edge detection" | "edgedetection" | "edge-detection" | "edge_detection" => {
                Ok(FilterKind::EdgeDetection)
            }
            _ => Err(FilterError::UnknownFilterKind(s.to_string())),
        }
    }
}

/// Filter the whole buffer.
pub fn apply(input: &ImageBuffer, kind: FilterKind) -> ImageBuffer {
    kind.kernel().apply_rows(input, 0..input.height)
}

/// Clamp to the u8 range and truncate toward zero.
fn truncate_u8(v: f32) -> u8 {
    v.clamp(0.0, 255.0) as u8
}
