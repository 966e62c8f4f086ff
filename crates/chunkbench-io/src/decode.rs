use std::path::Path;
use std::time::Instant;

use anyhow::Result;
use chunkbench_core::{FilterError, ImageBuffer};
use image::DynamicImage;
use tracing::{debug, info};

/// Decode any image file `image` understands into an 8-bit RGB buffer.
///
/// Failures are reported as `FilterError::Decode` so callers can tell a bad
/// input apart from other errors.
pub fn load_rgb(path: &Path) -> Result<ImageBuffer> {
    info!(?path, "loading image file");
    let t0 = Instant::now();

    let img = image::open(path)
        .map_err(|e| FilterError::Decode(format!("{}: {e}", path.display())))?;
    debug!(
        elapsed_ms = t0.elapsed().as_millis(),
        width = img.width(),
        height = img.height(),
        "image decode"
    );

    Ok(from_dynamic(img)?)
}

/// Drop alpha and widen or narrow to 8-bit RGB.
pub fn from_dynamic(img: DynamicImage) -> chunkbench_core::Result<ImageBuffer> {
    let rgb = img.into_rgb8();
    let (width, height) = rgb.dimensions();
    let buf = ImageBuffer::from_data(width, height, rgb.into_raw())?;
    buf.validate()?;
    Ok(buf)
}
