use std::path::Path;

use anyhow::{Context, Result};
use chunkbench_core::ImageBuffer;
use image::{ImageFormat, RgbImage};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Jpg,
    Png,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Jpg => "jpg",
            OutputFormat::Png => "png",
        }
    }

    fn image_format(self) -> ImageFormat {
        match self {
            OutputFormat::Jpg => ImageFormat::Jpeg,
            OutputFormat::Png => ImageFormat::Png,
        }
    }
}

pub fn to_rgb_image(buf: &ImageBuffer) -> Result<RgbImage> {
    RgbImage::from_raw(buf.width, buf.height, buf.data.clone())
        .context("image buffer does not match its dimensions")
}

pub fn save(buf: &ImageBuffer, path: &Path, format: OutputFormat) -> Result<()> {
    let img = to_rgb_image(buf)?;
    img.save_with_format(path, format.image_format())
        .with_context(|| format!("write image: {}", path.display()))?;
    debug!(?path, width = buf.width, height = buf.height, "saved image");
    Ok(())
}
