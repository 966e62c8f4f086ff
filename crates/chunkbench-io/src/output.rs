use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chunkbench_core::{FilterKind, ImageBuffer};
use tracing::debug;

use crate::encode::{self, OutputFormat};
use crate::timing::TimingReport;

/// Directory receiving the filtered images and the timing report.
pub struct OutputDir {
    root: PathBuf,
    format: OutputFormat,
}

impl OutputDir {
    pub fn create(root: PathBuf, format: OutputFormat) -> Result<Self> {
        fs::create_dir_all(&root)
            .with_context(|| format!("create output dir: {}", root.display()))?;
        Ok(Self { root, format })
    }

    /// `<root>/<prefix>_<kind>.<ext>`, e.g. `seq_blur.jpg`.
    pub fn image_path(&self, prefix: &str, kind: FilterKind) -> PathBuf {
        self.root
            .join(format!("{prefix}_{}.{}", kind.slug(), self.format.extension()))
    }

    pub fn report_path(&self, kind: FilterKind) -> PathBuf {
        self.root.join(format!("report_{}.json", kind.slug()))
    }

    pub fn write_image(&self, prefix: &str, kind: FilterKind, buf: &ImageBuffer) -> Result<PathBuf> {
        let path = self.image_path(prefix, kind);
        encode::save(buf, &path, self.format)?;
        Ok(path)
    }

    pub fn write_report(&self, report: &TimingReport) -> Result<PathBuf> {
        let path = self.report_path(report.kind);
        let json = serde_json::to_string_pretty(report)?;
        fs::write(&path, json).with_context(|| format!("write report: {}", path.display()))?;
        debug!(?path, "wrote timing report");
        Ok(path)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}
