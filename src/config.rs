use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chunkbench_core::ParallelConfig;
use chunkbench_io::encode::OutputFormat;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchConfig {
    /// Below this many rows per worker, fewer workers are used.
    pub min_rows_per_chunk: u32,
    pub image_format: OutputFormat,
    pub write_report: bool,
    /// Used when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            min_rows_per_chunk: 1,
            image_format: OutputFormat::Jpg,
            write_report: true,
            log_filter: "info".to_string(),
        }
    }
}

impl BenchConfig {
    /// Defaults when `path` is `None`; a given path must exist and parse.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let content = fs::read_to_string(path)
            .with_context(|| format!("read config: {}", path.display()))?;
        serde_json::from_str(&content).with_context(|| format!("parse config: {}", path.display()))
    }

    pub fn parallel(&self) -> ParallelConfig {
        ParallelConfig {
            min_rows_per_chunk: self.min_rows_per_chunk.max(1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_path_gives_defaults() {
        let config = BenchConfig::load(None).unwrap();
        assert_eq!(config, BenchConfig::default());
        assert_eq!(config.parallel(), ParallelConfig::default());
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bench.json");
        fs::write(&path, r#"{ "min_rows_per_chunk": 200, "image_format": "png" }"#).unwrap();

        let config = BenchConfig::load(Some(&path)).unwrap();
        assert_eq!(config.min_rows_per_chunk, 200);
        assert_eq!(config.image_format, OutputFormat::Png);
        assert!(config.write_report);
        assert_eq!(config.log_filter, "info");
    }

    #[test]
    fn zero_min_rows_is_treated_as_one() {
        let config = BenchConfig {
            min_rows_per_chunk: 0,
            ..Default::default()
        };
        assert_eq!(config.parallel().min_rows_per_chunk, 1);
    }

    #[test]
    fn missing_or_invalid_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(BenchConfig::load(Some(&dir.path().join("absent.json"))).is_err());

        let path = dir.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(BenchConfig::load(Some(&path)).is_err());
    }
}
