use chunkbench_core::{BenchmarkResult, FilterKind, ImageBuffer, Speedup};
use serde::Serialize;

/// Serializable summary of one benchmark run, without the pixel data.
#[derive(Clone, Debug, Serialize)]
pub struct TimingReport {
    pub kind: FilterKind,
    pub requested_workers: usize,
    pub effective_workers: usize,
    pub width: u32,
    pub height: u32,
    pub sequential_seconds: f64,
    pub parallel_seconds: f64,
    pub speedup: Speedup,
    pub outputs_match: bool,
    /// blake3 of the output samples, hex.
    pub sequential_digest: String,
    pub parallel_digest: String,
}

impl TimingReport {
    pub fn new(
        result: &BenchmarkResult,
        kind: FilterKind,
        requested_workers: usize,
        effective_workers: usize,
    ) -> Self {
        Self {
            kind,
            requested_workers,
            effective_workers,
            width: result.sequential.output.width,
            height: result.sequential.output.height,
            sequential_seconds: result.sequential.duration_seconds(),
            parallel_seconds: result.parallel.duration_seconds(),
            speedup: result.speedup,
            outputs_match: result.outputs_match,
            sequential_digest: digest(&result.sequential.output),
            parallel_digest: digest(&result.parallel.output),
        }
    }

    /// Lines printed to the console after a run.
    pub fn summary_lines(&self) -> Vec<String> {
        let speedup = match self.speedup.ratio() {
            Some(r) => format!("Speedup: {r:.2}x faster"),
            None => format!("Speedup: {}", self.speedup),
        };
        vec![
            format!(
                "{} on {}x{} ({} of {} workers)",
                self.kind, self.width, self.height, self.effective_workers, self.requested_workers
            ),
            format!("Sequential time: {:.4} seconds", self.sequential_seconds),
            format!("Parallel time: {:.4} seconds", self.parallel_seconds),
            speedup,
        ]
    }
}

pub fn digest(buf: &ImageBuffer) -> String {
    blake3::hash(&buf.data).to_hex().to_string()
}
