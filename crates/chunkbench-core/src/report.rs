use std::fmt;

use serde::{Serialize, Serializer};
use tracing::info;

use crate::error::Result;
use crate::executor::{ExecutionResult, ParallelExecutor, SequentialExecutor};
use crate::image_buf::ImageBuffer;
use crate::kernel::FilterKind;

/// Sequential time divided by parallel time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Speedup {
    Ratio(f64),
    /// The parallel run measured zero time, so there is no meaningful ratio.
    Unavailable,
}

impl Speedup {
    pub fn from_seconds(sequential: f64, parallel: f64) -> Self {
        if parallel > 0.0 {
            Speedup::Ratio(sequential / parallel)
        } else {
            Speedup::Unavailable
        }
    }

    pub fn ratio(self) -> Option<f64> {
        match self {
            Speedup::Ratio(r) => Some(r),
            Speedup::Unavailable => None,
        }
    }
}

impl fmt::Display for Speedup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Speedup::Ratio(r) => write!(f, "{r:.2}x"),
            Speedup::Unavailable => f.write_str("unavailable"),
        }
    }
}

/// A number, or the string `"unavailable"`.
impl Serialize for Speedup {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Speedup::Ratio(r) => serializer.serialize_f64(*r),
            Speedup::Unavailable => serializer.serialize_str("unavailable"),
        }
    }
}

#[derive(Clone, Debug)]
pub struct BenchmarkResult {
    pub sequential: ExecutionResult,
    pub parallel: ExecutionResult,
    pub speedup: Speedup,
    /// Whether both strategies produced pixel-identical images.
    pub outputs_match: bool,
}

pub fn report(sequential: ExecutionResult, parallel: ExecutionResult) -> BenchmarkResult {
    let speedup = Speedup::from_seconds(sequential.duration_seconds(), parallel.duration_seconds());
    let outputs_match = sequential.output == parallel.output;
    BenchmarkResult {
        sequential,
        parallel,
        speedup,
        outputs_match,
    }
}

/// Run `kind` sequentially, then in parallel, and compare.
pub fn benchmark(
    buffer: &ImageBuffer,
    kind: FilterKind,
    requested_workers: usize,
    parallel: &mut ParallelExecutor,
) -> Result<BenchmarkResult> {
    let seq = SequentialExecutor.run(buffer, kind)?;
    let par = parallel.run(buffer, kind, requested_workers)?;
    let result = report(seq, par);
    info!(
        kind = %kind,
        requested_workers,
        sequential_s = result.sequential.duration_seconds(),
        parallel_s = result.parallel.duration_seconds(),
        speedup = %result.speedup,
        outputs_match = result.outputs_match,
        "benchmark complete"
    );
    Ok(result)
}
