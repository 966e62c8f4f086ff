use std::ops::Range;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{FilterError, Result};
use crate::image_buf::ImageBuffer;
use crate::kernel::{self, FilterKind};
use crate::partition::{self, Chunk};
use crate::pool::{TaskHandle, WorkerPool};

/// A filtered image and the wall-clock time it took to produce.
#[derive(Clone, Debug)]
pub struct ExecutionResult {
    pub output: ImageBuffer,
    pub duration: Duration,
}

impl ExecutionResult {
    pub fn duration_seconds(&self) -> f64 {
        self.duration.as_secs_f64()
    }
}

/// Applies a kernel to the whole image on the calling thread.
#[derive(Clone, Copy, Debug, Default)]
pub struct SequentialExecutor;

impl SequentialExecutor {
    pub fn run(&self, buffer: &ImageBuffer, kind: FilterKind) -> Result<ExecutionResult> {
        buffer.validate()?;
        let t0 = Instant::now();
        let output = kernel::apply(buffer, kind);
        let duration = t0.elapsed();
        debug!(
            kind = %kind,
            kernel = kind.kernel().name(),
            width = buffer.width,
            height = buffer.height,
            elapsed_ms = duration.as_millis(),
            "sequential run"
        );
        Ok(ExecutionResult { output, duration })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParallelConfig {
    /// Images too short to give every worker this many rows use fewer
    /// workers; below two workers the run falls back to sequential.
    pub min_rows_per_chunk: u32,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            min_rows_per_chunk: 1,
        }
    }
}

/// Splits the image into row chunks and filters them on a persistent pool.
///
/// The pool is created on first use and kept for later runs with the same
/// effective worker count. A run needing a different count replaces it.
pub struct ParallelExecutor {
    config: ParallelConfig,
    pool: Option<WorkerPool>,
}

impl ParallelExecutor {
    pub fn new(config: ParallelConfig) -> Self {
        Self { config, pool: None }
    }

    pub fn effective_workers(&self, height: u32, requested: usize) -> usize {
        partition::effective_workers(height, requested, self.config.min_rows_per_chunk)
    }

    /// Size of the live pool, if one has been acquired.
    pub fn pool_size(&self) -> Option<usize> {
        self.pool.as_ref().map(WorkerPool::size)
    }

    pub fn run(
        &mut self,
        buffer: &ImageBuffer,
        kind: FilterKind,
        requested_workers: usize,
    ) -> Result<ExecutionResult> {
        buffer.validate()?;
        let workers = self.effective_workers(buffer.height, requested_workers);
        if workers < 2 {
            debug!(requested_workers, workers, "too few workers, running sequentially");
            return SequentialExecutor.run(buffer, kind);
        }

        let t0 = Instant::now();
        let ranges =
            partition::partition_with(buffer.height, workers, self.config.min_rows_per_chunk);
        let pool = self.pool_for(workers)?;
        let output = filter_chunks(pool, buffer, kind, &ranges)?;
        let duration = t0.elapsed();

        debug!(
            kind = %kind,
            workers,
            chunks = ranges.len(),
            elapsed_ms = duration.as_millis(),
            "parallel run"
        );
        Ok(ExecutionResult { output, duration })
    }

    /// Run on a pool the caller owns, one chunk per pool thread.
    ///
    /// Unlike `run`, this only needs `&WorkerPool`, so overlapping requests
    /// from several threads can share a single pool.
    pub fn run_on(
        pool: &WorkerPool,
        buffer: &ImageBuffer,
        kind: FilterKind,
    ) -> Result<ExecutionResult> {
        buffer.validate()?;
        let t0 = Instant::now();
        let ranges = partition::partition(buffer.height, pool.size());
        let output = filter_chunks(pool, buffer, kind, &ranges)?;
        Ok(ExecutionResult {
            output,
            duration: t0.elapsed(),
        })
    }

    /// Tear down the pool. The next parallel run acquires a new one.
    pub fn shutdown(&mut self) {
        if let Some(pool) = self.pool.take() {
            pool.shutdown();
        }
    }

    fn pool_for(&mut self, workers: usize) -> Result<&WorkerPool> {
        let pool = match self.pool.take() {
            Some(pool) if pool.size() == workers => pool,
            Some(stale) => {
                debug!(from = stale.size(), to = workers, "resizing worker pool");
                stale.shutdown();
                WorkerPool::acquire(workers)?
            }
            None => WorkerPool::acquire(workers)?,
        };
        Ok(&*self.pool.insert(pool))
    }
}

impl Default for ParallelExecutor {
    fn default() -> Self {
        Self::new(ParallelConfig::default())
    }
}

/// Submit one task per range and stitch the results back together.
fn filter_chunks(
    pool: &WorkerPool,
    buffer: &ImageBuffer,
    kind: FilterKind,
    ranges: &[Range<u32>],
) -> Result<ImageBuffer> {
    let halo = kind.kernel().halo_rows();
    let handles: Vec<_> = ranges
        .iter()
        .enumerate()
        .map(|(index, rows)| pool.submit(Chunk::extract(buffer, index, rows.clone(), halo), kind))
        .collect();
    assemble(
        buffer.width,
        buffer.height,
        ranges,
        handles.into_iter().map(TaskHandle::wait),
    )
}

/// Place each chunk result at the rows its index owns.
///
/// The first failure aborts assembly and no partial image is returned.
fn assemble(
    width: u32,
    height: u32,
    ranges: &[Range<u32>],
    parts: impl IntoIterator<Item = Result<(usize, ImageBuffer)>>,
) -> Result<ImageBuffer> {
    let mut output = ImageBuffer::new(width, height);
    let row_len = output.row_len();
    let mut placed = vec![false; ranges.len()];
    for part in parts {
        let (index, part) = part?;
        let Some(rows) = ranges.get(index) else {
            return Err(FilterError::ChunkProcessing {
                index,
                reason: format!("no such chunk, image has {}", ranges.len()),
            });
        };
        if placed[index] {
            return Err(FilterError::ChunkProcessing {
                index,
                reason: "chunk returned twice".into(),
            });
        }
        let expected = (rows.end - rows.start) as usize * row_len;
        if part.width != width || part.data.len() != expected {
            return Err(FilterError::ChunkProcessing {
                index,
                reason: format!(
                    "expected {} rows of width {width}, got {}x{}",
                    rows.end - rows.start,
                    part.width,
                    part.height
                ),
            });
        }
        let start = rows.start as usize * row_len;
        output.data[start..start + expected].copy_from_slice(&part.data);
        placed[index] = true;
    }
    if let Some(index) = placed.iter().position(|done| !done) {
        return Err(FilterError::ChunkProcessing {
            index,
            reason: "chunk never returned".into(),
        });
    }
    Ok(output)
}
