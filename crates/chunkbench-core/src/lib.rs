//! Sequential vs chunk-parallel image filtering.
//!
//! A [`FilterKind`] is applied either to the whole [`ImageBuffer`] on the
//! calling thread ([`SequentialExecutor`]) or to horizontal row chunks on a
//! persistent [`WorkerPool`] ([`ParallelExecutor`]). Chunks carry their
//! neighbors' rows as halo, so both strategies produce identical pixels.
//! [`benchmark`] runs both and reports the speedup.

pub mod error;
pub mod executor;
pub mod image_buf;
pub mod kernel;
pub mod partition;
pub mod pool;
pub mod report;

pub use error::{FilterError, Result};
pub use executor::{ExecutionResult, ParallelConfig, ParallelExecutor, SequentialExecutor};
pub use image_buf::ImageBuffer;
pub use kernel::FilterKind;
pub use pool::{TaskHandle, WorkerPool};
pub use report::{BenchmarkResult, Speedup, benchmark, report};
