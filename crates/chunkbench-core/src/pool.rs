use std::any::Any;
use std::marker::PhantomData;
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

use rayon::{ThreadPool, ThreadPoolBuilder};
use tokio::sync::oneshot;
use tracing::debug;

use crate::error::{FilterError, Result};
use crate::image_buf::ImageBuffer;
use crate::kernel::FilterKind;
use crate::partition::Chunk;

type TaskOutcome = std::result::Result<ImageBuffer, String>;

/// A fixed-size set of OS threads reused across filtering calls.
///
/// The pool is an ordinary value owned by the caller: `acquire` creates it,
/// `shutdown` (or drop) tears the threads down. Resizing means shutting down
/// and acquiring a new pool. `submit` takes `&self`, so several callers may
/// share one pool across threads.
pub struct WorkerPool {
    pool: ThreadPool,
    size: usize,
}

impl WorkerPool {
    pub fn acquire(size: usize) -> Result<Self> {
        if size == 0 {
            return Err(FilterError::PoolUnavailable(
                "pool size must be at least 1".into(),
            ));
        }
        let pool = ThreadPoolBuilder::new()
            .num_threads(size)
            .thread_name(|i| format!("chunkbench-worker-{i}"))
            .build()
            .map_err(|e| FilterError::PoolUnavailable(e.to_string()))?;
        debug!(size, "worker pool acquired");
        Ok(Self { pool, size })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Queue `chunk` for filtering. The task owns the chunk and returns a
    /// freshly allocated buffer holding only the chunk's own rows.
    pub fn submit(&self, chunk: Chunk, kind: FilterKind) -> TaskHandle<'_> {
        let (sender, receiver) = oneshot::channel();
        let index = chunk.index;
        self.pool.spawn(move || {
            let t0 = Instant::now();
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
                kind.kernel().apply_rows(&chunk.data, chunk.local_rows())
            }))
            .map_err(panic_reason);
            debug!(
                index,
                kernel = kind.kernel().name(),
                rows = chunk.rows.end - chunk.rows.start,
                elapsed_ms = t0.elapsed().as_millis(),
                ok = outcome.is_ok(),
                "chunk filtered"
            );
            // A dropped receiver means the caller already failed on another chunk.
            let _ = sender.send(outcome);
        });
        TaskHandle {
            index,
            receiver,
            _pool: PhantomData,
        }
    }

    pub fn shutdown(self) {
        debug!(size = self.size, "worker pool shut down");
    }
}

/// Pending result of one submitted chunk.
///
/// Borrows the pool, so the pool cannot be shut down or replaced while any
/// handle is outstanding.
pub struct TaskHandle<'pool> {
    index: usize,
    receiver: oneshot::Receiver<TaskOutcome>,
    _pool: PhantomData<&'pool WorkerPool>,
}

impl TaskHandle<'_> {
    /// Block until the task finishes. Must not be called from inside an
    /// async runtime.
    pub fn wait(self) -> Result<(usize, ImageBuffer)> {
        let index = self.index;
        match self.receiver.blocking_recv() {
            Ok(Ok(output)) => Ok((index, output)),
            Ok(Err(reason)) => Err(FilterError::ChunkProcessing { index, reason }),
            Err(_) => Err(FilterError::ChunkProcessing {
                index,
                reason: "worker dropped the task without a result".into(),
            }),
        }
    }
}

fn panic_reason(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("kernel panicked: {s}")
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("kernel panicked: {s}")
    } else {
        "kernel panicked".into()
    }
}
