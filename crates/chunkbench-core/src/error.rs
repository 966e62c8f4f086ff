use thiserror::Error;

/// Failures surfaced by the filtering engine.
///
/// Every variant is a typed, recoverable error: the engine never degrades to a
/// partial image or a passthrough when one of these occurs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    /// The requested filter name is not one of the supported kinds.
    #[error("unknown filter kind: {0:?}")]
    UnknownFilterKind(String),

    /// The input buffer is empty or its sample count does not match its
    /// dimensions.
    #[error("invalid image buffer: {0}")]
    Decode(String),

    /// A single chunk task failed; the whole parallel run fails with it.
    #[error("chunk {index} failed: {reason}")]
    ChunkProcessing { index: usize, reason: String },

    /// The worker pool could not be created at the requested size.
    #[error("worker pool unavailable: {0}")]
    PoolUnavailable(String),
}

pub type Result<T> = std::result::Result<T, FilterError>;
