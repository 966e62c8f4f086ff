use std::path::PathBuf;

use anyhow::Result;
use chunkbench_core::{FilterError, FilterKind, ParallelExecutor, benchmark};
use chunkbench_io::decode;
use chunkbench_io::output::OutputDir;
use chunkbench_io::timing::TimingReport;
use tracing::{info, warn};

use crate::args::Args;
use crate::config::BenchConfig;

pub struct Outcome {
    pub timing: TimingReport,
    pub written: Vec<PathBuf>,
}

pub fn run(args: &Args, config: &BenchConfig) -> Result<Outcome> {
    // Reject the kind before touching the input.
    let kind: FilterKind = args.kind.parse()?;
    let image = decode::load_rgb(&args.input)?;
    let out = OutputDir::create(args.output_dir.clone(), config.image_format)?;

    let requested = args.workers as usize;
    let mut parallel = ParallelExecutor::new(config.parallel());
    let result = benchmark(&image, kind, requested, &mut parallel)?;
    let effective = parallel.effective_workers(image.height, requested);
    parallel.shutdown();

    if !result.outputs_match {
        warn!(kind = %kind, "sequential and parallel outputs differ");
    }

    let mut written = vec![
        out.write_image("seq", kind, &result.sequential.output)?,
        out.write_image("par", kind, &result.parallel.output)?,
    ];
    let timing = TimingReport::new(&result, kind, requested, effective);
    if config.write_report {
        written.push(out.write_report(&timing)?);
    }
    info!(dir = %out.root().display(), files = written.len(), "results written");

    Ok(Outcome { timing, written })
}

/// Process exit code for a failed run.
pub fn exit_code(err: &anyhow::Error) -> u8 {
    let filter_error = err
        .chain()
        .find_map(|cause| cause.downcast_ref::<FilterError>());
    match filter_error {
        Some(FilterError::UnknownFilterKind(_)) => 2,
        Some(FilterError::Decode(_)) => 3,
        Some(FilterError::ChunkProcessing { .. } | FilterError::PoolUnavailable(_)) => 4,
        None => 1,
    }
}
