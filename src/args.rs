use std::path::PathBuf;

use clap::Parser;

/// Benchmark a filter sequentially and on a chunk-parallel worker pool.
#[derive(Parser, Debug)]
#[command(name = "filter", author, version, about, long_about = None)]
pub struct Args {
    /// Filter to apply: Grayscale, Blur or EdgeDetection
    #[arg(long)]
    pub kind: String,

    /// Requested number of parallel workers
    #[arg(long, default_value_t = 4, value_parser = clap::value_parser!(u8).range(1..=8))]
    pub workers: u8,

    /// Image file to filter
    #[arg(long)]
    pub input: PathBuf,

    /// Directory for the filtered images and the timing report
    #[arg(long, default_value = "output")]
    pub output_dir: PathBuf,

    /// Optional JSON config file
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Exit code for a rejected command line, or `None` when clap only printed
/// help or version text. Usage errors share code 1 with other failures;
/// 2 is kept for an unknown filter kind.
pub fn usage_exit_code(err: &clap::Error) -> Option<u8> {
    err.use_stderr().then_some(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_command_line() {
        let args = Args::try_parse_from([
            "filter",
            "--kind",
            "Blur",
            "--workers",
            "8",
            "--input",
            "in.png",
            "--output-dir",
            "out",
        ])
        .unwrap();
        assert_eq!(args.kind, "Blur");
        assert_eq!(args.workers, 8);
        assert_eq!(args.input, PathBuf::from("in.png"));
        assert_eq!(args.output_dir, PathBuf::from("out"));
        assert!(args.config.is_none());
    }

    #[test]
    fn workers_default_and_range() {
        let args = Args::try_parse_from(["filter", "--kind", "Blur", "--input", "a.png"]).unwrap();
        assert_eq!(args.workers, 4);

        for bad in ["0", "9"] {
            let res =
                Args::try_parse_from(["filter", "--kind", "Blur", "--input", "a.png", "--workers", bad]);
            assert!(res.is_err(), "workers={bad} should be rejected");
        }
    }

    #[test]
    fn usage_errors_exit_1() {
        let out_of_range = Args::try_parse_from([
            "filter", "--kind", "Blur", "--workers", "9", "--input", "a.png",
        ])
        .unwrap_err();
        assert_eq!(usage_exit_code(&out_of_range), Some(1));

        let missing_input = Args::try_parse_from(["filter", "--kind", "Blur"]).unwrap_err();
        assert_eq!(usage_exit_code(&missing_input), Some(1));
    }

    #[test]
    fn help_and_version_are_not_failures() {
        for flag in ["--help", "--version"] {
            let err = Args::try_parse_from(["filter", flag]).unwrap_err();
            assert_eq!(usage_exit_code(&err), None, "{flag}");
        }
    }
}
