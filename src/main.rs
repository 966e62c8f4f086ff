mod app;
mod args;
mod config;

use std::process::ExitCode;

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use args::Args;
use config::BenchConfig;

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => match args::usage_exit_code(&err) {
            Some(code) => {
                let _ = err.print();
                return ExitCode::from(code);
            }
            None => err.exit(),
        },
    };

    let config = match BenchConfig::load(args.config.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("error: {err:#}");
            return ExitCode::FAILURE;
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_filter)),
        )
        .init();

    match app::run(&args, &config) {
        Ok(outcome) => {
            for line in outcome.timing.summary_lines() {
                println!("{line}");
            }
            for path in &outcome.written {
                println!("wrote {}", path.display());
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("{err:#}");
            ExitCode::from(app::exit_code(&err))
        }
    }
}
