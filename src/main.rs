use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use rename_buffers::args::Args;
use rename_buffers::{driver, report_err};

fn main() {
    let args = Args::parse();

    let filter = if args.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match driver::run(&args) {
        Ok(summary) => {
            tracing::debug!(
                processed = summary.processed,
                failed = summary.failed,
                "run complete"
            );

            if summary.failed > 0 {
                process::exit(1);
            }
        }
        Err(err) => {
            report_err!("rename-buffers", "{err}");
            process::exit(1);
        }
    }
}
