//! CLI entry point for the preferential sampling temperature analysis

use clap::Parser;
use prefsample::io::cli::{AnalysisRunner, Cli, write_failure};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    cli.init_logging();
    let runner = AnalysisRunner::new(cli);
    match runner.run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            let _ = write_failure(&mut std::io::stderr(), &error);
            ExitCode::FAILURE
        }
    }
}
