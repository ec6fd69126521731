//! Convert a legacy XGBoost binary dump to the native JSON format.
//!
//! Grounded on `original_source/src/xgbconv.c`: load the binary dump,
//! save it back out as JSON, exit 1 iff the save fails.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use vote_cli::{init_logging, CliResult};

#[derive(Parser)]
#[command(about = "Convert an xgboost model to the native JSON format")]
struct Args {
    /// Path to a legacy XGBoost binary dump
    input: PathBuf,
    /// Path to write the converted model in the native JSON format
    output: PathBuf,
}

fn run(args: Args) -> CliResult<ExitCode> {
    let ensemble = vote_io::xgboost::load_file(&args.input)?;
    vote_io::json::save_file(&ensemble, &args.output)?;
    Ok(ExitCode::SUCCESS)
}

fn main() -> ExitCode {
    init_logging();
    let args = Args::parse();
    match run(args) {
        Ok(code) => code,
        Err(err) => vote_cli::report_error("xgbconv", err),
    }
}
