//! Print every precise mapping of a model to stdout.
//!
//! Grounded on `original_source/src/mappings.c`: `forall` the unbounded
//! domain, printing each precise mapping as it is visited.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use vote_cli::{init_logging, load_model, unbounded_domain, CliResult};
use vote_core::{Mapping, Outcome};
use vote_pipeline::EnsembleVerify;

#[derive(Parser)]
#[command(about = "Print all mappings of a model")]
struct Args {
    /// Path to a serialized tree-based model
    model: PathBuf,
}

fn run(args: Args) -> CliResult<ExitCode> {
    let ensemble = load_model(&args.model)?;
    let domain = unbounded_domain(ensemble.n_in());

    ensemble.forall(&domain, |m: &mut Mapping| {
        debug_assert!(m.precise());
        println!("{m}");
        Outcome::Pass
    })?;

    Ok(ExitCode::SUCCESS)
}

fn main() -> ExitCode {
    init_logging();
    let args = Args::parse();
    match run(args) {
        Ok(code) => code,
        Err(err) => vote_cli::report_error("mappings", err),
    }
}
