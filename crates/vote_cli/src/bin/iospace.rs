//! Print a single sound over-approximation of a model's input/output space.
//!
//! Grounded on `original_source/src/iospace.c`: a single `approximate`
//! call over the unbounded domain, with no refinement.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use vote_cli::{init_logging, load_model, unbounded_domain, CliResult};
use vote_pipeline::EnsembleVerify;

#[derive(Parser)]
#[command(about = "Print the input/output space of a model")]
struct Args {
    /// Path to a serialized tree-based model
    model: PathBuf,
}

fn run(args: Args) -> CliResult<ExitCode> {
    let ensemble = load_model(&args.model)?;
    let domain = unbounded_domain(ensemble.n_in());

    let m = ensemble.approximate(&domain)?;

    for (i, b) in m.inputs.iter().enumerate() {
        println!("x{i} in [{}, {}]", b.lo, b.hi);
    }
    for (i, b) in m.outputs.iter().enumerate() {
        println!("y{i} in [{}, {}]", b.lo, b.hi);
    }

    Ok(ExitCode::SUCCESS)
}

fn main() -> ExitCode {
    init_logging();
    let args = Args::parse();
    match run(args) {
        Ok(code) => code,
        Err(err) => vote_cli::report_error("iospace", err),
    }
}
