//! Count the number of precise (fully-refined) mappings of a model.
//!
//! Grounded on `original_source/src/cardinality.c`: `forall` the unbounded
//! domain with a predicate that always passes, counting how many exact
//! leaf-combination mappings the refinery visits.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use vote_cli::{init_logging, load_model, unbounded_domain, CliResult};
use vote_core::{Mapping, Outcome};
use vote_pipeline::EnsembleVerify;
use vote_report::{EnsembleSummary, KeyValueWriter};

#[derive(Parser)]
#[command(about = "Print the number of mappings of a model")]
struct Args {
    /// Path to a serialized tree-based model
    model: PathBuf,
}

fn run(args: Args) -> CliResult<ExitCode> {
    let ensemble = load_model(&args.model)?;

    let mut w = KeyValueWriter::stdout("cardinality");
    let summary = EnsembleSummary::of(&ensemble).with_filename(args.model.display().to_string());
    summary.write_preamble(&mut w).ok();

    let domain = unbounded_domain(ensemble.n_in());
    let mut nb_mappings = 0usize;
    ensemble.forall(&domain, |m: &mut Mapping| {
        debug_assert!(m.precise());
        nb_mappings += 1;
        Outcome::Pass
    })?;

    w.line("nb_mappings", nb_mappings).ok();

    Ok(ExitCode::SUCCESS)
}

fn main() -> ExitCode {
    init_logging();
    let args = Args::parse();
    match run(args) {
        Ok(code) => code,
        Err(err) => vote_cli::report_error("cardinality", err),
    }
}
