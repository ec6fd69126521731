//! Measure how many precise mappings per second a model's refinery visits.
//!
//! Grounded on `original_source/src/throughput.c`: `forall` the unbounded
//! domain counting precise mappings, reporting mappings-per-second once
//! the traversal completes (the original's live `\r`-updated progress
//! line is a terminal-only nicety; this prints the final rate once,
//! matching the ambient stack's preference for one deterministic line
//! per run over a stream of partial ones).

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;

use vote_cli::{init_logging, load_model, unbounded_domain, CliResult};
use vote_core::{Mapping, Outcome};
use vote_pipeline::EnsembleVerify;
use vote_report::{EnsembleSummary, KeyValueWriter};

#[derive(Parser)]
#[command(about = "Dump throughput (precise mappings per second) of a model")]
struct Args {
    /// Path to a serialized tree-based model
    model: PathBuf,
}

fn run(args: Args) -> CliResult<ExitCode> {
    let ensemble = load_model(&args.model)?;

    let mut w = KeyValueWriter::stdout("throughput");
    let summary = EnsembleSummary::of(&ensemble).with_filename(args.model.display().to_string());
    summary.write_preamble(&mut w).ok();

    let domain = unbounded_domain(ensemble.n_in());
    let mut nb_mappings = 0u64;
    let start = Instant::now();

    ensemble.forall(&domain, |m: &mut Mapping| {
        if !m.precise() {
            return Outcome::Unsure;
        }
        nb_mappings += 1;
        Outcome::Pass
    })?;

    let elapsed = start.elapsed().as_secs_f64().max(f64::MIN_POSITIVE);
    let speed_mps = nb_mappings as f64 / elapsed / 1_000_000.0;
    w.line("speed", format!("{speed_mps:.2}M/s")).ok();

    Ok(ExitCode::SUCCESS)
}

fn main() -> ExitCode {
    init_logging();
    let args = Args::parse();
    match run(args) {
        Ok(code) => code,
        Err(err) => vote_cli::report_error("throughput", err),
    }
}
