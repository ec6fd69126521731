//! Check that every output of a model falls within given min/max bounds.
//!
//! Grounded on `original_source/src/range.c`: `absref` the unbounded input
//! domain against a predicate that fails (and prints a counter-example)
//! the moment a precise mapping's outputs land outside the requested
//! range, passes when every output dimension is inside it, and stays
//! UNSURE while the mapping remains imprecise.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;

use vote_cli::{init_logging, load_model, unbounded_domain, CliResult};
use vote_core::{Bound, Mapping, Outcome};
use vote_pipeline::EnsembleVerify;
use vote_report::{pass_fail, EnsembleSummary, KeyValueWriter};

#[derive(Parser)]
#[command(about = "Check the plausibility of a model's output range")]
struct Args {
    /// Path to a serialized tree-based model
    model: PathBuf,
    /// Alternating min/max bounds, two per output dimension
    bounds: Vec<f64>,
}

fn is_within_range(m: &mut Mapping, range: &[Bound]) -> Outcome {
    let all_within = m
        .outputs
        .iter()
        .zip(range)
        .all(|(out, r)| out.lo >= r.lo && out.hi <= r.hi);

    if all_within {
        return Outcome::Pass;
    }

    if m.precise() {
        println!("range:counter-example: {m}");
        Outcome::Fail
    } else {
        Outcome::Unsure
    }
}

fn run(args: Args) -> CliResult<ExitCode> {
    let ensemble = load_model(&args.model)?;

    if args.bounds.len() != ensemble.n_out() * 2 {
        return Err(vote_cli::CliError::Usage(format!(
            "expected {} min/max arguments, got {}",
            ensemble.n_out() * 2,
            args.bounds.len()
        )));
    }

    let mut w = KeyValueWriter::stdout("range");
    let summary = EnsembleSummary::of(&ensemble).with_filename(args.model.display().to_string());
    summary.write_preamble(&mut w).ok();

    let start = Instant::now();
    let domain = unbounded_domain(ensemble.n_in());

    let range: Vec<Bound> = args
        .bounds
        .chunks_exact(2)
        .map(|pair| Bound::new(pair[0] as vote_core::Real, pair[1] as vote_core::Real))
        .collect();

    let requirement = range
        .iter()
        .enumerate()
        .map(|(i, b)| format!("y{i} in [{}, {}]", b.lo, b.hi))
        .collect::<Vec<_>>()
        .join(", ");
    w.line("requirement", requirement).ok();

    let passed = ensemble.absref(&domain, |m: &mut Mapping| is_within_range(m, &range))?;

    w.line("result", pass_fail(passed)).ok();
    w.line("runtime", format!("{}s", start.elapsed().as_secs()))
        .ok();

    Ok(vote_cli::exit_on(passed))
}

fn main() -> ExitCode {
    init_logging();
    let args = Args::parse();
    match run(args) {
        Ok(code) => code,
        Err(err) => vote_cli::report_error("range", err),
    }
}
