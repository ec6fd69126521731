//! Verify robustness of a classifier against additive input perturbations.
//!
//! Grounded on `original_source/src/robustness.c`: for every correctly
//! classified sample, widen its input box by `±margin` and check with
//! `absref` that the argmax class is unchanged. Samples that take longer
//! than `timeout` seconds to decide count as timeouts rather than passes
//! or failures, matching the original's per-sample wall-clock guard.

use std::fs::File;
use std::io::{BufWriter, Write as _};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{Duration, Instant};

use clap::Parser;

use vote_core::{Bound, Mapping, Outcome, Real};
use vote_cli::{init_logging, load_model, CliResult};
use vote_pipeline::EnsembleVerify;
use vote_report::{EnsembleSummary, KeyValueWriter};

#[derive(Parser)]
#[command(about = "Verify robustness of a classifier against input perturbations")]
struct Args {
    /// Path to a serialized tree-based model
    #[arg(short = 'm', long)]
    model: PathBuf,
    /// Additive margin to which the classifier should be robust
    #[arg(short = 'M', long, default_value_t = 0.0)]
    margin: Real,
    /// Write counter-examples in the CSV format to PATH
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,
    /// Timeout the analysis of a sample after NUMBER seconds
    #[arg(short = 'T', long)]
    timeout: Option<u64>,
    /// Labeled CSV dataset
    csv_file: PathBuf,
}

fn run(args: Args) -> CliResult<ExitCode> {
    let ensemble = load_model(&args.model)?;
    let dataset = vote_io::csv::load_file(&args.csv_file)?;
    let timeout = args.timeout.map(Duration::from_secs);

    let mut output = match &args.output {
        Some(path) => Some(BufWriter::new(File::create(path).map_err(vote_io::IoError::from)?)),
        None => None,
    };

    let mut w = KeyValueWriter::stdout("robustness");
    let summary = EnsembleSummary::of(&ensemble).with_filename(args.model.display().to_string());
    summary.write_preamble(&mut w).ok();
    w.line("margin", args.margin).ok();
    w.line("nb_samples", dataset.nb_rows()).ok();

    let mut nb_passed = 0usize;
    let mut nb_timeouts = 0usize;
    let start = Instant::now();

    for row in 0..dataset.nb_rows() {
        let features = dataset.features(row);
        let label = dataset.label(row).round() as usize;

        let exact: Vec<Bound> = features.iter().map(|&x| Bound::point(x)).collect();

        let mut is_correct = |m: &mut Mapping| -> Outcome {
            if let Some(t) = timeout {
                if start.elapsed() > t {
                    nb_timeouts += 1;
                    return Outcome::Fail;
                }
            }
            let o = m.argmax_check(label);
            if o == Outcome::Fail {
                if let Some(out) = output.as_mut() {
                    for b in &m.inputs {
                        let mid = b.lo + (b.hi - b.lo) / 2.0;
                        write!(out, "{mid},").ok();
                    }
                    let predicted = m.argmax().unwrap_or(label);
                    writeln!(out, "{label} # predicted({predicted})").ok();
                }
            }
            o
        };

        if !ensemble.absref(&exact, &mut is_correct)? {
            continue;
        }

        let perturbed: Vec<Bound> = features
            .iter()
            .map(|&x| Bound::new(x - args.margin, x + args.margin))
            .collect();

        if ensemble.absref(&perturbed, &mut is_correct)? {
            nb_passed += 1;
        }
    }

    let runtime = start.elapsed();

    w.line("passed", nb_passed).ok();
    w.line("timeouts", nb_timeouts).ok();
    if nb_timeouts > 0 {
        let lo = nb_passed as f64 / dataset.nb_rows() as f64;
        let hi = (nb_passed + nb_timeouts) as f64 / dataset.nb_rows() as f64;
        w.line("score", format!("[{lo},{hi}]")).ok();
    } else {
        w.line("score", nb_passed as f64 / dataset.nb_rows() as f64)
            .ok();
    }
    w.line("runtime", format!("{}s", runtime.as_secs())).ok();

    Ok(ExitCode::SUCCESS)
}

fn main() -> ExitCode {
    init_logging();
    let args = Args::parse();
    match run(args) {
        Ok(code) => code,
        Err(err) => vote_cli::report_error("robustness", err),
    }
}
