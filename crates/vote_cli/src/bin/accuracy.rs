//! Print a model's classification accuracy over a labeled CSV dataset.
//!
//! Grounded on `original_source/src/accuracy.c`: load a model and dataset,
//! `eval` every row, compare the argmax prediction against the final
//! column's label, and report the fraction correct.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use vote_cli::{init_logging, load_model, CliResult};
use vote_pipeline::EnsembleVerify;
use vote_report::{EnsembleSummary, KeyValueWriter};

#[derive(Parser)]
#[command(about = "Print the accuracy of a model for a set of samples")]
struct Args {
    /// Path to a serialized tree-based model
    model: PathBuf,
    /// Path to a labeled CSV dataset
    dataset: PathBuf,
}

fn argmax(values: &[vote_core::Real]) -> usize {
    values
        .iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.partial_cmp(b).expect("non-NaN probability"))
        .map(|(i, _)| i)
        .expect("at least one output")
}

fn run(args: Args) -> CliResult<ExitCode> {
    let ensemble = load_model(&args.model)?;
    let dataset = vote_io::csv::load_file(&args.dataset)?;

    let mut w = KeyValueWriter::stdout("accuracy");
    let summary = EnsembleSummary::of(&ensemble).with_filename(args.model.display().to_string());
    summary.write_preamble(&mut w).ok();
    w.line("nb_samples", dataset.nb_rows()).ok();

    let mut correct = 0usize;
    let mut outputs = vec![0.0; ensemble.n_out()];
    for row in 0..dataset.nb_rows() {
        ensemble.eval(dataset.features(row), &mut outputs)?;
        let predicted = argmax(&outputs);
        let label = dataset.label(row).round() as usize;
        correct += (predicted == label) as usize;
    }

    let score = correct as f64 / dataset.nb_rows() as f64;
    w.line("score", score).ok();

    Ok(ExitCode::SUCCESS)
}

fn main() -> ExitCode {
    init_logging();
    let args = Args::parse();
    match run(args) {
        Ok(code) => code,
        Err(err) => vote_cli::report_error("accuracy", err),
    }
}
