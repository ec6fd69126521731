//! Verify robustness of an MNIST digit classifier against a sliding
//! window of bounded per-pixel noise.
//!
//! Grounded on `original_source/examples/mnist.c`: for every correctly
//! classified 28x28 image, slide a `window`x`window` square of
//! `±threshold` pixel noise across the image and check with `forall`
//! that the argmax digit never changes. The original's `save_image`
//! helper writes a `.pgm` dump of each probed window but is never called
//! from `main`; this tool keeps the verification loop and drops that
//! dead code.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;

use vote_cli::{init_logging, load_model, CliResult};
use vote_core::{Bound, Mapping, Outcome, Real};
use vote_pipeline::EnsembleVerify;
use vote_report::{EnsembleSummary, KeyValueWriter};

const IMG_HEIGHT: usize = 28;
const IMG_WIDTH: usize = 28;

#[derive(Parser)]
#[command(about = "Verify robustness of an MNIST classifier against windowed noise")]
struct Args {
    /// Path to a serialized tree-based model
    model: PathBuf,
    /// Labeled CSV dataset of flattened 28x28 images
    dataset: PathBuf,
    /// Side length, in pixels, of the sliding noise window
    window: usize,
    /// Additive per-pixel noise threshold within the window
    threshold: Real,
}

fn argmax(values: &[Real]) -> usize {
    values
        .iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.partial_cmp(b).expect("non-NaN probability"))
        .map(|(i, _)| i)
        .expect("at least one output")
}

fn windowed_bound(image: &[Real], x0: usize, y0: usize, window: usize, threshold: Real) -> Vec<Bound> {
    let mut bound = Vec::with_capacity(IMG_HEIGHT * IMG_WIDTH);
    for y in 0..IMG_HEIGHT {
        for x in 0..IMG_WIDTH {
            let px = image[y * IMG_WIDTH + x];
            let in_window = x >= x0 && x <= x0 + window && y >= y0 && y <= y0 + window;
            let (lo, hi) = if in_window {
                (px - threshold, px + threshold)
            } else {
                (px, px)
            };
            bound.push(Bound::new(lo.max(0.0), hi.min(255.0)));
        }
    }
    bound
}

fn run(args: Args) -> CliResult<ExitCode> {
    let ensemble = load_model(&args.model)?;
    let dataset = vote_io::csv::load_file(&args.dataset)?;

    if ensemble.n_in() != IMG_HEIGHT * IMG_WIDTH {
        return Err(vote_cli::CliError::Usage(format!(
            "expected a {}-input model, got {}",
            IMG_HEIGHT * IMG_WIDTH,
            ensemble.n_in()
        )));
    }

    let mut w = KeyValueWriter::stdout("mnist");
    let summary = EnsembleSummary::of(&ensemble).with_filename(args.model.display().to_string());
    summary.write_preamble(&mut w).ok();
    w.line("nb_samples", dataset.nb_rows()).ok();
    w.line("window", args.window).ok();
    w.line("threshold", args.threshold).ok();

    let mut outputs = vec![0.0; ensemble.n_out()];
    let mut score = 0usize;
    let start = Instant::now();

    for row in 0..dataset.nb_rows() {
        let image = dataset.features(row);
        let label = dataset.label(row).round() as usize;

        ensemble.eval(image, &mut outputs)?;
        if argmax(&outputs) != label {
            continue;
        }

        let mut robust = true;
        'windows: for y in 0..IMG_HEIGHT.saturating_sub(args.window) {
            for x in 0..IMG_WIDTH.saturating_sub(args.window) {
                let bound = windowed_bound(image, x, y, args.window, args.threshold);
                let is_correct = |m: &mut Mapping| m.argmax_check(label);
                if !ensemble.forall(&bound, is_correct)? {
                    robust = false;
                    break 'windows;
                }
            }
        }

        score += robust as usize;
    }

    w.line("score", score as f64 / dataset.nb_rows() as f64).ok();
    w.line("runtime", format!("{}s", start.elapsed().as_secs()))
        .ok();

    Ok(ExitCode::SUCCESS)
}

fn main() -> ExitCode {
    init_logging();
    let args = Args::parse();
    match run(args) {
        Ok(code) => code,
        Err(err) => vote_cli::report_error("mnist", err),
    }
}
