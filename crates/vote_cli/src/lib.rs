//! vote_cli — shared plumbing for the ten command-line tools in `src/bin/`.
//!
//! Each binary is grounded one-to-one on a file in `original_source/src/`
//! (or, for `acasxu`/`mnist`, `original_source/examples/`): it loads a
//! model, drives one `vote_pipeline` operation over it, and prints
//! `tool:field: value` lines via [`vote_report`]. This crate holds the
//! handful of things every tool repeats: model loading, the unbounded
//! domain box, and the shared exit-code convention (§6: "exit code 0 on
//! success, 1 on argument error").

#![forbid(unsafe_code)]

use std::path::Path;
use std::process::ExitCode;

use thiserror::Error;

use vote_core::{Bound, Ensemble};
use vote_io::IoError;
use vote_pipeline::PipelineError;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Io(#[from] IoError),

    #[error("{0}")]
    Pipeline(#[from] PipelineError),

    #[error("{0}")]
    Usage(String),
}

pub type CliResult<T> = Result<T, CliError>;

/// Load a model in the native JSON format, the only format every tool but
/// `xgbconv` accepts (the legacy binary dump is xgbconv's input format,
/// not a general model source).
pub fn load_model(path: &Path) -> CliResult<Ensemble> {
    vote_io::json::load_file(path).map_err(CliError::from)
}

/// An `n`-dimensional box covering every representable input, the starting
/// domain every tool refines from.
pub fn unbounded_domain(n: usize) -> Vec<Bound> {
    vec![Bound::UNBOUNDED; n]
}

/// Initialize `env_logger` once per process; every tool calls this first
/// so `RUST_LOG` controls its diagnostic verbosity the same way across the
/// whole CLI surface.
pub fn init_logging() {
    let _ = env_logger::try_init();
}

/// Map a [`CliError`] to the exit-code convention every tool shares:
/// argument/load errors exit 1 after printing the error to stderr.
pub fn report_error(tool: &str, err: CliError) -> ExitCode {
    eprintln!("{tool}: error: {err}");
    ExitCode::FAILURE
}

/// `ExitCode::SUCCESS` iff `passed`, matching the original's `return !b`
/// idiom (0 on a passing verdict, 1 otherwise).
pub fn exit_on(passed: bool) -> ExitCode {
    if passed {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unbounded_domain_has_the_requested_dimension() {
        let d = unbounded_domain(3);
        assert_eq!(d.len(), 3);
        assert!(d.iter().all(|b| *b == Bound::UNBOUNDED));
    }

    #[test]
    fn exit_on_maps_bool_to_the_original_exit_convention() {
        assert_eq!(exit_on(true), ExitCode::SUCCESS);
        assert_eq!(exit_on(false), ExitCode::FAILURE);
    }
}
