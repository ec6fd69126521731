//! vote_report — `key: value` line formatting for the `vote_cli` tools.
//!
//! Grounded on the `printf("<tool>:<field>: ...")` preambles shared by
//! `original_source/src/{accuracy,range,robustness,cardinality,throughput}.c`:
//! every tool prints the model's `filename`/`nb_inputs`/`nb_outputs`/
//! `nb_trees`/`nb_nodes` before its own result lines. [`EnsembleSummary`]
//! captures that shared preamble once instead of five copies of the same
//! five `println!` calls, and [`KeyValueWriter`] gives every tool the same
//! `tool:field: value` line shape.

#![forbid(unsafe_code)]

use std::fmt::Display;
use std::io::{self, Write};

use vote_core::Ensemble;

#[cfg(feature = "serde")]
use serde::Serialize;

/// Writes `"<tool>:<field>: <value>"` lines to an underlying [`Write`], one
/// call per field, in the order the CLI tool asks for them.
pub struct KeyValueWriter<W: Write> {
    tool: &'static str,
    out: W,
}

impl<W: Write> KeyValueWriter<W> {
    pub fn new(tool: &'static str, out: W) -> Self {
        KeyValueWriter { tool, out }
    }

    /// Emit one `tool:field: value` line.
    pub fn line(&mut self, field: &str, value: impl Display) -> io::Result<()> {
        writeln!(self.out, "{}:{}: {}", self.tool, field, value)
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl KeyValueWriter<io::Stdout> {
    /// The common case: write to stdout, matching every tool in
    /// `original_source/src` (none of them write results anywhere else).
    pub fn stdout(tool: &'static str) -> Self {
        KeyValueWriter::new(tool, io::stdout())
    }
}

/// The model-shape preamble every `vote_cli` tool prints before its own
/// result lines: dimensions and counts, plus an optional source filename.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct EnsembleSummary {
    pub filename: Option<String>,
    pub n_in: usize,
    pub n_out: usize,
    pub nb_trees: usize,
    pub nb_nodes: usize,
}

impl EnsembleSummary {
    pub fn of(ensemble: &Ensemble) -> Self {
        EnsembleSummary {
            filename: None,
            n_in: ensemble.n_in(),
            n_out: ensemble.n_out(),
            nb_trees: ensemble.tree_count(),
            nb_nodes: ensemble.trees().iter().map(|t| t.n_nodes()).sum(),
        }
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    /// Write the preamble lines in the order every tool prints them:
    /// filename (if any), nb_inputs, nb_outputs, nb_trees, nb_nodes.
    pub fn write_preamble<W: Write>(&self, w: &mut KeyValueWriter<W>) -> io::Result<()> {
        if let Some(filename) = &self.filename {
            w.line("filename", filename)?;
        }
        w.line("nb_inputs", self.n_in)?;
        w.line("nb_outputs", self.n_out)?;
        w.line("nb_trees", self.nb_trees)?;
        w.line("nb_nodes", self.nb_nodes)
    }
}

/// Render an [`vote_core::Outcome`]-derived pass/fail as the lowercase
/// `"pass"`/`"fail"` tokens `range.c` and `robustness.c` print.
pub fn pass_fail(passed: bool) -> &'static str {
    if passed {
        "pass"
    } else {
        "fail"
    }
}
