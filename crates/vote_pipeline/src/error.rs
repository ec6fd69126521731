//! Errors surfaced at the pipeline's public API boundary.
//!
//! Per §7's split between "Malformed model" (recoverable) and "Precondition
//! violations" (programmer error): the original asserts on an out-of-range
//! `argmax_check` class or a zero softmax sum inside the hot recursive
//! path, where a `Result` would be prohibitively awkward to thread through.
//! This crate keeps `debug_assert!` there, and only wraps the handful of
//! checks a caller can trip from the outside (dimension mismatches between
//! a query's input box and the ensemble) as a recoverable [`PipelineError`].

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PipelineError {
    #[error("input region has {got} dimensions, ensemble expects {expected}")]
    InputDimensionMismatch { got: usize, expected: usize },

    #[error("concrete input vector has {got} dimensions, ensemble expects {expected}")]
    ConcreteInputMismatch { got: usize, expected: usize },
}
