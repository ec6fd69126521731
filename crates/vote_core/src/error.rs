//! Error types for malformed models (§7: "Malformed model" is fatal at
//! load, but recoverable at the API boundary as a `Result`).

use thiserror::Error;

/// Structural problems detected while constructing a [`crate::tree::Tree`]
/// or [`crate::ensemble::Ensemble`].
///
/// These correspond to spec.md §7's "Malformed model" category: missing
/// fields, inconsistent dimensions, a bad enum string. They are surfaced to
/// the loader's caller rather than asserted, since a malformed file is an
/// expected failure mode, not a programmer error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("tree has inconsistent array lengths: {what}")]
    InconsistentLength { what: &'static str },

    #[error("node {node} is neither a full leaf nor a full internal node (left={left}, right={right})")]
    MixedLeafInternal {
        node: usize,
        left: i64,
        right: i64,
    },

    #[error("node {node} feature index {feature} is out of range for nb_inputs={nb_inputs}")]
    FeatureOutOfRange {
        node: usize,
        feature: i64,
        nb_inputs: usize,
    },

    #[error("tree has {nb_nodes} nodes but no root")]
    EmptyTree { nb_nodes: usize },

    #[error("ensemble has no trees")]
    EmptyEnsemble,

    #[error("tree {index} has nb_inputs={got}, expected {expected} (from tree 0)")]
    InputDimensionMismatch {
        index: usize,
        got: usize,
        expected: usize,
    },

    #[error("tree {index} has nb_outputs={got}, expected {expected} (from tree 0)")]
    OutputDimensionMismatch {
        index: usize,
        got: usize,
        expected: usize,
    },

    #[error("unknown post-processing tag: {0:?}")]
    UnknownPostProcess(String),

    #[error("bound has lo={lo} > hi={hi}, or a NaN endpoint")]
    InvalidBound { lo: f64, hi: f64 },
}
