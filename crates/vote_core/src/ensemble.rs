//! §3: `Ensemble` — an ordered sequence of trees sharing input/output
//! dimensions, plus a post-processing tag.

use crate::error::ModelError;
use crate::tree::Tree;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The ensemble-level output transform (§4.5).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PostProcess {
    /// Identity.
    None,
    /// Divide by the tree count (random-forest averaging).
    Divisor,
    /// Numerically-stabilized softmax.
    Softmax,
    /// Sigmoid, `sigma(x) = exp(x) / (1 + exp(x))`.
    ///
    /// Not named in spec.md's JSON-format field list, but required by
    /// §4.5 and the legacy binary format's `binary:logistic` objective
    /// (see SPEC_FULL.md's "Post-processing" section).
    Sigmoid,
}

impl PostProcess {
    pub fn parse(s: &str) -> Result<Self, ModelError> {
        match s {
            "none" => Ok(PostProcess::None),
            "divisor" => Ok(PostProcess::Divisor),
            "softmax" => Ok(PostProcess::Softmax),
            "sigmoid" => Ok(PostProcess::Sigmoid),
            other => Err(ModelError::UnknownPostProcess(other.to_string())),
        }
    }

    /// The wire string a loader's [`PostProcess::parse`] would read back,
    /// for format writers that need to round-trip the tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            PostProcess::None => "none",
            PostProcess::Divisor => "divisor",
            PostProcess::Softmax => "softmax",
            PostProcess::Sigmoid => "sigmoid",
        }
    }
}

/// A collection of trees sharing `n_in`/`n_out`, interpreted through a
/// shared post-processing transform.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Ensemble {
    trees: Vec<Tree>,
    post_process: PostProcess,
}

impl Ensemble {
    /// Build an ensemble from its trees, checking that `n_in`/`n_out` are
    /// uniform across all of them (§3: "All trees within one ensemble must
    /// share `nb_inputs` and `nb_outputs`").
    pub fn new(trees: Vec<Tree>, post_process: PostProcess) -> Result<Self, ModelError> {
        let first = trees.first().ok_or(ModelError::EmptyEnsemble)?;
        let n_in = first.n_in();
        let n_out = first.n_out();

        for (i, t) in trees.iter().enumerate() {
            if t.n_in() != n_in {
                return Err(ModelError::InputDimensionMismatch {
                    index: i,
                    got: t.n_in(),
                    expected: n_in,
                });
            }
            if t.n_out() != n_out {
                return Err(ModelError::OutputDimensionMismatch {
                    index: i,
                    got: t.n_out(),
                    expected: n_out,
                });
            }
        }

        Ok(Ensemble {
            trees,
            post_process,
        })
    }

    #[inline]
    pub fn trees(&self) -> &[Tree] {
        &self.trees
    }

    #[inline]
    pub fn tree_count(&self) -> usize {
        self.trees.len()
    }

    #[inline]
    pub fn n_in(&self) -> usize {
        self.trees[0].n_in()
    }

    #[inline]
    pub fn n_out(&self) -> usize {
        self.trees[0].n_out()
    }

    #[inline]
    pub fn post_process(&self) -> PostProcess {
        self.post_process
    }
}
