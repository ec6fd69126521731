//! §3/§4.2: `Tree` — an immutable, struct-of-arrays binary decision tree.

use crate::error::ModelError;
use crate::real::Real;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Split semantics: *left* covers `x[feature] <= threshold`; *right*
/// covers `x[feature] > threshold`.
///
/// A leaf is indicated by both `left[i] < 0` and `right[i] < 0`. Node 0 is
/// always the root.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Tree {
    left: Vec<i64>,
    right: Vec<i64>,
    feature: Vec<i64>,
    threshold: Vec<Real>,
    value: Vec<Vec<Real>>,
    normalize: bool,
    n_in: usize,
    n_out: usize,
}

impl Tree {
    /// Build a tree from its struct-of-arrays parts, validating the
    /// invariants from spec.md §3: consistent array lengths, every node
    /// either a full leaf or a full internal node, and in-range feature
    /// indices.
    ///
    /// This is the recoverable counterpart of the original loader's
    /// `assert`s (§7: malformed models are a load-time failure, not a
    /// programmer error).
    pub fn from_parts(
        n_in: usize,
        n_out: usize,
        left: Vec<i64>,
        right: Vec<i64>,
        feature: Vec<i64>,
        threshold: Vec<Real>,
        value: Vec<Vec<Real>>,
        normalize: bool,
    ) -> Result<Self, ModelError> {
        let n_nodes = left.len();
        if n_nodes == 0 {
            return Err(ModelError::EmptyTree { nb_nodes: 0 });
        }
        if right.len() != n_nodes {
            return Err(ModelError::InconsistentLength { what: "right" });
        }
        if feature.len() != n_nodes {
            return Err(ModelError::InconsistentLength { what: "feature" });
        }
        if threshold.len() != n_nodes {
            return Err(ModelError::InconsistentLength { what: "threshold" });
        }
        if value.len() != n_nodes {
            return Err(ModelError::InconsistentLength { what: "value" });
        }
        for row in &value {
            if row.len() != n_out {
                return Err(ModelError::InconsistentLength { what: "value row" });
            }
        }

        for i in 0..n_nodes {
            let is_leaf = left[i] < 0;
            if is_leaf != (right[i] < 0) {
                return Err(ModelError::MixedLeafInternal {
                    node: i,
                    left: left[i],
                    right: right[i],
                });
            }
            if !is_leaf && (feature[i] < 0 || feature[i] as usize >= n_in) {
                return Err(ModelError::FeatureOutOfRange {
                    node: i,
                    feature: feature[i],
                    nb_inputs: n_in,
                });
            }
        }

        Ok(Tree {
            left,
            right,
            feature,
            threshold,
            value,
            normalize,
            n_in,
            n_out,
        })
    }

    #[inline]
    pub fn n_in(&self) -> usize {
        self.n_in
    }

    #[inline]
    pub fn n_out(&self) -> usize {
        self.n_out
    }

    #[inline]
    pub fn n_nodes(&self) -> usize {
        self.left.len()
    }

    #[inline]
    pub fn normalize(&self) -> bool {
        self.normalize
    }

    #[inline]
    pub fn is_leaf(&self, node: usize) -> bool {
        self.left[node] < 0
    }

    #[inline]
    pub fn left(&self, node: usize) -> usize {
        debug_assert!(!self.is_leaf(node));
        self.left[node] as usize
    }

    #[inline]
    pub fn right(&self, node: usize) -> usize {
        debug_assert!(!self.is_leaf(node));
        self.right[node] as usize
    }

    #[inline]
    pub fn feature(&self, node: usize) -> usize {
        debug_assert!(!self.is_leaf(node));
        self.feature[node] as usize
    }

    #[inline]
    pub fn threshold(&self, node: usize) -> Real {
        self.threshold[node]
    }

    /// The leaf's raw output vector, L1-normalized first iff `normalize()`.
    pub fn leaf_value(&self, node: usize) -> Vec<Real> {
        debug_assert!(self.is_leaf(node));
        let mut v = self.value[node].clone();
        if self.normalize {
            let sum: Real = v.iter().sum();
            debug_assert!(sum != 0.0, "normalize: leaf {node} sums to zero");
            for x in &mut v {
                *x /= sum;
            }
        }
        v
    }

    /// The node's value row exactly as stored, without the normalization
    /// [`Tree::leaf_value`] applies. Used by format savers that need to
    /// round-trip a tree's raw arrays (for example `vote_io`'s JSON writer).
    pub fn raw_value(&self, node: usize) -> &[Real] {
        &self.value[node]
    }

    /// The raw `left` entry for `node`, negative for a leaf. Bypasses the
    /// leaf/internal assertion [`Tree::left`] makes, for serializers that
    /// walk every node regardless of kind.
    pub fn raw_left(&self, node: usize) -> i64 {
        self.left[node]
    }

    /// The raw `right` entry for `node`, negative for a leaf. See
    /// [`Tree::raw_left`].
    pub fn raw_right(&self, node: usize) -> i64 {
        self.right[node]
    }

    /// The raw `feature` entry for `node`, meaningless for a leaf. See
    /// [`Tree::raw_left`].
    pub fn raw_feature(&self, node: usize) -> i64 {
        self.feature[node]
    }

    pub const ROOT: usize = 0;
}
