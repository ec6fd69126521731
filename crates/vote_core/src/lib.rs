//! vote_core — data model for verifying tree-ensemble properties by sound
//! interval analysis.
//!
//! This crate is I/O-free and has no knowledge of pipelines or predicates:
//! it defines the stable types shared across `vote_algo`, `vote_pipeline`,
//! `vote_io`, `vote_report`, and `vote_cli`.
//!
//! - [`Real`] — the ensemble-wide scalar precision.
//! - [`Bound`] — an inclusive interval `[lo, hi]`.
//! - [`Mapping`] — an (input box, output box) pair; the only way user
//!   predicates inspect an ensemble's output.
//! - [`Tree`] — an immutable struct-of-arrays decision tree.
//! - [`Ensemble`] / [`PostProcess`] — a collection of trees sharing
//!   dimensions, plus the output transform.
//! - [`Outcome`] — the three-valued PASS/FAIL/UNSURE verdict.
//!
//! Serialization derives are gated behind the `serde` feature.

pub mod bound;
pub mod ensemble;
pub mod error;
pub mod mapping;
pub mod outcome;
pub mod real;
pub mod tree;

pub use bound::Bound;
pub use ensemble::{Ensemble, PostProcess};
pub use error::ModelError;
pub use mapping::Mapping;
pub use outcome::Outcome;
pub use real::Real;
pub use tree::Tree;
