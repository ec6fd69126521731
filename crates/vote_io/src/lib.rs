//! vote_io — ensemble and dataset loaders: the native JSON format, the
//! legacy XGBoost binary dump, and CSV datasets.
//!
//! Every loader here builds `vote_core` values through their validating
//! constructors ([`vote_core::Tree::from_parts`], [`vote_core::Ensemble::new`]),
//! so a malformed file surfaces as an [`error::IoError`] rather than a panic.

#![forbid(unsafe_code)]

pub mod csv;
pub mod error;
pub mod json;
pub mod xgboost;

pub use error::{IoError, IoResult};

pub mod prelude {
    pub use crate::csv::Dataset;
    pub use crate::error::{IoError, IoResult};
    pub use crate::{csv, json, xgboost};
}
