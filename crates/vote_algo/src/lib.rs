//! vote_algo — the refinery (exact partitioning) and abstractor (sound
//! join) tree-walking algorithms, plus ensemble-level post-processing
//! transforms.
//!
//! Depends only on `vote_core`: every function here takes borrowed
//! [`vote_core::Tree`]/[`vote_core::Mapping`] data and a generic sink
//! closure, and has no notion of a staged pipeline or trait objects (that
//! orchestration lives in `vote_pipeline`, which adapts these functions
//! into `Stage` implementations).

#![forbid(unsafe_code)]

pub mod abstractor;
pub mod postproc;
pub mod refinery;
