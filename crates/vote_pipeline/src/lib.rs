//! vote_pipeline — the staged pipeline abstraction and the ensemble driver.
//!
//! - [`stage::Stage`] — one link in a verification chain (refinery,
//!   abstractor, or post-processing), expressed as a trait object so
//!   chains can be built bottom-up and dropped with ordinary ownership.
//! - [`driver::EnsembleVerify`] — `forall`/`absref`/`eval`/`approximate`,
//!   the four public entry points that wire stages together and log
//!   structured diagnostics about a verification run.
//! - [`error::PipelineError`] — recoverable errors at the API boundary
//!   (dimension mismatches); internal invariants stay `debug_assert!`.

#![forbid(unsafe_code)]

pub mod driver;
pub mod error;
pub mod stage;

pub use driver::EnsembleVerify;
pub use error::PipelineError;
pub use stage::{AbstractorStage, PostProcessStage, RefineryStage, Stage};
