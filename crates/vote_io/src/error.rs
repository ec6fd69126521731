//! Unified error type for every loader in this crate.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IoError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed model: {0}")]
    Model(#[from] vote_core::ModelError),

    #[error("malformed legacy binary dump: {0}")]
    Binary(String),

    #[error("unsupported objective function: {0:?}")]
    UnsupportedObjective(String),

    #[error("malformed csv at {file}:{line}: {reason}")]
    Csv {
        file: String,
        line: usize,
        reason: String,
    },

    #[error("empty dataset")]
    EmptyDataset,

    #[error("ragged csv: row {row} has {got} columns, expected {expected}")]
    RaggedCsv {
        row: usize,
        got: usize,
        expected: usize,
    },
}

pub type IoResult<T> = Result<T, IoError>;
