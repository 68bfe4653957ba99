//! Centralised error type for the relay pipeline.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RelayError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Database error: {0}")]
    Db(#[from] sqlx::Error),

    #[error("cannot analyse an empty sample")]
    EmptySample,

    #[error("no unique mode: {candidates} values tie for most common")]
    AmbiguousMode { candidates: usize },

    #[error("column {column} has non-numeric type {ty}")]
    NonNumeric { column: usize, ty: String },

    #[error("column index {column} out of range for row of width {width}")]
    ColumnOutOfBounds { column: usize, width: usize },

    #[error("HTTP error calling analysis API: {0}")]
    Http(#[from] reqwest::Error),

    #[error("analysis API returned {status}: {body}")]
    Api { status: u16, body: String },
}
