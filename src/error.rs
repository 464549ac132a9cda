//! Error types for sounder.
//!
//! Uses `thiserror` for ergonomic error definitions.

use std::path::PathBuf;
use thiserror::Error;

/// Engine-level failures that prevent concurrent execution.
///
/// These are infrastructure errors, not per-probe errors: a per-probe
/// failure is always captured inside its `ProbeResult`, while an
/// `EngineError` means the worker pool itself could not be used and the
/// scheduler degrades to sequential probing.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("worker pool unavailable: {0}")]
    PoolUnavailable(String),
}

/// Result type alias for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Fatal command-line level errors.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("no targets specified; use --target, --list, or pipe targets to stdin")]
    NoTargets,

    #[error("failed to read target list {path}: {reason}")]
    TargetList { path: PathBuf, reason: String },

    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[from] reqwest::Error),

    #[error("failed to write output to {path}: {reason}")]
    OutputWrite { path: PathBuf, reason: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for CLI operations.
pub type CliResult<T> = Result<T, CliError>;
