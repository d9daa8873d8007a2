//! Error handling for the menu-probe crate.

use std::{io, path::PathBuf, result};

use thiserror::Error;

/// Convenient result type for menu-probe operations.
pub type Result<T> = result::Result<T, Error>;

/// Errors that can occur while running a probe command.
#[derive(Debug, Error)]
pub enum Error {
    /// Wrapper for standard I/O errors.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// Reading an input file failed.
    #[error("failed to read {path}: {source}")]
    ReadFile {
        /// File that could not be read.
        path: PathBuf,
        /// Underlying error.
        source: io::Error,
    },
    /// JSON input or output failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// Policy or request validation failed.
    #[error("menu error: {0}")]
    Menu(#[from] anchored_menu::Error),
    /// The placement policy given on the command line is invalid.
    #[error("invalid policy: {0}")]
    Policy(#[from] anchor_geom::PolicyError),
}
