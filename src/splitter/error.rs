use crate::filter::FilterError;
use std::path::PathBuf;
use thiserror::Error;

/// Problems with the run options, detected before any file is touched
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("No input selected; choose a log file or directory first")]
    MissingInput,

    #[error("Input path '{}' is neither a file nor a directory", .0.display())]
    InputNotFound(PathBuf),

    #[error("No output directory selected")]
    MissingOutputDir,

    #[error(transparent)]
    Filter(#[from] FilterError),
}

/// Errors that abort a run
#[derive(Debug, Error)]
pub enum SplitError {
    #[error("Failed to read '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to create output directory '{}': {source}", path.display())]
    CreateOutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to scan directory '{}': {source}", path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}
