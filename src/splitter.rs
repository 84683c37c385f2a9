//! The filtering engine: single files and directory trees
//!
//! Everything here runs synchronously on the calling thread and processes
//! files strictly one after another. Run it on a worker via [`crate::job`]
//! to keep an interactive thread free.

mod directory;
mod entities;
mod error;
mod file;
mod lines;
mod sink;

pub use directory::{collect_files, filter_directory, sort_by_modified};
pub use entities::{
    FileEntry, FileStats, InputTarget, OutputNaming, RunOptions, RunRequest, RunResult,
};
pub use error::{SplitError, ValidationError};
pub use file::{PROGRESS_INTERVAL, filter_file};
pub use lines::LineReader;
pub use sink::{OutputSink, ensure_output_dir};

use crate::progress::ProgressReporter;

/// Run one validated request to completion
pub fn execute(
    request: &RunRequest,
    reporter: &dyn ProgressReporter,
) -> Result<RunResult, SplitError> {
    let naming = request.naming();
    tracing::info!(
        input = %request.target.path().display(),
        output_dir = %request.output_dir.display(),
        filter = %request.filter,
        "starting run"
    );

    let result = match &request.target {
        InputTarget::Directory(root) => filter_directory(root, &request.filter, &naming, reporter),
        InputTarget::File(path) => {
            filter_file(path, &request.filter, None, &naming, reporter).map(|stats| {
                let mut result = RunResult::new();
                result.record(stats);
                result
            })
        }
    };

    match &result {
        Ok(result) => tracing::info!(
            files = result.files_processed,
            scanned = result.lines_scanned,
            matched = result.lines_matched,
            "run finished"
        ),
        Err(e) => tracing::warn!(error = %e, "run failed"),
    }

    result
}
