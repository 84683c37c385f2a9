use super::entities::{FileEntry, OutputNaming, RunResult};
use super::error::SplitError;
use super::file::{display_name, filter_file};
use super::sink::{OutputSink, ensure_output_dir};
use crate::filter::FilterSpec;
use crate::progress::ProgressReporter;
use std::path::Path;
use walkdir::WalkDir;

/// List every regular file below `root`, at any depth
///
/// Symlinks are not followed.
pub fn collect_files(root: &Path) -> Result<Vec<FileEntry>, SplitError> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root).follow_links(false) {
        let entry = entry.map_err(|source| walk_error(root, source))?;
        if !entry.file_type().is_file() {
            continue;
        }

        let modified = entry
            .metadata()
            .map_err(|source| walk_error(root, source))?
            .modified()
            .map_err(|source| SplitError::Read {
                path: entry.path().to_path_buf(),
                source,
            })?;

        tracing::trace!(file = %entry.path().display(), "found");
        files.push(FileEntry {
            path: entry.into_path(),
            modified,
        });
    }

    Ok(files)
}

/// Blame the entry walkdir failed on, or `root` when it names none
fn walk_error(root: &Path, source: walkdir::Error) -> SplitError {
    let path = source.path().unwrap_or(root).to_path_buf();
    SplitError::Walk { path, source }
}

/// Oldest first; equal timestamps fall back to path order
pub fn sort_by_modified(files: &mut [FileEntry]) {
    files.sort_by(|a, b| {
        a.modified
            .cmp(&b.modified)
            .then_with(|| a.path.cmp(&b.path))
    });
}

/// Filter every file below `root` into one shared output file
///
/// Files are enumerated before the output file is created, so an output
/// directory inside `root` never feeds the run its own output. The first
/// failing file aborts the run; the shared output is closed either way.
pub fn filter_directory(
    root: &Path,
    spec: &FilterSpec,
    naming: &OutputNaming,
    reporter: &dyn ProgressReporter,
) -> Result<RunResult, SplitError> {
    reporter.report(&format!("Scanning directory: {}", root.display()));

    let mut files = collect_files(root).inspect_err(|e| reporter.report(&e.to_string()))?;
    sort_by_modified(&mut files);
    reporter.report(&format!(
        "Found {} files, sorted by modification time",
        files.len()
    ));

    let mut sink = ensure_output_dir(naming.dir())
        .and_then(|()| OutputSink::append(naming.directory_output()))
        .inspect_err(|e| reporter.report(&e.to_string()))?;

    let mut result = RunResult::new();
    let processed = filter_each(&files, spec, &mut sink, naming, reporter, &mut result);
    let closed = sink.close();

    processed?;
    let output = closed.inspect_err(|e| reporter.report(&e.to_string()))?;
    if !result.outputs.contains(&output) {
        result.outputs.push(output.clone());
    }

    reporter.report(&format!(
        "All files processed: {} files, {} matching lines",
        result.files_processed, result.lines_matched
    ));
    reporter.report(&format!("Output file: {}", output.display()));

    Ok(result)
}

fn filter_each(
    files: &[FileEntry],
    spec: &FilterSpec,
    sink: &mut OutputSink,
    naming: &OutputNaming,
    reporter: &dyn ProgressReporter,
    result: &mut RunResult,
) -> Result<(), SplitError> {
    let total = files.len();
    for (i, file) in files.iter().enumerate() {
        reporter.report(&format!(
            "Processing file {}/{}: {}",
            i + 1,
            total,
            display_name(&file.path)
        ));
        let stats = filter_file(&file.path, spec, Some(&mut *sink), naming, reporter)?;
        result.record(stats);
    }
    Ok(())
}
