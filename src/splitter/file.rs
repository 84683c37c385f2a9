use super::entities::{FileStats, OutputNaming};
use super::error::SplitError;
use super::lines::LineReader;
use super::sink::{OutputSink, ensure_output_dir};
use crate::filter::{FilterSpec, LineMatcher};
use crate::progress::ProgressReporter;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// A progress line is reported every this many scanned lines
pub const PROGRESS_INTERVAL: u64 = 1000;

/// File name used in progress messages
pub(crate) fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Filter one input file
///
/// With `sink` the matches are appended to it and it stays open for the
/// caller. Without one, `<stem>_filtered_<stamp>.txt` is created in the
/// output directory after the input has been opened, and closed again
/// before returning, on failure too.
///
/// Failures are reported through `reporter` before being returned.
pub fn filter_file(
    path: &Path,
    spec: &FilterSpec,
    sink: Option<&mut OutputSink>,
    naming: &OutputNaming,
    reporter: &dyn ProgressReporter,
) -> Result<FileStats, SplitError> {
    let result = open_input(path)
        .and_then(|reader| filter_reader(reader, path, spec, sink, naming, reporter));
    report_outcome(&display_name(path), result, reporter)
}

fn report_outcome(
    name: &str,
    result: Result<FileStats, SplitError>,
    reporter: &dyn ProgressReporter,
) -> Result<FileStats, SplitError> {
    match result {
        Ok(stats) => {
            reporter.report(&format!(
                "Finished {}: scanned {} lines, matched {} lines",
                name, stats.lines_scanned, stats.lines_matched
            ));
            Ok(stats)
        }
        Err(e) => {
            reporter.report(&format!("Error processing {name}: {e}"));
            Err(e)
        }
    }
}

fn open_input(path: &Path) -> Result<BufReader<File>, SplitError> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|source| SplitError::Read {
            path: path.to_path_buf(),
            source,
        })
}

/// Filter an already opened input; `path` names it in messages and errors
fn filter_reader<R: BufRead>(
    reader: R,
    path: &Path,
    spec: &FilterSpec,
    sink: Option<&mut OutputSink>,
    naming: &OutputNaming,
    reporter: &dyn ProgressReporter,
) -> Result<FileStats, SplitError> {
    let name = display_name(path);
    let Some(sink) = sink else {
        return filter_into_own_sink(reader, path, &name, spec, naming, reporter);
    };
    copy_matching(reader, path, &name, spec, sink, reporter)
}

fn filter_into_own_sink<R: BufRead>(
    reader: R,
    path: &Path,
    name: &str,
    spec: &FilterSpec,
    naming: &OutputNaming,
    reporter: &dyn ProgressReporter,
) -> Result<FileStats, SplitError> {
    ensure_output_dir(naming.dir())?;
    let mut sink = OutputSink::create(naming.file_output(path))?;
    reporter.report(&format!("Output file: {}", sink.path().display()));

    let copied = copy_matching(reader, path, name, spec, &mut sink, reporter);
    let closed = sink.close();

    let stats = copied?;
    closed?;
    Ok(stats)
}

fn copy_matching<R: BufRead>(
    reader: R,
    path: &Path,
    name: &str,
    spec: &FilterSpec,
    sink: &mut OutputSink,
    reporter: &dyn ProgressReporter,
) -> Result<FileStats, SplitError> {
    let matcher = LineMatcher::new(spec);
    let mut lines = LineReader::new(reader);
    let mut buf = Vec::new();
    let mut lines_scanned = 0u64;
    let mut lines_matched = 0u64;

    tracing::debug!(file = %path.display(), "scanning");

    while lines
        .read_line(&mut buf)
        .map_err(|source| SplitError::Read {
            path: path.to_path_buf(),
            source,
        })?
    {
        lines_scanned += 1;
        if lines_scanned % PROGRESS_INTERVAL == 0 {
            reporter.report(&format!("{name}: scanned {lines_scanned} lines..."));
        }

        // Match on a lossy decode, write the original bytes
        if matcher.is_match(&String::from_utf8_lossy(&buf)) {
            sink.write_line(&buf)?;
            lines_matched += 1;
        }
    }

    Ok(FileStats {
        input: path.to_path_buf(),
        output: sink.path().to_path_buf(),
        lines_scanned,
        lines_matched,
    })
}
