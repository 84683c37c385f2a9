use super::error::SplitError;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

#[cfg(windows)]
const LINE_ENDING: &[u8] = b"\r\n";
#[cfg(not(windows))]
const LINE_ENDING: &[u8] = b"\n";

/// Make sure the output directory exists
pub fn ensure_output_dir(dir: &Path) -> Result<(), SplitError> {
    fs::create_dir_all(dir).map_err(|source| SplitError::CreateOutputDir {
        path: dir.to_path_buf(),
        source,
    })
}

/// Buffered destination for matching lines
///
/// Call [`OutputSink::close`] to flush and learn about write failures.
/// Dropping the sink without closing still flushes, but silently.
#[derive(Debug)]
pub struct OutputSink {
    path: PathBuf,
    writer: BufWriter<File>,
    lines_written: u64,
}

impl OutputSink {
    /// Create or truncate `path`
    pub fn create(path: impl Into<PathBuf>) -> Result<Self, SplitError> {
        let path = path.into();
        let file = File::create(&path).map_err(|source| SplitError::Write {
            path: path.clone(),
            source,
        })?;
        Ok(Self::from_file(path, file))
    }

    /// Open `path` for appending, creating it when missing
    pub fn append(path: impl Into<PathBuf>) -> Result<Self, SplitError> {
        let path = path.into();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| SplitError::Write {
                path: path.clone(),
                source,
            })?;
        Ok(Self::from_file(path, file))
    }

    fn from_file(path: PathBuf, file: File) -> Self {
        tracing::debug!(path = %path.display(), "opened output sink");
        OutputSink {
            path,
            writer: BufWriter::new(file),
            lines_written: 0,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn lines_written(&self) -> u64 {
        self.lines_written
    }

    /// Write one line followed by the platform line ending
    pub fn write_line(&mut self, line: &[u8]) -> Result<(), SplitError> {
        self.writer
            .write_all(line)
            .and_then(|()| self.writer.write_all(LINE_ENDING))
            .map_err(|source| SplitError::Write {
                path: self.path.clone(),
                source,
            })?;
        self.lines_written += 1;
        Ok(())
    }

    /// Flush and release the file, returning its path
    pub fn close(mut self) -> Result<PathBuf, SplitError> {
        self.writer.flush().map_err(|source| SplitError::Write {
            path: self.path.clone(),
            source,
        })?;
        tracing::debug!(
            path = %self.path.display(),
            lines = self.lines_written,
            "closed output sink"
        );
        Ok(self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn newline() -> &'static str {
        std::str::from_utf8(LINE_ENDING).unwrap()
    }

    #[test]
    fn test_create_truncates_existing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.txt");
        fs::write(&path, "old content\n").unwrap();

        let mut sink = OutputSink::create(&path).unwrap();
        sink.write_line(b"new").unwrap();
        assert_eq!(sink.lines_written(), 1);
        let closed = sink.close().unwrap();

        assert_eq!(closed, path);
        assert_eq!(fs::read_to_string(&path).unwrap(), format!("new{}", newline()));
    }

    #[test]
    fn test_append_keeps_existing_content() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.txt");
        fs::write(&path, format!("first{}", newline())).unwrap();

        let mut sink = OutputSink::append(&path).unwrap();
        sink.write_line(b"second").unwrap();
        sink.close().unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            format!("first{nl}second{nl}", nl = newline())
        );
    }

    #[test]
    fn test_create_in_missing_directory_fails_with_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nope").join("out.txt");
        match OutputSink::create(&path) {
            Err(SplitError::Write { path: failed, .. }) => assert_eq!(failed, path),
            other => panic!("expected write error, got {other:?}"),
        }
    }

    #[test]
    fn test_ensure_output_dir_creates_nested_dirs() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        ensure_output_dir(&nested).unwrap();
        assert!(nested.is_dir());
    }
}
