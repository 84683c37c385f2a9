use super::error::ValidationError;
use crate::filter::{FilterSpec, MatchMode};
use chrono::{DateTime, Local};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// What a run reads from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputTarget {
    /// One log file, filtered into its own output file
    File(PathBuf),
    /// Every file below a directory, filtered into one shared output file
    Directory(PathBuf),
}

impl InputTarget {
    /// Classify a path by what currently exists on disk
    pub fn resolve(path: &Path) -> Result<Self, ValidationError> {
        if path.is_dir() {
            Ok(InputTarget::Directory(path.to_path_buf()))
        } else if path.is_file() {
            Ok(InputTarget::File(path.to_path_buf()))
        } else {
            Err(ValidationError::InputNotFound(path.to_path_buf()))
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            InputTarget::File(path) | InputTarget::Directory(path) => path,
        }
    }

    /// Where output goes when nobody picked a directory
    ///
    /// The file's parent for a single file, the directory itself otherwise.
    pub fn default_output_dir(&self) -> PathBuf {
        match self {
            InputTarget::File(path) => path
                .parent()
                .filter(|parent| !parent.as_os_str().is_empty())
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from(".")),
            InputTarget::Directory(path) => path.clone(),
        }
    }
}

/// A file found while walking a directory, with its sort key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub path: PathBuf,
    pub modified: SystemTime,
}

/// Counts for one input file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileStats {
    /// The file that was read
    pub input: PathBuf,
    /// The file its matches were written to
    pub output: PathBuf,
    pub lines_scanned: u64,
    pub lines_matched: u64,
}

/// Aggregate result of one run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunResult {
    pub files_processed: usize,
    pub lines_scanned: u64,
    pub lines_matched: u64,
    pub outputs: Vec<PathBuf>,
    pub files: Vec<FileStats>,
}

impl RunResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one file's counts into the totals
    pub fn record(&mut self, stats: FileStats) {
        self.files_processed += 1;
        self.lines_scanned += stats.lines_scanned;
        self.lines_matched += stats.lines_matched;
        if !self.outputs.contains(&stats.output) {
            self.outputs.push(stats.output.clone());
        }
        self.files.push(stats);
    }
}

/// Output file names for one run
///
/// All names produced by one `OutputNaming` share the same timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputNaming {
    dir: PathBuf,
    stamp: String,
}

impl OutputNaming {
    pub fn new(dir: impl Into<PathBuf>, at: DateTime<Local>) -> Self {
        OutputNaming {
            dir: dir.into(),
            stamp: at.format("%Y%m%d%H%M%S").to_string(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// `filtered_logs_<stamp>.txt`, shared by every file in a directory run
    pub fn directory_output(&self) -> PathBuf {
        self.dir.join(format!("filtered_logs_{}.txt", self.stamp))
    }

    /// `<stem>_filtered_<stamp>.txt` for a single input file
    pub fn file_output(&self, input: &Path) -> PathBuf {
        let stem = input
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .filter(|stem| !stem.is_empty())
            .unwrap_or_else(|| "log".to_string());
        self.dir.join(format!("{}_filtered_{}.txt", stem, self.stamp))
    }
}

/// Everything one run needs, validated
#[derive(Debug, Clone)]
pub struct RunRequest {
    pub target: InputTarget,
    pub filter: FilterSpec,
    pub output_dir: PathBuf,
    pub started_at: DateTime<Local>,
}

impl RunRequest {
    pub fn new(target: InputTarget, filter: FilterSpec, output_dir: impl Into<PathBuf>) -> Self {
        RunRequest {
            target,
            filter,
            output_dir: output_dir.into(),
            started_at: Local::now(),
        }
    }

    /// Pin the timestamp used in output file names
    pub fn started_at(mut self, at: DateTime<Local>) -> Self {
        self.started_at = at;
        self
    }

    pub fn naming(&self) -> OutputNaming {
        OutputNaming::new(&self.output_dir, self.started_at)
    }
}

/// Plain, unvalidated run options as a caller or settings store holds them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    pub input: Option<PathBuf>,
    pub filter_text: String,
    pub separator: char,
    pub mode: MatchMode,
    pub case_sensitive: bool,
    pub output_dir: Option<PathBuf>,
}

impl Default for RunOptions {
    fn default() -> Self {
        RunOptions {
            input: None,
            filter_text: String::new(),
            separator: crate::filter::DEFAULT_SEPARATOR,
            mode: MatchMode::Any,
            case_sensitive: true,
            output_dir: None,
        }
    }
}

impl RunOptions {
    /// Check the options and turn them into a request
    ///
    /// Missing input, an empty filter and a missing output directory are
    /// reported in that order, then the input path is checked on disk.
    pub fn validate(&self) -> Result<RunRequest, ValidationError> {
        let input = self
            .input
            .as_deref()
            .filter(|path| !path.as_os_str().is_empty())
            .ok_or(ValidationError::MissingInput)?;

        let filter = FilterSpec::parse(
            &self.filter_text,
            self.separator,
            self.mode,
            self.case_sensitive,
        )?;

        let output_dir = self
            .output_dir
            .as_deref()
            .filter(|path| !path.as_os_str().is_empty())
            .ok_or(ValidationError::MissingOutputDir)?;

        let target = InputTarget::resolve(input)?;

        Ok(RunRequest::new(target, filter, output_dir))
    }
}
