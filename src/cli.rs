mod combine;

use clap::{ArgAction, Parser, ValueEnum};
pub use combine::Combine;
use std::path::PathBuf;

/// Copy the lines of a log file, or of every file in a directory tree,
/// that contain given substrings into a new output file
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Log file or directory to filter [default: last used input]
    #[arg(env = "LOG_SPLITTER_INPUT")]
    pub input: Option<PathBuf>,

    /// Filter terms separated by the separator character, e.g. "ERROR#timeout"
    #[arg(short, long, env = "LOG_SPLITTER_FILTER")]
    pub filter: Option<String>,

    /// Character separating filter terms [default: #]
    #[arg(short, long)]
    pub separator: Option<char>,

    /// Whether a line needs all terms or any one of them [default: last used, else any]
    #[arg(short, long, value_enum)]
    pub mode: Option<Combine>,

    /// Ignore case when matching
    #[arg(short = 'i', long, conflicts_with = "case_sensitive")]
    pub ignore_case: bool,

    /// Match case exactly
    #[arg(long)]
    pub case_sensitive: bool,

    /// Directory for output files [default: next to the input]
    #[arg(short, long, env = "LOG_SPLITTER_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Settings file remembering the last used options
    #[arg(long, env = "LOG_SPLITTER_SETTINGS")]
    pub settings: Option<PathBuf>,

    /// Do not update the settings file after this run
    #[arg(long)]
    pub no_save: bool,

    /// Output format for the final summary
    #[arg(short = 'F', long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// When to use colors
    #[arg(long, value_enum, default_value_t = ColorMode::Auto)]
    pub color: ColorMode,

    /// Increase diagnostic logging (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Case sensitivity requested on the command line, if any
    pub fn case_sensitivity(&self) -> Option<bool> {
        if self.ignore_case {
            Some(false)
        } else if self.case_sensitive {
            Some(true)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    Auto,
    Always,
    Never,
}

pub fn cli_parse() -> Cli {
    Cli::parse()
}
