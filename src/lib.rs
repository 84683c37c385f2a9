pub mod cli;
pub mod display;
pub mod filter;
pub mod job;
pub mod progress;
pub mod settings;
pub mod splitter;

use crate::display::{
    ConsoleProgress, format_failure_json, format_failure_text, format_summary_json,
    format_summary_text,
};
use crate::job::{RunController, RunOutcome};
use crate::settings::{Settings, default_settings_path, load_settings, save_settings};
pub use cli::{Cli, ColorMode, Combine, OutputFormat, cli_parse};
pub use filter::{FilterSpec, LineMatcher, MatchMode, matches};
pub use progress::{ChannelReporter, CollectingReporter, ProgressReporter};
pub use splitter::{
    InputTarget, OutputSink, RunOptions, RunRequest, RunResult, SplitError, ValidationError,
    execute, filter_directory, filter_file,
};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Exit status when the options were rejected before a run started
pub const EXIT_VALIDATION: u8 = 2;

fn init_tracing(verbose: u8, quiet: bool) {
    let default_level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("log_splitter={default_level}")));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Merge command line values over the remembered ones
///
/// A new input given on the command line resets the output directory to
/// the input's location unless an output directory is given as well.
pub fn build_run_options(cli: &Cli, settings: &Settings) -> RunOptions {
    let mut options = settings.to_options();

    if let Some(input) = &cli.input {
        options.input = Some(input.clone());
        options.output_dir = None;
    }
    if let Some(filter) = &cli.filter {
        options.filter_text = filter.clone();
    }
    if let Some(separator) = cli.separator {
        options.separator = separator;
    }
    if let Some(mode) = cli.mode {
        options.mode = mode.into();
    }
    if let Some(case_sensitive) = cli.case_sensitivity() {
        options.case_sensitive = case_sensitive;
    }
    if let Some(output_dir) = &cli.output_dir {
        options.output_dir = Some(output_dir.clone());
    }

    if options.output_dir.is_none()
        && let Some(input) = options.input.as_deref()
        && let Ok(target) = InputTarget::resolve(input)
    {
        options.output_dir = Some(target.default_output_dir());
    }

    options
}

fn settings_path(cli: &Cli) -> Option<PathBuf> {
    cli.settings.clone().or_else(default_settings_path)
}

fn load_or_default(path: Option<&PathBuf>) -> Settings {
    let Some(path) = path else {
        return Settings::default();
    };

    match load_settings(path) {
        Ok(settings) => settings,
        Err(e) => {
            tracing::warn!(error = %e, "ignoring unreadable settings");
            Settings::default()
        }
    }
}

/// Print the single final message for a run attempt
fn present(outcome: &RunOutcome, format: OutputFormat) -> ExitCode {
    match (outcome, format) {
        (RunOutcome::Completed(result), OutputFormat::Text) => {
            print!("{}", format_summary_text(result));
            ExitCode::SUCCESS
        }
        (RunOutcome::Completed(result), OutputFormat::Json) => {
            println!("{}", format_summary_json(result));
            ExitCode::SUCCESS
        }
        (RunOutcome::Rejected(e), OutputFormat::Text) => {
            eprintln!("{}", format_failure_text("invalid options", &e.to_string()));
            ExitCode::from(EXIT_VALIDATION)
        }
        (RunOutcome::Rejected(e), OutputFormat::Json) => {
            println!("{}", format_failure_json("rejected", &e.to_string()));
            ExitCode::from(EXIT_VALIDATION)
        }
        (RunOutcome::Failed(e), OutputFormat::Text) => {
            eprintln!("{}", format_failure_text("error", &e.to_string()));
            ExitCode::FAILURE
        }
        (RunOutcome::Failed(e), OutputFormat::Json) => {
            println!("{}", format_failure_json("failed", &e.to_string()));
            ExitCode::FAILURE
        }
    }
}

/// What the binary prints when [`run`] itself fails
///
/// Only the top-level message: the error types already embed their source.
pub fn fatal_message(e: &anyhow::Error) -> String {
    format_failure_text("error", &e.to_string())
}

pub fn run() -> anyhow::Result<ExitCode> {
    let cli = cli_parse();

    match cli.color {
        ColorMode::Always => colored::control::set_override(true),
        ColorMode::Never => colored::control::set_override(false),
        ColorMode::Auto => {}
    }
    init_tracing(cli.verbose, cli.quiet);

    let settings_file = settings_path(&cli);
    let mut settings = load_or_default(settings_file.as_ref());
    let options = build_run_options(&cli, &settings);
    tracing::debug!(?options, "resolved options");

    let outcome = match options.validate() {
        Err(e) => RunOutcome::Rejected(e),
        Ok(request) => {
            let controller = RunController::new();
            let handle = controller.start(request)?;
            let progress = ConsoleProgress::new(cli.quiet);
            let outcome = handle.wait_with(|message| progress.show(&message));
            progress.finish();
            outcome
        }
    };

    // Settings are secondary: a failed save must not change the outcome.
    if !cli.no_save
        && let Some(path) = settings_file
    {
        settings.remember(&options);
        if let Err(e) = save_settings(&path, &settings) {
            tracing::warn!(error = %e, "settings not saved");
        }
    }

    Ok(present(&outcome, cli.format))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::tempdir;

    #[test]
    fn test_cli_input_resets_remembered_output_dir() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("app.log");
        std::fs::write(&input, "x\n").unwrap();

        let settings = Settings {
            last_output_path: Some(PathBuf::from("/somewhere/else")),
            last_filter: "ERROR".to_string(),
            ..Settings::default()
        };
        let cli = Cli::parse_from(["log-splitter", input.to_str().unwrap()]);

        let options = build_run_options(&cli, &settings);
        assert_eq!(options.input, Some(input));
        assert_eq!(options.output_dir, Some(dir.path().to_path_buf()));
        assert_eq!(options.filter_text, "ERROR");
    }

    #[test]
    fn test_remembered_values_fill_gaps() {
        let settings = Settings {
            last_input_path: Some(PathBuf::from("/logs")),
            last_filter: "a#b".to_string(),
            last_match_all: true,
            last_case_sensitive: false,
            last_output_path: Some(PathBuf::from("/out")),
            ..Settings::default()
        };
        let cli = Cli::parse_from(["log-splitter", "--case-sensitive", "-m", "any"]);

        let options = build_run_options(&cli, &settings);
        assert_eq!(options.input, Some(PathBuf::from("/logs")));
        assert_eq!(options.output_dir, Some(PathBuf::from("/out")));
        assert_eq!(options.mode, MatchMode::Any);
        assert!(options.case_sensitive);
        assert_eq!(options.filter_text, "a#b");
    }

    #[test]
    fn test_explicit_output_dir_wins() {
        let cli = Cli::parse_from(["log-splitter", "/logs", "-o", "/explicit"]);
        let options = build_run_options(&cli, &Settings::default());
        assert_eq!(options.output_dir, Some(PathBuf::from("/explicit")));
    }

    #[test]
    fn test_fatal_message_names_os_error_once() {
        colored::control::set_override(false);
        let e = anyhow::Error::from(job::JobError::Spawn(std::io::Error::other(
            "no threads left",
        )));

        let message = fatal_message(&e);
        assert_eq!(
            message,
            "error: Failed to start worker thread: no threads left"
        );
        assert_eq!(message.matches("no threads left").count(), 1);
    }
}
