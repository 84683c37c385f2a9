use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::tempdir;

fn bin() -> &'static str {
    env!("CARGO_BIN_EXE_log-splitter")
}

fn write_file(path: &Path, content: &str) {
    fs::write(path, content).expect("failed to write test file");
}

fn run(args: &[&str], settings: &Path) -> Output {
    Command::new(bin())
        .args(args)
        .arg("--settings")
        .arg(settings)
        .env_remove("LOG_SPLITTER_INPUT")
        .env_remove("LOG_SPLITTER_FILTER")
        .env_remove("LOG_SPLITTER_OUTPUT_DIR")
        .env_remove("RUST_LOG")
        .output()
        .expect("command should run")
}

fn only_file_in(dir: &Path) -> std::path::PathBuf {
    let entries: Vec<_> = fs::read_dir(dir)
        .expect("output dir exists")
        .map(|e| e.expect("dir entry").path())
        .collect();
    assert_eq!(entries.len(), 1, "expected one output file, got {entries:?}");
    entries.into_iter().next().expect("one entry")
}

#[test]
fn test_single_file_run_writes_named_output() {
    let dir = tempdir().expect("temp dir");
    let input = dir.path().join("server.log");
    let out = dir.path().join("out");
    write_file(&input, "abcERROR\nxyz\nabcWARN\n");

    let output = run(
        &[
            input.to_str().expect("utf8 path"),
            "-f",
            "error",
            "-i",
            "-o",
            out.to_str().expect("utf8 path"),
            "--color",
            "never",
        ],
        &dir.path().join("settings.toml"),
    );

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let written = only_file_in(&out);
    let name = written
        .file_name()
        .and_then(|n| n.to_str())
        .expect("utf8 name")
        .to_string();
    assert!(name.starts_with("server_filtered_"), "got {name}");
    assert!(name.ends_with(".txt"));
    assert_eq!(name.len(), "server_filtered_".len() + 14 + ".txt".len());
    assert_eq!(
        fs::read_to_string(&written).expect("read output").lines().collect::<Vec<_>>(),
        vec!["abcERROR"]
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Matched 1 of 3 lines in 1 file."), "{stdout}");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Finished server.log: scanned 3 lines, matched 1 lines"));
}

#[test]
fn test_directory_run_json_summary() {
    let dir = tempdir().expect("temp dir");
    let input = dir.path().join("logs");
    fs::create_dir(&input).expect("mkdir");
    write_file(&input.join("a.log"), "id=1 timeout\nid=2 ok\n");
    write_file(&input.join("b.log"), "id=3 timeout\n");
    let out = dir.path().join("out");

    let output = run(
        &[
            input.to_str().expect("utf8 path"),
            "-f",
            "id=|timeout",
            "-s",
            "|",
            "-m",
            "all",
            "-o",
            out.to_str().expect("utf8 path"),
            "-F",
            "json",
            "-q",
        ],
        &dir.path().join("settings.toml"),
    );

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let summary: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be JSON");
    assert_eq!(summary["status"], "completed");
    assert_eq!(summary["result"]["files_processed"], 2);
    assert_eq!(summary["result"]["lines_matched"], 2);

    let written = only_file_in(&out);
    assert!(
        written
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with("filtered_logs_"))
    );
    let mut lines: Vec<String> = fs::read_to_string(&written)
        .expect("read output")
        .lines()
        .map(str::to_string)
        .collect();
    lines.sort();
    assert_eq!(lines, vec!["id=1 timeout", "id=3 timeout"]);
}

#[test]
fn test_missing_input_is_rejected_without_output() {
    let dir = tempdir().expect("temp dir");
    let out = dir.path().join("out");

    let output = run(
        &[
            dir.path().join("missing.log").to_str().expect("utf8 path"),
            "-f",
            "ERROR",
            "-o",
            out.to_str().expect("utf8 path"),
            "--color",
            "never",
        ],
        &dir.path().join("settings.toml"),
    );

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid options:"), "{stderr}");
    assert!(stderr.contains("neither a file nor a directory"), "{stderr}");
    assert!(!out.exists());
}

#[test]
fn test_empty_filter_is_rejected() {
    let dir = tempdir().expect("temp dir");
    let input = dir.path().join("app.log");
    write_file(&input, "line\n");

    let output = run(
        &[input.to_str().expect("utf8 path"), "-f", "##", "--no-save"],
        &dir.path().join("settings.toml"),
    );

    assert_eq!(output.status.code(), Some(2));
    assert!(!dir.path().join("settings.toml").exists());
}

#[test]
fn test_settings_are_remembered_between_runs() {
    let dir = tempdir().expect("temp dir");
    let input = dir.path().join("app.log");
    write_file(&input, "keep me\ndrop me\n");
    let out = dir.path().join("out");
    let settings = dir.path().join("settings.toml");

    let first = run(
        &[
            input.to_str().expect("utf8 path"),
            "-f",
            "keep",
            "-o",
            out.to_str().expect("utf8 path"),
        ],
        &settings,
    );
    assert!(first.status.success());
    let saved = fs::read_to_string(&settings).expect("settings saved");
    assert!(saved.contains("last_filter = \"keep\""), "{saved}");

    fs::remove_dir_all(&out).expect("clean output");
    let second = run(&["-q"], &settings);
    assert!(
        second.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&second.stderr)
    );
    let written = only_file_in(&out);
    assert_eq!(
        fs::read_to_string(written).expect("read output").lines().collect::<Vec<_>>(),
        vec!["keep me"]
    );
}

#[test]
fn test_unwritable_settings_do_not_change_outcome() {
    let dir = tempdir().expect("temp dir");
    let input = dir.path().join("app.log");
    write_file(&input, "ERROR here\nfine\n");
    let blocker = dir.path().join("blocker");
    write_file(&blocker, "not a directory");
    let out = dir.path().join("out");

    let output = run(
        &[
            input.to_str().expect("utf8 path"),
            "-f",
            "ERROR",
            "-o",
            out.to_str().expect("utf8 path"),
            "--color",
            "never",
        ],
        &blocker.join("settings.toml"),
    );

    assert_eq!(
        output.status.code(),
        Some(0),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Matched 1 of 2 lines in 1 file."), "{stdout}");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        !stderr.lines().any(|line| line.starts_with("error:")),
        "a successful run must not also print an error:\n{stderr}"
    );
    assert!(blocker.is_file());
}
