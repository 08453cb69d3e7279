//! Integration tests for the compiled binary
//!
//! Runs the built lstats executable and checks exit codes and the table
//! written to standard output.

use std::fs;
use std::io::Write as _;
use std::path::PathBuf;
use std::process::Command;
use tempfile::TempDir;

fn lstats() -> Command {
    Command::new(env!("CARGO_BIN_EXE_lstats"))
}

fn write_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    let mut file = fs::File::create(&path).unwrap();
    write!(file, "{}", content).unwrap();
    path
}

#[test]
fn test_no_arguments_prints_usage_and_exits_one() {
    let output = lstats().output().expect("failed to run lstats");

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("Usage"));
}

#[test]
fn test_help_flag_prints_usage_and_exits_one() {
    let output = lstats().arg("--help").output().expect("failed to run lstats");

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("Usage"));
    assert!(stdout.contains("--list"));
}

#[test]
fn test_flag_only_invocation_runs_empty() {
    let output = lstats()
        .arg("--quiet")
        .output()
        .expect("failed to run lstats");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("In total"));
    assert!(stdout.contains("total files: 0/0"));
}

#[test]
fn test_counts_positional_files() {
    let dir = TempDir::new().unwrap();
    let a = write_file(&dir, "a.txt", "// comment\n\ncode();\n");
    let b = write_file(&dir, "b.txt", "one();\ntwo();\n");

    let output = lstats()
        .arg(a.as_os_str())
        .arg(b.as_os_str())
        .output()
        .expect("failed to run lstats");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("filename"));
    assert!(stdout.contains("In total"));
    assert!(stdout.contains("total files: 2/2"));

    let a_row = stdout
        .lines()
        .find(|l| l.contains("a.txt"))
        .expect("row for a.txt");
    let fields: Vec<&str> = a_row.split_whitespace().collect();
    assert_eq!(&fields[1..], &["1", "1", "1", "3"]);
}

#[test]
fn test_list_option_appends_paths() {
    let dir = TempDir::new().unwrap();
    let a = write_file(&dir, "a.txt", "x();\n");
    let b = write_file(&dir, "b.txt", "y();\n");
    let list = write_file(&dir, "inputs.txt", &format!("{}\n", b.display()));

    let output = lstats()
        .arg(a.as_os_str())
        .arg("--list")
        .arg(list.as_os_str())
        .output()
        .expect("failed to run lstats");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("total files: 2/2"));
}

#[test]
fn test_unreadable_file_does_not_fail_the_run() {
    let dir = TempDir::new().unwrap();
    let a = write_file(&dir, "a.txt", "code();\n");
    let missing = dir.path().join("missing.txt");

    let output = lstats()
        .arg(a.as_os_str())
        .arg(missing.as_os_str())
        .output()
        .expect("failed to run lstats");

    // Per-file open failures are logged, not fatal.
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("total files: 2/2"));

    let missing_row = stdout
        .lines()
        .find(|l| l.contains("missing.txt"))
        .expect("zero row for the unreadable file");
    let fields: Vec<&str> = missing_row.split_whitespace().collect();
    assert_eq!(&fields[1..], &["0", "0", "0", "0"]);
}

#[test]
fn test_config_file_must_be_readable() {
    let dir = TempDir::new().unwrap();
    let a = write_file(&dir, "a.txt", "code();\n");

    let output = lstats()
        .arg(a.as_os_str())
        .arg("--config-file")
        .arg(dir.path().join("nope.toml").as_os_str())
        .output()
        .expect("failed to run lstats");

    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_conflicting_log_flags_rejected() {
    let dir = TempDir::new().unwrap();
    let a = write_file(&dir, "a.txt", "code();\n");

    let output = lstats()
        .arg(a.as_os_str())
        .arg("--verbose")
        .arg("--quiet")
        .output()
        .expect("failed to run lstats");

    assert_eq!(output.status.code(), Some(1));
}
