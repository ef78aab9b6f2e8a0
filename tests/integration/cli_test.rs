//! Integration tests for the termvid command line

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;

fn termvid() -> Command {
    Command::cargo_bin("termvid").expect("termvid binary")
}

// ============================================================================
// Help and Version
// ============================================================================

#[test]
fn help_exits_0_and_shows_usage() {
    termvid()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("<VIDEO>"))
        .stdout(predicate::str::contains("--optimization-level"))
        .stdout(predicate::str::contains("--redraw"))
        .stdout(predicate::str::contains("Controls:"));
}

#[test]
fn version_exits_0() {
    termvid()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with(concat!(
            "termvid ",
            env!("CARGO_PKG_VERSION")
        )));
}

// ============================================================================
// Error Handling
// ============================================================================

#[test]
fn no_arguments_exits_1() {
    termvid()
        .assert()
        .code(1)
        .stderr(predicate::str::contains("<VIDEO>"));
}

#[test]
fn missing_file_exits_1() {
    termvid()
        .arg("/nonexistent/path/clip.mp4")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Could not open"))
        .stderr(predicate::str::contains("clip.mp4"));
}

#[test]
fn negative_optimization_level_exits_1() {
    termvid()
        .args(["clip.mp4", "--optimization-level=-5"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains(">= 0"));
}

#[test]
fn redraw_ratio_out_of_range_exits_1() {
    termvid()
        .args(["clip.mp4", "--redraw-ratio", "2"])
        .assert()
        .code(1);
}

#[test]
fn invalid_config_file_exits_1_and_names_file() {
    let mut config = tempfile::NamedTempFile::new().unwrap();
    writeln!(config, "[render]\nredraw_ratio = 3.0").unwrap();

    termvid()
        .arg("clip.mp4")
        .arg("--config")
        .arg(config.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains(
            config.path().display().to_string(),
        ));
}
