//! CLI tests for `inftrim prune`.
//!
//! Spawns the inftrim binary against module directories and verifies the
//! report, exit codes and that dry runs leave files alone.

use std::fs;
use std::process::Command;

use inftrim::exit_codes;

#[test]
fn prune_dry_run_json_reports_empty_directory() {
    let temp = tempfile::tempdir().expect("tempdir");
    let lib = temp.path().join("lib");
    fs::create_dir(&lib).expect("mkdir");
    fs::write(lib.join("readme.txt"), "not a module\n").expect("write");

    let output = Command::new(env!("CARGO_BIN_EXE_inftrim"))
        .current_dir(temp.path())
        .args(["prune", "--dry-run", "--json", "lib"])
        .output()
        .expect("inftrim prune");

    assert_eq!(output.status.code(), Some(exit_codes::OK));
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json report");
    assert_eq!(report["modules"], 0);
    assert_eq!(report["removals"], serde_json::json!([]));
    assert_eq!(report["retained"], serde_json::json!([]));
    assert_eq!(report["deleted"], serde_json::json!([]));
    assert!(lib.join("readme.txt").is_file());
}

#[test]
fn prune_text_output_summarizes_retained_modules() {
    let temp = tempfile::tempdir().expect("tempdir");
    let lib = temp.path().join("lib");
    fs::create_dir(&lib).expect("mkdir");

    let output = Command::new(env!("CARGO_BIN_EXE_inftrim"))
        .current_dir(temp.path())
        .args(["prune", "lib"])
        .output()
        .expect("inftrim prune");

    assert_eq!(output.status.code(), Some(exit_codes::OK));
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "0 of 0 modules retained\n"
    );
}

#[test]
fn prune_non_pe_module_exits_invalid_and_keeps_files() {
    let temp = tempfile::tempdir().expect("tempdir");
    let lib = temp.path().join("lib");
    fs::create_dir(&lib).expect("mkdir");
    fs::write(lib.join("fake.dll"), b"not a pe image").expect("write");

    let output = Command::new(env!("CARGO_BIN_EXE_inftrim"))
        .current_dir(temp.path())
        .args(["prune", "lib"])
        .output()
        .expect("inftrim prune");

    assert_eq!(output.status.code(), Some(exit_codes::INVALID));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("get deps for \"fake.dll\""));
    assert!(lib.join("fake.dll").is_file());
}
