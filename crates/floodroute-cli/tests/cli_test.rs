//! Integration tests for the floodroute binary
//!
//! None of these reach the network: they cover config inspection and the
//! failures that happen before any provider is called.

use std::io::Write;
use std::path::PathBuf;
use std::process::Command;

fn floodroute_bin() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // Remove test binary name
    path.pop(); // Remove 'deps' directory
    path.push("floodroute");
    path
}

fn floodroute() -> Command {
    let mut command = Command::new(floodroute_bin());
    command.current_dir(std::env::temp_dir()).env("RUST_LOG", "off");
    command
}

#[test]
fn test_config_json_lists_every_key() {
    let output = floodroute().args(["config", "--json"]).output().unwrap();
    assert!(output.status.success());

    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(parsed["status"], "success");

    let data = parsed["data"].as_object().unwrap();
    assert_eq!(data.len(), 13);
    assert_eq!(data["sample_stride"]["value"], "10");
    assert_eq!(data["sample_stride"]["source"], "Default");
}

#[test]
fn test_config_file_and_env_precedence() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "sample_stride = 4\nrain_window_hours = 6").unwrap();

    let output = floodroute()
        .args(["--json", "config", "--config"])
        .arg(file.path())
        .env("FLOODROUTE_RAIN_WINDOW_HOURS", "12")
        .output()
        .unwrap();
    assert!(output.status.success());

    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(parsed["data"]["sample_stride"]["value"], "4");
    assert_eq!(parsed["data"]["sample_stride"]["source"], "File");
    assert_eq!(parsed["data"]["rain_window_hours"]["value"], "12 h");
    assert_eq!(parsed["data"]["rain_window_hours"]["source"], "Environment");
}

#[test]
fn test_missing_explicit_config_fails() {
    let output = floodroute()
        .args(["config", "--config", "/nonexistent/floodroute.toml"])
        .output()
        .unwrap();
    assert!(!output.status.success());
}

#[test]
fn test_assess_without_destination_fails_with_suggestion() {
    let output = floodroute().args(["assess", "--from-pin", "19.07,72.87"]).output().unwrap();
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Missing destination"));
    assert!(stderr.contains("--to-pin"));
}

#[test]
fn test_assess_rejects_invalid_pin() {
    let output = floodroute()
        .args(["assess", "--from-pin", "95.0,10.0", "--to-pin", "1.0,1.0"])
        .output()
        .unwrap();
    assert!(!output.status.success());
}

#[test]
fn test_assess_rejects_invalid_settings_before_network() {
    let output = floodroute()
        .args(["assess", "--from-pin", "1.0,1.0", "--to-pin", "1.1,1.1", "--concurrency", "0"])
        .output()
        .unwrap();
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("sample_concurrency"));
}
