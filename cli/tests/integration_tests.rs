use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};

use tempfile::TempDir;

const HELP_SCHEMA: &str = r#"
args:
  -g: { type: bool, default: false, help: GlobalFlag }
  directory: { default: "." }
sub_command:
  __default__: default_cmd
  default_cmd:
    help: Default Command Help
    overrides: { directory: ./src }
    args:
      -s: { type: bool, default: false, help: SpecificFlag }
      --depth: { type: int, default: 5 }
  other_cmd:
    help: Other Command Help
"#;

fn write_schema(dir: &TempDir, name: &str, text: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, text).expect("failed to write schema");
    path
}

fn elegant(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_elegant-cli"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run elegant-cli")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

// ---------------------------------------------------------------------------
// validate
// ---------------------------------------------------------------------------

#[test]
fn validate_accepts_good_schema() {
    let dir = TempDir::new().unwrap();
    let schema = write_schema(&dir, "main.yaml", HELP_SCHEMA);

    let output = elegant(&["validate", "--schema", schema.to_str().unwrap()]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).starts_with("ok: main"));
}

#[test]
fn validate_reports_all_defects() {
    let dir = TempDir::new().unwrap();
    let schema = write_schema(
        &dir,
        "bad.json",
        r#"{
            "args": {"-x": {"type": "unknown_type"}},
            "sub_command": {"__default__": "ghost_command", "real_command": {}}
        }"#,
    );

    let output = elegant(&["validate", "--schema", schema.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    let err = stderr(&output);
    assert!(err.contains("Invalid type 'unknown_type'"));
    assert!(err.contains("Default command 'ghost_command' defined in root but not found"));
}

#[test]
fn validate_rejects_unknown_extension() {
    let dir = TempDir::new().unwrap();
    let schema = write_schema(&dir, "main.txt", HELP_SCHEMA);

    let output = elegant(&["validate", "--schema", schema.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("unsupported schema format"));
}

// ---------------------------------------------------------------------------
// resolve
// ---------------------------------------------------------------------------

#[test]
fn resolve_prints_namespace_json() {
    let dir = TempDir::new().unwrap();
    let schema = write_schema(&dir, "main.yaml", HELP_SCHEMA);

    let output = elegant(&[
        "resolve",
        "--schema",
        schema.to_str().unwrap(),
        "--",
        "-s",
        "--depth",
        "3",
    ]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(json["command"], serde_json::json!(["default_cmd"]));
    assert_eq!(json["s"], serde_json::json!(true));
    assert_eq!(json["g"], serde_json::json!(false));
    assert_eq!(json["depth"], serde_json::json!(3));
    assert_eq!(json["directory"], serde_json::json!("./src"));
}

#[test]
fn resolve_prints_namespace_yaml() {
    let dir = TempDir::new().unwrap();
    let schema = write_schema(&dir, "main.yaml", HELP_SCHEMA);

    let output = elegant(&[
        "resolve",
        "--schema",
        schema.to_str().unwrap(),
        "--format",
        "yaml",
        "--",
        "/tmp",
        "other_cmd",
    ]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let text = stdout(&output);
    assert!(text.contains("- other_cmd"));
    assert!(text.contains("directory: /tmp"));
}

#[test]
fn resolve_usage_error_exits_2() {
    let dir = TempDir::new().unwrap();
    let schema = write_schema(&dir, "main.yaml", HELP_SCHEMA);

    let output = elegant(&[
        "resolve",
        "--schema",
        schema.to_str().unwrap(),
        "--",
        "--depth",
        "deep",
    ]);
    assert_eq!(output.status.code(), Some(2));
    let err = stderr(&output);
    assert!(err.contains("--depth"));
    assert!(err.contains("usage: main [-h]"));
}

#[test]
fn resolve_help_targets_root() {
    let dir = TempDir::new().unwrap();
    let schema = write_schema(&dir, "main.yaml", HELP_SCHEMA);

    let output = elegant(&["resolve", "--schema", schema.to_str().unwrap(), "--", "-h"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let text = stdout(&output);
    assert!(text.contains("{default_cmd,other_cmd}"));
    assert!(!text.contains("SpecificFlag"));
}

#[test]
fn resolve_help_follows_owned_flag() {
    let dir = TempDir::new().unwrap();
    let schema = write_schema(&dir, "main.yaml", HELP_SCHEMA);

    let output = elegant(&[
        "resolve",
        "--schema",
        schema.to_str().unwrap(),
        "--",
        "-s",
        "-h",
    ]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let text = stdout(&output);
    assert!(text.contains("Default Command Help"));
    assert!(text.contains("SpecificFlag"));
}

// ---------------------------------------------------------------------------
// describe
// ---------------------------------------------------------------------------

#[test]
fn describe_named_command() {
    let dir = TempDir::new().unwrap();
    let schema = write_schema(&dir, "main.yaml", HELP_SCHEMA);

    let output = elegant(&[
        "describe",
        "--schema",
        schema.to_str().unwrap(),
        "--prog",
        "tool",
        "other_cmd",
    ]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let text = stdout(&output);
    assert!(text.starts_with("usage: tool other_cmd [-h]"));
    assert!(text.contains("Other Command Help"));
}

#[test]
fn describe_unknown_path_fails() {
    let dir = TempDir::new().unwrap();
    let schema = write_schema(&dir, "main.yaml", HELP_SCHEMA);

    let output = elegant(&["describe", "--schema", schema.to_str().unwrap(), "nope"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("unknown command path: nope"));
}
