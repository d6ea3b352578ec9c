//! CLI acceptance tests
//!
//! These run the real binary against a scoped XDG environment so nothing
//! touches the developer's actual data, and stick to the commands that work
//! without the collaborator services running.

use std::ffi::OsString;
use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};

use tempfile::TempDir;

struct CliTestEnv {
    _temp_dir: TempDir,
    home: PathBuf,
    xdg_data: PathBuf,
    xdg_config: PathBuf,
    xdg_state: PathBuf,
}

impl CliTestEnv {
    fn new() -> Self {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let base = temp_dir.path().to_path_buf();
        let home = base.join("home");
        let xdg_data = base.join("xdg-data");
        let xdg_config = base.join("xdg-config");
        let xdg_state = base.join("xdg-state");

        fs::create_dir_all(&home).expect("failed to create HOME");
        fs::create_dir_all(&xdg_data).expect("failed to create XDG_DATA_HOME");
        fs::create_dir_all(&xdg_config).expect("failed to create XDG_CONFIG_HOME");
        fs::create_dir_all(&xdg_state).expect("failed to create XDG_STATE_HOME");

        Self {
            _temp_dir: temp_dir,
            home,
            xdg_data,
            xdg_config,
            xdg_state,
        }
    }
}

fn run(env: &CliTestEnv, args: &[&str]) -> Output {
    let bin_path = PathBuf::from(assert_cmd::cargo::cargo_bin!("riskscope"));

    Command::new(bin_path)
        .args(args)
        .env("HOME", &env.home)
        .env("XDG_DATA_HOME", &env.xdg_data)
        .env("XDG_CONFIG_HOME", &env.xdg_config)
        .env("XDG_STATE_HOME", &env.xdg_state)
        .output()
        .unwrap_or_else(|e| panic!("failed to execute riskscope: {e}"))
}

fn assert_success(args: &[&str], output: &Output) {
    if output.status.success() {
        return;
    }

    let rendered_args = args
        .iter()
        .map(|arg| OsString::from(arg).to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join(" ");
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    panic!(
        "riskscope {rendered_args} failed\nstatus: {}\nstdout:\n{}\nstderr:\n{}",
        output.status, stdout, stderr
    );
}

#[test]
fn dashboard_with_no_submissions_exports_display_defaults() {
    let env = CliTestEnv::new();

    let args = ["dashboard", "--no-analysis", "--export", "json"];
    let output = run(&env, &args);
    assert_success(&args, &output);

    let stdout = String::from_utf8_lossy(&output.stdout);
    // Everything before the JSON object is the "no submissions" hint
    let json_start = stdout.find('{').expect("no JSON in output");
    let value: serde_json::Value =
        serde_json::from_str(&stdout[json_start..]).expect("invalid JSON export");

    let scores = value.get("scores").expect("missing scores");
    assert_eq!(
        scores.get("healthClassification").and_then(|v| v.as_str()),
        Some("No Data")
    );
    assert_eq!(
        scores.get("overallRiskScore").and_then(|v| v.as_i64()),
        Some(20)
    );
    assert!(value.get("analysis").expect("missing analysis").is_null());
}

#[test]
fn reset_then_history_reports_an_empty_log() {
    let env = CliTestEnv::new();

    let reset_args = ["reset"];
    let output = run(&env, &reset_args);
    assert_success(&reset_args, &output);

    let history_args = ["history"];
    let output = run(&env, &history_args);
    assert_success(&history_args, &output);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("No conversation yet"));
}

#[test]
fn ask_without_submissions_is_refused_with_guidance() {
    let env = CliTestEnv::new();

    let args = ["ask", "how risky am I?"];
    let output = run(&env, &args);
    assert_success(&args, &output);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("needs both assessments"));
}

#[test]
fn dashboard_rejects_unknown_export_format() {
    let env = CliTestEnv::new();

    let output = run(&env, &["dashboard", "--no-analysis", "--export", "xml"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Unknown export format"));
}
