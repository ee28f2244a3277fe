//! Basic CLI E2E tests.
//!
//! Tests invoke the built binary against a throwaway data directory and
//! verify outputs.

use std::path::Path;
use std::process::Command;

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(data_dir: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_kakeibo-cli"))
        .args(args)
        .env("KAKEIBO_DATA_DIR", data_dir)
        .env_remove("KAKEIBO_LOG")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn run_ok(data_dir: &Path, args: &[&str]) -> String {
    let (stdout, stderr, code) = run_cli(data_dir, args);
    assert_eq!(code, 0, "{args:?} failed: {stderr}");
    stdout
}

fn json(stdout: &str) -> serde_json::Value {
    serde_json::from_str(stdout).expect("Failed to parse JSON output")
}

#[test]
fn test_count_add_records_event() {
    let dir = tempfile::tempdir().unwrap();
    run_ok(dir.path(), &["count", "start", "--user", "alice"]);

    let out = json(&run_ok(dir.path(), &["count", "add", "core", "--user", "alice"]));
    assert_eq!(out["type"], "CountRecorded");
    assert_eq!(out["total"], 1);

    let status = json(&run_ok(dir.path(), &["count", "status", "--user", "alice"]));
    assert_eq!(status["counts"]["core"], 1);
    assert_eq!(status["laps"], 1);
    assert_eq!(status["summary"]["events"], 2);
}

#[test]
fn test_count_sub_does_not_log() {
    let dir = tempfile::tempdir().unwrap();
    run_ok(dir.path(), &["count", "add", "45", "--by", "2"]);
    let status = json(&run_ok(dir.path(), &["count", "sub", "45"]));
    assert_eq!(status["counts"]["frag_45"], 1);
    assert_eq!(status["summary"]["events"], 2);
}

#[test]
fn test_unknown_kind_fails() {
    let dir = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(dir.path(), &["count", "add", "gold"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("unknown counter kind"));
}

#[test]
fn test_render_placeholder_then_svg() {
    let dir = tempfile::tempdir().unwrap();
    let out = run_ok(dir.path(), &["count", "render"]);
    assert!(out.contains("No count history yet."));

    run_ok(dir.path(), &["count", "start"]);
    let svg_path = dir.path().join("timeline.svg");
    let out = run_ok(
        dir.path(),
        &["count", "render", "--out", svg_path.to_str().unwrap()],
    );
    assert!(out.contains("Total elapsed:"));
    let svg = std::fs::read_to_string(&svg_path).unwrap();
    assert!(svg.starts_with("<svg"));
}

#[test]
fn test_count_reset() {
    let dir = tempfile::tempdir().unwrap();
    run_ok(dir.path(), &["count", "add", "wipe"]);
    let out = json(&run_ok(dir.path(), &["count", "reset"]));
    assert_eq!(out["type"], "CountsReset");
    assert_eq!(out["message"], "Counts and history cleared");

    let status = json(&run_ok(dir.path(), &["count", "status"]));
    assert_eq!(status["summary"]["events"], 0);
}

#[test]
fn test_record_lifecycle() {
    let dir = tempfile::tempdir().unwrap();
    let added = json(&run_ok(
        dir.path(),
        &["record", "add", "--user", "bob", "--date", "2026-03-02", "--core", "4"],
    ));
    assert_eq!(added["type"], "RecordAdded");
    assert_eq!(added["profit"], 1_700_000);
    let id = added["id"].as_str().unwrap().to_string();

    let list = json(&run_ok(dir.path(), &["record", "list", "--user", "bob", "--month", "2026-03"]));
    assert_eq!(list.as_array().unwrap().len(), 1);

    let updated = json(&run_ok(dir.path(), &["record", "update", &id, "--cell-cost", "0"]));
    assert_eq!(updated["profit"], 3_800_000);

    let (_, _, code) = run_cli(dir.path(), &["record", "update", &id]);
    assert_ne!(code, 0);

    run_ok(dir.path(), &["record", "delete", &id]);
    let (_, stderr, code) = run_cli(dir.path(), &["record", "delete", &id]);
    assert_ne!(code, 0);
    assert!(stderr.starts_with("error:"));
}

#[test]
fn test_stats_weekly() {
    let dir = tempfile::tempdir().unwrap();
    for date in ["2026-03-02", "2026-03-16"] {
        run_ok(dir.path(), &["record", "add", "--date", date, "--core", "1", "--cell-cost", "0"]);
    }
    let weekly = json(&run_ok(dir.path(), &["stats", "weekly", "--year", "2026"]));
    let weeks = weekly.as_array().unwrap();
    assert_eq!(weeks.len(), 3);
    assert_eq!(weeks[1]["profit"], 0);

    let totals = json(&run_ok(dir.path(), &["stats", "totals"]));
    assert_eq!(totals["core"], 2);
}

#[test]
fn test_market_apply() {
    let dir = tempfile::tempdir().unwrap();
    run_ok(dir.path(), &["market", "set", "輝晶核", "1234567"]);
    let quote = json(&run_ok(dir.path(), &["market", "apply", "kisho"]));
    assert_eq!(quote["core_price"], 123.5);
    assert!(quote["cell_cost"].is_null());
}

#[test]
fn test_users() {
    let dir = tempfile::tempdir().unwrap();
    run_ok(dir.path(), &["user", "create", "carol"]);
    let users = json(&run_ok(dir.path(), &["user", "list"]));
    assert_eq!(users[0]["username"], "carol");
}

#[test]
fn test_config_get_set() {
    let dir = tempfile::tempdir().unwrap();
    assert_eq!(run_ok(dir.path(), &["config", "get", "timeline.warn_minutes"]).trim(), "5.0");
    run_ok(dir.path(), &["config", "set", "session.default_user", "dave"]);
    assert_eq!(run_ok(dir.path(), &["config", "get", "session.default_user"]).trim(), "dave");

    let (_, _, code) = run_cli(dir.path(), &["config", "set", "nope.key", "1"]);
    assert_ne!(code, 0);
}

#[test]
fn test_config_list_by_section() {
    let dir = tempfile::tempdir().unwrap();
    run_ok(dir.path(), &["config", "set", "ledger.commission", "0.05"]);
    let out = run_ok(dir.path(), &["config", "list"]);
    let lines: Vec<&str> = out.lines().collect();
    assert!(lines.contains(&"timeline.warn_minutes = 5.0"));
    assert!(lines.contains(&"ledger.commission = 0.05"));
    assert!(lines.contains(&"session.default_user = \"default\""));

    // Keys of one section stay together.
    let ledger: Vec<usize> = lines
        .iter()
        .enumerate()
        .filter(|(_, l)| l.starts_with("ledger."))
        .map(|(i, _)| i)
        .collect();
    assert!(!ledger.is_empty());
    assert_eq!(ledger.last().unwrap() - ledger[0] + 1, ledger.len());

    let full = json(&run_ok(dir.path(), &["config", "list", "--json"]));
    assert_eq!(full["ledger"]["commission"], 0.05);

    let path = run_ok(dir.path(), &["config", "path"]);
    assert!(path.trim().starts_with(dir.path().to_str().unwrap()));
}

#[test]
fn test_completions() {
    let dir = tempfile::tempdir().unwrap();
    let out = run_ok(dir.path(), &["completions", "bash"]);
    assert!(out.contains("kakeibo-cli"));
}
