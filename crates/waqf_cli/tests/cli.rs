//! Binary-level tests: flags, exit codes and the JSON written to stdout.

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;

fn waqf() -> Command {
    Command::cargo_bin("waqf").unwrap()
}

fn write(dir: &Path, name: &str, body: &str) -> PathBuf {
    let p = dir.join(name);
    fs::write(&p, body).unwrap();
    p
}

const CAUSES: &str = r#"[
  {"id": "A", "name": "Orphan Care", "supportedWaqfTypes": ["permanent", "temporary_consumable"]},
  {"id": "B", "name": "Microloans", "supportedWaqfTypes": ["temporary_revolving"]}
]"#;

fn stdout_json(out: &[u8]) -> Value {
    serde_json::from_slice(out).unwrap()
}

/// `waqf new` into a file, returning its path.
fn new_portfolio(dir: &Path) -> PathBuf {
    let causes = write(dir, "causes.json", CAUSES);
    let out = dir.join("p.json");
    waqf()
        .args(["new", "--causes"])
        .arg(&causes)
        .args(["--amount", "1000", "--out"])
        .arg(&out)
        .assert()
        .success();
    out
}

#[test]
fn new_then_balanced_allocate() {
    let dir = tempfile::tempdir().unwrap();
    let p = new_portfolio(dir.path());

    let assert = waqf()
        .args(["allocate", "--portfolio"])
        .arg(&p)
        .args(["--balanced", "40,30,30"])
        .assert()
        .success();
    let v = stdout_json(&assert.get_output().stdout);
    assert_eq!(v["validation"]["pass"], Value::Bool(true));
    assert_eq!(v["portfolio"]["allocationMode"]["mode"], "balanced");
    let a = v["portfolio"]["items"][0]["totalAmount"].as_f64().unwrap();
    assert!((a - 700.0).abs() < 1e-9);
}

#[test]
fn unknown_cause_exits_with_engine_code() {
    let dir = tempfile::tempdir().unwrap();
    let p = new_portfolio(dir.path());
    waqf()
        .args(["share", "--portfolio"])
        .arg(&p)
        .args(["--cause", "nope", "--value", "10"])
        .assert()
        .code(5)
        .stderr(predicate::str::contains("cause not in portfolio: nope"));
}

#[test]
fn validate_fails_with_code_2_and_still_prints_report() {
    let dir = tempfile::tempdir().unwrap();
    let p = write(
        dir.path(),
        "bad.json",
        r#"{"items":[{"cause":{"id":"A","name":"Orphan Care","supportedWaqfTypes":["permanent"]}}],
            "totalAmount":100,
            "allocationMode":{"mode":"balanced","globalAllocation":{"permanent":10,"temporary_consumable":10,"temporary_revolving":10}}}"#,
    );
    waqf()
        .args(["validate", "--portfolio"])
        .arg(&p)
        .assert()
        .code(2)
        .stdout(predicate::str::contains("Balanced.GlobalAllocationNot100"));
}

#[test]
fn simple_partial_coverage_warns_but_passes() {
    let dir = tempfile::tempdir().unwrap();
    let p = new_portfolio(dir.path());
    let assert = waqf()
        .args(["allocate", "--portfolio"])
        .arg(&p)
        .args(["--simple", "permanent"])
        .assert()
        .success();
    let v = stdout_json(&assert.get_output().stdout);
    assert_eq!(v["validation"]["issues"][0]["severity"], "warning");
    assert_eq!(v["portfolio"]["items"][1]["totalAmount"].as_f64(), Some(0.0));
}

#[test]
fn slider_moves_global_mix() {
    let dir = tempfile::tempdir().unwrap();
    let p = new_portfolio(dir.path());
    let assert = waqf()
        .args(["slider", "--portfolio"])
        .arg(&p)
        .args(["--waqf-type", "temporary_revolving", "--value", "100"])
        .assert()
        .success();
    let v = stdout_json(&assert.get_output().stdout);
    let g = &v["portfolio"]["allocationMode"]["globalAllocation"];
    assert_eq!(g["temporary_revolving"].as_f64(), Some(100.0));
    assert_eq!(v["portfolio"]["items"][1]["totalAmount"].as_f64(), Some(1000.0));
}

#[test]
fn save_and_load_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let p = new_portfolio(dir.path());
    let store = dir.path().join("store");

    waqf()
        .args(["save", "--portfolio"])
        .arg(&p)
        .arg("--store")
        .arg(&store)
        .args(["--session", "donor-1"])
        .assert()
        .success();
    assert!(store.join("donor-1.json").is_file());

    let assert = waqf()
        .arg("load")
        .arg("--store")
        .arg(&store)
        .args(["--session", "donor-1"])
        .assert()
        .success();
    let v = stdout_json(&assert.get_output().stdout);
    let original: Value = serde_json::from_str(&fs::read_to_string(&p).unwrap()).unwrap();
    assert_eq!(v["portfolio"], original["portfolio"]);

    waqf()
        .arg("load")
        .arg("--store")
        .arg(&store)
        .args(["--session", "missing"])
        .assert()
        .code(4);
}

#[test]
fn command_output_feeds_the_next_command() {
    let dir = tempfile::tempdir().unwrap();
    let p = new_portfolio(dir.path());
    let advanced = dir.path().join("advanced.json");
    waqf()
        .args(["allocate", "--portfolio"])
        .arg(&p)
        .args(["--advanced", "--out"])
        .arg(&advanced)
        .assert()
        .success();

    let assert = waqf()
        .args(["share", "--portfolio"])
        .arg(&advanced)
        .args(["--cause", "A", "--value", "70"])
        .assert()
        .success();
    let v = stdout_json(&assert.get_output().stdout);
    assert_eq!(v["portfolio"]["allocationMode"]["mode"], "advanced");
    assert_eq!(v["portfolio"]["allocationMode"]["portfolioShares"]["A"], 70.0);
}

#[test]
fn repeated_cause_in_selection_is_dropped_with_warning() {
    let dir = tempfile::tempdir().unwrap();
    let causes = write(
        dir.path(),
        "causes.json",
        r#"[{"id":"A","name":"Orphan Care","supportedWaqfTypes":["permanent"]},
            {"id":"A","name":"Orphan Care (copy)","supportedWaqfTypes":["permanent"]}]"#,
    );
    let assert = waqf()
        .args(["new", "--causes"])
        .arg(&causes)
        .args(["--amount", "300"])
        .assert()
        .success()
        .stderr(predicate::str::contains("duplicate cause"));
    let v = stdout_json(&assert.get_output().stdout);
    assert_eq!(v["portfolio"]["items"].as_array().unwrap().len(), 1);
    assert_eq!(v["portfolio"]["items"][0]["cause"]["name"], "Orphan Care");
}

#[test]
fn usage_errors() {
    waqf().args(["allocate", "--portfolio", "https://example.org/p.json", "--advanced"]).assert().code(2);
    waqf().args(["allocate", "--portfolio", "/no/such/file.json", "--advanced"]).assert().code(2);
    waqf().args(["allocate", "--balanced", "1,2"]).assert().failure();
}

#[test]
fn logs_stay_off_stdout() {
    let dir = tempfile::tempdir().unwrap();
    let p = new_portfolio(dir.path());
    let assert = waqf()
        .args(["-vv", "allocate", "--portfolio"])
        .arg(&p)
        .arg("--advanced")
        .assert()
        .success();
    // Parses as one JSON document despite debug logging.
    let v = stdout_json(&assert.get_output().stdout);
    assert_eq!(v["portfolio"]["allocationMode"]["mode"], "advanced");
}
