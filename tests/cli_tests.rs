//! CLI integration tests.

mod harness;

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use harness::temp_db::TempDb;
use predicates::prelude::*;
use rust_decimal_macros::dec;
use sharecache::domain::InstrumentCode;
use sharecache::port::PersistenceGateway;
use sharecache::testkit::domain::{bar, profile};

fn sharecache() -> Command {
    cargo_bin_cmd!("sharecache")
}

fn seeded_db(name: &str) -> TempDb {
    let db = TempDb::create(name);
    let gateway = db.gateway(8);
    gateway
        .save_profile(&profile("600000", "PF Bank").with_industry("Banking"))
        .expect("save profile");
    gateway
        .save_bars(&InstrumentCode::from("600000"), &[bar(2, dec!(10.00)), bar(3, dec!(10.10))])
        .expect("save bars");
    gateway
        .save_profile(&profile("000001", "PA Bank"))
        .expect("save profile");
    gateway.shutdown();
    db
}

#[test]
fn help_lists_commands() {
    sharecache()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("check"))
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("inspect"));
}

#[test]
fn version_prints_name() {
    sharecache()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("sharecache"));
}

#[test]
fn missing_config_fails() {
    let dir = tempfile::tempdir().expect("temp dir");

    sharecache()
        .args(["check", "--config"])
        .arg(dir.path().join("absent.toml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read config file"));
}

#[test]
fn invalid_config_fails() {
    let db = TempDb::create("cli-invalid");
    let path = db.write_config("[logging]\nformat = \"xml\"\n");

    sharecache()
        .args(["check", "--config"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value for format"));
}

#[test]
fn check_reports_instrument_count() {
    let db = seeded_db("cli-check");
    let path = db.write_config("");

    sharecache()
        .args(["check", "--config"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Instruments"))
        .stdout(predicate::str::contains("Check complete"));
}

#[test]
fn list_json_is_sorted_by_code() {
    let db = seeded_db("cli-list");
    let path = db.write_config("");

    let output = sharecache()
        .args(["--json", "list", "--config"])
        .arg(&path)
        .output()
        .expect("run sharecache");

    assert!(output.status.success());
    let rows: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    let codes: Vec<&str> = rows
        .as_array()
        .expect("array")
        .iter()
        .filter_map(|row| row["code"].as_str())
        .collect();
    assert_eq!(codes, vec!["000001", "600000"]);
    assert_eq!(rows[1]["bars"], 2);
}

#[test]
fn list_table_shows_last_close() {
    let db = seeded_db("cli-list-table");
    let path = db.write_config("");

    sharecache()
        .args(["list", "--config"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("PF Bank"))
        .stdout(predicate::str::contains("10.10"));
}

#[test]
fn inspect_prints_instrument() {
    let db = seeded_db("cli-inspect");
    let path = db.write_config("");

    let output = sharecache()
        .args(["--json", "inspect", "600000", "--config"])
        .arg(&path)
        .output()
        .expect("run sharecache");

    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(value["profile"]["name"], "PF Bank");
    assert_eq!(value["history"].as_object().map(|bars| bars.len()), Some(2));
}

#[test]
fn inspect_single_date() {
    let db = seeded_db("cli-inspect-date");
    let path = db.write_config("");

    let output = sharecache()
        .args(["--json", "inspect", "600000", "--date", "2024-01-03", "--config"])
        .arg(&path)
        .output()
        .expect("run sharecache");

    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(value["date"], "2024-01-03");
}

#[test]
fn inspect_unknown_instrument_fails() {
    let db = seeded_db("cli-inspect-unknown");
    let path = db.write_config("");

    sharecache()
        .args(["inspect", "999999", "--config"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown instrument: 999999"));
}

#[test]
fn skipped_rows_are_reported_on_stderr() {
    let db = seeded_db("cli-malformed-row");
    let gateway = db.gateway(8);
    gateway
        .write_statement(
            "INSERT INTO historical_bars (code, trade_date, open, high, low, close, volume, amount) \
             VALUES ('600000', '2024-01-04', 'abc', '1', '1', '1', 0, '0')",
        )
        .expect("insert malformed row");
    gateway.shutdown();
    let path = db.write_config("");

    let output = sharecache()
        .args(["--json", "list", "--config"])
        .arg(&path)
        .output()
        .expect("run sharecache");

    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Skipping malformed bar row"), "stderr: {stderr}");
    let rows: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(rows[1]["bars"], 2);
}
