// End-to-end tests for the scrutineer binary
// Drives the compiled CLI the way an operator would

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const SCENARIO_TOML: &str = r#"
name = "bake sale"
admin = "pta"
voters = ["ana", "ben", "chloe"]

[[proposals]]
by = "ana"
description = "brownies"

[[proposals]]
by = "ben"
description = "lemonade"

[[votes]]
by = "ana"
proposal_id = 2

[[votes]]
by = "ben"
proposal_id = 2

[[votes]]
by = "chloe"
proposal_id = 1
"#;

#[test]
fn bare_invocation_explains_the_workflow() {
    let mut cmd = Command::cargo_bin("scrutineer").unwrap();

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("SCRUTINEER - Voting Workflow Engine"))
        .stdout(predicate::str::contains("QUICK START"))
        .stdout(predicate::str::contains("scrutineer demo"))
        .stdout(predicate::str::contains("Registering Voters"))
        .stdout(predicate::str::contains("Votes Tallied"));
}

#[test]
fn demo_reports_the_winning_proposal() {
    let mut cmd = Command::cargo_bin("scrutineer").unwrap();

    cmd.arg("demo")
        .assert()
        .success()
        .stdout(predicate::str::contains("ELECTION RESULT: demo"))
        .stdout(predicate::str::contains("Winner: proposal #2"))
        .stdout(predicate::str::contains("Install solar panels on the gym"))
        .stdout(predicate::str::contains("Registered voters: 3"));
}

#[test]
fn demo_json_is_machine_readable() {
    let output = Command::cargo_bin("scrutineer")
        .unwrap()
        .args(["demo", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["winning_proposal_id"], 2);
    assert_eq!(report["final_status"], "VotesTallied");
    assert_eq!(report["name"], "demo");
    assert_eq!(report["proposals"].as_array().unwrap().len(), 3);
    assert_eq!(report["proposals"][0]["description"], "GENESIS");
}

#[test]
fn json_logs_stay_on_stderr() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("scrutineer.toml"),
        "[observability]\nlog_level = \"info\"\njson_logs = true\n",
    )
    .unwrap();

    let output = Command::cargo_bin("scrutineer")
        .unwrap()
        .current_dir(dir.path())
        .env("RUST_LOG", "info")
        .args(["demo", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    // stdout carries the report alone, even with JSON logging switched on.
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["winning_proposal_id"], 2);

    let logs = String::from_utf8_lossy(&output.stderr);
    assert!(logs.contains("workflow phase advanced"));
}

#[test]
fn run_replays_a_scenario_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bake_sale.toml");
    std::fs::write(&path, SCENARIO_TOML).unwrap();

    let mut cmd = Command::cargo_bin("scrutineer").unwrap();
    cmd.arg("run")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("ELECTION RESULT: bake sale"))
        .stdout(predicate::str::contains("Winner: proposal #2 (lemonade)"));
}

#[test]
fn run_writes_a_snapshot_when_asked() {
    let dir = TempDir::new().unwrap();
    let scenario_path = dir.path().join("bake_sale.toml");
    let snapshot_path = dir.path().join("final_state.json");
    std::fs::write(&scenario_path, SCENARIO_TOML).unwrap();

    let mut cmd = Command::cargo_bin("scrutineer").unwrap();
    cmd.arg("run")
        .arg(&scenario_path)
        .arg("--snapshot")
        .arg(&snapshot_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Snapshot written to"));

    let snapshot: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&snapshot_path).unwrap()).unwrap();
    assert_eq!(snapshot["version"], "1");
    assert_eq!(snapshot["status"], "VotesTallied");
    assert_eq!(snapshot["winning_proposal_id"], 2);
}

#[test]
fn a_missing_scenario_file_fails_loudly() {
    let mut cmd = Command::cargo_bin("scrutineer").unwrap();

    cmd.arg("run")
        .arg("/no/such/election.toml")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read scenario file"));
}

#[test]
fn a_scenario_that_breaks_the_rules_names_the_step() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.toml");
    std::fs::write(
        &path,
        r#"
admin = "pta"
voters = ["ana"]

[[votes]]
by = "ana"
proposal_id = 7
"#,
    )
    .unwrap();

    let mut cmd = Command::cargo_bin("scrutineer").unwrap();
    cmd.arg("run")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("casting vote from ana"))
        .stderr(predicate::str::contains("Proposal not found"));
}

#[test]
fn phases_lists_the_whole_workflow() {
    let mut cmd = Command::cargo_bin("scrutineer").unwrap();

    cmd.arg("phases")
        .assert()
        .success()
        .stdout(predicate::str::contains("0. Registering Voters"))
        .stdout(predicate::str::contains("5. Votes Tallied"))
        .stdout(predicate::str::contains("allows: AddVoter"))
        .stdout(predicate::str::contains("terminal phase"))
        .stdout(predicate::str::contains(
            "advances exactly one phase and never goes back",
        ));
}
