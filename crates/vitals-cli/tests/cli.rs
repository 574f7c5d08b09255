//! Smoke tests for the `vitals` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn vitals(config_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("vitals").unwrap();
    cmd.env("VITALS_CONFIG", config_dir.path().join("config.toml"))
        .env_remove("VITALS_JOLOKIA_URL")
        .env_remove("VITALS_USERNAME")
        .env_remove("VITALS_PASSWORD")
        .env_remove("RUST_LOG")
        .arg("--no-color");
    cmd
}

#[test]
fn help_lists_commands() {
    let dir = TempDir::new().unwrap();
    vitals(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("watch"))
        .stdout(predicate::str::contains("counters"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn config_path_honors_override() {
    let dir = TempDir::new().unwrap();
    vitals(&dir)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn config_set_then_show() {
    let dir = TempDir::new().unwrap();
    vitals(&dir)
        .args(["config", "set", "period_ms", "250"])
        .assert()
        .success();
    vitals(&dir)
        .args(["config", "set", "password", "hunter2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("hunter2").not());

    vitals(&dir)
        .args(["--output", "json", "config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"period_ms\": 250"))
        .stdout(predicate::str::contains("hunter2").not());
}

#[test]
fn config_set_unknown_key_fails() {
    let dir = TempDir::new().unwrap();
    vitals(&dir)
        .args(["config", "set", "colour", "blue"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown config key"));
}

#[test]
fn zero_workers_rejected() {
    let dir = TempDir::new().unwrap();
    vitals(&dir)
        .args(["watch", "--workers", "0", "--duration-secs", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("workers"));
}

#[test]
fn unreachable_jolokia_counters_fail() {
    let dir = TempDir::new().unwrap();
    vitals(&dir)
        .args(["counters", "--source", "jolokia", "--url", "http://127.0.0.1:1/jolokia"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unavailable"));
}

#[cfg(target_os = "linux")]
#[test]
fn counters_of_own_process() {
    let dir = TempDir::new().unwrap();
    vitals(&dir)
        .args(["--output", "json", "counters", "--source", "local"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"cpu_time_nanos\""))
        .stdout(predicate::str::contains("\"collectors\": []"));
}

#[cfg(target_os = "linux")]
#[test]
fn watch_emits_json_lines_and_summary() {
    let dir = TempDir::new().unwrap();
    let output = vitals(&dir)
        .args([
            "--output",
            "json",
            "watch",
            "--source",
            "local",
            "--period-ms",
            "100",
            "--initial-delay-ms",
            "0",
            "--duration-secs",
            "1",
            "--samplers",
            "cpu,memory",
            "--load-threads",
            "1",
        ])
        .assert()
        .success()
        .stderr(predicate::str::contains("cpu:"))
        .get_output()
        .stdout
        .clone();

    let stdout = String::from_utf8(output).unwrap();
    let lines: Vec<serde_json::Value> = stdout
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();

    assert!(lines.iter().any(|l| l["kind"] == "cpu"));
    assert!(lines.iter().any(|l| l["kind"] == "memory"));
    assert!(lines.iter().all(|l| l["kind"] != "gc"));
    for line in lines.iter().filter(|l| l["kind"] == "cpu") {
        let pct = line["utilization_percent"].as_f64().unwrap();
        assert!((0.0..=100.0).contains(&pct));
    }
}

#[cfg(target_os = "linux")]
#[test]
fn watch_system_reports_machine_cpu() {
    let dir = TempDir::new().unwrap();
    let output = vitals(&dir)
        .args([
            "--output",
            "json",
            "watch",
            "--source",
            "local",
            "--period-ms",
            "100",
            "--initial-delay-ms",
            "0",
            "--duration-secs",
            "1",
            "--samplers",
            "memory",
            "--system",
        ])
        .assert()
        .success()
        .stderr(predicate::str::contains("system:"))
        .get_output()
        .stdout
        .clone();

    let stdout = String::from_utf8(output).unwrap();
    let system: Vec<serde_json::Value> = stdout
        .lines()
        .map(|l| serde_json::from_str::<serde_json::Value>(l).unwrap())
        .filter(|l| l["kind"] == "system")
        .collect();

    assert!(!system.is_empty());
    for line in &system {
        let pct = line["utilization_percent"].as_f64().unwrap();
        assert!((0.0..=100.0).contains(&pct));
    }
}

#[test]
fn watch_system_needs_local_source() {
    let dir = TempDir::new().unwrap();
    vitals(&dir)
        .args([
            "watch",
            "--source",
            "jolokia",
            "--url",
            "http://127.0.0.1:1/jolokia",
            "--system",
            "--duration-secs",
            "1",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("local source"));
}
