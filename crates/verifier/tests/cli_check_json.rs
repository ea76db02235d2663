use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

fn verifier_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_verifier"))
}

fn run_cli(args: &[&str], envs: &[(&str, &str)]) -> Output {
    let mut cmd = Command::new(verifier_bin());
    cmd.args(args);
    cmd.env("RUST_LOG", "error");
    for (key, value) in envs {
        cmd.env(key, value);
    }
    cmd.output().expect("failed to execute verifier CLI")
}

fn parse_stdout<T: for<'de> Deserialize<'de>>(output: &Output) -> T {
    let stdout = String::from_utf8_lossy(&output.stdout);
    serde_json::from_str(&stdout).unwrap_or_else(|err| {
        panic!(
            "failed to parse JSON output: {}\nstdout:\n{}\nstderr:\n{}",
            err,
            stdout,
            String::from_utf8_lossy(&output.stderr)
        )
    })
}

fn write_config(dir: &Path, name: &str, contents: &str) -> String {
    let path = dir.join(name);
    fs::write(&path, contents).expect("write config");
    path.to_string_lossy().to_string()
}

#[derive(Debug, Deserialize)]
struct ClusterReport {
    cluster: String,
    jdbc_url: String,
    http_uri: String,
    host: String,
    jdbc_port: u16,
    http_port: u16,
    query_timeout: String,
    metadata_timeout: String,
    checksum_timeout: String,
}

#[derive(Debug, Deserialize)]
struct ErrorPayload {
    error: String,
    causes: Vec<String>,
}

const CONFIG: &str = r#"
control.host=control.example.com
control.jdbc-port=8080
control.http-port=8081
control.jdbc-url-parameters={"SSL":"true"}

test.host=test.example.com
test.jdbc-port=9080
test.http-port=9081
test.query-timeout=2h
"#;

#[test]
fn test_check_reports_both_clusters() {
    let dir = TempDir::new().expect("create temp dir");
    let config = write_config(dir.path(), "verifier.properties", CONFIG);

    let output = run_cli(&["check", "--config", &config, "--json"], &[]);
    assert!(
        output.status.success(),
        "check failed\nstderr:\n{}",
        String::from_utf8_lossy(&output.stderr)
    );

    let reports: Vec<ClusterReport> = parse_stdout(&output);
    assert_eq!(reports.len(), 2);

    let control = &reports[0];
    assert_eq!(control.cluster, "control");
    assert_eq!(control.host, "control.example.com");
    assert_eq!(control.jdbc_url, "jdbc:presto://control.example.com:8080?SSL=true");
    assert_eq!(control.http_uri, "http://control.example.com:8081/");
    assert_eq!(control.jdbc_port, 8080);
    assert_eq!(control.http_port, 8081);
    assert_eq!(control.query_timeout, "60m");
    assert_eq!(control.metadata_timeout, "3m");
    assert_eq!(control.checksum_timeout, "30m");

    let test = &reports[1];
    assert_eq!(test.cluster, "test");
    assert_eq!(test.query_timeout, "2h");
}

#[test]
fn test_environment_overrides_file_values() {
    let dir = TempDir::new().expect("create temp dir");
    let config = write_config(dir.path(), "verifier.properties", CONFIG);

    let output = run_cli(
        &["check", "--config", &config, "--cluster", "test", "--json"],
        &[("VERIFIER_TEST_HOST", "shadow.example.com")],
    );
    assert!(output.status.success());

    let reports: Vec<ClusterReport> = parse_stdout(&output);
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].host, "shadow.example.com");
}

#[test]
fn test_malformed_parameters_fail() {
    let dir = TempDir::new().expect("create temp dir");
    let config = write_config(
        dir.path(),
        "verifier.properties",
        "control.host=a\ncontrol.jdbc-url-parameters=not-json\n",
    );

    let output = run_cli(
        &["check", "--config", &config, "--cluster", "control", "--json"],
        &[],
    );
    assert!(!output.status.success());

    let payload: ErrorPayload = parse_stdout(&output);
    assert!(payload.error.contains("control"));
    assert!(payload
        .causes
        .iter()
        .any(|cause| cause.contains("control.jdbc-url-parameters")));
}

#[test]
fn test_missing_host_fails_in_table_mode() {
    let dir = TempDir::new().expect("create temp dir");
    let config = write_config(
        dir.path(),
        "verifier.toml",
        "[control]\njdbc-port = 8080\n",
    );

    let output = run_cli(&["check", "--config", &config, "--cluster", "control"], &[]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("host is required"), "stderr:\n{}", stderr);
}

#[test]
fn test_defaults_json() {
    let output = run_cli(&["defaults", "--json"], &[]);
    assert!(output.status.success());

    let defaults: serde_json::Value = parse_stdout(&output);
    assert_eq!(defaults["query_timeout"], "60m");
    assert_eq!(defaults["metadata_timeout"], "3m");
    assert_eq!(defaults["checksum_timeout"], "30m");
    assert_eq!(defaults["minimum_timeout"], "1s");
    assert_eq!(defaults["jdbc_url_parameters"], serde_json::json!({}));
}
