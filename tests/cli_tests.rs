#![allow(clippy::unwrap_used)]

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const DATA: &str = r#"<users>
  <user><name>root</name><type>superuser</type></user>
  <user><name>fred</name><type>admin</type></user>
</users>"#;

const FRED_TYPE: &str = "<users><user><name>fred</name><type/></user></users>";

fn workspace(filter: &str) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("data.xml"), DATA).unwrap();
    fs::write(dir.path().join("filter.xml"), filter).unwrap();
    dir
}

fn subfilter() -> Command {
    Command::cargo_bin("subfilter").unwrap()
}

#[test]
fn test_filter_file_to_stdout() {
    let dir = workspace(FRED_TYPE);
    subfilter()
        .arg(dir.path().join("data.xml"))
        .arg("--filter")
        .arg(dir.path().join("filter.xml"))
        .assert()
        .success()
        .stdout("<users><user><name>fred</name><type>admin</type></user></users>\n");
}

#[test]
fn test_selectors_only_and_pretty() {
    let dir = workspace(FRED_TYPE);
    subfilter()
        .arg(dir.path().join("data.xml"))
        .args(["--selectors-only", "--pretty", "-f"])
        .arg(dir.path().join("filter.xml"))
        .assert()
        .success()
        .stdout("<users>\n  <user>\n    <type>admin</type>\n  </user>\n</users>\n");
}

#[test]
fn test_data_from_stdin_to_output_file() {
    let dir = workspace("<users><user><name/></user></users>");
    let output = dir.path().join("out.xml");
    subfilter()
        .arg("--filter")
        .arg(dir.path().join("filter.xml"))
        .arg("--output")
        .arg(&output)
        .write_stdin(DATA)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let written = fs::read_to_string(&output).unwrap();
    assert_eq!(
        written,
        "<users><user><name>root</name></user><user><name>fred</name></user></users>\n"
    );
}

#[test]
fn test_no_match_exits_with_one() {
    let dir = workspace("<users><user><name>wilma</name></user></users>");
    subfilter()
        .arg(dir.path().join("data.xml"))
        .arg("--filter")
        .arg(dir.path().join("filter.xml"))
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_malformed_filter_reports_error() {
    let dir = workspace("<users><user></users>");
    subfilter()
        .arg(dir.path().join("data.xml"))
        .arg("--filter")
        .arg(dir.path().join("filter.xml"))
        .assert()
        .code(2)
        .stderr(predicate::str::contains("failed to parse filter document"));
}

#[test]
fn test_depth_limit_flag() {
    let dir = workspace(FRED_TYPE);
    subfilter()
        .arg(dir.path().join("data.xml"))
        .arg("--filter")
        .arg(dir.path().join("filter.xml"))
        .args(["--max-depth", "2"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("max depth exceeded"));
}

#[test]
fn test_missing_filter_file() {
    let dir = workspace(FRED_TYPE);
    subfilter()
        .arg(dir.path().join("data.xml"))
        .arg("--filter")
        .arg(dir.path().join("absent.xml"))
        .assert()
        .code(2)
        .stderr(predicate::str::contains("failed to read filter file"));
}

#[test]
fn test_trace_reports_name_mismatch() {
    let dir = workspace("<people/>");
    subfilter()
        .arg(dir.path().join("data.xml"))
        .arg("--filter")
        .arg(dir.path().join("filter.xml"))
        .arg("-vvv")
        .env_remove("RUST_LOG")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("name does not match"));
}
