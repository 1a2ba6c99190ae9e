use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const RAW: &str = r#"<think>draft</think><answer>Sales rose [1][2].
{{SALES}}</answer>
<viz>[{"id": "SALES", "component": "BarChart", "index": "year", "categories": ["sales"],
       "data": [{"year": "2024", "sales": "1,500"}]}]</viz>"#;

const SOURCES: &str = r#"[{"title": "One", "url": "https://one"}, {"title": "Two"}]"#;

fn workspace() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("answer.txt"), RAW).unwrap();
    fs::write(dir.path().join("sources.json"), SOURCES).unwrap();
    dir
}

#[test]
fn execute_outline_with_sources() {
    let dir = workspace();
    let mut cmd = cargo_bin_cmd!("factbook");
    cmd.arg("execute")
        .arg(dir.path().join("answer.txt"))
        .arg("--sources")
        .arg(dir.path().join("sources.json"))
        .arg("--format")
        .arg("outline");

    let output_pred = predicate::str::contains("▦ SALES")
        .and(predicate::str::contains("† 1,2 -> https://one"));

    cmd.assert().success().stdout(output_pred);
}

#[test]
fn execute_prose_config_as_json() {
    let dir = workspace();
    let mut cmd = cargo_bin_cmd!("factbook");
    cmd.arg("execute")
        .arg(dir.path().join("answer.txt"))
        .arg("--config")
        .arg("prose");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Sales rose [1][2]."));
}

#[test]
fn settings_file_is_applied() {
    let dir = workspace();
    fs::write(
        dir.path().join("settings.yaml"),
        "citation_fallback_url: about:blank\n",
    )
    .unwrap();
    fs::write(dir.path().join("sources.json"), r#"[{"title": "No url"}]"#).unwrap();

    let mut cmd = cargo_bin_cmd!("factbook");
    cmd.arg("execute")
        .arg(dir.path().join("answer.txt"))
        .arg("--sources")
        .arg(dir.path().join("sources.json"))
        .arg("--settings")
        .arg(dir.path().join("settings.yaml"))
        .arg("-c")
        .arg("prose")
        .arg("-f")
        .arg("outline");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("[CITATION_GROUP_1](about:blank)"));
}

#[test]
fn unknown_config_fails() {
    let dir = workspace();
    let mut cmd = cargo_bin_cmd!("factbook");
    cmd.arg("execute")
        .arg(dir.path().join("answer.txt"))
        .arg("--config")
        .arg("nope");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Config 'nope' not found"));
}

#[test]
fn missing_input_fails() {
    let mut cmd = cargo_bin_cmd!("factbook");
    cmd.arg("execute").arg("/nonexistent/answer.txt");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Error reading file"));
}

#[test]
fn list_commands() {
    cargo_bin_cmd!("factbook")
        .arg("list-configs")
        .assert()
        .success()
        .stdout(predicate::str::contains("default").and(predicate::str::contains("charts")));

    cargo_bin_cmd!("factbook")
        .arg("list-formats")
        .assert()
        .success()
        .stdout(predicate::str::contains("json").and(predicate::str::contains("outline")));
}
