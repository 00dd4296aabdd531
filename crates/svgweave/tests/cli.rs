use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;

const ARROW: &str = r#"<svg viewBox="0 0 24 24"><path d="M4 12h16"/></svg>"#;

fn svgweave() -> Command {
    Command::cargo_bin("svgweave").expect("binary exists")
}

#[test]
fn help_displays_usage() {
    svgweave()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage"));
}

#[test]
fn build_scaffolds_template_and_reports_success() {
    let temp = tempfile::tempdir().unwrap();
    fs::create_dir(temp.path().join("icons")).unwrap();
    fs::write(temp.path().join("icons/arrow.svg"), ARROW).unwrap();

    svgweave()
        .args(["build", "--icons", "icons", "--base"])
        .arg(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("SVG sprite scaffolded at"));

    let written = fs::read_to_string(temp.path().join("app.html")).unwrap();
    assert!(written.contains(r#"id="icon-arrow""#));
    assert!(written.contains("<!-- svg-sprite -->"));
}

#[test]
fn build_injects_existing_template_and_reports_success() {
    let temp = tempfile::tempdir().unwrap();
    fs::create_dir(temp.path().join("icons")).unwrap();
    fs::write(temp.path().join("icons/arrow.svg"), ARROW).unwrap();
    fs::write(
        temp.path().join("app.html"),
        "<html><!-- svg-sprite --><!-- endsvg-sprite --></html>",
    )
    .unwrap();

    svgweave()
        .args(["build", "--icons", "icons", "--base"])
        .arg(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("SVG sprite injected into"));
}

#[test]
fn build_failure_reports_status_without_a_fault() {
    let temp = tempfile::tempdir().unwrap();

    svgweave()
        .args(["build", "--icons", "missing-icons", "--base"])
        .arg(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("SVG sprite could not be generated"));

    assert!(!temp.path().join("app.html").exists());
}

#[test]
fn build_reads_the_project_config_file() {
    let temp = tempfile::tempdir().unwrap();
    fs::create_dir(temp.path().join("glyphs")).unwrap();
    fs::write(temp.path().join("glyphs/arrow.svg"), ARROW).unwrap();
    fs::write(
        temp.path().join("svgweave.toml"),
        r#"
[build]
icons_dir = "glyphs"
template = "index.html"
"#,
    )
    .unwrap();

    svgweave()
        .args(["build", "--base"])
        .arg(temp.path())
        .assert()
        .success();

    let written = fs::read_to_string(temp.path().join("index.html")).unwrap();
    assert!(written.contains(r#"id="icon-arrow""#));
}
