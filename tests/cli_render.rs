use assert_cmd::Command;
use predicates::prelude::*;
use std::path::{Path, PathBuf};

const STAFF: &str = r#"[
  {"id": 1, "name": "Dana", "office": "Seattle", "salary": 72000},
  {"id": 2, "name": "Abe", "office": "Tacoma", "salary": 58000},
  {"id": 3, "name": "Cleo", "office": "Seattle", "salary": 91000},
  {"id": 4, "name": "Bea", "office": "Spokane", "salary": 64000},
  {"id": 5, "name": "Eli", "office": "Seattle", "salary": 58000}
]"#;

fn write_staff(dir: &Path) -> PathBuf {
    let path = dir.join("staff.json");
    std::fs::write(&path, STAFF).unwrap();
    path
}

fn quire(config_dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("quire").unwrap();
    cmd.arg("--config-dir").arg(config_dir).env_remove("QUIRE_LOG");
    cmd
}

#[test]
fn test_render_html_table() {
    let temp_dir = tempfile::tempdir().unwrap();
    let data = write_staff(temp_dir.path());

    quire(temp_dir.path())
        .arg("render")
        .arg(&data)
        .args(["--sort", "name", "--where", "office=Seattle"])
        .assert()
        .success()
        .stdout(predicates::str::contains("<title>staff</title>"))
        .stdout(predicates::str::contains("Cleo"))
        .stdout(predicates::str::contains("Sorted by name ascending."))
        .stdout(predicates::str::contains("Abe").not());
}

#[test]
fn test_render_pagination_feedback() {
    let temp_dir = tempfile::tempdir().unwrap();
    let data = write_staff(temp_dir.path());

    quire(temp_dir.path())
        .arg("render")
        .arg(&data)
        .args(["--sort", "salary", "--desc", "--page", "2", "--page-size", "2"])
        .assert()
        .success()
        .stdout(predicates::str::contains("Displaying results 3-4 of 5."))
        .stdout(predicates::str::contains("Bea"))
        .stdout(predicates::str::contains("Cleo").not());
}

#[test]
fn test_render_excel_grid() {
    let temp_dir = tempfile::tempdir().unwrap();
    let data = write_staff(temp_dir.path());

    quire(temp_dir.path())
        .arg("render")
        .arg(&data)
        .args(["--type", "excel", "--columns", "name,office", "--contains", "office=spo"])
        .assert()
        .success()
        .stdout(predicates::str::contains("records"))
        .stdout(predicates::str::contains("Bea"))
        .stdout(predicates::str::contains("Spokane"))
        .stdout(predicates::str::contains("salary").not())
        .stderr(predicates::str::contains("-staff.xlsx"));
}

#[test]
fn test_render_excel_to_file() {
    let temp_dir = tempfile::tempdir().unwrap();
    let data = write_staff(temp_dir.path());
    let out = temp_dir.path().join("workbook.json");

    quire(temp_dir.path())
        .arg("render")
        .arg(&data)
        .args(["--type", "excel", "--columns", "name"])
        .arg("--out")
        .arg(&out)
        .assert()
        .success();

    let written: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    let cells = &written["sheets"][0]["cells"];
    assert_eq!(cells[0]["address"], "A1");
    assert_eq!(cells[0]["value"], "name");
    assert_eq!(cells[0]["bold"], true);
    assert_eq!(cells[1]["value"], "Dana");
}

#[test]
fn test_render_pdf_reports_document_name() {
    let temp_dir = tempfile::tempdir().unwrap();
    let data = write_staff(temp_dir.path());

    quire(temp_dir.path())
        .arg("render")
        .arg(&data)
        .args(["--type", "pdf", "--title", "Quarterly"])
        .assert()
        .success()
        .stdout(predicates::str::contains("<html"))
        .stderr(predicates::str::contains("PDF document name: Quarterly"));
}

#[test]
fn test_unknown_sort_column_degrades_instead_of_failing() {
    let temp_dir = tempfile::tempdir().unwrap();
    let data = write_staff(temp_dir.path());

    quire(temp_dir.path())
        .arg("--verbose")
        .arg("render")
        .arg(&data)
        .args(["--sort", "initials"])
        .assert()
        .success()
        .stdout(predicates::str::contains("Dana"))
        .stderr(predicates::str::contains("deferring to rows"));
}

#[test]
fn test_missing_data_file_fails() {
    let temp_dir = tempfile::tempdir().unwrap();

    quire(temp_dir.path())
        .arg("render")
        .arg(temp_dir.path().join("absent.json"))
        .assert()
        .failure()
        .stderr(predicates::str::contains("Error:"));
}

#[test]
fn test_malformed_filter_fails() {
    let temp_dir = tempfile::tempdir().unwrap();
    let data = write_staff(temp_dir.path());

    quire(temp_dir.path())
        .arg("render")
        .arg(&data)
        .args(["--where", "office"])
        .assert()
        .failure()
        .stderr(predicates::str::contains("expected COL=VALUE"));
}

#[test]
fn test_config_defaults_and_save() {
    let temp_dir = tempfile::tempdir().unwrap();
    let config_dir = temp_dir.path().join("conf");

    quire(&config_dir)
        .arg("config")
        .assert()
        .success()
        .stdout(predicates::str::contains(r#""default_page_size": 10"#))
        .stdout(predicates::str::contains(r#""default_page_type": "full-header""#));
    assert!(!config_dir.join("quire.json").exists());

    quire(&config_dir)
        .args(["config", "--save"])
        .assert()
        .success();
    assert!(config_dir.join("quire.json").exists());
}

#[test]
fn test_config_file_sets_default_page_type() {
    let temp_dir = tempfile::tempdir().unwrap();
    let data = write_staff(temp_dir.path());
    std::fs::write(
        temp_dir.path().join("quire.json"),
        r#"{"default_page_type": "ajax-page"}"#,
    )
    .unwrap();

    quire(temp_dir.path())
        .arg("render")
        .arg(&data)
        .assert()
        .success()
        .stdout(predicates::str::contains("<table>"))
        .stdout(predicates::str::contains("<html").not());
}
