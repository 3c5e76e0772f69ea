use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

// Nothing listens on the discard port, so every list call fails fast.
const DEAD_SITE: &str = "http://127.0.0.1:9";

fn matrix_cmd() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("item-matrix"));
    cmd.env_remove("ITEM_MATRIX_API_KEY")
        .env_remove("ITEM_MATRIX_API_SECRET")
        .env_remove("RUST_LOG");
    cmd
}

fn init_config(temp_dir: &TempDir) -> String {
    let config_path = temp_dir.path().join("matrix-config");
    let path = config_path.to_str().unwrap().to_string();
    matrix_cmd().args(["-C", &path, "init"]).assert().success();
    path
}

fn write_config(dir: &Path, content: &str) {
    fs::write(dir.join("config.toml"), content).unwrap();
}

#[test]
fn test_help() {
    matrix_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Customer item matrix for uncollected sales invoices",
        ));
}

#[test]
fn test_version() {
    matrix_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("item-matrix"));
}

#[test]
fn test_init_creates_config() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("matrix-config");

    matrix_cmd()
        .args(["-C", config_path.to_str().unwrap(), "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized item-matrix config"));

    let content = fs::read_to_string(config_path.join("config.toml")).unwrap();
    assert!(content.contains("[site]"));
    assert!(content.contains("UnCollected"));
}

#[test]
fn test_init_fails_if_exists() {
    let temp_dir = TempDir::new().unwrap();
    let path = init_config(&temp_dir);

    matrix_cmd()
        .args(["-C", &path, "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_status_without_init() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("nonexistent");

    matrix_cmd()
        .args(["-C", config_path.to_str().unwrap(), "status"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_status() {
    let temp_dir = TempDir::new().unwrap();
    let path = init_config(&temp_dir);

    matrix_cmd()
        .args(["-C", &path, "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Item Matrix Status"))
        .stdout(predicate::str::contains("https://erp.example.com"))
        .stdout(predicate::str::contains("none (guest access)"))
        .stdout(predicate::str::contains("custom_collect_status = UnCollected"));
}

#[test]
fn test_status_picks_up_env_credentials() {
    let temp_dir = TempDir::new().unwrap();
    let path = init_config(&temp_dir);

    matrix_cmd()
        .env("ITEM_MATRIX_API_KEY", "key")
        .env("ITEM_MATRIX_API_SECRET", "secret")
        .args(["-C", &path, "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("configured"));
}

#[test]
fn test_status_bad_config() {
    let temp_dir = TempDir::new().unwrap();
    let path = init_config(&temp_dir);
    write_config(Path::new(&path), "[site\nurl = ");

    matrix_cmd()
        .args(["-C", &path, "status"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse config file"));
}

#[test]
fn test_report_without_init() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("nonexistent");

    matrix_cmd()
        .args([
            "-C",
            config_path.to_str().unwrap(),
            "report",
            "--salesperson",
            "Ahmed",
            "--from",
            "2024-01-01",
            "--to",
            "2024-01-31",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_report_requires_filters() {
    let temp_dir = TempDir::new().unwrap();
    let path = init_config(&temp_dir);

    matrix_cmd()
        .args(["-C", &path, "report", "--from", "2024-01-01"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Missing required filter(s): salesperson, to"));
}

#[test]
fn test_report_invalid_date() {
    let temp_dir = TempDir::new().unwrap();
    let path = init_config(&temp_dir);

    matrix_cmd()
        .args([
            "-C",
            &path,
            "report",
            "--salesperson",
            "Ahmed",
            "--from",
            "01/02/2024",
            "--to",
            "2024-01-31",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid --from date"));
}

#[test]
fn test_report_reversed_range() {
    let temp_dir = TempDir::new().unwrap();
    let path = init_config(&temp_dir);

    matrix_cmd()
        .args([
            "-C",
            &path,
            "report",
            "--salesperson",
            "Ahmed",
            "--from",
            "2024-02-01",
            "--to",
            "2024-01-01",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid date range"));
}

#[test]
fn test_report_invalid_format() {
    let temp_dir = TempDir::new().unwrap();
    let path = init_config(&temp_dir);

    matrix_cmd()
        .args([
            "-C",
            &path,
            "report",
            "--salesperson",
            "Ahmed",
            "--from",
            "2024-01-01",
            "--to",
            "2024-01-31",
            "--format",
            "xml",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid --format value"));
}

#[test]
fn test_report_without_site() {
    let temp_dir = TempDir::new().unwrap();
    let path = init_config(&temp_dir);
    write_config(Path::new(&path), "[report]\nrequire_filters = false\n");

    matrix_cmd()
        .args(["-C", &path, "report"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No site URL configured"));
}

#[test]
fn test_report_unreachable_site_is_empty() {
    let temp_dir = TempDir::new().unwrap();
    let path = init_config(&temp_dir);

    matrix_cmd()
        .args([
            "-C",
            &path,
            "report",
            "--salesperson",
            "Ahmed",
            "--from",
            "2024-01-01",
            "--to",
            "2024-01-31",
            "--site",
            DEAD_SITE,
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("No data for the given filters."))
        .stderr(predicate::str::contains("customer item matrix"));
}

#[test]
fn test_report_unreachable_site_json() {
    let temp_dir = TempDir::new().unwrap();
    let path = init_config(&temp_dir);
    write_config(
        Path::new(&path),
        &format!("[site]\nurl = \"{DEAD_SITE}\"\ntimeout_secs = 5\n\n[report]\nrequire_filters = false\n"),
    );

    matrix_cmd()
        .args(["-C", &path, "report", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[]"));
}
