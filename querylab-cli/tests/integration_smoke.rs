//! End-to-end runs of the querylab binary against temporary SQLite stores

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

fn querylab(db: &Path) -> Command {
    let mut cmd = Command::cargo_bin("querylab").unwrap();
    cmd.env_remove("QUERYLAB_DATABASE_URL")
        .env("NO_COLOR", "1")
        .arg("--database-url")
        .arg(format!("sqlite://{}", db.display()));
    cmd
}

fn stdout_lines(cmd: &mut Command) -> Vec<String> {
    let output = cmd.assert().success().get_output().stdout.clone();
    String::from_utf8(output)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

fn timing_line(subject: &str, books: usize) -> impl Predicate<str> {
    predicate::str::is_match(format!(
        r"^{subject} took \d+\.\d{{4}} seconds for {books} books\.$"
    ))
    .unwrap()
}

// === Help ===

#[test]
fn test_help_lists_commands() {
    let mut cmd = Command::cargo_bin("querylab").unwrap();
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("optimize-queries"))
        .stdout(predicate::str::contains("optimize-relations"));
}

#[test]
fn test_database_url_flag_documented() {
    let mut cmd = Command::cargo_bin("querylab").unwrap();
    cmd.arg("optimize-queries").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("SQLite database URL"));
}

// === optimize-queries ===

#[test]
fn test_optimize_queries_on_empty_store() {
    let dir = tempdir().unwrap();
    let lines = stdout_lines(querylab(&dir.path().join("basic.db")).arg("optimize-queries"));

    assert_eq!(lines.len(), 6, "{lines:?}");
    assert_eq!(lines[0], "No data found. Creating sample data...");
    assert_eq!(lines[1], "Sample data created.");
    assert_eq!(lines[2], "Running slow query (N+1 problem)...");
    assert!(timing_line("Slow query", 100).eval(&lines[3]), "{}", lines[3]);
    assert_eq!(lines[4], "Running optimized query (using a join)...");
    assert!(timing_line("Optimized query", 100).eval(&lines[5]), "{}", lines[5]);
}

#[test]
fn test_optimize_queries_second_run_skips_seeding() {
    let dir = tempdir().unwrap();
    let db = dir.path().join("rerun.db");

    querylab(&db).arg("optimize-queries").assert().success();

    querylab(&db)
        .arg("optimize-queries")
        .assert()
        .success()
        .stdout(predicate::str::contains("Sample data created.").not())
        .stdout(predicate::str::contains("for 100 books."));
}

// === optimize-relations ===

#[test]
fn test_optimize_relations_on_empty_store() {
    let dir = tempdir().unwrap();
    let lines = stdout_lines(querylab(&dir.path().join("extended.db")).arg("optimize-relations"));

    assert_eq!(lines.len(), 10, "{lines:?}");
    assert_eq!(lines[1], "Sample data created.");
    assert!(timing_line("Slow query", 100).eval(&lines[3]), "{}", lines[3]);
    assert!(timing_line("Optimized query", 100).eval(&lines[5]), "{}", lines[5]);
    assert_eq!(lines[6], "Running slow category query (N+1 problem)...");
    assert!(timing_line("Slow category query", 100).eval(&lines[7]), "{}", lines[7]);
    assert_eq!(
        lines[8],
        "Running optimized category query (using a batched prefetch)..."
    );
    assert!(
        timing_line("Optimized category query", 100).eval(&lines[9]),
        "{}",
        lines[9]
    );
}

#[test]
fn test_optimize_relations_second_run_skips_seeding() {
    let dir = tempdir().unwrap();
    let db = dir.path().join("extended-rerun.db");

    querylab(&db).arg("optimize-relations").assert().success();

    let lines = stdout_lines(querylab(&db).arg("optimize-relations"));
    assert_eq!(lines.len(), 8, "{lines:?}");
    assert!(lines.iter().all(|l| !l.contains("Sample data")));
}

#[test]
fn test_relations_after_queries_duplicates_data() {
    // Authors exist but categories do not, so the extended guard seeds again
    let dir = tempdir().unwrap();
    let db = dir.path().join("gap.db");

    querylab(&db).arg("optimize-queries").assert().success();

    let lines = stdout_lines(querylab(&db).arg("optimize-relations"));
    assert_eq!(lines[1], "Sample data created.");
    assert!(timing_line("Slow query", 200).eval(&lines[3]), "{}", lines[3]);
    assert!(
        timing_line("Optimized category query", 200).eval(&lines[9]),
        "{}",
        lines[9]
    );
}

// === Configuration and failures ===

#[test]
fn test_config_file_supplies_database() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("querylab.toml");
    let db = dir.path().join("from-config.db");
    std::fs::write(
        &config,
        format!("database_url = \"sqlite://{}\"\n", db.display()),
    )
    .unwrap();

    let mut cmd = Command::cargo_bin("querylab").unwrap();
    cmd.env_remove("QUERYLAB_DATABASE_URL")
        .arg("--config")
        .arg(&config)
        .arg("optimize-queries");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Sample data created."));
    assert!(db.exists());
}

#[test]
fn test_database_url_from_env() {
    let dir = tempdir().unwrap();
    let db = dir.path().join("from-env.db");

    let mut cmd = Command::cargo_bin("querylab").unwrap();
    cmd.env(
        "QUERYLAB_DATABASE_URL",
        format!("sqlite://{}", db.display()),
    )
    .arg("optimize-queries");

    cmd.assert().success();
    assert!(db.exists());
}

#[test]
fn test_invalid_config_fails() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("bad.toml");
    std::fs::write(&config, "max_connections = 0\n").unwrap();

    let mut cmd = Command::cargo_bin("querylab").unwrap();
    cmd.env_remove("QUERYLAB_DATABASE_URL")
        .arg("--config")
        .arg(&config)
        .arg("optimize-queries");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Failed to resolve store configuration"));
}

#[test]
fn test_unopenable_store_fails() {
    let dir = tempdir().unwrap();
    let db = dir.path().join("missing").join("nested").join("store.db");

    querylab(&db)
        .arg("optimize-queries")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to open store"));
}
