//! Command-line tests for the name-forge binary

use std::io::Write;

use assert_cmd::Command;
use predicates::prelude::*;

fn forge() -> Command {
    let mut cmd = Command::cargo_bin("name-forge").unwrap();
    // Keep the environment from leaking into configuration
    for key in [
        "NAME_FORGE_CORPUS",
        "NAME_FORGE_COLUMN",
        "NAME_FORGE_STRATEGY",
        "NAME_FORGE_THRESHOLD",
        "NAME_FORGE_REDUCTION",
        "NAME_FORGE_MAX_ATTEMPTS",
        "NAME_FORGE_TIMEOUT_SECS",
        "NAME_FORGE_WORDS",
        "NAME_FORGE_PREFIX",
    ] {
        cmd.env_remove(key);
    }
    cmd
}

fn corpus_file() -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    writeln!(file, "Codigo,Nombre\n1,Aspirina\n2,Ibuprofeno\n3,Paracetamol").unwrap();
    file
}

#[test]
fn test_help_lists_subcommands() {
    forge()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("generate"))
        .stdout(predicate::str::contains("compare"))
        .stdout(predicate::str::contains("search"));
}

#[test]
fn test_compare_prints_breakdown_and_edits() {
    forge()
        .args(["compare", "cat", "cats"])
        .assert()
        .success()
        .stdout(predicate::str::contains("edit_ratio"))
        .stdout(predicate::str::contains("nysiis"))
        .stdout(predicate::str::contains("insert 's' at position 3"));
}

#[test]
fn test_compare_json() {
    let output = forge().args(["compare", "Robert", "Rupert", "--json"]).output().unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["candidate"], "Robert");
    assert_eq!(value["breakdown"]["soundex"], 100.0);
    assert!(value["justification"].is_array());
}

#[test]
fn test_generate_against_corpus_json() {
    let corpus = corpus_file();
    let output = forge()
        .args(["generate", "--json", "--count", "2", "--threshold", "70", "--corpus"])
        .arg(corpus.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let outcomes = value["outcomes"].as_array().unwrap();
    assert_eq!(outcomes.len(), 2);
    for outcome in outcomes {
        assert_eq!(outcome["outcome"], "accepted");
        assert!(outcome["score"].as_f64().unwrap() < 70.0);
    }
}

#[test]
fn test_generate_save_appends_to_corpus() {
    let corpus = corpus_file();
    forge()
        .args(["generate", "--save", "--threshold", "70", "--corpus"])
        .arg(corpus.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved"));

    let content = std::fs::read_to_string(corpus.path()).unwrap();
    assert_eq!(content.lines().count(), 5);
    assert!(content.starts_with("Codigo,Nombre"));
}

#[test]
fn test_generate_with_missing_corpus_continues() {
    forge()
        .args(["generate", "--corpus", "/no/such/corpus.csv"])
        .assert()
        .success()
        .stderr(predicate::str::contains("corpus"));
}

#[test]
fn test_generate_exhaustion_exit_code() {
    let corpus = corpus_file();
    forge()
        .args(["generate", "--threshold", "0", "--max-attempts", "10", "--corpus"])
        .arg(corpus.path())
        .assert()
        .code(2)
        .stdout(predicate::str::contains("No name below the threshold"));
}

#[test]
fn test_invalid_threshold_fails() {
    forge()
        .args(["generate", "--threshold", "250"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Threshold"));
}

#[test]
fn test_search_lists_dissimilar_names() {
    let corpus = corpus_file();
    forge()
        .args(["search", "Aspirine", "--threshold", "50", "--corpus"])
        .arg(corpus.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Paracetamol"))
        .stdout(predicate::str::contains("Aspirina").not());
}

#[test]
fn test_search_reads_spreadsheet_corpus() {
    forge()
        .args(["search", "Aspirine", "--threshold", "50", "--corpus", "tests/data/registered.xlsx"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Paracetamol"))
        .stdout(predicate::str::contains("Aspirina").not());
}

#[test]
fn test_prefix_with_non_letters_fails() {
    forge()
        .args(["generate", "--strategy", "lexical", "--prefix", "Aba-"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Prefix"));
}
