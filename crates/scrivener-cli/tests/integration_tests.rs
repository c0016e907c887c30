//! Integration tests for scrivener-cli
//!
//! These tests run the proofread command end to end on temporary files,
//! with the local sources only (no network).

use std::fs;
use std::path::{Path, PathBuf};

use scrivener_cli::cli::{ModeArg, ProofreadArgs};
use scrivener_cli::commands::execute_proofread;
use scrivener_cli::{CliError, Config, Formatter, OutputFormat};
use scrivener_orchestrator::RunState;

fn args(file: &Path) -> ProofreadArgs {
    ProofreadArgs {
        file: file.to_path_buf(),
        mode: None,
        dry_run: false,
        report: None,
        dictionary: None,
        no_llm: true,
        no_grammar: true,
        no_backup: false,
    }
}

fn formatter() -> Formatter {
    Formatter::new(OutputFormat::Text, false)
}

fn backup_of(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".bak");
    PathBuf::from(name)
}

#[tokio::test]
async fn test_completed_run_writes_corrections_and_backup() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("letter.txt");
    let report_path = dir.path().join("report.json");
    fs::write(&path, "vlta\n\nrecieve\n").unwrap();

    let report = execute_proofread(
        ProofreadArgs {
            report: Some(report_path.clone()),
            ..args(&path)
        },
        &Config::default(),
        &formatter(),
    )
    .await
    .unwrap();

    assert_eq!(report.state, RunState::Completed);
    assert_eq!(report.applied, 2);
    assert_eq!(fs::read_to_string(&path).unwrap(), "volta\n\nreceive\n");
    assert_eq!(fs::read_to_string(backup_of(&path)).unwrap(), "vlta\n\nrecieve\n");

    let json = fs::read_to_string(&report_path).unwrap();
    assert!(json.contains("\"state\": \"completed\""));
}

#[tokio::test]
async fn test_failed_run_leaves_file_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.txt");
    let original = "vlta\n\nThis is fine.\n\nSo is this.\n\nNothing to do here.\n\nAll good.\n";
    fs::write(&path, original).unwrap();

    let report = execute_proofread(args(&path), &Config::default(), &formatter())
        .await
        .unwrap();

    assert_eq!(report.state, RunState::Failed);
    assert_eq!(report.processed, 5);
    assert_eq!(report.applied, 1);
    assert_eq!(fs::read_to_string(&path).unwrap(), original);
    assert!(!backup_of(&path).exists());
}

#[tokio::test]
async fn test_dry_run_leaves_file_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("draft.txt");
    fs::write(&path, "vlta\n").unwrap();

    let report = execute_proofread(
        ProofreadArgs {
            dry_run: true,
            ..args(&path)
        },
        &Config::default(),
        &formatter(),
    )
    .await
    .unwrap();

    assert!(report.dry_run);
    assert_eq!(report.applied, 1);
    assert_eq!(fs::read_to_string(&path).unwrap(), "vlta\n");
    assert!(!backup_of(&path).exists());
}

#[tokio::test]
async fn test_dictionary_file_extends_builtin_entries() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("essay.txt");
    let dictionary = dir.path().join("dictionary.toml");
    fs::write(&path, "acheive\n").unwrap();
    fs::write(&dictionary, "[replacements]\nacheive = \"achieve\"\n").unwrap();

    let report = execute_proofread(
        ProofreadArgs {
            dictionary: Some(dictionary),
            mode: Some(ModeArg::Permissive),
            no_backup: true,
            ..args(&path)
        },
        &Config::default(),
        &formatter(),
    )
    .await
    .unwrap();

    assert_eq!(report.applied_by_source.get("dictionary"), Some(&1));
    assert_eq!(fs::read_to_string(&path).unwrap(), "achieve\n");
    assert!(!backup_of(&path).exists());
}

#[tokio::test]
async fn test_invalid_config_fails_before_reading_document() {
    let mut config = Config::default();
    config.llm.enabled = true;
    config.llm.endpoint = String::new();

    let result = execute_proofread(
        ProofreadArgs {
            no_llm: false,
            ..args(Path::new("/nonexistent/scrivener/input.txt"))
        },
        &config,
        &formatter(),
    )
    .await;

    assert!(matches!(result, Err(CliError::Config(_))));
}

#[tokio::test]
async fn test_missing_document_is_an_error() {
    let result = execute_proofread(
        args(Path::new("/nonexistent/scrivener/input.txt")),
        &Config::default(),
        &formatter(),
    )
    .await;

    assert!(matches!(result, Err(CliError::Document(_))));
}
