//! Integration tests for the doctext CLI
//!
//! Tests each command with real invocations.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Helper to create a CLI command
fn cli() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_doctext"));
    cmd.env_remove("RUST_LOG");
    cmd
}

// ============ EXTRACT COMMAND TESTS ============

#[test]
fn test_extract_help() {
    cli()
        .arg("extract")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Extract text from a document"));
}

#[test]
fn test_extract_text_file() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("notes.txt");
    fs::write(&input, "hello from a file").unwrap();

    cli()
        .current_dir(dir.path())
        .arg("extract")
        .arg(&input)
        .assert()
        .success()
        .stdout("hello from a file\n");
}

#[test]
fn test_extract_buffer_to_output_file() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("notes.log");
    let output = dir.path().join("out.txt");
    fs::write(&input, "buffered").unwrap();

    cli()
        .current_dir(dir.path())
        .args(["-q", "extract", "--buffer", "-o"])
        .arg(&output)
        .arg(&input)
        .assert()
        .success()
        .stdout("");

    assert_eq!(fs::read_to_string(&output).unwrap(), "buffered");
}

#[test]
fn test_extract_pptx_buffer_placeholder() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("deck.pptx");
    fs::write(&input, b"PK\x03\x04").unwrap();

    cli()
        .current_dir(dir.path())
        .args(["extract", "--buffer"])
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "[PPTX file uploaded - processing not available in serverless environment]",
        ))
        .stderr(predicate::str::contains("Warning:"));
}

#[test]
fn test_extract_image_without_ocr() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("scan.png");
    fs::write(&input, b"\x89PNG\r\n\x1a\n").unwrap();

    cli()
        .current_dir(dir.path())
        .args(["extract", "--no-ocr"])
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "[Image uploaded - OCR processing not available in serverless environment]",
        ));
}

#[test]
fn test_extract_unsupported_mime_fails() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("bundle.bin");
    fs::write(&input, b"PK").unwrap();

    cli()
        .current_dir(dir.path())
        .args(["extract", "--mime", "application/zip"])
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Unsupported MIME type: application/zip",
        ));
}

#[test]
fn test_extract_unknown_extension_fails() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("bundle.zip");
    fs::write(&input, b"PK").unwrap();

    cli()
        .current_dir(dir.path())
        .arg("extract")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("--mime"));
}

#[test]
fn test_extract_corrupt_docx_fails() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("report.docx");
    fs::write(&input, "not a zip").unwrap();

    cli()
        .current_dir(dir.path())
        .arg("extract")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("DOCX extraction failed"));
}

#[test]
fn test_ocr_flags_conflict() {
    cli()
        .args(["extract", "--ocr", "--no-ocr", "x.png"])
        .assert()
        .failure();
}

#[test]
fn test_config_file_sets_pdf_limit() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("big.pdf");
    fs::write(&input, vec![0u8; 4096]).unwrap();
    let config = dir.path().join("custom.toml");
    fs::write(&config, "[extract]\nmax_pdf_size_mb = 0.001\n").unwrap();

    cli()
        .current_dir(dir.path())
        .arg("--config")
        .arg(&config)
        .arg("extract")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("[Large PDF uploaded - "));
}

#[test]
fn test_project_config_discovered() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("big.pdf");
    fs::write(&input, vec![0u8; 4096]).unwrap();
    fs::write(
        dir.path().join(".doctext.toml"),
        "[extract]\nmax_pdf_size_mb = 0.001\n",
    )
    .unwrap();

    cli()
        .current_dir(dir.path())
        .arg("extract")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("Large PDF uploaded"));
}

#[test]
fn test_broken_project_config_is_logged_and_skipped() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("notes.txt");
    fs::write(&input, "still extracted").unwrap();
    fs::write(dir.path().join(".doctext.toml"), "[extract\n").unwrap();

    cli()
        .current_dir(dir.path())
        .arg("extract")
        .arg(&input)
        .assert()
        .success()
        .stdout("still extracted\n")
        .stderr(predicate::str::contains("WARN"))
        .stderr(predicate::str::contains("Ignoring config file .doctext.toml"));
}

#[test]
fn test_invalid_explicit_config_fails() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("broken.toml");
    fs::write(&config, "[extract\n").unwrap();

    cli()
        .arg("--config")
        .arg(&config)
        .arg("formats")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse config file"));
}

// ============ FORMATS COMMAND TESTS ============

#[test]
fn test_formats_table() {
    cli()
        .arg("formats")
        .assert()
        .success()
        .stdout(predicate::str::contains("application/pdf"))
        .stdout(predicate::str::contains("image/webp"));
}

#[test]
fn test_formats_json() {
    let output = cli().args(["formats", "--json"]).output().unwrap();
    assert!(output.status.success());

    let formats: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let formats = formats.as_array().unwrap();
    assert_eq!(formats.len(), 8);
    assert!(formats
        .iter()
        .any(|f| f["format"] == "TXT" && f["mime_type"] == "text/plain"));
    assert!(formats
        .iter()
        .any(|f| f["format"] == "PDF" && f["on_failure"] == "placeholder"));
}
