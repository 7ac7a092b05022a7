//! End-to-end CLI tests for chatdoc.
//!
//! These tests run the actual binary and inspect the document it writes.
//!
//! # Test Categories
//!
//! - **Basic functionality**: each input kind works via CLI
//! - **Output formats**: Markdown, PDF, Word and Excel generation
//! - **Flags**: styling, strict tables, config file, verbosity
//! - **Error handling**: proper error messages for bad input
//!
//! # Running Tests
//!
//! ```bash
//! cargo test --test cli_e2e
//! ```

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::{TempDir, tempdir};

// ============================================================================
// Test Fixtures
// ============================================================================

/// Creates a temporary directory with one fixture per input kind.
fn setup_fixtures() -> TempDir {
    let dir = tempdir().expect("Failed to create temp dir");

    fs::write(
        dir.path().join("notes.txt"),
        "PROJECT STATUS\nOwner: Sid. Review on Friday.\n\nDocs: https://example.com\n",
    )
    .unwrap();

    fs::write(
        dir.path().join("roster.csv"),
        "Name,Age,City\nSid,35,Oslo\nAna,29,Lima\n",
    )
    .unwrap();

    fs::write(
        dir.path().join("rows.json"),
        r#"[{"Name": "Sid", "Age": 35}, {"Name": "Ana", "Age": 29}]"#,
    )
    .unwrap();

    fs::write(
        dir.path().join("table.txt"),
        "| Name | Age |\n| --- | --- |\n| Sid | 35 |\n",
    )
    .unwrap();

    fs::write(dir.path().join("snow.txt"), "Snow ☃ day\n").unwrap();
    fs::write(dir.path().join("blank.txt"), "\n   \n").unwrap();

    dir
}

fn chatdoc_cmd() -> Command {
    let cmd = std::process::Command::new(env!("CARGO_BIN_EXE_chatdoc"));
    Command::from_std(cmd)
}

/// Returns the single generated document in `dir` with the given extension.
fn generated(dir: &Path, ext: &str) -> PathBuf {
    let found: Vec<PathBuf> = fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .filter(|path| path.extension().is_some_and(|e| e == ext))
        .collect();
    assert_eq!(found.len(), 1, "expected one .{ext} file in {}", dir.display());
    let name = found[0].file_name().unwrap().to_str().unwrap();
    assert!(name.starts_with("chat_document_"), "unexpected name {name}");
    found[0].clone()
}

// ============================================================================
// Basic Functionality Tests
// ============================================================================

mod basic_functionality {
    use super::*;

    #[test]
    fn test_lines_to_markdown() {
        let fixtures = setup_fixtures();
        let out = fixtures.path().join("out");

        chatdoc_cmd()
            .arg(fixtures.path().join("notes.txt"))
            .arg("-o")
            .arg(&out)
            .assert()
            .success()
            .stdout(predicate::str::contains("Done"))
            .stdout(predicate::str::contains("Found 3 records"))
            .stdout(predicate::str::contains("text/markdown"));

        let content = fs::read_to_string(generated(&out, "md")).unwrap();
        assert_eq!(
            content,
            "PROJECT STATUS\n\nOwner: Sid. Review on Friday.\n\nDocs: https://example.com\n\n"
        );
    }

    #[test]
    fn test_csv_to_markdown_table() {
        let fixtures = setup_fixtures();
        let out = fixtures.path().join("out");

        chatdoc_cmd()
            .arg(fixtures.path().join("roster.csv"))
            .args(["-f", "md", "-o"])
            .arg(&out)
            .assert()
            .success()
            .stdout(predicate::str::contains("CSV"));

        let content = fs::read_to_string(generated(&out, "md")).unwrap();
        assert!(content.starts_with("| Name | Age | City |\n| --- | --- | --- |\n"));
    }

    #[test]
    fn test_json_rows() {
        let fixtures = setup_fixtures();
        let out = fixtures.path().join("out");

        chatdoc_cmd()
            .arg(fixtures.path().join("rows.json"))
            .arg("-o")
            .arg(&out)
            .assert()
            .success();

        let content = fs::read_to_string(generated(&out, "md")).unwrap();
        assert!(content.contains("| Sid | 35 |"));
    }

    #[test]
    fn test_stdin_text_block() {
        let dir = tempdir().unwrap();

        chatdoc_cmd()
            .args(["-", "--input", "text", "-o"])
            .arg(dir.path())
            .write_stdin("| A | B |\n| 1 | 2 |\n")
            .assert()
            .success()
            .stdout(predicate::str::contains("<stdin>"));

        let content = fs::read_to_string(generated(dir.path(), "md")).unwrap();
        assert_eq!(content, "| A | B |\n| --- | --- |\n| 1 | 2 |\n");
    }

    #[test]
    fn test_creates_output_dir() {
        let fixtures = setup_fixtures();
        let out = fixtures.path().join("nested").join("exports");

        chatdoc_cmd()
            .arg(fixtures.path().join("notes.txt"))
            .arg("-o")
            .arg(&out)
            .assert()
            .success();

        assert!(out.is_dir());
    }
}

// ============================================================================
// Output Format Tests
// ============================================================================

mod output_formats {
    use super::*;

    #[test]
    fn test_pdf_output() {
        let fixtures = setup_fixtures();
        let out = fixtures.path().join("out");

        chatdoc_cmd()
            .arg(fixtures.path().join("roster.csv"))
            .args(["-f", "pdf", "-o"])
            .arg(&out)
            .assert()
            .success()
            .stdout(predicate::str::contains("application/pdf"));

        let bytes = fs::read(generated(&out, "pdf")).unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
    }

    #[test]
    fn test_word_output() {
        let fixtures = setup_fixtures();
        let out = fixtures.path().join("out");

        chatdoc_cmd()
            .arg(fixtures.path().join("table.txt"))
            .args(["--input", "text", "-f", "docx", "-o"])
            .arg(&out)
            .assert()
            .success()
            .stdout(predicate::str::contains("wordprocessingml"));

        let bytes = fs::read(generated(&out, "docx")).unwrap();
        assert!(bytes.starts_with(b"PK"));
    }

    #[test]
    fn test_excel_output() {
        let fixtures = setup_fixtures();
        let out = fixtures.path().join("out");

        chatdoc_cmd()
            .arg(fixtures.path().join("roster.csv"))
            .args(["--format", "excel", "-o"])
            .arg(&out)
            .assert()
            .success()
            .stdout(predicate::str::contains("spreadsheetml"));

        assert!(generated(&out, "xlsx").exists());
    }
}

// ============================================================================
// Flag Tests
// ============================================================================

mod flags {
    use super::*;

    #[test]
    fn test_styled_flag() {
        let fixtures = setup_fixtures();
        let out = fixtures.path().join("out");

        chatdoc_cmd()
            .arg(fixtures.path().join("notes.txt"))
            .args(["-f", "word", "--styled", "-o"])
            .arg(&out)
            .assert()
            .success()
            .stdout(predicate::str::contains("Styled"));
    }

    #[test]
    fn test_config_file() {
        let fixtures = setup_fixtures();
        let out = fixtures.path().join("out");
        let config = fixtures.path().join("render.json");
        fs::write(&config, r#"{"text_style": "styled"}"#).unwrap();

        chatdoc_cmd()
            .arg(fixtures.path().join("notes.txt"))
            .arg("--config")
            .arg(&config)
            .arg("-o")
            .arg(&out)
            .assert()
            .success()
            .stdout(predicate::str::contains("Styled"));
    }

    #[test]
    fn test_verbose_logs_to_stderr() {
        let fixtures = setup_fixtures();
        let out = fixtures.path().join("out");

        chatdoc_cmd()
            .env_remove("RUST_LOG")
            .arg(fixtures.path().join("notes.txt"))
            .args(["-v", "-o"])
            .arg(&out)
            .assert()
            .success()
            .stderr(predicate::str::contains("exported document"));
    }

    #[test]
    fn test_verbose_and_quiet_conflict() {
        chatdoc_cmd()
            .args(["notes.txt", "-v", "-q"])
            .assert()
            .failure();
    }

    #[test]
    fn test_help() {
        chatdoc_cmd()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("--strict-tables"))
            .stdout(predicate::str::contains("EXAMPLES"));
    }

    #[test]
    fn test_version() {
        chatdoc_cmd()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
    }
}

// ============================================================================
// Error Handling Tests
// ============================================================================

mod error_handling {
    use super::*;

    #[test]
    fn test_missing_input_file() {
        let dir = tempdir().unwrap();

        chatdoc_cmd()
            .arg(dir.path().join("missing.txt"))
            .arg("-o")
            .arg(dir.path())
            .assert()
            .failure()
            .stderr(predicate::str::contains("Error"));
    }

    #[test]
    fn test_blank_input() {
        let fixtures = setup_fixtures();

        chatdoc_cmd()
            .arg(fixtures.path().join("blank.txt"))
            .arg("-o")
            .arg(fixtures.path())
            .assert()
            .failure()
            .stderr(predicate::str::contains("Invalid text input"));
    }

    #[test]
    fn test_pdf_font_error_message() {
        let fixtures = setup_fixtures();
        let out = fixtures.path().join("out");

        chatdoc_cmd()
            .arg(fixtures.path().join("snow.txt"))
            .args(["-f", "pdf", "-o"])
            .arg(&out)
            .assert()
            .failure()
            .stderr(predicate::str::contains("font/character issue"))
            .stderr(predicate::str::contains("U+2603"));

        assert_eq!(fs::read_dir(&out).unwrap().count(), 0);
    }

    #[test]
    fn test_unknown_format() {
        chatdoc_cmd()
            .args(["notes.txt", "-f", "html"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("html"));
    }
}
