// CLI integration tests: stdin mode, file mode, stats output and fail-fast
// WHY: The binary is the only consumer of batch + config loading together

use serde_json::Value;
use std::fs;
use std::io::Write;
use std::process::{Command, Stdio};
use tempfile::TempDir;

fn seams_fix() -> Command {
    Command::new(env!("CARGO_BIN_EXE_seams-fix"))
}

#[test]
fn test_stdin_to_stdout() {
    let mut child = seams_fix()
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn seams-fix");

    child
        .stdin
        .take()
        .expect("stdin not captured")
        .write_all(b"Item no. 5 is here. She works at Yahoo! In the marketing department.")
        .expect("Failed to write stdin");

    let output = child.wait_with_output().expect("Failed to wait for seams-fix");
    assert!(output.status.success(), "seams-fix failed: {}", String::from_utf8_lossy(&output.stderr));

    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(
        lines,
        vec!["Item no. 5 is here.", "She works at Yahoo! In the marketing department."]
    );
}

#[test]
fn test_files_with_output_dir_and_stats() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let input = temp_dir.path().join("book.txt");
    fs::write(&input, "It weighs 10 lbs. The box is heavy.").unwrap();
    let out_dir = temp_dir.path().join("out");
    let stats_file = temp_dir.path().join("stats.json");

    let output = seams_fix()
        .arg(&input)
        .arg("--output-dir")
        .arg(&out_dir)
        .arg("--stats-out")
        .arg(&stats_file)
        .output()
        .expect("Failed to run seams-fix");
    assert!(output.status.success(), "seams-fix failed: {}", String::from_utf8_lossy(&output.stderr));

    let corrected = fs::read_to_string(out_dir.join("book_seams_fix.txt")).unwrap();
    assert_eq!(corrected, "0\tIt weighs 10 lbs.\n1\tThe box is heavy.\n");

    let stats: Value = serde_json::from_str(&fs::read_to_string(&stats_file).unwrap()).unwrap();
    assert_eq!(stats["files_processed"], 1);
    assert_eq!(stats["files_failed"], 0);
    assert_eq!(stats["total_sentences_detected"], 2);
    let file_stat = &stats["file_stats"][0];
    assert_eq!(file_stat["status"], "success");
    assert!(file_stat["error"].is_null());
    assert_eq!(file_stat["fragments_in"], 2);
}

#[test]
fn test_no_segment_and_config_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let input = temp_dir.path().join("lines.txt");
    fs::write(&input, "See tbl.\n4 below.\n").unwrap();
    let config = temp_dir.path().join("config.json");
    fs::write(&config, r#"{"extra_abbreviations": {"ambiguous": ["tbl."]}}"#).unwrap();

    let output = seams_fix()
        .arg(&input)
        .arg("--no-segment")
        .arg("--config")
        .arg(&config)
        .output()
        .expect("Failed to run seams-fix");
    assert!(output.status.success(), "seams-fix failed: {}", String::from_utf8_lossy(&output.stderr));

    let corrected = fs::read_to_string(temp_dir.path().join("lines_seams_fix.txt")).unwrap();
    assert_eq!(corrected, "0\tSee tbl. 4 below.\n");
}

#[test]
fn test_invalid_config_fails() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config = temp_dir.path().join("config.json");
    fs::write(&config, r#"{"extra_abbreviations": {"reference": ["no period"]}}"#).unwrap();

    let output = seams_fix()
        .arg("--config")
        .arg(&config)
        .stdin(Stdio::null())
        .output()
        .expect("Failed to run seams-fix");
    assert!(!output.status.success());
}

#[test]
fn test_missing_input_fails() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let output = seams_fix()
        .arg(temp_dir.path().join("missing.txt"))
        .output()
        .expect("Failed to run seams-fix");
    assert!(!output.status.success());
}
