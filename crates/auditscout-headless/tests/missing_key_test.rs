//! Integration test: the binary refuses to run without a Gemini key.

use std::process::Command;

#[test]
fn exits_one_with_message_when_key_is_absent() {
    let dir = tempfile::tempdir().unwrap();
    let output = Command::new(env!("CARGO_BIN_EXE_auditscout-headless"))
        .current_dir(dir.path())
        .env_remove("GEMINI_API_KEY")
        .env_remove("API_KEY")
        .env("AUDITSCOUT__REPORTS_DIR", dir.path().join("reports"))
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error: API_KEY environment variable is required."));
    assert!(!dir.path().join("reports").exists());
}
