//! Integration tests for CLI commands.

use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

struct Keys {
    secret: String,
    public: String,
}

fn run_cli(args: &[&str]) -> (bool, String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_readproof"))
        .args(args)
        .env_remove("READPROOF_JOURNAL")
        .env_remove("READPROOF_SIGNING_KEY")
        .env_remove("READPROOF_PUBLIC_KEY")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute CLI");

    let stdout = String::from_utf8(output.stdout).unwrap();
    let stderr = String::from_utf8(output.stderr).unwrap();
    (output.status.success(), stdout, stderr)
}

fn keygen() -> Keys {
    let (success, stdout, _) = run_cli(&["keygen", "--json"]);
    assert!(success);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    Keys {
        secret: parsed["signing_key"].as_str().unwrap().to_string(),
        public: parsed["public_key"].as_str().unwrap().to_string(),
    }
}

fn append(journal: &Path, keys: &Keys, subject: &str, signer: &str) -> (bool, String, String) {
    let journal = journal.to_string_lossy();
    let email = format!("{signer}@example.com");
    run_cli(&[
        "append",
        "--journal",
        &journal,
        "--signing-key",
        &keys.secret,
        "--subject",
        subject,
        "--signer",
        signer,
        "--email",
        &email,
        "--signed-at",
        "2024-03-01T13:00:00+01:00",
        "--json",
    ])
}

fn create_test_journal(keys: &Keys) -> (TempDir, String) {
    let temp_dir = TempDir::new().unwrap();
    let journal_path = temp_dir.path().join("ledger.rpj");
    for (subject, signer) in [("doc-1", "alice"), ("doc-1", "bob"), ("doc-2", "alice")] {
        let (success, _, stderr) = append(&journal_path, keys, subject, signer);
        assert!(success, "append failed: {stderr}");
    }
    (temp_dir, journal_path.to_string_lossy().to_string())
}

#[test]
fn test_keygen_and_pubkey_agree() {
    let keys = keygen();
    let (success, stdout, _) = run_cli(&["pubkey", "--signing-key", &keys.secret]);
    assert!(success);
    assert_eq!(stdout.trim(), keys.public);
}

#[test]
fn test_pubkey_rejects_bad_secret() {
    let (success, _, stderr) = run_cli(&["pubkey", "--signing-key", "c2hvcnQ="]);
    assert!(!success);
    assert!(stderr.contains("invalid key material"));
}

#[test]
fn test_append_outputs_linked_records() {
    let keys = keygen();
    let temp_dir = TempDir::new().unwrap();
    let journal_path = temp_dir.path().join("ledger.rpj");

    let (success, stdout, _) = append(&journal_path, &keys, "doc-1", "alice");
    assert!(success);
    let first: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(first["id"], 1);
    assert!(first["prev_hash"].is_null());
    assert_eq!(first["signed_at"], "2024-03-01T13:00:00+01:00");

    let (success, stdout, _) = append(&journal_path, &keys, "doc-1", "bob");
    assert!(success);
    let second: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(second["id"], 2);
    assert_eq!(second["prev_hash"], first["payload_hash"]);
}

#[test]
fn test_append_twice_is_already_acknowledged() {
    let keys = keygen();
    let (temp_dir, _) = create_test_journal(&keys);
    let journal_path = temp_dir.path().join("ledger.rpj");

    let (success, _, stderr) = append(&journal_path, &keys, "doc-1", "alice");
    assert!(!success);
    assert!(stderr.contains("already acknowledged"));
}

#[test]
fn test_append_refuses_changed_subject() {
    let keys = keygen();
    let temp_dir = TempDir::new().unwrap();
    let journal = temp_dir.path().join("ledger.rpj");
    let journal = journal.to_string_lossy();

    let (success, _, stderr) = run_cli(&[
        "append",
        "--journal",
        &journal,
        "--signing-key",
        &keys.secret,
        "--subject",
        "doc-1",
        "--signer",
        "alice",
        "--email",
        "alice@example.com",
        "--checksum",
        "v1",
        "--current-checksum",
        "v2",
    ]);
    assert!(!success);
    assert!(stderr.contains("changed"));
}

#[test]
fn test_append_without_key_warns_about_ephemeral_key() {
    let temp_dir = TempDir::new().unwrap();
    let journal = temp_dir.path().join("ledger.rpj");
    let journal = journal.to_string_lossy();

    let (success, _, stderr) = run_cli(&[
        "append",
        "--journal",
        &journal,
        "--subject",
        "doc-1",
        "--signer",
        "alice",
        "--email",
        "alice@example.com",
    ]);
    assert!(success);
    assert!(stderr.contains("ephemeral key"));
}

#[test]
fn test_list_command() {
    let keys = keygen();
    let (_temp_dir, journal_path) = create_test_journal(&keys);

    let (success, stdout, _) = run_cli(&["list", &journal_path]);
    assert!(success);
    assert!(stdout.contains("SUBJECT"));
    assert!(stdout.contains("doc-2"));
}

#[test]
fn test_list_json_output_with_filters() {
    let keys = keygen();
    let (_temp_dir, journal_path) = create_test_journal(&keys);

    let (success, stdout, _) = run_cli(&["list", &journal_path, "--json", "--signer", "alice"]);
    assert!(success);
    let lines: Vec<&str> = stdout.lines().filter(|l| !l.is_empty()).collect();
    assert_eq!(lines.len(), 2);
    for line in lines {
        let parsed: serde_json::Value = serde_json::from_str(line).expect("Invalid JSON");
        assert_eq!(parsed["signer_id"], "alice");
    }

    let (success, stdout, _) = run_cli(&[
        "list",
        &journal_path,
        "--json",
        "--after",
        "2024-03-01T12:00:01Z",
    ]);
    assert!(success);
    assert!(stdout.trim().is_empty());
}

#[test]
fn test_list_missing_journal_fails() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("nope.rpj");
    let (success, _, stderr) = run_cli(&["list", &missing.to_string_lossy()]);
    assert!(!success);
    assert!(stderr.contains("does not exist"));
}

#[test]
fn test_verify_command() {
    let keys = keygen();
    let (_temp_dir, journal_path) = create_test_journal(&keys);

    let (success, stdout, _) = run_cli(&[
        "verify",
        &journal_path,
        "--public-key",
        &keys.public,
        "--strict",
    ]);
    assert!(success);
    assert!(stdout.contains("checked 3 record(s)"));
    assert!(stdout.contains("OK"));
}

#[test]
fn test_verify_json_range() {
    let keys = keygen();
    let (_temp_dir, journal_path) = create_test_journal(&keys);

    let (success, stdout, _) = run_cli(&[
        "verify",
        &journal_path,
        "--public-key",
        &keys.public,
        "--from",
        "2",
        "--to",
        "9",
        "--json",
    ]);
    assert!(success);
    let report: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(report["from"], 2);
    assert_eq!(report["to"], 3);
    assert_eq!(report["checked"], 2);
    assert_eq!(report["discrepancies"].as_array().unwrap().len(), 0);
}

#[test]
fn test_verify_with_wrong_key_is_tampered() {
    let keys = keygen();
    let other = keygen();
    let (_temp_dir, journal_path) = create_test_journal(&keys);

    let (success, stdout, _) = run_cli(&["verify", &journal_path, "--public-key", &other.public]);
    assert!(success, "non-strict verify reports but does not fail");
    assert!(stdout.contains("TAMPERED"));
    assert!(stdout.contains("signature_invalid"));

    let (strict_success, _, _) = run_cli(&[
        "verify",
        &journal_path,
        "--public-key",
        &other.public,
        "--strict",
    ]);
    assert!(!strict_success);
}

#[test]
fn test_verify_requires_a_key() {
    let keys = keygen();
    let (_temp_dir, journal_path) = create_test_journal(&keys);

    let (success, _, stderr) = run_cli(&["verify", &journal_path]);
    assert!(!success);
    assert!(stderr.contains("public key is required"));
}

#[test]
fn test_canonicalize_command() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("fact.json");
    std::fs::write(
        &input,
        r#"{
            "subject_id": "doc-1",
            "signer_id": "alice",
            "signer_email": "Alice@Example.com",
            "signed_at": "2024-03-01T13:00:00+01:00",
            "nonce": "AAAAAAAAAAAAAAAAAAAAAA",
            "subject_checksum": "v1"
        }"#,
    )
    .unwrap();

    let (success, stdout, _) = run_cli(&["canonicalize", &input.to_string_lossy()]);
    assert!(success);
    assert_eq!(
        stdout.trim_end(),
        "subject_id=doc-1\nsigner_id=alice\nsigner_email=alice@example.com\n\
         signed_at=2024-03-01T12:00:00.000000000Z\nnonce=AAAAAAAAAAAAAAAAAAAAAA\n\
         subject_checksum=v1"
    );

    let (success, stdout, _) = run_cli(&["canonicalize", &input.to_string_lossy(), "--hash"]);
    assert!(success);
    assert_eq!(stdout.trim().len(), 43);
}

fn stretch_first_frame(journal_path: &str) {
    // Third length byte of the first frame header, just past the 16-byte
    // file header.
    let mut bytes = std::fs::read(journal_path).unwrap();
    bytes[16 + 6] ^= 0x01;
    std::fs::write(journal_path, &bytes).unwrap();
}

#[test]
fn test_verify_strict_fails_on_corrupted_middle_frame() {
    let keys = keygen();
    let (_temp_dir, journal_path) = create_test_journal(&keys);
    stretch_first_frame(&journal_path);
    let size = std::fs::metadata(&journal_path).unwrap().len();

    let (success, stdout, stderr) = run_cli(&[
        "verify",
        &journal_path,
        "--public-key",
        &keys.public,
        "--strict",
    ]);
    assert!(!success);
    assert!(!stdout.contains("OK"));
    assert!(stderr.contains("truncated frame"));

    let (success, _, _) = run_cli(&["list", &journal_path]);
    assert!(!success);

    let (success, _, stderr) = append(Path::new(&journal_path), &keys, "doc-3", "carol");
    assert!(!success);
    assert!(stderr.contains("truncated frame"));

    let (success, _, stderr) = run_cli(&["repair", &journal_path]);
    assert!(!success);
    assert!(stderr.contains("more frames follow"));
    assert_eq!(std::fs::metadata(&journal_path).unwrap().len(), size);
}

#[test]
fn test_repair_drops_torn_final_frame() {
    let keys = keygen();
    let (_temp_dir, journal_path) = create_test_journal(&keys);
    let intact = std::fs::metadata(&journal_path).unwrap().len();
    let mut bytes = std::fs::read(&journal_path).unwrap();
    bytes.extend_from_slice(&[0x01, 0, 0, 0, 0x00, 0x02, 0, 0]);
    bytes.extend_from_slice(br#"{"id":4,"subject_id":"#);
    std::fs::write(&journal_path, &bytes).unwrap();

    let (success, _, _) = run_cli(&["verify", &journal_path, "--public-key", &keys.public]);
    assert!(!success);

    let (success, stdout, _) = run_cli(&["repair", &journal_path]);
    assert!(success);
    assert!(stdout.contains("discarded"));
    assert_eq!(std::fs::metadata(&journal_path).unwrap().len(), intact);

    let (success, stdout, _) = run_cli(&[
        "verify",
        &journal_path,
        "--public-key",
        &keys.public,
        "--strict",
    ]);
    assert!(success);
    assert!(stdout.contains("checked 3 record(s)"));

    let (success, stdout, _) = run_cli(&["repair", &journal_path]);
    assert!(success);
    assert!(stdout.contains("nothing to repair"));
}

#[test]
fn test_append_rejects_subject_with_line_break() {
    let keys = keygen();
    let temp_dir = TempDir::new().unwrap();
    let journal_path = temp_dir.path().join("ledger.rpj");

    let (success, _, stderr) = append(&journal_path, &keys, "doc-1\nsigner_id=mallory", "alice");
    assert!(!success);
    assert!(stderr.contains("Invalid subject"));
}
