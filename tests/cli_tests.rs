//! CLI tests for the cook-timer binary.
//!
//! Every test points `--prefs-file` at a temporary directory so the user's
//! real preferences are never touched.

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

// ============================================================================
// Test Helpers
// ============================================================================

fn cook_timer() -> Command {
    let mut cmd = Command::cargo_bin("cook-timer").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

fn prefs_path(dir: &TempDir) -> PathBuf {
    dir.path().join("prefs").join("preferences.json")
}

fn with_prefs<'a>(cmd: &'a mut Command, path: &Path) -> &'a mut Command {
    cmd.arg("--prefs-file").arg(path)
}

// ============================================================================
// General
// ============================================================================

#[test]
fn test_help_lists_subcommands() {
    cook_timer()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("cook"))
        .stdout(predicate::str::contains("prefs"))
        .stdout(predicate::str::contains("history"));
}

#[test]
fn test_completions_bash() {
    cook_timer()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("cook-timer"));
}

#[test]
fn test_cook_rejects_zero_seconds() {
    cook_timer()
        .args(["cook", "--seconds", "0"])
        .assert()
        .failure();
}

// ============================================================================
// Prefs
// ============================================================================

#[test]
fn test_prefs_defaults_without_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = prefs_path(&dir);

    with_prefs(&mut cook_timer(), &path)
        .args(["prefs", "get"])
        .assert()
        .success()
        .stdout(predicate::str::contains("theme = system"))
        .stdout(predicate::str::contains("timer_sound = default"));
    assert!(!path.exists());
}

#[test]
fn test_prefs_set_persists() {
    let dir = tempfile::tempdir().unwrap();
    let path = prefs_path(&dir);

    with_prefs(&mut cook_timer(), &path)
        .args(["prefs", "set", "timer-sound", "chime"])
        .assert()
        .success()
        .stdout(predicate::str::contains("timer_sound = chime"));

    with_prefs(&mut cook_timer(), &path)
        .args(["prefs", "get", "timer-sound"])
        .assert()
        .success()
        .stdout(predicate::str::diff("timer_sound = chime\n"));

    let raw = fs::read_to_string(&path).unwrap();
    assert!(raw.contains("\"timer_sound\": \"chime\""));
}

#[test]
fn test_prefs_set_rejects_unknown_value() {
    let dir = tempfile::tempdir().unwrap();
    let path = prefs_path(&dir);

    with_prefs(&mut cook_timer(), &path)
        .args(["prefs", "set", "theme", "neon"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("エラー"));
    assert!(!path.exists());
}

#[test]
fn test_corrupt_prefs_file_is_not_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("preferences.json");
    fs::write(&path, "{{{ definitely not json").unwrap();

    with_prefs(&mut cook_timer(), &path)
        .args(["prefs", "get", "theme"])
        .assert()
        .success()
        .stdout(predicate::str::contains("theme = system"));
}

// ============================================================================
// History
// ============================================================================

#[test]
fn test_history_show_and_clear() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("preferences.json");
    let history = r#"[{"role":"user","content":"Can I use butter?"},{"role":"assistant","content":"Yes."}]"#;
    let file = serde_json::json!({ "chat_history_pasta": history });
    fs::write(&path, file.to_string()).unwrap();

    with_prefs(&mut cook_timer(), &path)
        .args(["history", "show", "pasta"])
        .assert()
        .success()
        .stdout(predicate::str::contains("あなた: Can I use butter?"))
        .stdout(predicate::str::contains("アシスタント: Yes."));

    with_prefs(&mut cook_timer(), &path)
        .args(["history", "clear", "pasta"])
        .assert()
        .success()
        .stdout(predicate::str::contains("削除しました"));

    with_prefs(&mut cook_timer(), &path)
        .args(["history", "show", "pasta"])
        .assert()
        .success()
        .stdout(predicate::str::contains("チャット履歴はありません"));
}

#[test]
fn test_malformed_history_shows_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("preferences.json");
    let file = serde_json::json!({ "chat_history_pasta": "[{\"role\":" });
    fs::write(&path, file.to_string()).unwrap();

    with_prefs(&mut cook_timer(), &path)
        .args(["history", "show", "pasta"])
        .assert()
        .success()
        .stdout(predicate::str::contains("チャット履歴はありません"));
}

// ============================================================================
// Cook
// ============================================================================

#[test]
fn test_cook_runs_short_timer_to_completion() {
    let dir = tempfile::tempdir().unwrap();
    let path = prefs_path(&dir);

    with_prefs(&mut cook_timer(), &path)
        .args([
            "cook", "--step", "1", "--seconds", "2", "--text", "Stir", "--sound", "none",
        ])
        .timeout(std::time::Duration::from_secs(15))
        .assert()
        .success()
        .stdout(predicate::str::contains("タイマーを開始しました"))
        .stdout(predicate::str::contains("ステップ 2 のタイマーが終了しました"));
}

#[test]
fn test_cook_leave_hands_over_to_background() {
    let dir = tempfile::tempdir().unwrap();
    let path = prefs_path(&dir);

    with_prefs(&mut cook_timer(), &path)
        .args([
            "cook",
            "--seconds",
            "3",
            "--title",
            "Tomato pasta",
            "--leave-after",
            "1",
            "--sound",
            "none",
        ])
        .timeout(std::time::Duration::from_secs(15))
        .assert()
        .success()
        .stdout(predicate::str::contains("調理モードを離れました"))
        .stdout(predicate::str::contains("[Tomato pasta] ステップ 1"))
        .stdout(predicate::str::contains("ステップ 1 のタイマーが終了しました"));
}
