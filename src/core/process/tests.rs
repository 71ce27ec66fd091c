// ghdesk: GitHub repository desk
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::time::Duration;
use tokio_util::sync::CancellationToken;

use super::builder::{CommandResult, ProcessBuilder, RunFailure};

#[cfg(not(windows))]
#[tokio::test]
async fn test_process_echo() {
    let output = ProcessBuilder::new("echo")
        .arg("hello")
        .capture_output()
        .run()
        .await;

    assert!(output.exit_succeeded());
    insta::assert_snapshot!(output.stdout(), @"hello");
}

#[cfg(not(windows))]
#[tokio::test]
async fn test_process_uncaptured_output_is_only_traced() {
    let output = ProcessBuilder::new("echo").arg("hello").run().await;

    assert!(output.exit_succeeded());
    assert_eq!(output.stdout(), "");
    assert_eq!(output.stderr(), "");
}

#[cfg(not(windows))]
#[tokio::test]
async fn test_process_keeps_leading_whitespace_and_newlines() {
    let output = ProcessBuilder::raw("printf ' M a.txt\\n?? b.txt\\n'")
        .capture_output()
        .run()
        .await;

    assert_eq!(output.stdout(), " M a.txt\n?? b.txt\n");
}

#[cfg(not(windows))]
#[tokio::test]
async fn test_process_exit_code() {
    let output = ProcessBuilder::raw("echo oops >&2; exit 42")
        .capture_output()
        .run()
        .await;

    assert!(!output.exit_succeeded());
    assert_eq!(output.exit_code(), Some(42));
    assert!(output.failure().is_none());
    assert_eq!(output.stderr().trim(), "oops");
}

#[cfg(not(windows))]
#[tokio::test]
async fn test_process_env() {
    let output = ProcessBuilder::raw("echo $GHDESK_TEST_VAR")
        .env("GHDESK_TEST_VAR", "test_value")
        .capture_stdout()
        .run()
        .await;

    insta::assert_snapshot!(output.stdout().trim(), @"test_value");
}

#[tokio::test]
async fn test_process_failed_to_start() {
    let output = ProcessBuilder::new("nonexistent_program_12345")
        .capture_output()
        .run()
        .await;

    assert!(!output.exit_succeeded());
    assert!(output.failed_to_start());
    assert!(output.stderr().starts_with("failed to start"));
}

#[cfg(unix)]
#[tokio::test]
async fn test_process_timeout_kills_child() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let pid_file = dir.path().join("pid");
    let script = format!("echo $$ > '{}'; exec sleep 30", pid_file.display());

    let output = ProcessBuilder::raw(script)
        .capture_output()
        .timeout(Duration::from_millis(300))
        .run()
        .await;

    assert!(!output.exit_succeeded());
    assert!(output.timed_out(), "expected timeout, got {output:?}");

    let pid = std::fs::read_to_string(&pid_file).expect("pid file should exist");
    let alive = std::process::Command::new("kill")
        .args(["-0", pid.trim()])
        .status()
        .map(|s| s.success())
        .unwrap_or(false);
    assert!(!alive, "process {} should no longer be running", pid.trim());
}

#[cfg(unix)]
#[tokio::test]
async fn test_process_zero_timeout_waits() {
    let output = ProcessBuilder::raw("sleep 0.2; echo done")
        .capture_output()
        .timeout(Duration::ZERO)
        .run()
        .await;

    assert!(output.exit_succeeded());
    assert_eq!(output.stdout().trim(), "done");
}

#[cfg(unix)]
#[tokio::test]
async fn test_process_cancellation() {
    let token = CancellationToken::new();
    let trigger = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(200)).await;
        trigger.cancel();
    });

    let output = ProcessBuilder::raw("exec sleep 30")
        .capture_output()
        .run_with_cancellation(token)
        .await;

    assert_eq!(output.failure(), Some(&RunFailure::Interrupted));
}

#[cfg(unix)]
#[tokio::test]
async fn test_background_grandchild_does_not_outlive_timeout() {
    let started = std::time::Instant::now();
    let output = ProcessBuilder::raw("sleep 5 & echo hi")
        .capture_output()
        .timeout(Duration::from_millis(500))
        .run()
        .await;

    assert!(
        started.elapsed() < Duration::from_secs(3),
        "took {:?}",
        started.elapsed()
    );
    assert_eq!(output.exit_code(), Some(0));
    assert_eq!(output.stdout(), "hi\n");
}

#[cfg(unix)]
#[tokio::test]
async fn test_background_grandchild_does_not_outlive_cancellation() {
    let token = CancellationToken::new();
    let trigger = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(300)).await;
        trigger.cancel();
    });

    let started = std::time::Instant::now();
    let output = ProcessBuilder::raw("sleep 5 & echo hi")
        .capture_output()
        .run_with_cancellation(token)
        .await;

    assert!(
        started.elapsed() < Duration::from_secs(3),
        "took {:?}",
        started.elapsed()
    );
    assert_eq!(output.exit_code(), Some(0));
    assert_eq!(output.stdout(), "hi\n");
}

#[tokio::test]
async fn test_already_cancelled_does_not_spawn() {
    let token = CancellationToken::new();
    token.cancel();
    let output = ProcessBuilder::new("nonexistent_program_12345")
        .run_with_cancellation(token)
        .await;
    assert_eq!(output.failure(), Some(&RunFailure::Interrupted));
}

#[test]
fn test_command_result_combined_output() {
    let result = CommandResult::exited(1, "out\n", "err\n");
    assert_eq!(result.combined_output(), "out\nerr\n");
    assert!(!result.exit_succeeded());
    assert!(CommandResult::success("").exit_succeeded());
}

#[test]
fn test_failure_text_doubles_as_stderr() {
    let result = CommandResult::failed(RunFailure::TimedOut(Duration::from_secs(20)));
    insta::assert_snapshot!(result.stderr(), @"timed out after 20s");
}

#[test]
fn test_command_line_quotes_spaces() {
    let builder = ProcessBuilder::new("git").args(["commit", "-m", "fix the bug"]);
    insta::assert_snapshot!(builder.command_line(), @r#"git commit -m "fix the bug""#);
}

#[test]
fn test_executable_lookup_not_found() {
    let program = "nonexistent_program_12345";
    assert!(!ProcessBuilder::exists(program));
    assert!(ProcessBuilder::find(program).is_none());
}
