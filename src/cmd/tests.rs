// ghdesk: GitHub repository desk
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use async_trait::async_trait;
use insta::assert_snapshot;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use super::format;
use super::shell::{Shell, ShellCommand, parse_shell_command};
use crate::config::types::GitTimeouts;
use crate::core::process::builder::CommandResult;
use crate::error::SourceError;
use crate::git::cmd::{GitInvocation, GitRunner};
use crate::git::ops::Git;
use crate::git::status::parse_porcelain;
use crate::session::{CloneReport, PushOutcome, Session, SkipReason};
use crate::source::{RepoSource, RepositoryEntry, SearchCoordinator};

struct OctoSource;

#[async_trait]
impl RepoSource for OctoSource {
    async fn list(&self, _username: &str) -> Result<Vec<RepositoryEntry>, SourceError> {
        Ok(vec![
            RepositoryEntry::new("alpha", Some("git@github.com:octo/alpha.git".into())),
            RepositoryEntry::new("beta", None),
        ])
    }
}

/// Reports one modified file for every `git status` and records the rest.
#[derive(Default)]
struct DirtyGit {
    labels: Mutex<Vec<String>>,
}

#[async_trait]
impl GitRunner for DirtyGit {
    async fn run(&self, invocation: GitInvocation) -> CommandResult {
        let label = invocation.label();
        self.labels.lock().expect("lock poisoned").push(label.clone());
        if label.starts_with("git status") {
            CommandResult::success(" M notes.txt\n")
        } else {
            CommandResult::success("")
        }
    }
}

fn session_in(base: &Path, git: Git) -> Session {
    Session::new(
        SearchCoordinator::new(Arc::new(OctoSource)),
        git,
        base.to_path_buf(),
    )
}

async fn run_script(session: Session, script: &str) -> (Session, String) {
    let mut out = Vec::new();
    let shell = Shell::new(session, script.as_bytes(), &mut out, CancellationToken::new());
    let session = shell.run(None).await.expect("shell run");
    (session, String::from_utf8(out).expect("utf-8 output"))
}

// --- Format ---

#[test]
fn test_format_repositories_aligns_names() {
    let repos = vec![
        RepositoryEntry::new("alpha", Some("git@github.com:octo/alpha.git".into())),
        RepositoryEntry::new("beta", None),
    ];
    assert_snapshot!(format::repositories(&repos).join("\n"), @r"
    [0] alpha  git@github.com:octo/alpha.git
    [1] beta   (no clone URL)
    ");
}

#[test]
fn test_format_entries_numbers_changes() {
    let entries = parse_porcelain("?? notes.txt\nR  old.rs -> new.rs\n");
    assert_snapshot!(format::entries(&entries).join("\n"), @r"
    [0] ?? notes.txt
    [1] R  old.rs -> new.rs
    ");
}

#[test]
fn test_format_entries_clean_tree_is_unnumbered() {
    let entries = parse_porcelain("");
    assert_eq!(format::entries(&entries), vec!["Working tree clean"]);
}

#[test]
fn test_format_clone_report() {
    let report = CloneReport {
        cloned: vec!["alpha".to_string()],
        skipped: vec![("beta".to_string(), SkipReason::NoCloneUrl)],
        failed: vec![(
            "gamma".to_string(),
            "fatal: repository not found".to_string(),
        )],
    };
    assert_snapshot!(format::clone_report(&report).join("\n"), @r"
    cloned   alpha
    skipped  beta: no clone URL
    failed   gamma: fatal: repository not found
    ");
    assert_eq!(
        format::clone_report(&CloneReport::default()),
        vec!["Nothing to clone"]
    );
}

#[test]
fn test_format_push_outcome() {
    assert_eq!(
        format::push_outcome(&PushOutcome::NothingToCommit),
        "Nothing to push"
    );
    assert_eq!(format::push_outcome(&PushOutcome::Cancelled), "Push cancelled");
    assert_eq!(
        format::push_outcome(&PushOutcome::Pushed {
            output: "To github.com:octo/alpha.git\n".to_string()
        }),
        "To github.com:octo/alpha.git\nPushed"
    );
    assert_eq!(
        format::push_outcome(&PushOutcome::Pushed {
            output: String::new()
        }),
        "Pushed"
    );
}

// --- Shell parsing ---

#[test]
fn test_parse_shell_command_words() {
    assert_eq!(parse_shell_command("   "), Ok(None));
    assert_eq!(
        parse_shell_command("search octo"),
        Ok(Some(ShellCommand::Search("octo".to_string())))
    );
    assert_eq!(
        parse_shell_command("SELECT 0  2 beta"),
        Ok(Some(ShellCommand::Select(vec![
            "0".to_string(),
            "2".to_string(),
            "beta".to_string()
        ])))
    );
    assert_eq!(parse_shell_command("dir"), Ok(Some(ShellCommand::Dir(None))));
    assert_eq!(
        parse_shell_command("dir /tmp/clones"),
        Ok(Some(ShellCommand::Dir(Some("/tmp/clones".to_string()))))
    );
    assert_eq!(
        parse_shell_command("status"),
        Ok(Some(ShellCommand::Refresh))
    );
    assert_eq!(
        parse_shell_command("push fix the build"),
        Ok(Some(ShellCommand::Push(Some("fix the build".to_string()))))
    );
    assert_eq!(parse_shell_command("push"), Ok(Some(ShellCommand::Push(None))));
    assert_eq!(parse_shell_command("diff"), Ok(Some(ShellCommand::Diff(None))));
    assert_eq!(parse_shell_command("q"), Ok(Some(ShellCommand::Quit)));
}

#[test]
fn test_parse_shell_command_errors() {
    assert_snapshot!(
        parse_shell_command("frobnicate now").unwrap_err(),
        @"unknown command 'frobnicate'; type 'help'"
    );
    assert_snapshot!(
        parse_shell_command("select").unwrap_err(),
        @"usage: select <index|name>..."
    );
    assert_snapshot!(
        parse_shell_command("file").unwrap_err(),
        @"usage: file <index|path>"
    );
}

// --- Shell loop ---

#[tokio::test]
async fn test_shell_reports_failures_and_continues() {
    let base = tempfile::tempdir().expect("temp dir");
    let session = session_in(
        base.path(),
        Git::shell(&crate::config::types::GitConfig::default(), CancellationToken::new()),
    );

    let script = "search octo\nselect 1\nselect ghost\nbogus\nclone\nquit\nsearch never\n";
    let (session, out) = run_script(session, script).await;

    assert!(out.contains("[0] alpha  git@github.com:octo/alpha.git"), "{out}");
    assert!(out.contains("current: beta"), "{out}");
    assert!(out.contains("note: local clone missing:"), "{out}");
    assert!(out.contains("current: ghost"), "{out}");
    assert!(out.contains("unknown command 'bogus'; type 'help'"), "{out}");
    assert!(out.contains("error: select a repository first"), "{out}");
    assert_eq!(session.current_repository(), Some("ghost"));
    assert!(!session.activity().contains("never"));
}

#[tokio::test]
async fn test_shell_push_prompts_for_message() {
    let base = tempfile::tempdir().expect("temp dir");
    std::fs::create_dir(base.path().join("alpha")).expect("create repo dir");
    let git = Arc::new(DirtyGit::default());
    let mut session = session_in(base.path(), Git::new(git.clone(), GitTimeouts::default()));
    session
        .select_repository_by_name("alpha")
        .expect("select alpha");

    let script = "push\n\npush\n-\npush\nFix typo\npush Inline message\n";
    let (_session, out) = run_script(session, script).await;

    assert!(out.contains("Commit message [Update]"), "{out}");
    assert_eq!(out.matches("Push cancelled").count(), 1, "{out}");
    assert_eq!(out.matches("Pushed").count(), 3, "{out}");

    let commits: Vec<String> = git
        .labels
        .lock()
        .expect("lock poisoned")
        .iter()
        .filter(|label| label.starts_with("git commit"))
        .cloned()
        .collect();
    assert_eq!(
        commits,
        vec![
            "git commit -m Update",
            "git commit -m Fix typo",
            "git commit -m Inline message"
        ]
    );
}

#[tokio::test]
async fn test_shell_stops_on_cancellation() {
    let base = tempfile::tempdir().expect("temp dir");
    let session = session_in(
        base.path(),
        Git::new(Arc::new(DirtyGit::default()), GitTimeouts::default()),
    );

    // Keep the writer alive so input never reaches EOF.
    let (_writer, reader) = tokio::io::duplex(64);
    let cancel = CancellationToken::new();
    cancel.cancel();

    let mut out = Vec::new();
    let shell = Shell::new(session, tokio::io::BufReader::new(reader), &mut out, cancel);
    let session = shell.run(None).await.expect("shell run");

    assert!(session.repositories().is_empty());
    assert!(String::from_utf8_lossy(&out).starts_with("ghdesk> "));
}

#[tokio::test]
async fn test_shell_cancellation_interrupts_commit_message() {
    let base = tempfile::tempdir().expect("temp dir");
    std::fs::create_dir(base.path().join("alpha")).expect("create repo dir");
    let git = Arc::new(DirtyGit::default());
    let mut session = session_in(base.path(), Git::new(git.clone(), GitTimeouts::default()));
    session
        .select_repository_by_name("alpha")
        .expect("select alpha");

    // The writer stays open, so only cancellation can answer the question.
    let (mut writer, reader) = tokio::io::duplex(64);
    tokio::io::AsyncWriteExt::write_all(&mut writer, b"push\n")
        .await
        .expect("write input");
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(200)).await;
        trigger.cancel();
    });

    let mut out = Vec::new();
    let shell = Shell::new(session, tokio::io::BufReader::new(reader), &mut out, cancel);
    tokio::time::timeout(Duration::from_secs(5), shell.run(None))
        .await
        .expect("shell ends after cancellation")
        .expect("shell run");

    let out = String::from_utf8_lossy(&out);
    assert!(out.contains("Commit message [Update]"), "{out}");
    assert!(out.contains("Push cancelled"), "{out}");
    let labels = git.labels.lock().expect("lock poisoned");
    assert!(
        !labels.iter().any(|label| label.starts_with("git commit")),
        "{labels:?}"
    );
    drop(writer);
}

#[tokio::test]
async fn test_shell_initial_user_searches_first() {
    let base = tempfile::tempdir().expect("temp dir");
    let session = session_in(
        base.path(),
        Git::new(Arc::new(DirtyGit::default()), GitTimeouts::default()),
    );

    let mut out = Vec::new();
    let shell = Shell::new(session, &b""[..], &mut out, CancellationToken::new());
    let session = shell.run(Some("octo")).await.expect("shell run");

    assert_eq!(session.repositories().len(), 2);
    assert!(session.activity().contains("Loaded 2 repos."));
}
