// ghdesk: GitHub repository desk
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Integration tests for session actions against real git repositories.
//!
//! ```text
//! seed --push--> remote.git (bare) --clone--> clones/demo (Session)
//! ```
//!
//! Tests return early when no `git` executable is installed.

use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Arc;

use async_trait::async_trait;
use ghdesk::config::types::GitConfig;
use ghdesk::error::{ActionError, SourceError};
use ghdesk::git::divergence::{Divergence, DivergenceCount, UnknownReason};
use ghdesk::git::ops::Git;
use ghdesk::git::status::WorkingTreeEntry;
use ghdesk::session::prompt::FixedMessage;
use ghdesk::session::{PushOutcome, Session, SkipReason};
use ghdesk::source::{RepoSource, RepositoryEntry, SearchCoordinator};
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

struct OneRepo(String);

#[async_trait]
impl RepoSource for OneRepo {
    async fn list(&self, _username: &str) -> Result<Vec<RepositoryEntry>, SourceError> {
        Ok(vec![RepositoryEntry::new("demo", Some(self.0.clone()))])
    }
}

fn git_available() -> bool {
    which::which("git").is_ok()
}

fn git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .arg("-C")
        .arg(dir)
        .args(args)
        .env("GIT_TERMINAL_PROMPT", "0")
        .output()
        .expect("failed to run git");
    assert!(
        output.status.success(),
        "git {args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn set_identity(dir: &Path) {
    git(dir, &["config", "user.name", "Desk Test"]);
    git(dir, &["config", "user.email", "desk@example.com"]);
}

struct World {
    root: TempDir,
    seed: PathBuf,
    remote: PathBuf,
}

impl World {
    /// Bare remote on branch `main` with one commit, plus the seed clone
    /// that created it.
    fn new() -> Self {
        let root = tempfile::tempdir().expect("failed to create temp dir");
        let remote = root.path().join("remote.git");
        let seed = root.path().join("seed");

        git(root.path(), &["init", "--bare", remote.to_str().unwrap()]);
        git(&remote, &["symbolic-ref", "HEAD", "refs/heads/main"]);

        std::fs::create_dir(&seed).unwrap();
        git(&seed, &["init"]);
        set_identity(&seed);
        git(&seed, &["symbolic-ref", "HEAD", "refs/heads/main"]);
        std::fs::write(seed.join("README.md"), "hello\n").unwrap();
        git(&seed, &["add", "-A"]);
        git(&seed, &["commit", "-m", "Initial"]);
        git(&seed, &["remote", "add", "origin", remote.to_str().unwrap()]);
        git(&seed, &["push", "-u", "origin", "main"]);

        Self { root, seed, remote }
    }

    fn base(&self) -> PathBuf {
        self.root.path().join("clones")
    }

    fn session(&self) -> Session {
        let source = OneRepo(self.remote.display().to_string());
        Session::new(
            SearchCoordinator::new(Arc::new(source)),
            Git::shell(&GitConfig::default(), CancellationToken::new()),
            self.base(),
        )
    }

    /// Session with `demo` searched, selected and cloned.
    async fn cloned_session(&self) -> Session {
        let mut session = self.session();
        session.search("octocat").await.unwrap();
        session.select_repositories(&[0]).unwrap();
        let report = session.clone_selected().await.unwrap();
        assert_eq!(report.cloned, vec!["demo".to_string()], "{report:?}");
        set_identity(&self.base().join("demo"));
        session
    }

    fn push_from_seed(&self, file: &str, content: &str) {
        std::fs::write(self.seed.join(file), content).unwrap();
        git(&self.seed, &["add", "-A"]);
        git(&self.seed, &["commit", "-m", "Remote change"]);
        git(&self.seed, &["push"]);
    }
}

#[tokio::test]
async fn test_clone_then_skip_existing() {
    if !git_available() {
        return;
    }
    let world = World::new();
    let mut session = world.cloned_session().await;

    assert!(world.base().join("demo/README.md").is_file());
    assert_eq!(session.files(), &[WorkingTreeEntry::Clean]);

    let again = session.clone_selected().await.unwrap();
    assert!(again.cloned.is_empty());
    assert!(matches!(
        again.skipped.as_slice(),
        [(name, SkipReason::AlreadyExists(_))] if name == "demo"
    ));
}

#[tokio::test]
async fn test_refresh_diff_and_push() {
    if !git_available() {
        return;
    }
    let world = World::new();
    let mut session = world.cloned_session().await;
    let clone = world.base().join("demo");

    std::fs::write(clone.join("README.md"), "hello\nchanged\n").unwrap();
    std::fs::write(clone.join("notes.txt"), "todo\n").unwrap();

    let entries: Vec<String> = session
        .refresh_local()
        .await
        .unwrap()
        .iter()
        .map(ToString::to_string)
        .collect();
    assert_eq!(entries, vec![" M README.md", "?? notes.txt"]);

    let mut changed = session.changed_files().await.unwrap();
    changed.sort();
    assert_eq!(changed, vec!["README.md", "notes.txt"]);

    session.select_file_by_path("README.md").unwrap();
    let diff = session.show_diff().await.unwrap();
    assert!(diff.contains("+changed"), "{diff}");

    let outcome = session
        .commit_and_push(&mut FixedMessage(Some("Add notes".to_string())))
        .await
        .unwrap();
    assert!(matches!(outcome, PushOutcome::Pushed { .. }), "{outcome:?}");
    assert_eq!(session.files(), &[WorkingTreeEntry::Clean]);

    let log = git(&world.remote, &["log", "-1", "--format=%s", "main"]);
    assert_eq!(log.trim(), "Add notes");

    let outcome = session
        .commit_and_push(&mut FixedMessage(None))
        .await
        .unwrap();
    assert_eq!(outcome, PushOutcome::NothingToCommit);
}

#[tokio::test]
async fn test_check_updates_and_pull() {
    if !git_available() {
        return;
    }
    let world = World::new();
    let mut session = world.cloned_session().await;

    world.push_from_seed("CHANGELOG.md", "v2\n");

    let divergence = session.check_updates().await.unwrap();
    assert_eq!(
        divergence,
        Divergence::Known {
            branch: "main".to_string(),
            counts: DivergenceCount {
                behind: 1,
                ahead: 0
            },
        }
    );
    assert_eq!(divergence.to_string(), "main: Behind: 1 Ahead: 0");

    let report = session.pull().await.unwrap();
    assert!(report.succeeded, "{}", report.output);
    assert!(world.base().join("demo/CHANGELOG.md").is_file());

    let divergence = session.check_updates().await.unwrap();
    assert_eq!(divergence.to_string(), "main: Behind: 0 Ahead: 0");
}

#[tokio::test]
async fn test_check_updates_detached_head() {
    if !git_available() {
        return;
    }
    let world = World::new();
    let mut session = world.cloned_session().await;
    git(&world.base().join("demo"), &["checkout", "--detach"]);

    let divergence = session.check_updates().await.unwrap();
    let Divergence::Unknown { reason, raw } = &divergence else {
        panic!("expected unknown divergence, got {divergence:?}");
    };
    assert_eq!(*reason, UnknownReason::DetachedHead);
    assert!(raw.contains("HEAD detached"), "{raw}");
    assert!(session.activity().contains("Divergence unknown: HEAD is detached"));
}

#[tokio::test]
async fn test_local_actions_need_a_clone() {
    if !git_available() {
        return;
    }
    let world = World::new();
    let mut session = world.session();
    session.select_repository_by_name("demo").unwrap();

    let err = session.refresh_local().await.unwrap_err();
    assert!(matches!(err, ActionError::LocalMissing { .. }), "{err:?}");
    let err = session.check_updates().await.unwrap_err();
    assert!(matches!(err, ActionError::LocalMissing { .. }), "{err:?}");
}
