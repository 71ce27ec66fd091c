// ghdesk: GitHub repository desk
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Git operations used by the session.
//!
//! ```text
//! Git { runner, timeouts }
//!   clone_repo         clone <url> <dir>                    timeouts.clone
//!   status_porcelain   -C d status --porcelain              timeouts.status
//!   ls_files_changed   -C d ls-files -m -o --exclude-std    timeouts.status
//!   fetch              -C d fetch                           timeouts.fetch
//!   current_branch     -C d rev-parse --abbrev-ref HEAD     timeouts.default
//!   rev_list_counts    -C d rev-list --left-right --count   timeouts.default
//!   status_uno         -C d status -uno                     timeouts.status
//!   pull               -C d pull                            timeouts.pull
//!   diff               -C d diff -- <path>                  timeouts.diff
//!   add_all/commit/push                                     timeouts.default
//! ```

use std::path::Path;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use super::cmd::{GitInvocation, GitRunner, ShellGit};
use crate::config::types::{GitConfig, GitTimeouts};
use crate::core::process::builder::CommandResult;

/// Git operations with per-operation timeouts.
#[derive(Clone)]
pub struct Git {
    runner: Arc<dyn GitRunner>,
    timeouts: GitTimeouts,
}

impl std::fmt::Debug for Git {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Git")
            .field("timeouts", &self.timeouts)
            .finish_non_exhaustive()
    }
}

impl Git {
    pub fn new(runner: Arc<dyn GitRunner>, timeouts: GitTimeouts) -> Self {
        Self { runner, timeouts }
    }

    /// Git backed by the configured executable.
    #[must_use]
    pub fn shell(config: &GitConfig, cancel: CancellationToken) -> Self {
        Self::new(
            Arc::new(ShellGit::new(&config.program, cancel)),
            config.timeouts,
        )
    }

    #[must_use]
    pub const fn timeouts(&self) -> &GitTimeouts {
        &self.timeouts
    }

    async fn run(&self, invocation: GitInvocation, timeout_secs: u64) -> CommandResult {
        self.runner
            .run(invocation.with_timeout(GitTimeouts::duration(timeout_secs)))
            .await
    }

    async fn run_in<const N: usize>(
        &self,
        dir: &Path,
        args: [&str; N],
        timeout_secs: u64,
    ) -> CommandResult {
        self.run(GitInvocation::in_dir(dir, args), timeout_secs)
            .await
    }

    pub async fn clone_repo(&self, url: &str, target: &Path) -> CommandResult {
        let target = target.to_string_lossy();
        self.run(
            GitInvocation::new(["clone", url, target.as_ref()]),
            self.timeouts.clone,
        )
        .await
    }

    pub async fn status_porcelain(&self, dir: &Path) -> CommandResult {
        self.run_in(dir, ["status", "--porcelain"], self.timeouts.status)
            .await
    }

    pub async fn ls_files_changed(&self, dir: &Path) -> CommandResult {
        self.run_in(
            dir,
            ["ls-files", "--modified", "--others", "--exclude-standard"],
            self.timeouts.status,
        )
        .await
    }

    pub async fn fetch(&self, dir: &Path) -> CommandResult {
        self.run_in(dir, ["fetch"], self.timeouts.fetch).await
    }

    pub async fn current_branch(&self, dir: &Path) -> CommandResult {
        self.run_in(
            dir,
            ["rev-parse", "--abbrev-ref", "HEAD"],
            self.timeouts.default,
        )
        .await
    }

    pub async fn rev_list_counts(&self, dir: &Path, branch: &str) -> CommandResult {
        let range = format!("origin/{branch}...HEAD");
        self.run_in(
            dir,
            ["rev-list", "--left-right", "--count", range.as_str()],
            self.timeouts.default,
        )
        .await
    }

    pub async fn status_uno(&self, dir: &Path) -> CommandResult {
        self.run_in(dir, ["status", "-uno"], self.timeouts.status)
            .await
    }

    pub async fn pull(&self, dir: &Path) -> CommandResult {
        self.run_in(dir, ["pull"], self.timeouts.pull).await
    }

    pub async fn diff(&self, dir: &Path, path: &str) -> CommandResult {
        self.run_in(dir, ["diff", "--", path], self.timeouts.diff)
            .await
    }

    /// `add -A` as an invocation, so callers can label the step.
    #[must_use]
    pub fn add_all_invocation(dir: &Path) -> GitInvocation {
        GitInvocation::in_dir(dir, ["add", "-A"])
    }

    #[must_use]
    pub fn commit_invocation(dir: &Path, message: &str) -> GitInvocation {
        GitInvocation::in_dir(dir, ["commit", "-m", message])
    }

    #[must_use]
    pub fn push_invocation(dir: &Path) -> GitInvocation {
        GitInvocation::in_dir(dir, ["push"])
    }

    /// Runs a prepared invocation with the default timeout.
    pub async fn run_step(&self, invocation: GitInvocation) -> CommandResult {
        self.run(invocation, self.timeouts.default).await
    }
}
