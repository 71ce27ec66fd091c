// ghdesk: GitHub repository desk
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Git command execution.
//!
//! ```text
//! GitInvocation { args, timeout }
//!          |
//!          v
//!   dyn GitRunner ----> ShellGit --> ProcessBuilder --> git
//!          |                          GIT_TERMINAL_PROMPT=0
//!          |                          GCM_INTERACTIVE=never
//!          v
//!    CommandResult
//! ```

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::core::process::builder::{CommandResult, ProcessBuilder};

/// Arguments and timeout for one git call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitInvocation {
    /// Arguments after the git executable.
    pub args: Vec<String>,
    /// `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl GitInvocation {
    pub fn new<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            args: args.into_iter().map(Into::into).collect(),
            timeout: None,
        }
    }

    /// Runs `git -C <dir> <args>`.
    pub fn in_dir<I, S>(dir: &Path, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut all = vec!["-C".to_string(), dir.to_string_lossy().into_owned()];
        all.extend(args.into_iter().map(Into::into));
        Self {
            args: all,
            timeout: None,
        }
    }

    #[must_use]
    pub const fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Arguments without the leading `-C <dir>`.
    #[must_use]
    pub fn command_args(&self) -> &[String] {
        match self.args.first().map(String::as_str) {
            Some("-C") if self.args.len() >= 2 => &self.args[2..],
            _ => &self.args,
        }
    }

    /// Git subcommand, e.g. `status`.
    #[must_use]
    pub fn subcommand(&self) -> &str {
        self.command_args().first().map_or("", String::as_str)
    }

    /// Short human-readable form, e.g. `git add -A`.
    #[must_use]
    pub fn label(&self) -> String {
        let mut label = String::from("git");
        for arg in self.command_args() {
            label.push(' ');
            label.push_str(arg);
        }
        label
    }
}

/// Runs git invocations.
///
/// Implementations never fail: every outcome is carried by the
/// [`CommandResult`].
#[async_trait]
pub trait GitRunner: Send + Sync {
    async fn run(&self, invocation: GitInvocation) -> CommandResult;
}

/// Runs the real git executable.
#[derive(Debug, Clone)]
pub struct ShellGit {
    program: PathBuf,
    cancel: CancellationToken,
}

impl ShellGit {
    /// Resolves `program` on PATH; an unresolved name is kept and reported as
    /// a start failure when run.
    #[must_use]
    pub fn new(program: &str, cancel: CancellationToken) -> Self {
        let program = ProcessBuilder::find(program).unwrap_or_else(|| PathBuf::from(program));
        Self { program, cancel }
    }

    #[must_use]
    pub const fn program(&self) -> &PathBuf {
        &self.program
    }
}

#[async_trait]
impl GitRunner for ShellGit {
    async fn run(&self, invocation: GitInvocation) -> CommandResult {
        ProcessBuilder::new(&self.program)
            .args(&invocation.args)
            .env("GIT_TERMINAL_PROMPT", "0")
            .env("GCM_INTERACTIVE", "never")
            .name("git")
            .capture_output()
            .maybe_timeout(invocation.timeout)
            .run_with_cancellation(self.cancel.clone())
            .await
    }
}
