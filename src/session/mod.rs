// ghdesk: GitHub repository desk
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Interactive session state and user actions.
//!
//! ```text
//!                 Session
//!   repos[] selected[] current files[] selected_file base_dir
//!       |                    |
//!   search --> SearchCoordinator --> RepoSource
//!       |
//!   clone_selected   refresh_local   changed_files   check_updates
//!   pull             show_diff       commit_and_push
//!       |
//!       v
//!      Git --> GitRunner            every action --> ActivityLog
//!
//! commit_and_push:
//!   status --porcelain --empty--> NothingToCommit
//!        |
//!   CommitPrompt --None--> Cancelled
//!        |
//!   add -A --> commit -m <msg> --> push    first failure stops
//!        |
//!   refresh_local --> Pushed
//! ```

pub mod activity;
pub mod prompt;


use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::config::Config;
use crate::core::process::builder::CommandResult;
use crate::error::ActionError;
use crate::git::divergence::{Divergence, UnknownReason, parse_divergence};
use crate::git::ops::Git;
use crate::git::status::{WorkingTreeEntry, parse_porcelain};
use crate::source::{RepositoryEntry, SearchCoordinator, SearchOutcome, build_source};

use activity::ActivityLog;
use prompt::{CommitPrompt, DEFAULT_COMMIT_MESSAGE};

/// Result of a search action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchReport {
    /// The repository list was replaced with this many entries.
    Loaded(usize),
    /// A newer search superseded this one; nothing changed.
    Stale,
}

/// Why a repository was not cloned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    NoCloneUrl,
    AlreadyExists(PathBuf),
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoCloneUrl => f.write_str("no clone URL"),
            Self::AlreadyExists(path) => write!(f, "already exists: {}", path.display()),
        }
    }
}

/// Outcome of a batch clone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CloneReport {
    pub cloned: Vec<String>,
    pub skipped: Vec<(String, SkipReason)>,
    pub failed: Vec<(String, String)>,
}

impl CloneReport {
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Outcome of a pull.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullReport {
    pub succeeded: bool,
    /// Combined stdout and stderr of `git pull`.
    pub output: String,
}

/// Outcome of commit & push.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushOutcome {
    NothingToCommit,
    Cancelled,
    Pushed { output: String },
}

/// UI-independent state of one user session.
#[derive(Debug)]
pub struct Session {
    coordinator: SearchCoordinator,
    git: Git,
    base_dir: PathBuf,
    repos: Vec<RepositoryEntry>,
    selected: Vec<usize>,
    current: Option<String>,
    files: Vec<WorkingTreeEntry>,
    selected_file: Option<usize>,
    log: ActivityLog,
}

impl Session {
    pub fn new(coordinator: SearchCoordinator, git: Git, base_dir: PathBuf) -> Self {
        Self {
            coordinator,
            git,
            base_dir,
            repos: Vec::new(),
            selected: Vec::new(),
            current: None,
            files: Vec::new(),
            selected_file: None,
            log: ActivityLog::new(),
        }
    }

    /// Session wired to the configured source and the git executable.
    #[must_use]
    pub fn from_config(config: &Config, cancel: CancellationToken) -> Self {
        let source = build_source(&config.github, cancel.clone());
        Self::new(
            SearchCoordinator::new(source),
            Git::shell(&config.git, cancel),
            config.base_dir(),
        )
    }

    // --- Accessors ---

    #[must_use]
    pub fn repositories(&self) -> &[RepositoryEntry] {
        &self.repos
    }

    #[must_use]
    pub fn selected_indices(&self) -> &[usize] {
        &self.selected
    }

    #[must_use]
    pub fn current_repository(&self) -> Option<&str> {
        self.current.as_deref()
    }

    #[must_use]
    pub fn files(&self) -> &[WorkingTreeEntry] {
        &self.files
    }

    #[must_use]
    pub fn selected_file(&self) -> Option<&WorkingTreeEntry> {
        self.selected_file.and_then(|i| self.files.get(i))
    }

    #[must_use]
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    #[must_use]
    pub const fn activity(&self) -> &ActivityLog {
        &self.log
    }

    // --- Search and selection ---

    /// Lists the user's repositories and replaces the repository list.
    ///
    /// # Errors
    ///
    /// [`ActionError::EmptyUsername`] for a blank name, [`ActionError::Search`]
    /// when listing fails (the list is cleared).
    pub async fn search(&mut self, username: &str) -> Result<SearchReport, ActionError> {
        let username = username.trim();
        if username.is_empty() {
            self.log.warning(ActionError::EmptyUsername.to_string());
            return Err(ActionError::EmptyUsername);
        }

        self.log.info(format!("Searching repositories of {username}..."));
        match self.coordinator.search(username).await {
            SearchOutcome::Current(Ok(repos)) => {
                self.clear_selection();
                self.repos = repos;
                self.log.info(format!("Loaded {} repos.", self.repos.len()));
                Ok(SearchReport::Loaded(self.repos.len()))
            }
            SearchOutcome::Current(Err(e)) => {
                self.clear_selection();
                self.repos.clear();
                let err = ActionError::Search(e);
                self.log.error(err.to_string());
                Err(err)
            }
            SearchOutcome::Stale => {
                debug!(username, "search superseded");
                Ok(SearchReport::Stale)
            }
        }
    }

    fn clear_selection(&mut self) {
        self.selected.clear();
        self.current = None;
        self.files.clear();
        self.selected_file = None;
    }

    /// # Errors
    ///
    /// [`ActionError::EmptyBaseDir`] for a blank path.
    pub fn set_base_dir(&mut self, path: impl AsRef<Path>) -> Result<(), ActionError> {
        let path = path.as_ref();
        if path.as_os_str().to_string_lossy().trim().is_empty() {
            return Err(ActionError::EmptyBaseDir);
        }
        self.base_dir = path.to_path_buf();
        self.log
            .info(format!("Clone dir set: {}", self.base_dir.display()));
        Ok(())
    }

    /// Selects repositories by list index; the last one becomes current.
    ///
    /// # Errors
    ///
    /// [`ActionError::InvalidSelection`] for an index past the list.
    pub fn select_repositories(&mut self, indices: &[usize]) -> Result<(), ActionError> {
        if let Some(bad) = indices.iter().find(|&&i| i >= self.repos.len()) {
            return Err(ActionError::InvalidSelection(bad.to_string()));
        }
        let mut selected = Vec::with_capacity(indices.len());
        for &i in indices {
            if !selected.contains(&i) {
                selected.push(i);
            }
        }
        let current = selected.last().map(|&i| self.repos[i].name.clone());
        self.selected = selected;
        self.set_current(current);
        Ok(())
    }

    /// Makes `name` the current repository.
    ///
    /// The name does not need to be in the list; local actions only use it
    /// to locate the clone.
    ///
    /// # Errors
    ///
    /// [`ActionError::InvalidSelection`] for a blank name.
    pub fn select_repository_by_name(&mut self, name: &str) -> Result<(), ActionError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ActionError::InvalidSelection(String::new()));
        }
        self.selected = self
            .repos
            .iter()
            .position(|r| r.name == name)
            .into_iter()
            .collect();
        self.set_current(Some(name.to_string()));
        Ok(())
    }

    /// List indices of the named repositories.
    ///
    /// # Errors
    ///
    /// [`ActionError::InvalidSelection`] for a name not in the list.
    pub fn indices_of<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<usize>, ActionError> {
        names
            .iter()
            .map(|name| {
                let name = name.as_ref();
                self.repos
                    .iter()
                    .position(|r| r.name == name)
                    .ok_or_else(|| ActionError::InvalidSelection(name.to_string()))
            })
            .collect()
    }

    fn set_current(&mut self, name: Option<String>) {
        if self.current != name {
            self.files.clear();
            self.selected_file = None;
        }
        self.current = name;
    }

    /// Selects a working-tree entry by index.
    ///
    /// # Errors
    ///
    /// [`ActionError::InvalidSelection`] for an index past the file list.
    pub fn select_file(&mut self, index: usize) -> Result<&WorkingTreeEntry, ActionError> {
        if index >= self.files.len() {
            return Err(ActionError::InvalidSelection(index.to_string()));
        }
        self.selected_file = Some(index);
        Ok(&self.files[index])
    }

    /// Selects the working-tree entry whose path is `path`.
    ///
    /// # Errors
    ///
    /// [`ActionError::InvalidSelection`] when no entry has that path.
    pub fn select_file_by_path(&mut self, path: &str) -> Result<&WorkingTreeEntry, ActionError> {
        let index = self
            .files
            .iter()
            .position(|entry| entry.diff_path().is_ok_and(|p| p == path))
            .ok_or_else(|| ActionError::InvalidSelection(path.to_string()))?;
        self.select_file(index)
    }

    // --- Local operations ---

    fn repo_dir(&self) -> Result<PathBuf, ActionError> {
        self.current
            .as_ref()
            .map(|name| self.base_dir.join(name))
            .ok_or(ActionError::NoRepositorySelected)
    }

    /// Directory of the current repository's clone, which must exist.
    fn local_dir(&mut self) -> Result<PathBuf, ActionError> {
        let dir = self.repo_dir()?;
        if dir.is_dir() {
            Ok(dir)
        } else {
            let path = dir.display().to_string();
            self.log.warning(format!("Local missing: {path}"));
            Err(ActionError::LocalMissing { path })
        }
    }

    fn command_failed(&mut self, command: &str, result: &CommandResult) -> ActionError {
        let err = ActionError::CommandFailed {
            command: command.to_string(),
            output: result.combined_output().trim().to_string(),
        };
        self.log.error(err.to_string());
        err
    }

    /// Clones every selected repository into the base directory.
    ///
    /// Entries without a clone URL or with an existing target are skipped;
    /// a failed clone does not stop the remaining ones.
    ///
    /// # Errors
    ///
    /// [`ActionError::NoRepositorySelected`] for an empty selection, and
    /// [`ActionError::CommandFailed`] when the base directory cannot be
    /// created.
    pub async fn clone_selected(&mut self) -> Result<CloneReport, ActionError> {
        if self.selected.is_empty() {
            return Err(ActionError::NoRepositorySelected);
        }

        if let Err(e) = tokio::fs::create_dir_all(&self.base_dir).await {
            let err = ActionError::CommandFailed {
                command: format!("create {}", self.base_dir.display()),
                output: e.to_string(),
            };
            self.log.error(err.to_string());
            return Err(err);
        }

        let entries: Vec<RepositoryEntry> = self
            .selected
            .iter()
            .map(|&i| self.repos[i].clone())
            .collect();

        let mut report = CloneReport::default();
        for entry in entries {
            let Some(url) = entry.clone_url.as_deref() else {
                self.log.warning(format!("No SSH URL for {}", entry.name));
                report.skipped.push((entry.name, SkipReason::NoCloneUrl));
                continue;
            };

            let target = self.base_dir.join(&entry.name);
            if target.exists() {
                self.log
                    .info(format!("Already exists: {}", target.display()));
                report
                    .skipped
                    .push((entry.name, SkipReason::AlreadyExists(target)));
                continue;
            }

            self.log.info(format!("Cloning {url}"));
            let result = self.git.clone_repo(url, &target).await;
            self.log.output(&result.combined_output());
            if result.exit_succeeded() {
                report.cloned.push(entry.name);
            } else {
                let message = result.combined_output().trim().to_string();
                self.log
                    .error(format!("Clone failed for {}: {message}", entry.name));
                report.failed.push((entry.name, message));
            }
        }

        if self.repo_dir().is_ok_and(|dir| dir.is_dir())
            && let Err(e) = self.refresh_local().await
        {
            debug!(error = %e, "refresh after clone failed");
        }

        Ok(report)
    }

    /// Reloads the working-tree entries of the current repository.
    ///
    /// # Errors
    ///
    /// [`ActionError::NoRepositorySelected`], [`ActionError::LocalMissing`],
    /// or [`ActionError::CommandFailed`] when `git status` fails.
    pub async fn refresh_local(&mut self) -> Result<&[WorkingTreeEntry], ActionError> {
        let dir = self.local_dir()?;
        let result = self.git.status_porcelain(&dir).await;
        if !result.exit_succeeded() {
            return Err(self.command_failed("git status --porcelain", &result));
        }
        self.files = parse_porcelain(result.stdout());
        self.selected_file = None;
        self.log.info("Refreshed local state.");
        Ok(&self.files)
    }

    /// Paths of modified and untracked files.
    ///
    /// # Errors
    ///
    /// [`ActionError::NoRepositorySelected`], [`ActionError::LocalMissing`],
    /// or [`ActionError::CommandFailed`] when `git ls-files` fails.
    pub async fn changed_files(&mut self) -> Result<Vec<String>, ActionError> {
        let dir = self.local_dir()?;
        let result = self.git.ls_files_changed(&dir).await;
        if !result.exit_succeeded() {
            return Err(self.command_failed("git ls-files", &result));
        }
        Ok(result
            .stdout()
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }

    /// Fetches and compares the current branch with its remote counterpart.
    ///
    /// # Errors
    ///
    /// [`ActionError::NoRepositorySelected`] or [`ActionError::LocalMissing`].
    /// Git failures past that point produce [`Divergence::Unknown`].
    pub async fn check_updates(&mut self) -> Result<Divergence, ActionError> {
        let dir = self.local_dir()?;

        self.log.info("Fetching remote...");
        let fetch = self.git.fetch(&dir).await;
        self.log.output(&fetch.combined_output());
        if !fetch.exit_succeeded() {
            self.log.warning("Fetch failed; comparing with the last fetched state.");
        }

        let divergence = match self.count_divergence(&dir).await {
            Ok(divergence) => divergence,
            Err(reason) => {
                let status = self.git.status_uno(&dir).await;
                Divergence::Unknown {
                    reason,
                    raw: status.combined_output(),
                }
            }
        };

        match &divergence {
            Divergence::Known { counts, .. } => self.log.info(counts.to_string()),
            Divergence::Unknown { reason, .. } => {
                self.log.warning(format!("Divergence unknown: {reason}"));
            }
        }
        Ok(divergence)
    }

    async fn count_divergence(&self, dir: &Path) -> Result<Divergence, UnknownReason> {
        let branch = self.git.current_branch(dir).await;
        if !branch.exit_succeeded() {
            return Err(UnknownReason::BranchLookupFailed(
                branch.combined_output().trim().to_string(),
            ));
        }
        let branch = branch.stdout().trim();
        if branch.is_empty() || branch == "HEAD" {
            return Err(UnknownReason::DetachedHead);
        }

        let counts = self.git.rev_list_counts(dir, branch).await;
        if !counts.exit_succeeded() {
            return Err(UnknownReason::CountFailed(
                counts.combined_output().trim().to_string(),
            ));
        }
        parse_divergence(counts.stdout())
            .map(|counts| Divergence::Known {
                branch: branch.to_string(),
                counts,
            })
            .ok_or_else(|| UnknownReason::Unparsable(counts.stdout().trim().to_string()))
    }

    /// Pulls the current repository and refreshes its entries.
    ///
    /// # Errors
    ///
    /// [`ActionError::NoRepositorySelected`] or [`ActionError::LocalMissing`].
    /// A failing pull is reported through [`PullReport::succeeded`].
    pub async fn pull(&mut self) -> Result<PullReport, ActionError> {
        let dir = self.local_dir()?;
        self.log.info("Pulling...");
        let result = self.git.pull(&dir).await;
        let output = result.combined_output();
        let succeeded = result.exit_succeeded();
        if succeeded {
            self.log.output(&output);
        } else {
            self.log
                .error(format!("Pull failed: {}", output.trim()));
        }

        if let Err(e) = self.refresh_local().await {
            debug!(error = %e, "refresh after pull failed");
        }
        Ok(PullReport { succeeded, output })
    }

    /// Diff of the selected working-tree entry, stdout and stderr verbatim.
    ///
    /// # Errors
    ///
    /// [`ActionError::NoRepositorySelected`], [`ActionError::NoFileSelected`],
    /// [`ActionError::UnparsableEntry`], or [`ActionError::LocalMissing`].
    pub async fn show_diff(&mut self) -> Result<String, ActionError> {
        self.repo_dir()?;
        let entry = self
            .selected_file()
            .cloned()
            .ok_or(ActionError::NoFileSelected)?;
        let path = match entry.diff_path() {
            Ok(path) => path.to_string(),
            Err(e) => {
                self.log.warning(e.to_string());
                return Err(e);
            }
        };
        let dir = self.local_dir()?;
        let result = self.git.diff(&dir, &path).await;
        Ok(result.combined_output())
    }

    /// Stages everything, commits and pushes when the tree has changes.
    ///
    /// # Errors
    ///
    /// [`ActionError::NoRepositorySelected`], [`ActionError::LocalMissing`],
    /// [`ActionError::CommandFailed`] when `git status` fails,
    /// [`ActionError::EmptyCommitMessage`], or [`ActionError::StepFailed`]
    /// for the first failing step.
    pub async fn commit_and_push(
        &mut self,
        prompt: &mut dyn CommitPrompt,
    ) -> Result<PushOutcome, ActionError> {
        let dir = self.local_dir()?;

        let status = self.git.status_porcelain(&dir).await;
        if !status.exit_succeeded() {
            return Err(self.command_failed("git status --porcelain", &status));
        }
        if status.stdout().trim().is_empty() {
            self.log.info("Nothing to push.");
            return Ok(PushOutcome::NothingToCommit);
        }

        let Some(message) = prompt.commit_message(DEFAULT_COMMIT_MESSAGE).await else {
            self.log.info("Push cancelled.");
            return Ok(PushOutcome::Cancelled);
        };
        if message.trim().is_empty() {
            self.log.warning(ActionError::EmptyCommitMessage.to_string());
            return Err(ActionError::EmptyCommitMessage);
        }

        let mut output = String::new();
        for invocation in [
            Git::add_all_invocation(&dir),
            Git::commit_invocation(&dir, &message),
            Git::push_invocation(&dir),
        ] {
            let step = format!("git {}", invocation.subcommand());
            let result = self.git.run_step(invocation).await;
            let combined = result.combined_output();
            output.push_str(&combined);
            self.log.output(&combined);

            if result.exit_succeeded() {
                continue;
            }
            if step == "git commit" && combined.contains("nothing to commit") {
                self.log.info("Nothing to commit.");
                return Ok(PushOutcome::NothingToCommit);
            }
            let err = ActionError::StepFailed {
                step,
                output: combined.trim().to_string(),
            };
            self.log.error(err.to_string());
            return Err(err);
        }

        self.log.info("Pushed.");
        if let Err(e) = self.refresh_local().await {
            debug!(error = %e, "refresh after push failed");
        }
        Ok(PushOutcome::Pushed { output })
    }
}
