// ghdesk: GitHub repository desk
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! `gh` CLI listing.
//!
//! ```text
//! gh repo list <user> --limit <n> --json name,sshUrl
//!   exit != 0        --> SourceError::Cli (combined output)
//!   JSON array       --> [{name, sshUrl}] in order
//!   anything else    --> one entry per non-empty line, no clone URL
//! ```

use async_trait::async_trait;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::{RepoSource, RepositoryEntry};
use crate::config::types::{GitTimeouts, GithubConfig};
use crate::core::process::builder::ProcessBuilder;
use crate::error::SourceError;

#[derive(Debug, Deserialize)]
struct CliRepo {
    #[serde(default)]
    name: String,
    #[serde(default, rename = "sshUrl")]
    ssh_url: Option<String>,
}

/// Lists repositories by running the GitHub CLI.
#[derive(Debug, Clone)]
pub struct CliSource {
    program: PathBuf,
    limit: u32,
    timeout: Option<Duration>,
    cancel: CancellationToken,
}

impl CliSource {
    #[must_use]
    pub fn new(config: &GithubConfig, cancel: CancellationToken) -> Self {
        let program = ProcessBuilder::find(&config.cli_program)
            .unwrap_or_else(|| PathBuf::from(&config.cli_program));
        Self {
            program,
            limit: config.cli_limit,
            timeout: GitTimeouts::duration(config.cli_timeout),
            cancel,
        }
    }

    fn command(&self, username: &str) -> ProcessBuilder {
        ProcessBuilder::new(&self.program)
            .args(["repo", "list", username, "--limit"])
            .arg(self.limit.to_string())
            .args(["--json", "name,sshUrl"])
            .name("gh")
            .capture_output()
            .maybe_timeout(self.timeout)
    }
}

#[async_trait]
impl RepoSource for CliSource {
    async fn list(&self, username: &str) -> Result<Vec<RepositoryEntry>, SourceError> {
        let command = self.command(username);
        let command_line = command.command_line();
        let result = command.run_with_cancellation(self.cancel.clone()).await;

        if !result.exit_succeeded() {
            return Err(SourceError::Cli {
                command: command_line,
                message: result.combined_output().trim().to_string(),
            });
        }

        Ok(parse_cli_output(result.stdout()))
    }
}

/// Parses `gh repo list --json name,sshUrl` output.
///
/// Output that is not a JSON array of repositories is read as one repository
/// name per non-empty line.
#[must_use]
pub fn parse_cli_output(text: &str) -> Vec<RepositoryEntry> {
    match serde_json::from_str::<Vec<CliRepo>>(text) {
        Ok(repos) => repos
            .into_iter()
            .map(|repo| RepositoryEntry::new(repo.name, repo.ssh_url))
            .collect(),
        Err(e) => {
            debug!(error = %e, "gh output is not JSON; reading names line by line");
            text.lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(|line| RepositoryEntry::new(line, None))
                .collect()
        }
    }
}
