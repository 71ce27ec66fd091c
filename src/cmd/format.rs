// ghdesk: GitHub repository desk
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Text rendering shared by one-shot commands and the shell.

use crate::git::status::WorkingTreeEntry;
use crate::session::{CloneReport, PushOutcome};
use crate::source::RepositoryEntry;

/// `[index] name  clone-url` per repository.
#[must_use]
pub fn repositories(repos: &[RepositoryEntry]) -> Vec<String> {
    let width = repos.iter().map(|r| r.name.len()).max().unwrap_or(0);
    repos
        .iter()
        .enumerate()
        .map(|(i, repo)| {
            let url = repo.clone_url.as_deref().unwrap_or("(no clone URL)");
            format!("[{i}] {:<width$}  {url}", repo.name)
        })
        .collect()
}

/// `[index] line` per working-tree entry.
#[must_use]
pub fn entries(files: &[WorkingTreeEntry]) -> Vec<String> {
    files
        .iter()
        .enumerate()
        .map(|(i, entry)| match entry {
            WorkingTreeEntry::Clean => entry.to_string(),
            _ => format!("[{i}] {entry}"),
        })
        .collect()
}

#[must_use]
pub fn clone_report(report: &CloneReport) -> Vec<String> {
    let mut lines: Vec<String> = report
        .cloned
        .iter()
        .map(|name| format!("cloned   {name}"))
        .collect();
    lines.extend(
        report
            .skipped
            .iter()
            .map(|(name, reason)| format!("skipped  {name}: {reason}")),
    );
    lines.extend(
        report
            .failed
            .iter()
            .map(|(name, message)| format!("failed   {name}: {message}")),
    );
    if lines.is_empty() {
        lines.push("Nothing to clone".to_string());
    }
    lines
}

#[must_use]
pub fn push_outcome(outcome: &PushOutcome) -> String {
    match outcome {
        PushOutcome::NothingToCommit => "Nothing to push".to_string(),
        PushOutcome::Cancelled => "Push cancelled".to_string(),
        PushOutcome::Pushed { output } => {
            let output = output.trim_end();
            if output.is_empty() {
                "Pushed".to_string()
            } else {
                format!("{output}\nPushed")
            }
        }
    }
}
