// ghdesk: GitHub repository desk
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Repository listing.
//!
//! ```text
//!   SearchCoordinator::search(user)
//!     ticket = ++generation
//!            |
//!            v
//!     dyn RepoSource::list(user)
//!        |                  |
//!        v                  v
//!    RestSource          CliSource
//!    GET /users/u/repos  gh repo list u --json name,sshUrl
//!            |
//!            v
//!   ticket == generation ? Current(result) : Stale
//! ```

pub mod cli;
pub mod rest;


use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::config::types::{GithubConfig, SourceKind};
use crate::error::SourceError;

pub use cli::CliSource;
pub use rest::RestSource;

/// A repository owned by the searched user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryEntry {
    /// Repository name, also used as the local directory name.
    pub name: String,
    /// SSH clone URL, when the source provided one.
    pub clone_url: Option<String>,
}

impl RepositoryEntry {
    pub fn new(name: impl Into<String>, clone_url: Option<String>) -> Self {
        Self {
            name: name.into(),
            clone_url: clone_url.filter(|url| !url.is_empty()),
        }
    }
}

/// Lists a user's repositories.
#[async_trait]
pub trait RepoSource: Send + Sync {
    /// # Errors
    ///
    /// Returns a [`SourceError`] when the listing cannot be obtained.
    async fn list(&self, username: &str) -> Result<Vec<RepositoryEntry>, SourceError>;
}

/// Builds the configured listing strategy.
#[must_use]
pub fn build_source(config: &GithubConfig, cancel: CancellationToken) -> Arc<dyn RepoSource> {
    match config.source {
        SourceKind::Rest => {
            if config.token().is_none() {
                warn!("no GitHub token set; API rate limit will be low");
            }
            Arc::new(RestSource::new(config))
        }
        SourceKind::Cli => Arc::new(CliSource::new(config, cancel)),
    }
}

/// Outcome of a coordinated search.
#[derive(Debug)]
pub enum SearchOutcome {
    /// The newest search finished.
    Current(Result<Vec<RepositoryEntry>, SourceError>),
    /// A newer search started while this one was running.
    Stale,
}

/// Discards results of searches that were superseded.
#[derive(Clone)]
pub struct SearchCoordinator {
    source: Arc<dyn RepoSource>,
    generation: Arc<AtomicU64>,
}

impl std::fmt::Debug for SearchCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchCoordinator")
            .field("generation", &self.generation.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

impl SearchCoordinator {
    pub fn new(source: Arc<dyn RepoSource>) -> Self {
        Self {
            source,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Takes a ticket for a new search; earlier tickets become stale.
    pub fn ticket(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::AcqRel) + 1
    }

    #[must_use]
    pub fn is_current(&self, ticket: u64) -> bool {
        self.generation.load(Ordering::Acquire) == ticket
    }

    pub async fn search(&self, username: &str) -> SearchOutcome {
        let ticket = self.ticket();
        let result = self.source.list(username).await;
        if self.is_current(ticket) {
            SearchOutcome::Current(result)
        } else {
            debug!(username, ticket, "discarding stale search result");
            SearchOutcome::Stale
        }
    }
}
