// ghdesk: GitHub repository desk
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration types for ghdesk.
//!
//! # Config Structure
//!
//! ```text
//! Config: GlobalConfig, GithubConfig, WorkspaceConfig, GitConfig
//! GitConfig.timeouts: seconds per git operation (0 = unlimited)
//! ```
//!
//! # Repository Source
//!
//! ```text
//! SourceKind: Rest (default, api.github.com) | Cli (gh repo list)
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::error::ConfigError;
use crate::logging::LogLevel;

/// Which repository-listing strategy to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// GitHub REST API over HTTPS.
    #[default]
    Rest,
    /// The `gh` command-line tool.
    Cli,
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rest => write!(f, "rest"),
            Self::Cli => write!(f, "cli"),
        }
    }
}

impl std::str::FromStr for SourceKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "rest" | "api" => Ok(Self::Rest),
            "cli" | "gh" => Ok(Self::Cli),
            _ => Err(ConfigError::InvalidValue {
                section: "github".to_string(),
                key: "source".to_string(),
                message: format!("expected 'rest' or 'cli', got '{s}'"),
            }),
        }
    }
}

/// Global configuration options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GlobalConfig {
    /// Log level for console output (0-6).
    pub output_log_level: LogLevel,
    /// Log level for file output (0-6).
    pub file_log_level: LogLevel,
    /// Path to log file; no file logging when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            output_log_level: LogLevel::INFO,
            file_log_level: LogLevel::TRACE,
            log_file: None,
        }
    }
}

/// GitHub access settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GithubConfig {
    /// Listing strategy.
    pub source: SourceKind,
    /// REST API base URL.
    pub api_url: String,
    /// Page size requested from the REST API.
    pub per_page: u32,
    /// API token sent as `Authorization: token <token>`.
    #[serde(skip_serializing)]
    pub token: Option<String>,
    /// Executable used by the CLI strategy.
    pub cli_program: String,
    /// `--limit` passed to the CLI strategy.
    pub cli_limit: u32,
    /// Seconds the CLI strategy may run (0 = unlimited).
    pub cli_timeout: u64,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            source: SourceKind::default(),
            api_url: "https://api.github.com".to_string(),
            per_page: 100,
            token: None,
            cli_program: "gh".to_string(),
            cli_limit: 200,
            cli_timeout: 60,
        }
    }
}

impl GithubConfig {
    /// Returns the token if one is configured and non-blank.
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref().map(str::trim).filter(|t| !t.is_empty())
    }
}

/// Local workspace settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WorkspaceConfig {
    /// Directory that receives one clone per repository
    /// (default: `~/ghdesk-clones`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_dir: Option<PathBuf>,
}

impl WorkspaceConfig {
    pub const DEFAULT_DIR_NAME: &'static str = "ghdesk-clones";

    /// Resolves the base directory, defaulting below the home directory.
    #[must_use]
    pub fn resolved_base_dir(&self) -> PathBuf {
        self.base_dir.clone().unwrap_or_else(|| {
            dirs::home_dir().map_or_else(
                || PathBuf::from(Self::DEFAULT_DIR_NAME),
                |home| home.join(Self::DEFAULT_DIR_NAME),
            )
        })
    }
}

/// Git executable and per-operation timeouts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GitConfig {
    /// Git executable.
    pub program: String,
    /// Timeouts in seconds.
    pub timeouts: GitTimeouts,
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            program: "git".to_string(),
            timeouts: GitTimeouts::default(),
        }
    }
}

/// Timeouts in seconds for each git operation; 0 waits indefinitely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GitTimeouts {
    /// Anything without a dedicated entry (rev-parse, add, commit, push, ...).
    pub default: u64,
    pub status: u64,
    pub fetch: u64,
    pub pull: u64,
    pub diff: u64,
    pub clone: u64,
}

impl Default for GitTimeouts {
    fn default() -> Self {
        Self {
            default: 120,
            status: 20,
            fetch: 60,
            pull: 120,
            diff: 20,
            clone: 0,
        }
    }
}

impl GitTimeouts {
    /// Converts a seconds value into an optional timeout.
    #[must_use]
    pub const fn duration(secs: u64) -> Option<Duration> {
        if secs == 0 {
            None
        } else {
            Some(Duration::from_secs(secs))
        }
    }
}
