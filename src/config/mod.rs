// ghdesk: GitHub repository desk
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration management for ghdesk.
//!
//! # Configuration Hierarchy
//!
//! ```text
//! Priority (low → high)
//! 1. defaults
//! 2. ghdesk.toml (cwd, optional)
//! 3. --config FILE (repeatable)
//! 4. GHDESK_* env vars
//! 5. CLI overrides (--base-dir, --source, --token / GITHUB_TOKEN)
//! ```
//!
//! # Environment Variable Mapping
//!
//! ```text
//! GHDESK_GITHUB__SOURCE=cli            → github.source = "cli"
//! GHDESK_WORKSPACE__BASE_DIR=/src      → workspace.base_dir = "/src"
//! GHDESK_GIT__TIMEOUTS__PULL=300       → git.timeouts.pull = 300
//! ```
//!
//! # Example
//!
//! ```toml
//! [github]
//! source = "rest"
//! per_page = 100
//!
//! [workspace]
//! base_dir = "/home/me/src/github"
//!
//! [git.timeouts]
//! fetch = 90
//! ```

pub mod loader;
pub mod types;

#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::Result;

use loader::ConfigLoader;
use types::{GitConfig, GithubConfig, GlobalConfig, WorkspaceConfig};

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Global options.
    pub global: GlobalConfig,
    /// GitHub access.
    pub github: GithubConfig,
    /// Local clone directory.
    pub workspace: WorkspaceConfig,
    /// Git executable and timeouts.
    pub git: GitConfig,
}

impl Config {
    /// Create a new configuration builder.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use ghdesk::config::Config;
    ///
    /// let config = Config::builder()
    ///     .add_toml_file_optional("ghdesk.toml")
    ///     .with_env_prefix("GHDESK")
    ///     .build()?;
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    #[must_use]
    pub fn builder() -> ConfigLoader {
        ConfigLoader::new()
    }

    /// Load configuration from a single TOML file (simple API).
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, contains invalid TOML, or
    /// does not match the `Config` structure.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::builder().add_toml_file(path).build()
    }

    /// Load configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is not valid TOML or does not match the
    /// `Config` structure.
    pub fn parse(content: &str) -> Result<Self> {
        Self::builder().add_toml_str(content).build()
    }

    /// Base directory for clones, with the home-directory default applied.
    #[must_use]
    pub fn base_dir(&self) -> PathBuf {
        self.workspace.resolved_base_dir()
    }

    /// Format configuration options for display.
    ///
    /// Sensitive fields (the API token) are hidden with a `[hidden]` marker.
    /// Output is deterministically ordered using `BTreeMap`.
    #[must_use]
    pub fn format_options(&self) -> Vec<String> {
        let mut options = BTreeMap::new();
        self.format_global_options(&mut options);
        self.format_github_options(&mut options);
        self.format_workspace_options(&mut options);
        self.format_git_options(&mut options);

        let max_key_len = options.keys().map(String::len).max().unwrap_or(0);

        options
            .into_iter()
            .map(|(key, value)| format!("{key:<max_key_len$} = {value}"))
            .collect()
    }

    fn format_global_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert(
            "global.output_log_level".into(),
            self.global.output_log_level.as_u8().to_string(),
        );
        options.insert(
            "global.file_log_level".into(),
            self.global.file_log_level.as_u8().to_string(),
        );
        options.insert(
            "global.log_file".into(),
            self.global
                .log_file
                .as_ref()
                .map_or_else(String::new, |p| p.display().to_string()),
        );
    }

    fn format_github_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert("github.source".into(), self.github.source.to_string());
        options.insert("github.api_url".into(), self.github.api_url.clone());
        options.insert("github.per_page".into(), self.github.per_page.to_string());
        options.insert(
            "github.token".into(),
            if self.github.token().is_some() {
                "[hidden]".into()
            } else {
                String::new()
            },
        );
        options.insert(
            "github.cli_program".into(),
            self.github.cli_program.clone(),
        );
        options.insert("github.cli_limit".into(), self.github.cli_limit.to_string());
        options.insert(
            "github.cli_timeout".into(),
            self.github.cli_timeout.to_string(),
        );
    }

    fn format_workspace_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert(
            "workspace.base_dir".into(),
            self.base_dir().display().to_string(),
        );
    }

    fn format_git_options(&self, options: &mut BTreeMap<String, String>) {
        let t = &self.git.timeouts;
        options.insert("git.program".into(), self.git.program.clone());
        for (name, secs) in [
            ("default", t.default),
            ("status", t.status),
            ("fetch", t.fetch),
            ("pull", t.pull),
            ("diff", t.diff),
            ("clone", t.clone),
        ] {
            options.insert(format!("git.timeouts.{name}"), secs.to_string());
        }
    }
}
