// ghdesk: GitHub repository desk
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Global CLI options available for all commands.
//!
//! # Option Precedence
//!
//! ```text
//! --config FILE       ← Additional config files (can repeat)
//! --log-level N       ← Console verbosity (0-6)
//! --file-log-level N  ← File verbosity (defaults to --log-level)
//! --base-dir DIR      ← workspace.base_dir
//! --source rest|cli   ← github.source
//! --token / GITHUB_TOKEN ← github.token
//!
//! Precedence: CLI flags > GHDESK_* env > --config > ghdesk.toml > defaults
//! ```

use clap::Args;
use std::path::PathBuf;

use crate::config::loader::ConfigLoader;

/// Default config file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "ghdesk.toml";

/// Prefix of configuration environment variables.
pub const ENV_PREFIX: &str = "GHDESK";

/// Global options available for all commands.
#[derive(Debug, Clone, Default, Args)]
pub struct GlobalOptions {
    /// Path to additional TOML configuration file(s).
    /// Can be specified multiple times.
    #[arg(short = 'c', long = "config", value_name = "FILE", action = clap::ArgAction::Append)]
    pub configs: Vec<PathBuf>,

    /// Console log level (0=silent, 1=errors, 2=warnings, 3=info, 4=debug, 5=trace, 6=dump).
    #[arg(short = 'l', long = "log-level", value_name = "LEVEL", value_parser = clap::value_parser!(u8).range(0..=6)
    )]
    pub log_level: Option<u8>,

    /// File log level, defaults to --log-level.
    #[arg(long = "file-log-level", value_name = "LEVEL", value_parser = clap::value_parser!(u8).range(0..=6)
    )]
    pub file_log_level: Option<u8>,

    /// Path to log file.
    #[arg(long = "log-file", value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Directory that receives the clones (default: ~/ghdesk-clones).
    #[arg(short = 'd', long = "base-dir", value_name = "DIR")]
    pub base_dir: Option<PathBuf>,

    /// Repository listing strategy.
    #[arg(long, value_name = "SOURCE", value_parser = ["rest", "cli"])]
    pub source: Option<String>,

    /// GitHub API token.
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true, value_name = "TOKEN")]
    pub token: Option<String>,

    /// Skips ghdesk.toml in the working directory, only uses --config.
    #[arg(long = "no-default-config")]
    pub no_default_config: bool,
}

impl GlobalOptions {
    /// Builds the config loader for these options.
    #[must_use]
    pub fn config_loader(&self) -> ConfigLoader {
        let mut loader = ConfigLoader::new();
        if !self.no_default_config {
            loader = loader.add_toml_file_optional(DEFAULT_CONFIG_FILE);
        }
        for path in &self.configs {
            loader = loader.add_toml_file(path);
        }
        self.apply_overrides(loader.with_env_prefix(ENV_PREFIX))
    }

    /// Applies command-line options as configuration overrides.
    #[must_use]
    pub fn apply_overrides(&self, mut loader: ConfigLoader) -> ConfigLoader {
        if let Some(level) = self.log_level {
            loader = loader.set("global.output_log_level", i64::from(level));
        }

        // file_log_level falls back to log_level if not specified
        if let Some(level) = self.file_log_level.or(self.log_level) {
            loader = loader.set("global.file_log_level", i64::from(level));
        }

        if let Some(path) = &self.log_file {
            loader = loader.set("global.log_file", path.display().to_string());
        }

        if let Some(dir) = &self.base_dir {
            loader = loader.set("workspace.base_dir", dir.display().to_string());
        }

        if let Some(source) = &self.source {
            loader = loader.set("github.source", source.clone());
        }

        if let Some(token) = self.token.as_deref().filter(|t| !t.trim().is_empty()) {
            loader = loader.set("github.token", token.to_string());
        }

        loader
    }
}
