// ghdesk: GitHub repository desk
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! CLI module for ghdesk using clap derive.
//!
//! # Command Structure
//!
//! ```text
//! ghdesk [global options] <command>
//! version | options | configs
//! search <user>
//! clone <user> [names...]
//! status|files|check|pull <repo>
//! diff <repo> <entry>
//! push <repo> [-m MSG]
//! shell [user]
//! ```

pub mod global;


use crate::cli::global::GlobalOptions;
use clap::{Args, Parser, Subcommand};

/// GitHub repository desk.
///
/// Lists a user's GitHub repositories, clones them and keeps the clones in
/// sync.
#[derive(Debug, Parser)]
#[command(
    name = "ghdesk",
    author,
    version,
    about = "GitHub repository desk",
    long_about = "ghdesk Copyright (C) 2026 Romeo Ahmed\n\
                  This program comes with ABSOLUTELY NO WARRANTY\n\
                  This is free software, and you are welcome to redistribute it\n\
                  under certain conditions; see LICENSE for details.\n\n\
                  Lists a user's GitHub repositories, clones them into a base\n\
                  directory and keeps the clones in sync. Run `ghdesk shell` for\n\
                  the interactive desk, or `ghdesk <command> --help` for a\n\
                  single command.",
    after_help = "CONFIG FILES:\n\n\
                  ghdesk reads `ghdesk.toml` from the current directory when it\n\
                  exists, then every file given with --config, then GHDESK_*\n\
                  environment variables (GHDESK_GITHUB__SOURCE=cli). Command-line\n\
                  flags win over all of them. Use --no-default-config to skip\n\
                  `ghdesk.toml`."
)]
pub struct Cli {
    /// Global options shared by all commands
    #[command(flatten)]
    pub global: GlobalOptions,

    /// Command to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Shows the version.
    Version,

    /// Lists all options and their values.
    Options,

    /// Lists the configuration files in use.
    Configs,

    /// Lists a user's repositories.
    Search(SearchArgs),

    /// Clones a user's repositories into the base directory.
    Clone(CloneArgs),

    /// Shows the working-tree status of a clone.
    Status(RepoArgs),

    /// Lists modified and untracked files of a clone.
    Files(RepoArgs),

    /// Fetches and compares a clone with its remote.
    Check(RepoArgs),

    /// Pulls a clone.
    Pull(RepoArgs),

    /// Shows the diff of one changed file.
    Diff(DiffArgs),

    /// Commits every change and pushes.
    Push(PushArgs),

    /// Starts the interactive desk.
    Shell(ShellArgs),
}

/// Arguments for `search`.
#[derive(Debug, Clone, Args)]
pub struct SearchArgs {
    /// GitHub user name.
    pub username: String,
}

/// Arguments for `clone`.
#[derive(Debug, Clone, Args)]
pub struct CloneArgs {
    /// GitHub user name.
    pub username: String,

    /// Repositories to clone; all when omitted.
    pub names: Vec<String>,
}

/// Arguments for commands working on one clone.
#[derive(Debug, Clone, Args)]
pub struct RepoArgs {
    /// Repository name (directory below the base directory).
    pub repo: String,
}

/// Arguments for `diff`.
#[derive(Debug, Clone, Args)]
pub struct DiffArgs {
    /// Repository name.
    pub repo: String,

    /// Entry index as shown by `status`, or the file path.
    pub entry: String,
}

/// Arguments for `push`.
#[derive(Debug, Clone, Args)]
pub struct PushArgs {
    /// Repository name.
    pub repo: String,

    /// Commit message (default: "Update").
    #[arg(short = 'm', long = "message", value_name = "MSG")]
    pub message: Option<String>,
}

/// Arguments for `shell`.
#[derive(Debug, Clone, Args)]
pub struct ShellArgs {
    /// User whose repositories are listed at start.
    pub username: Option<String>,
}

/// Parses command-line arguments.
#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}

/// Parses command-line arguments from an iterator.
pub fn parse_from<I, T>(iter: I) -> Cli
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::parse_from(iter)
}

/// Tries to parse command-line arguments, returning an error on failure.
///
/// # Errors
///
/// Returns a `clap::Error` if the arguments are invalid or if help/version information
/// was requested.
pub fn try_parse() -> Result<Cli, clap::Error> {
    Cli::try_parse()
}
