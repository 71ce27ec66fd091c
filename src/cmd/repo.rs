// ghdesk: GitHub repository desk
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! One-shot repository commands.
//!
//! ```text
//! search <user>            Session::search          -> repository list
//! clone <user> [names]     search + select + clone  -> clone report
//! status <repo>            refresh_local            -> [i] entries
//! files <repo>             changed_files            -> paths
//! check <repo>             check_updates            -> divergence
//! pull <repo>              pull                     -> git output
//! diff <repo> <entry>      refresh + select + diff  -> diff text
//! push <repo> [-m MSG]     commit_and_push          -> outcome
//! ```

use anyhow::bail;
use tokio_util::sync::CancellationToken;

use super::{format, with_spinner};
use crate::cli::{CloneArgs, DiffArgs, PushArgs, RepoArgs, SearchArgs};
use crate::config::Config;
use crate::error::Result;
use crate::session::Session;
use crate::session::prompt::FixedMessage;

fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{line}");
    }
}

/// Session whose current repository is `name`.
fn open_repo(config: &Config, cancel: CancellationToken, name: &str) -> Result<Session> {
    let mut session = Session::from_config(config, cancel);
    session.select_repository_by_name(name)?;
    Ok(session)
}

/// Lists a user's repositories.
///
/// # Errors
///
/// Returns an error if the username is blank or the listing fails.
pub async fn run_search_command(
    args: &SearchArgs,
    config: &Config,
    cancel: CancellationToken,
) -> Result<()> {
    let mut session = Session::from_config(config, cancel);
    with_spinner("listing repositories", session.search(&args.username)).await?;
    print_lines(&format::repositories(session.repositories()));
    Ok(())
}

/// Clones the named repositories of a user, or all of them.
///
/// # Errors
///
/// Returns an error if the listing fails, a name is unknown, or any clone
/// fails (after the remaining ones were attempted).
pub async fn run_clone_command(
    args: &CloneArgs,
    config: &Config,
    cancel: CancellationToken,
) -> Result<()> {
    let mut session = Session::from_config(config, cancel);
    with_spinner("listing repositories", session.search(&args.username)).await?;

    let indices = if args.names.is_empty() {
        (0..session.repositories().len()).collect()
    } else {
        session.indices_of(args.names.as_slice())?
    };
    if indices.is_empty() {
        println!("No repositories to clone");
        return Ok(());
    }
    session.select_repositories(&indices)?;

    let report = with_spinner("cloning", session.clone_selected()).await?;
    print_lines(&format::clone_report(&report));

    if !report.is_success() {
        bail!(
            "{} of {} clones failed",
            report.failed.len(),
            indices.len()
        );
    }
    Ok(())
}

/// Prints the working-tree entries of a clone.
///
/// # Errors
///
/// Returns an error if the clone is missing or `git status` fails.
pub async fn run_status_command(
    args: &RepoArgs,
    config: &Config,
    cancel: CancellationToken,
) -> Result<()> {
    let mut session = open_repo(config, cancel, &args.repo)?;
    let files = session.refresh_local().await?;
    print_lines(&format::entries(files));
    Ok(())
}

/// Prints modified and untracked paths of a clone.
///
/// # Errors
///
/// Returns an error if the clone is missing or `git ls-files` fails.
pub async fn run_files_command(
    args: &RepoArgs,
    config: &Config,
    cancel: CancellationToken,
) -> Result<()> {
    let mut session = open_repo(config, cancel, &args.repo)?;
    print_lines(&session.changed_files().await?);
    Ok(())
}

/// Fetches and prints how far the clone is behind and ahead.
///
/// # Errors
///
/// Returns an error if the clone is missing.
pub async fn run_check_command(
    args: &RepoArgs,
    config: &Config,
    cancel: CancellationToken,
) -> Result<()> {
    let mut session = open_repo(config, cancel, &args.repo)?;
    let divergence = with_spinner("fetching", session.check_updates()).await?;
    println!("{divergence}");
    Ok(())
}

/// Pulls a clone and prints git's output.
///
/// # Errors
///
/// Returns an error if the clone is missing or the pull fails.
pub async fn run_pull_command(
    args: &RepoArgs,
    config: &Config,
    cancel: CancellationToken,
) -> Result<()> {
    let mut session = open_repo(config, cancel, &args.repo)?;
    let report = with_spinner("pulling", session.pull()).await?;
    print!("{}", report.output);
    if !report.succeeded {
        bail!("git pull failed in {}", args.repo);
    }
    Ok(())
}

/// Prints the diff of one working-tree entry.
///
/// # Errors
///
/// Returns an error if the clone is missing, the entry does not exist, or
/// its path cannot be extracted.
pub async fn run_diff_command(
    args: &DiffArgs,
    config: &Config,
    cancel: CancellationToken,
) -> Result<()> {
    let mut session = open_repo(config, cancel, &args.repo)?;
    session.refresh_local().await?;
    match args.entry.parse::<usize>() {
        Ok(index) => session.select_file(index)?,
        Err(_) => session.select_file_by_path(&args.entry)?,
    };
    print!("{}", session.show_diff().await?);
    Ok(())
}

/// Commits every change of a clone and pushes.
///
/// # Errors
///
/// Returns an error if the clone is missing, the message is blank, or a step
/// fails.
pub async fn run_push_command(
    args: &PushArgs,
    config: &Config,
    cancel: CancellationToken,
) -> Result<()> {
    let mut session = open_repo(config, cancel, &args.repo)?;
    let mut prompt = FixedMessage(args.message.clone());
    let outcome = with_spinner("pushing", session.commit_and_push(&mut prompt)).await?;
    println!("{}", format::push_outcome(&outcome));
    Ok(())
}
