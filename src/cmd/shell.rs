// ghdesk: GitHub repository desk
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Interactive desk.
//!
//! ```text
//! ghdesk> line --parse--> ShellCommand --execute--> Session action
//!    ^                                                  |
//!    '------------------ output / error ----------------'
//!
//! EOF, quit or Ctrl-C ends the loop.
//! push without a message asks: "Commit message [Update]:"
//!   enter = default, "-" = cancel, Ctrl-C = cancel
//! ```

use async_trait::async_trait;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, Lines};
use tokio_util::sync::CancellationToken;

use super::format;
use crate::cli::ShellArgs;
use crate::config::Config;
use crate::error::{DeskError, DeskResult, Result};
use crate::session::prompt::{CommitPrompt, FixedMessage};
use crate::session::{SearchReport, Session};

const PROMPT: &str = "ghdesk> ";

const HELP: &str = "\
search <user>          list the user's repositories
dir [path]             show or set the clone directory
select <i|name>...     select repositories (the last one becomes current)
clone                  clone the selected repositories
refresh                reload the working tree of the current repository
files                  list modified and untracked files
file <i|path>          select a working-tree entry
check                  fetch and compare with the remote
pull                   pull the current repository
diff [i|path]          show the diff of the selected entry
push [message]         commit everything and push
log                    show the activity log
help                   show this help
quit                   leave";

/// One parsed shell line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Search(String),
    Dir(Option<String>),
    Select(Vec<String>),
    Clone,
    Refresh,
    Files,
    File(String),
    Check,
    Pull,
    Diff(Option<String>),
    Push(Option<String>),
    Log,
    Help,
    Quit,
}

/// Parses a shell line; `Ok(None)` for a blank line.
///
/// # Errors
///
/// Returns a usage message for unknown commands and missing arguments.
pub fn parse_shell_command(line: &str) -> std::result::Result<Option<ShellCommand>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (word, rest) = line
        .split_once(char::is_whitespace)
        .map_or((line, ""), |(w, r)| (w, r.trim()));
    let arg = (!rest.is_empty()).then(|| rest.to_string());

    let command = match word.to_lowercase().as_str() {
        "search" => ShellCommand::Search(rest.to_string()),
        "dir" => ShellCommand::Dir(arg),
        "select" if rest.is_empty() => return Err("usage: select <index|name>...".to_string()),
        "select" => ShellCommand::Select(rest.split_whitespace().map(str::to_string).collect()),
        "clone" => ShellCommand::Clone,
        "refresh" | "status" => ShellCommand::Refresh,
        "files" => ShellCommand::Files,
        "file" => ShellCommand::File(arg.ok_or("usage: file <index|path>")?),
        "check" => ShellCommand::Check,
        "pull" => ShellCommand::Pull,
        "diff" => ShellCommand::Diff(arg),
        "push" => ShellCommand::Push(arg),
        "log" => ShellCommand::Log,
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" | "q" => ShellCommand::Quit,
        other => return Err(format!("unknown command '{other}'; type 'help'")),
    };
    Ok(Some(command))
}

/// Reads a commit message from the shell input.
struct LinePrompt<'a, R, W> {
    lines: &'a mut Lines<R>,
    out: &'a mut W,
    cancel: &'a CancellationToken,
}

#[async_trait]
impl<'a, R, W> CommitPrompt for LinePrompt<'a, R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    async fn commit_message(&mut self, default: &str) -> Option<String> {
        let question = format!("Commit message [{default}] (enter = default, '-' = cancel): ");
        self.out.write_all(question.as_bytes()).await.ok()?;
        self.out.flush().await.ok()?;
        let line = tokio::select! {
            line = self.lines.next_line() => line.ok()??,
            () = self.cancel.cancelled() => return None,
        };
        match line.trim() {
            "" => Some(default.to_string()),
            "-" => None,
            message => Some(message.to_string()),
        }
    }
}

/// Interactive loop over a session.
pub struct Shell<R, W> {
    session: Session,
    lines: Lines<R>,
    out: W,
    cancel: CancellationToken,
}

impl<R, W> Shell<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(session: Session, input: R, out: W, cancel: CancellationToken) -> Self {
        Self {
            session,
            lines: input.lines(),
            out,
            cancel,
        }
    }

    /// Runs until EOF, `quit` or cancellation and returns the session.
    ///
    /// # Errors
    ///
    /// Returns an error only when reading input or writing output fails;
    /// failed actions are reported and the loop continues.
    pub async fn run(mut self, initial_user: Option<&str>) -> Result<Session> {
        if let Some(user) = initial_user {
            self.dispatch(ShellCommand::Search(user.to_string())).await?;
        }

        loop {
            self.out.write_all(PROMPT.as_bytes()).await?;
            self.out.flush().await?;

            let line = tokio::select! {
                line = self.lines.next_line() => line?,
                () = self.cancel.cancelled() => None,
            };
            let Some(line) = line else {
                self.say("").await?;
                break;
            };

            match parse_shell_command(&line) {
                Ok(None) => {}
                Ok(Some(ShellCommand::Quit)) => break,
                Ok(Some(command)) => self.dispatch(command).await?,
                Err(usage) => self.say(&usage).await?,
            }
        }
        Ok(self.session)
    }

    /// Executes a command, reporting action failures as output.
    async fn dispatch(&mut self, command: ShellCommand) -> std::io::Result<()> {
        match self.execute(command).await {
            Ok(()) => Ok(()),
            Err(DeskError::Io(e)) => Err(*e),
            Err(e) => self.say(&format!("error: {e}")).await,
        }
    }

    async fn say(&mut self, text: &str) -> std::io::Result<()> {
        self.out.write_all(text.as_bytes()).await?;
        if !text.ends_with('\n') {
            self.out.write_all(b"\n").await?;
        }
        Ok(())
    }

    async fn say_lines(&mut self, lines: &[String]) -> std::io::Result<()> {
        for line in lines {
            self.say(line).await?;
        }
        Ok(())
    }

    async fn execute(&mut self, command: ShellCommand) -> DeskResult<()> {
        match command {
            ShellCommand::Search(user) => {
                if self.session.search(&user).await? == SearchReport::Stale {
                    self.say("(superseded by a newer search)").await?;
                } else {
                    let lines = format::repositories(self.session.repositories());
                    self.say_lines(&lines).await?;
                }
            }
            ShellCommand::Dir(None) => {
                let dir = self.session.base_dir().display().to_string();
                self.say(&dir).await?;
            }
            ShellCommand::Dir(Some(dir)) => self.session.set_base_dir(dir)?,
            ShellCommand::Select(tokens) => self.select(&tokens).await?,
            ShellCommand::Clone => {
                let report = self.session.clone_selected().await?;
                self.say_lines(&format::clone_report(&report)).await?;
            }
            ShellCommand::Refresh => {
                let lines = format::entries(self.session.refresh_local().await?);
                self.say_lines(&lines).await?;
            }
            ShellCommand::Files => {
                let files = self.session.changed_files().await?;
                self.say_lines(&files).await?;
            }
            ShellCommand::File(entry) => {
                let selected = self.select_file(&entry)?;
                self.say(&format!("selected: {selected}")).await?;
            }
            ShellCommand::Check => {
                let divergence = self.session.check_updates().await?;
                self.say(&divergence.to_string()).await?;
            }
            ShellCommand::Pull => {
                let report = self.session.pull().await?;
                self.say(&report.output).await?;
                if !report.succeeded {
                    return Err(DeskError::Other("git pull failed".into()));
                }
            }
            ShellCommand::Diff(entry) => {
                if let Some(entry) = entry {
                    self.select_file(&entry)?;
                }
                let diff = self.session.show_diff().await?;
                self.say(&diff).await?;
            }
            ShellCommand::Push(message) => {
                let outcome = if message.is_some() {
                    self.session
                        .commit_and_push(&mut FixedMessage(message))
                        .await?
                } else {
                    let mut prompt = LinePrompt {
                        lines: &mut self.lines,
                        out: &mut self.out,
                        cancel: &self.cancel,
                    };
                    self.session.commit_and_push(&mut prompt).await?
                };
                self.say(&format::push_outcome(&outcome)).await?;
            }
            ShellCommand::Log => {
                let lines: Vec<String> = self
                    .session
                    .activity()
                    .entries()
                    .iter()
                    .map(ToString::to_string)
                    .collect();
                self.say_lines(&lines).await?;
            }
            ShellCommand::Help => self.say(HELP).await?,
            ShellCommand::Quit => {}
        }
        Ok(())
    }

    async fn select(&mut self, tokens: &[String]) -> DeskResult<()> {
        let indices: Option<Vec<usize>> = tokens.iter().map(|t| t.parse().ok()).collect();
        match indices {
            Some(indices) => self.session.select_repositories(&indices)?,
            None => match self.session.indices_of(tokens) {
                Ok(indices) => self.session.select_repositories(&indices)?,
                Err(_) if tokens.len() == 1 => {
                    self.session.select_repository_by_name(&tokens[0])?;
                }
                Err(e) => return Err(e.into()),
            },
        }

        let current = self
            .session
            .current_repository()
            .unwrap_or_default()
            .to_string();
        self.say(&format!("current: {current}")).await?;

        match self.session.refresh_local().await {
            Ok(files) => {
                let lines = format::entries(files);
                self.say_lines(&lines).await?;
            }
            Err(e) => self.say(&format!("note: {e}")).await?,
        }
        Ok(())
    }

    fn select_file(&mut self, entry: &str) -> DeskResult<String> {
        let selected = match entry.parse::<usize>() {
            Ok(index) => self.session.select_file(index)?,
            Err(_) => self.session.select_file_by_path(entry)?,
        };
        Ok(selected.to_string())
    }
}

/// Runs the interactive desk on stdin/stdout.
///
/// # Errors
///
/// Returns an error if stdin or stdout fail.
pub async fn run_shell_command(
    args: &ShellArgs,
    config: &Config,
    cancel: CancellationToken,
) -> Result<()> {
    let session = Session::from_config(config, cancel.clone());
    let input = tokio::io::BufReader::new(tokio::io::stdin());
    let shell = Shell::new(session, input, tokio::io::stdout(), cancel);
    shell.run(args.username.as_deref()).await?;
    Ok(())
}
