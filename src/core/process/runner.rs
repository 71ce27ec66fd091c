// ghdesk: GitHub repository desk
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Process execution and lifecycle management.
//!
//! ```text
//! run() / run_with_cancellation(token)
//!              |
//!              v
//!     build_command()
//!     args, env, piped stdio
//!              |
//!              v
//!          spawn() --err--> CommandResult::failed(FailedToStart)
//!              |
//!              v
//!         run_child
//!   exit | timeout (kill) | cancel (kill)
//!              |
//!              v
//!       CommandResult
//!    { exit_code, stdout, stderr, failure }
//! ```

use std::process::Stdio;
use tokio::process::Command;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

use super::builder::{CommandResult, ProcessBuilder, RunFailure};

impl ProcessBuilder {
    /// Returns the display name for this process.
    fn display_name(&self) -> String {
        self.name_override().map_or_else(
            || {
                self.program().file_stem().map_or_else(
                    || "process".to_string(),
                    |s| s.to_string_lossy().into_owned(),
                )
            },
            String::from,
        )
    }

    /// Returns the full command line as a string (for logging).
    #[must_use]
    pub fn command_line(&self) -> String {
        use std::fmt::Write as _;
        let mut cmd = format!("{}", self.program().display());
        for arg in self.args_slice() {
            if arg.contains(' ') {
                let _ = write!(cmd, " \"{arg}\"");
            } else {
                let _ = write!(cmd, " {arg}");
            }
        }
        cmd
    }

    /// Spawns and runs the process, waiting for completion or timeout.
    ///
    /// Never fails: spawn errors, timeouts and non-zero exits are all reported
    /// through the returned [`CommandResult`].
    pub async fn run(self) -> CommandResult {
        self.execute(None).await
    }

    /// Spawns and runs the process with cancellation support.
    ///
    /// Similar to `run()`, but when the token is cancelled the process is
    /// killed and the result carries [`RunFailure::Interrupted`].
    ///
    /// # Example
    ///
    /// ```ignore
    /// use tokio_util::sync::CancellationToken;
    /// use ghdesk::core::process::builder::ProcessBuilder;
    ///
    /// let token = CancellationToken::new();
    /// let result = ProcessBuilder::new("git")
    ///     .args(["fetch"])
    ///     .capture_output()
    ///     .run_with_cancellation(token)
    ///     .await;
    /// ```
    pub async fn run_with_cancellation(self, token: CancellationToken) -> CommandResult {
        if token.is_cancelled() {
            return CommandResult::failed(RunFailure::Interrupted);
        }
        self.execute(Some(token)).await
    }

    async fn execute(self, token: Option<CancellationToken>) -> CommandResult {
        let name = self.display_name();
        let cmd_line = self.command_line();

        debug!(cmd = %cmd_line, "exec");

        let mut command = self.build_command();

        let mut child = match command.spawn() {
            Ok(child) => child,
            Err(e) => {
                warn!(process = %name, error = %e, "failed to start");
                return CommandResult::failed(RunFailure::FailedToStart(format!(
                    "{cmd_line}: {e}"
                )));
            }
        };

        let pid = child.id();
        trace!(process = %name, pid = ?pid, "spawned");

        let result = self.run_child(&name, &mut child, token.as_ref()).await;

        trace!(
            process = %name,
            exit_code = ?result.exit_code(),
            failure = ?result.failure(),
            "completed"
        );
        result
    }

    /// Builds the tokio Command from this builder's configuration.
    fn build_command(&self) -> Command {
        let mut command = Command::new(self.program());

        command.args(self.args_slice());

        for (key, value) in self.env_vars() {
            command.env(key, value);
        }

        command.stdin(Stdio::null());
        command.stdout(Stdio::piped());
        command.stderr(Stdio::piped());

        // Kill on drop for safety
        command.kill_on_drop(true);

        command
    }
}
