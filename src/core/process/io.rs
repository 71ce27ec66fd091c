// ghdesk: GitHub repository desk
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! I/O streaming and output capture for processes.
//!
//! ```text
//! run_child()
//!   stdout/stderr reader tasks (trace each line, keep raw bytes)
//!   wait | sleep(timeout) | token.cancelled()
//!   timeout/cancel --> kill + reap, abort readers
//!   exit --> drain readers | rest of timeout | token.cancelled()
//!            (a grandchild may keep the pipes open; keep what was read)
//!   --> CommandResult { exit_code, stdout, stderr, failure }
//! ```

use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Child;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{trace, warn};

use super::builder::{CommandResult, ProcessBuilder, RunFailure, StreamFlags};

/// How the wait on a child ended.
enum WaitOutcome {
    Exited(std::io::Result<std::process::ExitStatus>),
    TimedOut(Duration),
    Interrupted,
}

/// Reader task for one stream and the bytes it has kept so far.
struct StreamReader {
    handle: JoinHandle<()>,
    kept: Arc<Mutex<Vec<u8>>>,
}

impl StreamReader {
    fn spawn<R>(
        stream: R,
        flags: StreamFlags,
        process_name: &str,
        stream_name: &'static str,
    ) -> Self
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        let kept = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&kept);
        let name = process_name.to_string();
        let handle = tokio::spawn(async move {
            read_stream(stream, flags, &name, stream_name, &sink).await;
        });
        Self { handle, kept }
    }

    /// Stops the reader and returns the text read so far.
    fn finish(self) -> String {
        self.handle.abort();
        let kept = self.kept.lock().unwrap_or_else(PoisonError::into_inner);
        String::from_utf8_lossy(&kept).into_owned()
    }
}

/// Resolves once both readers have reached EOF.
async fn drain(stdout: Option<&mut StreamReader>, stderr: Option<&mut StreamReader>) {
    for reader in [stdout, stderr].into_iter().flatten() {
        if let Err(e) = (&mut reader.handle).await {
            warn!(error = %e, "output reader failed");
        }
    }
}

fn finish(reader: Option<StreamReader>) -> String {
    reader.map(StreamReader::finish).unwrap_or_default()
}

/// Sleeps for the timeout, or forever when there is none.
async fn deadline(timeout: Option<Duration>) -> Duration {
    match timeout {
        Some(duration) => {
            tokio::time::sleep(duration).await;
            duration
        }
        None => std::future::pending().await,
    }
}

/// Resolves when the token fires, or never without a token.
async fn cancelled(token: Option<&CancellationToken>) {
    match token {
        Some(token) => token.cancelled().await,
        None => std::future::pending().await,
    }
}

impl ProcessBuilder {
    /// Runs the child process, handling I/O streaming, timeout and cancellation.
    pub(super) async fn run_child(
        &self,
        name: &str,
        child: &mut Child,
        token: Option<&CancellationToken>,
    ) -> CommandResult {
        let mut stdout = child
            .stdout
            .take()
            .map(|s| StreamReader::spawn(s, self.stdout_config(), name, "stdout"));
        let mut stderr = child
            .stderr
            .take()
            .map(|s| StreamReader::spawn(s, self.stderr_config(), name, "stderr"));

        let started = Instant::now();
        let outcome = tokio::select! {
            status = child.wait() => WaitOutcome::Exited(status),
            after = deadline(self.timeout_duration()) => WaitOutcome::TimedOut(after),
            () = cancelled(token) => WaitOutcome::Interrupted,
        };

        let failure = match outcome {
            WaitOutcome::Exited(Ok(status)) => {
                let remaining = self
                    .timeout_duration()
                    .map(|limit| limit.saturating_sub(started.elapsed()));
                let drained = tokio::select! {
                    () = drain(stdout.as_mut(), stderr.as_mut()) => true,
                    _ = deadline(remaining) => false,
                    () = cancelled(token) => false,
                };
                if !drained {
                    warn!(process = %name, "output still open after exit, keeping what was read");
                }
                return CommandResult::exited(
                    status.code().unwrap_or(-1),
                    finish(stdout),
                    finish(stderr),
                );
            }
            WaitOutcome::Exited(Err(e)) => RunFailure::WaitFailed(e.to_string()),
            WaitOutcome::TimedOut(after) => {
                warn!(process = %name, timeout = ?after, "Process timed out");
                RunFailure::TimedOut(after)
            }
            WaitOutcome::Interrupted => {
                warn!(process = %name, "Cancellation requested, terminating process");
                RunFailure::Interrupted
            }
        };

        // kill() also reaps the child, so nothing is left running afterwards
        if let Err(e) = child.kill().await {
            warn!(process = %name, error = %e, "failed to kill process");
        }
        // a grandchild may still hold the pipes open
        finish(stdout);
        finish(stderr);

        CommandResult::failed(failure)
    }
}

/// Reads a stream to EOF, tracing each line and appending it to `kept`.
async fn read_stream<R>(
    reader: R,
    flags: StreamFlags,
    process_name: &str,
    stream_name: &str,
    kept: &Mutex<Vec<u8>>,
) where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(reader);
    let mut line = Vec::new();

    loop {
        line.clear();
        match reader.read_until(b'\n', &mut line).await {
            Ok(0) => break,
            Ok(_) => {
                if flags.contains(StreamFlags::FORWARD_TO_LOG) {
                    let text = String::from_utf8_lossy(&line);
                    trace!(
                        process = %process_name,
                        stream = %stream_name,
                        line = %text.trim_end_matches(['\r', '\n']),
                        "output"
                    );
                }
                if flags.contains(StreamFlags::KEEP_IN_STRING) {
                    kept.lock()
                        .unwrap_or_else(PoisonError::into_inner)
                        .extend_from_slice(&line);
                }
            }
            Err(e) => {
                warn!(
                    process = %process_name,
                    stream = %stream_name,
                    error = %e,
                    "error reading stream"
                );
                break;
            }
        }
    }
}
