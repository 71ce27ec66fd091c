// ghdesk: GitHub repository desk
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Async process spawning and management.
//!
//! ```text
//! ProcessBuilder::new("git")
//!   .args() .env() .timeout() .capture_output()
//!   .run() / .run_with_cancellation()
//!       --> tokio::process::Command
//!           stream stdout/stderr
//!           timeout or cancel --> kill + reap
//!           exit --> drain pipes within the rest of the timeout
//!       --> CommandResult { exit_code, stdout, stderr, failure }
//! ```

pub mod builder;
mod io;
mod runner;
#[cfg(test)]
mod tests;
