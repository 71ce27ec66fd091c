// ghdesk: GitHub repository desk
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Command implementations.
//!
//! ```text
//! CLI args --> cmd::run_* handlers --> Session
//!   config  options, configs
//!   repo    search, clone, status, files, check, pull, diff, push
//!   shell   interactive loop
//! ```

pub mod config;
pub mod format;
pub mod repo;
pub mod shell;

#[cfg(test)]
mod tests;

use indicatif::{ProgressBar, ProgressStyle};
use std::borrow::Cow;
use std::sync::OnceLock;
use std::time::Duration;

/// Pre-validated spinner style for long-running git and network steps.
fn spinner_style() -> ProgressStyle {
    static STYLE: OnceLock<ProgressStyle> = OnceLock::new();
    STYLE
        .get_or_init(|| {
            ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
        })
        .clone()
}

/// Awaits `future` while a spinner runs on stderr.
///
/// Nothing is drawn when stderr is not a terminal.
pub async fn with_spinner<F: Future>(
    message: impl Into<Cow<'static, str>>,
    future: F,
) -> F::Output {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(spinner_style());
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(100));
    let output = future.await;
    spinner.finish_and_clear();
    output
}
