// ghdesk: GitHub repository desk
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Error handling module.
//!
//! ```text
//!         DeskError (~24 bytes)
//!                 |
//!       +---------+---------+
//!       |         |         |
//!       v         v         v
//!    Action      Io       Other
//!      Box       Box     Box<str>
//!
//! Error kinds reported as data by their producers:
//!   Network  Reqwest, HttpError
//!   Source   Network, Json, UnexpectedPayload, Cli
//!   Config   InvalidValue
//!   Action   EmptyUsername, NoRepositorySelected, LocalMissing, StepFailed, ...
//! ```

use thiserror::Error;

/// Convenience alias for `anyhow::Result`.
pub type Result<T> = anyhow::Result<T>;

/// Result type using [`DeskError`].
pub type DeskResult<T> = std::result::Result<T, DeskError>;

/// Error of an interactive shell command.
///
/// All sub-errors are boxed to keep this enum at ~24 bytes on the stack.
#[derive(Debug, Error)]
pub enum DeskError {
    /// A user action could not be carried out.
    #[error("{0}")]
    Action(#[from] Box<ActionError>),

    /// I/O error.
    #[error("io error: {0}")]
    Io(Box<std::io::Error>),

    /// Generic error with message.
    #[error("{0}")]
    Other(Box<str>),
}

// --- From implementations for boxing ---

/// Macro to generate `From` implementations that box the source error.
macro_rules! impl_from_boxed {
    ($($error:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$error> for DeskError {
                fn from(err: $error) -> Self {
                    DeskError::$variant(Box::new(err))
                }
            }
        )+
    };
}

impl_from_boxed! {
    ActionError => Action,
    std::io::Error => Io,
}

// --- Network Errors ---

/// Network operation errors.
#[derive(Debug, Error)]
pub enum NetworkError {
    /// HTTP error response; `body` is the trimmed response text, possibly empty.
    #[error("http error {status}: {url}{}", body_suffix(.body))]
    HttpError {
        status: u16,
        url: String,
        body: String,
    },

    /// Error from reqwest library.
    #[error("reqwest error: {0}")]
    Reqwest(#[from] reqwest::Error),
}

fn body_suffix(body: &str) -> String {
    if body.is_empty() {
        String::new()
    } else {
        format!(" ({body})")
    }
}

// --- Repository Source Errors ---

/// Errors produced while listing a user's repositories.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Transport or HTTP status failure.
    #[error(transparent)]
    Network(#[from] NetworkError),

    /// The configured API URL cannot carry a repository path.
    #[error("invalid API URL '{url}': {message}")]
    InvalidApiUrl { url: String, message: String },

    /// Response body was not valid JSON.
    #[error("invalid JSON from {origin}: {source}")]
    Json {
        origin: String,
        #[source]
        source: serde_json::Error,
    },

    /// Response was JSON, but not the expected array of repositories.
    #[error("unexpected API JSON from {origin}: expected an array, got {found}")]
    UnexpectedPayload { origin: String, found: String },

    /// The listing CLI could not be run or reported failure.
    #[error("'{command}' failed: {message}")]
    Cli { command: String, message: String },
}

// --- Config Errors ---

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Invalid configuration value.
    #[error("invalid value for '{key}' in section '[{section}]': {message}")]
    InvalidValue {
        section: String,
        key: String,
        message: String,
    },
}

// --- Action Errors ---

/// Failures of user-initiated actions.
///
/// None of these are fatal: the session stays usable after any of them.
#[derive(Debug, Error)]
pub enum ActionError {
    /// Search requested with a blank username.
    #[error("username required")]
    EmptyUsername,

    /// Commit requested with a blank message.
    #[error("commit message required")]
    EmptyCommitMessage,

    /// The action needs a selected repository.
    #[error("select a repository first")]
    NoRepositorySelected,

    /// The action needs a selected file entry.
    #[error("select a file first")]
    NoFileSelected,

    /// Index or name does not match a displayed entry.
    #[error("no entry matches '{0}'")]
    InvalidSelection(String),

    /// Base directory input was blank.
    #[error("base directory must not be empty")]
    EmptyBaseDir,

    /// Repository has no local clone under the base directory.
    #[error("local clone missing: {path}")]
    LocalMissing { path: String },

    /// Selected file entry has no usable path.
    #[error("cannot extract a path from '{entry}': {reason}")]
    UnparsableEntry { entry: String, reason: String },

    /// A git command needed by the action did not succeed.
    #[error("{command} failed: {output}")]
    CommandFailed { command: String, output: String },

    /// One step of commit & push failed; later steps were not run.
    #[error("{step} failed: {output}")]
    StepFailed { step: String, output: String },

    /// Repository listing failed.
    #[error("search failed: {0}")]
    Search(#[source] SourceError),
}
