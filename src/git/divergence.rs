// ghdesk: GitHub repository desk
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Remote divergence counts.
//!
//! ```text
//! git rev-list --left-right --count origin/<branch>...HEAD
//!   "3\t1\n" --> DivergenceCount { behind: 3, ahead: 1 }
//!   "3"      --> None
//!   "x y"    --> None
//! ```

use std::fmt;

/// Commits unique to the remote-tracking branch and to `HEAD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DivergenceCount {
    /// Commits on `origin/<branch>` missing locally.
    pub behind: u64,
    /// Local commits missing on `origin/<branch>`.
    pub ahead: u64,
}

impl fmt::Display for DivergenceCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Behind: {} Ahead: {}", self.behind, self.ahead)
    }
}

/// Parses `<behind><whitespace><ahead>`.
///
/// Returns `None` when fewer than two tokens are present or either token is
/// not a non-negative integer.
#[must_use]
pub fn parse_divergence(text: &str) -> Option<DivergenceCount> {
    let mut tokens = text.split_whitespace();
    let behind = parse_count(tokens.next()?)?;
    let ahead = parse_count(tokens.next()?)?;
    Some(DivergenceCount { behind, ahead })
}

fn parse_count(token: &str) -> Option<u64> {
    if token.bytes().all(|b| b.is_ascii_digit()) {
        token.parse().ok()
    } else {
        None
    }
}

/// Why divergence counts are not available.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnknownReason {
    /// `HEAD` is not on a branch.
    DetachedHead,
    /// `rev-parse --abbrev-ref HEAD` failed.
    BranchLookupFailed(String),
    /// `rev-list` failed, e.g. no upstream.
    CountFailed(String),
    /// `rev-list` output was not two counts.
    Unparsable(String),
}

impl fmt::Display for UnknownReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DetachedHead => f.write_str("HEAD is detached"),
            Self::BranchLookupFailed(msg) => write!(f, "cannot determine branch: {msg}"),
            Self::CountFailed(msg) => write!(f, "cannot count commits: {msg}"),
            Self::Unparsable(out) => write!(f, "unexpected rev-list output: {out}"),
        }
    }
}

/// Result of checking a clone against its remote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Divergence {
    /// Counts for the current branch.
    Known {
        branch: String,
        counts: DivergenceCount,
    },
    /// Counts unavailable; `raw` holds `git status -uno` output instead.
    Unknown { reason: UnknownReason, raw: String },
}

impl fmt::Display for Divergence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Known { branch, counts } => write!(f, "{branch}: {counts}"),
            Self::Unknown { reason, raw } => {
                write!(f, "{reason}")?;
                let raw = raw.trim_end();
                if raw.is_empty() {
                    Ok(())
                } else {
                    write!(f, "\n{raw}")
                }
            }
        }
    }
}
