// ghdesk: GitHub repository desk
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Activity log.
//!
//! ```text
//! ActivityLog::info/warning/error(msg)
//!     |                     |
//!     v                     v
//! Vec<ActivityEntry>    tracing (target ghdesk::activity)
//! [12:00:01] Loaded 12 repos.
//! ```

use chrono::{DateTime, Local};
use std::fmt;
use tracing::{error, info, warn};

/// Severity of an activity entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// One timestamped activity message.
#[derive(Debug, Clone)]
pub struct ActivityEntry {
    pub timestamp: DateTime<Local>,
    pub severity: Severity,
    pub message: String,
}

impl fmt::Display for ActivityEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let time = self.timestamp.format("%H:%M:%S");
        match self.severity {
            Severity::Info => write!(f, "[{time}] {}", self.message),
            Severity::Warning => write!(f, "[{time}] WARNING: {}", self.message),
            Severity::Error => write!(f, "[{time}] ERROR: {}", self.message),
        }
    }
}

/// Append-only list of activity messages.
#[derive(Debug, Default)]
pub struct ActivityLog {
    entries: Vec<ActivityEntry>,
}

impl ActivityLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, severity: Severity, message: impl Into<String>) {
        let message = message.into();
        match severity {
            Severity::Info => info!(target: "ghdesk::activity", "{message}"),
            Severity::Warning => warn!(target: "ghdesk::activity", "{message}"),
            Severity::Error => error!(target: "ghdesk::activity", "{message}"),
        }
        self.entries.push(ActivityEntry {
            timestamp: Local::now(),
            severity,
            message,
        });
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(Severity::Info, message);
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.push(Severity::Warning, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(Severity::Error, message);
    }

    /// Logs command output when it has any visible text.
    pub fn output(&mut self, output: &str) {
        let trimmed = output.trim_end();
        if !trimmed.trim().is_empty() {
            self.info(trimmed);
        }
    }

    #[must_use]
    pub fn entries(&self) -> &[ActivityEntry] {
        &self.entries
    }

    /// Entries appended after the first `start` ones.
    #[must_use]
    pub fn since(&self, start: usize) -> &[ActivityEntry] {
        self.entries.get(start..).unwrap_or_default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether any entry contains `needle`.
    #[must_use]
    pub fn contains(&self, needle: &str) -> bool {
        self.entries.iter().any(|e| e.message.contains(needle))
    }
}
