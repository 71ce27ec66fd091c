// ghdesk: GitHub repository desk
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Commit message input.

use async_trait::async_trait;

/// Message proposed when asking for a commit message.
pub const DEFAULT_COMMIT_MESSAGE: &str = "Update";

/// Asks the user for a commit message.
#[async_trait]
pub trait CommitPrompt: Send {
    /// Returns the message, or `None` when the user cancels.
    async fn commit_message(&mut self, default: &str) -> Option<String>;
}

/// Answers with a fixed message, or the default when none was given.
#[derive(Debug, Clone, Default)]
pub struct FixedMessage(pub Option<String>);

#[async_trait]
impl CommitPrompt for FixedMessage {
    async fn commit_message(&mut self, default: &str) -> Option<String> {
        Some(self.0.clone().unwrap_or_else(|| default.to_string()))
    }
}
