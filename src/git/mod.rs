// ghdesk: GitHub repository desk
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Git operations module.
//!
//! ```text
//!              Session
//!                 |
//!                 v
//!        ,------------------,
//!        |  ops.rs (Git)    |  per-operation timeouts
//!        '--------+---------'
//!                 |
//!                 v
//!        cmd.rs  dyn GitRunner
//!           |             |
//!           v             v
//!       ShellGit      test doubles
//!   (git CLI, -C dir)
//!
//!   status.rs      porcelain  -> WorkingTreeEntry
//!   divergence.rs  rev-list   -> DivergenceCount
//! ```

pub mod cmd;
pub mod divergence;
pub mod ops;
pub mod status;
