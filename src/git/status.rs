// ghdesk: GitHub repository desk
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Porcelain status parsing.
//!
//! ```text
//! "XY PATH"            " M src/lib.rs"         -> src/lib.rs
//! "XY ORIG -> NEW"     "R  old.txt -> new.txt" -> new.txt
//! "XY ORIG\tNEW"       "R  old.txt\tnew.txt"   -> new.txt
//! "XY \"QUOTED\""      "?? \"a\\tb\""          -> a<TAB>b
//!
//! ""                   -> [Clean]
//! "garbage"            -> [Unrecognized("garbage")]
//! ```

use std::fmt;

use crate::error::ActionError;

/// Text shown for a working tree without changes.
pub const CLEAN_LABEL: &str = "Working tree clean";

/// Status codes accepted in the two-character `XY` column.
const STATUS_CODES: &[char] = &[' ', 'M', 'T', 'A', 'D', 'R', 'C', 'U', '?', '!'];

/// One parsed `git status --porcelain` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    /// Index and work-tree status characters.
    pub code: [char; 2],
    /// Path the change applies to (the new path for renames and copies).
    pub path: String,
    /// Source path of a rename or copy.
    pub original_path: Option<String>,
    /// The line as git printed it.
    pub raw: String,
}

impl StatusLine {
    /// The `XY` column as a string.
    #[must_use]
    pub fn code_str(&self) -> String {
        self.code.iter().collect()
    }

    #[must_use]
    pub fn is_untracked(&self) -> bool {
        self.code == ['?', '?']
    }
}

/// One entry of the working-tree view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkingTreeEntry {
    /// No changes at all.
    Clean,
    /// A recognised status line.
    Change(StatusLine),
    /// A line that does not follow the porcelain grammar.
    Unrecognized(String),
}

impl WorkingTreeEntry {
    /// Path to hand to `git diff`.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::UnparsableEntry`] for the clean sentinel and for
    /// unrecognised lines.
    pub fn diff_path(&self) -> Result<&str, ActionError> {
        match self {
            Self::Change(line) => Ok(&line.path),
            Self::Clean => Err(ActionError::UnparsableEntry {
                entry: CLEAN_LABEL.to_string(),
                reason: "the working tree has no changes".to_string(),
            }),
            Self::Unrecognized(raw) => Err(ActionError::UnparsableEntry {
                entry: raw.clone(),
                reason: "not a porcelain status line".to_string(),
            }),
        }
    }
}

impl fmt::Display for WorkingTreeEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Clean => f.write_str(CLEAN_LABEL),
            Self::Change(line) => f.write_str(&line.raw),
            Self::Unrecognized(raw) => f.write_str(raw),
        }
    }
}

/// Parses full porcelain output into working-tree entries.
///
/// Output without any non-empty line yields exactly `[Clean]`.
#[must_use]
pub fn parse_porcelain(text: &str) -> Vec<WorkingTreeEntry> {
    let entries: Vec<_> = text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(parse_status_line)
        .collect();

    if entries.is_empty() {
        vec![WorkingTreeEntry::Clean]
    } else {
        entries
    }
}

/// Parses a single porcelain line.
#[must_use]
pub fn parse_status_line(line: &str) -> WorkingTreeEntry {
    parse_change(line).map_or_else(
        || WorkingTreeEntry::Unrecognized(line.to_string()),
        WorkingTreeEntry::Change,
    )
}

fn parse_change(raw: &str) -> Option<StatusLine> {
    let line = raw.trim_end_matches(['\r', '\n']);
    let mut chars = line.chars();
    let x = chars.next().filter(|c| STATUS_CODES.contains(c))?;
    let y = chars.next().filter(|c| STATUS_CODES.contains(c))?;
    if chars.next() != Some(' ') {
        return None;
    }
    // The first three characters are ASCII, so byte offset 3 is a boundary.
    let rest = &line[3..];

    let (original, path) = if let Some((orig, new)) = rest.split_once('\t') {
        (Some(orig), new)
    } else if matches!(x, 'R' | 'C') || matches!(y, 'R' | 'C') {
        match split_arrow(rest) {
            Some((orig, new)) => (Some(orig), new),
            None => (None, rest),
        }
    } else {
        (None, rest)
    };

    let path = clean_path(path)?;
    let original_path = match original {
        Some(orig) => Some(clean_path(orig)?),
        None => None,
    };

    Some(StatusLine {
        code: [x, y],
        path,
        original_path,
        raw: raw.to_string(),
    })
}

/// Splits `ORIG -> NEW`, honouring a quoted `ORIG` that may contain the arrow.
fn split_arrow(rest: &str) -> Option<(&str, &str)> {
    const ARROW: &str = " -> ";
    if rest.starts_with('"') {
        let end = closing_quote(rest)?;
        let (orig, tail) = rest.split_at(end + 1);
        tail.strip_prefix(ARROW).map(|new| (orig, new))
    } else {
        rest.split_once(ARROW)
    }
}

/// Byte index of the quote closing the string that starts at index 0.
fn closing_quote(s: &str) -> Option<usize> {
    let mut escaped = false;
    for (i, b) in s.bytes().enumerate().skip(1) {
        match b {
            _ if escaped => escaped = false,
            b'\\' => escaped = true,
            b'"' => return Some(i),
            _ => {}
        }
    }
    None
}

fn clean_path(path: &str) -> Option<String> {
    let trimmed = path.trim();
    let cleaned = if trimmed.len() >= 2 && trimmed.starts_with('"') && trimmed.ends_with('"') {
        unquote(&trimmed[1..trimmed.len() - 1])?
    } else {
        trimmed.to_string()
    };
    (!cleaned.is_empty()).then_some(cleaned)
}

/// Reverses git's C-style path quoting.
fn unquote(inner: &str) -> Option<String> {
    let bytes = inner.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if b != b'\\' {
            out.push(b);
            i += 1;
            continue;
        }
        let esc = *bytes.get(i + 1)?;
        match esc {
            b'\\' | b'"' => out.push(esc),
            b't' => out.push(b'\t'),
            b'n' => out.push(b'\n'),
            b'r' => out.push(b'\r'),
            b'a' => out.push(0x07),
            b'b' => out.push(0x08),
            b'f' => out.push(0x0c),
            b'v' => out.push(0x0b),
            b'0'..=b'7' => {
                let digits = bytes.get(i + 1..i + 4)?;
                if !digits.iter().all(|d| (b'0'..=b'7').contains(d)) {
                    return None;
                }
                let value = digits
                    .iter()
                    .fold(0u16, |acc, d| acc * 8 + u16::from(d - b'0'));
                out.push(u8::try_from(value).ok()?);
                i += 4;
                continue;
            }
            _ => return None,
        }
        i += 2;
    }
    Some(String::from_utf8_lossy(&out).into_owned())
}
