// Copyright (C) 2026  Caprica Software Limited
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Flat-file persistence layer.
//!
//! This module handles all interactions with the data directory. Every
//! persistent entity is a small text file made of `Key: Value` lines, and
//! append-only logs (comments, lyrics history) hold one pipe-delimited entry
//! per line.
//!
//! # Escaping
//!
//! Record files are never escaped. Log entries escape the backslash, the
//! pipe delimiter and line breaks so that free text cannot split an entry:
//!
//! | Raw | Stored |
//! | --- | ------ |
//! | `\` | `\\`   |
//! | `|` | `\|`   |
//! | LF  | `\n`   |
//! | CR  | `\r`   |
//!
//! # Sub-modules
//!
//! * [`layout`]: Canonical paths for every file the application owns.

pub mod layout;

use std::{
    fs::{self, OpenOptions},
    io::{self, Write},
    path::Path,
};

use tracing::{debug, warn};

use crate::error::{IoResultExt, PlatformError, Result};

pub(crate) const LOG_DELIMITER: char = '|';

/// Reads a record file into its lines.
///
/// # Errors
///
/// Returns [`PlatformError::NotFound`] if the file does not exist, or
/// [`PlatformError::Storage`] for any other I/O failure.
pub fn read_record(path: &Path) -> Result<Vec<String>> {
    match fs::read_to_string(path) {
        Ok(contents) => Ok(contents.lines().map(str::to_string).collect()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            Err(PlatformError::not_found("file", path.display().to_string()))
        }
        Err(e) => Err(PlatformError::storage(path, e)),
    }
}

/// Reads a file, logging and returning no lines if it cannot be read.
///
/// Used where a missing file simply means "nothing recorded yet".
pub fn read_file(path: &Path) -> Vec<String> {
    match read_record(path) {
        Ok(lines) => lines,
        Err(PlatformError::NotFound { .. }) => {
            debug!(path = %path.display(), "file not present, treating as empty");
            vec![]
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "unable to read file");
            vec![]
        }
    }
}

/// Returns the value of the first `Key: Value` line with the given key.
///
/// A bare `Key:` line yields an empty value.
pub fn extract_field<'a>(lines: &'a [String], key: &str) -> Option<&'a str> {
    lines.iter().find_map(|line| {
        let rest = line.strip_prefix(key)?.strip_prefix(':')?;
        Some(rest.strip_prefix(' ').unwrap_or(rest))
    })
}

/// Like [`extract_field`], but a missing key makes the record corrupt.
pub fn require_field<'a>(lines: &'a [String], key: &str, path: &Path) -> Result<&'a str> {
    extract_field(lines, key)
        .ok_or_else(|| PlatformError::corrupt(path, format!("missing field {key}")))
}

/// Parses a numeric field, treating unparsable values as corruption.
pub fn require_count(lines: &[String], key: &str, path: &Path) -> Result<u64> {
    let value = require_field(lines, key, path)?;
    value
        .trim()
        .parse()
        .map_err(|_| PlatformError::corrupt(path, format!("field {key} is not a count: {value}")))
}

pub fn format_field(key: &str, value: impl std::fmt::Display) -> String {
    format!("{key}: {value}")
}

/// Replaces the first line carrying `key`, or appends one if there is none.
pub fn set_field(lines: &mut Vec<String>, key: &str, value: &str) {
    let line = format_field(key, value);
    match lines
        .iter()
        .position(|l| l.strip_prefix(key).is_some_and(|r| r.starts_with(':')))
    {
        Some(idx) => lines[idx] = line,
        None => lines.push(line),
    }
}

/// Overwrites a file with the given lines, creating parent directories.
///
/// The contents are written to a sibling temporary file which is then renamed
/// over the target, so readers never see a half-written record.
pub fn write_record(path: &Path, lines: &[String]) -> Result<()> {
    ensure_parent(path)?;

    let mut contents = lines.join("\n");
    contents.push('\n');

    let tmp = path.with_extension("tmp");
    fs::write(&tmp, contents).at(&tmp)?;
    fs::rename(&tmp, path).at(path)
}

/// Writes free text verbatim (lyrics files are not line records).
pub fn write_text(path: &Path, text: &str) -> Result<()> {
    ensure_parent(path)?;
    fs::write(path, text).at(path)
}

pub fn read_text(path: &Path) -> Result<String> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(text),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            Err(PlatformError::not_found("file", path.display().to_string()))
        }
        Err(e) => Err(PlatformError::storage(path, e)),
    }
}

/// Appends a single line to a log or index file, creating it if needed.
pub fn append_line(path: &Path, line: &str) -> Result<()> {
    ensure_parent(path)?;

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .at(path)?;
    writeln!(file, "{line}").at(path)
}

pub fn ensure_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path).at(path)
}

fn ensure_parent(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) => ensure_dir(parent),
        None => Ok(()),
    }
}

/// Removes a directory tree.
///
/// # Errors
///
/// Returns [`PlatformError::NotFound`] if the directory does not exist.
pub fn remove_tree(path: &Path, entity: &'static str) -> Result<()> {
    if !path.is_dir() {
        return Err(PlatformError::not_found(entity, path.display().to_string()));
    }
    fs::remove_dir_all(path).at(path)
}

/// Moves a file or directory, creating the destination's parent first.
pub fn move_path(from: &Path, to: &Path) -> Result<()> {
    ensure_parent(to)?;
    fs::rename(from, to).at(from)
}

/// Lists the names of the immediate sub-directories of `path`, sorted.
///
/// A missing directory has no children.
pub fn child_dirs(path: &Path) -> Result<Vec<String>> {
    let entries = match fs::read_dir(path) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(vec![]),
        Err(e) => return Err(PlatformError::storage(path, e)),
    };

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.at(path)?;
        if entry.file_type().at(&entry.path())?.is_dir() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    names.sort();

    Ok(names)
}

/// Lists the names of the regular files directly inside `path`, sorted.
pub fn child_files(path: &Path) -> Result<Vec<String>> {
    let entries = match fs::read_dir(path) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(vec![]),
        Err(e) => return Err(PlatformError::storage(path, e)),
    };

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.at(path)?;
        if entry.file_type().at(&entry.path())?.is_file() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    names.sort();

    Ok(names)
}

pub fn escape_log_field(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            LOG_DELIMITER => escaped.push_str("\\|"),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            c => escaped.push(c),
        }
    }
    escaped
}

/// Joins fields into one log line, `a | b | c`.
pub fn format_log_line(fields: &[&str]) -> String {
    fields
        .iter()
        .map(|f| escape_log_field(f))
        .collect::<Vec<_>>()
        .join(" | ")
}

/// Splits a log line on unescaped pipes and unescapes each field.
///
/// The single space of padding on either side of each delimiter is removed.
pub fn split_log_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some('n') => current.push('\n'),
                Some('r') => current.push('\r'),
                Some(other) => current.push(other),
                None => current.push('\\'),
            },
            LOG_DELIMITER => fields.push(std::mem::take(&mut current)),
            c => current.push(c),
        }
    }
    fields.push(current);

    let last = fields.len() - 1;
    fields
        .into_iter()
        .enumerate()
        .map(|(i, mut field)| {
            if i > 0 && field.starts_with(' ') {
                field.remove(0);
            }
            if i < last && field.ends_with(' ') {
                field.pop();
            }
            field
        })
        .collect()
}
