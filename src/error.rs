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

//! Error taxonomy shared by every store in the crate.
//!
//! * **Validation**, **Conflict** and **NotFound** are recoverable, the caller
//!   is expected to re-prompt or show a message.
//! * **CorruptData** is fatal to the single load that hit it.
//! * **Storage** wraps an underlying I/O failure together with the path that
//!   caused it. Nothing in the crate retries.

use std::{
    io,
    path::{Path, PathBuf},
};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("invalid {field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    #[error("{0} already exists")]
    Conflict(String),

    #[error("{entity} not found: {key}")]
    NotFound { entity: &'static str, key: String },

    #[error("corrupt data in {}: {reason}", path.display())]
    CorruptData { path: PathBuf, reason: String },

    #[error("storage error at {}: {source}", path.display())]
    Storage {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid username or password")]
    InvalidCredentials,

    #[error("artist {0} has not been approved yet")]
    NotApproved(String),

    #[error("not permitted: {0}")]
    Forbidden(String),
}

pub type Result<T> = std::result::Result<T, PlatformError>;

impl PlatformError {
    pub(crate) fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    pub(crate) fn not_found(entity: &'static str, key: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            key: key.into(),
        }
    }

    pub(crate) fn corrupt(path: &Path, reason: impl Into<String>) -> Self {
        Self::CorruptData {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }

    pub(crate) fn storage(path: &Path, source: io::Error) -> Self {
        Self::Storage {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Whether the caller can recover by correcting its input.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::CorruptData { .. } | Self::Storage { .. })
    }
}

/// Attaches the offending path to a raw I/O result.
pub(crate) trait IoResultExt<T> {
    fn at(self, path: &Path) -> Result<T>;
}

impl<T> IoResultExt<T> for io::Result<T> {
    fn at(self, path: &Path) -> Result<T> {
        self.map_err(|e| PlatformError::storage(path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_error_names_the_path() {
        let err: Result<()> = Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"))
            .at(Path::new("/data/users/index_users.txt"));
        let message = err.unwrap_err().to_string();
        assert!(message.contains("/data/users/index_users.txt"));
        assert!(message.contains("denied"));
    }

    #[test]
    fn corrupt_and_storage_are_not_recoverable() {
        assert!(!PlatformError::corrupt(Path::new("x"), "missing Title").is_recoverable());
        assert!(PlatformError::not_found("song", "HUMBLE").is_recoverable());
        assert!(PlatformError::Conflict("nickname kdot".into()).is_recoverable());
    }
}
