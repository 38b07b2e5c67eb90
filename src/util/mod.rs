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

//! Common utilities and helper functions.
//!
//! This module provides shared logic used across the application to handle
//! data transformation and environment interactions.
//!
//! # Sub-modules
//!
//! * [`format`]: Logic for converting raw data into human-readable strings for
//!   log output and list views.

pub(crate) mod format;

use chrono::Local;

/// The current local time as stored in comment and history logs.
///
/// # Examples
///
/// ```ignore
/// let ts = display_timestamp(); // "2026-10-17 09:41:05"
/// ```
pub(crate) fn display_timestamp() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

/// The current local time in a form usable inside a file name.
///
/// Nanosecond precision keeps two requests against the same song apart.
pub(crate) fn file_timestamp() -> String {
    Local::now().format("%Y%m%d%H%M%S%9f").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_timestamp_is_path_safe() {
        let ts = file_timestamp();
        assert_eq!(ts.len(), 23);
        assert!(ts.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn display_timestamp_has_date_and_time() {
        let ts = display_timestamp();
        assert_eq!(ts.len(), 19);
        assert_eq!(&ts[4..5], "-");
        assert_eq!(&ts[10..11], " ");
    }
}
