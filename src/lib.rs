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

//! # Lyricist.
//!
//! The storage and workflow engine of a lyrics platform. Accounts, songs,
//! albums, comments and moderation requests are all kept as small text files
//! under one data directory; there is no database.
//!
//! ## Architecture
//!
//! * [`store`] reads and writes the text records and resolves every path.
//! * [`accounts`] registers users and artists and checks logins.
//! * [`catalog`] persists songs and albums, saving only what changed.
//! * [`requests`] moves artist signups and lyrics edits through moderation.
//! * [`search`] scans the catalog once for search and charts.
//! * [`tasks`] is the command surface a front end drives, with the
//!   [`session`] holding who is logged in.

pub mod accounts;
pub mod catalog;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod requests;
pub mod search;
pub mod session;
pub mod store;
pub mod tasks;
mod util;

pub use config::AppConfig;
pub use error::{PlatformError, Result};
pub use tasks::{AppEvent, AppTask, Platform};
