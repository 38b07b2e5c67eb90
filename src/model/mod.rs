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

//! Domain models and core data structures.
//!
//! This module defines the central entities of the platform: accounts for the
//! three roles, the songs and albums that make up an artist's catalog, and the
//! signup and lyrics-edit requests moderated by admins.

mod account;
mod catalog;
mod lyrics;
mod request;

pub use account::{Account, Admin, Artist, Credentials, Role, User};
pub use catalog::{Album, Comment, HistoryEntry, Song, validate_title};
pub use lyrics::Lyrics;
pub use request::{ArtistRequest, LyricsEditRequest, LyricsRequestBuckets, RequestStatus};
