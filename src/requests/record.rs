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

//! On-disk form of request files.
//!
//! An artist request is a plain record. A lyrics request is a record header
//! followed by a `Lyrics:` marker line and the suggested lyrics verbatim:
//!
//! ```text
//! Artist: kdot
//! Song: DNA
//! Album: DAMN
//! Requester: fan1
//! Timestamp: 20261017094105123456789
//! Status: Pending
//! Lyrics:
//! I got loyalty, got royalty inside my DNA
//! ```
//!
//! Status rewrites only ever touch the header, so lyrics that happen to
//! contain a `Status: ` line survive a transition.

use std::path::Path;

use crate::{
    error::{PlatformError, Result},
    model::{ArtistRequest, LyricsEditRequest, RequestStatus},
    store,
};

pub(super) const LYRICS_MARKER: &str = "Lyrics:";

/// Album field value stored for singles.
const SINGLE_ALBUM: &str = "Single";

const STATUS_KEY: &str = "Status";

pub(super) fn format_artist_request(request: &ArtistRequest) -> Vec<String> {
    vec![
        store::format_field("Email", &request.email),
        store::format_field("Nickname", &request.nickname),
        store::format_field("Password", &request.password),
        store::format_field("Timestamp", &request.timestamp),
        store::format_field(STATUS_KEY, request.status),
    ]
}

pub(super) fn parse_artist_request(lines: &[String], path: &Path) -> Result<ArtistRequest> {
    Ok(ArtistRequest {
        email: store::require_field(lines, "Email", path)?.to_string(),
        nickname: store::require_field(lines, "Nickname", path)?.to_string(),
        password: store::require_field(lines, "Password", path)?.to_string(),
        timestamp: store::require_field(lines, "Timestamp", path)?.to_string(),
        status: parse_status(lines, path)?,
    })
}

pub(super) fn format_lyrics_request(request: &LyricsEditRequest) -> String {
    let header = [
        store::format_field("Artist", &request.artist),
        store::format_field("Song", &request.song),
        store::format_field("Album", request.album.as_deref().unwrap_or(SINGLE_ALBUM)),
        store::format_field("Requester", &request.requester),
        store::format_field("Timestamp", &request.timestamp),
        store::format_field(STATUS_KEY, request.status),
    ];
    join_lyrics_file(&header, &request.suggested_lyrics)
}

pub(super) fn parse_lyrics_request(text: &str, path: &Path) -> Result<LyricsEditRequest> {
    let (header, body) = split_lyrics_file(text, path)?;

    let album = match store::require_field(&header, "Album", path)? {
        SINGLE_ALBUM | "" => None,
        album => Some(album.to_string()),
    };

    Ok(LyricsEditRequest {
        artist: store::require_field(&header, "Artist", path)?.to_string(),
        song: store::require_field(&header, "Song", path)?.to_string(),
        album,
        suggested_lyrics: body.to_string(),
        requester: store::require_field(&header, "Requester", path)?.to_string(),
        timestamp: store::require_field(&header, "Timestamp", path)?.to_string(),
        status: parse_status(&header, path)?,
    })
}

/// Drops every header `Status: ` line and appends the new one.
pub(super) fn rewrite_status(lines: &[String], status: RequestStatus) -> Vec<String> {
    let status_prefix = format!("{STATUS_KEY}: ");
    let mut lines: Vec<String> = lines
        .iter()
        .filter(|l| !l.starts_with(&status_prefix))
        .cloned()
        .collect();
    lines.push(store::format_field(STATUS_KEY, status));
    lines
}

/// The lyrics-file counterpart of [`rewrite_status`].
pub(super) fn rewrite_lyrics_status(text: &str, status: RequestStatus, path: &Path) -> Result<String> {
    let (header, body) = split_lyrics_file(text, path)?;
    Ok(join_lyrics_file(&rewrite_status(&header, status), body))
}

fn parse_status(lines: &[String], path: &Path) -> Result<RequestStatus> {
    store::require_field(lines, STATUS_KEY, path)?
        .parse()
        .map_err(|e: String| PlatformError::corrupt(path, e))
}

fn split_lyrics_file<'a>(text: &'a str, path: &Path) -> Result<(Vec<String>, &'a str)> {
    let mut header = vec![];
    let mut offset = 0;

    for line in text.split_inclusive('\n') {
        offset += line.len();
        let line = line.trim_end_matches(['\n', '\r']);
        if line == LYRICS_MARKER {
            return Ok((header, &text[offset..]));
        }
        header.push(line.to_string());
    }

    Err(PlatformError::corrupt(path, "missing lyrics section"))
}

fn join_lyrics_file(header: &[String], body: &str) -> String {
    let mut text = header.join("\n");
    text.push('\n');
    text.push_str(LYRICS_MARKER);
    text.push('\n');
    text.push_str(body);
    text
}
