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

//! Catalog entities.
//!
//! Songs and albums carry a `dirty` flag that marks an in-memory change not
//! yet flushed to disk. Freshly constructed entities start dirty; entities
//! read from disk start clean.

use crate::{
    error::{PlatformError, Result},
    store::layout::sanitize,
};

/// Checks a song or album title before it becomes a path segment.
///
/// Album song lists are stored comma-joined, so commas are refused outright.
pub fn validate_title(title: &str) -> Result<()> {
    if title.trim().is_empty() {
        return Err(PlatformError::validation("title", "must not be empty"));
    }
    if title.contains(',') {
        return Err(PlatformError::validation("title", "must not contain a comma"));
    }
    if title.contains('\n') || title.contains('\r') {
        return Err(PlatformError::validation("title", "must be a single line"));
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Song {
    pub title: String,
    pub lyrics: String,
    pub release_date: String,
    pub likes: u64,
    pub views: u64,
    pub album_art_path: Option<String>,
    /// The album this song is a track of, `None` for a single.
    pub album: Option<String>,
    /// Owning artist nicknames, never empty. The first is the primary artist.
    artists: Vec<String>,
    dirty: bool,
}

impl Song {
    pub fn new(
        artists: Vec<String>,
        title: &str,
        album: Option<&str>,
        lyrics: &str,
        release_date: &str,
    ) -> Result<Self> {
        validate_title(title)?;
        if artists.is_empty() || artists.iter().any(|a| a.trim().is_empty()) {
            return Err(PlatformError::validation("artists", "a song needs at least one artist"));
        }

        Ok(Self {
            title: title.trim().to_string(),
            lyrics: lyrics.to_string(),
            release_date: release_date.trim().to_string(),
            likes: 0,
            views: 0,
            album_art_path: None,
            artists,
            album: album.map(str::to_string),
            dirty: true,
        })
    }

    /// Rebuilds a song read from disk; it starts clean.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn restore(
        artists: Vec<String>,
        title: String,
        album: Option<String>,
        lyrics: String,
        release_date: String,
        likes: u64,
        views: u64,
        album_art_path: Option<String>,
    ) -> Self {
        Self {
            title,
            lyrics,
            release_date,
            likes,
            views,
            album_art_path,
            artists,
            album,
            dirty: false,
        }
    }

    /// The sanitized title, used as the song's key within its container.
    pub fn key(&self) -> String {
        sanitize(&self.title)
    }

    pub fn artists(&self) -> &[String] {
        &self.artists
    }

    pub fn primary_artist(&self) -> &str {
        self.artists.first().map_or("", String::as_str)
    }

    pub fn set_lyrics(&mut self, lyrics: &str) {
        self.lyrics = lyrics.to_string();
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn mark_clean(&mut self) {
        self.dirty = false;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Album {
    pub title: String,
    pub artist: String,
    pub release_date: String,
    pub album_art_path: Option<String>,
    tracks: Vec<Song>,
    dirty: bool,
}

impl Album {
    pub fn new(artist: &str, title: &str, release_date: &str) -> Result<Self> {
        validate_title(title)?;
        Ok(Self {
            title: title.trim().to_string(),
            artist: artist.to_string(),
            release_date: release_date.trim().to_string(),
            album_art_path: None,
            tracks: vec![],
            dirty: true,
        })
    }

    pub(crate) fn restore(
        artist: String,
        title: String,
        release_date: String,
        album_art_path: Option<String>,
        tracks: Vec<Song>,
    ) -> Self {
        Self {
            title,
            artist,
            release_date,
            album_art_path,
            tracks,
            dirty: false,
        }
    }

    pub fn key(&self) -> String {
        sanitize(&self.title)
    }

    pub fn tracks(&self) -> &[Song] {
        &self.tracks
    }

    pub(crate) fn tracks_mut(&mut self) -> impl Iterator<Item = &mut Song> {
        self.tracks.iter_mut()
    }

    pub fn track(&self, title: &str) -> Option<&Song> {
        let key = sanitize(title);
        self.tracks.iter().find(|t| t.key() == key)
    }

    pub fn track_mut(&mut self, title: &str) -> Option<&mut Song> {
        let key = sanitize(title);
        self.tracks.iter_mut().find(|t| t.key() == key)
    }

    pub fn song_titles(&self) -> Vec<String> {
        self.tracks.iter().map(|t| t.title.clone()).collect()
    }

    /// Appends a track, refusing one whose key is already taken.
    pub fn add_track(&mut self, mut song: Song) -> Result<()> {
        if self.track(&song.title).is_some() {
            return Err(PlatformError::Conflict(format!(
                "track {} on album {}",
                song.title, self.title
            )));
        }
        song.album = Some(self.title.clone());
        song.mark_dirty();
        self.tracks.push(song);
        self.dirty = true;
        Ok(())
    }

    pub fn remove_track(&mut self, title: &str) -> Option<Song> {
        let key = sanitize(title);
        let idx = self.tracks.iter().position(|t| t.key() == key)?;
        self.dirty = true;
        Some(self.tracks.remove(idx))
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// Whether the album or any of its tracks has unsaved changes.
    pub fn has_pending_writes(&self) -> bool {
        self.dirty || self.tracks.iter().any(Song::is_dirty)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub user: String,
    pub text: String,
    pub timestamp: String,
}

/// One entry of a song's lyrics audit log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub timestamp: String,
    pub lyrics: String,
}
