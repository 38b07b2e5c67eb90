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

//! Append-only comment and lyrics history logs.
//!
//! Comment lines are `text | user | timestamp`, history lines are
//! `timestamp | lyrics`. Field text is escaped so multi-line lyrics and
//! literal pipes survive a round trip.

use std::path::{Path, PathBuf};

use tracing::debug;

use super::{CatalogManager, SongRef};
use crate::{
    error::{PlatformError, Result},
    model::{Comment, HistoryEntry},
    store::{self, layout::SongFiles},
    util::display_timestamp,
};

/// What a comment is attached to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommentTarget {
    Song(SongRef),
    Album { artist: String, album: String },
}

impl CatalogManager {
    fn comments_file(&self, target: &CommentTarget) -> Result<PathBuf> {
        match target {
            CommentTarget::Song(song) => {
                let files = self.files(song);
                if !files.meta.is_file() {
                    return Err(PlatformError::not_found("song", &song.title));
                }
                Ok(files.comments)
            }
            CommentTarget::Album { artist, album } => {
                if !self.layout.album_file(artist, album).is_file() {
                    return Err(PlatformError::not_found("album", album));
                }
                Ok(self.layout.album_comments_file(artist, album))
            }
        }
    }

    /// Appends a comment from `user` and returns it.
    ///
    /// # Errors
    ///
    /// * [`PlatformError::Validation`] if the text is blank.
    /// * [`PlatformError::NotFound`] if the song or album does not exist.
    pub fn add_comment(&mut self, target: &CommentTarget, user: &str, text: &str) -> Result<Comment> {
        let text = text.trim();
        if text.is_empty() {
            return Err(PlatformError::validation("comment", "must not be empty"));
        }

        let path = self.comments_file(target)?;
        let comment = Comment {
            user: user.to_string(),
            text: text.to_string(),
            timestamp: display_timestamp(),
        };
        store::append_line(
            &path,
            &store::format_log_line(&[&comment.text, &comment.user, &comment.timestamp]),
        )?;

        debug!(path = %path.display(), user = %user, "comment added");
        Ok(comment)
    }

    /// Comments in the order they were written. No log means no comments.
    pub fn load_comments(&self, target: &CommentTarget) -> Result<Vec<Comment>> {
        let path = self.comments_file(target)?;
        read_log(&path, 3, |mut fields| Comment {
            timestamp: fields.remove(2),
            user: fields.remove(1),
            text: fields.remove(0),
        })
    }

    /// Every lyrics version ever saved for a song, oldest first.
    pub fn load_lyrics_history(&self, song: &SongRef) -> Result<Vec<HistoryEntry>> {
        let files = self.files(song);
        if !files.dir.is_dir() {
            return Err(PlatformError::not_found("song", &song.title));
        }
        read_log(&files.history, 2, |mut fields| HistoryEntry {
            lyrics: fields.remove(1),
            timestamp: fields.remove(0),
        })
    }

    pub(crate) fn append_history(&self, files: &SongFiles, lyrics: &str) -> Result<()> {
        store::append_line(
            &files.history,
            &store::format_log_line(&[&display_timestamp(), lyrics]),
        )
    }
}

fn read_log<T>(path: &Path, width: usize, parse: impl Fn(Vec<String>) -> T) -> Result<Vec<T>> {
    if !path.is_file() {
        return Ok(vec![]);
    }

    let text = store::read_text(path)?;
    let mut entries = vec![];
    for (n, line) in text.lines().enumerate().filter(|(_, l)| !l.trim().is_empty()) {
        let fields = store::split_log_line(line);
        if fields.len() != width {
            return Err(PlatformError::corrupt(
                path,
                format!("line {} has {} fields, expected {width}", n + 1, fields.len()),
            ));
        }
        entries.push(parse(fields));
    }

    Ok(entries)
}
