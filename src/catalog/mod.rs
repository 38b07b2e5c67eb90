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

//! Song and album persistence.
//!
//! This module owns every file under `artists/{nick}/singles` and
//! `artists/{nick}/albums`. A song directory holds four files:
//!
//! * `{song}.txt` - metadata record (title, artists, dates, counters).
//! * `{song}_lyrics.txt` - the current lyrics, verbatim.
//! * `{song}-comments.txt` - append-only comment log.
//! * `{song}-lyrics-history.txt` - append-only log of every lyrics save.
//!
//! An album directory holds `album.txt`, whose `Songs` field lists the track
//! titles comma-joined in order, plus one song directory per track.
//!
//! # Synchronisation
//!
//! Callers work on an [`ArtistCatalog`] in memory and hand it back to
//! [`CatalogManager::save_songs_and_albums_for_artist`], which deletes whatever
//! exists on disk but no longer in memory and then writes only the entries
//! whose dirty flag is set.

pub mod artist;
mod logs;

use std::{
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
};

use tracing::{debug, info, warn};

pub use artist::ArtistCatalog;
pub use logs::CommentTarget;

use crate::{
    error::{IoResultExt, PlatformError, Result},
    model::{Album, Artist, Song, validate_title},
    store::{
        self,
        layout::{ALBUM_ART_STEM, Layout, SongFiles, sanitize},
    },
};

/// Identifies one song on disk by its natural key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SongRef {
    pub artist: String,
    pub title: String,
    pub album: Option<String>,
}

impl SongRef {
    pub fn single(artist: &str, title: &str) -> Self {
        Self {
            artist: artist.to_string(),
            title: title.to_string(),
            album: None,
        }
    }

    pub fn track(artist: &str, album: &str, title: &str) -> Self {
        Self {
            artist: artist.to_string(),
            title: title.to_string(),
            album: Some(album.to_string()),
        }
    }

    pub fn of(song: &Song) -> Self {
        Self {
            artist: song.primary_artist().to_string(),
            title: song.title.clone(),
            album: song.album.clone(),
        }
    }

    pub fn album(&self) -> Option<&str> {
        self.album.as_deref()
    }
}

/// What a synchronisation pass changed on disk.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SyncReport {
    pub deleted: usize,
    pub written: usize,
}

impl SyncReport {
    pub fn is_noop(&self) -> bool {
        self.deleted == 0 && self.written == 0
    }
}

pub struct CatalogManager {
    layout: Layout,
    max_file_size: u64,
}

impl CatalogManager {
    pub fn new(layout: Layout, max_file_size: u64) -> Self {
        Self {
            layout,
            max_file_size,
        }
    }

    fn files(&self, song: &SongRef) -> SongFiles {
        self.layout.song_files(&song.artist, &song.title, song.album())
    }

    /// Whether both the metadata and lyrics files of a song exist.
    pub fn song_exists(&self, song: &SongRef) -> bool {
        let files = self.files(song);
        files.meta.is_file() && files.lyrics.is_file()
    }

    /// Writes a song's metadata record and lyrics file, and appends the
    /// lyrics to its history log.
    ///
    /// Every call appends to the history, it is never compacted. Counters
    /// only grow: when the record already holds higher `Likes` or `Views`
    /// (bumped by [`record_view`](Self::record_view) since the song was
    /// loaded) those are kept.
    pub fn save_song(&mut self, song: &Song) -> Result<()> {
        validate_title(&song.title)?;

        let files = self.files(&SongRef::of(song));
        store::ensure_dir(&files.dir)?;
        let (likes, views) = stored_counters(&files.meta)?;
        write_song_metadata(song, likes.max(song.likes), views.max(song.views), &files.meta)?;
        store::write_text(&files.lyrics, &song.lyrics)?;
        self.append_history(&files, &song.lyrics)?;

        debug!(artist = %song.primary_artist(), title = %song.title, "song saved");
        Ok(())
    }

    /// Writes `album.txt`.
    ///
    /// Track titles are stored comma-joined, which is why titles may not
    /// contain commas.
    pub fn save_album(&mut self, album: &Album) -> Result<()> {
        validate_title(&album.title)?;

        let path = self.layout.album_file(&album.artist, &album.title);
        let mut lines = vec![
            store::format_field("Title", &album.title),
            store::format_field("Artist", &album.artist),
            store::format_field("ReleaseDate", &album.release_date),
            store::format_field("Songs", album.song_titles().join(",")),
        ];
        if let Some(art) = &album.album_art_path {
            lines.push(store::format_field("AlbumArtPath", art));
        }
        store::write_record(&path, &lines)?;

        debug!(artist = %album.artist, title = %album.title, "album saved");
        Ok(())
    }

    /// Reads every single and album of `artist` from disk.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::CorruptData`] if any metadata record is
    /// missing a required field; the whole load fails.
    pub fn load_songs_and_albums_for_artist(&self, artist: &Artist) -> Result<ArtistCatalog> {
        let nickname = &artist.credentials.nickname;
        let mut catalog = ArtistCatalog::new(artist);

        let singles_dir = self.layout.singles_dir(nickname);
        for key in store::child_dirs(&singles_dir)? {
            let song = self.read_song_dir(nickname, &singles_dir.join(&key), &key, None)?;
            catalog.singles.insert(key, song);
        }

        let albums_dir = self.layout.albums_dir(nickname);
        for key in store::child_dirs(&albums_dir)? {
            let album = self.read_album_dir(nickname, &albums_dir.join(&key), &key)?;
            catalog.albums.insert(key, album);
        }

        debug!(
            artist = %nickname,
            singles = catalog.singles.len(),
            albums = catalog.albums.len(),
            "catalog loaded"
        );
        Ok(catalog)
    }

    /// Synchronises disk with the in-memory catalog.
    ///
    /// Directories with no in-memory counterpart are deleted first, then only
    /// dirty songs and albums are written. With nothing dirty and nothing
    /// removed this performs no writes at all.
    pub fn save_songs_and_albums_for_artist(&mut self, catalog: &mut ArtistCatalog) -> Result<SyncReport> {
        let artist = catalog.artist().to_string();
        let mut report = SyncReport::default();

        let singles_dir = self.layout.singles_dir(&artist);
        for key in store::child_dirs(&singles_dir)? {
            if !catalog.singles.contains_key(&key) {
                let dir = singles_dir.join(&key);
                fs::remove_dir_all(&dir).at(&dir)?;
                info!(artist = %artist, single = %key, "removed single no longer in catalog");
                report.deleted += 1;
            }
        }

        let albums_dir = self.layout.albums_dir(&artist);
        for key in store::child_dirs(&albums_dir)? {
            let dir = albums_dir.join(&key);
            let Some(album) = catalog.albums.get(&key) else {
                fs::remove_dir_all(&dir).at(&dir)?;
                info!(artist = %artist, album = %key, "removed album no longer in catalog");
                report.deleted += 1;
                continue;
            };

            let keep: HashSet<String> = album.tracks().iter().map(Song::key).collect();
            for track_key in store::child_dirs(&dir)? {
                if !keep.contains(&track_key) {
                    let track_dir = dir.join(&track_key);
                    fs::remove_dir_all(&track_dir).at(&track_dir)?;
                    info!(artist = %artist, album = %key, track = %track_key, "removed track no longer in album");
                    report.deleted += 1;
                }
            }
        }

        // An entity turns clean only once its own write succeeded, so a
        // failed pass can be retried.
        for song in catalog.singles.values_mut().filter(|s| s.is_dirty()) {
            self.save_song(song)?;
            song.mark_clean();
            report.written += 1;
        }

        for album in catalog.albums.values_mut() {
            if album.is_dirty() {
                self.save_album(album)?;
                album.mark_clean();
                report.written += 1;
            }
            for track in album.tracks_mut().filter(|t| t.is_dirty()) {
                self.save_song(track)?;
                track.mark_clean();
                report.written += 1;
            }
        }

        if !report.is_noop() {
            info!(artist = %artist, deleted = report.deleted, written = report.written, "catalog synchronised");
        }
        Ok(report)
    }

    /// Deletes a single or an album track, on disk and in memory.
    ///
    /// For a track, the parent album's song list is rewritten without it.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::NotFound`] if the song directory is missing.
    pub fn delete_song(&mut self, catalog: &mut ArtistCatalog, title: &str, album: Option<&str>) -> Result<()> {
        let artist = catalog.artist().to_string();
        let dir = self.layout.song_dir(&artist, title, album);
        // A track's art is normally the album cover, which stays with the album.
        let art = catalog
            .song(title, album)
            .and_then(|s| s.album_art_path.clone())
            .filter(|art| album.is_none() || Path::new(art).starts_with(&dir));

        store::remove_tree(&dir, "song")?;
        if let Some(art) = art {
            self.remove_art_file(Path::new(&art))?;
        }

        match album {
            Some(album_title) => {
                let key = sanitize(title);
                let album_file = self.layout.album_file(&artist, album_title);
                if album_file.is_file() {
                    let mut lines = store::read_record(&album_file)?;
                    let remaining: Vec<String> = split_titles(store::extract_field(&lines, "Songs").unwrap_or(""))
                        .into_iter()
                        .filter(|t| sanitize(t) != key)
                        .collect();
                    store::set_field(&mut lines, "Songs", &remaining.join(","));
                    store::write_record(&album_file, &lines)?;
                }

                if let Some(album) = catalog.album_mut(album_title) {
                    let was_dirty = album.is_dirty();
                    album.remove_track(title);
                    if !was_dirty {
                        album.mark_clean();
                    }
                }
            }
            None => {
                catalog.remove_single(title);
            }
        }

        info!(artist = %artist, title = %title, album = ?album, "song deleted");
        Ok(())
    }

    /// Deletes an album with all its tracks, on disk and in memory.
    pub fn delete_album(&mut self, catalog: &mut ArtistCatalog, title: &str) -> Result<()> {
        let artist = catalog.artist().to_string();
        let dir = self.layout.album_dir(&artist, title);
        let art = catalog.album(title).and_then(|a| a.album_art_path.clone());

        store::remove_tree(&dir, "album")?;
        if let Some(art) = art {
            self.remove_art_file(Path::new(&art))?;
        }
        catalog.remove_album(title);

        info!(artist = %artist, album = %title, "album deleted");
        Ok(())
    }

    /// Renames a single or track, moving its directory and files.
    pub fn rename_song(
        &mut self,
        catalog: &mut ArtistCatalog,
        album: Option<&str>,
        old: &str,
        new: &str,
    ) -> Result<()> {
        validate_title(new)?;
        let new = new.trim();
        let artist = catalog.artist().to_string();
        let old_key = sanitize(old);
        let new_key = sanitize(new);

        if catalog.song(old, album).is_none() {
            return Err(PlatformError::not_found("song", old));
        }
        if old_key != new_key && catalog.song(new, album).is_some() {
            return Err(PlatformError::Conflict(format!("song {new}")));
        }

        let old_dir = self.layout.song_dir(&artist, old, album);
        let new_dir = self.layout.song_dir(&artist, new, album);
        let on_disk = old_dir.is_dir();

        if on_disk && old_key != new_key {
            if new_dir.exists() {
                return Err(PlatformError::Conflict(format!("song directory {}", new_dir.display())));
            }
            store::move_path(&old_dir, &new_dir)?;
        }
        if on_disk {
            for (from, to) in SongFiles::in_dir(new_dir.clone(), old).renamed_to(new) {
                if from != to && from.exists() {
                    fs::rename(&from, &to).at(&from)?;
                }
            }
        }

        let retitle = |song: &mut Song| {
            song.title = new.to_string();
            if let Some(art) = &song.album_art_path {
                song.album_art_path = Some(rebase(art, &old_dir, &new_dir));
            }
        };

        let renamed = match album {
            None => {
                let mut song = catalog
                    .singles
                    .remove(&old_key)
                    .ok_or_else(|| PlatformError::not_found("song", old))?;
                retitle(&mut song);
                catalog.singles.insert(new_key.clone(), song.clone());
                song
            }
            Some(album_title) => {
                let album = catalog
                    .album_mut(album_title)
                    .ok_or_else(|| PlatformError::not_found("album", album_title))?;
                let song = album
                    .track_mut(old)
                    .ok_or_else(|| PlatformError::not_found("song", old))?;
                retitle(song);
                let song = song.clone();

                let album_file = self.layout.album_file(&artist, album_title);
                if album_file.is_file() {
                    rewrite_fields(&album_file, &[("Songs", album.song_titles().join(","))])?;
                }
                song
            }
        };

        if on_disk {
            let meta = SongFiles::in_dir(new_dir, new).meta;
            let mut fields = vec![("Title", renamed.title.clone())];
            if let Some(art) = &renamed.album_art_path {
                fields.push(("AlbumArtPath", art.clone()));
            }
            rewrite_fields(&meta, &fields)?;
        }

        info!(artist = %artist, old = %old, new = %new, album = ?album, "song renamed");
        Ok(())
    }

    /// Renames an album, moving its directory and updating every track.
    pub fn rename_album(&mut self, catalog: &mut ArtistCatalog, old: &str, new: &str) -> Result<()> {
        validate_title(new)?;
        let new = new.trim();
        let artist = catalog.artist().to_string();
        let old_key = sanitize(old);
        let new_key = sanitize(new);

        if catalog.album(old).is_none() {
            return Err(PlatformError::not_found("album", old));
        }
        if old_key != new_key && catalog.album(new).is_some() {
            return Err(PlatformError::Conflict(format!("album {new}")));
        }

        let old_dir = self.layout.album_dir(&artist, old);
        let new_dir = self.layout.album_dir(&artist, new);
        let on_disk = old_dir.is_dir();

        if on_disk && old_key != new_key {
            if new_dir.exists() {
                return Err(PlatformError::Conflict(format!("album directory {}", new_dir.display())));
            }
            store::move_path(&old_dir, &new_dir)?;
        }

        let mut album = catalog
            .albums
            .remove(&old_key)
            .ok_or_else(|| PlatformError::not_found("album", old))?;
        album.title = new.to_string();
        if let Some(art) = &album.album_art_path {
            album.album_art_path = Some(rebase(art, &old_dir, &new_dir));
        }
        for track in album.tracks_mut() {
            track.album = Some(new.to_string());
            if let Some(art) = &track.album_art_path {
                track.album_art_path = Some(rebase(art, &old_dir, &new_dir));
            }
        }

        if on_disk {
            let album_file = self.layout.album_file(&artist, new);
            if album_file.is_file() {
                let mut fields = vec![("Title", album.title.clone())];
                if let Some(art) = &album.album_art_path {
                    fields.push(("AlbumArtPath", art.clone()));
                }
                rewrite_fields(&album_file, &fields)?;
            }

            for track in album.tracks() {
                let meta = self.files(&SongRef::of(track)).meta;
                if meta.is_file() {
                    let mut fields = vec![("Album", album.title.clone())];
                    if let Some(art) = &track.album_art_path {
                        fields.push(("AlbumArtPath", art.clone()));
                    }
                    rewrite_fields(&meta, &fields)?;
                }
            }
        }

        catalog.albums.insert(new_key, album);

        info!(artist = %artist, old = %old, new = %new, "album renamed");
        Ok(())
    }

    /// Copies an image into the album directory as `album_art.<ext>` and
    /// records its path on the album and its tracks.
    ///
    /// # Errors
    ///
    /// * [`PlatformError::NotFound`] if the album or the image is missing.
    /// * [`PlatformError::Validation`] if the image exceeds the configured
    ///   size limit or has no extension.
    pub fn save_album_art(&mut self, catalog: &mut ArtistCatalog, album_title: &str, image: &Path) -> Result<PathBuf> {
        let artist = catalog.artist().to_string();
        if catalog.album(album_title).is_none() {
            return Err(PlatformError::not_found("album", album_title));
        }

        let dest = self.copy_art(image, &self.layout.album_dir(&artist, album_title))?;
        let dest_str = dest.display().to_string();

        let album_file = self.layout.album_file(&artist, album_title);
        let album = catalog
            .album_mut(album_title)
            .ok_or_else(|| PlatformError::not_found("album", album_title))?;

        album.album_art_path = Some(dest_str.clone());
        if album_file.is_file() {
            rewrite_fields(&album_file, &[("AlbumArtPath", dest_str.clone())])?;
        } else {
            album.mark_dirty();
        }

        for track in album.tracks_mut() {
            track.album_art_path = Some(dest_str.clone());
            let meta = self.files(&SongRef::of(track)).meta;
            if meta.is_file() {
                rewrite_fields(&meta, &[("AlbumArtPath", dest_str.clone())])?;
            }
        }

        info!(artist = %artist, album = %album_title, path = %dest.display(), "album art saved");
        Ok(dest)
    }

    /// The single-song counterpart of [`save_album_art`](Self::save_album_art).
    pub fn save_single_art(&mut self, catalog: &mut ArtistCatalog, title: &str, image: &Path) -> Result<PathBuf> {
        let artist = catalog.artist().to_string();
        if catalog.single(title).is_none() {
            return Err(PlatformError::not_found("song", title));
        }

        let files = self.layout.song_files(&artist, title, None);
        let dest = self.copy_art(image, &files.dir)?;
        let dest_str = dest.display().to_string();

        let song = catalog
            .single_mut(title)
            .ok_or_else(|| PlatformError::not_found("song", title))?;
        song.album_art_path = Some(dest_str.clone());
        if files.meta.is_file() {
            rewrite_fields(&files.meta, &[("AlbumArtPath", dest_str)])?;
        } else {
            song.mark_dirty();
        }

        Ok(dest)
    }

    /// Increments a song's view counter on disk and returns the new value.
    pub fn record_view(&mut self, song: &SongRef) -> Result<u64> {
        self.bump_counter(song, "Views")
    }

    /// Increments a song's like counter on disk and returns the new value.
    pub fn record_like(&mut self, song: &SongRef) -> Result<u64> {
        self.bump_counter(song, "Likes")
    }

    fn bump_counter(&mut self, song: &SongRef, key: &str) -> Result<u64> {
        let meta = self.files(song).meta;
        if !meta.is_file() {
            return Err(PlatformError::not_found("song", &song.title));
        }

        let mut lines = store::read_record(&meta)?;
        let value = store::require_count(&lines, key, &meta)?.saturating_add(1);
        store::set_field(&mut lines, key, &value.to_string());
        store::write_record(&meta, &lines)?;

        Ok(value)
    }

    /// The current lyrics of a song.
    pub fn load_lyrics(&self, song: &SongRef) -> Result<String> {
        store::read_text(&self.files(song).lyrics)
    }

    /// Replaces a song's lyrics file and records the change in its history.
    pub fn overwrite_lyrics(&mut self, song: &SongRef, lyrics: &str) -> Result<()> {
        let files = self.files(song);
        if !files.meta.is_file() {
            return Err(PlatformError::not_found("song", &song.title));
        }
        store::write_text(&files.lyrics, lyrics)?;
        self.append_history(&files, lyrics)?;

        info!(artist = %song.artist, title = %song.title, "lyrics overwritten");
        Ok(())
    }

    fn read_song_dir(&self, artist: &str, dir: &Path, key: &str, album: Option<&str>) -> Result<Song> {
        let files = SongFiles::in_dir(dir.to_path_buf(), key);
        let lines = match store::read_record(&files.meta) {
            Ok(lines) => lines,
            Err(PlatformError::NotFound { .. }) => {
                return Err(PlatformError::corrupt(dir, "song directory has no metadata file"));
            }
            Err(e) => return Err(e),
        };
        let path = files.meta.as_path();

        let title = store::require_field(&lines, "Title", path)?.to_string();
        if sanitize(&title) != key {
            return Err(PlatformError::corrupt(path, format!("title {title} does not match its directory")));
        }

        let artists = split_titles(store::require_field(&lines, "Artists", path)?);
        if artists.is_empty() {
            return Err(PlatformError::corrupt(path, "song has no artists"));
        }
        if !artists.iter().any(|a| a == artist) {
            warn!(path = %path.display(), artist = %artist, "song does not list its owning artist");
        }

        let release_date = store::require_field(&lines, "ReleaseDate", path)?.to_string();
        let likes = store::require_count(&lines, "Likes", path)?;
        let views = store::require_count(&lines, "Views", path)?;
        let album_art_path = store::extract_field(&lines, "AlbumArtPath")
            .filter(|p| !p.is_empty())
            .map(str::to_string);

        let lyrics = match store::read_text(&files.lyrics) {
            Ok(lyrics) => lyrics,
            Err(PlatformError::NotFound { .. }) => {
                warn!(path = %files.lyrics.display(), "lyrics file missing, loading empty lyrics");
                String::new()
            }
            Err(e) => return Err(e),
        };

        Ok(Song::restore(
            artists,
            title,
            album.map(str::to_string),
            lyrics,
            release_date,
            likes,
            views,
            album_art_path,
        ))
    }

    fn read_album_dir(&self, artist: &str, dir: &Path, key: &str) -> Result<Album> {
        let path = dir.join(store::layout::ALBUM_FILE);
        let lines = match store::read_record(&path) {
            Ok(lines) => lines,
            Err(PlatformError::NotFound { .. }) => {
                return Err(PlatformError::corrupt(dir, "album directory has no album.txt"));
            }
            Err(e) => return Err(e),
        };

        let title = store::require_field(&lines, "Title", &path)?.to_string();
        if sanitize(&title) != key {
            return Err(PlatformError::corrupt(&path, format!("title {title} does not match its directory")));
        }
        let release_date = store::require_field(&lines, "ReleaseDate", &path)?.to_string();
        let listed = split_titles(store::require_field(&lines, "Songs", &path)?);
        let album_art_path = store::extract_field(&lines, "AlbumArtPath")
            .filter(|p| !p.is_empty())
            .map(str::to_string);

        let mut tracks = Vec::with_capacity(listed.len());
        let mut seen = HashSet::new();
        for song_title in &listed {
            let song_key = sanitize(song_title);
            let song_dir = dir.join(&song_key);
            if !song_dir.is_dir() {
                warn!(album = %title, song = %song_title, "listed track has no directory, skipping");
                continue;
            }
            if seen.insert(song_key.clone()) {
                tracks.push(self.read_song_dir(artist, &song_dir, &song_key, Some(&title))?);
            }
        }

        for song_key in store::child_dirs(dir)? {
            if !seen.contains(&song_key) {
                warn!(album = %title, track = %song_key, "track directory not listed in album.txt");
                tracks.push(self.read_song_dir(artist, &dir.join(&song_key), &song_key, Some(&title))?);
                seen.insert(song_key);
            }
        }

        Ok(Album::restore(
            artist.to_string(),
            title,
            release_date,
            album_art_path,
            tracks,
        ))
    }

    fn copy_art(&self, image: &Path, dir: &Path) -> Result<PathBuf> {
        if !image.is_file() {
            return Err(PlatformError::not_found("image", image.display().to_string()));
        }

        let size = fs::metadata(image).at(image)?.len();
        if size > self.max_file_size {
            return Err(PlatformError::validation(
                "image",
                format!("{size} bytes exceeds the {} byte limit", self.max_file_size),
            ));
        }

        let ext = image
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .filter(|e| !e.is_empty())
            .ok_or_else(|| PlatformError::validation("image", "file has no extension"))?;

        store::ensure_dir(dir)?;
        let stem = format!("{ALBUM_ART_STEM}.");
        for name in store::child_files(dir)? {
            if name.starts_with(&stem) {
                let old = dir.join(&name);
                fs::remove_file(&old).at(&old)?;
            }
        }

        let dest = dir.join(format!("{ALBUM_ART_STEM}.{ext}"));
        fs::copy(image, &dest).at(&dest)?;
        Ok(dest)
    }

    /// Removes an art file left behind outside a deleted directory.
    ///
    /// Only files inside the data root are touched.
    fn remove_art_file(&self, path: &Path) -> Result<()> {
        if !path.is_file() {
            return Ok(());
        }
        if !path.starts_with(self.layout.root()) {
            debug!(path = %path.display(), "art file outside data root left in place");
            return Ok(());
        }
        fs::remove_file(path).at(path)
    }
}

fn write_song_metadata(song: &Song, likes: u64, views: u64, path: &Path) -> Result<()> {
    let mut lines = vec![
        store::format_field("Title", &song.title),
        store::format_field("Artists", song.artists().join(",")),
    ];
    if let Some(album) = &song.album {
        lines.push(store::format_field("Album", album));
    }
    lines.push(store::format_field("ReleaseDate", &song.release_date));
    lines.push(store::format_field("Likes", likes));
    lines.push(store::format_field("Views", views));
    if let Some(art) = &song.album_art_path {
        lines.push(store::format_field("AlbumArtPath", art));
    }

    store::write_record(path, &lines)
}

/// The `Likes` and `Views` already on disk, zero when there is no record.
fn stored_counters(meta: &Path) -> Result<(u64, u64)> {
    if !meta.is_file() {
        return Ok((0, 0));
    }
    let lines = store::read_record(meta)?;
    let count = |key: &str| {
        store::extract_field(&lines, key)
            .and_then(|v| v.trim().parse::<u64>().ok())
            .unwrap_or(0)
    };
    Ok((count("Likes"), count("Views")))
}

fn rewrite_fields(path: &Path, fields: &[(&str, String)]) -> Result<()> {
    let mut lines = store::read_record(path)?;
    for (key, value) in fields {
        store::set_field(&mut lines, key, value);
    }
    store::write_record(path, &lines)
}

fn split_titles(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

fn rebase(path: &str, from: &Path, to: &Path) -> String {
    match Path::new(path).strip_prefix(from) {
        Ok(rest) => to.join(rest).display().to_string(),
        Err(_) => path.to_string(),
    }
}
