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

//! Catalog-wide search and charts.
//!
//! A [`SearchIndex`] is a snapshot: it scans every artist's singles and
//! albums once when built and never looks at disk again. Build a new one to
//! see later catalog changes.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

use crate::{
    error::Result,
    store::{
        self,
        layout::{ALBUM_FILE, ALBUMS_DIR, Layout, SINGLES_DIR},
    },
    util::format::format_chart_row,
};

/// One scanned song.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SongEntry {
    pub title: String,
    pub artist: String,
    /// `None` for singles.
    pub album: Option<String>,
    pub views: u64,
    pub likes: u64,
    pub meta_path: PathBuf,
    pub release_date: String,
    pub album_art_path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlbumEntry {
    pub artist: String,
    pub title: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchResults {
    pub artists: Vec<String>,
    pub albums: Vec<AlbumEntry>,
    pub songs: Vec<SongEntry>,
}

impl SearchResults {
    pub fn is_empty(&self) -> bool {
        self.artists.is_empty() && self.albums.is_empty() && self.songs.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct SearchIndex {
    artists: Vec<String>,
    albums: Vec<AlbumEntry>,
    songs: Vec<SongEntry>,
}

impl SearchIndex {
    /// Scans the whole catalog under `layout`.
    ///
    /// Files that cannot be parsed are logged and skipped, so one corrupt
    /// song never hides the rest of the catalog.
    pub fn build(layout: &Layout) -> Self {
        let root = layout.artists_dir();
        let mut index = Self::default();

        for entry in WalkDir::new(&root)
            .min_depth(1)
            .max_depth(5)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            match entry.depth() {
                1 if entry.file_type().is_dir() => {
                    index.artists.push(file_name(entry.path()));
                }
                4 | 5 if entry.file_type().is_file() => index.scan_file(&root, &entry),
                _ => {}
            }
        }

        debug!(
            artists = index.artists.len(),
            albums = index.albums.len(),
            songs = index.songs.len(),
            "search index built"
        );
        index
    }

    fn scan_file(&mut self, root: &Path, entry: &DirEntry) {
        let path = entry.path();
        let Ok(relative) = path.strip_prefix(root) else {
            return;
        };
        let parts: Vec<String> = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();

        let result = match parts.as_slice() {
            [artist, kind, _, name] if kind == ALBUMS_DIR && name == ALBUM_FILE => {
                read_album(path, artist).map(|a| self.albums.push(a))
            }
            [artist, kind, song, name] if kind == SINGLES_DIR && is_meta_file(song, name) => {
                read_song(path, artist, None).map(|s| self.songs.push(s))
            }
            [artist, kind, album_dir, song, name] if kind == ALBUMS_DIR && is_meta_file(song, name) => {
                read_song(path, artist, Some(album_dir.as_str())).map(|s| self.songs.push(s))
            }
            _ => Ok(()),
        };

        if let Err(e) = result {
            warn!(path = %path.display(), error = %e, "skipping unreadable catalog file");
        }
    }

    pub fn songs(&self) -> &[SongEntry] {
        &self.songs
    }

    /// Case-insensitive substring search over artist names, album titles and
    /// song titles. A blank query matches nothing.
    pub fn search(&self, query: &str) -> SearchResults {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return SearchResults::default();
        }
        let matches = |s: &str| s.to_lowercase().contains(&needle);

        let mut artists: Vec<String> = self.artists.iter().filter(|a| matches(a)).cloned().collect();
        artists.dedup();

        let mut albums: Vec<AlbumEntry> = vec![];
        for album in self.albums.iter().filter(|a| matches(&a.title)) {
            if !albums.contains(album) {
                albums.push(album.clone());
            }
        }

        let songs = self.songs.iter().filter(|s| matches(&s.title)).cloned().collect();

        SearchResults { artists, albums, songs }
    }

    /// The `n` most viewed songs. Songs with equal views keep scan order.
    pub fn top_songs(&self, n: usize) -> Vec<&SongEntry> {
        let mut ranked: Vec<&SongEntry> = self.songs.iter().collect();
        ranked.sort_by(|a, b| b.views.cmp(&a.views));
        ranked.truncate(n);
        ranked
    }

    /// The chart as printable rows, most viewed first.
    pub fn chart_rows(&self, n: usize) -> Vec<String> {
        self.top_songs(n)
            .iter()
            .enumerate()
            .map(|(i, s)| format_chart_row(i + 1, &s.title, &s.artist, s.album.as_deref(), s.views))
            .collect()
    }
}

/// Song metadata files share their directory's name: `{song}/{song}.txt`.
fn is_meta_file(dir: &str, name: &str) -> bool {
    name.strip_suffix(".txt") == Some(dir)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn read_album(path: &Path, artist: &str) -> Result<AlbumEntry> {
    let lines = store::read_record(path)?;
    Ok(AlbumEntry {
        artist: artist.to_string(),
        title: store::require_field(&lines, "Title", path)?.to_string(),
    })
}

/// Reads a song's metadata. Tracks take their album title from the record,
/// falling back to the album directory name.
fn read_song(path: &Path, artist: &str, album_dir: Option<&str>) -> Result<SongEntry> {
    let lines = store::read_record(path)?;
    let album = album_dir.map(|dir| {
        store::extract_field(&lines, "Album")
            .filter(|a| !a.is_empty())
            .unwrap_or(dir)
            .to_string()
    });

    Ok(SongEntry {
        title: store::require_field(&lines, "Title", path)?.to_string(),
        artist: artist.to_string(),
        album,
        views: store::require_count(&lines, "Views", path)?,
        likes: store::require_count(&lines, "Likes", path)?,
        meta_path: path.to_path_buf(),
        release_date: store::require_field(&lines, "ReleaseDate", path)?.to_string(),
        album_art_path: store::extract_field(&lines, "AlbumArtPath")
            .filter(|p| !p.is_empty())
            .map(str::to_string),
    })
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;
    use crate::{catalog::CatalogManager, model::Song};

    fn song(artist: &str, title: &str, album: Option<&str>, views: u64) -> Song {
        Song::restore(
            vec![artist.to_string()],
            title.to_string(),
            album.map(str::to_string),
            String::new(),
            "2017".to_string(),
            0,
            views,
            None,
        )
    }

    fn seeded(dir: &TempDir, songs: &[Song]) -> Layout {
        let layout = Layout::new(dir.path());
        let mut manager = CatalogManager::new(layout.clone(), 1024);
        for s in songs {
            manager.save_song(s).unwrap();
        }
        layout
    }

    #[test]
    fn top_songs_is_a_stable_descending_sort() {
        let dir = TempDir::new().unwrap();
        let layout = seeded(
            &dir,
            &[
                song("kdot", "a", None, 500),
                song("kdot", "b", None, 10),
                song("kdot", "c", None, 10),
                song("kdot", "d", None, 300),
            ],
        );

        let index = SearchIndex::build(&layout);
        let views: Vec<u64> = index.top_songs(10).iter().map(|s| s.views).collect();
        assert_eq!(views, vec![500, 300, 10, 10]);

        let titles: Vec<&str> = index.top_songs(4).iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["a", "d", "b", "c"]);
        assert_eq!(index.top_songs(2).len(), 2);
        assert_eq!(index.chart_rows(1), vec!["  1. a - kdot 500 views"]);
    }

    #[test]
    fn search_matches_artists_albums_and_titles() {
        let dir = TempDir::new().unwrap();
        let layout = seeded(
            &dir,
            &[
                song("kdot", "DNA", Some("DAMN"), 1),
                song("kdot", "DAMN Remix", None, 1),
                song("sza", "Kill Bill", None, 1),
            ],
        );
        fs::write(
            layout.album_file("kdot", "DAMN"),
            "Title: DAMN\nArtist: kdot\nReleaseDate: 2017\nSongs: DNA\n",
        )
        .unwrap();

        let index = SearchIndex::build(&layout);
        let results = index.search("damn");
        assert_eq!(results.albums, vec![AlbumEntry { artist: "kdot".into(), title: "DAMN".into() }]);
        assert_eq!(results.songs.len(), 1);
        assert_eq!(results.songs[0].title, "DAMN Remix");
        assert!(results.artists.is_empty());

        assert_eq!(index.search("KDOT").artists, vec!["kdot"]);
        assert_eq!(index.search("dna").songs[0].album.as_deref(), Some("DAMN"));
        assert!(index.search("   ").is_empty());
    }

    #[test]
    fn corrupt_songs_are_skipped() {
        let dir = TempDir::new().unwrap();
        let layout = seeded(&dir, &[song("kdot", "DNA", None, 1)]);
        let bad = layout.song_files("kdot", "YAH", None);
        fs::create_dir_all(&bad.dir).unwrap();
        fs::write(&bad.meta, "Title: YAH\n").unwrap();

        let index = SearchIndex::build(&layout);
        assert_eq!(index.songs().len(), 1);
        assert_eq!(index.songs()[0].title, "DNA");
    }
}
