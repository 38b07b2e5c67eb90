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

//! Shared fixtures: every store rooted in one throw-away data directory.

#![allow(dead_code)]

use std::fs;

use lyricist::{
    accounts::AccountStore, catalog::CatalogManager, requests::RequestEngine, store::layout::Layout,
};
use tempfile::TempDir;

pub const MAX_FILE_SIZE: u64 = 64 * 1024;

pub struct TestData {
    pub dir: TempDir,
    pub layout: Layout,
    pub accounts: AccountStore,
    pub catalog: CatalogManager,
    pub requests: RequestEngine,
}

impl TestData {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let layout = Layout::new(dir.path());
        Self {
            accounts: AccountStore::new(layout.clone()),
            catalog: CatalogManager::new(layout.clone(), MAX_FILE_SIZE),
            requests: RequestEngine::new(layout.clone()),
            layout,
            dir,
        }
    }

    /// Writes a single's metadata and lyrics directly, as another process
    /// would have left them.
    pub fn write_single(&self, artist: &str, title: &str, views: u64) {
        let files = self.layout.song_files(artist, title, None);
        fs::create_dir_all(&files.dir).unwrap();
        fs::write(
            &files.meta,
            format!("Title: {title}\nArtists: {artist}\nReleaseDate: 2017-04-14\nLikes: 0\nViews: {views}\n"),
        )
        .unwrap();
        fs::write(&files.lyrics, "").unwrap();
    }

    /// Number of regular files anywhere below `path`.
    pub fn count_files(&self, path: &std::path::Path) -> usize {
        walkdir::WalkDir::new(path)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .count()
    }
}
