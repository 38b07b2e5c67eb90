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

//! Directory layout resolver.
//!
//! Every path under the data root is a deterministic function of a few
//! natural keys (artist nickname, song title, album title, account email,
//! request timestamp). The tree looks like this:
//!
//! ```text
//! users/index_users.txt
//! users/{nick}/{nick}-{email}.txt
//! users/{nick}/followings.txt
//! artists/index_artists.txt
//! artists/{nick}/{nick}-{email}.txt
//! artists/{nick}/followers.txt
//! artists/{nick}/singles/{song}/{song}.txt
//! artists/{nick}/albums/{album}/album.txt
//! artists/{nick}/albums/{album}/{song}/{song}.txt
//! admin/index_admins.txt
//! admin/{nick}/{nick}-{email}.txt
//! admin/artist_requests/{status}/{nick}/{nick}-{email}.txt
//! lyrics_requests/{status}/{artist}/{song}/{song}-{timestamp}.txt
//! ```
//!
//! Names are run through [`sanitize`] before they become path segments.
//! Distinct names that sanitize to the same segment would share a directory;
//! the catalog rejects such collisions when entries are created.

use std::path::{Path, PathBuf};

use crate::model::{RequestStatus, Role};

pub const SINGLES_DIR: &str = "singles";
pub const ALBUMS_DIR: &str = "albums";
pub const ALBUM_FILE: &str = "album.txt";
pub const ALBUM_COMMENTS_FILE: &str = "album-comments.txt";
pub const ALBUM_ART_STEM: &str = "album_art";
pub const FOLLOWINGS_FILE: &str = "followings.txt";
pub const FOLLOWERS_FILE: &str = "followers.txt";
pub const ARTIST_REQUESTS_DIR: &str = "artist_requests";
pub const LYRICS_REQUESTS_DIR: &str = "lyrics_requests";

/// Replaces every character outside `[A-Za-z0-9_-]` with `_`.
///
/// # Examples
///
/// ```
/// use lyricist::store::layout::sanitize;
///
/// assert_eq!(sanitize("A/B c"), "A_B_c");
/// assert_eq!(sanitize("kdot_99-x"), "kdot_99-x");
/// ```
pub fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Resolves canonical paths relative to a data root.
#[derive(Debug, Clone)]
pub struct Layout {
    root: PathBuf,
}

impl Layout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    // Accounts

    pub fn role_dir(&self, role: Role) -> PathBuf {
        self.root.join(role.dir_name())
    }

    pub fn index_file(&self, role: Role) -> PathBuf {
        self.role_dir(role).join(role.index_file_name())
    }

    pub fn account_dir(&self, role: Role, nickname: &str) -> PathBuf {
        self.role_dir(role).join(sanitize(nickname))
    }

    pub fn account_file(&self, role: Role, nickname: &str, email: &str) -> PathBuf {
        let nick = sanitize(nickname);
        self.account_dir(role, nickname)
            .join(format!("{nick}-{email}.txt"))
    }

    pub fn followings_file(&self, user: &str) -> PathBuf {
        self.account_dir(Role::User, user).join(FOLLOWINGS_FILE)
    }

    pub fn followers_file(&self, artist: &str) -> PathBuf {
        self.artist_dir(artist).join(FOLLOWERS_FILE)
    }

    // Catalog

    pub fn artists_dir(&self) -> PathBuf {
        self.role_dir(Role::Artist)
    }

    pub fn artist_dir(&self, artist: &str) -> PathBuf {
        self.account_dir(Role::Artist, artist)
    }

    pub fn singles_dir(&self, artist: &str) -> PathBuf {
        self.artist_dir(artist).join(SINGLES_DIR)
    }

    pub fn albums_dir(&self, artist: &str) -> PathBuf {
        self.artist_dir(artist).join(ALBUMS_DIR)
    }

    pub fn album_dir(&self, artist: &str, album: &str) -> PathBuf {
        self.albums_dir(artist).join(sanitize(album))
    }

    pub fn album_file(&self, artist: &str, album: &str) -> PathBuf {
        self.album_dir(artist, album).join(ALBUM_FILE)
    }

    pub fn album_comments_file(&self, artist: &str, album: &str) -> PathBuf {
        self.album_dir(artist, album).join(ALBUM_COMMENTS_FILE)
    }

    /// The directory holding one song: a single, or a track of `album`.
    pub fn song_dir(&self, artist: &str, title: &str, album: Option<&str>) -> PathBuf {
        match album {
            Some(album) => self.album_dir(artist, album).join(sanitize(title)),
            None => self.singles_dir(artist).join(sanitize(title)),
        }
    }

    pub fn song_files(&self, artist: &str, title: &str, album: Option<&str>) -> SongFiles {
        SongFiles::in_dir(self.song_dir(artist, title, album), title)
    }

    // Requests

    pub fn artist_requests_dir(&self, status: RequestStatus) -> PathBuf {
        self.role_dir(Role::Admin)
            .join(ARTIST_REQUESTS_DIR)
            .join(status.dir_name())
    }

    pub fn artist_request_file(&self, status: RequestStatus, nickname: &str, email: &str) -> PathBuf {
        let nick = sanitize(nickname);
        self.artist_requests_dir(status)
            .join(&nick)
            .join(format!("{nick}-{email}.txt"))
    }

    pub fn lyrics_requests_dir(&self, status: RequestStatus) -> PathBuf {
        self.root.join(LYRICS_REQUESTS_DIR).join(status.dir_name())
    }

    pub fn lyrics_request_song_dir(&self, status: RequestStatus, artist: &str, song: &str) -> PathBuf {
        self.lyrics_requests_dir(status)
            .join(sanitize(artist))
            .join(sanitize(song))
    }

    pub fn lyrics_request_file(
        &self,
        status: RequestStatus,
        artist: &str,
        song: &str,
        timestamp: &str,
    ) -> PathBuf {
        let title = sanitize(song);
        self.lyrics_request_song_dir(status, artist, song)
            .join(format!("{title}-{timestamp}.txt"))
    }
}

/// The per-song files that live together in one song directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SongFiles {
    pub dir: PathBuf,
    pub meta: PathBuf,
    pub lyrics: PathBuf,
    pub comments: PathBuf,
    pub history: PathBuf,
}

impl SongFiles {
    pub fn in_dir(dir: PathBuf, title: &str) -> Self {
        let t = sanitize(title);
        Self {
            meta: dir.join(format!("{t}.txt")),
            lyrics: dir.join(format!("{t}_lyrics.txt")),
            comments: dir.join(format!("{t}-comments.txt")),
            history: dir.join(format!("{t}-lyrics-history.txt")),
            dir,
        }
    }

    /// Pairs of (current, renamed) file paths inside the same directory.
    pub fn renamed_to(&self, title: &str) -> Vec<(PathBuf, PathBuf)> {
        let target = Self::in_dir(self.dir.clone(), title);
        vec![
            (self.meta.clone(), target.meta),
            (self.lyrics.clone(), target.lyrics),
            (self.comments.clone(), target.comments),
            (self.history.clone(), target.history),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_replaces_everything_outside_the_safe_set() {
        assert_eq!(sanitize("To Pimp a Butterfly"), "To_Pimp_a_Butterfly");
        assert_eq!(sanitize("A/B"), "A_B");
        assert_eq!(sanitize("ünï"), "_n_");
        assert_eq!(sanitize("ok-name_1"), "ok-name_1");
    }

    #[test]
    fn song_dir_depends_on_container() {
        let layout = Layout::new("/data");
        assert_eq!(
            layout.song_dir("kdot", "HUMBLE.", None),
            PathBuf::from("/data/artists/kdot/singles/HUMBLE_")
        );
        assert_eq!(
            layout.song_dir("kdot", "DNA.", Some("DAMN.")),
            PathBuf::from("/data/artists/kdot/albums/DAMN_/DNA_")
        );
    }

    #[test]
    fn song_file_names_derive_from_title() {
        let files = Layout::new("/d").song_files("kdot", "DNA", Some("DAMN"));
        assert_eq!(files.meta, PathBuf::from("/d/artists/kdot/albums/DAMN/DNA/DNA.txt"));
        assert_eq!(files.lyrics.file_name().unwrap(), "DNA_lyrics.txt");
        assert_eq!(files.comments.file_name().unwrap(), "DNA-comments.txt");
        assert_eq!(files.history.file_name().unwrap(), "DNA-lyrics-history.txt");
    }

    #[test]
    fn request_paths() {
        let layout = Layout::new("/d");
        assert_eq!(
            layout.artist_request_file(RequestStatus::Pending, "kdot", "k@x.com"),
            PathBuf::from("/d/admin/artist_requests/pending/kdot/kdot-k@x.com.txt")
        );
        assert_eq!(
            layout.lyrics_request_file(RequestStatus::Rejected, "kdot", "DNA.", "20261017"),
            PathBuf::from("/d/lyrics_requests/rejected/kdot/DNA_/DNA_-20261017.txt")
        );
    }

    #[test]
    fn account_paths_use_role_directories() {
        let layout = Layout::new("/d");
        assert_eq!(
            layout.account_file(Role::User, "fan1", "f@x.com"),
            PathBuf::from("/d/users/fan1/fan1-f@x.com.txt")
        );
        assert_eq!(layout.index_file(Role::Admin), PathBuf::from("/d/admin/index_admins.txt"));
        assert_eq!(layout.followings_file("fan1"), PathBuf::from("/d/users/fan1/followings.txt"));
    }
}
