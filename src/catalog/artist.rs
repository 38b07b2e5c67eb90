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

//! In-memory view of one artist's catalog.
//!
//! Singles and albums are owned here, keyed by their sanitized title (the
//! same string used as their directory name). Mutations only touch memory and
//! set dirty flags; [`CatalogManager::save_songs_and_albums_for_artist`]
//! reconciles the result with disk.
//!
//! [`CatalogManager::save_songs_and_albums_for_artist`]: super::CatalogManager::save_songs_and_albums_for_artist

use std::collections::BTreeMap;

use crate::{
    error::{PlatformError, Result},
    model::{Album, Artist, Song},
    store::layout::sanitize,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtistCatalog {
    artist: String,
    approved: bool,
    pub(super) singles: BTreeMap<String, Song>,
    pub(super) albums: BTreeMap<String, Album>,
}

impl ArtistCatalog {
    /// An empty catalog for `artist`.
    pub fn new(artist: &Artist) -> Self {
        Self {
            artist: artist.credentials.nickname.clone(),
            approved: artist.approved,
            singles: BTreeMap::new(),
            albums: BTreeMap::new(),
        }
    }

    pub fn artist(&self) -> &str {
        &self.artist
    }

    pub fn is_approved(&self) -> bool {
        self.approved
    }

    pub fn set_approved(&mut self, approved: bool) {
        self.approved = approved;
    }

    pub fn singles(&self) -> impl Iterator<Item = &Song> {
        self.singles.values()
    }

    pub fn single(&self, title: &str) -> Option<&Song> {
        self.singles.get(&sanitize(title))
    }

    pub fn single_mut(&mut self, title: &str) -> Option<&mut Song> {
        self.singles.get_mut(&sanitize(title))
    }

    pub fn albums(&self) -> impl Iterator<Item = &Album> {
        self.albums.values()
    }

    pub fn album(&self, title: &str) -> Option<&Album> {
        self.albums.get(&sanitize(title))
    }

    pub fn album_mut(&mut self, title: &str) -> Option<&mut Album> {
        self.albums.get_mut(&sanitize(title))
    }

    /// Finds a single (`album == None`) or an album track.
    pub fn song(&self, title: &str, album: Option<&str>) -> Option<&Song> {
        match album {
            Some(album) => self.album(album)?.track(title),
            None => self.single(title),
        }
    }

    pub fn song_mut(&mut self, title: &str, album: Option<&str>) -> Option<&mut Song> {
        match album {
            Some(album) => self.album_mut(album)?.track_mut(title),
            None => self.single_mut(title),
        }
    }

    pub fn add_single(&mut self, title: &str, lyrics: &str, release_date: &str) -> Result<&Song> {
        self.ensure_approved()?;

        let song = Song::new(vec![self.artist.clone()], title, None, lyrics, release_date)?;
        let key = song.key();
        if self.singles.contains_key(&key) {
            return Err(PlatformError::Conflict(format!("single {}", song.title)));
        }

        Ok(self.singles.entry(key).or_insert(song))
    }

    pub fn add_album(&mut self, title: &str, release_date: &str) -> Result<&mut Album> {
        self.ensure_approved()?;

        let album = Album::new(&self.artist, title, release_date)?;
        let key = album.key();
        if self.albums.contains_key(&key) {
            return Err(PlatformError::Conflict(format!("album {}", album.title)));
        }

        Ok(self.albums.entry(key).or_insert(album))
    }

    pub fn add_track(
        &mut self,
        album: &str,
        title: &str,
        lyrics: &str,
        release_date: &str,
    ) -> Result<()> {
        self.ensure_approved()?;

        let artist = self.artist.clone();
        let album = self
            .album_mut(album)
            .ok_or_else(|| PlatformError::not_found("album", album))?;
        let song = Song::new(vec![artist], title, Some(album.title.as_str()), lyrics, release_date)?;
        album.add_track(song)
    }

    pub fn edit_lyrics(&mut self, title: &str, album: Option<&str>, lyrics: &str) -> Result<()> {
        let song = self
            .song_mut(title, album)
            .ok_or_else(|| PlatformError::not_found("song", title))?;
        song.set_lyrics(lyrics);
        Ok(())
    }

    pub fn remove_single(&mut self, title: &str) -> Option<Song> {
        self.singles.remove(&sanitize(title))
    }

    pub fn remove_album(&mut self, title: &str) -> Option<Album> {
        self.albums.remove(&sanitize(title))
    }

    pub fn remove_track(&mut self, album: &str, title: &str) -> Option<Song> {
        self.album_mut(album)?.remove_track(title)
    }

    /// Whether any entity has changes not yet written to disk.
    pub fn has_pending_writes(&self) -> bool {
        self.singles.values().any(Song::is_dirty) || self.albums.values().any(Album::has_pending_writes)
    }

    fn ensure_approved(&self) -> Result<()> {
        if !self.approved {
            return Err(PlatformError::validation(
                "artist",
                format!("{} must be approved before publishing", self.artist),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Credentials;

    fn catalog(approved: bool) -> ArtistCatalog {
        ArtistCatalog::new(&Artist {
            credentials: Credentials::new("k@x.com", "kdot", "Kdot123!"),
            approved,
        })
    }

    #[test]
    fn unapproved_artist_cannot_publish() {
        let mut catalog = catalog(false);
        let err = catalog.add_single("HUMBLE", "lyrics", "2017-04-14").unwrap_err();
        assert!(matches!(err, PlatformError::Validation { field: "artist", .. }));

        catalog.set_approved(true);
        let song = catalog.add_single("HUMBLE", "lyrics", "2017-04-14").unwrap();
        assert_eq!(song.artists(), ["kdot"]);
    }

    #[test]
    fn sanitized_collisions_are_rejected() {
        let mut catalog = catalog(true);
        catalog.add_single("A/B", "", "").unwrap();
        assert!(matches!(
            catalog.add_single("A?B", "", ""),
            Err(PlatformError::Conflict(_))
        ));
        assert_eq!(catalog.singles().count(), 1);
    }

    #[test]
    fn tracks_are_reachable_through_their_album() {
        let mut catalog = catalog(true);
        catalog.add_album("DAMN", "2017-04-14").unwrap();
        catalog.add_track("DAMN", "DNA", "words", "2017-04-14").unwrap();

        assert_eq!(catalog.song("DNA", Some("DAMN")).unwrap().lyrics, "words");
        assert!(catalog.song("DNA", None).is_none());
        assert!(matches!(
            catalog.add_track("GKMC", "DNA", "", ""),
            Err(PlatformError::NotFound { .. })
        ));

        catalog.edit_lyrics("DNA", Some("DAMN"), "new words").unwrap();
        assert_eq!(catalog.song("DNA", Some("DAMN")).unwrap().lyrics, "new words");
        assert!(catalog.has_pending_writes());
    }
}
