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

//! Moderation workflow for artist signups and lyrics edits.
//!
//! Both request kinds share one state machine:
//!
//! ```text
//! Pending --approve--> Approved
//! Pending --reject---> Rejected
//! ```
//!
//! The state of a request is the directory its file lives in. A transition
//! rewrites the `Status` line and moves the file from `pending/` to the
//! target directory under the same natural-key sub-path. Acting on a request
//! that has already left `pending/` therefore fails with
//! [`PlatformError::NotFound`].
//!
//! Approval side effects run before the file is moved, so a failed side
//! effect leaves the request pending and the admin can retry.

mod record;

use std::{fs, path::Path};

use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::{
    accounts::{AccountStore, validate},
    catalog::{CatalogManager, SongRef},
    error::{IoResultExt, PlatformError, Result},
    model::{
        Account, ArtistRequest, Credentials, LyricsEditRequest, LyricsRequestBuckets, Lyrics,
        RequestStatus,
    },
    store::{self, layout::Layout},
    util::file_timestamp,
};

pub struct RequestEngine {
    layout: Layout,
}

impl RequestEngine {
    pub fn new(layout: Layout) -> Self {
        Self { layout }
    }

    // Artist signups

    /// Files a pending artist signup.
    ///
    /// # Errors
    ///
    /// * [`PlatformError::Validation`] if the credentials are malformed.
    /// * [`PlatformError::Conflict`] if an account already uses the email or
    ///   nickname, or a pending request already does.
    pub fn submit_artist_request(
        &mut self,
        accounts: &AccountStore,
        email: &str,
        nickname: &str,
        password: &str,
    ) -> Result<ArtistRequest> {
        let credentials = Credentials::new(email, nickname, password);
        validate::validate_credentials(&credentials)?;

        if accounts.is_email_or_nickname_taken(&credentials.email, &credentials.nickname)? {
            return Err(PlatformError::Conflict(format!(
                "account with email {} or nickname {}",
                credentials.email, credentials.nickname
            )));
        }
        if self
            .load_artist_requests(RequestStatus::Pending)?
            .iter()
            .any(|r| r.email == credentials.email || r.nickname == credentials.nickname)
        {
            return Err(PlatformError::Conflict(format!(
                "pending request for {}",
                credentials.nickname
            )));
        }

        let request = ArtistRequest {
            email: credentials.email,
            nickname: credentials.nickname,
            password: credentials.password,
            timestamp: file_timestamp(),
            status: RequestStatus::Pending,
        };
        let path = self
            .layout
            .artist_request_file(RequestStatus::Pending, &request.nickname, &request.email);
        store::write_record(&path, &record::format_artist_request(&request))?;

        info!(nickname = %request.nickname, "artist request submitted");
        Ok(request)
    }

    /// Artist requests in the given state, oldest first.
    pub fn load_artist_requests(&self, status: RequestStatus) -> Result<Vec<ArtistRequest>> {
        let dir = self.layout.artist_requests_dir(status);
        let mut requests = vec![];

        for nick in store::child_dirs(&dir)? {
            let nick_dir = dir.join(&nick);
            for name in store::child_files(&nick_dir)? {
                if !name.ends_with(".txt") {
                    continue;
                }
                let path = nick_dir.join(&name);
                let lines = store::read_record(&path)?;
                let request = record::parse_artist_request(&lines, &path)?;
                if request.status != status {
                    warn!(path = %path.display(), stored = %request.status, "request status does not match its directory");
                }
                requests.push(request);
            }
        }

        requests.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
        Ok(requests)
    }

    /// Approves a signup and creates the artist account, already approved.
    pub fn approve_artist_request(
        &mut self,
        accounts: &mut AccountStore,
        email: &str,
        nickname: &str,
    ) -> Result<Account> {
        let (email, nickname) = normalise(email, nickname);
        let from = self
            .layout
            .artist_request_file(RequestStatus::Pending, &nickname, &email);
        let request = self.read_pending_artist_request(&from, &nickname)?;

        let account = Account::artist(
            Credentials::new(&request.email, &request.nickname, &request.password),
            true,
        );
        accounts.save_account(&account)?;

        let to = self
            .layout
            .artist_request_file(RequestStatus::Approved, &nickname, &email);
        self.transition(&from, &to, RequestStatus::Approved)?;

        info!(nickname = %nickname, "artist request approved");
        Ok(account)
    }

    pub fn reject_artist_request(&mut self, email: &str, nickname: &str) -> Result<()> {
        let (email, nickname) = normalise(email, nickname);
        let from = self
            .layout
            .artist_request_file(RequestStatus::Pending, &nickname, &email);
        self.read_pending_artist_request(&from, &nickname)?;

        let to = self
            .layout
            .artist_request_file(RequestStatus::Rejected, &nickname, &email);
        self.transition(&from, &to, RequestStatus::Rejected)?;

        info!(nickname = %nickname, "artist request rejected");
        Ok(())
    }

    fn read_pending_artist_request(&self, path: &Path, nickname: &str) -> Result<ArtistRequest> {
        if !path.is_file() {
            return Err(PlatformError::not_found("request", nickname));
        }
        let lines = store::read_record(path)?;
        record::parse_artist_request(&lines, path)
    }

    // Lyrics edits

    /// Files a suggested lyrics replacement for an existing song.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::NotFound`] if the song's metadata or lyrics
    /// file is missing. Nothing is written in that case.
    pub fn submit_lyrics_edit_request(
        &mut self,
        catalog: &CatalogManager,
        song: &SongRef,
        suggested_lyrics: &str,
        requester: &str,
    ) -> Result<LyricsEditRequest> {
        if !catalog.song_exists(song) {
            return Err(PlatformError::not_found("song", &song.title));
        }
        if suggested_lyrics.trim().is_empty() {
            return Err(PlatformError::validation("lyrics", "must not be empty"));
        }

        let request = LyricsEditRequest {
            artist: song.artist.clone(),
            song: song.title.clone(),
            album: song.album.clone(),
            suggested_lyrics: suggested_lyrics.to_string(),
            requester: requester.to_string(),
            timestamp: file_timestamp(),
            status: RequestStatus::Pending,
        };
        let path = self.layout.lyrics_request_file(
            RequestStatus::Pending,
            &request.artist,
            &request.song,
            &request.timestamp,
        );
        if path.exists() {
            return Err(PlatformError::Conflict(format!("request {}", path.display())));
        }
        store::write_text(&path, &record::format_lyrics_request(&request))?;

        info!(artist = %request.artist, song = %request.song, requester = %requester, "lyrics edit submitted");
        Ok(request)
    }

    /// Lyrics requests across every artist in the given state, oldest first.
    pub fn load_lyrics_requests(&self, status: RequestStatus) -> Result<Vec<LyricsEditRequest>> {
        let mut requests = self.read_lyrics_requests(&self.layout.lyrics_requests_dir(status), 3)?;
        requests.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
        Ok(requests)
    }

    /// All lyrics requests against one artist's songs, grouped by state.
    pub fn load_lyrics_edit_requests_for_artist(&self, artist: &str) -> Result<LyricsRequestBuckets> {
        let artist_dir = store::layout::sanitize(artist);
        let mut buckets = LyricsRequestBuckets::default();

        for status in RequestStatus::ALL {
            let dir = self.layout.lyrics_requests_dir(status).join(&artist_dir);
            let bucket = buckets.bucket_mut(status);
            bucket.extend(self.read_lyrics_requests(&dir, 2)?);
            bucket.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
        }

        Ok(buckets)
    }

    /// Approves an edit and writes the suggested text as the song's lyrics.
    ///
    /// The song's lyrics history gains one entry.
    pub fn approve_lyrics_request(
        &mut self,
        catalog: &mut CatalogManager,
        artist: &str,
        song: &str,
        timestamp: &str,
    ) -> Result<LyricsEditRequest> {
        let from = self
            .layout
            .lyrics_request_file(RequestStatus::Pending, artist, song, timestamp);
        let request = self.read_pending_lyrics_request(&from, song)?;

        let song_ref = SongRef {
            artist: request.artist.clone(),
            title: request.song.clone(),
            album: request.album.clone(),
        };
        let mut lyrics = Lyrics::new(&catalog.load_lyrics(&song_ref)?);
        lyrics.suggest_edit(&request.suggested_lyrics);
        lyrics.approve_edit(&request.suggested_lyrics);
        catalog.overwrite_lyrics(&song_ref, lyrics.current())?;

        let to = self
            .layout
            .lyrics_request_file(RequestStatus::Approved, artist, song, timestamp);
        self.transition_lyrics(&from, &to, RequestStatus::Approved)?;

        info!(artist = %artist, song = %song, requester = %request.requester, "lyrics edit approved");
        Ok(LyricsEditRequest {
            status: RequestStatus::Approved,
            ..request
        })
    }

    pub fn reject_lyrics_request(&mut self, artist: &str, song: &str, timestamp: &str) -> Result<()> {
        let from = self
            .layout
            .lyrics_request_file(RequestStatus::Pending, artist, song, timestamp);
        self.read_pending_lyrics_request(&from, song)?;

        let to = self
            .layout
            .lyrics_request_file(RequestStatus::Rejected, artist, song, timestamp);
        self.transition_lyrics(&from, &to, RequestStatus::Rejected)?;

        info!(artist = %artist, song = %song, "lyrics edit rejected");
        Ok(())
    }

    fn read_pending_lyrics_request(&self, path: &Path, song: &str) -> Result<LyricsEditRequest> {
        if !path.is_file() {
            return Err(PlatformError::not_found("request", song));
        }
        record::parse_lyrics_request(&store::read_text(path)?, path)
    }

    /// Reads every request file exactly `depth` levels below `dir`.
    fn read_lyrics_requests(&self, dir: &Path, depth: usize) -> Result<Vec<LyricsEditRequest>> {
        if !dir.is_dir() {
            return Ok(vec![]);
        }

        let mut requests = vec![];
        for entry in WalkDir::new(dir)
            .min_depth(depth)
            .max_depth(depth)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter(|e| e.path().extension().is_some_and(|ext| ext == "txt"))
        {
            let path = entry.path();
            requests.push(record::parse_lyrics_request(&store::read_text(path)?, path)?);
        }

        Ok(requests)
    }

    fn transition(&self, from: &Path, to: &Path, status: RequestStatus) -> Result<()> {
        let lines = store::read_record(from)?;
        store::write_record(to, &record::rewrite_status(&lines, status))?;
        self.remove_moved(from)
    }

    fn transition_lyrics(&self, from: &Path, to: &Path, status: RequestStatus) -> Result<()> {
        let text = store::read_text(from)?;
        store::write_text(to, &record::rewrite_lyrics_status(&text, status, from)?)?;
        self.remove_moved(from)
    }

    /// Deletes the source of a move and prunes directories it leaves empty.
    fn remove_moved(&self, from: &Path) -> Result<()> {
        fs::remove_file(from).at(from)?;

        let mut dir = from.parent();
        while let Some(d) = dir {
            if RequestStatus::ALL.iter().any(|s| d.ends_with(s.dir_name())) {
                break;
            }
            if fs::remove_dir(d).is_err() {
                break;
            }
            debug!(dir = %d.display(), "pruned empty request directory");
            dir = d.parent();
        }
        Ok(())
    }
}

fn normalise(email: &str, nickname: &str) -> (String, String) {
    (email.trim().to_lowercase(), nickname.trim().to_lowercase())
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::model::Song;

    struct Fixture {
        _dir: TempDir,
        layout: Layout,
        accounts: AccountStore,
        catalog: CatalogManager,
        requests: RequestEngine,
    }

    fn fixture() -> Fixture {
        let dir = TempDir::new().unwrap();
        let layout = Layout::new(dir.path());
        Fixture {
            accounts: AccountStore::new(layout.clone()),
            catalog: CatalogManager::new(layout.clone(), 1024),
            requests: RequestEngine::new(layout.clone()),
            layout,
            _dir: dir,
        }
    }

    #[test]
    fn approved_signup_creates_an_approved_artist() {
        let mut f = fixture();
        f.requests
            .submit_artist_request(&f.accounts, "K@X.com", "KDot", "Kdot123!")
            .unwrap();
        assert_eq!(f.requests.load_artist_requests(RequestStatus::Pending).unwrap().len(), 1);

        let account = f
            .requests
            .approve_artist_request(&mut f.accounts, "k@x.com", "kdot")
            .unwrap();
        assert!(account.as_artist().unwrap().approved);
        assert!(f.accounts.login("kdot", "Kdot123!").is_ok());

        assert!(f.requests.load_artist_requests(RequestStatus::Pending).unwrap().is_empty());
        let approved = f.requests.load_artist_requests(RequestStatus::Approved).unwrap();
        assert_eq!(approved[0].status, RequestStatus::Approved);
    }

    #[test]
    fn duplicate_pending_signup_conflicts() {
        let mut f = fixture();
        f.requests
            .submit_artist_request(&f.accounts, "k@x.com", "kdot", "Kdot123!")
            .unwrap();
        assert!(matches!(
            f.requests.submit_artist_request(&f.accounts, "other@x.com", "kdot", "Kdot123!"),
            Err(PlatformError::Conflict(_))
        ));
    }

    #[test]
    fn rejected_signup_cannot_be_approved() {
        let mut f = fixture();
        f.requests
            .submit_artist_request(&f.accounts, "k@x.com", "kdot", "Kdot123!")
            .unwrap();
        f.requests.reject_artist_request("k@x.com", "kdot").unwrap();

        assert!(matches!(
            f.requests.approve_artist_request(&mut f.accounts, "k@x.com", "kdot"),
            Err(PlatformError::NotFound { .. })
        ));
        assert!(matches!(
            f.requests.reject_artist_request("k@x.com", "kdot"),
            Err(PlatformError::NotFound { .. })
        ));
        assert!(f.accounts.load_account_by_nickname("kdot").is_err());
    }

    #[test]
    fn approving_an_edit_overwrites_lyrics_and_history() {
        let mut f = fixture();
        let song = Song::new(vec!["kdot".into()], "DNA", Some("DAMN"), "old", "2017").unwrap();
        f.catalog.save_song(&song).unwrap();
        let song_ref = SongRef::track("kdot", "DAMN", "DNA");

        let request = f
            .requests
            .submit_lyrics_edit_request(&f.catalog, &song_ref, "new", "fan1")
            .unwrap();
        f.requests
            .approve_lyrics_request(&mut f.catalog, "kdot", "DNA", &request.timestamp)
            .unwrap();

        assert_eq!(f.catalog.load_lyrics(&song_ref).unwrap(), "new");
        assert_eq!(f.catalog.load_lyrics_history(&song_ref).unwrap().len(), 2);

        let buckets = f.requests.load_lyrics_edit_requests_for_artist("kdot").unwrap();
        assert!(buckets.pending.is_empty());
        assert_eq!(buckets.approved.len(), 1);
        assert_eq!(buckets.approved[0].album.as_deref(), Some("DAMN"));
        assert!(!f.layout.lyrics_requests_dir(RequestStatus::Pending).join("kdot").exists());
    }

    #[test]
    fn lyrics_requests_are_listed_across_artists_by_state() {
        let mut f = fixture();
        let dna = Song::new(vec!["kdot".into()], "DNA", Some("DAMN"), "", "2017").unwrap();
        let kill_bill = Song::new(vec!["sza".into()], "Kill Bill", None, "", "2022").unwrap();
        f.catalog.save_song(&dna).unwrap();
        f.catalog.save_song(&kill_bill).unwrap();

        let first = f
            .requests
            .submit_lyrics_edit_request(&f.catalog, &SongRef::track("kdot", "DAMN", "DNA"), "a", "fan1")
            .unwrap();
        let second = f
            .requests
            .submit_lyrics_edit_request(&f.catalog, &SongRef::single("sza", "Kill Bill"), "b", "fan2")
            .unwrap();

        let pending = f.requests.load_lyrics_requests(RequestStatus::Pending).unwrap();
        let songs: Vec<&str> = pending.iter().map(|r| r.song.as_str()).collect();
        assert_eq!(songs, vec!["DNA", "Kill Bill"]);
        assert_eq!(pending[1].album, None);
        assert_eq!(pending[1].requester, "fan2");

        f.requests
            .reject_lyrics_request("sza", "Kill Bill", &second.timestamp)
            .unwrap();

        let pending = f.requests.load_lyrics_requests(RequestStatus::Pending).unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].timestamp, first.timestamp);
        let rejected = f.requests.load_lyrics_requests(RequestStatus::Rejected).unwrap();
        assert_eq!(rejected.len(), 1);
        assert_eq!(rejected[0].status, RequestStatus::Rejected);
        assert_eq!(rejected[0].suggested_lyrics, "b");
        assert!(f.requests.load_lyrics_requests(RequestStatus::Approved).unwrap().is_empty());
    }

    #[test]
    fn edit_for_missing_song_writes_nothing() {
        let mut f = fixture();
        let err = f
            .requests
            .submit_lyrics_edit_request(&f.catalog, &SongRef::single("kdot", "ghost"), "x", "fan1")
            .unwrap_err();
        assert!(matches!(err, PlatformError::NotFound { .. }));
        assert!(!f.layout.lyrics_requests_dir(RequestStatus::Pending).exists());
    }
}
