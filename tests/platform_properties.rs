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

//! End-to-end behaviour of the stores against a real data directory.

mod common;

use std::fs;

use common::TestData;
use lyricist::{
    PlatformError,
    catalog::{ArtistCatalog, SongRef, SyncReport},
    model::{Account, Artist, Credentials, RequestStatus, Role},
    search::SearchIndex,
};

fn kdot(approved: bool) -> Artist {
    Artist {
        credentials: Credentials::new("k@x.com", "kdot", "Kdot123!"),
        approved,
    }
}

#[test]
fn saved_accounts_load_back_unchanged() {
    let mut data = TestData::new();
    let accounts = [
        Account::user(Credentials::new("fan@x.com", "fan1", "Passw0rd!")),
        Account::artist(Credentials::new("k@x.com", "kdot", "Kdot123!"), false),
        Account::admin(Credentials::new("root@x.com", "root", "R00t!pass")),
    ];

    for account in &accounts {
        data.accounts.save_account(account).unwrap();
        let loaded = data.accounts.load_account_by_nickname(account.nickname()).unwrap();
        assert_eq!(loaded.email(), account.email());
        assert_eq!(loaded.nickname(), account.nickname());
        assert_eq!(loaded.role(), account.role());
        assert_eq!(loaded.credentials().password, account.credentials().password);
    }
}

#[test]
fn taken_checks_see_new_accounts_immediately() {
    let mut data = TestData::new();
    assert!(!data.accounts.is_email_or_nickname_taken("fan@x.com", "fan1").unwrap());

    data.accounts.register_user("fan@x.com", "fan1", "Passw0rd!").unwrap();

    assert!(data.accounts.is_email_or_nickname_taken("fan@x.com", "other").unwrap());
    assert!(data.accounts.is_email_or_nickname_taken("other@x.com", "fan1").unwrap());
    assert!(!data.accounts.is_email_or_nickname_taken("other@x.com", "other").unwrap());
}

#[test]
fn approved_lyrics_edit_moves_buckets_and_rewrites_lyrics() {
    let mut data = TestData::new();
    let mut catalog = ArtistCatalog::new(&kdot(true));
    catalog.add_single("DNA", "old words", "2017-04-14").unwrap();
    data.catalog.save_songs_and_albums_for_artist(&mut catalog).unwrap();

    let song = SongRef::single("kdot", "DNA");
    let request = data
        .requests
        .submit_lyrics_edit_request(&data.catalog, &song, "new words", "fan1")
        .unwrap();
    assert_eq!(
        data.requests.load_lyrics_edit_requests_for_artist("kdot").unwrap().pending.len(),
        1
    );

    data.requests
        .approve_lyrics_request(&mut data.catalog, "kdot", "DNA", &request.timestamp)
        .unwrap();

    let buckets = data.requests.load_lyrics_edit_requests_for_artist("kdot").unwrap();
    assert!(buckets.pending.is_empty());
    assert_eq!(buckets.approved.len(), 1);
    assert_eq!(buckets.approved[0].status, RequestStatus::Approved);
    assert_eq!(buckets.approved[0].suggested_lyrics, "new words");

    let lyrics_file = data.layout.song_files("kdot", "DNA", None).lyrics;
    assert_eq!(fs::read_to_string(lyrics_file).unwrap(), "new words");
}

#[test]
fn acting_on_a_finished_request_is_not_found() {
    let mut data = TestData::new();
    data.write_single("kdot", "DNA", 0);
    let song = SongRef::single("kdot", "DNA");

    let approved = data
        .requests
        .submit_lyrics_edit_request(&data.catalog, &song, "v2", "fan1")
        .unwrap();
    data.requests
        .approve_lyrics_request(&mut data.catalog, "kdot", "DNA", &approved.timestamp)
        .unwrap();
    for _ in 0..2 {
        assert!(matches!(
            data.requests
                .approve_lyrics_request(&mut data.catalog, "kdot", "DNA", &approved.timestamp),
            Err(PlatformError::NotFound { .. })
        ));
        assert!(matches!(
            data.requests.reject_lyrics_request("kdot", "DNA", &approved.timestamp),
            Err(PlatformError::NotFound { .. })
        ));
    }

    data.requests
        .submit_artist_request(&data.accounts, "sza@x.com", "sza", "Ctrl2017!")
        .unwrap();
    data.requests.reject_artist_request("sza@x.com", "sza").unwrap();
    for _ in 0..2 {
        assert!(matches!(
            data.requests.reject_artist_request("sza@x.com", "sza"),
            Err(PlatformError::NotFound { .. })
        ));
        assert!(matches!(
            data.requests
                .approve_artist_request(&mut data.accounts, "sza@x.com", "sza"),
            Err(PlatformError::NotFound { .. })
        ));
    }
}

#[test]
fn saving_a_clean_catalog_touches_nothing() {
    let mut data = TestData::new();
    let mut catalog = ArtistCatalog::new(&kdot(true));
    catalog.add_single("HUMBLE", "Sit down", "2017-03-30").unwrap();
    catalog.add_album("DAMN", "2017-04-14").unwrap();
    catalog.add_track("DAMN", "DNA", "words", "2017-04-14").unwrap();

    let first = data.catalog.save_songs_and_albums_for_artist(&mut catalog).unwrap();
    assert_eq!(first, SyncReport { deleted: 0, written: 3 });

    let meta = data.layout.song_files("kdot", "HUMBLE", None).meta;
    let before = fs::metadata(&meta).unwrap().modified().unwrap();
    let files_before = data.count_files(data.dir.path());

    let second = data.catalog.save_songs_and_albums_for_artist(&mut catalog).unwrap();
    assert!(second.is_noop());
    assert_eq!(fs::metadata(&meta).unwrap().modified().unwrap(), before);
    assert_eq!(data.count_files(data.dir.path()), files_before);
}

#[test]
fn deleted_album_stays_deleted() {
    let mut data = TestData::new();
    let mut catalog = ArtistCatalog::new(&kdot(true));
    catalog.add_album("DAMN", "2017-04-14").unwrap();
    catalog.add_track("DAMN", "DNA", "", "2017-04-14").unwrap();
    data.catalog.save_songs_and_albums_for_artist(&mut catalog).unwrap();

    data.catalog.delete_album(&mut catalog, "DAMN").unwrap();

    assert!(catalog.album("DAMN").is_none());
    assert!(!data.layout.album_dir("kdot", "DAMN").exists());
    let reloaded = data.catalog.load_songs_and_albums_for_artist(&kdot(true)).unwrap();
    assert_eq!(reloaded.albums().count(), 0);
    assert!(matches!(
        data.catalog.delete_album(&mut catalog, "DAMN"),
        Err(PlatformError::NotFound { .. })
    ));
}

#[test]
fn top_songs_orders_by_views_and_keeps_ties_stable() {
    let data = TestData::new();
    for (title, views) in [("a", 500), ("b", 10), ("c", 10), ("d", 300)] {
        data.write_single("kdot", title, views);
    }

    let index = SearchIndex::build(&data.layout);
    let top: Vec<(&str, u64)> = index
        .top_songs(10)
        .iter()
        .map(|s| (s.title.as_str(), s.views))
        .collect();
    assert_eq!(top, vec![("a", 500), ("d", 300), ("b", 10), ("c", 10)]);
    assert_eq!(index.top_songs(3).len(), 3);
    assert!(index.top_songs(0).is_empty());
}

#[test]
fn unapproved_artist_publishes_only_after_approval() {
    let mut data = TestData::new();
    data.accounts
        .save_account(&Account::artist(Credentials::new("k@x.com", "kdot", "Kdot123!"), false))
        .unwrap();

    let stored = data.accounts.load_account_by_nickname("kdot").unwrap();
    let artist = stored.as_artist().unwrap();
    assert_eq!(stored.role(), Role::Artist);
    assert!(matches!(
        data.accounts.login("kdot", "Kdot123!"),
        Err(PlatformError::NotApproved(_))
    ));

    let mut catalog = data.catalog.load_songs_and_albums_for_artist(artist).unwrap();
    assert!(matches!(
        catalog.add_single("HUMBLE", "lyrics...", "2017-04-14"),
        Err(PlatformError::Validation { .. })
    ));

    catalog.set_approved(true);
    catalog.add_single("HUMBLE", "lyrics...", "2017-04-14").unwrap();
    data.catalog.save_songs_and_albums_for_artist(&mut catalog).unwrap();

    let reloaded = data.catalog.load_songs_and_albums_for_artist(artist).unwrap();
    let titles: Vec<&str> = reloaded.singles().map(|s| s.title.as_str()).collect();
    assert_eq!(titles, vec!["HUMBLE"]);
}

#[test]
fn edit_request_for_missing_song_leaves_no_file() {
    let mut data = TestData::new();
    let err = data
        .requests
        .submit_lyrics_edit_request(&data.catalog, &SongRef::single("kdot", "NOPE"), "words", "fan1")
        .unwrap_err();

    assert!(matches!(err, PlatformError::NotFound { .. }));
    let pending = data.layout.lyrics_requests_dir(RequestStatus::Pending);
    assert_eq!(data.count_files(&pending), 0);
}
