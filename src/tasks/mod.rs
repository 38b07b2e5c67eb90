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

//! Application task processing.
//!
//! This module implements the command pattern the front end uses to drive
//! the platform. Every operation a screen can trigger is an [`AppTask`];
//! [`Platform::handle_task`] runs it against the stores and the current
//! [`Session`] and answers with an [`AppEvent`].
//!
//! Everything runs synchronously on the caller's thread. Failures reach the
//! front end as [`AppEvent::Error`] through [`Platform::dispatch`].
//!
//! # Permissions
//!
//! | Task group | Who may run it |
//! | ---------- | -------------- |
//! | register, login, search, charts, reading comments | anyone |
//! | commenting, liking, suggesting lyrics | any logged-in account |
//! | following | users |
//! | catalog changes | the artist who owns the catalog |
//! | artist signups | admins |
//! | lyrics requests | admins, or the artist the song belongs to |

mod handlers;

use std::{collections::BTreeSet, path::PathBuf};

use tracing::{error, warn};

use crate::{
    accounts::AccountStore,
    catalog::{ArtistCatalog, CatalogManager, CommentTarget, SongRef, SyncReport},
    config::AppConfig,
    error::Result,
    model::{Account, ArtistRequest, Comment, LyricsEditRequest, LyricsRequestBuckets, RequestStatus},
    requests::RequestEngine,
    search::{SearchIndex, SearchResults, SongEntry},
    session::Session,
    store::{self, layout::Layout},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppTask {
    Register {
        email: String,
        nickname: String,
        password: String,
    },
    Login {
        username: String,
        password: String,
    },
    Logout,
    ChangePassword {
        old: String,
        new: String,
    },
    ChangeNickname(String),

    SubmitArtistRequest {
        email: String,
        nickname: String,
        password: String,
    },
    ListArtistRequests(RequestStatus),
    ApproveArtistRequest {
        email: String,
        nickname: String,
    },
    RejectArtistRequest {
        email: String,
        nickname: String,
    },

    SubmitLyricsEdit {
        song: SongRef,
        lyrics: String,
    },
    ListLyricsRequests(RequestStatus),
    ListLyricsRequestsForArtist(String),
    ApproveLyricsRequest {
        artist: String,
        song: String,
        timestamp: String,
    },
    RejectLyricsRequest {
        artist: String,
        song: String,
        timestamp: String,
    },

    LoadCatalog,
    AddSingle {
        title: String,
        lyrics: String,
        release_date: String,
    },
    AddAlbum {
        title: String,
        release_date: String,
    },
    AddTrack {
        album: String,
        title: String,
        lyrics: String,
        release_date: String,
    },
    EditLyrics {
        title: String,
        album: Option<String>,
        lyrics: String,
    },
    SaveCatalog,
    DeleteSong {
        title: String,
        album: Option<String>,
    },
    DeleteAlbum(String),
    RenameSong {
        album: Option<String>,
        old: String,
        new: String,
    },
    RenameAlbum {
        old: String,
        new: String,
    },
    SaveAlbumArt {
        album: String,
        image: PathBuf,
    },

    Follow(String),
    Unfollow(String),
    ListFollowings,

    AddComment {
        target: CommentTarget,
        text: String,
    },
    LoadComments(CommentTarget),
    ViewSong(SongRef),
    LikeSong(SongRef),

    Search(String),
    TopSongs(usize),
    RefreshSearch,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    Registered(Account),
    LoggedIn(Account),
    LoggedOut,
    AccountUpdated(Account),

    ArtistRequestSubmitted(ArtistRequest),
    ArtistRequests(Vec<ArtistRequest>),
    ArtistApproved(Account),
    RequestRejected,

    LyricsRequestSubmitted(LyricsEditRequest),
    LyricsRequests(Vec<LyricsEditRequest>),
    LyricsRequestBuckets(LyricsRequestBuckets),
    LyricsRequestApproved(LyricsEditRequest),

    CatalogLoaded(ArtistCatalog),
    CatalogChanged,
    CatalogSaved(SyncReport),
    AlbumArtSaved(PathBuf),

    Followings(BTreeSet<String>),

    CommentAdded(Comment),
    Comments(Vec<Comment>),
    SongViewed { lyrics: String, views: u64 },
    SongLiked(u64),

    SearchResults(SearchResults),
    TopSongs(Vec<SongEntry>),
    SearchRefreshed,

    Error(String),
}

/// Owns every store plus the session, and executes tasks against them.
pub struct Platform {
    config: AppConfig,
    layout: Layout,
    accounts: AccountStore,
    catalog: CatalogManager,
    requests: RequestEngine,
    search: SearchIndex,
    session: Session,
    /// The logged-in artist's catalog while it is being edited.
    working: Option<ArtistCatalog>,
}

impl Platform {
    /// Opens the data directory named by `config`, creating it and seeding
    /// the admin account if needed.
    pub fn open(config: AppConfig) -> Result<Self> {
        let layout = Layout::new(&config.data_dir);
        store::ensure_dir(layout.root())?;

        let mut accounts = AccountStore::new(layout.clone());
        accounts.ensure_admin(&config)?;

        Ok(Self {
            catalog: CatalogManager::new(layout.clone(), config.max_file_size),
            requests: RequestEngine::new(layout.clone()),
            search: SearchIndex::build(&layout),
            session: Session::new(),
            working: None,
            accounts,
            layout,
            config,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    pub fn accounts(&self) -> &AccountStore {
        &self.accounts
    }

    pub fn search_index(&self) -> &SearchIndex {
        &self.search
    }

    /// Runs a task and turns any failure into [`AppEvent::Error`].
    pub fn dispatch(&mut self, task: AppTask) -> AppEvent {
        match self.handle_task(task) {
            Ok(event) => event,
            Err(e) => {
                if e.is_recoverable() {
                    warn!(error = %e, "task failed");
                } else {
                    error!(error = %e, "task failed");
                }
                AppEvent::Error(e.to_string())
            }
        }
    }

    /// Orchestrates the execution of a single task.
    pub fn handle_task(&mut self, task: AppTask) -> Result<AppEvent> {
        match task {
            AppTask::Register {
                email,
                nickname,
                password,
            } => handlers::register(self, &email, &nickname, &password),
            AppTask::Login { username, password } => handlers::login(self, &username, &password),
            AppTask::Logout => handlers::logout(self),
            AppTask::ChangePassword { old, new } => handlers::change_password(self, &old, &new),
            AppTask::ChangeNickname(new) => handlers::change_nickname(self, &new),

            AppTask::SubmitArtistRequest {
                email,
                nickname,
                password,
            } => handlers::submit_artist_request(self, &email, &nickname, &password),
            AppTask::ListArtistRequests(status) => handlers::list_artist_requests(self, status),
            AppTask::ApproveArtistRequest { email, nickname } => {
                handlers::approve_artist_request(self, &email, &nickname)
            }
            AppTask::RejectArtistRequest { email, nickname } => {
                handlers::reject_artist_request(self, &email, &nickname)
            }

            AppTask::SubmitLyricsEdit { song, lyrics } => handlers::submit_lyrics_edit(self, &song, &lyrics),
            AppTask::ListLyricsRequests(status) => handlers::list_lyrics_requests(self, status),
            AppTask::ListLyricsRequestsForArtist(artist) => {
                handlers::list_lyrics_requests_for_artist(self, &artist)
            }
            AppTask::ApproveLyricsRequest {
                artist,
                song,
                timestamp,
            } => handlers::approve_lyrics_request(self, &artist, &song, &timestamp),
            AppTask::RejectLyricsRequest {
                artist,
                song,
                timestamp,
            } => handlers::reject_lyrics_request(self, &artist, &song, &timestamp),

            AppTask::LoadCatalog => handlers::load_catalog(self),
            AppTask::AddSingle {
                title,
                lyrics,
                release_date,
            } => handlers::edit_catalog(self, |catalog| {
                catalog.add_single(&title, &lyrics, &release_date).map(|_| ())
            }),
            AppTask::AddAlbum { title, release_date } => {
                handlers::edit_catalog(self, |catalog| catalog.add_album(&title, &release_date).map(|_| ()))
            }
            AppTask::AddTrack {
                album,
                title,
                lyrics,
                release_date,
            } => handlers::edit_catalog(self, |catalog| {
                catalog.add_track(&album, &title, &lyrics, &release_date)
            }),
            AppTask::EditLyrics { title, album, lyrics } => handlers::edit_catalog(self, |catalog| {
                catalog.edit_lyrics(&title, album.as_deref(), &lyrics)
            }),
            AppTask::SaveCatalog => handlers::save_catalog(self),
            AppTask::DeleteSong { title, album } => handlers::with_catalog(self, |manager, catalog| {
                manager.delete_song(catalog, &title, album.as_deref())?;
                Ok(AppEvent::CatalogChanged)
            }),
            AppTask::DeleteAlbum(title) => handlers::with_catalog(self, |manager, catalog| {
                manager.delete_album(catalog, &title)?;
                Ok(AppEvent::CatalogChanged)
            }),
            AppTask::RenameSong { album, old, new } => handlers::with_catalog(self, |manager, catalog| {
                manager.rename_song(catalog, album.as_deref(), &old, &new)?;
                Ok(AppEvent::CatalogChanged)
            }),
            AppTask::RenameAlbum { old, new } => handlers::with_catalog(self, |manager, catalog| {
                manager.rename_album(catalog, &old, &new)?;
                Ok(AppEvent::CatalogChanged)
            }),
            AppTask::SaveAlbumArt { album, image } => handlers::with_catalog(self, |manager, catalog| {
                let path = manager.save_album_art(catalog, &album, &image)?;
                Ok(AppEvent::AlbumArtSaved(path))
            }),

            AppTask::Follow(artist) => handlers::follow(self, &artist, true),
            AppTask::Unfollow(artist) => handlers::follow(self, &artist, false),
            AppTask::ListFollowings => handlers::list_followings(self),

            AppTask::AddComment { target, text } => handlers::add_comment(self, &target, &text),
            AppTask::LoadComments(target) => handlers::load_comments(self, &target),
            AppTask::ViewSong(song) => handlers::view_song(self, song),
            AppTask::LikeSong(song) => handlers::like_song(self, &song),

            AppTask::Search(query) => handlers::search(self, &query),
            AppTask::TopSongs(n) => handlers::top_songs(self, n),
            AppTask::RefreshSearch => handlers::refresh_search(self),
        }
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::error::PlatformError;

    fn platform() -> (TempDir, Platform) {
        let dir = TempDir::new().unwrap();
        let platform = Platform::open(AppConfig::with_data_dir(dir.path())).unwrap();
        (dir, platform)
    }

    fn login(platform: &mut Platform, username: &str, password: &str) {
        let event = platform.dispatch(AppTask::Login {
            username: username.into(),
            password: password.into(),
        });
        assert!(matches!(event, AppEvent::LoggedIn(_)), "{event:?}");
    }

    fn approved_artist(platform: &mut Platform) {
        platform
            .handle_task(AppTask::SubmitArtistRequest {
                email: "k@x.com".into(),
                nickname: "kdot".into(),
                password: "Kdot123!".into(),
            })
            .unwrap();
        login(platform, "admin", "Admin123!");
        platform
            .handle_task(AppTask::ApproveArtistRequest {
                email: "k@x.com".into(),
                nickname: "kdot".into(),
            })
            .unwrap();
        login(platform, "kdot", "Kdot123!");
    }

    #[test]
    fn moderation_requires_an_admin() {
        let (_dir, mut platform) = platform();
        platform
            .handle_task(AppTask::Register {
                email: "fan@x.com".into(),
                nickname: "fan1".into(),
                password: "Passw0rd!".into(),
            })
            .unwrap();
        login(&mut platform, "fan1", "Passw0rd!");

        let err = platform
            .handle_task(AppTask::ListArtistRequests(RequestStatus::Pending))
            .unwrap_err();
        assert!(matches!(err, PlatformError::Forbidden(_)));
    }

    #[test]
    fn artist_edits_are_saved_on_request() {
        let (_dir, mut platform) = platform();
        approved_artist(&mut platform);

        let event = platform.dispatch(AppTask::AddSingle {
            title: "HUMBLE".into(),
            lyrics: "Sit down".into(),
            release_date: "2017-03-30".into(),
        });
        assert_eq!(event, AppEvent::CatalogChanged);

        let event = platform.dispatch(AppTask::SaveCatalog);
        assert_eq!(event, AppEvent::CatalogSaved(SyncReport { deleted: 0, written: 1 }));
        let event = platform.dispatch(AppTask::SaveCatalog);
        assert_eq!(event, AppEvent::CatalogSaved(SyncReport::default()));

        platform.dispatch(AppTask::RefreshSearch);
        let AppEvent::TopSongs(songs) = platform.dispatch(AppTask::TopSongs(5)) else {
            panic!("expected a chart");
        };
        assert_eq!(songs[0].title, "HUMBLE");
    }

    #[test]
    fn failures_become_error_events() {
        let (_dir, mut platform) = platform();
        let event = platform.dispatch(AppTask::AddAlbum {
            title: "DAMN".into(),
            release_date: "2017".into(),
        });
        assert!(matches!(event, AppEvent::Error(message) if message.contains("login required")));
    }

    #[test]
    fn artists_moderate_edits_to_their_own_songs() {
        let (_dir, mut platform) = platform();
        approved_artist(&mut platform);
        platform
            .handle_task(AppTask::AddSingle {
                title: "DNA".into(),
                lyrics: "old".into(),
                release_date: "2017".into(),
            })
            .unwrap();
        platform.handle_task(AppTask::SaveCatalog).unwrap();

        let song = SongRef::single("kdot", "DNA");
        let AppEvent::LyricsRequestSubmitted(request) = platform
            .handle_task(AppTask::SubmitLyricsEdit {
                song: song.clone(),
                lyrics: "new".into(),
            })
            .unwrap()
        else {
            panic!("expected a submitted request");
        };

        platform
            .handle_task(AppTask::ApproveLyricsRequest {
                artist: "kdot".into(),
                song: "DNA".into(),
                timestamp: request.timestamp,
            })
            .unwrap();

        let AppEvent::CatalogLoaded(catalog) = platform.handle_task(AppTask::LoadCatalog).unwrap() else {
            panic!("expected the catalog");
        };
        assert_eq!(catalog.single("DNA").unwrap().lyrics, "new");
        assert!(!catalog.has_pending_writes());

        let AppEvent::SongViewed { lyrics, views } = platform.handle_task(AppTask::ViewSong(song)).unwrap() else {
            panic!("expected lyrics");
        };
        assert_eq!((lyrics.as_str(), views), ("new", 1));
    }

    #[test]
    fn counters_survive_a_lyrics_edit() {
        let (_dir, mut platform) = platform();
        approved_artist(&mut platform);
        platform
            .handle_task(AppTask::AddSingle {
                title: "DNA".into(),
                lyrics: "v1".into(),
                release_date: "2017".into(),
            })
            .unwrap();
        platform.handle_task(AppTask::SaveCatalog).unwrap();

        let song = SongRef::single("kdot", "DNA");
        platform.handle_task(AppTask::ViewSong(song.clone())).unwrap();
        platform.handle_task(AppTask::ViewSong(song.clone())).unwrap();
        assert_eq!(
            platform.handle_task(AppTask::LikeSong(song)).unwrap(),
            AppEvent::SongLiked(1)
        );

        platform
            .handle_task(AppTask::EditLyrics {
                title: "DNA".into(),
                album: None,
                lyrics: "v2".into(),
            })
            .unwrap();
        platform.handle_task(AppTask::SaveCatalog).unwrap();

        let AppEvent::CatalogLoaded(catalog) = platform.handle_task(AppTask::LoadCatalog).unwrap() else {
            panic!("expected the catalog");
        };
        let dna = catalog.single("DNA").unwrap();
        assert_eq!((dna.views, dna.likes), (2, 1));

        let meta = platform.layout.song_files("kdot", "DNA", None).meta;
        let lines = crate::store::read_record(&meta).unwrap();
        assert_eq!(crate::store::extract_field(&lines, "Views"), Some("2"));
        assert_eq!(crate::store::extract_field(&lines, "Likes"), Some("1"));
    }
}
